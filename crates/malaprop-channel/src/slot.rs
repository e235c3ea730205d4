// Single-character delay buffer.

/// Holds at most one character awaiting emission.
///
/// The one-slot bound is structural: the slot is an `Option<char>`, so it can
/// never hold two characters. Taking from an empty slot is a normal `None`
/// result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingSlot {
    pending: Option<char>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the buffered character.
    #[inline]
    pub fn take(&mut self) -> Option<char> {
        self.pending.take()
    }

    /// Buffer `incoming` (which may be nothing) and return what it displaced.
    #[inline]
    pub fn push(&mut self, incoming: Option<char>) -> Option<char> {
        std::mem::replace(&mut self.pending, incoming)
    }

    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.pending
    }

    /// Number of buffered characters: 0 or 1.
    #[inline]
    pub fn len(&self) -> usize {
        usize::from(self.pending.is_some())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_from_empty_is_none() {
        let mut slot = PendingSlot::new();
        assert_eq!(slot.take(), None);
        assert!(slot.is_empty());
    }

    #[test]
    fn push_returns_displaced() {
        let mut slot = PendingSlot::new();
        assert_eq!(slot.push(Some('a')), None);
        assert_eq!(slot.push(Some('b')), Some('a'));
        assert_eq!(slot.peek(), Some('b'));
        assert_eq!(slot.len(), 1);
    }

    #[test]
    fn pushing_nothing_empties_slot() {
        let mut slot = PendingSlot::new();
        slot.push(Some('a'));
        assert_eq!(slot.push(None), Some('a'));
        assert_eq!(slot.len(), 0);
    }
}
