// Append-only character output.

/// Destination for characters emitted by the channel.
pub trait CharSink {
    fn emit(&mut self, c: char);
}

impl CharSink for String {
    fn emit(&mut self, c: char) {
        self.push(c);
    }
}

impl CharSink for Vec<char> {
    fn emit(&mut self, c: char) {
        self.push(c);
    }
}

impl<T: CharSink + ?Sized> CharSink for &mut T {
    fn emit(&mut self, c: char) {
        (**self).emit(c);
    }
}
