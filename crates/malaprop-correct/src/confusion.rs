// In-memory confusion table.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use hashbrown::HashMap;
use tracing::debug;

use crate::TableError;
use crate::oracle::{ConfusionSets, OracleError};

/// Word to ordered spelling variants.
///
/// A word never appears in its own set and each variant appears once, in
/// first-insertion order. Unknown words have an empty set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfusionTable {
    sets: HashMap<String, Vec<String>>,
}

impl ConfusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `variants` to the set of `word`.
    pub fn insert<I, S>(&mut self, word: &str, variants: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = self.sets.entry_ref(word).or_default();
        for variant in variants {
            let variant = variant.into();
            if variant != word && !set.contains(&variant) {
                set.push(variant);
            }
        }
    }

    /// Make the relation symmetric: if `b` is a variant of `a`, `a` becomes a
    /// variant of `b`.
    pub fn make_symmetric(&mut self) {
        let mut reverse: Vec<(String, String)> = Vec::new();
        for (word, variants) in &self.sets {
            for variant in variants {
                reverse.push((variant.clone(), word.clone()));
            }
        }
        // Sorted so the appended order does not depend on hash order.
        reverse.sort();
        for (word, variant) in reverse {
            self.insert(&word, [variant]);
        }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, word: &str) -> &[String] {
        self.sets.get(word).map(Vec::as_slice).unwrap_or_default()
    }

    /// Parse `{"word": ["variant", ...], ...}`.
    pub fn from_json_str(text: &str) -> Result<Self, TableError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(text)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_reader(reader)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let file = File::open(path.as_ref())?;
        Self::from_json_reader(BufReader::new(file))
    }

    fn from_raw(raw: BTreeMap<String, Vec<String>>) -> Self {
        let mut table = Self::new();
        for (word, variants) in raw {
            table.insert(&word, variants);
        }
        let variants: usize = table.sets.values().map(Vec::len).sum();
        debug!(words = table.len(), variants, "loaded confusion table");
        table
    }
}

impl ConfusionSets for ConfusionTable {
    fn confusion_set(&self, word: &str) -> Result<Vec<String>, OracleError> {
        Ok(self.get(word).to_vec())
    }

    fn confusion_set_size(&self, word: &str) -> Result<usize, OracleError> {
        Ok(self.get(word).len())
    }
}

impl<W: Into<String>, V: Into<String>> FromIterator<(W, Vec<V>)> for ConfusionTable {
    fn from_iter<T: IntoIterator<Item = (W, Vec<V>)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (word, variants) in iter {
            let word = word.into();
            table.insert(&word, variants);
        }
        table
    }
}
