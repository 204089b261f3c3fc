//! Ordered palette mapping local codes to global values.
//!
//! The ordered list is the external representation (code `i` is entry `i`).
//! A hash index from global value to code is kept in sync with it so lookups
//! on the `set` path do not scan the list.

use rustc_hash::FxHashMap;

/// Ordered list of global values with O(1) reverse lookup.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    entries: Vec<u64>,
    codes: FxHashMap<u64, u64>,
}

impl Palette {
    /// Creates a palette holding a single entry with code 0.
    pub fn new(first: u64) -> Self {
        let mut palette = Self::default();
        palette.push(first);
        palette
    }

    /// Builds a palette from entries in code order.
    ///
    /// If a value appears more than once, lookups resolve to its first code.
    pub fn from_entries(entries: Vec<u64>) -> Self {
        let mut codes = FxHashMap::default();
        codes.reserve(entries.len());
        for (code, &value) in entries.iter().enumerate() {
            codes.entry(value).or_insert(code as u64);
        }
        Self { entries, codes }
    }

    /// Returns the code of `value`, if present.
    pub fn code_of(&self, value: u64) -> Option<u64> {
        self.codes.get(&value).copied()
    }

    /// Returns the global value stored under `code`.
    pub fn value_of(&self, code: u64) -> Option<u64> {
        usize::try_from(code)
            .ok()
            .and_then(|code| self.entries.get(code))
            .copied()
    }

    /// Appends `value` and returns its new code. Does not check for duplicates.
    pub fn push(&mut self, value: u64) -> u64 {
        let code = self.entries.len() as u64;
        self.entries.push(value);
        self.codes.entry(value).or_insert(code);
        code
    }

    /// Returns the code of `value`, appending it first if it is missing.
    pub fn code_or_insert(&mut self, value: u64) -> u64 {
        match self.code_of(value) {
            Some(code) => code,
            None => self.push(value),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in code order.
    pub fn as_slice(&self) -> &[u64] {
        &self.entries
    }

    /// Consumes the palette and returns its entries in code order.
    pub fn into_entries(self) -> Vec<u64> {
        self.entries
    }
}

impl PartialEq for Palette {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Palette {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette() {
        let mut palette = Palette::new(0);
        assert_eq!(palette.code_or_insert(1), 1);
        assert_eq!(palette.code_or_insert(2), 2);
        assert_eq!(palette.code_or_insert(1), 1);
        assert_eq!(palette.code_or_insert(3), 3);
        assert_eq!(palette.code_or_insert(2), 2);
        assert_eq!(palette.as_slice(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_lookup_both_directions() {
        let palette = Palette::from_entries(vec![9, 400, u64::MAX]);
        assert_eq!(palette.code_of(400), Some(1));
        assert_eq!(palette.code_of(5), None);
        assert_eq!(palette.value_of(2), Some(u64::MAX));
        assert_eq!(palette.value_of(3), None);
    }

    #[test]
    fn test_duplicate_entries_resolve_to_first_code() {
        let palette = Palette::from_entries(vec![7, 8, 7]);
        assert_eq!(palette.code_of(7), Some(0));
        assert_eq!(palette.value_of(2), Some(7));
        assert_eq!(palette.len(), 3);
    }
}
