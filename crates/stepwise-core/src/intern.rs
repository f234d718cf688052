//! Interning table for symbol names.
//!
//! Symbols are stored once and referred to by a dense `u32` id, which keeps
//! `ExprNode::Symbol` small and makes symbol comparison an integer compare.

use hashbrown::HashMap;
use std::hash::Hash;

/// A generic interning table.
#[derive(Debug, Clone)]
pub struct InternTable<T> {
    /// Maps values to their IDs.
    map: HashMap<T, u32>,
    /// Stores values by ID for reverse lookup.
    values: Vec<T>,
}

impl<T: Clone + Eq + Hash> Default for InternTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Eq + Hash> InternTable<T> {
    /// Creates a new empty interning table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Interns a value, returning its unique ID.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` values are interned.
    pub fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }

        let id = u32::try_from(self.values.len()).expect("intern table overflow");
        self.map.insert(value.clone(), id);
        self.values.push(value);
        id
    }

    /// Gets a value by its ID.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&T> {
        self.values.get(id as usize)
    }

    /// Gets the ID of a value, if it was interned.
    #[must_use]
    pub fn get_id(&self, value: &T) -> Option<u32> {
        self.map.get(value).copied()
    }

    /// Returns the number of interned values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no values have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_table() {
        let mut table = InternTable::new();

        let x = table.intern("x".to_string());
        let y = table.intern("y".to_string());
        let x_again = table.intern("x".to_string());

        assert_eq!(x, 0);
        assert_eq!(y, 1);
        assert_eq!(x, x_again);
        assert_eq!(table.get(y).map(String::as_str), Some("y"));
        assert_eq!(table.get_id(&"z".to_string()), None);
        assert_eq!(table.len(), 2);
    }
}
