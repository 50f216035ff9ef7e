//! A single keyed table with a surrogate id sequence.

use std::collections::BTreeMap;

use crate::error::{HrError, HrResult};

/// Rows of one entity keyed by surrogate id, iterated in id order.
#[derive(Debug, Clone)]
pub struct Table<T> {
    entity: &'static str,
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T> Table<T> {
    /// Creates an empty table whose errors name `entity`.
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Assigns the next id and inserts the row built from it.
    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(build(id))
    }

    /// Looks a row up by id.
    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Looks a row up by id for modification.
    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// Looks a row up by id, failing with [`HrError::NotFound`].
    pub fn require(&self, id: i64) -> HrResult<&T> {
        self.rows.get(&id).ok_or(HrError::NotFound {
            entity: self.entity,
            id,
        })
    }

    /// Mutable counterpart of [`Table::require`].
    pub fn require_mut(&mut self, id: i64) -> HrResult<&mut T> {
        let entity = self.entity;
        self.rows
            .get_mut(&id)
            .ok_or(HrError::NotFound { entity, id })
    }

    /// Returns true if a row with `id` exists.
    pub fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Removes and returns a row.
    pub fn remove(&mut self, id: i64) -> Option<T> {
        self.rows.remove(&id)
    }

    /// Keeps only rows matching the predicate; returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| keep(row));
        before - self.rows.len()
    }

    /// Iterates rows in id order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Iterates rows in id order for modification.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.rows.values_mut()
    }

    /// Returns the first row (lowest id) matching the predicate.
    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.rows.values().find(|row| predicate(row))
    }

    /// Clones every row matching the predicate, in id order.
    pub fn filter_cloned(&self, mut predicate: impl FnMut(&T) -> bool) -> Vec<T>
    where
        T: Clone,
    {
        self.rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_are_not_reused() {
        let mut table: Table<(i64, &str)> = Table::new("widget");
        let first = table.insert_with(|id| (id, "a")).0;
        let second = table.insert_with(|id| (id, "b")).0;
        assert_eq!((first, second), (1, 2));

        table.remove(2);
        let third = table.insert_with(|id| (id, "c")).0;
        assert_eq!(third, 3);
    }

    #[test]
    fn test_require_reports_entity_name() {
        let table: Table<i64> = Table::new("widget");
        let err = table.require(9).unwrap_err();
        assert_eq!(err.to_string(), "widget with id 9 not found");
    }

    #[test]
    fn test_retain_returns_removed_count() {
        let mut table: Table<i64> = Table::new("n");
        for _ in 0..5 {
            table.insert_with(|id| id);
        }
        let removed = table.retain(|n| n % 2 == 0);
        assert_eq!(removed, 3);
        assert_eq!(table.iter().copied().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_find_returns_lowest_id_match() {
        let mut table: Table<(i64, bool)> = Table::new("flag");
        table.insert_with(|id| (id, false));
        table.insert_with(|id| (id, true));
        table.insert_with(|id| (id, true));
        assert_eq!(table.find(|(_, f)| *f).map(|(id, _)| *id), Some(2));
    }
}
