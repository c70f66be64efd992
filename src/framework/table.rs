//! # Table
//!
//! [`Table<T>`] is the authoritative storage for one record kind. It owns the
//! rows, hands out ids from its sequence, stamps timestamps and enforces the
//! entity's column checks and unique keys.
//!
//! A table knows nothing about other tables: foreign keys, delete
//! restrictions and cascades live one level up, in the
//! [`Database`](crate::store::Database) and the services.
//!
//! Mutating methods are `pub(crate)` so that every write goes through a
//! [`UnitOfWork`](crate::store::UnitOfWork), which journals it for rollback.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use super::entity::{Entity, UniqueKey};
use super::error::StoreError;

#[derive(Debug, Clone)]
pub struct Table<T: Entity> {
    rows: BTreeMap<T::Id, T>,
    unique: HashMap<UniqueKey, T::Id>,
    next_id: u64,
}

impl<T: Entity> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Table<T> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            unique: HashMap::new(),
            next_id: 1,
        }
    }

    /// Returns the row or fails with `NotFound`.
    pub fn get(&self, id: T::Id) -> Result<&T, StoreError> {
        self.rows
            .get(&id)
            .ok_or_else(|| StoreError::not_found(T::NAME, id))
    }

    pub fn find(&self, id: T::Id) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn contains(&self, id: T::Id) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    /// Id owning `key`, if any row holds it.
    pub fn lookup_unique(&self, key: &UniqueKey) -> Option<T::Id> {
        self.unique.get(key).copied()
    }

    /// Builds and checks the row the next insert would store, without storing
    /// it. Callers that need cross-table checks run them on the returned row
    /// and then hand it to [`Table::store_new`].
    pub(crate) fn prepare(&self, params: T::Create, now: DateTime<Utc>) -> Result<T, StoreError> {
        let row = T::from_create_params(T::Id::from(self.next_id), params, now)?;
        row.validate()?;
        self.check_unique(&row, None)?;
        Ok(row)
    }

    /// Stores a row obtained from the immediately preceding [`Table::prepare`]
    /// and advances the sequence.
    pub(crate) fn store_new(&mut self, row: T) {
        self.next_id += 1;
        self.index(&row);
        self.rows.insert(row.id(), row);
    }

    /// Replaces an existing row.
    ///
    /// `created_at` is carried over from the stored row and `updated_at` is set
    /// to `now`. Returns the previous row, or `None` when `row` is identical to
    /// what is stored (nothing is written in that case).
    pub(crate) fn update(&mut self, mut row: T, now: DateTime<Utc>) -> Result<Option<T>, StoreError> {
        let id = row.id();
        let previous = self.get(id)?.clone();

        *row.timestamps_mut() = *previous.timestamps();
        if row == previous {
            return Ok(None);
        }

        row.validate()?;
        self.check_unique(&row, Some(id))?;
        row.timestamps_mut().updated_at = now;

        self.unindex(&previous);
        self.index(&row);
        self.rows.insert(id, row);
        Ok(Some(previous))
    }

    pub(crate) fn remove(&mut self, id: T::Id) -> Result<T, StoreError> {
        let row = self
            .rows
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(T::NAME, id))?;
        self.unindex(&row);
        Ok(row)
    }

    /// Puts a previously removed or replaced row back as it was.
    pub(crate) fn restore(&mut self, row: T) {
        if let Some(current) = self.rows.remove(&row.id()) {
            self.unindex(&current);
        }
        self.index(&row);
        self.rows.insert(row.id(), row);
    }

    /// Drops a row without any checks. Used to undo an insert.
    pub(crate) fn discard(&mut self, id: T::Id) {
        if let Some(row) = self.rows.remove(&id) {
            self.unindex(&row);
        }
    }

    fn check_unique(&self, row: &T, except: Option<T::Id>) -> Result<(), StoreError> {
        for key in row.unique_keys() {
            match self.unique.get(&key) {
                Some(owner) if Some(*owner) != except => {
                    return Err(StoreError::constraint(
                        T::NAME,
                        key.constraint,
                        key.value,
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn index(&mut self, row: &T) {
        for key in row.unique_keys() {
            self.unique.insert(key, row.id());
        }
    }

    fn unindex(&mut self, row: &T) {
        for key in row.unique_keys() {
            self.unique.remove(&key);
        }
    }
}
