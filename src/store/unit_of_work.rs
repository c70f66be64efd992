//! # Unit of Work
//!
//! A write transaction against the [`Database`]. Every change is applied
//! immediately (so later reads in the same unit see it) and journalled; the
//! owner then either commits, which keeps the changes, or rolls back, which
//! replays the journal backwards.
//!
//! All writes in a unit share one timestamp, taken when the unit begins.

use chrono::{DateTime, Utc};

use super::database::{Change, Database, Stored, Undo};
use crate::framework::{Entity, StoreError};

pub struct UnitOfWork<'a> {
    db: &'a mut Database,
    now: DateTime<Utc>,
    journal: Vec<Undo>,
}

impl<'a> UnitOfWork<'a> {
    pub fn begin(db: &'a mut Database) -> Self {
        let now = db.next_timestamp();
        Self {
            db,
            now,
            journal: Vec::new(),
        }
    }

    /// Read access that reflects this unit's own writes.
    pub fn db(&self) -> &Database {
        self.db
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Number of effective changes so far.
    pub fn changes(&self) -> usize {
        self.journal.len()
    }

    /// Inserts a new row after its column, unique and foreign-key checks.
    pub fn insert<T: Stored>(&mut self, params: T::Create) -> Result<T, StoreError> {
        let row = self.db.table::<T>().prepare(params, self.now)?;
        row.check_references(self.db)?;

        let id = row.id();
        self.db.table_mut::<T>().store_new(row.clone());
        self.journal.push(T::journal(Change::Inserted(id)));
        Ok(row)
    }

    /// Applies an update payload to an existing row.
    pub fn update<T: Stored>(&mut self, id: T::Id, update: T::Update) -> Result<T, StoreError> {
        let mut row = self.db.table::<T>().get(id)?.clone();
        row.on_update(update)?;
        self.apply_update(row)
    }

    /// Runs a domain action on an existing row and stores the result.
    pub fn perform_action<T: Stored>(
        &mut self,
        id: T::Id,
        action: T::Action,
    ) -> Result<(T, T::ActionResult), StoreError> {
        let mut row = self.db.table::<T>().get(id)?.clone();
        let result = row.handle_action(action)?;
        let row = self.apply_update(row)?;
        Ok((row, result))
    }

    /// Writes a modified copy of a stored row. An unchanged row is not
    /// written and leaves `updated_at` alone.
    pub fn apply_update<T: Stored>(&mut self, row: T) -> Result<T, StoreError> {
        let id = row.id();
        self.db.table::<T>().get(id)?;
        row.check_references(self.db)?;

        if let Some(previous) = self.db.table_mut::<T>().update(row, self.now)? {
            self.journal.push(T::journal(Change::Updated(previous)));
        }
        Ok(self.db.table::<T>().get(id)?.clone())
    }

    /// Deletes a row that nothing references any more.
    pub fn delete<T: Stored>(&mut self, id: T::Id) -> Result<T, StoreError> {
        self.db.table::<T>().get(id)?;
        T::check_unreferenced(id, self.db)?;

        let row = self.db.table_mut::<T>().remove(id)?;
        self.journal.push(T::journal(Change::Deleted(row.clone())));
        Ok(row)
    }

    /// Keeps every change. Returns how many there were.
    pub fn commit(self) -> usize {
        self.journal.len()
    }

    /// Undoes every change, newest first. Returns how many were undone.
    pub fn rollback(self) -> usize {
        let undone = self.journal.len();
        for undo in self.journal.into_iter().rev() {
            undo.revert(self.db);
        }
        undone
    }
}
