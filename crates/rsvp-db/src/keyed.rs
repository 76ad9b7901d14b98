use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::Result;
use crate::guard::{Guard, Held};
use crate::models::Record;
use crate::table::TableFile;

/// A table holding at most one row per key, the key being the first field.
///
/// Every [`upsert`](Self::upsert) reads the whole file, merges the record in
/// memory and writes the whole file back, so its cost is O(table size)
/// regardless of how little changed. Fine for a guest list; not for a
/// large table.
#[derive(Debug)]
pub struct KeyedStore<R> {
    file: TableFile,
    guard: Arc<Guard>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> KeyedStore<R> {
    pub fn new(dir: &Path, guard: Arc<Guard>) -> Self {
        Self {
            file: TableFile::new(dir, R::TABLE),
            guard,
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub(crate) fn guard(&self) -> &Guard {
        &self.guard
    }

    /// First record whose key equals `key`.
    pub fn get(&self, key: &str) -> Result<Option<R>> {
        let held = self.guard.lock();
        self.get_held(&held, key)
    }

    /// Insert `record`, or replace the trailing fields of the row with the
    /// same key in place. Row order is preserved.
    pub fn upsert(&self, record: &R) -> Result<()> {
        let held = self.guard.lock();
        self.upsert_held(&held, record)
    }

    /// Every decodable record, in file order.
    pub fn all(&self) -> Result<Vec<R>> {
        let _held = self.guard.lock();
        let rows = self.file.read_rows(R::ARITY)?;
        Ok(rows.into_iter().filter_map(|row| self.to_record(row)).collect())
    }

    pub(crate) fn get_held(&self, _held: &Held<'_>, key: &str) -> Result<Option<R>> {
        let rows = self.file.read_rows(R::ARITY)?;
        Ok(rows
            .into_iter()
            .find(|row| row[0] == key)
            .and_then(|row| self.to_record(row)))
    }

    pub(crate) fn upsert_held(&self, _held: &Held<'_>, record: &R) -> Result<()> {
        let mut rows = self.file.read_rows(R::ARITY)?;
        let key = record.key();
        let fields = record.to_fields();

        // Keep the first row for the key and drop any later duplicates, so the
        // one-row-per-key invariant holds after this cycle even if the file
        // was edited by hand.
        let mut replaced = false;
        rows.retain_mut(|row| {
            if row[0] != key {
                return true;
            }
            if replaced {
                return false;
            }
            row.clone_from(&fields);
            replaced = true;
            true
        });
        if !replaced {
            rows.push(fields);
        }

        self.file.write_rows(&rows)?;
        debug!(
            "{}: {} '{}' ({} rows)",
            self.file.name(),
            if replaced { "updated" } else { "inserted" },
            key,
            rows.len()
        );
        Ok(())
    }

    fn to_record(&self, row: Vec<String>) -> Option<R> {
        let key = row[0].clone();
        let record = R::from_fields(row);
        if record.is_none() {
            warn!("{}: ignoring unreadable row for '{}'", self.file.name(), key);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_types::models::{Attendance, AttendanceRecord, MessageRecord};
    use std::fs;

    fn attendance(username: &str, status: Attendance) -> AttendanceRecord {
        AttendanceRecord {
            username: username.to_string(),
            status,
        }
    }

    fn store<R: Record>(dir: &Path) -> KeyedStore<R> {
        KeyedStore::new(dir, Arc::new(Guard::new()))
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store::<AttendanceRecord>(dir.path());

        assert!(store.get("alice").unwrap().is_none());
        assert!(store.all().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn upsert_replaces_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = store::<AttendanceRecord>(dir.path());

        store.upsert(&attendance("alice", Attendance::Yes)).unwrap();
        store.upsert(&attendance("bob", Attendance::Yes)).unwrap();
        store.upsert(&attendance("alice", Attendance::No)).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "alice,no\nbob,si\n");
        assert_eq!(
            store.get("alice").unwrap(),
            Some(attendance("alice", Attendance::No))
        );
    }

    #[test]
    fn upsert_collapses_duplicate_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = store::<MessageRecord>(dir.path());
        fs::write(store.path(), "alice,one\nbob,hi\nalice,two\n").unwrap();

        // Reads see the first row for a key.
        assert_eq!(store.get("alice").unwrap().unwrap().message, "one");

        store
            .upsert(&MessageRecord {
                username: "alice".into(),
                message: "three".into(),
            })
            .unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "alice,three\nbob,hi\n");
    }

    #[test]
    fn malformed_rows_are_skipped_and_not_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = store::<AttendanceRecord>(dir.path());
        fs::write(store.path(), "alice,si\ngarbage\nbob,no,extra\n").unwrap();

        assert_eq!(store.all().unwrap().len(), 1);

        store.upsert(&attendance("carol", Attendance::No)).unwrap();
        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "alice,si\ncarol,no\n");
    }

    #[test]
    fn unknown_status_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = store::<AttendanceRecord>(dir.path());
        fs::write(store.path(), "alice,maybe\n").unwrap();

        assert!(store.get("alice").unwrap().is_none());
        assert!(store.all().unwrap().is_empty());
    }

    #[test]
    fn unwritable_location_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let store = store::<AttendanceRecord>(&missing);

        // Reading a table in a missing directory is still just empty.
        assert!(store.get("alice").unwrap().is_none());

        let err = store
            .upsert(&attendance("alice", Attendance::Yes))
            .unwrap_err();
        assert_eq!(err.table(), "attendance.csv");
    }
}
