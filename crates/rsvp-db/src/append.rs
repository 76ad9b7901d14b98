use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::guard::Guard;
use crate::models::Record;
use crate::table::TableFile;

/// A table that only ever grows. Writes never read or rewrite prior rows.
#[derive(Debug)]
pub struct AppendStore<R> {
    file: TableFile,
    guard: Arc<Guard>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> AppendStore<R> {
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

    /// Append `records` in order. Returns how many rows were written.
    /// An empty slice does not touch the file.
    pub fn append_many(&self, records: &[R]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let rows: Vec<Vec<String>> = records.iter().map(R::to_fields).collect();

        let _held = self.guard.lock();
        self.file.append_rows(&rows)?;
        debug!("{}: appended {} row(s)", self.file.name(), rows.len());
        Ok(rows.len())
    }

    /// Every record whose key equals `key`, in file order.
    pub fn filter_by_key(&self, key: &str) -> Result<Vec<R>> {
        let _held = self.guard.lock();
        let rows = self.file.read_rows(R::ARITY)?;
        Ok(rows
            .into_iter()
            .filter(|row| row[0] == key)
            .filter_map(R::from_fields)
            .collect())
    }

    #[cfg(test)]
    fn all(&self) -> Result<Vec<R>> {
        let _held = self.guard.lock();
        let rows = self.file.read_rows(R::ARITY)?;
        Ok(rows.into_iter().filter_map(R::from_fields).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsvp_types::models::{Guest, GuestRow};
    use std::fs;

    fn guest_row(owner: &str, fullname: &str) -> GuestRow {
        GuestRow {
            owner: owner.to_string(),
            guest: Guest {
                fullname: fullname.to_string(),
                ..Guest::default()
            },
        }
    }

    #[test]
    fn empty_append_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppendStore::<GuestRow>::new(dir.path(), Arc::new(Guard::new()));

        assert_eq!(store.append_many(&[]).unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn appends_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppendStore::<GuestRow>::new(dir.path(), Arc::new(Guard::new()));

        store
            .append_many(&[guest_row("alice", "Bob"), guest_row("carol", "Dan")])
            .unwrap();
        // Resubmitting the same guest adds another row.
        store.append_many(&[guest_row("alice", "Bob")]).unwrap();

        let all = store.all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].owner, "carol");

        let alice = store.filter_by_key("alice").unwrap();
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.guest.fullname == "Bob"));
    }

    #[test]
    fn existing_content_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppendStore::<GuestRow>::new(dir.path(), Arc::new(Guard::new()));
        fs::write(store.path(), "not,a,guest\n").unwrap();

        store.append_many(&[guest_row("alice", "Bob")]).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(contents, "not,a,guest\nalice,Bob,,,,,\n");
        assert_eq!(store.all().unwrap().len(), 1);
    }

    #[test]
    fn unterminated_last_row_is_not_merged() {
        let dir = tempfile::tempdir().unwrap();
        let store = AppendStore::<GuestRow>::new(dir.path(), Arc::new(Guard::new()));
        fs::write(store.path(), "alice,Bob,b@x.com,555,yes,none,SongA").unwrap();

        store.append_many(&[guest_row("carol", "Dan")]).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            contents,
            "alice,Bob,b@x.com,555,yes,none,SongA\ncarol,Dan,,,,,\n"
        );
        assert_eq!(store.filter_by_key("alice").unwrap().len(), 1);
        assert_eq!(store.filter_by_key("carol").unwrap().len(), 1);
    }
}
