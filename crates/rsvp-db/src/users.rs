use std::collections::HashMap;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use rsvp_types::models::UserRecord;
use tracing::info;

use crate::error::Result;
use crate::keyed::KeyedStore;

/// Result of checking a username/password pair against the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// The username was unknown and has just been registered.
    Registered,
    Matched,
    Mismatched,
}

/// In-memory copy of `users.csv`, consulted on every login.
///
/// Lookups never touch the disk. Mutations happen under the store guard and
/// are written through to the users table, which stays authoritative: if the
/// process dies between the in-memory insert and the write, the next start
/// reloads from the file.
#[derive(Debug)]
pub struct UserIndex {
    users: RwLock<HashMap<String, UserRecord>>,
    table: KeyedStore<UserRecord>,
}

impl UserIndex {
    /// Build the index from the users table. When a username appears more
    /// than once the first row wins, as it does for [`KeyedStore::get`].
    pub fn load(table: KeyedStore<UserRecord>) -> Result<Self> {
        let mut users: HashMap<String, UserRecord> = HashMap::new();
        for user in table.all()? {
            users.entry(user.username.clone()).or_insert(user);
        }

        info!("Loaded {} user(s) from {}", users.len(), table.path().display());
        Ok(Self {
            users: RwLock::new(users),
            table,
        })
    }

    pub fn path(&self) -> &Path {
        self.table.path()
    }

    /// The backing table, for reads that must come from disk.
    pub fn table(&self) -> &KeyedStore<UserRecord> {
        &self.table
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, username: &str) -> Option<UserRecord> {
        self.read().get(username).cloned()
    }

    /// Insert or replace `record` in memory, then persist it.
    ///
    /// The in-memory entry is kept even when the write fails; the error is
    /// returned so the caller can decide what to tell the visitor.
    pub fn register(&self, record: UserRecord) -> Result<()> {
        let held = self.table.guard().lock();
        self.write().insert(record.username.clone(), record.clone());
        self.table.upsert_held(&held, &record)
    }

    /// Compare `password` with the stored one, registering `username` with
    /// `password` when it is unknown. Lookup and registration happen under
    /// one guard acquisition, so two concurrent first logins for the same
    /// name cannot both register.
    ///
    /// Passwords are compared verbatim; nothing is hashed.
    pub fn check_or_register(&self, username: &str, password: &str) -> Result<CredentialCheck> {
        if let Some(user) = self.lookup(username) {
            return Ok(check(&user, password));
        }

        let held = self.table.guard().lock();
        let record = {
            let mut users = self.write();
            if let Some(user) = users.get(username) {
                // Lost the race to another registration of the same name.
                return Ok(check(user, password));
            }
            let record = UserRecord::new(username, password);
            users.insert(username.to_string(), record.clone());
            record
        };
        self.table.upsert_held(&held, &record)?;

        info!("New user registered: {}", username);
        Ok(CredentialCheck::Registered)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, UserRecord>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, UserRecord>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn check(user: &UserRecord, password: &str) -> CredentialCheck {
    if user.password == password {
        CredentialCheck::Matched
    } else {
        CredentialCheck::Mismatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::Guard;
    use std::fs;
    use std::sync::Arc;

    fn index(dir: &Path) -> UserIndex {
        UserIndex::load(KeyedStore::new(dir, Arc::new(Guard::new()))).unwrap()
    }

    #[test]
    fn load_reads_existing_users() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("users.csv"), "alice,pw1\nbroken\nbob,pw2\n").unwrap();

        let users = index(dir.path());
        assert_eq!(users.len(), 2);
        assert_eq!(users.lookup("alice"), Some(UserRecord::new("alice", "pw1")));
        assert!(users.lookup("broken").is_none());
    }

    #[test]
    fn duplicate_usernames_resolve_like_get() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("users.csv"), "alice,first\nalice,second\n").unwrap();

        let users = index(dir.path());
        assert_eq!(users.len(), 1);
        assert_eq!(users.lookup("alice").unwrap().password, "first");
        assert_eq!(users.table().get("alice").unwrap(), users.lookup("alice"));
        assert_eq!(
            users.check_or_register("alice", "first").unwrap(),
            CredentialCheck::Matched
        );
    }

    #[test]
    fn register_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let users = index(dir.path());
        assert!(users.is_empty());

        users.register(UserRecord::new("alice", "pw1")).unwrap();
        assert_eq!(users.lookup("alice").unwrap().password, "pw1");

        // A fresh index sees what the first one persisted.
        let reloaded = index(dir.path());
        assert_eq!(reloaded.lookup("alice"), Some(UserRecord::new("alice", "pw1")));
    }

    #[test]
    fn check_or_register_flow() {
        let dir = tempfile::tempdir().unwrap();
        let users = index(dir.path());

        assert_eq!(
            users.check_or_register("alice", "pw1").unwrap(),
            CredentialCheck::Registered
        );
        assert_eq!(
            users.check_or_register("alice", "pw1").unwrap(),
            CredentialCheck::Matched
        );
        assert_eq!(
            users.check_or_register("alice", "PW1").unwrap(),
            CredentialCheck::Mismatched
        );

        let contents = fs::read_to_string(users.path()).unwrap();
        assert_eq!(contents, "alice,pw1\n");
    }

    #[test]
    fn failed_write_keeps_memory_entry() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        let users = UserIndex::load(KeyedStore::new(&missing, Arc::new(Guard::new()))).unwrap();

        assert!(users.register(UserRecord::new("alice", "pw1")).is_err());
        assert!(users.lookup("alice").is_some());
    }
}
