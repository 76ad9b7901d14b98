//! Flat-file record store for the RSVP flow.
//!
//! Four CSV tables live in one data directory: `users.csv`,
//! `attendance.csv` and `messages.csv` are keyed by username and upserted;
//! `responses.csv` is append-only. Every operation on every table runs under
//! one process-wide [`Guard`], so read-modify-write cycles never interleave.

pub mod append;
pub mod codec;
pub mod error;
pub mod guard;
pub mod keyed;
pub mod models;
pub mod queries;
pub mod users;

mod table;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rsvp_types::models::{AttendanceRecord, GuestRow, MessageRecord};
use tracing::info;

pub use error::{Result, StoreError};
pub use guard::Guard;

use crate::append::AppendStore;
use crate::keyed::KeyedStore;
use crate::users::UserIndex;

/// All tables of one data directory, sharing a single guard.
///
/// Construct once at startup and share behind an `Arc`; tests build one per
/// temporary directory.
#[derive(Debug)]
pub struct Database {
    users: UserIndex,
    attendance: KeyedStore<AttendanceRecord>,
    messages: KeyedStore<MessageRecord>,
    responses: AppendStore<GuestRow>,
}

impl Database {
    /// Open (creating if needed) the data directory and load the user index.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            table: "data directory",
            path: dir.to_path_buf(),
            source,
        })?;

        let guard = Arc::new(Guard::new());
        let users = UserIndex::load(KeyedStore::new(dir, guard.clone()))?;

        info!("Data directory opened at {}", dir.display());
        Ok(Self {
            users,
            attendance: KeyedStore::new(dir, guard.clone()),
            messages: KeyedStore::new(dir, guard.clone()),
            responses: AppendStore::new(dir, guard),
        })
    }

    pub fn users(&self) -> &UserIndex {
        &self.users
    }
}
