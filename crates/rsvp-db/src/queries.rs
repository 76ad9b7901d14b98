use rsvp_types::flow::{LoginOutcome, Step};
use rsvp_types::models::{
    Attendance, AttendanceRecord, Guest, GuestRow, MessageRecord, UserRecord,
};

use crate::error::Result;
use crate::users::CredentialCheck;
use crate::Database;

impl Database {
    // -- Users --

    /// Read a user from `users.csv`, bypassing the in-memory index.
    pub fn get_user(&self, username: &str) -> Result<Option<UserRecord>> {
        self.users.table().get(username)
    }

    /// Write a user through the index so memory and file agree.
    pub fn upsert_user(&self, username: &str, password: &str) -> Result<()> {
        self.users.register(UserRecord::new(username, password))
    }

    /// Run one login attempt.
    ///
    /// Unknown usernames are registered on the spot. A known user with the
    /// right password is sent to the closing page if they already declined,
    /// and to the summary otherwise. An empty username is rejected without
    /// touching any table.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        if username.is_empty() {
            return Ok(LoginOutcome::Rejected);
        }

        match self.users.check_or_register(username, password)? {
            CredentialCheck::Registered => Ok(LoginOutcome::Registered),
            CredentialCheck::Mismatched => Ok(LoginOutcome::Rejected),
            CredentialCheck::Matched => {
                let next = match self.get_attendance(username)? {
                    Some(record) if record.status == Attendance::No => Step::Closing,
                    _ => Step::Summary,
                };
                Ok(LoginOutcome::Authenticated { next })
            }
        }
    }

    // -- Attendance --

    pub fn get_attendance(&self, username: &str) -> Result<Option<AttendanceRecord>> {
        self.attendance.get(username)
    }

    pub fn upsert_attendance(&self, username: &str, status: Attendance) -> Result<()> {
        self.attendance.upsert(&AttendanceRecord {
            username: username.to_string(),
            status,
        })
    }

    // -- Messages --

    pub fn get_message(&self, username: &str) -> Result<Option<MessageRecord>> {
        self.messages.get(username)
    }

    pub fn upsert_message(&self, username: &str, message: &str) -> Result<()> {
        self.messages.upsert(&MessageRecord {
            username: username.to_string(),
            message: message.to_string(),
        })
    }

    // -- Guests --

    /// Append guest rows as given. Owners are not checked against the users
    /// table.
    pub fn append_guests(&self, rows: &[GuestRow]) -> Result<usize> {
        self.responses.append_many(rows)
    }

    /// Append `guests` on behalf of `owner`.
    pub fn append_guests_for(&self, owner: &str, guests: Vec<Guest>) -> Result<usize> {
        let rows: Vec<GuestRow> = guests
            .into_iter()
            .map(|guest| GuestRow {
                owner: owner.to_string(),
                guest,
            })
            .collect();
        self.append_guests(&rows)
    }

    /// Every guest submitted by `owner`, oldest first, owner field stripped.
    pub fn guests_for(&self, owner: &str) -> Result<Vec<Guest>> {
        Ok(self
            .responses
            .filter_by_key(owner)?
            .into_iter()
            .map(|row| row.guest)
            .collect())
    }
}
