//! Mapping between domain records and table rows.
//! Rows are plain string fields; the first field is always the owning username.

use rsvp_types::models::{AttendanceRecord, Guest, GuestRow, MessageRecord, UserRecord};

pub trait Record: Sized {
    /// File name of the table, relative to the data directory.
    const TABLE: &'static str;
    /// Number of fields in every row of the table.
    const ARITY: usize;

    fn key(&self) -> &str;
    fn to_fields(&self) -> Vec<String>;
    /// `None` when a row of the right arity still does not describe a record.
    fn from_fields(fields: Vec<String>) -> Option<Self>;
}

impl Record for UserRecord {
    const TABLE: &'static str = "users.csv";
    const ARITY: usize = 2;

    fn key(&self) -> &str {
        &self.username
    }

    fn to_fields(&self) -> Vec<String> {
        vec![self.username.clone(), self.password.clone()]
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [username, password] = <[String; 2]>::try_from(fields).ok()?;
        Some(Self { username, password })
    }
}

impl Record for AttendanceRecord {
    const TABLE: &'static str = "attendance.csv";
    const ARITY: usize = 2;

    fn key(&self) -> &str {
        &self.username
    }

    fn to_fields(&self) -> Vec<String> {
        vec![self.username.clone(), self.status.as_str().to_string()]
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [username, status] = <[String; 2]>::try_from(fields).ok()?;
        Some(Self {
            username,
            status: status.parse().ok()?,
        })
    }
}

impl Record for MessageRecord {
    const TABLE: &'static str = "messages.csv";
    const ARITY: usize = 2;

    fn key(&self) -> &str {
        &self.username
    }

    fn to_fields(&self) -> Vec<String> {
        vec![self.username.clone(), self.message.clone()]
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [username, message] = <[String; 2]>::try_from(fields).ok()?;
        Some(Self { username, message })
    }
}

impl Record for GuestRow {
    const TABLE: &'static str = "responses.csv";
    const ARITY: usize = 7;

    fn key(&self) -> &str {
        &self.owner
    }

    fn to_fields(&self) -> Vec<String> {
        let g = &self.guest;
        vec![
            self.owner.clone(),
            g.fullname.clone(),
            g.email.clone(),
            g.phone.clone(),
            g.is_adult.clone(),
            g.allergies.clone(),
            g.song.clone(),
        ]
    }

    fn from_fields(fields: Vec<String>) -> Option<Self> {
        let [owner, fullname, email, phone, is_adult, allergies, song] =
            <[String; 7]>::try_from(fields).ok()?;
        Some(Self {
            owner,
            guest: Guest {
                fullname,
                email,
                phone,
                is_adult,
                allergies,
                song,
            },
        })
    }
}
