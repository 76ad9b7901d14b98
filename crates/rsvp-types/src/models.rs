use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An account as stored in `users.csv`.
///
/// The password is kept and compared as plaintext. This mirrors the flow this
/// service replaces and is a known weakness, not an oversight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password: String,
}

impl UserRecord {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Answer to the "are you coming?" question. Stored as `si` / `no`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attendance {
    #[serde(rename = "si")]
    Yes,
    #[serde(rename = "no")]
    No,
}

impl Attendance {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "si",
            Self::No => "no",
        }
    }
}

impl fmt::Display for Attendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown attendance value: {0:?}")]
pub struct UnknownAttendance(pub String);

impl FromStr for Attendance {
    type Err = UnknownAttendance;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "si" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            other => Err(UnknownAttendance(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub username: String,
    pub status: Attendance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub username: String,
    pub message: String,
}

/// One guest as entered on the form. The owner is implied by the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub is_adult: String,
    pub allergies: String,
    pub song: String,
}

impl Guest {
    /// True when every field is blank after trimming.
    pub fn is_blank(&self) -> bool {
        [
            &self.fullname,
            &self.email,
            &self.phone,
            &self.is_adult,
            &self.allergies,
            &self.song,
        ]
        .iter()
        .all(|f| f.trim().is_empty())
    }
}

/// A guest row in `responses.csv`: the owner's username followed by the guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestRow {
    pub owner: String,
    pub guest: Guest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attendance_wire_values() {
        assert_eq!("si".parse::<Attendance>().unwrap(), Attendance::Yes);
        assert_eq!("no".parse::<Attendance>().unwrap(), Attendance::No);
        assert_eq!(Attendance::Yes.to_string(), "si");
        assert!("yes".parse::<Attendance>().is_err());
        assert!("".parse::<Attendance>().is_err());
    }

    #[test]
    fn blank_guest_detection() {
        assert!(Guest::default().is_blank());

        let guest = Guest {
            fullname: "  ".into(),
            song: "SongA".into(),
            ..Guest::default()
        };
        assert!(!guest.is_blank());
    }
}
