use serde::{Deserialize, Serialize};

use crate::models::Guest;

// -- Session --

/// Claims carried by the signed session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username the session is bound to.
    pub sub: String,
    pub exp: usize,
}

// -- Forms --

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmForm {
    /// `si` means attending; any other value is treated as a decline.
    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

/// The multi-guest form. Each field is submitted once per guest, so every
/// column arrives as a list; guest `i` is built from index `i` of each list.
#[derive(Debug, Default, Deserialize)]
pub struct GuestForm {
    #[serde(default)]
    pub fullname: Vec<String>,
    #[serde(default)]
    pub email: Vec<String>,
    #[serde(default)]
    pub phone: Vec<String>,
    #[serde(default)]
    pub is_adult: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub song: Vec<String>,
}

impl GuestForm {
    /// Zip the columns into guests, dropping entries that are entirely blank.
    /// Columns shorter than the longest one are padded with empty strings.
    pub fn into_guests(self) -> Vec<Guest> {
        let len = [
            self.fullname.len(),
            self.email.len(),
            self.phone.len(),
            self.is_adult.len(),
            self.allergies.len(),
            self.song.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0);

        let mut columns = [
            self.fullname.into_iter(),
            self.email.into_iter(),
            self.phone.into_iter(),
            self.is_adult.into_iter(),
            self.allergies.into_iter(),
            self.song.into_iter(),
        ];

        (0..len)
            .map(|_| {
                let mut next = |i: usize| columns[i].next().unwrap_or_default();
                Guest {
                    fullname: next(0),
                    email: next(1),
                    phone: next(2),
                    is_adult: next(3),
                    allergies: next(4),
                    song: next(5),
                }
            })
            .filter(|g| !g.is_blank())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_form_zips_columns() {
        let form = GuestForm {
            fullname: vec!["Bob".into(), "Carol".into(), "".into()],
            email: vec!["b@x.com".into(), "c@x.com".into(), "".into()],
            phone: vec!["555".into()],
            is_adult: vec!["yes".into(), "no".into(), "".into()],
            allergies: vec![],
            song: vec!["SongA".into(), "SongB".into(), "".into()],
        };

        let guests = form.into_guests();
        assert_eq!(guests.len(), 2);
        assert_eq!(guests[0].fullname, "Bob");
        assert_eq!(guests[0].phone, "555");
        assert_eq!(guests[1].fullname, "Carol");
        assert_eq!(guests[1].phone, "");
        assert_eq!(guests[1].song, "SongB");
    }

    #[test]
    fn empty_guest_form() {
        assert!(GuestForm::default().into_guests().is_empty());
    }
}
