use std::path::PathBuf;

use anyhow::{Context, bail};

/// Placeholder session secrets that must not reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-secret-change-me", "secret"];

/// Server settings, read from the environment (after `.env`).
#[derive(Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding `users.csv`, `attendance.csv`, `messages.csv` and
    /// `responses.csv`.
    pub data_dir: PathBuf,
    pub session_secret: String,
    pub secure_cookie: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let session_secret = var("RSVP_SESSION_SECRET").unwrap_or_default();
        if session_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&session_secret.as_str()) {
            bail!("RSVP_SESSION_SECRET is unset or still a placeholder; set it in .env");
        }

        let port = match var("RSVP_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("RSVP_PORT is not a port number: {:?}", port))?,
            None => 8080,
        };

        let secure_cookie = match var("RSVP_SECURE_COOKIE").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => bail!("RSVP_SECURE_COOKIE must be true or false, got {:?}", other),
        };

        Ok(Self {
            host: var("RSVP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            data_dir: var("RSVP_DATA_DIR").unwrap_or_else(|| ".".into()).into(),
            session_secret,
            secure_cookie,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[("RSVP_SESSION_SECRET", "a-real-secret")]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("."));
        assert!(!config.secure_cookie);
    }

    #[test]
    fn placeholder_secret_is_rejected() {
        assert!(config(&[]).is_err());
        assert!(config(&[("RSVP_SESSION_SECRET", "change-me")]).is_err());
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("RSVP_SESSION_SECRET", "a-real-secret"),
            ("RSVP_PORT", "9000"),
            ("RSVP_DATA_DIR", "/var/lib/rsvp"),
            ("RSVP_SECURE_COOKIE", "true"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/rsvp"));
        assert!(config.secure_cookie);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(config(&[("RSVP_SESSION_SECRET", "a-real-secret"), ("RSVP_PORT", "http")]).is_err());
        assert!(
            config(&[("RSVP_SESSION_SECRET", "a-real-secret"), ("RSVP_SECURE_COOKIE", "maybe")])
                .is_err()
        );
    }
}
