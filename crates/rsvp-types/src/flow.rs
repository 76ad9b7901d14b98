use serde::{Deserialize, Serialize};

/// Pages of the RSVP flow, in the order a first-time visitor sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Login,
    Confirmation,
    /// Shown after a "no" answer; lets the visitor leave a message.
    Closing,
    Form,
    Summary,
}

impl Step {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Confirmation => "/confirmation",
            Self::Closing => "/text",
            Self::Form => "/form",
            Self::Summary => "/success",
        }
    }
}

/// What a submitted username/password pair turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Unknown username: an account was created with the submitted password.
    Registered,
    /// Known username with a matching password.
    Authenticated { next: Step },
    /// Known username, wrong password. Nothing changed.
    Rejected,
}

impl LoginOutcome {
    pub fn next_step(self) -> Step {
        match self {
            Self::Registered => Step::Confirmation,
            Self::Authenticated { next } => next,
            Self::Rejected => Step::Login,
        }
    }

    /// Whether the visitor should leave with a session bound to the username.
    pub fn grants_session(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}
