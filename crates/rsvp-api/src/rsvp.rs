use axum::{
    Extension, Form,
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::Form as MultiForm;
use tracing::{error, info, warn};

use rsvp_types::api::{ConfirmForm, GuestForm, MessageForm};
use rsvp_types::flow::Step;
use rsvp_types::models::Attendance;

use crate::auth::AppState;
use crate::blocking;
use crate::middleware::CurrentUser;
use crate::views::{
    self, CLOSING_NOTICE, ClosingPage, ConfirmationPage, FormPage, SUMMARY_NOTICE, SummaryPage,
};

// Writes are best effort: a failed store call is logged and the flow carries
// on as if it had succeeded. Reads that fail render as empty.

pub async fn confirmation_page(
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, StatusCode> {
    views::render(&ConfirmationPage {
        username: user.username,
    })
}

/// POST /confirmation: `si` leads to the guest form, anything else records
/// a decline and leads to the closing page.
pub async fn confirm(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<ConfirmForm>,
) -> Result<Redirect, StatusCode> {
    let status = if form.confirm == Attendance::Yes.as_str() {
        Attendance::Yes
    } else {
        Attendance::No
    };

    let username = user.username.clone();
    if let Err(e) = blocking(&state, move |db| db.upsert_attendance(&username, status)).await? {
        error!("Saving attendance for '{}' failed: {}", user.username, e);
    } else {
        info!("'{}' answered {}", user.username, status);
    }

    let next = match status {
        Attendance::Yes => Step::Form,
        Attendance::No => Step::Closing,
    };
    Ok(Redirect::to(next.path()))
}

pub async fn closing_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, StatusCode> {
    let username = user.username.clone();
    let message = match blocking(&state, move |db| db.get_message(&username)).await? {
        Ok(record) => record.map(|r| r.message).unwrap_or_default(),
        Err(e) => {
            warn!("Reading message for '{}' failed: {}", user.username, e);
            String::new()
        }
    };

    views::render(&ClosingPage {
        username: user.username,
        notice: CLOSING_NOTICE,
        message,
    })
}

/// POST /text: store (or replace) the visitor's message.
pub async fn save_message(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<MessageForm>,
) -> Result<Redirect, StatusCode> {
    let username = user.username.clone();
    if let Err(e) = blocking(&state, move |db| db.upsert_message(&username, &form.message)).await? {
        error!("Saving message for '{}' failed: {}", user.username, e);
    }
    Ok(Redirect::to(Step::Closing.path()))
}

pub async fn form_page(
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, StatusCode> {
    views::render(&FormPage {
        username: user.username,
    })
}

/// POST /form: append every non-blank guest on the form. Submitting again
/// adds more rows; nothing already stored is replaced.
pub async fn add_guests(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    MultiForm(form): MultiForm<GuestForm>,
) -> Result<Redirect, StatusCode> {
    let guests = form.into_guests();
    let username = user.username.clone();

    match blocking(&state, move |db| db.append_guests_for(&username, guests)).await? {
        Ok(count) => info!("'{}' added {} guest(s)", user.username, count),
        Err(e) => error!("Saving guests for '{}' failed: {}", user.username, e),
    }

    Ok(Redirect::to(Step::Summary.path()))
}

/// GET /success: attendance, guests and message of the current visitor.
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, StatusCode> {
    let username = user.username.clone();
    let (attendance, guests, message) = blocking(&state, move |db| {
        let attendance = db.get_attendance(&username)?;
        let guests = db.guests_for(&username)?;
        let message = db.get_message(&username)?;
        Ok((attendance, guests, message))
    })
    .await?
    .unwrap_or_else(|e| {
        warn!("Reading summary for '{}' failed: {}", user.username, e);
        (None, Vec::new(), None)
    });

    views::render(&SummaryPage {
        username: user.username,
        notice: SUMMARY_NOTICE,
        attendance: attendance
            .map(|r| r.status.as_str().to_string())
            .unwrap_or_default(),
        guests,
        message: message.map(|r| r.message).unwrap_or_default(),
    })
}
