use askama::Template;
use axum::{http::StatusCode, response::Html};
use tracing::error;

use rsvp_types::models::Guest;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage;

#[derive(Template)]
#[template(path = "confirmation.html")]
pub struct ConfirmationPage {
    pub username: String,
}

/// Shown after a "no": thanks the visitor and takes an optional message.
#[derive(Template)]
#[template(path = "text.html")]
pub struct ClosingPage {
    pub username: String,
    pub notice: &'static str,
    pub message: String,
}

#[derive(Template)]
#[template(path = "form.html")]
pub struct FormPage {
    pub username: String,
}

#[derive(Template)]
#[template(path = "success.html")]
pub struct SummaryPage {
    pub username: String,
    pub notice: &'static str,
    /// `si`, `no`, or empty when the question was never answered.
    pub attendance: String,
    pub guests: Vec<Guest>,
    pub message: String,
}

pub const CLOSING_NOTICE: &str = "Has seleccionado 'No'. ¡Gracias por tu visita!";
pub const SUMMARY_NOTICE: &str = "¡Formulario enviado con éxito!";

pub fn render<T: Template>(page: &T) -> Result<Html<String>, StatusCode> {
    page.render().map(Html).map_err(|e| {
        error!("Template render failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
