use std::sync::Arc;

use axum::{Form, extract::State, http::StatusCode, response::{Html, Redirect}};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{error, info};

use rsvp_db::Database;
use rsvp_types::api::{LoginForm, SessionClaims};
use rsvp_types::flow::{LoginOutcome, Step};

use crate::blocking;
use crate::views::{self, LoginPage};

/// Name of the cookie carrying the signed session token.
pub const SESSION_COOKIE: &str = "rsvp_session";

const SESSION_DAYS: i64 = 30;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
    /// Mark the session cookie `Secure` (only sent over HTTPS).
    pub secure_cookie: bool,
}

pub async fn login_page() -> Result<Html<String>, StatusCode> {
    views::render(&LoginPage)
}

/// POST /: log in, or register an unseen username.
///
/// Store failures are logged and the visitor is sent back to the login page,
/// as if the attempt had not happened.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), StatusCode> {
    let username = form.username;
    let name = username.clone();
    let outcome = blocking(&state, move |db| db.login(&name, &form.password)).await?;

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Login for '{}' failed: {}", username, e);
            return Ok((jar, Redirect::to(Step::Login.path())));
        }
    };

    match outcome {
        LoginOutcome::Registered => info!("Registered '{}'", username),
        LoginOutcome::Rejected => info!("Rejected login for '{}'", username),
        LoginOutcome::Authenticated { .. } => {}
    }

    let jar = if outcome.grants_session() {
        let token = create_token(&state.session_secret, &username).map_err(|e| {
            error!("Failed to sign session for '{}': {}", username, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        jar.add(session_cookie(token, state.secure_cookie))
    } else {
        jar
    };

    Ok((jar, Redirect::to(outcome.next_step().path())))
}

/// GET /logout: drop the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to(Step::Login.path()))
}

pub fn create_token(secret: &str, username: &str) -> anyhow::Result<String> {
    let claims = SessionClaims {
        sub: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}
