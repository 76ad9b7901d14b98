use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};

use rsvp_types::api::SessionClaims;
use rsvp_types::flow::Step;

use crate::auth::{AppState, SESSION_COOKIE};

/// The visitor a request belongs to, resolved from the session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
}

/// Resolve the session cookie into a [`CurrentUser`] request extension.
/// Anonymous visitors are redirected to the login page.
///
/// The username is taken from the token as-is; it is not checked against
/// the users table.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    match current_user(&jar, &state.session_secret) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => Redirect::to(Step::Login.path()).into_response(),
    }
}

pub fn current_user(jar: &CookieJar, secret: &str) -> Option<CurrentUser> {
    let token = jar.get(SESSION_COOKIE)?.value();

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    Some(CurrentUser {
        username: token_data.claims.sub,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::create_token;
    use axum_extra::extract::cookie::Cookie;

    #[test]
    fn resolves_signed_cookie() {
        let token = create_token("secret", "alice").unwrap();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, token));

        let user = current_user(&jar, "secret").unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn rejects_wrong_secret_and_garbage() {
        let token = create_token("secret", "alice").unwrap();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, token));
        assert!(current_user(&jar, "other").is_none());

        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "alice"));
        assert!(current_user(&jar, "secret").is_none());

        assert!(current_user(&CookieJar::new(), "secret").is_none());
    }
}
