use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use cookie::Cookie;
use tower_cookies::Cookies;

use crate::{
    errors::ApiError,
    models::auth::{AuthRequest, Cause, TokenCookies},
    models::jwt::UserClaims,
    services::authorizer::ResponseSink,
    services::cookie_service::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
    AppState,
};

/// Identity of an authorized caller, placed in request extensions.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: UserClaims,
    pub refreshed_token_message: Option<String>,
}

/// Writes renewals straight into the response cookie jar.
pub struct CookieSink<'a> {
    cookies: &'a Cookies,
    refreshed_token_message: Option<String>,
}

impl<'a> CookieSink<'a> {
    pub fn new(cookies: &'a Cookies) -> Self {
        Self {
            cookies,
            refreshed_token_message: None,
        }
    }
}

impl ResponseSink for CookieSink<'_> {
    fn set_cookie(&mut self, cookie: Cookie<'static>) {
        self.cookies.add(cookie);
    }

    fn note_refresh(&mut self, message: &str) {
        self.refreshed_token_message = Some(message.to_string());
    }
}

pub fn token_cookies(cookies: &Cookies) -> TokenCookies {
    TokenCookies::new(
        cookies.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string()),
        cookies.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()),
    )
}

pub fn authorize(state: &AppState, cookies: &Cookies, request: AuthRequest) -> Result<AuthContext, ApiError> {
    authorize_any(state, cookies, &[request])
}

/// Try each request in order and accept the first that passes.
///
/// The cookie jar is re-read on every attempt, so a token renewed by an
/// earlier attempt is the one later attempts see.
pub fn authorize_any(
    state: &AppState,
    cookies: &Cookies,
    requests: &[AuthRequest],
) -> Result<AuthContext, ApiError> {
    let mut sink = CookieSink::new(cookies);
    let mut cause = Cause::Unauthorized;

    for request in requests {
        let verdict = state
            .authorizer
            .authorize_into(&token_cookies(cookies), &mut sink, request)?;

        if let (true, Some(identity)) = (verdict.is_authorized(), verdict.identity) {
            return Ok(AuthContext {
                identity,
                refreshed_token_message: sink.refreshed_token_message,
            });
        }
        cause = verdict.result.cause;
    }

    Err(ApiError::Unauthorized(cause))
}

/// Rejects requests that do not carry a valid, consistent token pair.
pub async fn require_login(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = authorize(&state, &cookies, AuthRequest::simple())?;

    // Add the caller to request extensions
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}
