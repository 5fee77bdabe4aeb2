//! Dual-token authorization.
//!
//! Every protected request carries an access token and a refresh token. Both
//! are verified, cross-checked for the same identity, and then matched
//! against one of the authorization modes. An expired access token is renewed
//! from a still-valid refresh token and the whole check runs once more with
//! the new token. The renewal is returned to the caller as part of the
//! [`Verdict`] rather than written to the response directly.

use cookie::Cookie;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::models::auth::{
    AuthRequest, AuthResult, AuthType, Cause, TokenCookies, TokenFault, ADMIN_ROLE,
};
use crate::models::jwt::UserClaims;
use crate::services::cookie_service::CookieService;
use crate::services::jwt_service::JwtService;

pub const REFRESHED_TOKEN_MESSAGE: &str =
    "Access token has been refreshed. Remember to copy the new one in the headers of subsequent calls";

/// A freshly minted token can never be expired, so one renewal is enough.
const MAX_RENEWALS: usize = 1;

/// Transport capability handed to [`TokenAuthorizer::authorize_into`].
pub trait ResponseSink {
    fn set_cookie(&mut self, cookie: Cookie<'static>);
    fn note_refresh(&mut self, message: &str);
}

#[derive(Error, Debug)]
pub enum AuthorizeError {
    #[error("failed to sign renewed access token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Renewal {
    pub access_token: String,
}

#[derive(Debug, Clone)]
pub struct Verdict {
    pub result: AuthResult,
    /// Set whenever an access token was minted during the call, even if the
    /// mode check then failed.
    pub renewal: Option<Renewal>,
    /// Claims of the access token, present only when authorized.
    pub identity: Option<UserClaims>,
}

impl Verdict {
    fn denied(cause: Cause) -> Self {
        Self {
            result: AuthResult::denied(cause),
            renewal: None,
            identity: None,
        }
    }

    pub fn is_authorized(&self) -> bool {
        self.result.authorized
    }

    /// Replay the renewal, if any, onto the outgoing response.
    pub fn apply<S: ResponseSink + ?Sized>(&self, sink: &mut S) {
        if let Some(renewal) = &self.renewal {
            sink.set_cookie(CookieService::renewed_access_cookie(&renewal.access_token));
            sink.note_refresh(REFRESHED_TOKEN_MESSAGE);
        }
    }
}

enum Pass {
    Decided(Verdict),
    Renew,
}

#[derive(Clone)]
pub struct TokenAuthorizer {
    jwt: JwtService,
}

impl TokenAuthorizer {
    pub fn new(jwt: JwtService) -> Self {
        Self { jwt }
    }

    /// Same as [`authorize`](Self::authorize), but any renewal has already
    /// been written to `sink` when this returns.
    pub fn authorize_into<S: ResponseSink + ?Sized>(
        &self,
        cookies: &TokenCookies,
        sink: &mut S,
        request: &AuthRequest,
    ) -> Result<Verdict, AuthorizeError> {
        let verdict = self.authorize(cookies, request)?;
        verdict.apply(sink);
        Ok(verdict)
    }

    /// Evaluate `request` against the token cookies.
    ///
    /// Only a signing failure during renewal is an error; every other outcome
    /// is reported through [`Verdict::result`].
    #[instrument(skip_all, fields(auth_type = %request.auth_type))]
    pub fn authorize(&self, cookies: &TokenCookies, request: &AuthRequest) -> Result<Verdict, AuthorizeError> {
        let (Some(access), Some(refresh)) = (cookies.access_token.as_deref(), cookies.refresh_token.as_deref())
        else {
            debug!("token cookie missing");
            return Ok(Verdict::denied(Cause::Unauthorized));
        };

        let mut access = access.to_string();
        let mut renewal = None;

        for attempt in 0..=MAX_RENEWALS {
            match self.check(&access, refresh, request) {
                Pass::Decided(verdict) => return Ok(Verdict { renewal, ..verdict }),
                Pass::Renew if attempt == MAX_RENEWALS => break,
                Pass::Renew => {}
            }

            let claims = match self.jwt.decode(refresh) {
                Ok(claims) => claims.user,
                Err(TokenFault::Expired) => {
                    debug!("refresh token expired");
                    return Ok(Verdict::denied(Cause::LoginAgain));
                }
                Err(fault) => return Ok(Verdict::denied(Cause::Token(fault))),
            };

            let token = self
                .jwt
                .create_access_token(&claims)
                .map_err(AuthorizeError::Signing)?;
            info!(username = %claims.username, "access token renewed");

            access = token.clone();
            renewal = Some(Renewal { access_token: token });
        }

        warn!("renewed access token was rejected as expired");
        Ok(Verdict {
            renewal,
            ..Verdict::denied(Cause::LoginAgain)
        })
    }

    fn check(&self, access: &str, refresh: &str, request: &AuthRequest) -> Pass {
        // Either token expiring sends us down the renewal path.
        let access_claims = match self.jwt.decode(access) {
            Ok(claims) => claims.user,
            Err(TokenFault::Expired) => return Pass::Renew,
            Err(fault) => return Pass::Decided(Verdict::denied(Cause::Token(fault))),
        };
        let refresh_claims = match self.jwt.decode(refresh) {
            Ok(claims) => claims.user,
            Err(TokenFault::Expired) => return Pass::Renew,
            Err(fault) => return Pass::Decided(Verdict::denied(Cause::Token(fault))),
        };

        if !access_claims.is_complete() || !refresh_claims.is_complete() {
            return Pass::Decided(Verdict::denied(Cause::MissingInformation));
        }
        if !access_claims.same_identity(&refresh_claims) {
            warn!(
                access = %access_claims.username,
                refresh = %refresh_claims.username,
                "token identities differ"
            );
            return Pass::Decided(Verdict::denied(Cause::MismatchedUsers));
        }

        let result = evaluate(request, &access_claims, &refresh_claims);
        debug!(cause = %result.cause, "mode evaluated");
        let identity = result.authorized.then_some(access_claims);

        Pass::Decided(Verdict {
            result,
            renewal: None,
            identity,
        })
    }
}

// Both claim sets are identical at this point; the either-token rule is kept
// for compatibility with existing clients.
fn evaluate(request: &AuthRequest, access: &UserClaims, refresh: &UserClaims) -> AuthResult {
    let allowed = match &request.auth_type {
        AuthType::Simple => true,
        AuthType::User => request
            .username
            .as_deref()
            .is_some_and(|name| access.username == name || refresh.username == name),
        AuthType::Admin => access.role == ADMIN_ROLE || refresh.role == ADMIN_ROLE,
        AuthType::Group => request
            .emails
            .iter()
            .any(|email| *email == access.email || *email == refresh.email),
        AuthType::Unknown(_) => return AuthResult::denied(Cause::InvalidAuthType),
    };

    if allowed {
        AuthResult::granted()
    } else {
        AuthResult::denied(Cause::Unauthorized)
    }
}
