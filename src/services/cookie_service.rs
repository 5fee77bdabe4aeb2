use cookie::{Cookie, SameSite};
use time::Duration;

use crate::models::jwt::TokenPair;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";
pub const COOKIE_PATH: &str = "/api";
pub const ACCESS_COOKIE_MAX_AGE_MS: i64 = 60 * 60 * 1000;
const SECURE: bool = true;
const HTTP_ONLY: bool = true;
const SAME_SITE: SameSite = SameSite::None;

pub struct CookieService;

impl CookieService {
    /// The cookie written when an expired access token is silently renewed.
    pub fn renewed_access_cookie(access_token: &str) -> Cookie<'static> {
        Self::create_cookie(
            ACCESS_TOKEN_COOKIE,
            access_token,
            Duration::milliseconds(ACCESS_COOKIE_MAX_AGE_MS),
        )
    }

    /// The refresh cookie lives exactly as long as the refresh token.
    pub fn login_cookies(tokens: &TokenPair, refresh_ttl_secs: i64) -> [Cookie<'static>; 2] {
        [
            Self::create_cookie(
                ACCESS_TOKEN_COOKIE,
                &tokens.access_token,
                Duration::milliseconds(ACCESS_COOKIE_MAX_AGE_MS),
            ),
            Self::create_cookie(
                REFRESH_TOKEN_COOKIE,
                &tokens.refresh_token,
                Duration::seconds(refresh_ttl_secs),
            ),
        ]
    }

    pub fn removal_cookies() -> [Cookie<'static>; 2] {
        [
            Self::create_removal_cookie(ACCESS_TOKEN_COOKIE),
            Self::create_removal_cookie(REFRESH_TOKEN_COOKIE),
        ]
    }

    fn create_cookie(name: &'static str, value: &str, max_age: Duration) -> Cookie<'static> {
        // Max-Age is rendered in whole seconds
        Cookie::build((name, value.to_string()))
            .secure(SECURE)
            .http_only(HTTP_ONLY)
            .same_site(SAME_SITE)
            .path(COOKIE_PATH)
            .max_age(max_age)
            .build()
    }

    fn create_removal_cookie(name: &'static str) -> Cookie<'static> {
        Cookie::build((name, ""))
            .secure(SECURE)
            .http_only(HTTP_ONLY)
            .same_site(SAME_SITE)
            .path(COOKIE_PATH)
            .max_age(Duration::ZERO)
            .build()
    }
}
