//! Session cookie builder.
//!
//! Attributes follow the legacy portal: HttpOnly + SameSite=Lax always;
//! Secure and Max-Age depend on the deployment profile.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the session token.
pub const AULA_SESSION: &str = "aula_session";

/// Profile-resolved cookie attributes, fixed at startup.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub secure: bool,
    pub max_age_secs: i64,
}

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use aula_identity::cookie::{set_session_cookie, CookiePolicy, AULA_SESSION};
///
/// let policy = CookiePolicy { secure: true, max_age_secs: 604_800 };
/// let jar = set_session_cookie(CookieJar::new(), "token_value".to_string(), &policy);
/// let cookie = jar.get(AULA_SESSION).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604_800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, policy: &CookiePolicy) -> CookieJar {
    let cookie = Cookie::build((AULA_SESSION, value))
        .path("/")
        .max_age(Duration::seconds(policy.max_age_secs))
        .http_only(true)
        .secure(policy.secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use aula_identity::cookie::{clear_session_cookie, set_session_cookie, CookiePolicy, AULA_SESSION};
///
/// let policy = CookiePolicy { secure: false, max_age_secs: 14_400 };
/// let jar = set_session_cookie(CookieJar::new(), "token_value".to_string(), &policy);
/// let jar = clear_session_cookie(jar, &policy);
/// let cookie = jar.get(AULA_SESSION).unwrap();
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, policy: &CookiePolicy) -> CookieJar {
    let cookie = Cookie::build((AULA_SESSION, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(policy.secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
