//! Session cookie handling and request gates.

use salvo::http::cookie::{Cookie, time::Duration};

pub(crate) mod middleware;

/// Name of the cookie carrying the opaque session token.
pub(crate) const SESSION_COOKIE: &str = "session_id";

/// Sessions expire server-side after 24 hours; the cookie matches.
const SESSION_COOKIE_MAX_AGE_HOURS: i64 = 24;

pub(crate) fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);

    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(Duration::hours(SESSION_COOKIE_MAX_AGE_HOURS));

    cookie
}

/// A replacement cookie that makes the browser drop the session cookie.
pub(crate) fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");

    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_max_age(Duration::ZERO);

    cookie
}
