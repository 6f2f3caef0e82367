//! Bypass cookie protocol.
//!
//! After a real verification the challenge step issues one client-held
//! cookie; its presence alone skips the question on later logins. No
//! server-side record is kept, expiry is enforced by the client. That an
//! unbound cookie is accepted for any holder is a documented tradeoff of this
//! credential type, not an oversight.

use http::header::{HeaderValue, SET_COOKIE};
use tracing::debug;

use crate::error::{Error, Result};
use crate::flow::FlowContext;

/// Name of the bypass cookie.
pub const BYPASS_COOKIE_NAME: &str = "SECRET_QUESTION_ANSWERED";

/// Configuration option holding the cookie lifetime in seconds.
pub const CONFIG_COOKIE_MAX_AGE: &str = "cookie.max.age";

/// Default cookie lifetime: 30 days.
pub const DEFAULT_COOKIE_MAX_AGE_SECONDS: u64 = 60 * 60 * 24 * 30;

/// Whether the incoming request carries the bypass cookie.
#[must_use]
pub fn has_bypass_cookie(context: &FlowContext) -> bool {
    let present = context.request_cookie(BYPASS_COOKIE_NAME).is_some();
    if present {
        debug!("bypassing secret question because cookie is set");
    }
    present
}

/// Cookie lifetime for this execution.
///
/// # Errors
/// Returns [`Error::InvalidCookieMaxAge`] when the option is present but not
/// numeric; a missing option falls back to the default.
pub fn cookie_max_age(context: &FlowContext) -> Result<u64> {
    match context.config_value(CONFIG_COOKIE_MAX_AGE) {
        None => Ok(DEFAULT_COOKIE_MAX_AGE_SECONDS),
        Some(raw) => raw.parse().map_err(|_| Error::InvalidCookieMaxAge {
            value: raw.to_string(),
        }),
    }
}

/// Issues the bypass cookie on the response.
///
/// Scoped to the realm base path, `HttpOnly`, `SameSite=None`; the `Secure`
/// attribute is deliberately left off.
///
/// # Errors
/// Returns [`Error::InvalidCookieMaxAge`] on a non-numeric configured
/// lifetime and [`Error::InvalidCookieHeader`] if the realm path cannot be
/// encoded into a header value.
pub fn set_bypass_cookie(context: &mut FlowContext) -> Result<()> {
    let max_age = cookie_max_age(context)?;
    let cookie = format!(
        "{BYPASS_COOKIE_NAME}=true; Path={}; Max-Age={max_age}; HttpOnly; SameSite=None",
        context.realm.base_path()
    );
    let value = HeaderValue::from_str(&cookie)?;
    context.add_response_header(SET_COOKIE, value);
    Ok(())
}
