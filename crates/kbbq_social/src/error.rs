//! Discord REST failures mapped onto [`PlatformErrorKind`].
//!
//! Discord reports a JSON error code alongside the HTTP status. The codes
//! the engines branch on are listed below; everything else is
//! [`PlatformErrorKind::Http`].

use kbbq_error::{PlatformError, PlatformErrorKind};
use serenity::http::HttpError;

/// `Unknown Channel`
pub const UNKNOWN_CHANNEL: isize = 10003;
/// `Unknown Member`
pub const UNKNOWN_MEMBER: isize = 10007;
/// `Unknown Message`
pub const UNKNOWN_MESSAGE: isize = 10008;
/// `Unknown Role`
pub const UNKNOWN_ROLE: isize = 10011;
/// `Unknown User`
pub const UNKNOWN_USER: isize = 10013;
/// `Missing Access`
pub const MISSING_ACCESS: isize = 50001;
/// `Missing Permissions`
pub const MISSING_PERMISSIONS: isize = 50013;
/// `Invalid Form Body`
pub const INVALID_FORM_BODY: isize = 50035;
/// `Invalid Request Body`
pub const INVALID_REQUEST_BODY: isize = 50109;

/// Classify a Discord JSON error code.
///
/// # Examples
///
/// ```
/// use kbbq_error::PlatformErrorKind;
/// use kbbq_social::classify_code;
///
/// assert_eq!(classify_code(10007, "Unknown Member"), PlatformErrorKind::UnknownMember);
/// assert!(matches!(classify_code(0, "500 Internal"), PlatformErrorKind::Http(_)));
/// ```
pub fn classify_code(code: isize, message: &str) -> PlatformErrorKind {
    match code {
        UNKNOWN_MEMBER | UNKNOWN_USER => PlatformErrorKind::UnknownMember,
        UNKNOWN_ROLE => PlatformErrorKind::UnknownRole,
        UNKNOWN_CHANNEL | UNKNOWN_MESSAGE => PlatformErrorKind::UnknownChannel,
        MISSING_ACCESS | MISSING_PERMISSIONS => {
            PlatformErrorKind::MissingPermissions(message.to_string())
        }
        INVALID_FORM_BODY | INVALID_REQUEST_BODY => {
            PlatformErrorKind::InvalidPayload(message.to_string())
        }
        _ => PlatformErrorKind::Http(format!("{code}: {message}")),
    }
}

/// Convert a serenity error into a classified [`PlatformError`].
#[track_caller]
pub fn platform_error(err: serenity::Error) -> PlatformError {
    let kind = match &err {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            classify_code(response.error.code, &response.error.message)
        }
        other => PlatformErrorKind::Http(other.to_string()),
    };
    PlatformError::new(kind)
}
