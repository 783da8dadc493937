//! Link and image destination checks.

use percent_encoding::percent_decode_str;

use crate::state::unescape;

/// Resolve a link or image destination.
///
/// Entities are decoded first. With `restrict_schemes`, the destination must
/// also percent-decode to valid UTF-8 and, ignoring everything except word
/// characters and colons, start with `http:` or `https:` (case-insensitive).
///
/// Returns the entity-decoded destination, or `None` when it is rejected.
///
/// # Examples
///
/// ```
/// use marknode_renderer::sanitize_destination;
///
/// assert_eq!(
///     sanitize_destination("https://example.com/?a=1&amp;b=2", true).as_deref(),
///     Some("https://example.com/?a=1&b=2")
/// );
/// assert_eq!(sanitize_destination("javascript:alert(1)", true), None);
/// assert!(sanitize_destination("javascript:alert(1)", false).is_some());
/// ```
#[must_use]
pub fn sanitize_destination(href: &str, restrict_schemes: bool) -> Option<String> {
    let unescaped = unescape(href).into_owned();
    if !restrict_schemes {
        return Some(unescaped);
    }

    let decoded = match percent_decode_str(&unescaped).decode_utf8() {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!(href = %unescaped, error = %e, "Rejecting undecodable destination");
            return None;
        }
    };
    let scheme: String = decoded
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == ':')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if scheme.starts_with("http:") || scheme.starts_with("https:") {
        Some(unescaped)
    } else {
        tracing::debug!(href = %unescaped, "Rejecting destination with unsafe scheme");
        None
    }
}
