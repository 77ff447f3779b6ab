//! Content length extraction utilities.
//!
//! A ranged GET only announces the bytes still to come. The reported total is
//! that length plus whatever was already on disk when the request was sent.

use reqwest::{header::CONTENT_LENGTH, Response};

/// Number of body bytes the response announces, if any.
///
/// Returns `None` when the header is missing or is not a valid `u64`.
pub fn remaining_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_content_length)
}

/// Parse a raw `Content-Length` header value.
///
/// ```rust
/// use fetchpool::utils::parse_content_length;
///
/// assert_eq!(parse_content_length(" 2048 "), Some(2048));
/// assert_eq!(parse_content_length("lots"), None);
/// ```
pub fn parse_content_length(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

/// Reported size of the resource, or 0 when the server sent no length.
///
/// `existing_size` is the size on disk before the request. It is added even
/// when the server ignored the range and resent everything.
pub fn total_size(existing_size: u64, remaining: Option<u64>) -> u64 {
    match remaining {
        Some(remaining) => existing_size.saturating_add(remaining),
        None => 0,
    }
}
