//! Conditional request header handling
//!
//! Converts between `If-Modified-Since`/`Last-Modified` HTTP dates and the
//! epoch-millis timestamps the freshness check works with.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// First instant (year 10000) an IMF-fixdate cannot represent
const HTTP_DATE_LIMIT_MILLIS: i64 = 253_402_300_800_000;

/// Parse an `If-Modified-Since` header value into epoch millis
///
/// Garbled or pre-epoch dates yield `None`, which callers treat as stale.
pub fn parse_if_modified_since(value: &str) -> Option<i64> {
    let time = httpdate::parse_http_date(value.trim()).ok()?;
    let elapsed = time.duration_since(UNIX_EPOCH).ok()?;
    i64::try_from(elapsed.as_millis()).ok()
}

/// Parse a client timestamp given either as raw epoch millis or an HTTP date
pub fn parse_client_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    value
        .parse::<i64>()
        .ok()
        .or_else(|| parse_if_modified_since(value))
}

/// Format epoch millis as a `Last-Modified` header value
///
/// Pre-epoch times and times past year 9999 have no header form.
pub fn format_http_date(millis: i64) -> Option<String> {
    if millis >= HTTP_DATE_LIMIT_MILLIS {
        return None;
    }
    let millis = u64::try_from(millis).ok()?;
    let time: SystemTime = UNIX_EPOCH + Duration::from_millis(millis);
    Some(httpdate::fmt_http_date(time))
}
