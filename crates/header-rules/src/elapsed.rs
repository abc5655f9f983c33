//! Elapsed-time reporting derived from the client's `X-TimeStamp` header.

use chrono::{DateTime, Utc};
use tracing::error;

/// Request header carrying the client's send time in epoch seconds.
pub const TIMESTAMP_HEADER: &str = "X-TimeStamp";

/// Response header carrying the milliseconds elapsed since `X-TimeStamp`.
pub const ELAPSED_TIME_HEADER: &str = "X-ElapsedTime";

/// Compute the `X-ElapsedTime` value for a response.
///
/// Returns `None` when the request carried no timestamp, when an elapsed
/// time is already present, or when the timestamp cannot be interpreted.
/// Interpretation failures are logged rather than surfaced: the timestamp
/// rule has already reported malformed values to the client.
///
/// # Examples
/// ```
/// use chrono::DateTime;
/// use header_rules::elapsed_time;
///
/// let now = DateTime::from_timestamp(1_700_000_010, 0).expect("valid instant");
/// assert_eq!(elapsed_time(Some("1700000000"), None, now), Some("10000".to_owned()));
/// assert_eq!(elapsed_time(Some("1700000000"), Some("5"), now), None);
/// ```
#[must_use]
pub fn elapsed_time(
    timestamp: Option<&str>,
    existing: Option<&str>,
    now: DateTime<Utc>,
) -> Option<String> {
    if existing.is_some_and(|value| !value.trim().is_empty()) {
        return None;
    }
    let raw = timestamp?;
    let sent_at_millis = match raw.trim().parse::<i64>() {
        Ok(seconds) => seconds.checked_mul(1_000),
        Err(err) => {
            error!(
                timestamp = raw,
                existing = existing.unwrap_or_default(),
                error = %err,
                "failed to derive elapsed time from request timestamp"
            );
            return None;
        }
    };
    let elapsed = sent_at_millis.and_then(|sent| now.timestamp_millis().checked_sub(sent));
    if elapsed.is_none() {
        error!(timestamp = raw, "request timestamp is out of range");
    }
    elapsed.map(|millis| millis.to_string())
}
