//! Scrubbing of credentials from strings before they reach the logs.
//!
//! Request URLs carry `sessionId` and the login form carries `password`; both
//! are replaced by `[REDACTED]` while the rest of the string stays readable.

use std::borrow::Cow;

const REDACTED: &str = "[REDACTED]";

/// Parameter names whose values never get logged. Matched case-insensitively.
const SENSITIVE_KEYS: &[&str] = &["sessionid", "session_id", "password", "token"];

/// Replace the values of sensitive `key=value` pairs.
///
/// ```
/// use wimp_core::redact::redact_secrets;
///
/// let url = "https://api.example/v1/albums/1?sessionId=abc&countryCode=NO";
/// assert_eq!(
///     redact_secrets(url),
///     "https://api.example/v1/albums/1?sessionId=[REDACTED]&countryCode=NO"
/// );
/// ```
pub fn redact_secrets(input: &str) -> Cow<'_, str> {
    if !contains_sensitive(input) {
        return Cow::Borrowed(input);
    }

    let lower = input.to_ascii_lowercase();
    let mut result = String::with_capacity(input.len());
    let mut cursor = 0;

    while cursor < input.len() {
        match find_next_key(&lower, cursor) {
            Some((value_start, _)) => {
                result.push_str(&input[cursor..value_start]);
                result.push_str(REDACTED);
                let value_end = input[value_start..]
                    .find(|c: char| c.is_whitespace() || matches!(c, '&' | '"' | '\'' | ',' | ';'))
                    .map(|offset| value_start + offset)
                    .unwrap_or(input.len());
                cursor = value_end;
            }
            None => {
                result.push_str(&input[cursor..]);
                break;
            }
        }
    }

    Cow::Owned(result)
}

/// Whether `input` carries a value for any sensitive key.
pub fn contains_sensitive(input: &str) -> bool {
    find_next_key(&input.to_ascii_lowercase(), 0).is_some()
}

/// Position right after the `=` of the earliest sensitive key at or after
/// `from`, together with the matched key.
fn find_next_key(lower: &str, from: usize) -> Option<(usize, &'static str)> {
    SENSITIVE_KEYS
        .iter()
        .filter_map(|key| {
            let needle = format!("{key}=");
            let mut search = from;
            while let Some(offset) = lower[search..].find(&needle) {
                let start = search + offset;
                // only whole parameter names: `xtoken=` is not `token=`
                let boundary = start == 0
                    || !lower.as_bytes()[start - 1].is_ascii_alphanumeric()
                        && lower.as_bytes()[start - 1] != b'_';
                if boundary {
                    return Some((start + needle.len(), *key));
                }
                search = start + needle.len();
            }
            None
        })
        .min_by_key(|(pos, _)| *pos)
}
