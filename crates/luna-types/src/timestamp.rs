use chrono::{DateTime, SecondsFormat, Utc};

/// The current time as an ISO-8601 UTC string with millisecond precision,
/// e.g. `2024-05-01T12:30:00.123Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Returns `true` if `value` parses as an RFC 3339 date-time.
pub fn is_timestamp(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_is_parseable() {
        let now = now_timestamp();
        assert!(is_timestamp(&now));
        assert!(now.ends_with('Z'));
    }

    #[test]
    fn now_is_monotonic_as_string() {
        let a = now_timestamp();
        let b = now_timestamp();
        assert!(b >= a);
    }

    #[test]
    fn rejects_garbage() {
        assert!(!is_timestamp("yesterday"));
        assert!(!is_timestamp(""));
    }

    #[test]
    fn accepts_offsets() {
        assert!(is_timestamp("2024-01-01T10:00:00+02:00"));
    }
}
