//! Time-related utilities.

use chrono::{SecondsFormat, TimeZone, Utc};

/// Get current Unix timestamp in UTC (milliseconds)
pub fn now_utc_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Get the current time as an RFC 3339 string (UTC, millisecond precision)
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert Unix timestamp (milliseconds) to an RFC 3339 string (UTC)
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    let seconds = timestamp_millis.div_euclid(1000);
    let nanos = (timestamp_millis.rem_euclid(1000) * 1_000_000) as u32;
    match Utc.timestamp_opt(seconds, nanos) {
        chrono::LocalResult::Single(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        _ => String::from("invalid timestamp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_utc_millis_returns_positive_value() {
        // テスト項目: now_utc_millis が正の値を返す
        // given (前提条件):

        // when (操作):
        let timestamp = now_utc_millis();

        // then (期待する結果):
        assert!(timestamp > 0);
    }

    #[test]
    fn test_now_utc_millis_returns_increasing_timestamps() {
        // テスト項目: now_utc_millis が呼び出すたびに増加するタイムスタンプを返す
        // given (前提条件):

        // when (操作):
        let timestamp1 = now_utc_millis();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let timestamp2 = now_utc_millis();

        // then (期待する結果):
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_timestamp_to_rfc3339_format() {
        // テスト項目: タイムスタンプが正しく RFC 3339 形式に変換される
        // given (前提条件):
        // 2023-01-01 00:00:00 UTC in milliseconds
        let timestamp = 1672531200000;

        // when (操作):
        let result = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert!(result.starts_with("2023-01-01T00:00:00"));
        assert!(result.ends_with("Z"));
    }

    #[test]
    fn test_timestamp_to_rfc3339_with_milliseconds() {
        // テスト項目: ミリ秒を含むタイムスタンプが正しく変換される
        // given (前提条件):
        let timestamp = 1672531200123;

        // when (操作):
        let result = timestamp_to_rfc3339(timestamp);

        // then (期待する結果):
        assert!(result.contains(".123"));
        assert!(result.starts_with("2023-01-01T00:00:00"));
    }

    #[test]
    fn test_now_rfc3339_is_parseable() {
        // テスト項目: now_rfc3339 の出力が RFC 3339 としてパースできる
        // given (前提条件):

        // when (操作):
        let result = now_rfc3339();

        // then (期待する結果):
        assert!(chrono::DateTime::parse_from_rfc3339(&result).is_ok());
    }
}
