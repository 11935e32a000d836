//! Tests for CLI output formatting helpers
//!
//! - Byte formatting (KB, MB, GB)
//! - Duration formatting (ms, s, m)
//! - Relative time formatting
//! - Chunk previews

use chrono::{Duration, Utc};
use docqa::cli::output::{format_bytes, format_duration_ms, format_relative_time, preview};

#[test]
fn test_format_bytes_boundaries() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1024), "1.0 KB");
    assert_eq!(format_bytes(1048576 - 1), "1024.0 KB");
    assert_eq!(format_bytes(1048576), "1.0 MB");
    assert_eq!(format_bytes(1610612736), "1.5 GB");
}

#[test]
fn test_format_duration_ms() {
    assert_eq!(format_duration_ms(0), "0ms");
    assert_eq!(format_duration_ms(999), "999ms");
    assert_eq!(format_duration_ms(1000), "1.00s");
    assert_eq!(format_duration_ms(59_990), "59.99s");
    assert_eq!(format_duration_ms(60_000), "1m 0.0s");
    assert_eq!(format_duration_ms(125_500), "2m 5.5s");
}

#[test]
fn test_format_relative_time() {
    let now = Utc::now();
    assert_eq!(format_relative_time(&(now - Duration::seconds(30))), "just now");
    assert_eq!(format_relative_time(&(now - Duration::minutes(5))), "5m ago");
    assert_eq!(format_relative_time(&(now - Duration::hours(2))), "2h ago");
    assert_eq!(format_relative_time(&(now - Duration::days(3))), "3d ago");
}

#[test]
fn test_preview() {
    assert_eq!(preview("short text", 100), "short text");
    assert_eq!(preview("one two three", 7), "one two...");
    assert_eq!(preview("  \n  ", 10), "");
}
