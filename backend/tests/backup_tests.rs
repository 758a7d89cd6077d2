//! Backup naming and retention tests

use chrono::{Duration, NaiveDate, NaiveDateTime};

use bar_stock_tracker_backend::services::backup::parse_backup_timestamp;
use shared::file_timestamp;

fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}

// ============================================================================
// File name format
// ============================================================================

#[test]
fn timestamp_fragment_format() {
    let stamp = file_timestamp(dt(2025, 6, 15, 9, 30, 5));
    assert_eq!(stamp, "20250615_093005");
}

#[test]
fn backup_names_round_trip_through_the_parser() {
    let created = dt(2025, 6, 15, 9, 30, 5);
    let stamp = file_timestamp(created);

    let plain = format!("stock_backup_{}.db", stamp);
    let compressed = format!("stock_backup_{}.db.gz", stamp);

    assert_eq!(parse_backup_timestamp(&plain), Some(created));
    assert_eq!(parse_backup_timestamp(&compressed), Some(created));
}

#[test]
fn foreign_file_names_do_not_parse() {
    assert_eq!(parse_backup_timestamp("stock.db"), None);
    assert_eq!(parse_backup_timestamp("stock_backup_garbage.db"), None);
    assert_eq!(parse_backup_timestamp("notes.txt"), None);
    // Partial timestamps are rejected too
    assert_eq!(parse_backup_timestamp("stock_backup_20250615.db"), None);
}

// ============================================================================
// Retention arithmetic
// ============================================================================

#[test]
fn retention_cutoff_keeps_recent_backups() {
    let now = dt(2025, 6, 15, 12, 0, 0);
    let cutoff = now - Duration::days(30);

    let fresh = dt(2025, 6, 1, 0, 0, 0);
    let stale = dt(2025, 4, 1, 0, 0, 0);
    let boundary = dt(2025, 5, 16, 12, 0, 0);

    assert!(fresh >= cutoff);
    assert!(stale < cutoff);
    // Exactly at the cutoff is kept
    assert!(boundary >= cutoff);
}

#[test]
fn backups_sort_newest_first_by_timestamp() {
    let mut names = vec![
        "stock_backup_20250401_120000.db.gz",
        "stock_backup_20250615_093005.db",
        "stock_backup_20250516_000000.db.gz",
    ];
    names.sort_by_key(|name| std::cmp::Reverse(parse_backup_timestamp(name)));

    assert_eq!(names[0], "stock_backup_20250615_093005.db");
    assert_eq!(names[2], "stock_backup_20250401_120000.db.gz");
}
