use chrono::{DateTime, FixedOffset};

use crate::{
    error::{Result, SweepError},
    types::{FileRecord, TimeField},
};

/// Parse an ISO-8601 threshold string
///
/// The threshold must carry an explicit timezone offset; a naive date-time
/// is rejected as `InvalidTimestamp` so that comparisons against the
/// provider's offset-aware timestamps are never ambiguous.
pub fn parse_threshold(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value.trim()).map_err(|e| SweepError::InvalidTimestamp {
        value: value.to_string(),
        message: e.to_string(),
    })
}

/// Filter file records by an optional time threshold
///
/// Directories are dropped unconditionally. With a threshold, only records
/// whose selected timestamp is `>=` the threshold pass; records lacking the
/// selected timestamp are dropped. Without a threshold every file passes.
/// Input order is preserved.
pub fn filter_records(
    records: Vec<FileRecord>,
    threshold: Option<DateTime<FixedOffset>>,
    field: TimeField,
) -> Vec<FileRecord> {
    records
        .into_iter()
        .filter(|record| {
            if record.is_directory {
                return false;
            }
            match threshold {
                None => true,
                Some(since) => match record.timestamp(field) {
                    Some(ts) => ts >= since,
                    None => false,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, modified: Option<&str>, is_directory: bool) -> FileRecord {
        FileRecord {
            name: name.to_string(),
            path: format!("/{}", name),
            size: 1024,
            modified_at: modified.map(|m| DateTime::parse_from_rfc3339(m).unwrap()),
            created_at: None,
            is_directory,
        }
    }

    #[test]
    fn test_parse_threshold_valid() {
        let parsed = parse_threshold("2023-01-01T10:00:00+09:00").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2023-01-01T10:00:00+09:00");
    }

    #[test]
    fn test_parse_threshold_rejects_naive() {
        // No offset: cannot be compared safely
        assert!(matches!(
            parse_threshold("2023-01-01T10:00:00"),
            Err(SweepError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_parse_threshold_rejects_garbage() {
        assert!(matches!(
            parse_threshold("not-a-date"),
            Err(SweepError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_no_threshold_passes_files_drops_directories() {
        let records = vec![
            record("a.json", Some("2023-06-01T00:00:00+00:00"), false),
            record("subdir", None, true),
            record("b.pdf", None, false),
        ];

        let filtered = filter_records(records, None, TimeField::Modified);
        let names: Vec<_> = filtered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a.json", "b.pdf"]);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let since = DateTime::parse_from_rfc3339("2023-06-01T00:00:00+00:00").unwrap();
        let records = vec![
            record("old.json", Some("2023-05-31T23:59:59+00:00"), false),
            record("exact.json", Some("2023-06-01T00:00:00+00:00"), false),
            record("new.json", Some("2023-06-02T00:00:00+00:00"), false),
        ];

        let filtered = filter_records(records, Some(since), TimeField::Modified);
        let names: Vec<_> = filtered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["exact.json", "new.json"]);
    }

    #[test]
    fn test_threshold_drops_records_without_timestamp() {
        let since = DateTime::parse_from_rfc3339("2023-06-01T00:00:00+00:00").unwrap();
        let records = vec![
            record("no-ts.json", None, false),
            record("ok.json", Some("2023-06-01T12:00:00+00:00"), false),
        ];

        let filtered = filter_records(records, Some(since), TimeField::Modified);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "ok.json");
    }

    #[test]
    fn test_created_selector() {
        let since = DateTime::parse_from_rfc3339("2023-06-01T00:00:00+00:00").unwrap();
        let mut old = record("a.json", Some("2023-07-01T00:00:00+00:00"), false);
        old.created_at = Some(DateTime::parse_from_rfc3339("2023-01-01T00:00:00+00:00").unwrap());

        // Passes on modified, fails on created
        assert_eq!(
            filter_records(vec![old.clone()], Some(since), TimeField::Modified).len(),
            1
        );
        assert_eq!(
            filter_records(vec![old], Some(since), TimeField::Created).len(),
            0
        );
    }

    #[test]
    fn test_offset_aware_comparison() {
        // 09:00+09:00 equals 00:00 UTC; a record at 00:30 UTC passes
        let since = DateTime::parse_from_rfc3339("2023-06-01T09:00:00+09:00").unwrap();
        let records = vec![record("x.json", Some("2023-06-01T00:30:00+00:00"), false)];

        let filtered = filter_records(records, Some(since), TimeField::Modified);
        assert_eq!(filtered.len(), 1);
    }
}
