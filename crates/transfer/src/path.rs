//! Destination path derivation: day-border bucketing and folder sanitization.
//!
//! Destinations follow
//! `<data_root>/{year}/{MonthFullName}/{day:02}{month:02}/{SanitizedProfile}/`
//! where the date components come from the order date, not the raw message
//! timestamp.

use std::path::PathBuf;

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone, Timelike, Utc};
use meshbot_protocol::SenderIdentity;
use tracing::debug;

use crate::TransferError;

/// Characters stripped from destination folder names.
const INVALID_FOLDER_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Strips filesystem-hostile characters, then trailing periods and spaces.
///
/// Never fails: an identity with every field absent still produces a
/// usable (if terse) folder name.
pub fn sanitize_folder_name(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !INVALID_FOLDER_CHARS.contains(c))
        .collect();
    stripped.trim_end_matches(['.', ' ']).to_string()
}

/// Computes the order date for a message timestamp.
///
/// Messages whose local hour is at or past `day_border_local_hour` belong
/// to the next operational day; earlier messages keep their calendar date.
/// This buckets late-night arrivals into the following business day.
pub fn order_date<Tz: TimeZone>(local_time: DateTime<Tz>, day_border_local_hour: u8) -> NaiveDate {
    if local_time.hour() < u32::from(day_border_local_hour) {
        local_time.date_naive()
    } else {
        local_time.date_naive() + Days::new(1)
    }
}

/// Derives deterministic destination directories for incoming transfers.
pub struct PathResolver {
    data_root: PathBuf,
}

impl PathResolver {
    /// Creates a resolver rooted at `data_root`.
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
        }
    }

    /// Resolves (and creates) the destination directory for a transfer.
    ///
    /// Idempotent: identical `(sender, timestamp, day border)` inputs yield
    /// identical paths, and an already-existing directory is not an error.
    /// Returns the canonicalized directory path.
    pub fn resolve(
        &self,
        sender: &SenderIdentity,
        timestamp: DateTime<Utc>,
        day_border_local_hour: u8,
    ) -> Result<PathBuf, TransferError> {
        let profile = sanitize_folder_name(&sender.profile_string());
        let date = order_date(timestamp.with_timezone(&Local), day_border_local_hour);

        let dir = self
            .data_root
            .join(date.year().to_string())
            .join(date.format("%B").to_string())
            .join(format!("{:02}{:02}", date.day(), date.month()))
            .join(profile);

        std::fs::create_dir_all(&dir)?;
        let dir = std::fs::canonicalize(&dir)?;
        debug!(dir = %dir.display(), "destination resolved");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn at_local_hour(hour: u32, minute: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 17, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn order_date_before_border_keeps_calendar_date() {
        let date = order_date(at_local_hour(19, 59), 20);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
    }

    #[test]
    fn order_date_at_border_rolls_to_next_day() {
        let date = order_date(at_local_hour(20, 0), 20);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 18).unwrap());
    }

    #[test]
    fn order_date_rolls_across_month_end() {
        let ts = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 31, 23, 0, 0)
            .unwrap();
        assert_eq!(
            order_date(ts, 20),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
    }

    #[test]
    fn order_date_midnight_with_zero_border() {
        // Border 0 means every message rolls forward.
        let date = order_date(at_local_hour(0, 0), 0);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 5, 18).unwrap());
    }

    #[test]
    fn sanitize_strips_invalid_chars_and_trailing_dots() {
        assert_eq!(
            sanitize_folder_name(r#"(@john) Jo/hn "Doe"."#),
            "(@john) John Doe"
        );
    }

    #[test]
    fn sanitize_strips_full_invalid_set() {
        assert_eq!(sanitize_folder_name(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
    }

    #[test]
    fn sanitize_strips_trailing_spaces_and_periods_only() {
        assert_eq!(sanitize_folder_name("name .. "), "name");
        // Leading whitespace is preserved.
        assert_eq!(sanitize_folder_name(" name"), " name");
    }

    #[test]
    fn sanitize_empty_identity_is_safe() {
        let sender = SenderIdentity::default();
        // "(@)  " -> trailing spaces stripped.
        assert_eq!(sanitize_folder_name(&sender.profile_string()), "(@)");
    }

    #[test]
    fn resolve_is_deterministic_and_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(tmp.path());
        let sender = SenderIdentity {
            username: Some("john".into()),
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
        };
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 10, 30, 0).unwrap();

        let first = resolver.resolve(&sender, ts, 20).unwrap();
        let second = resolver.resolve(&sender, ts, 20).unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
        assert!(first.ends_with("(@john) John Doe"));
    }

    #[test]
    fn resolve_layout_contains_order_date_components() {
        let tmp = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(tmp.path());
        let sender = SenderIdentity {
            username: Some("ada".into()),
            ..Default::default()
        };
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 10, 30, 0).unwrap();

        let dir = resolver.resolve(&sender, ts, 20).unwrap();
        let date = order_date(ts.with_timezone(&Local), 20);
        let rendered = dir.to_string_lossy().into_owned();
        assert!(rendered.contains(&date.year().to_string()));
        assert!(rendered.contains(&date.format("%B").to_string()));
        assert!(rendered.contains(&format!("{:02}{:02}", date.day(), date.month())));
    }
}
