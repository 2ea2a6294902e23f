use chrono::{DateTime, FixedOffset, Utc};

use crate::model::Tag;

const CREATED_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCountStyle {
    /// "12K views", used next to the upload date on list rows.
    Compact,
    /// "12,345 views", used on the video header.
    Grouped,
}

/// `M:SS`, seconds always padded to two digits.
pub fn format_duration(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Empty string for zero plays in both styles.
pub fn format_view_count(count: u64, style: ViewCountStyle) -> String {
    if count == 0 {
        return String::new();
    }
    if count == 1 {
        return "1 view".to_string();
    }
    match style {
        ViewCountStyle::Compact => {
            if count >= 1_000_000_000 {
                format!("{}B views", count / 1_000_000_000)
            } else if count >= 1_000_000 {
                format!("{}M views", count / 1_000_000)
            } else if count >= 1_000 {
                format!("{}K views", count / 1_000)
            } else {
                format!("{} views", count)
            }
        }
        ViewCountStyle::Grouped => format!("{} views", group_thousands(count)),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// `#canonical ` for every tag, trailing space kept.
pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| format!("#{} ", tag.canonical))
        .collect()
}

pub fn parse_created_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(raw, CREATED_TIME_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
}

/// Turns a point in time into a phrase like "3 days ago".
pub trait DateRelativizer {
    fn relativize(&self, at: DateTime<FixedOffset>) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRelativizer;

impl DateRelativizer for SystemRelativizer {
    fn relativize(&self, at: DateTime<FixedOffset>) -> String {
        relative_date(at, Utc::now())
    }
}

pub fn relative_date(at: DateTime<FixedOffset>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(at.with_timezone(&Utc));
    let seconds = elapsed.num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    let (amount, unit) = if minutes < 60 {
        (minutes, "minute")
    } else if hours < 24 {
        (hours, "hour")
    } else if days < 7 {
        (days, "day")
    } else if days < 30 {
        (days / 7, "week")
    } else if days < 365 {
        (days / 30, "month")
    } else {
        (days / 365, "year")
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

/// Relative phrase for a raw creation timestamp, empty when it does not parse.
pub fn relative_created_time(raw: Option<&str>, relativizer: &dyn DateRelativizer) -> String {
    let raw = raw.unwrap_or_default();
    match parse_created_time(raw) {
        Some(at) => relativizer.relativize(at),
        None => {
            log::error!("Unparseable created_time '{}'", raw);
            String::new()
        }
    }
}

#[cfg(test)]
pub struct FixedRelativizer(pub DateTime<Utc>);

#[cfg(test)]
impl DateRelativizer for FixedRelativizer {
    fn relativize(&self, at: DateTime<FixedOffset>) -> String {
        relative_date(at, self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2015-06-16T10:00:00+00:00")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn duration_pads_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(5), "0:05");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(600), "10:00");
        assert_eq!(format_duration(3725), "62:05");
    }

    #[test]
    fn compact_view_counts() {
        let f = |n| format_view_count(n, ViewCountStyle::Compact);
        assert_eq!(f(0), "");
        assert_eq!(f(1), "1 view");
        assert_eq!(f(2), "2 views");
        assert_eq!(f(999), "999 views");
        assert_eq!(f(1500), "1K views");
        assert_eq!(f(999_999), "999K views");
        assert_eq!(f(2_500_000), "2M views");
        assert_eq!(f(3_000_000_000), "3B views");
    }

    #[test]
    fn grouped_view_counts() {
        let f = |n| format_view_count(n, ViewCountStyle::Grouped);
        assert_eq!(f(0), "");
        assert_eq!(f(1), "1 view");
        assert_eq!(f(999), "999 views");
        assert_eq!(f(1000), "1,000 views");
        assert_eq!(f(12345), "12,345 views");
        assert_eq!(f(1_234_567), "1,234,567 views");
    }

    #[test]
    fn tags_keep_trailing_space() {
        let tags = vec![
            Tag { canonical: "ocean".into(), ..Default::default() },
            Tag { canonical: "drone".into(), ..Default::default() },
        ];
        assert_eq!(format_tags(&tags), "#ocean #drone ");
        assert_eq!(format_tags(&[]), "");
    }

    #[test]
    fn parses_offsets_with_and_without_colon() {
        assert!(parse_created_time("2015-06-13T10:00:00+00:00").is_some());
        assert!(parse_created_time("2015-06-13T10:00:00+0200").is_some());
        assert!(parse_created_time("13/06/2015").is_none());
        assert!(parse_created_time("").is_none());
    }

    #[test]
    fn relative_phrases() {
        let at = |s: &str| parse_created_time(s).unwrap();
        assert_eq!(relative_date(at("2015-06-16T09:59:30+00:00"), now()), "just now");
        assert_eq!(relative_date(at("2015-06-16T09:59:00+00:00"), now()), "1 minute ago");
        assert_eq!(relative_date(at("2015-06-16T07:00:00+00:00"), now()), "3 hours ago");
        assert_eq!(relative_date(at("2015-06-13T10:00:00+00:00"), now()), "3 days ago");
        assert_eq!(relative_date(at("2015-06-02T10:00:00+00:00"), now()), "2 weeks ago");
        assert_eq!(relative_date(at("2015-03-16T10:00:00+00:00"), now()), "3 months ago");
        assert_eq!(relative_date(at("2013-06-16T10:00:00+00:00"), now()), "2 years ago");
    }

    #[test]
    fn offset_is_honoured() {
        // 12:00+02:00 is 10:00 UTC
        let at = parse_created_time("2015-06-16T12:00:00+02:00").unwrap();
        assert_eq!(relative_date(at, now()), "just now");
    }

    #[test]
    fn unparseable_created_time_is_empty() {
        let relativizer = FixedRelativizer(now());
        assert_eq!(relative_created_time(Some("yesterday"), &relativizer), "");
        assert_eq!(relative_created_time(None, &relativizer), "");
        assert_eq!(
            relative_created_time(Some("2015-06-13T10:00:00+00:00"), &relativizer),
            "3 days ago"
        );
    }
}
