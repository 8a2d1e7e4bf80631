// Notifications page: relative timestamps and expandable cards

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use crate::dom::{Document, NodeId, Selector};

/// Formats accepted in `.notification-time` cells besides RFC 3339.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
];

pub fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local));
    }
    LOCAL_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
    })
}

fn plural(n: i64, unit: &str) -> String {
    format!("{n} {unit}{} ago", if n > 1 { "s" } else { "" })
}

// Half-up rounding, applied at each unit step.
fn round(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// `just now`, `N minutes ago`, `N hours ago`, `N days ago`, else the date.
pub fn time_ago(then: DateTime<Local>, now: DateTime<Local>) -> String {
    let diff_ms = (now - then).num_milliseconds() as f64;
    let sec = round(diff_ms / 1000.0);
    let min = round(sec as f64 / 60.0);
    let hour = round(min as f64 / 60.0);
    let day = round(hour as f64 / 24.0);

    if sec < 60 {
        "just now".to_string()
    } else if min < 60 {
        plural(min, "minute")
    } else if hour < 24 {
        plural(hour, "hour")
    } else if day < 7 {
        plural(day, "day")
    } else {
        then.format("%-m/%-d/%Y").to_string()
    }
}

/// Rewrites every parseable `.notification-time` as relative time; others are left as is.
pub fn format_timestamps(doc: &mut Document, now: DateTime<Local>) {
    for node in doc.query_all(&Selector::class("notification-time")) {
        let parsed = doc.text(node).and_then(parse_timestamp);
        match parsed {
            Some(then) => doc.set_text(node, time_ago(then, now)),
            None => tracing::debug!(?node, "unparseable notification timestamp"),
        }
    }
}

/// Click on a notification card: toggles `expanded` unless the click landed on a link.
/// Returns whether the card is expanded afterwards.
pub fn on_card_click(doc: &mut Document, card: NodeId, target_tag: &str) -> bool {
    if target_tag.eq_ignore_ascii_case("a") {
        return doc.has_class(card, "expanded");
    }
    doc.toggle_class(card, "expanded")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 4, 13, 12, 0, 0).unwrap()
    }

    #[test]
    fn time_ago_buckets() {
        let now = now();
        assert_eq!(time_ago(now - Duration::seconds(20), now), "just now");
        assert_eq!(time_ago(now - Duration::seconds(60), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(time_ago(now - Duration::hours(30), now), "1 day ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3 days ago");
        assert_eq!(time_ago(now - Duration::days(10), now), "4/3/2025");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = now();
        assert_eq!(time_ago(now + Duration::hours(2), now), "just now");
    }

    #[test]
    fn parses_dashboard_timestamp_formats() {
        let expected = Local.with_ymd_and_hms(2025, 4, 13, 10, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-04-13 10:30 AM"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-13 10:30:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
