// Formatting rules shared by the page views

use crate::dom::{Document, NodeId, Selector};
use crate::models::{Reading, Status};

/// Text shown for a missing value.
pub const PLACEHOLDER: &str = "--";

pub const STATUS_BADGE_CLASSES: [&str; 3] = ["status-optimal", "status-sub-optimal", "status-critical"];
pub const STATUS_BORDER_CLASSES: [&str; 3] = ["floor-optimal", "floor-sub-optimal", "floor-critical"];

/// Battery bar colour bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelColor {
    Red,
    Amber,
    Green,
}

impl LevelColor {
    pub fn hex(self) -> &'static str {
        match self {
            LevelColor::Red => "#e74c3c",
            LevelColor::Amber => "#f39c12",
            LevelColor::Green => "#2ecc71",
        }
    }
}

/// `< 20` red, `20..50` amber, `>= 50` green.
pub fn level_color(percent: f64) -> LevelColor {
    if percent < 20.0 {
        LevelColor::Red
    } else if percent < 50.0 {
        LevelColor::Amber
    } else {
        LevelColor::Green
    }
}

/// Percentage label colour over the battery bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTone {
    Light,
    Dark,
}

impl TextTone {
    pub fn class(self) -> &'static str {
        match self {
            TextTone::Light => "text-white",
            TextTone::Dark => "text-gray-800",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            TextTone::Light => TextTone::Dark,
            TextTone::Dark => TextTone::Light,
        }
    }
}

/// Light only strictly above 50; exactly 50 is green with dark text.
pub fn text_tone(percent: f64) -> TextTone {
    if percent > 50.0 {
        TextTone::Light
    } else {
        TextTone::Dark
    }
}

pub fn reading_or_placeholder(value: Option<&Reading>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), Reading::to_string)
}

/// Whole-number counts get thousands separators; other readings show as sent.
pub fn count_or_placeholder(value: Option<&Reading>) -> String {
    match value {
        Some(Reading::Number(n)) => n.as_i64().map_or_else(|| n.to_string(), format_number),
        other => reading_or_placeholder(other),
    }
}

pub fn kwh(value: &Reading) -> String {
    format!("{value} kWh")
}

/// Swaps the badge to exactly one `status-*` class and shows the capitalised status.
pub fn apply_status_badge(doc: &mut Document, badge: NodeId, status: Status) {
    doc.remove_classes(badge, &STATUS_BADGE_CLASSES);
    doc.add_class(badge, &format!("status-{}", status.as_str()));
    doc.set_text(badge, status.label());
}

/// Card border colour: exactly one `floor-*` class.
pub fn apply_status_border(doc: &mut Document, card: NodeId, status: Status) {
    doc.remove_classes(card, &STATUS_BORDER_CLASSES);
    doc.add_class(card, &format!("floor-{}", status.as_str()));
}

/// Sets the text of the first match under `scope`; no-op when nothing matches.
pub fn set_text_at(doc: &mut Document, scope: NodeId, selector: &Selector, text: impl Into<String>) {
    if let Some(node) = doc.query_within(scope, selector) {
        doc.set_text(node, text);
    }
}

/// Thousands separators on the integer part: `1234567` → `1,234,567`.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-45000), "-45,000");
    }

    #[test]
    fn counts_are_grouped_only_when_whole() {
        assert_eq!(count_or_placeholder(Some(&Reading::from(12500))), "12,500");
        assert_eq!(count_or_placeholder(Some(&Reading::from("1200"))), "1200");
        assert_eq!(count_or_placeholder(None), "--");
        let fractional: Reading = serde_json::from_str("2.5").unwrap();
        assert_eq!(count_or_placeholder(Some(&fractional)), "2.5");
    }

    #[test]
    fn placeholder_for_missing_reading() {
        assert_eq!(reading_or_placeholder(None), "--");
        assert_eq!(reading_or_placeholder(Some(&Reading::from(42))), "42");
    }
}
