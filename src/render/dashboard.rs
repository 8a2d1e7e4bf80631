// Overview page setup: battery bar width and status badge colours from markup attributes

use crate::dom::{Document, Selector};
use crate::models::Status;

/// Applies `data-level` to the battery bar width (default 0) and colours every
/// `[data-status]` element carrying a known status. Unknown statuses are left alone.
pub fn init(doc: &mut Document) {
    if let Some(bar) = doc.query(&Selector::class("battery-level")) {
        let level = doc
            .attr(bar, "data-level")
            .filter(|l| !l.is_empty())
            .unwrap_or("0")
            .to_string();
        doc.set_style(bar, "width", format!("{level}%"));
    }

    for node in doc.query_all(&Selector::has_attr("data-status")) {
        let status = doc.attr(node, "data-status").and_then(Status::from_known);
        if let Some(status) = status {
            doc.set_style(node, "background-color", status.color());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[test]
    fn init_sets_width_and_known_status_colours() {
        let mut doc = Document::new();
        let root = doc.root();
        let bar = doc
            .append(
                root,
                Element::new("div")
                    .with_class("battery-level")
                    .with_attr("data-level", "64"),
            )
            .unwrap();
        let critical = doc
            .append(root, Element::new("span").with_attr("data-status", "critical"))
            .unwrap();
        let odd = doc
            .append(root, Element::new("span").with_attr("data-status", "sleeping"))
            .unwrap();

        init(&mut doc);

        assert_eq!(doc.style(bar, "width"), Some("64%"));
        assert_eq!(doc.style(critical, "background-color"), Some("#EF4444"));
        assert_eq!(doc.style(odd, "background-color"), None);
    }

    #[test]
    fn init_defaults_missing_level_to_zero() {
        let mut doc = Document::new();
        let root = doc.root();
        let bar = doc
            .append(root, Element::new("div").with_class("battery-level"))
            .unwrap();
        init(&mut doc);
        assert_eq!(doc.style(bar, "width"), Some("0%"));
    }
}
