// Visitors page. Guest and room lists are rebuilt from scratch on every render.

use std::time::Duration;

use serde_json::Value;

use super::PageView;
use super::rules::{self, PLACEHOLDER};
use crate::dom::{Document, Element, NodeId, Selector};
use crate::models::{Guest, GuestRoster, Reading, VisitorTotals, VisitorsSnapshot};
use crate::transport::Endpoint;

#[derive(Debug, Clone, Copy, Default)]
pub struct VisitorsView;

fn rebuild(doc: &mut Document, container_class: &str) -> Option<NodeId> {
    let list = doc.query(&Selector::class(container_class))?;
    doc.clear_children(list);
    Some(list)
}

fn append_guest(doc: &mut Document, list: NodeId, id: &str, guest: &Guest) {
    let item = Element::new("div")
        .with_class("guest-item")
        .with_attr("data-guest-id", id);
    let Some(item) = doc.append(list, item) else {
        return;
    };
    let name = guest.name.as_deref().unwrap_or(id);
    let (status, status_class) = if guest.is_present() {
        ("PRESENT", "guest-status text-green-600")
    } else {
        ("AWAY", "guest-status text-gray-600")
    };
    let room = guest
        .current_room
        .as_deref()
        .filter(|r| !r.is_empty())
        .unwrap_or(PLACEHOLDER);

    doc.append(item, Element::new("span").with_class("guest-name").with_text(name));
    doc.append(item, Element::new("span").with_class(status_class).with_text(status));
    doc.append(item, Element::new("span").with_class("guest-room").with_text(room));
    doc.append(
        item,
        Element::new("span")
            .with_class("guest-tags")
            .with_text(guest.active_tags().join(", ")),
    );
}

fn append_room(doc: &mut Document, list: NodeId, name: &str, count: String) {
    let item = Element::new("div")
        .with_class("room-item")
        .with_attr("data-room", name);
    if let Some(item) = doc.append(list, item) {
        doc.append(item, Element::new("span").with_class("room-name").with_text(name));
        doc.append(item, Element::new("span").with_class("room-count").with_text(count));
    }
}

fn render_roster(doc: &mut Document, roster: &GuestRoster) {
    let root = doc.root();
    rules::set_text_at(
        doc,
        root,
        &Selector::class("visitors-count"),
        rules::count_or_placeholder(roster.count.as_ref()),
    );
    rules::set_text_at(
        doc,
        root,
        &Selector::class("last-activity"),
        rules::reading_or_placeholder(roster.last_activity.as_ref()),
    );
    if let Some(list) = rebuild(doc, "guest-list") {
        for (id, guest) in &roster.guests {
            append_guest(doc, list, id, guest);
        }
    }
    if let Some(list) = rebuild(doc, "room-list") {
        for (name, count) in &roster.rooms {
            append_room(doc, list, name, rules::count_or_placeholder(count.as_ref()));
        }
    }
}

// Entries of the older room array are either names or `{ name, count }` objects.
fn room_entry(entry: &Value) -> (String, String) {
    match entry {
        Value::String(name) => (name.clone(), PLACEHOLDER.to_string()),
        Value::Object(obj) => {
            let name = match obj.get("name") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => PLACEHOLDER.to_string(),
            };
            let count = match obj.get("count") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => PLACEHOLDER.to_string(),
                Some(Value::Number(n)) => {
                    rules::count_or_placeholder(Some(&Reading::Number(n.clone())))
                }
                Some(other) => other.to_string(),
            };
            (name, count)
        }
        other => (other.to_string(), PLACEHOLDER.to_string()),
    }
}

fn render_totals(doc: &mut Document, totals: &VisitorTotals) {
    if let Some(total) = &totals.total {
        let root = doc.root();
        rules::set_text_at(
            doc,
            root,
            &Selector::class("visitors-total"),
            rules::count_or_placeholder(Some(total)),
        );
    }
    if let Some(list) = rebuild(doc, "room-list") {
        for entry in &totals.rooms {
            let (name, count) = room_entry(entry);
            append_room(doc, list, &name, count);
        }
    }
}

impl PageView for VisitorsView {
    type Snapshot = VisitorsSnapshot;

    fn name(&self) -> &'static str {
        "visitors"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Visitors
    }

    fn default_interval(&self) -> Duration {
        Duration::from_secs(30)
    }

    fn skeleton(&self) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        for class in ["visitors-total", "visitors-count", "last-activity"] {
            doc.append(root, Element::new("span").with_class(class));
        }
        doc.append(root, Element::new("div").with_class("guest-list"));
        doc.append(root, Element::new("div").with_class("room-list"));
        doc
    }

    fn render(&self, doc: &mut Document, snapshot: &VisitorsSnapshot) {
        match snapshot {
            VisitorsSnapshot::Guests(roster) => render_roster(doc, roster),
            VisitorsSnapshot::Totals(totals) => render_totals(doc, totals),
        }
    }
}
