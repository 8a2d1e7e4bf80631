// Floors list and floor detail pages

use std::time::Duration;

use super::PageView;
use super::rules::{self, apply_status_badge, apply_status_border};
use crate::dom::{Document, Element, NodeId, Selector};
use crate::models::{AreaSummary, FloorDetailSnapshot};
use crate::transport::Endpoint;

/// Updates the cards tagged `[<id_attr>="<id>"]`; areas without an id or a card are skipped.
fn render_area_cards(doc: &mut Document, id_attr: &str, areas: &[AreaSummary]) {
    for area in areas {
        let Some(id) = area.id.as_deref() else {
            continue;
        };
        let Some(card) = doc.query(&Selector::attr(id_attr, id)) else {
            continue;
        };
        if let Some(consumption) = &area.consumption {
            rules::set_text_at(
                doc,
                card,
                &Selector::class("consumption-value"),
                rules::kwh(consumption),
            );
        }
        let status = area.status();
        if let Some(badge) = doc.query_within(card, &Selector::class("status-badge")) {
            apply_status_badge(doc, badge, status);
        }
        apply_status_border(doc, card, status);
    }
}

fn area_card(id_attr: &str, id: &str) -> Element {
    Element::new("div")
        .with_class("card floor-optimal")
        .with_attr(id_attr, id)
}

fn append_area_card(doc: &mut Document, parent: NodeId, id_attr: &str, id: &str) {
    if let Some(card) = doc.append(parent, area_card(id_attr, id)) {
        doc.append(card, Element::new("span").with_class("consumption-value"));
        doc.append(
            card,
            Element::new("span").with_class("status-badge status-optimal"),
        );
    }
}

/// `/floors`: one card per known floor id.
#[derive(Debug, Clone, Default)]
pub struct FloorsView {
    pub floor_ids: Vec<String>,
}

impl FloorsView {
    pub fn new(floor_ids: Vec<String>) -> Self {
        Self { floor_ids }
    }
}

impl PageView for FloorsView {
    type Snapshot = Vec<AreaSummary>;

    fn name(&self) -> &'static str {
        "floors"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Floors
    }

    fn default_interval(&self) -> Duration {
        Duration::from_secs(60)
    }

    fn skeleton(&self) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        for id in &self.floor_ids {
            append_area_card(&mut doc, root, "data-floor-id", id);
        }
        doc
    }

    fn render(&self, doc: &mut Document, floors: &Vec<AreaSummary>) {
        render_area_cards(doc, "data-floor-id", floors);
    }
}

/// `/floor/{id}`: floor overview plus its room cards.
#[derive(Debug, Clone)]
pub struct FloorDetailView {
    pub floor_id: String,
    pub room_ids: Vec<String>,
}

impl FloorDetailView {
    pub fn new(floor_id: impl Into<String>, room_ids: Vec<String>) -> Self {
        Self {
            floor_id: floor_id.into(),
            room_ids,
        }
    }
}

impl PageView for FloorDetailView {
    type Snapshot = FloorDetailSnapshot;

    fn name(&self) -> &'static str {
        "floor_detail"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Floor(self.floor_id.clone())
    }

    fn default_interval(&self) -> Duration {
        Duration::from_secs(30)
    }

    fn skeleton(&self) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        if let Some(header) = doc.append(root, Element::new("header")) {
            doc.append(header, Element::new("span").with_class("floor-consumption"));
            doc.append(
                header,
                Element::new("span").with_class("status-badge status-optimal"),
            );
        }
        if let Some(rooms) = doc.append(root, Element::new("section").with_class("rooms")) {
            for id in &self.room_ids {
                append_area_card(&mut doc, rooms, "data-room-id", id);
            }
        }
        doc
    }

    fn render(&self, doc: &mut Document, snapshot: &FloorDetailSnapshot) {
        if let Some(floor) = &snapshot.floor {
            let root = doc.root();
            if let Some(consumption) = &floor.consumption {
                rules::set_text_at(
                    doc,
                    root,
                    &Selector::class("floor-consumption"),
                    rules::kwh(consumption),
                );
            }
            // First badge in document order is the page header's.
            if let Some(badge) = doc.query(&Selector::class("status-badge")) {
                apply_status_badge(doc, badge, floor.status());
            }
        }
        if let Some(rooms) = &snapshot.rooms {
            render_area_cards(doc, "data-room-id", rooms);
        }
    }
}
