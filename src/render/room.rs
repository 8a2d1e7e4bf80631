// Room detail page: overview stats and appliance states

use std::time::Duration;

use super::PageView;
use super::rules::{self, apply_status_badge};
use crate::dom::{Document, Element, Selector};
use crate::models::{Appliance, RoomDetailSnapshot, RoomInfo};
use crate::transport::Endpoint;

#[derive(Debug, Clone)]
pub struct RoomDetailView {
    pub room_id: String,
    pub appliance_ids: Vec<String>,
}

impl RoomDetailView {
    pub fn new(room_id: impl Into<String>, appliance_ids: Vec<String>) -> Self {
        Self {
            room_id: room_id.into(),
            appliance_ids,
        }
    }
}

fn render_overview(doc: &mut Document, room: &RoomInfo) {
    let root = doc.root();
    if let Some(consumption) = &room.consumption {
        rules::set_text_at(
            doc,
            root,
            &Selector::class("room-consumption"),
            rules::kwh(consumption),
        );
    }
    if let Some(badge) = doc.query(&Selector::class("status-badge")) {
        apply_status_badge(doc, badge, room.status.unwrap_or_default());
    }

    let avg = rules::reading_or_placeholder(room.avg_consumption.as_ref());
    let peak = rules::reading_or_placeholder(room.peak_time.as_ref());
    let efficiency = rules::reading_or_placeholder(room.efficiency.as_ref());
    rules::set_text_at(
        doc,
        root,
        &Selector::class("avg-consumption"),
        format!("{avg} kWh/day"),
    );
    rules::set_text_at(doc, root, &Selector::class("peak-time"), peak);
    rules::set_text_at(
        doc,
        root,
        &Selector::class("efficiency-score"),
        format!("{efficiency}/100"),
    );
}

fn render_appliances(doc: &mut Document, appliances: &[Appliance]) {
    for appliance in appliances {
        let Some(node) = appliance
            .id
            .as_deref()
            .and_then(|id| doc.query(&Selector::attr("data-id", id)))
        else {
            continue;
        };
        let state = appliance.state();
        doc.set_attr(node, "data-state", state.as_str());
        if let Some(label) = doc.query_within(node, &Selector::class("state")) {
            doc.set_text(label, state.label());
            doc.set_class_name(label, &format!("state {}", state.color_class()));
        }
    }
}

impl PageView for RoomDetailView {
    type Snapshot = RoomDetailSnapshot;

    fn name(&self) -> &'static str {
        "room_detail"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Room(self.room_id.clone())
    }

    fn default_interval(&self) -> Duration {
        Duration::from_secs(30)
    }

    fn skeleton(&self) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        if let Some(header) = doc.append(root, Element::new("header")) {
            doc.append(header, Element::new("span").with_class("room-consumption"));
            doc.append(
                header,
                Element::new("span").with_class("status-badge status-optimal"),
            );
        }
        if let Some(stats) = doc.append(root, Element::new("section").with_class("room-stats")) {
            for class in ["avg-consumption", "peak-time", "efficiency-score"] {
                doc.append(stats, Element::new("span").with_class(class));
            }
        }
        if let Some(list) = doc.append(root, Element::new("section").with_class("appliances")) {
            for id in &self.appliance_ids {
                let toggle = Element::new("button")
                    .with_class("appliance-toggle")
                    .with_attr("data-action", "toggle")
                    .with_attr("data-id", id.as_str())
                    .with_attr("data-state", "off");
                if let Some(toggle) = doc.append(list, toggle) {
                    doc.append(
                        toggle,
                        Element::new("span")
                            .with_class("state text-gray-600")
                            .with_text("OFF"),
                    );
                }
            }
        }
        doc
    }

    fn render(&self, doc: &mut Document, snapshot: &RoomDetailSnapshot) {
        if let Some(room) = &snapshot.room {
            render_overview(doc, room);
        }
        if let Some(appliances) = &snapshot.appliances {
            render_appliances(doc, appliances);
        }
    }
}
