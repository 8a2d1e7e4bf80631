// Battery page: level bar, readings and solar status

use std::time::Duration;

use super::PageView;
use super::rules::{self, level_color, text_tone};
use crate::dom::{Document, Element, Selector};
use crate::models::{BatterySnapshot, Reading};
use crate::transport::Endpoint;

struct TextField {
    class: &'static str,
    value: fn(&BatterySnapshot) -> Option<&Reading>,
    suffix: &'static str,
}

const TEXT_FIELDS: &[TextField] = &[
    TextField {
        class: "capacity-value",
        value: |s| s.capacity.as_ref(),
        suffix: "",
    },
    TextField {
        class: "life-value",
        value: |s| s.life.as_ref(),
        suffix: "",
    },
    TextField {
        class: "health-value",
        value: |s| s.health.as_ref(),
        suffix: "%",
    },
    TextField {
        class: "charging-rate-value",
        value: |s| s.charging_rate.as_ref(),
        suffix: "",
    },
    TextField {
        class: "discharging-rate-value",
        value: |s| s.discharging_rate.as_ref(),
        suffix: "",
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BatteryView;

impl PageView for BatteryView {
    type Snapshot = BatterySnapshot;

    fn name(&self) -> &'static str {
        "battery"
    }

    fn endpoint(&self) -> Endpoint {
        Endpoint::Battery
    }

    fn default_interval(&self) -> Duration {
        Duration::from_secs(30)
    }

    fn skeleton(&self) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        if let Some(gauge) = doc.append(root, Element::new("div").with_class("battery")) {
            doc.append(gauge, Element::new("div").with_class("battery-level"));
            doc.append(
                gauge,
                Element::new("span").with_class("battery-percent text-gray-800"),
            );
        }
        for field in TEXT_FIELDS {
            doc.append(root, Element::new("span").with_class(field.class));
        }
        doc.append(root, Element::new("span").with_class("solar-status"));
        doc
    }

    fn render(&self, doc: &mut Document, snapshot: &BatterySnapshot) {
        let level = doc.query(&Selector::class("battery-level"));
        let label = doc.query(&Selector::class("battery-percent"));
        if let (Some(level), Some(label)) = (level, label) {
            let percent = snapshot.level();
            let shown = snapshot
                .percentage
                .as_ref()
                .filter(|r| r.as_f64().is_some())
                .map_or_else(|| "0".to_string(), Reading::to_string);
            doc.set_style(level, "height", format!("{shown}%"));
            doc.set_text(label, format!("{shown}%"));
            doc.set_style(level, "background-color", level_color(percent).hex());
            let tone = text_tone(percent);
            doc.add_class(label, tone.class());
            doc.remove_class(label, tone.opposite().class());
        }

        let root = doc.root();
        for field in TEXT_FIELDS {
            let value = rules::reading_or_placeholder((field.value)(snapshot));
            rules::set_text_at(
                doc,
                root,
                &Selector::class(field.class),
                format!("{value}{}", field.suffix),
            );
        }

        if let (Some(status), Some(active)) = (
            doc.query(&Selector::class("solar-status")),
            snapshot.solar_active,
        ) {
            let (text, color) = if active {
                ("Active - Generating", "text-green-600")
            } else {
                ("Inactive", "text-gray-600")
            };
            doc.set_text(status, text);
            doc.set_class_name(status, &format!("solar-status {color}"));
        }
    }
}
