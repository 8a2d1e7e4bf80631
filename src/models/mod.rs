// Snapshot models for the dashboard API resources

mod battery;
mod building;
mod status;
mod visitors;

pub use battery::BatterySnapshot;
pub use building::{AreaSummary, Appliance, FloorDetailSnapshot, RoomDetailSnapshot, RoomInfo};
pub use status::{ApplianceState, Status};
pub use visitors::{Guest, GuestRoster, VisitorTotals, VisitorsSnapshot};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// A loosely typed scalar as the API sends it: numbers, strings or flags.
/// Displays the way the dashboard prints it (`120`, `2.5`, `10 kWh`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(serde_json::Number),
    Text(String),
    Flag(bool),
}

impl Reading {
    /// Numeric value, parsing numeric strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reading::Number(n) => n.as_f64(),
            Reading::Text(s) => s.trim().parse().ok(),
            Reading::Flag(_) => None,
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Number(n) => write!(f, "{n}"),
            Reading::Text(s) => f.write_str(s),
            Reading::Flag(b) => write!(f, "{b}"),
        }
    }
}

impl From<i64> for Reading {
    fn from(v: i64) -> Self {
        Reading::Number(v.into())
    }
}

impl From<&str> for Reading {
    fn from(v: &str) -> Self {
        Reading::Text(v.to_string())
    }
}

/// Ids arrive as strings or bare numbers; both are matched against data attributes as text.
/// Anything else reads as no id, and the entry is skipped when rendering.
fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Loose truthiness of a payload flag: null, false, 0, NaN and "" are false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
