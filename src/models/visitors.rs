// GET /api/visitors. Two payload shapes are in use; both are accepted as versioned variants.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::{Reading, truthy};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    #[serde(default, deserialize_with = "loose_text")]
    pub name: Option<String>,
    #[serde(default, rename = "currentRoom", deserialize_with = "loose_text")]
    pub current_room: Option<String>,
    #[serde(default, deserialize_with = "tag_flags")]
    pub tags: BTreeMap<String, bool>,
}

// Strings as is, numbers as text; anything else reads as absent.
fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// Tag values are loose flags; a non-object tag field means no tags.
fn tag_flags<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map.into_iter().map(|(tag, v)| (tag, truthy(&v))).collect(),
        _ => BTreeMap::new(),
    })
}

impl Guest {
    /// A guest with a known current room is on site.
    pub fn is_present(&self) -> bool {
        self.current_room.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Tags set to true, in key order.
    pub fn active_tags(&self) -> Vec<&str> {
        self.tags
            .iter()
            .filter(|(_, on)| **on)
            .map(|(tag, _)| tag.as_str())
            .collect()
    }
}

/// Current shape: per-guest map plus per-room counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestRoster {
    #[serde(default)]
    pub count: Option<Reading>,
    #[serde(default)]
    pub last_activity: Option<Reading>,
    #[serde(default, deserialize_with = "guest_map")]
    pub guests: BTreeMap<String, Guest>,
    /// Visitor count per room; null counts are kept and shown as a placeholder.
    #[serde(default)]
    pub rooms: BTreeMap<String, Option<Reading>>,
}

// Entries that are not guest objects are dropped; the rest of the roster still renders.
fn guest_map<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, Guest>, D::Error> {
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .filter(|(_, guest)| guest.is_object())
        .filter_map(|(id, guest)| Some((id, serde_json::from_value(guest).ok()?)))
        .collect())
}

/// Older shape: a total and a free-form room list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisitorTotals {
    #[serde(default)]
    pub total: Option<Reading>,
    #[serde(default)]
    pub rooms: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VisitorsSnapshot {
    Guests(GuestRoster),
    Totals(VisitorTotals),
}

impl VisitorsSnapshot {
    /// `guests` or `count` selects the roster shape, `total` the older one.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        use serde::de::Error;
        let Some(obj) = value.as_object() else {
            return Err(serde_json::Error::custom("visitors payload is not an object"));
        };
        if obj.contains_key("guests") || obj.contains_key("count") {
            Ok(VisitorsSnapshot::Guests(serde_json::from_value(value)?))
        } else if obj.contains_key("total") {
            Ok(VisitorsSnapshot::Totals(serde_json::from_value(value)?))
        } else {
            Err(serde_json::Error::custom(
                "visitors payload has neither guests/count nor total",
            ))
        }
    }
}

impl<'de> Deserialize<'de> for VisitorsSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        VisitorsSnapshot::from_value(value).map_err(serde::de::Error::custom)
    }
}
