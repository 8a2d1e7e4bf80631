// Status bucket and appliance on/off state

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Coarse health classification driving colour coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Optimal,
    SubOptimal,
    Critical,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Optimal, Status::SubOptimal, Status::Critical];

    /// Exact wire value, or None for anything unrecognised.
    pub fn from_known(s: &str) -> Option<Self> {
        match s {
            "optimal" => Some(Status::Optimal),
            "sub-optimal" => Some(Status::SubOptimal),
            "critical" => Some(Status::Critical),
            _ => None,
        }
    }

    /// Unknown values fall back to optimal.
    pub fn parse(s: &str) -> Self {
        Self::from_known(s).unwrap_or_default()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Optimal => "optimal",
            Status::SubOptimal => "sub-optimal",
            Status::Critical => "critical",
        }
    }

    /// Display text: first letter capitalised (`Sub-optimal`).
    pub fn label(self) -> &'static str {
        match self {
            Status::Optimal => "Optimal",
            Status::SubOptimal => "Sub-optimal",
            Status::Critical => "Critical",
        }
    }

    /// Badge colour on the dashboard overview.
    pub fn color(self) -> &'static str {
        match self {
            Status::Optimal => "#10B981",
            Status::SubOptimal => "#F59E0B",
            Status::Critical => "#EF4444",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Any JSON value is accepted; non-strings fall back to the default.
impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Status::parse).unwrap_or_default())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Appliance power state; the payload of a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApplianceState {
    On,
    #[default]
    Off,
}

impl ApplianceState {
    /// Case-insensitive; anything but `on` (including a missing value) is off.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("on") {
            ApplianceState::On
        } else {
            ApplianceState::Off
        }
    }

    pub fn from_attr(value: Option<&str>) -> Self {
        value.map(Self::parse).unwrap_or_default()
    }

    pub fn inverse(self) -> Self {
        match self {
            ApplianceState::On => ApplianceState::Off,
            ApplianceState::Off => ApplianceState::On,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplianceState::On => "on",
            ApplianceState::Off => "off",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ApplianceState::On => "ON",
            ApplianceState::Off => "OFF",
        }
    }

    pub fn color_class(self) -> &'static str {
        match self {
            ApplianceState::On => "text-green-600",
            ApplianceState::Off => "text-gray-600",
        }
    }

    /// `turned on` / `turned off`, for the confirmation banner.
    pub fn verb(self) -> &'static str {
        match self {
            ApplianceState::On => "turned on",
            ApplianceState::Off => "turned off",
        }
    }
}

impl fmt::Display for ApplianceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ApplianceState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(ApplianceState::parse).unwrap_or_default())
    }
}

impl Serialize for ApplianceState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
