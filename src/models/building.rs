// Floors, rooms and appliances: GET /api/floors, /api/floor/{id}, /api/room/{id}

use serde::{Deserialize, Serialize};

use super::{ApplianceState, Reading, Status, id_string};

/// One floor in the floors list, or one room card on a floor page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSummary {
    #[serde(default, deserialize_with = "id_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub consumption: Option<Reading>,
    #[serde(default)]
    pub status: Option<Status>,
}

impl AreaSummary {
    pub fn status(&self) -> Status {
        self.status.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorDetailSnapshot {
    #[serde(default)]
    pub floor: Option<AreaSummary>,
    #[serde(default)]
    pub rooms: Option<Vec<AreaSummary>>,
}

/// Overview block of a room page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    #[serde(default)]
    pub consumption: Option<Reading>,
    #[serde(default)]
    pub status: Option<Status>,
    #[serde(default)]
    pub avg_consumption: Option<Reading>,
    #[serde(default)]
    pub peak_time: Option<Reading>,
    #[serde(default)]
    pub efficiency: Option<Reading>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    #[serde(default, deserialize_with = "id_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub state: Option<ApplianceState>,
}

impl Appliance {
    pub fn state(&self) -> ApplianceState {
        self.state.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailSnapshot {
    #[serde(default)]
    pub room: Option<RoomInfo>,
    #[serde(default)]
    pub appliances: Option<Vec<Appliance>>,
}
