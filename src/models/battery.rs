// GET /api/battery

use serde::{Deserialize, Serialize};

use super::Reading;

/// Battery and solar state. Every field is optional; the view shows `--` for gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatterySnapshot {
    pub percentage: Option<Reading>,
    pub capacity: Option<Reading>,
    pub life: Option<Reading>,
    pub health: Option<Reading>,
    pub charging_rate: Option<Reading>,
    pub discharging_rate: Option<Reading>,
    pub solar_active: Option<bool>,
}

impl BatterySnapshot {
    /// Charge level in percent; missing or non-numeric reads as 0.
    pub fn level(&self) -> f64 {
        self.percentage
            .as_ref()
            .and_then(Reading::as_f64)
            .unwrap_or(0.0)
    }
}
