use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::notify::NotificationTiming;
use crate::poller::{OverlapPolicy, PollerConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub pages: PagesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Scheme and host of the dashboard server; `/api/...` is appended.
    pub base_url: String,
    /// Per-request timeout. 0 or absent leaves requests unbounded.
    #[serde(default)]
    pub request_timeout_ms: u64,
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default)]
    pub overlap: OverlapPolicy,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    #[serde(default = "default_battery_interval_ms")]
    pub battery_interval_ms: u64,
    #[serde(default = "default_floors_interval_ms")]
    pub floors_interval_ms: u64,
    #[serde(default = "default_detail_interval_ms")]
    pub floor_detail_interval_ms: u64,
    #[serde(default = "default_detail_interval_ms")]
    pub room_detail_interval_ms: u64,
    #[serde(default = "default_visitors_interval_ms")]
    pub visitors_interval_ms: u64,
}

fn default_channel_capacity() -> usize {
    16
}

fn default_battery_interval_ms() -> u64 {
    30_000
}

fn default_floors_interval_ms() -> u64 {
    60_000
}

fn default_detail_interval_ms() -> u64 {
    30_000
}

fn default_visitors_interval_ms() -> u64 {
    30_000
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::default(),
            channel_capacity: default_channel_capacity(),
            battery_interval_ms: default_battery_interval_ms(),
            floors_interval_ms: default_floors_interval_ms(),
            floor_detail_interval_ms: default_detail_interval_ms(),
            room_detail_interval_ms: default_detail_interval_ms(),
            visitors_interval_ms: default_visitors_interval_ms(),
        }
    }
}

impl PollingConfig {
    pub fn poller(&self, interval_ms: u64) -> PollerConfig {
        PollerConfig {
            interval: Duration::from_millis(interval_ms),
            overlap: self.overlap,
            channel_capacity: self.channel_capacity,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_display_ms")]
    pub display_ms: u64,
    #[serde(default = "default_enter_delay_ms")]
    pub enter_delay_ms: u64,
    #[serde(default = "default_exit_transition_ms")]
    pub exit_transition_ms: u64,
}

fn default_display_ms() -> u64 {
    3000
}

fn default_enter_delay_ms() -> u64 {
    10
}

fn default_exit_transition_ms() -> u64 {
    300
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            display_ms: default_display_ms(),
            enter_delay_ms: default_enter_delay_ms(),
            exit_transition_ms: default_exit_transition_ms(),
        }
    }
}

impl NotificationsConfig {
    pub fn timing(&self) -> NotificationTiming {
        NotificationTiming {
            enter_delay: Duration::from_millis(self.enter_delay_ms),
            display: Duration::from_millis(self.display_ms),
            exit_transition: Duration::from_millis(self.exit_transition_ms),
        }
    }
}

/// Which views the client keeps live.
#[derive(Debug, Clone, Deserialize)]
pub struct PagesConfig {
    #[serde(default = "default_true")]
    pub battery: bool,
    #[serde(default = "default_true")]
    pub floors: bool,
    #[serde(default = "default_true")]
    pub visitors: bool,
    /// Floor cards on the floors page, and one floor detail page each.
    #[serde(default)]
    pub floor_ids: Vec<String>,
    /// One room detail page each.
    #[serde(default)]
    pub room_ids: Vec<String>,
    /// Appliance controls per room page, keyed by room id.
    #[serde(default)]
    pub appliances: BTreeMap<String, Vec<String>>,
}

impl PagesConfig {
    pub fn appliance_ids(&self, room_id: &str) -> Vec<String> {
        self.appliances.get(room_id).cloned().unwrap_or_default()
    }
}

fn default_true() -> bool {
    true
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            battery: true,
            floors: true,
            visitors: true,
            floor_ids: Vec::new(),
            room_ids: Vec::new(),
            appliances: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"),
            "api.base_url must start with http:// or https://, got {:?}",
            self.api.base_url
        );
        anyhow::ensure!(
            self.polling.channel_capacity > 0,
            "polling.channel_capacity must be > 0, got {}",
            self.polling.channel_capacity
        );
        for (key, value) in [
            ("polling.battery_interval_ms", self.polling.battery_interval_ms),
            ("polling.floors_interval_ms", self.polling.floors_interval_ms),
            (
                "polling.floor_detail_interval_ms",
                self.polling.floor_detail_interval_ms,
            ),
            (
                "polling.room_detail_interval_ms",
                self.polling.room_detail_interval_ms,
            ),
            ("polling.visitors_interval_ms", self.polling.visitors_interval_ms),
            ("notifications.display_ms", self.notifications.display_ms),
        ] {
            anyhow::ensure!(value > 0, "{} must be > 0, got {}", key, value);
        }
        anyhow::ensure!(
            self.notifications.enter_delay_ms < self.notifications.display_ms,
            "notifications.enter_delay_ms must be < notifications.display_ms, got {} >= {}",
            self.notifications.enter_delay_ms,
            self.notifications.display_ms
        );
        anyhow::ensure!(
            self.pages
                .floor_ids
                .iter()
                .chain(&self.pages.room_ids)
                .all(|id| !id.trim().is_empty() && !id.contains('/')),
            "pages.floor_ids and pages.room_ids must be non-empty and must not contain '/'"
        );
        for (room_id, appliance_ids) in &self.pages.appliances {
            anyhow::ensure!(
                self.pages.room_ids.contains(room_id),
                "pages.appliances.{} has no matching entry in pages.room_ids",
                room_id
            );
            anyhow::ensure!(
                appliance_ids.iter().all(|id| !id.trim().is_empty()),
                "pages.appliances.{} must not contain empty ids",
                room_id
            );
        }
        Ok(())
    }
}
