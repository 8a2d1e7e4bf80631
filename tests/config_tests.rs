// Config loading and validation tests

use energy_dashboard::config::AppConfig;
use energy_dashboard::poller::OverlapPolicy;
use std::time::Duration;

const VALID_CONFIG: &str = r#"
[api]
base_url = "http://localhost:5004"
request_timeout_ms = 5000

[polling]
overlap = "allow"
channel_capacity = 8
battery_interval_ms = 30000
floors_interval_ms = 60000
floor_detail_interval_ms = 30000
room_detail_interval_ms = 30000
visitors_interval_ms = 15000

[notifications]
display_ms = 3000
enter_delay_ms = 10
exit_transition_ms = 300

[pages]
battery = true
floors = false
floor_ids = ["floor1", "floor2"]
room_ids = ["room1"]
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.api.base_url, "http://localhost:5004");
    assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(5)));
    assert_eq!(config.polling.overlap, OverlapPolicy::Allow);
    assert_eq!(config.polling.channel_capacity, 8);
    assert_eq!(config.polling.visitors_interval_ms, 15000);
    assert!(config.pages.battery);
    assert!(!config.pages.floors);
    assert!(config.pages.visitors);
    assert_eq!(config.pages.floor_ids, vec!["floor1", "floor2"]);
    assert_eq!(config.pages.room_ids, vec!["room1"]);
}

#[test]
fn test_config_defaults_when_sections_missing() {
    let config =
        AppConfig::load_from_str("[api]\nbase_url = \"https://dash.local\"\n").expect("defaults");
    assert_eq!(config.api.request_timeout(), None);
    assert_eq!(config.polling.overlap, OverlapPolicy::Serialize);
    assert_eq!(config.polling.battery_interval_ms, 30_000);
    assert_eq!(config.polling.floors_interval_ms, 60_000);
    assert_eq!(config.polling.floor_detail_interval_ms, 30_000);
    assert_eq!(config.polling.room_detail_interval_ms, 30_000);
    assert_eq!(config.polling.visitors_interval_ms, 30_000);

    let timing = config.notifications.timing();
    assert_eq!(timing.enter_delay, Duration::from_millis(10));
    assert_eq!(timing.display, Duration::from_millis(3000));
    assert_eq!(timing.exit_transition, Duration::from_millis(300));
    assert!(config.pages.floor_ids.is_empty());
}

#[test]
fn test_poller_config_from_polling_section() {
    let config = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    let poller = config.polling.poller(config.polling.battery_interval_ms);
    assert_eq!(poller.interval, Duration::from_secs(30));
    assert_eq!(poller.overlap, OverlapPolicy::Allow);
    assert_eq!(poller.channel_capacity, 8);
}

#[test]
fn test_config_validation_rejects_bad_base_url() {
    let bad = VALID_CONFIG.replace("http://localhost:5004", "localhost:5004");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("api.base_url"));
}

#[test]
fn test_config_validation_rejects_zero_interval() {
    let bad = VALID_CONFIG.replace("battery_interval_ms = 30000", "battery_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("polling.battery_interval_ms"));

    let bad = VALID_CONFIG.replace("visitors_interval_ms = 15000", "visitors_interval_ms = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("polling.visitors_interval_ms"));
}

#[test]
fn test_config_validation_rejects_channel_capacity_zero() {
    let bad = VALID_CONFIG.replace("channel_capacity = 8", "channel_capacity = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("channel_capacity"));
}

#[test]
fn test_config_validation_rejects_enter_delay_past_display() {
    let bad = VALID_CONFIG.replace("enter_delay_ms = 10", "enter_delay_ms = 3000");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("enter_delay_ms"));
}

#[test]
fn test_config_validation_rejects_ids_with_slash() {
    let bad = VALID_CONFIG.replace("\"room1\"", "\"room/1\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("pages.floor_ids"));

    let bad = VALID_CONFIG.replace("\"floor2\"", "\"  \"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_reads_room_appliances() {
    let with_appliances =
        format!("{VALID_CONFIG}\n[pages.appliances]\nroom1 = [\"fridge\", \"tv\"]\n");
    let config = AppConfig::load_from_str(&with_appliances).expect("appliances");
    assert_eq!(config.pages.appliance_ids("room1"), vec!["fridge", "tv"]);
    assert!(config.pages.appliance_ids("room2").is_empty());

    let config = AppConfig::load_from_str(VALID_CONFIG).expect("no appliances");
    assert!(config.pages.appliance_ids("room1").is_empty());
}

#[test]
fn test_config_validation_rejects_appliances_for_unlisted_room() {
    let bad = format!("{VALID_CONFIG}\n[pages.appliances]\nroom9 = [\"fridge\"]\n");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("pages.appliances.room9"));

    let bad = format!("{VALID_CONFIG}\n[pages.appliances]\nroom1 = [\"fridge\", \" \"]\n");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("pages.appliances.room1"));
}

#[test]
fn test_config_rejects_unknown_overlap_policy() {
    let bad = VALID_CONFIG.replace("overlap = \"allow\"", "overlap = \"queue\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_rejects_invalid_toml() {
    assert!(AppConfig::load_from_str("[api\nbase_url = ").is_err());
    assert!(AppConfig::load_from_str("[polling]\nbattery_interval_ms = 1000\n").is_err());
}

#[test]
fn test_config_load_reads_config_file_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dashboard.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();

    // Only test in this binary that touches CONFIG_FILE.
    unsafe { std::env::set_var("CONFIG_FILE", &path) };
    let config = AppConfig::load().expect("load");
    unsafe { std::env::remove_var("CONFIG_FILE") };

    assert_eq!(config.polling.channel_capacity, 8);
}
