//! Configuration types, defaults and validation. All in-memory.

use std::time::Duration;

use crate::{
    PulselinkError,
    config::{
        Backend, Config, LogLevel, MAX_BUFFER_SIZE, MAX_TCP_TIMEOUT_SECS, ServerConfig,
    },
};

const LIVING_ROOM: &str = r#"
    [general]
    log_level = "debug"

    [[players]]
    name = "Living Room"
    sink_name = "speakers"
    sources = [
        { name = "TV", source_name = "hdmi" },
        { name = "Turntable", source_name = "line" },
    ]
    server = { host = "nuc", port = 4713 }

    [[switches]]
    name = "Kitchen Radio"
    sink_name = "kitchen"
    source_name = "radio"
"#;

#[test]
fn defaults_match_the_cli_module() {
    let server = ServerConfig::default();

    assert_eq!(server.host, "localhost");
    assert_eq!(server.port, 4712);
    assert_eq!(server.buffer_size, 1024);
    assert_eq!(server.tcp_timeout(), Duration::from_secs(3));
    assert_eq!(server.backend, Backend::Cli);
    assert_eq!(server.server_id(), "localhost:4712");
}

#[test]
fn empty_toml_is_a_valid_config() {
    let config: Config = toml::from_str("").unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.general.poll_interval(), Duration::from_secs(2));
    assert!(config.validate().is_ok());
}

#[test]
fn players_and_switches_deserialize() {
    let config: Config = toml::from_str(LIVING_ROOM).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    let player = config.player("Living Room").unwrap();
    assert_eq!(player.sources[1].source_name, "line");
    assert_eq!(player.server.server_id(), "nuc:4713");
    assert_eq!(player.server.buffer_size, 1024);
    assert_eq!(config.switches[0].server.server_id(), "localhost:4712");
    assert!(config.validate().is_ok());
}

#[test]
fn servers_are_deduplicated_by_id() {
    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.switches[0].server = config.players[0].server.clone();

    assert_eq!(config.servers().len(), 1);
}

#[test]
fn serialize_roundtrip_keeps_devices() {
    let config: Config = toml::from_str(LIVING_ROOM).unwrap();

    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();

    assert_eq!(parsed, config);
}

#[test]
fn player_without_sources_is_rejected() {
    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.players[0].sources.clear();

    let error = config.validate().unwrap_err();
    assert!(matches!(
        error,
        PulselinkError::InvalidConfigField { ref field, .. } if field == "sources"
    ));
}

#[test]
fn zero_timeout_and_empty_sink_are_rejected() {
    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.players[0].server.tcp_timeout = 0;
    assert!(config.validate().is_err());

    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.switches[0].sink_name = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn oversized_timeout_is_rejected() {
    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.players[0].server.tcp_timeout = MAX_TCP_TIMEOUT_SECS;
    assert!(config.validate().is_ok());

    config.players[0].server.tcp_timeout = u64::MAX;
    assert!(matches!(
        config.validate(),
        Err(PulselinkError::InvalidConfigField { ref field, .. }) if field == "server.tcp_timeout"
    ));
}

#[test]
fn oversized_buffer_is_rejected() {
    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.switches[0].server.buffer_size = MAX_BUFFER_SIZE;
    assert!(config.validate().is_ok());

    config.switches[0].server.buffer_size = MAX_BUFFER_SIZE + 1;
    assert!(matches!(
        config.validate(),
        Err(PulselinkError::InvalidConfigField { ref field, .. }) if field == "server.buffer_size"
    ));
}

#[test]
fn duplicate_device_names_are_rejected() {
    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.switches[0].name = "Living Room".to_string();

    assert!(matches!(
        config.validate(),
        Err(PulselinkError::ConfigValidation { .. })
    ));
}

#[test]
fn duplicate_source_labels_are_rejected() {
    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.players[0].sources[1].name = "TV".to_string();

    assert!(config.validate().is_err());
}

#[cfg(not(feature = "native"))]
#[test]
fn native_backend_needs_the_feature() {
    let mut config: Config = toml::from_str(LIVING_ROOM).unwrap();
    config.players[0].server.backend = Backend::Native;

    assert!(config.validate().is_err());
}

#[test]
fn native_server_id_uses_server_string() {
    let server = ServerConfig {
        backend: Backend::Native,
        server: Some("tcp:nuc:4713".to_string()),
        ..ServerConfig::default()
    };

    assert_eq!(server.server_id(), "tcp:nuc:4713");
}
