//! Commands end to end against a TCP server.

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod common;

use std::{fs, sync::Arc};

use common::FakePulse;
use pulselink::{
    cli::{CliError, CliService},
    config::Config,
    service_manager::Services,
};
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    services: Arc<Services>,
    cli: CliService,
}

impl Harness {
    fn new(server: &FakePulse) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            format!(
                r#"
[general]
poll_interval_ms = 50

[[players]]
name = "Living Room"
sink_name = "living_room"
sources = [
    {{ name = "TV", source_name = "tv" }},
    {{ name = "Radio", source_name = "radio" }},
]
server = {{ host = "127.0.0.1", port = {port}, tcp_timeout = 1 }}

[[switches]]
name = "Kitchen"
sink_name = "kitchen"
source_name = "radio"
server = {{ host = "127.0.0.1", port = {port}, tcp_timeout = 1 }}
"#,
                port = server.port()
            ),
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let services = Arc::new(Services::new(config, path).unwrap());
        let cli = CliService::new(services.clone());
        Self {
            _dir: dir,
            services,
            cli,
        }
    }

    async fn run(&self, line: &[&str]) -> Result<String, CliError> {
        let args: Vec<String> = line.iter().map(|arg| arg.to_string()).collect();
        self.cli.execute_command(&args[0], &args[1], &args[2..]).await
    }
}

fn server() -> FakePulse {
    FakePulse::start()
        .with_sink(1, "living_room")
        .with_sink(2, "kitchen")
        .with_source(3, "tv")
        .with_source(4, "radio")
}

#[tokio::test]
async fn both_devices_share_one_bridge() {
    let server = server();
    let harness = Harness::new(&server);

    assert_eq!(harness.services.bridges.len(), 1);
    harness.services.shutdown().await;
}

#[tokio::test]
async fn select_routes_the_source() {
    let server = server().with_loopback("living_room", "tv");
    let harness = Harness::new(&server);

    let output = harness
        .run(&["loopback", "select", "Living Room", "Radio"])
        .await
        .unwrap();

    assert_eq!(output, "Living Room now plays Radio");
    assert_eq!(server.loopbacks(), vec!["sink=living_room source=radio"]);
}

#[tokio::test]
async fn select_rejects_unknown_names() {
    let server = server();
    let harness = Harness::new(&server);

    let unknown_player = harness.run(&["loopback", "select", "Attic", "TV"]).await;
    let unknown_source = harness
        .run(&["loopback", "select", "Living Room", "Vinyl"])
        .await;

    assert!(matches!(unknown_player, Err(CliError::InvalidArgument { arg, .. }) if arg == "device"));
    assert!(matches!(unknown_source, Err(CliError::InvalidArgument { arg, .. }) if arg == "source"));
    assert!(server.loopbacks().is_empty());
}

#[tokio::test]
async fn connect_and_disconnect_a_switch() {
    let server = server();
    let harness = Harness::new(&server);

    harness.run(&["loopback", "connect", "Kitchen"]).await.unwrap();
    assert_eq!(server.loopbacks(), vec!["sink=kitchen source=radio"]);

    harness
        .run(&["loopback", "disconnect", "Kitchen"])
        .await
        .unwrap();
    assert!(server.loopbacks().is_empty());
}

#[tokio::test]
async fn status_reports_json() {
    let server = server()
        .with_loopback("living_room", "radio")
        .with_loopback("kitchen", "radio");
    let harness = Harness::new(&server);

    let output = harness.run(&["loopback", "status", "json"]).await.unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(report["players"][0]["source"], "Radio");
    assert_eq!(report["players"][0]["available"], true);
    assert_eq!(report["switches"][0]["on"], true);
}

#[tokio::test]
async fn volume_and_mute_reach_the_sink() {
    let server = server();
    let harness = Harness::new(&server);

    let output = harness
        .run(&["sink", "volume", "Living Room", "25"])
        .await
        .unwrap();
    assert!(output.ends_with("25%"));
    assert_eq!(server.sink_state("living_room"), Some((16384, false)));

    harness.run(&["sink", "mute", "Living Room"]).await.unwrap();
    assert_eq!(server.sink_state("living_room"), Some((16384, true)));
}

#[tokio::test]
async fn modules_lists_loopbacks_directly() {
    let server = server().with_loopback("kitchen", "radio");
    let harness = Harness::new(&server);

    let output = harness.run(&["loopback", "modules"]).await.unwrap();

    assert!(output.contains("sink=kitchen source=radio"));
}

#[tokio::test]
async fn sink_list_shows_live_devices() {
    let server = server();
    let harness = Harness::new(&server);

    let output = harness.run(&["sink", "list"]).await.unwrap();

    assert!(output.contains("living_room"));
    assert!(output.contains("radio"));
}

#[tokio::test]
async fn config_commands_work_offline() {
    let mut server = server();
    let harness = Harness::new(&server);
    server.stop();

    let shown = harness.run(&["config", "show", "--offline"]).await.unwrap();
    let schema = harness.run(&["config", "schema"]).await.unwrap();
    let files = harness.run(&["config", "files"]).await.unwrap();

    assert!(shown.contains("Living Room"));
    assert!(schema.contains("\"players\""));
    assert!(files.ends_with("config.toml"));
}

#[tokio::test]
async fn unavailable_player_is_reported() {
    let mut server = server();
    let harness = Harness::new(&server);
    server.stop();

    let result = harness.run(&["sink", "volume", "Living Room", "up"]).await;

    assert!(matches!(result, Err(CliError::ServiceError { .. })));
}
