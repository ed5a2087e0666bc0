use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{PowerControl, SinkInfo, SourceSelector, VolumeController};
use crate::{
    config::{PlayerConfig, SourceConfig},
    services::pulse::{PulseError, Volume, bridge::PulseBridge},
};

/// A sink exposed as a media player
///
/// The player is on while one of its configured sources is looped back into
/// the sink; selecting a source unloads the loopbacks of all others.
#[derive(Debug)]
pub struct SinkPlayer {
    name: String,
    sink_name: String,
    sources: Vec<SourceConfig>,
    candidates: Vec<String>,
    bridge: Arc<PulseBridge>,
    sink: Option<SinkInfo>,
    current_source: Option<String>,
    last_source: Option<String>,
}

/// Point-in-time view of a player
#[derive(Debug, Clone, Serialize)]
pub struct PlayerStatus {
    /// Display name
    pub name: String,
    /// Stable identifier
    pub unique_id: String,
    /// Whether the sink is present and its server reachable
    pub available: bool,
    /// Whether a source is routed into the sink
    pub on: bool,
    /// Active source display name
    pub source: Option<String>,
    /// Configured source display names
    pub source_list: Vec<String>,
    /// Level, 0.0 to 1.0
    pub volume: f64,
    /// Mute state
    pub muted: bool,
}

impl SinkPlayer {
    /// Player for `config` on `bridge`
    pub fn new(config: &PlayerConfig, bridge: Arc<PulseBridge>) -> Self {
        Self {
            name: config.name.clone(),
            sink_name: config.sink_name.clone(),
            candidates: config
                .sources
                .iter()
                .map(|source| source.source_name.clone())
                .collect(),
            sources: config.sources.clone(),
            bridge,
            sink: None,
            current_source: None,
            last_source: None,
        }
    }

    /// PulseAudio sink name
    pub fn sink_name(&self) -> &str {
        &self.sink_name
    }

    /// Bridge to the sink's server
    pub fn bridge(&self) -> &Arc<PulseBridge> {
        &self.bridge
    }

    /// Current state as a serializable value
    pub fn status(&self) -> PlayerStatus {
        PlayerStatus {
            name: self.name.clone(),
            unique_id: self.unique_id(),
            available: self.available(),
            on: self.is_on(),
            source: self.current_source.clone(),
            source_list: self.source_list().into_iter().map(str::to_string).collect(),
            volume: self.volume_level(),
            muted: self.is_volume_muted(),
        }
    }

    fn source_name(&self, display: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|source| source.name == display)
            .map(|source| source.source_name.as_str())
    }

    fn display_name(&self, source_name: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|source| source.source_name == source_name)
            .map(|source| source.name.as_str())
    }

    fn sink(&self) -> Result<&SinkInfo, PulseError> {
        self.sink
            .as_ref()
            .ok_or_else(|| PulseError::SinkNotFound(self.sink_name.clone()))
    }
}

#[async_trait]
impl PowerControl for SinkPlayer {
    type Error = PulseError;

    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> String {
        format!("{}-{}", self.bridge.server_id(), self.sink_name)
    }

    fn available(&self) -> bool {
        self.sink.is_some() && self.bridge.connected()
    }

    fn is_on(&self) -> bool {
        self.current_source.is_some()
    }

    /// Restores the last active source, else the first configured one
    async fn turn_on(&mut self) -> Result<(), PulseError> {
        if self.is_on() {
            return Ok(());
        }

        let target = self
            .last_source
            .clone()
            .or_else(|| self.sources.first().map(|source| source.name.clone()));
        match target {
            Some(source) => self.select_source(&source).await,
            None => Ok(()),
        }
    }

    #[instrument(skip(self), fields(player = %self.name))]
    async fn turn_off(&mut self) -> Result<(), PulseError> {
        self.bridge
            .reconcile(&self.sink_name, None, &self.candidates)
            .await?;
        self.current_source = None;
        Ok(())
    }

    async fn update(&mut self) {
        let snapshot = self.bridge.snapshot();
        self.sink = snapshot.sink(&self.sink_name).cloned();

        let active = snapshot
            .connected_source(&self.sink_name, &self.candidates)
            .and_then(|source_name| self.display_name(source_name))
            .map(str::to_string);
        if active.is_some() {
            self.last_source.clone_from(&active);
        }
        debug!(player = %self.name, source = ?active, "Player updated");
        self.current_source = active;
    }
}

#[async_trait]
impl SourceSelector for SinkPlayer {
    fn source(&self) -> Option<&str> {
        self.current_source.as_deref()
    }

    fn source_list(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name.as_str()).collect()
    }

    #[instrument(skip(self), fields(player = %self.name))]
    async fn select_source(&mut self, source: &str) -> Result<(), PulseError> {
        let source_name = self
            .source_name(source)
            .ok_or_else(|| PulseError::UnknownSource(source.to_string()))?
            .to_string();

        self.bridge
            .reconcile(&self.sink_name, Some(&source_name), &self.candidates)
            .await?;
        self.current_source = Some(source.to_string());
        self.last_source = Some(source.to_string());
        Ok(())
    }
}

#[async_trait]
impl VolumeController for SinkPlayer {
    fn volume_level(&self) -> f64 {
        self.sink
            .as_ref()
            .map_or(0.0, |sink| sink.volume.average().min(1.0))
    }

    fn is_volume_muted(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| sink.muted)
    }

    async fn set_volume_level(&mut self, level: f64) -> Result<(), PulseError> {
        let level = level.clamp(0.0, 1.0);
        let sink = self.sink()?.clone();
        self.bridge.set_sink_volume(&sink, level).await?;

        if let Some(sink) = self.sink.as_mut() {
            sink.volume = Volume::uniform(level, sink.channels());
        }
        Ok(())
    }

    async fn mute_volume(&mut self, mute: bool) -> Result<(), PulseError> {
        let index = self.sink()?.index;
        self.bridge.set_sink_mute(index, mute).await?;

        if let Some(sink) = self.sink.as_mut() {
            sink.muted = mute;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::services::pulse::{backend::CliConnection, fake::MemoryServer};

    fn config() -> PlayerConfig {
        PlayerConfig {
            name: "Living Room".to_string(),
            sink_name: "out".to_string(),
            sources: vec![
                SourceConfig {
                    name: "TV".to_string(),
                    source_name: "hdmi".to_string(),
                },
                SourceConfig {
                    name: "Turntable".to_string(),
                    source_name: "line".to_string(),
                },
            ],
            server: Default::default(),
        }
    }

    async fn player(server: &MemoryServer) -> SinkPlayer {
        let server = server.clone();
        let bridge = PulseBridge::spawn("memory:4712", Duration::from_millis(20), move || {
            CliConnection::new(server)
        })
        .unwrap();
        bridge.refresh().await.unwrap();

        let mut player = SinkPlayer::new(&config(), Arc::new(bridge));
        player.update().await;
        player
    }

    async fn settle(player: &mut SinkPlayer) {
        player.bridge().refresh().await.unwrap();
        player.update().await;
    }

    #[tokio::test]
    async fn update_maps_routed_source_to_display_name() {
        let server = MemoryServer::new()
            .with_sink(1, "out")
            .with_module("module-loopback", "sink=out source=line");
        let player = player(&server).await;

        assert!(player.available());
        assert!(player.is_on());
        assert_eq!(player.source(), Some("Turntable"));
        assert_eq!(player.source_list(), vec!["TV", "Turntable"]);
        assert_eq!(player.unique_id(), "memory:4712-out");
    }

    #[tokio::test]
    async fn missing_sink_is_unavailable() {
        let server = MemoryServer::new();
        let player = player(&server).await;

        assert!(!player.available());
        assert!(!player.is_on());
    }

    #[tokio::test]
    async fn select_source_switches_loopbacks() {
        let server = MemoryServer::new()
            .with_sink(1, "out")
            .with_module("module-loopback", "sink=out source=line");
        let mut player = player(&server).await;

        player.select_source("TV").await.unwrap();
        settle(&mut player).await;

        assert_eq!(server.loopbacks(), vec!["sink=out source=hdmi"]);
        assert_eq!(player.source(), Some("TV"));
    }

    #[tokio::test]
    async fn unknown_source_is_rejected() {
        let server = MemoryServer::new().with_sink(1, "out");
        let mut player = player(&server).await;

        let result = player.select_source("Radio").await;

        assert!(matches!(result, Err(PulseError::UnknownSource(_))));
        assert!(server.loopbacks().is_empty());
    }

    #[tokio::test]
    async fn turn_off_then_on_restores_last_source() {
        let server = MemoryServer::new()
            .with_sink(1, "out")
            .with_module("module-loopback", "sink=out source=line");
        let mut player = player(&server).await;

        player.turn_off().await.unwrap();
        settle(&mut player).await;
        assert!(!player.is_on());
        assert!(server.loopbacks().is_empty());

        player.turn_on().await.unwrap();
        settle(&mut player).await;
        assert_eq!(player.source(), Some("Turntable"));
        assert_eq!(server.loopbacks(), vec!["sink=out source=line"]);
    }

    #[tokio::test]
    async fn turn_on_without_history_uses_first_source() {
        let server = MemoryServer::new().with_sink(1, "out");
        let mut player = player(&server).await;

        player.turn_on().await.unwrap();

        assert_eq!(player.source(), Some("TV"));
        assert_eq!(server.loopbacks(), vec!["sink=out source=hdmi"]);
    }

    #[tokio::test]
    async fn volume_steps_and_clamps() {
        let server = MemoryServer::new().with_sink(1, "out");
        let mut player = player(&server).await;

        player.set_volume_level(0.5).await.unwrap();
        player.volume_down().await.unwrap();
        assert_eq!(server.sink_state("out"), Some((29491, false)));

        player.volume_up().await.unwrap();
        player.volume_up().await.unwrap();
        assert!((player.volume_level() - 0.55).abs() < 1e-9);

        player.set_volume_level(3.0).await.unwrap();
        assert_eq!(server.sink_state("out"), Some((65536, false)));
    }

    #[tokio::test]
    async fn mute_reaches_the_sink() {
        let server = MemoryServer::new().with_sink(1, "out");
        let mut player = player(&server).await;

        player.mute_volume(true).await.unwrap();
        settle(&mut player).await;

        assert!(player.is_volume_muted());
        assert_eq!(server.sink_state("out"), Some((65536, true)));
    }

    #[tokio::test]
    async fn volume_without_sink_fails() {
        let server = MemoryServer::new();
        let mut player = player(&server).await;

        assert!(matches!(
            player.set_volume_level(0.3).await,
            Err(PulseError::SinkNotFound(_))
        ));
    }
}
