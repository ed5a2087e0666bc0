use std::error::Error;

use async_trait::async_trait;

/// Volume change applied by [`VolumeController::volume_up`] and
/// [`VolumeController::volume_down`]
pub const VOLUME_STEP: f64 = 0.05;

/// Identity, availability and on/off state of an exposed device
#[async_trait]
pub trait PowerControl: Send {
    /// Error type for state changes
    type Error: Error + Send + Sync + 'static;

    /// Display name
    fn name(&self) -> &str;

    /// Stable identifier derived from the server and device names
    fn unique_id(&self) -> String;

    /// Whether the device can currently be controlled
    fn available(&self) -> bool;

    /// Whether the device is on
    fn is_on(&self) -> bool;

    /// Turn the device on
    ///
    /// # Errors
    /// Returns error if the server rejects or cannot receive the change
    async fn turn_on(&mut self) -> Result<(), Self::Error>;

    /// Turn the device off
    ///
    /// # Errors
    /// Returns error if the server rejects or cannot receive the change
    async fn turn_off(&mut self) -> Result<(), Self::Error>;

    /// Re-read state from the latest server snapshot
    async fn update(&mut self);
}

/// Choosing which configured source feeds a sink
#[async_trait]
pub trait SourceSelector: PowerControl {
    /// Display name of the active source
    fn source(&self) -> Option<&str>;

    /// Display names of every configured source, in priority order
    fn source_list(&self) -> Vec<&str>;

    /// Make `source` the only active source
    ///
    /// # Errors
    /// Returns error if `source` is not configured or the change fails
    async fn select_source(&mut self, source: &str) -> Result<(), Self::Error>;
}

/// Sink volume and mute
#[async_trait]
pub trait VolumeController: PowerControl {
    /// Current level, 0.0 to 1.0
    fn volume_level(&self) -> f64;

    /// Whether the sink is muted
    fn is_volume_muted(&self) -> bool;

    /// Set the level on every channel; clamped to 0.0..=1.0
    ///
    /// # Errors
    /// Returns error if the sink is unknown or the change fails
    async fn set_volume_level(&mut self, level: f64) -> Result<(), Self::Error>;

    /// Mute or unmute
    ///
    /// # Errors
    /// Returns error if the sink is unknown or the change fails
    async fn mute_volume(&mut self, mute: bool) -> Result<(), Self::Error>;

    /// Raise the level by [`VOLUME_STEP`]
    ///
    /// # Errors
    /// See [`VolumeController::set_volume_level`]
    async fn volume_up(&mut self) -> Result<(), Self::Error> {
        let level = self.volume_level() + VOLUME_STEP;
        self.set_volume_level(level).await
    }

    /// Lower the level by [`VOLUME_STEP`]
    ///
    /// # Errors
    /// See [`VolumeController::set_volume_level`]
    async fn volume_down(&mut self) -> Result<(), Self::Error> {
        let level = self.volume_level() - VOLUME_STEP;
        self.set_volume_level(level).await
    }
}
