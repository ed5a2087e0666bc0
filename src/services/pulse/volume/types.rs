use super::VolumeError;

/// Multi-channel volume with automatic clamping
///
/// Volume range: 0.0 (silent) to 4.0 (400% amplification)
/// - 0.0 = Silent
/// - 1.0 = Normal volume (100%, `PA_VOLUME_NORM`)
/// - 4.0 = Maximum amplification (400%)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Volume {
    volumes: Vec<f64>,
}

impl Volume {
    /// Raw PulseAudio value for 100%.
    pub const NORM_RAW: u32 = 0x10000;

    /// Highest accepted level.
    pub const MAX_LEVEL: f64 = 4.0;

    /// Create a new volume with the given channel volumes
    ///
    /// Levels are clamped to 0.0..=4.0.
    pub fn new(volumes: Vec<f64>) -> Self {
        let volumes = volumes
            .into_iter()
            .map(|v| v.clamp(0.0, Self::MAX_LEVEL))
            .collect();
        Self { volumes }
    }

    /// Same level on every channel
    pub fn uniform(level: f64, channels: usize) -> Self {
        Self::new(vec![level; channels.max(1)])
    }

    /// Same level on every channel, rejecting out-of-range input instead of clamping
    ///
    /// # Errors
    /// Returns `VolumeError::InvalidVolume` when `level` is negative, NaN, or above 4.0
    pub fn try_uniform(level: f64, channels: usize) -> Result<Self, VolumeError> {
        if !(0.0..=Self::MAX_LEVEL).contains(&level) {
            return Err(VolumeError::InvalidVolume {
                volume: level,
                max: Self::MAX_LEVEL,
            });
        }
        Ok(Self::uniform(level, channels))
    }

    /// Build from raw PulseAudio channel values (65536 = 100%)
    pub fn from_raw(raw: &[u32]) -> Self {
        Self::new(
            raw.iter()
                .map(|&r| f64::from(r) / f64::from(Self::NORM_RAW))
                .collect(),
        )
    }

    /// Average across all channels, the single value a media player shows
    pub fn average(&self) -> f64 {
        if self.volumes.is_empty() {
            0.0
        } else {
            self.volumes.iter().sum::<f64>() / self.volumes.len() as f64
        }
    }

    /// Average as a raw PulseAudio value
    pub fn average_raw(&self) -> u32 {
        (self.average() * f64::from(Self::NORM_RAW)).round() as u32
    }

    /// Get number of channels
    pub fn channels(&self) -> usize {
        self.volumes.len()
    }

    /// Get all channel volumes
    pub fn as_slice(&self) -> &[f64] {
        &self.volumes
    }
}
