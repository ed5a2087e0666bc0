/// Rejected volume input
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VolumeError {
    /// Level outside the accepted range
    #[error("volume {volume} is outside 0.0..={max}")]
    InvalidVolume {
        /// Requested level
        volume: f64,
        /// Highest accepted level
        max: f64,
    },
}
