mod error;
mod types;

pub use error::VolumeError;
pub use types::Volume;
