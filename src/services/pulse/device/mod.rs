/// Device control traits
pub mod control;
/// Sink, source and module types
pub mod info;
/// Sink exposed as a media player
pub mod player;
/// Single loopback exposed as a switch
pub mod switch;

pub use control::*;
pub use info::*;
pub use player::{PlayerStatus, SinkPlayer};
pub use switch::{LoopbackSwitch, SwitchStatus};
