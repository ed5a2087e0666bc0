/// PulseAudio loopback routing and sink control
pub mod pulse;
