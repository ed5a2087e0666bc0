use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::services::pulse::protocol::ProtocolClient;

/// How a server is reached.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Text commands over `module-cli-protocol-tcp`.
    #[default]
    Cli,

    /// libpulse native protocol. Needs the `native` cargo feature.
    Native,
}

/// Connection settings for one PulseAudio server.
///
/// Devices that resolve to the same [`ServerConfig::server_id`] share one
/// connection worker.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host running `module-cli-protocol-tcp`.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port of the CLI protocol module.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Receive chunk size in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Connect and read timeout in seconds.
    #[serde(default = "default_tcp_timeout")]
    pub tcp_timeout: u64,

    /// Protocol used to talk to the server.
    #[serde(default)]
    pub backend: Backend,

    /// libpulse server string for the native backend, e.g. `tcp:nuc:4713`.
    /// The default server is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    4712
}

fn default_buffer_size() -> usize {
    1024
}

fn default_tcp_timeout() -> u64 {
    3
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            buffer_size: default_buffer_size(),
            tcp_timeout: default_tcp_timeout(),
            backend: Backend::default(),
            server: None,
        }
    }
}

impl ServerConfig {
    /// Key under which devices share a connection.
    pub fn server_id(&self) -> String {
        match self.backend {
            Backend::Cli => format!("{}:{}", self.host, self.port),
            Backend::Native => self
                .server
                .clone()
                .unwrap_or_else(|| "default".to_string()),
        }
    }

    /// Connect and read timeout.
    pub fn tcp_timeout(&self) -> Duration {
        Duration::from_secs(self.tcp_timeout)
    }

    /// Text-protocol client for this server.
    pub fn client(&self) -> ProtocolClient {
        ProtocolClient::new(
            self.host.clone(),
            self.port,
            self.buffer_size,
            self.tcp_timeout(),
        )
    }
}
