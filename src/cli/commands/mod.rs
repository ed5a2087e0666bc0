pub mod config;
pub mod loopback;
pub mod sink;

use super::CliError;

fn unknown_device(name: &str) -> CliError {
    CliError::InvalidArgument {
        arg: "device".to_string(),
        reason: format!("no player or switch named '{name}'"),
    }
}

fn unavailable(name: &str) -> CliError {
    CliError::ServiceError {
        service: "PulseAudio".to_string(),
        details: format!("'{name}' is unavailable, check that its server is reachable"),
    }
}

/// `on`/`off` and the usual synonyms
fn parse_state(arg: &str, value: &str) -> Result<bool, CliError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(CliError::InvalidArgument {
            arg: arg.to_string(),
            reason: format!("expected on or off, got '{value}'"),
        }),
    }
}
