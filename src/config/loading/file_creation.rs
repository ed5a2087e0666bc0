use std::{fs, path::Path};

use crate::{PulselinkError, Result};

const TEMPLATE: &str = r#"# pulselink configuration
#
# [[players]]
# name = "Living Room"
# sink_name = "alsa_output.usb-speakers.analog-stereo"
# sources = [
#     { name = "TV", source_name = "alsa_input.hdmi.analog-stereo" },
# ]
# server = { host = "localhost", port = 4712 }
"#;

/// Writes a commented template if no configuration file exists yet
pub fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PulselinkError::IoError {
            path: parent.to_path_buf(),
            details: format!("Failed to create config directory: {e}"),
        })?;
    }

    fs::write(path, TEMPLATE).map_err(|e| PulselinkError::IoError {
        path: path.to_path_buf(),
        details: format!("Failed to create config file: {e}"),
    })
}
