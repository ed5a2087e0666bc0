//! pulselink command-line entry point.

use std::{env, error::Error, process, sync::Arc};

use pulselink::{
    cli::{CliService, formatting::format_error},
    config::{Config, ConfigPaths},
    service_manager::Services,
    tracing_config,
};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let path = ConfigPaths::main_config()?;
    let config = match Config::load(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    if env::var_os("PULSELINK_LOG_FILE").is_some() {
        tracing_config::init_with_file(config.general.log_level)?;
    } else {
        tracing_config::init(config.general.log_level)?;
    }
    debug!(config = %path.display(), "Configuration loaded");

    let services = Arc::new(Services::new(config, path)?);
    let code = run_cli_command(&services, &args).await;
    services.shutdown().await;

    if code != 0 {
        process::exit(code);
    }
    Ok(())
}

/// Routes `args` to a command and prints its output
///
/// Returns the process exit code.
async fn run_cli_command(services: &Arc<Services>, args: &[String]) -> i32 {
    let cli_service = CliService::new(services.clone());

    let category = args.first().map(|s| s.as_str()).unwrap_or("help");
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");
    let command_args = args.get(2..).unwrap_or(&[]);

    match cli_service
        .execute_command(category, command, command_args)
        .await
    {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            0
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            1
        }
    }
}
