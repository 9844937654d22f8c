use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use stratus_core::{Config, ConfigError};
use stratus_term::{App, Theme};

/// Terminal weather client for WeatherAPI.com
#[derive(Parser, Debug)]
#[command(name = "stratus", version, about)]
struct Args {
    /// Show current weather for this location before the menu
    location: Vec<String>,

    /// Read settings from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Exit after the quick lookup instead of opening the menu
    #[arg(long)]
    once: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", fatal_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Text printed once to stderr before exiting with a failure code
fn fatal_message(error: &anyhow::Error) -> String {
    let mut message = format!("Fatal error: {:#}", error);
    if let Some(config_error) = error.downcast_ref::<ConfigError>() {
        message.push('\n');
        message.push_str(config_error.user_message());
    }
    message
}

fn run(args: Args) -> Result<()> {
    stratus_core::init()?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let (config, _) = Config::load_validated(args.config.as_deref())?;
    let config_path = match args.config {
        Some(path) => path,
        None => Config::config_path()?,
    };

    let stdin = std::io::stdin();
    let mut app = App::new(
        runtime.handle().clone(),
        config,
        config_path,
        stdin.lock(),
        std::io::stdout(),
        Theme::detect(),
    )?;

    if !args.location.is_empty() {
        app.quick_lookup(&args.location.join(" "))?;
        if args.once || !app.pause_before_menu()? {
            return Ok(());
        }
    }

    app.run()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_fatal_message_for_config_error() {
        let error = anyhow::Error::from(ConfigError::Invalid("http.timeout_secs: zero".into()));
        let message = fatal_message(&error);

        assert_eq!(message.matches("Fatal error").count(), 1);
        assert_eq!(
            message,
            "Fatal error: Invalid configuration: http.timeout_secs: zero\n\
             Invalid configuration. Check your settings."
        );
    }

    #[test]
    fn test_fatal_message_keeps_context_chain() {
        let error = anyhow::anyhow!("connection refused").context("Failed to start async runtime");
        assert_eq!(
            fatal_message(&error),
            "Fatal error: Failed to start async runtime: connection refused"
        );
    }
}
