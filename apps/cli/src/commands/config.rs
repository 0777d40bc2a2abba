//! Configuration commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use medassist_config::Config;

/// Show the configuration in effect, after file and environment overrides.
pub fn config_show(context: &Context, format: &OutputFormat) -> Result<()> {
    let config = &context.config;
    let config_file = context.paths.config_file();

    match format {
        OutputFormat::Json => output::print_json(&serde_json::json!({
            "config_file": config_file.display().to_string(),
            "config": config,
        })),
        OutputFormat::Text => {
            output::print_heading("Configuration");
            output::print_row("Config file", &config_file.display().to_string());
            output::print_row("API", &config.api_base_url);
            output::print_row("Log level", &config.log_level);
            output::print_row(
                "Request timeout",
                &match config.request_timeout() {
                    Some(timeout) => format!("{}s", timeout.as_secs()),
                    None => "disabled".to_string(),
                },
            );
            output::print_row("Page size", &config.page_size.to_string());
            Ok(())
        }
    }
}

/// Write the default configuration to the config file.
pub fn config_init(context: &Context, force: bool, format: &OutputFormat) -> Result<()> {
    let config_file = context.paths.config_file();
    if config_file.exists() && !force {
        anyhow::bail!(
            "Config file already exists at {} (use --force to overwrite)",
            config_file.display()
        );
    }

    Config::default().save(&context.paths)?;
    output::print_success(
        &format!("Wrote default config to {}", config_file.display()),
        format,
    );
    Ok(())
}
