//! CLI command implementations.

mod auth;
mod config;
mod profile;
mod records;

pub use auth::{login, logout, register, status, whoami};
pub use config::{config_init, config_show};
pub use profile::profile;
pub use records::{add, delete, edit, list, show};

use anyhow::Result;
use health_records::RecordsClient;
use medassist_config::{init_logging, Config, Paths};
use session_client::{SessionClient, SessionError};
use std::io::{self, Write};
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs: resolved paths, config and the shared session.
pub struct Context {
    pub paths: Paths,
    pub config: Config,
    pub session: Arc<SessionClient>,
    user_id: Option<String>,
}

impl Context {
    /// Load config, start logging and open the persisted session.
    pub fn load(
        log_level: Option<&str>,
        api_url: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Self> {
        let paths = Paths::new()?;
        let mut config = Config::load(&paths)?;
        if let Some(url) = api_url {
            config.api_base_url = url.to_string();
            config.validate()?;
        }

        let level = log_level.unwrap_or(config.log_level.as_str()).to_string();
        init_logging(&level, Some(paths.log_file().as_path()));

        paths.ensure_dirs()?;
        let tokens = token_storage::open_token_store(&paths.session_file())?;
        let session =
            SessionClient::connect(tokens, config.api_base_url()?, config.request_timeout())?;

        Ok(Self {
            paths,
            config,
            session: Arc::new(session),
            user_id: user_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from),
        })
    }

    /// Records client for the signed-in user.
    ///
    /// An explicit user id skips the current-user lookup but still needs a
    /// stored session.
    pub async fn records(&self) -> Result<RecordsClient> {
        if let Some(user_id) = &self.user_id {
            if !self.session.is_authenticated()? {
                return Err(SessionError::NoSession.into());
            }
            debug!(user_id = %user_id, "Using configured user id");
            return Ok(RecordsClient::new(self.session.clone(), user_id.clone()));
        }
        Ok(RecordsClient::for_current_user(self.session.clone()).await?)
    }
}

/// Prompt on stdout and read one trimmed line from stdin.
fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompt for a value that must not be empty.
fn prompt_required(label: &str) -> Result<String> {
    let value = prompt(label)?;
    if value.is_empty() {
        anyhow::bail!("{} is required", label);
    }
    Ok(value)
}

/// Read a secret without echo.
fn prompt_secret(label: &str) -> Result<String> {
    let value = rpassword::prompt_password(format!("{}: ", label))?;
    if value.is_empty() {
        anyhow::bail!("{} is required", label);
    }
    Ok(value)
}
