//! CLI command implementations

pub mod accounts;
pub mod cards;
pub mod info;
pub mod movements;
pub mod providers;
pub mod report;
pub mod setup;

use std::path::PathBuf;

use anyhow::{Context, Result};
use dialoguer::Password;
use tracing::debug;
use bankfold_core::config::Config;
use bankfold_core::domain::result::ProviderResult;
use bankfold_core::{BankfoldContext, DateWindow, SessionToken};

pub const BANKFOLD_DIR_ENV: &str = "BANKFOLD_DIR";

/// Options accepted by every command
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalOpts {
    pub demo: bool,
    pub ask_password: bool,
}

/// Get the bankfold directory from environment or default
pub fn get_bankfold_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(BANKFOLD_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".bankfold"))
        .context("Could not find home directory, set BANKFOLD_DIR")
}

/// Load settings and apply the global flags
pub fn load_config(opts: GlobalOpts) -> Result<Config> {
    let dir = get_bankfold_dir()?;
    let mut config = Config::load(&dir)?;
    debug!(dir = %dir.display(), demo = config.demo_mode, "configuration loaded");

    if opts.demo {
        config.demo_mode = true;
    }
    if opts.ask_password && !config.demo_mode {
        config.credentials.password = Password::new()
            .with_prompt(format!("Password for {}", config.credentials.username))
            .interact()?;
    }
    Ok(config)
}

/// Build the context for a command
pub fn get_context(opts: GlobalOpts) -> Result<BankfoldContext> {
    let config = load_config(opts)?;
    BankfoldContext::from_config(config).context("Failed to initialize bankfold context")
}

/// Run `f` inside a provider session
///
/// The session is closed whether or not `f` succeeds.
pub fn with_session<T, F>(ctx: &BankfoldContext, f: F) -> Result<T>
where
    F: FnOnce(&SessionToken) -> ProviderResult<T>,
{
    let token = ctx
        .session_manager
        .login(&ctx.config.credentials)
        .context("Login failed")?;
    let result = f(&token);
    ctx.session_manager.logout(token);
    Ok(result?)
}

/// Window from optional `--from`/`--to` days
///
/// Missing bounds fall back to the default window (1 May through today).
pub fn parse_window(from: Option<&str>, to: Option<&str>) -> Result<DateWindow> {
    let default = DateWindow::current();
    let start = from
        .map(DateWindow::parse_day)
        .transpose()?
        .unwrap_or_else(|| default.start());
    let end = to
        .map(DateWindow::parse_day)
        .transpose()?
        .unwrap_or_else(|| default.end());
    Ok(DateWindow::new(start, end)?)
}
