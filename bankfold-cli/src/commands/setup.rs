//! Setup command - write settings.json

use anyhow::{Context, Result};
use dialoguer::Input;

use bankfold_core::config::{Config, API_KEY_ENV, PASSWORD_ENV};

use super::get_bankfold_dir;
use crate::output;

pub fn run(
    base_url: Option<String>,
    provider: Option<String>,
    username: Option<String>,
    demo_mode: Option<bool>,
) -> Result<()> {
    let dir = get_bankfold_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create bankfold directory: {:?}", dir))?;

    let mut config = Config::load(&dir)?;
    let interactive = atty::is(atty::Stream::Stdin);

    config.base_url = ask(base_url, "Provider base URL", &config.base_url, interactive)?;
    config.credentials.provider = ask(provider, "Bank provider code", &config.credentials.provider, interactive)?;
    config.credentials.username = ask(username, "Username", &config.credentials.username, interactive)?;
    if let Some(demo) = demo_mode {
        config.demo_mode = demo;
    }

    config.save(&dir)?;
    output::success(&format!("Settings saved to {}", dir.join("settings.json").display()));
    if config.api_key.is_none() && !config.demo_mode {
        println!("Set {} in the environment or {}/.env before running 'bankfold report'.", API_KEY_ENV, dir.display());
    }
    println!("The password is read from {} or --ask-password, never saved.", PASSWORD_ENV);
    Ok(())
}

/// Flag value, else a prompt (when interactive), else the current value
fn ask(value: Option<String>, prompt: &str, current: &str, interactive: bool) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None if interactive => Ok(Input::<String>::new()
            .with_prompt(prompt)
            .default(current.to_string())
            .interact_text()?),
        None => Ok(current.to_string()),
    }
}
