//! Configuration management
//!
//! Settings come from an optional `settings.json` in the bankfold
//! directory, overridden by environment variables (a `.env` file is
//! loaded first):
//! ```json
//! {
//!   "baseUrl": "https://banking.sandbox.prometeoapi.com",
//!   "provider": "test",
//!   "username": "12345",
//!   "demoMode": false
//! }
//! ```
//! The API key and password are only read from the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adapters::prometeo::PROMETEO_SANDBOX_URL;
use crate::domain::Credentials;

pub const API_KEY_ENV: &str = "BANKFOLD_API_KEY";
/// Variable name used by older setups
pub const LEGACY_API_KEY_ENV: &str = "API_KEY";
pub const BASE_URL_ENV: &str = "BANKFOLD_BASE_URL";
pub const PROVIDER_ENV: &str = "BANKFOLD_PROVIDER";
pub const USERNAME_ENV: &str = "BANKFOLD_USERNAME";
pub const PASSWORD_ENV: &str = "BANKFOLD_PASSWORD";
pub const DEMO_MODE_ENV: &str = "BANKFOLD_DEMO_MODE";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    demo_mode: bool,
}

/// Bankfold configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub credentials: Credentials,
    pub demo_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: PROMETEO_SANDBOX_URL.to_string(),
            credentials: Credentials::sandbox(),
            demo_mode: false,
        }
    }
}

impl Config {
    /// Load config from the bankfold directory and the process environment
    ///
    /// `.env` files are read from the directory and the working directory;
    /// variables already set in the environment win.
    pub fn load(bankfold_dir: &Path) -> Result<Self> {
        let env_path = bankfold_dir.join(".env");
        load_env_file(dotenvy::from_path(&env_path).map(|()| env_path.clone()), &env_path)?;
        load_env_file(dotenvy::dotenv(), Path::new(".env"))?;

        let settings_path = bankfold_dir.join("settings.json");
        let raw = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file {}", settings_path.display()))?
        } else {
            SettingsFile::default()
        };

        Ok(Self::resolve(raw, |name| std::env::var(name).ok()))
    }

    /// Merge file settings with environment lookups
    fn resolve<F>(raw: SettingsFile, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());
        let defaults = Credentials::sandbox();

        let demo_mode = match env(DEMO_MODE_ENV).as_deref() {
            Some("true" | "1" | "yes" | "TRUE" | "YES") => true,
            Some("false" | "0" | "no" | "FALSE" | "NO") => false,
            _ => raw.demo_mode,
        };

        Self {
            api_key: env(API_KEY_ENV).or_else(|| env(LEGACY_API_KEY_ENV)),
            base_url: env(BASE_URL_ENV)
                .or(raw.base_url)
                .unwrap_or_else(|| PROMETEO_SANDBOX_URL.to_string()),
            credentials: Credentials {
                provider: env(PROVIDER_ENV).or(raw.provider).unwrap_or(defaults.provider),
                username: env(USERNAME_ENV).or(raw.username).unwrap_or(defaults.username),
                password: env(PASSWORD_ENV).unwrap_or(defaults.password),
            },
            demo_mode,
        }
    }

    /// API key, required outside demo mode
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().with_context(|| {
            format!(
                "No API key configured. Set {} (or {}) in the environment or a .env file",
                API_KEY_ENV, LEGACY_API_KEY_ENV
            )
        })
    }

    /// Save the non-secret settings to the bankfold directory
    pub fn save(&self, bankfold_dir: &Path) -> Result<()> {
        let settings = SettingsFile {
            base_url: Some(self.base_url.clone()),
            provider: Some(self.credentials.provider.clone()),
            username: Some(self.credentials.username.clone()),
            demo_mode: self.demo_mode,
        };
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(bankfold_dir.join("settings.json"), content)?;
        Ok(())
    }
}

/// Accept a loaded or absent `.env`; report anything else
fn load_env_file(result: dotenvy::Result<PathBuf>, path: &Path) -> Result<()> {
    match result {
        Ok(loaded) => {
            debug!(path = %loaded.display(), "loaded .env file");
            Ok(())
        }
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Invalid env file {}", path.display())),
    }
}
