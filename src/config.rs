use crate::constants::{
    CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE, DEFAULT_TIMEOUT_SECONDS, NIH_SEARCH_URL, NSF_AWARDS_URL,
    NSF_PRINT_FIELDS, USER_AGENT,
};
use crate::error::{AwardError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub nih: NihConfig,
    pub nsf: NsfConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NihConfig {
    pub search_url: String,
    /// Match institutions exactly (`org_names_exact_match`) instead of by substring (`org_names`)
    pub exact_org_match: bool,
}

impl Default for NihConfig {
    fn default() -> Self {
        Self {
            search_url: NIH_SEARCH_URL.to_string(),
            exact_org_match: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NsfConfig {
    pub awards_url: String,
    pub print_fields: String,
}

impl Default for NsfConfig {
    fn default() -> Self {
        Self {
            awards_url: NSF_AWARDS_URL.to_string(),
            print_fields: NSF_PRINT_FIELDS.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration. An explicit path must exist; otherwise the
    /// `AWARD_FINDER_CONFIG` variable, then `award_finder.toml` in the working
    /// directory, then built-in defaults. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => match std::env::var(CONFIG_ENV_VAR) {
                Ok(v) if !v.trim().is_empty() => Some(PathBuf::from(v)),
                _ => {
                    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                    local.exists().then_some(local)
                }
            },
        };

        let mut config = match path {
            Some(p) => Self::from_file(&p)?,
            None => {
                debug!("No config file found, using defaults");
                Config::default()
            }
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AwardError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        debug!(path = %path.display(), "Loaded config file");
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(v) = env_value("AWARD_FINDER_TIMEOUT_SECONDS") {
            self.http.timeout_seconds = v.parse().map_err(|_| {
                AwardError::Config(format!("AWARD_FINDER_TIMEOUT_SECONDS is not a number: {v}"))
            })?;
        }
        if let Some(v) = env_value("AWARD_FINDER_NIH_URL") {
            self.nih.search_url = v;
        }
        if let Some(v) = env_value("AWARD_FINDER_NSF_URL") {
            self.nsf.awards_url = v;
        }
        Ok(())
    }

    /// Timeout must be non-zero and both registry URLs set
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            return Err(AwardError::Config(
                "http.timeout_seconds must be greater than zero".into(),
            ));
        }
        if self.nih.search_url.trim().is_empty() || self.nsf.awards_url.trim().is_empty() {
            return Err(AwardError::Config("registry URLs must not be empty".into()));
        }
        Ok(())
    }
}

fn env_value(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}
