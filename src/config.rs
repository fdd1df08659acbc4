use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Which mailbox gets reloaded after an archive toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveRefresh {
    /// Always go back to the inbox, whichever mailbox the toggle was used in.
    #[default]
    Inbox,
    /// Reload the mailbox the toggle was shown in.
    Current,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub base_url: String,
    pub session_id: Option<String>,
    pub csrf_token: Option<String>,
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub archive_refresh: ArchiveRefresh,
    #[serde(default)]
    pub await_mutations: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/".to_string(),
            session_id: None,
            csrf_token: None,
            timeout_secs: None,
            archive_refresh: ArchiveRefresh::Inbox,
            await_mutations: false,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("RS_WEBMAIL_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(session) = std::env::var("RS_WEBMAIL_SESSION") {
            self.session_id = Some(session);
        }
    }
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("rs_webmail_client"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn log_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("client.log");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    let mut cfg = load_config_from(&config_path()?)?;
    cfg.apply_env();
    Ok(cfg)
}

/// Reads the config at `path`. A missing file is replaced by a template and reported as an error.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        // create a template config for users to edit
        let sample = Config {
            session_id: Some("PASTE_SESSIONID_COOKIE".to_string()),
            csrf_token: Some("PASTE_CSRFTOKEN_COOKIE".to_string()),
            ..Config::default()
        };
        let tom = toml::to_string_pretty(&sample)?;
        fs::write(path, tom)?;
        return Err(anyhow!(
            "Created template config at {} — edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    let cfg: Config = toml::from_str(&s)?;
    url::Url::parse(&cfg.base_url)
        .map_err(|e| anyhow!("Invalid base_url '{}': {e}", cfg.base_url))?;
    Ok(cfg)
}
