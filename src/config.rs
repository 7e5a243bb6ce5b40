use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const RECIPIENT_DOMAIN: &str = "fcm.googleapis.com";
const MAX_SELF_STOP_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub server_key: Option<String>,
    #[serde(default = "default_push_endpoint")]
    pub push_endpoint: String,
    #[serde(default = "default_channel_id")]
    pub notification_channel_id: String,
    #[serde(default = "default_channel_name")]
    pub notification_channel_name: String,
    #[serde(default = "default_self_stop_timeout_secs")]
    pub self_stop_timeout_secs: u64,
    #[serde(default = "default_command_ttl_secs")]
    pub command_ttl_secs: u32,
    #[serde(default = "default_placeholder")]
    pub placeholder_title: String,
    #[serde(default = "default_placeholder")]
    pub placeholder_artist: String,
}

fn default_push_endpoint() -> String {
    "https://fcm.googleapis.com/fcm/send".to_string()
}

fn default_channel_id() -> String {
    "player".to_string()
}

fn default_channel_name() -> String {
    "Player notifications".to_string()
}

fn default_self_stop_timeout_secs() -> u64 {
    25 * 60
}

fn default_command_ttl_secs() -> u32 {
    20
}

fn default_placeholder() -> String {
    "-".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sender_id: String::new(),
            server_key: None,
            push_endpoint: default_push_endpoint(),
            notification_channel_id: default_channel_id(),
            notification_channel_name: default_channel_name(),
            self_stop_timeout_secs: default_self_stop_timeout_secs(),
            command_ttl_secs: default_command_ttl_secs(),
            placeholder_title: default_placeholder(),
            placeholder_artist: default_placeholder(),
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> AppResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("Cannot find home directory".into()))?;
        Ok(home.join(".mediagateway"))
    }

    pub fn config_path() -> AppResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Config(format!(
                "Config file not found at {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                log::warn!("Failed to locate config: {}. Using defaults.", e);
                Self::default()
            }
        }
    }

    /// Falls back to defaults on any load error, but only writes them out when no
    /// file exists yet. A file that fails to parse or validate is left as is.
    pub fn load_or_default_from(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => config,
            Err(e) if path.exists() => {
                log::warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
            Err(_) => {
                log::info!("No config at {}, writing defaults", path.display());
                let default_config = Self::default();
                if let Err(save_err) = default_config.save_to(path) {
                    log::error!("Failed to save default config: {}", save_err);
                }
                default_config
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        url::Url::parse(&self.push_endpoint).map_err(|e| {
            AppError::Config(format!("Invalid push endpoint {}: {}", self.push_endpoint, e))
        })?;
        if self.self_stop_timeout_secs == 0 {
            return Err(AppError::Config("self_stop_timeout_secs must be positive".into()));
        }
        if self.self_stop_timeout_secs > MAX_SELF_STOP_TIMEOUT_SECS {
            return Err(AppError::Config(format!(
                "self_stop_timeout_secs must be at most {}",
                MAX_SELF_STOP_TIMEOUT_SECS
            )));
        }
        Ok(())
    }

    /// Upstream commands are addressed to the project's sender identity.
    pub fn recipient(&self) -> String {
        format!("{}@{}", self.sender_id, RECIPIENT_DOMAIN)
    }

    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            self_stop_timeout: Duration::from_secs(self.self_stop_timeout_secs),
            channel_id: self.notification_channel_id.clone(),
            channel_name: self.notification_channel_name.clone(),
            placeholder_title: self.placeholder_title.clone(),
            placeholder_artist: self.placeholder_artist.clone(),
        }
    }

    pub fn upstream_config(&self) -> UpstreamConfig {
        UpstreamConfig {
            recipient: self.recipient(),
            ttl_secs: self.command_ttl_secs,
            endpoint: self.push_endpoint.clone(),
            server_key: self.server_key.clone(),
        }
    }
}

/// Values the session controller is constructed with.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub self_stop_timeout: Duration,
    pub channel_id: String,
    pub channel_name: String,
    pub placeholder_title: String,
    pub placeholder_artist: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        AppConfig::default().controller_config()
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub recipient: String,
    pub ttl_secs: u32,
    pub endpoint: String,
    pub server_key: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        AppConfig::default().upstream_config()
    }
}
