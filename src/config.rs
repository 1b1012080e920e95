use config::Config;
use doku::Document;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::time::Duration;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Document, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct EcohubConfig {
    /// How to reach the backend
    pub api: ApiConfig,
    pub notifications: NotificationConfig,
}

impl EcohubConfig {
    pub fn read() -> Result<Self, config::ConfigError> {
        let config = Config::builder()
            .add_source(config::File::with_name("config.toml").required(false))
            // Cant use _ as separator due to https://github.com/mehcode/config-rs/issues/391
            .add_source(config::Environment::with_prefix("ECOHUB").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Document, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base url of the rest api, endpoint paths are appended to it
    #[default("http://localhost:5000/api")]
    #[doku(example = "https://ecohub.example.com/api")]
    pub base_url: String,
    /// Request timeout in seconds
    #[default(15)]
    #[doku(example = "15")]
    pub timeout_secs: u64,
    /// Session cookie to send with every request, eg `connect.sid=abc123`
    #[default(None)]
    #[doku(example = "connect.sid=abc123")]
    pub session_cookie: Option<String>,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Document, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Seconds between two fetches of the notification list
    #[default(30)]
    #[doku(example = "30")]
    pub poll_interval_secs: u64,
    /// Unread counts above this value are shown as "9+"
    #[default(9)]
    #[doku(example = "9")]
    pub badge_ceiling: usize,
}

impl NotificationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
