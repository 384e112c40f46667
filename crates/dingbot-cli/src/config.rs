use std::collections::BTreeMap;

use dingbot_core::{DingbotError, DingbotResult};
use serde::Deserialize;

/// Resolved run configuration: file values with CLI overrides applied.
/// Immutable once validated; every component gets it passed in explicitly.
#[derive(Debug, Default, Deserialize)]
pub struct RobotConfig {
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default)]
    pub secret_key: String,
    pub robot_name: Option<String>,
    #[serde(default)]
    pub mobiles: Vec<String>,

    // message content selectors, first non-empty wins:
    // text, markdown, json, report
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub json: String,
    #[serde(default)]
    pub report: String,

    /// phone -> products that phone owns
    #[serde(default)]
    pub owners: BTreeMap<String, Vec<String>>,
}

impl RobotConfig {
    pub fn from_file(path: &str) -> DingbotResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| DingbotError::Config(format!("invalid config {}: {}", path, e)))
    }

    /// Must pass before any network activity.
    pub fn validate(&self) -> DingbotResult<()> {
        if self.webhook_url.is_empty() {
            return Err(DingbotError::Config("webhook_url is required".into()));
        }
        if self.secret_key.is_empty() {
            return Err(DingbotError::Config("secret_key is required".into()));
        }
        if self.text.is_empty()
            && self.markdown.is_empty()
            && self.json.is_empty()
            && self.report.is_empty()
        {
            return Err(DingbotError::Config(
                "one of text/markdown/json/report is required".into(),
            ));
        }
        Ok(())
    }
}
