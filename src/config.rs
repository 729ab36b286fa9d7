use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::browser::FormBrowser;
use crate::error::Result;

pub struct BrowserConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_path: Option<String>,
    /// Timeout for page navigation (default: 30s).
    pub default_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_path: None,
            default_timeout: Duration::from_secs(30),
        }
    }
}

pub struct BrowserBuilder {
    config: BrowserConfig,
}

impl BrowserBuilder {
    pub fn new() -> Self {
        Self {
            config: BrowserConfig::default(),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.default_timeout = timeout;
        self
    }

    pub fn build_config(self) -> BrowserConfig {
        self.config
    }

    pub async fn build(self) -> Result<FormBrowser> {
        FormBrowser::launch(self.build_config()).await
    }
}

impl Default for BrowserBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded retry used while waiting for a widget menu to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Longest time a single trigger can spend polling.
    pub fn window(&self) -> Duration {
        self.interval() * self.max_attempts
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval_ms: 100,
        }
    }
}

/// Tuning for one field-discovery scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanConfig {
    pub poll: PollConfig,
    /// Pause after closing a widget so its close animation can finish.
    pub close_settle_ms: u64,
    /// Class-name prefix of the combobox widget family, e.g. `select` for
    /// `select__control` / `select__menu`.
    pub widget_class_prefix: String,
    /// When false, combobox fields are emitted without opening them.
    pub extract_dynamic_options: bool,
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
    }

    /// Parse a JSON document; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn close_settle(&self) -> Duration {
        Duration::from_millis(self.close_settle_ms)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            close_settle_ms: 150,
            widget_class_prefix: "select".to_string(),
            extract_dynamic_options: true,
        }
    }
}

pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    /// Set how many times, and how often, to look for an opened menu.
    pub fn poll(mut self, max_attempts: u32, interval: Duration) -> Self {
        self.config.poll = PollConfig {
            max_attempts,
            interval_ms: interval.as_millis() as u64,
        };
        self
    }

    pub fn close_settle(mut self, settle: Duration) -> Self {
        self.config.close_settle_ms = settle.as_millis() as u64;
        self
    }

    pub fn widget_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.widget_class_prefix = prefix.into();
        self
    }

    pub fn extract_dynamic_options(mut self, enabled: bool) -> Self {
        self.config.extract_dynamic_options = enabled;
        self
    }

    pub fn build(self) -> ScanConfig {
        self.config
    }
}

impl Default for ScanConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_poll_window() {
        let config = ScanConfig::default();
        assert_eq!(config.poll.max_attempts, 10);
        assert_eq!(config.poll.interval(), Duration::from_millis(100));
        assert_eq!(config.poll.window(), Duration::from_secs(1));
    }

    #[test]
    fn from_json_keeps_defaults_for_missing_keys() {
        let config = ScanConfig::from_json(r#"{"poll":{"maxAttempts":3},"widgetClassPrefix":"rs"}"#)
            .unwrap();
        assert_eq!(config.poll.max_attempts, 3);
        assert_eq!(config.poll.interval_ms, 100);
        assert_eq!(config.widget_class_prefix, "rs");
        assert!(config.extract_dynamic_options);
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(ScanConfig::from_json("{poll:").is_err());
    }

    #[test]
    fn builder_overrides() {
        let config = ScanConfig::builder()
            .poll(4, Duration::from_millis(25))
            .close_settle(Duration::ZERO)
            .extract_dynamic_options(false)
            .build();
        assert_eq!(config.poll, PollConfig { max_attempts: 4, interval_ms: 25 });
        assert_eq!(config.close_settle_ms, 0);
        assert!(!config.extract_dynamic_options);
    }
}
