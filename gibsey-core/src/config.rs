//! Reader configuration.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::{ColorParseError, HexColor};
use crate::reveal::DEFAULT_TICK_INTERVAL;
use crate::selection::{ThemePolicy, DEFAULT_THEME_COLOR};

/// Default scroll increment, in presentation units.
pub const DEFAULT_SCROLL_STEP: u32 = 40;

/// Errors from reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// Configuration for an interaction controller and its front end.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Delay between revealed characters.
    pub tick_interval: Duration,

    /// How chapter and character themes combine.
    pub theme_policy: ThemePolicy,

    /// Theme color when nothing is selected.
    pub default_color: HexColor,

    /// Magnitude of a scroll hint.
    pub scroll_step: u32,

    /// JSON catalog to load instead of the built-in one.
    pub catalog_path: Option<PathBuf>,

    /// Book text to load pages from.
    pub pages_path: Option<PathBuf>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            theme_policy: ThemePolicy::default(),
            default_color: DEFAULT_THEME_COLOR,
            scroll_step: DEFAULT_SCROLL_STEP,
            catalog_path: None,
            pages_path: None,
        }
    }
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read overrides from `GIBSEY_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(ms) = lookup("GIBSEY_TICK_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "GIBSEY_TICK_MS",
                    value: ms.clone(),
                })?;
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(policy) = lookup("GIBSEY_THEME_POLICY") {
            config.theme_policy = policy.parse().map_err(|_| ConfigError::InvalidValue {
                key: "GIBSEY_THEME_POLICY",
                value: policy.clone(),
            })?;
        }
        if let Some(color) = lookup("GIBSEY_DEFAULT_COLOR") {
            config.default_color = color.trim().parse()?;
        }
        if let Some(step) = lookup("GIBSEY_SCROLL_STEP") {
            config.scroll_step = step.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "GIBSEY_SCROLL_STEP",
                value: step.clone(),
            })?;
        }
        if let Some(path) = lookup("GIBSEY_CATALOG") {
            config.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("GIBSEY_PAGES") {
            config.pages_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_theme_policy(mut self, policy: ThemePolicy) -> Self {
        self.theme_policy = policy;
        self
    }

    pub fn with_default_color(mut self, color: HexColor) -> Self {
        self.default_color = color;
        self
    }

    pub fn with_scroll_step(mut self, step: u32) -> Self {
        self.scroll_step = step;
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_pages_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pages_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.tick_interval, Duration::from_millis(30));
        assert_eq!(config.theme_policy, ThemePolicy::MostRecent);
        assert_eq!(config.default_color.to_string(), "#33FF33");
        assert_eq!(config.scroll_step, 40);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let config = ReaderConfig::from_lookup(lookup(&[
            ("GIBSEY_TICK_MS", "5"),
            ("GIBSEY_THEME_POLICY", "chapter-first"),
            ("GIBSEY_DEFAULT_COLOR", "#FFB000"),
            ("GIBSEY_SCROLL_STEP", "3"),
            ("GIBSEY_PAGES", "book.txt"),
        ]))
        .unwrap();

        assert_eq!(config.tick_interval, Duration::from_millis(5));
        assert_eq!(config.theme_policy, ThemePolicy::ChapterFirst);
        assert_eq!(config.default_color, HexColor::rgb(0xFF, 0xB0, 0x00));
        assert_eq!(config.scroll_step, 3);
        assert_eq!(config.pages_path, Some(PathBuf::from("book.txt")));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ReaderConfig::from_lookup(lookup(&[("GIBSEY_TICK_MS", "fast")])),
            Err(ConfigError::InvalidValue { key: "GIBSEY_TICK_MS", .. })
        ));
        assert!(ReaderConfig::from_lookup(lookup(&[("GIBSEY_TICK_MS", "0")])).is_err());
        assert!(matches!(
            ReaderConfig::from_lookup(lookup(&[("GIBSEY_DEFAULT_COLOR", "green")])),
            Err(ConfigError::Color(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = ReaderConfig::new()
            .with_tick_interval(Duration::from_millis(10))
            .with_scroll_step(1)
            .with_catalog_path("catalog.json");
        assert_eq!(config.tick_interval, Duration::from_millis(10));
        assert_eq!(config.scroll_step, 1);
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
    }
}
