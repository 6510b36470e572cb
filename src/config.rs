//! Classifier configuration
//!
//! Loaded from an optional YAML file, then overridden from the environment
//! (`GEMINI_API_KEY`, `VERDICT_LENS_BASE_URL`). `validate` is the startup check
//! the view controller is built from.

use serde::Deserialize;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, ErrorContext};
use crate::Result;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const BASE_URL_ENV: &str = "VERDICT_LENS_BASE_URL";
const PLACEHOLDER_MARKER: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_output_tokens: u32,
    /// No timeout is applied unless this is set.
    pub timeout_secs: Option<u64>,
    /// Deployer-supplied classification criteria appended to the instruction.
    pub criteria: Option<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            max_output_tokens: 1000,
            timeout_secs: None,
            criteria: None,
        }
    }
}

impl ClassifierConfig {
    /// Parse a YAML document. Missing keys keep their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        serde_yaml::from_str(s).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid config: {}", e),
                ErrorContext::new().with_source("config"),
            )
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("cannot read config file: {}", e),
                ErrorContext::new()
                    .with_details(path.display().to_string())
                    .with_source("config"),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Defaults, then the optional file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|k| env::var(k).ok())
    }

    /// Apply overrides from an arbitrary lookup (the process environment in production).
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_criteria(mut self, criteria: impl Into<String>) -> Self {
        self.criteria = Some(criteria.into());
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Startup configuration check: a usable API key must be present.
    pub fn validate(&self) -> Result<()> {
        let key = self.api_key.as_deref().map(str::trim).unwrap_or("");
        if key.is_empty() || key.contains(PLACEHOLDER_MARKER) {
            return Err(Error::configuration_with_context(
                "API key is missing or still a placeholder",
                ErrorContext::new()
                    .with_field_path("api_key")
                    .with_details(format!("set it in the config file or {}", API_KEY_ENV))
                    .with_source("config"),
            ));
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(Error::configuration_with_context(
                "base_url is not a valid URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(self.base_url.clone())
                    .with_source("config"),
            ));
        }
        Ok(())
    }

    /// The key, if `validate` would accept it.
    pub fn api_key(&self) -> Result<&str> {
        self.validate()?;
        Ok(self.api_key.as_deref().unwrap_or("").trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_request_settings() {
        let cfg = ClassifierConfig::default();
        assert_eq!(cfg.model, "gemini-2.5-flash");
        assert_eq!(cfg.temperature, 0.1);
        assert_eq!(cfg.max_output_tokens, 1000);
        assert!(cfg.timeout().is_none());
    }

    #[test]
    fn missing_key_fails_validation() {
        let err = ClassifierConfig::default().validate().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn placeholder_key_fails_validation() {
        let cfg = ClassifierConfig::default().with_api_key("YOUR_API_KEY_HERE");
        assert!(cfg.validate().is_err());
        let cfg = ClassifierConfig::default().with_api_key("   ");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn real_key_passes_validation() {
        let cfg = ClassifierConfig::default().with_api_key("abc123");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.api_key().unwrap(), "abc123");
    }

    #[test]
    fn yaml_keeps_defaults_for_missing_keys() {
        let cfg = ClassifierConfig::from_yaml_str(
            "api_key: k\nmodel: gemini-2.0-flash\ntimeout_secs: 20\n",
        )
        .unwrap();
        assert_eq!(cfg.model, "gemini-2.0-flash");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(20)));
    }

    #[test]
    fn bad_yaml_is_configuration_error() {
        let err = ClassifierConfig::from_yaml_str("temperature: [1, 2").unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[test]
    fn environment_overrides_file_values() {
        let cfg = ClassifierConfig::default()
            .with_api_key("from-file")
            .with_overrides_from(|k| match k {
                "GEMINI_API_KEY" => Some("from-env".to_string()),
                "VERDICT_LENS_BASE_URL" => Some(String::new()),
                _ => None,
            });
        assert_eq!(cfg.api_key.as_deref(), Some("from-env"));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }
}
