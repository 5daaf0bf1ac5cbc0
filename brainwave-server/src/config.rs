use std::time::Duration;

use anyhow::{Context, bail};
use brainwave::SearchConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Runtime settings, layered as defaults < `brainwave.toml` < `BRAINWAVE_*` environment.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub port: u16,
    pub log_level: String,
    pub database_url: String,
    pub cors_origin: String,

    pub name_min_length: usize,
    pub password_min_length: usize,

    pub thought_title_min_length: usize,
    pub thought_title_max_length: usize,
    pub thought_body_min_length: usize,
    pub thought_body_max_length: usize,

    pub page_size_default: u64,
    pub page_size_maximum: u64,

    pub jwt_secret: String,
    /// Token lifetime in humantime notation, e.g. `1h` or `30m`
    pub jwt_expires_in: String,
}

/// Length limits applied to thought titles and bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThoughtLimits {
    pub title_min: usize,
    pub title_max: usize,
    pub body_min: usize,
    pub body_max: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5005,
            log_level: "info".to_string(),
            database_url: "sqlite://brainwave.db?mode=rwc".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            name_min_length: 5,
            password_min_length: 12,
            thought_title_min_length: 5,
            thought_title_max_length: 254,
            thought_body_min_length: 0,
            thought_body_max_length: 65_535,
            page_size_default: 25,
            page_size_maximum: 100,
            jwt_secret: "change-me-brainwave-development-secret".to_string(),
            jwt_expires_in: "1h".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from `brainwave.toml` (when present) and the environment.
    ///
    /// # Errors
    ///
    /// Fails when a source cannot be read, a value has the wrong type, or
    /// [`validate`](Self::validate) rejects the result.
    pub fn load() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let config = Config::builder()
            .set_default("port", i64::from(defaults.port))?
            .set_default("log_level", defaults.log_level)?
            .set_default("database_url", defaults.database_url)?
            .set_default("cors_origin", defaults.cors_origin)?
            .set_default("name_min_length", defaults.name_min_length as u64)?
            .set_default("password_min_length", defaults.password_min_length as u64)?
            .set_default("thought_title_min_length", defaults.thought_title_min_length as u64)?
            .set_default("thought_title_max_length", defaults.thought_title_max_length as u64)?
            .set_default("thought_body_min_length", defaults.thought_body_min_length as u64)?
            .set_default("thought_body_max_length", defaults.thought_body_max_length as u64)?
            .set_default("page_size_default", defaults.page_size_default)?
            .set_default("page_size_maximum", defaults.page_size_maximum)?
            .set_default("jwt_secret", defaults.jwt_secret)?
            .set_default("jwt_expires_in", defaults.jwt_expires_in)?
            .add_source(File::with_name("brainwave").required(false))
            .add_source(Environment::with_prefix("BRAINWAVE").try_parsing(true))
            .build()
            .context("config build error")?;

        let loaded: Self = config
            .try_deserialize()
            .context("config deserialize error")?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings the server cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            bail!("port must be > 0");
        }
        if self.page_size_default == 0 || self.page_size_maximum == 0 {
            bail!("page sizes must be > 0");
        }
        if self.page_size_default > self.page_size_maximum {
            bail!("page_size_default must be <= page_size_maximum");
        }
        if self.thought_title_min_length > self.thought_title_max_length {
            bail!("thought_title_min_length must be <= thought_title_max_length");
        }
        if self.thought_body_min_length > self.thought_body_max_length {
            bail!("thought_body_min_length must be <= thought_body_max_length");
        }
        if self.jwt_secret.is_empty() {
            bail!("jwt_secret must not be empty");
        }
        self.token_lifetime()?;

        let level = self.log_level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&level.as_str()) {
            bail!("log_level must be one of {valid_levels:?}");
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Fails when `jwt_expires_in` is not a humantime duration.
    pub fn token_lifetime(&self) -> anyhow::Result<Duration> {
        humantime::parse_duration(&self.jwt_expires_in)
            .with_context(|| format!("Invalid jwt_expires_in value: {}", self.jwt_expires_in))
    }

    #[must_use]
    pub const fn search_config(&self) -> SearchConfig {
        SearchConfig {
            max_page_size: self.page_size_maximum,
            default_page_size: self.page_size_default,
        }
    }

    #[must_use]
    pub const fn thought_limits(&self) -> ThoughtLimits {
        ThoughtLimits {
            title_min: self.thought_title_min_length,
            title_max: self.thought_title_max_length,
            body_min: self.thought_body_min_length,
            body_max: self.thought_body_max_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.port, 5005);
        assert_eq!(config.token_lifetime().unwrap(), Duration::from_secs(3600));
        assert_eq!(
            config.search_config(),
            SearchConfig {
                max_page_size: 100,
                default_page_size: 25
            }
        );
    }

    #[test]
    fn test_default_page_size_above_maximum_is_rejected() {
        let config = AppConfig {
            page_size_default: 200,
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("page_size_default"));
    }

    #[test]
    fn test_bad_token_lifetime_is_rejected() {
        let config = AppConfig {
            jwt_expires_in: "forever".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_level_is_rejected() {
        let config = AppConfig {
            log_level: "loud".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_thought_limits() {
        let limits = AppConfig::default().thought_limits();
        assert_eq!(limits.title_min, 5);
        assert_eq!(limits.title_max, 254);
        assert_eq!(limits.body_max, 65_535);
    }
}
