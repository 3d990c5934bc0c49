//! `voxspec.toml` loading.
//!
//! ```toml
//! [generator]
//! model = "gpt-4o-mini"
//! base_url = "https://api.openai.com/v1"
//! temperature = 0.3
//! timeout_secs = 30
//!
//! [retry]
//! max_retries = 2
//! initial_delay_ms = 500
//! max_delay_ms = 8000
//! multiplier = 2.0
//!
//! [harness]
//! keywords_file = "keywords.toml"
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use voxspec_callflow::{DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use voxspec_contracts::error::{VoxspecError, VoxspecResult};
use voxspec_core::{GenerationPolicy, RetryPolicy};
use voxspec_openai::{OpenAiConfig, DEFAULT_BASE_URL};

/// Read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "voxspec.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub generator: GeneratorSection,
    pub retry: RetrySection,
    pub harness: HarnessSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSection {
    pub model: String,
    /// Overridden by `OPENAI_BASE_URL` when that is set.
    pub base_url: Option<String>,
    pub temperature: f32,
    /// Bounds both the HTTP request and each generation attempt.
    pub timeout_secs: u64,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySection {
    pub max_retries: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 500,
            max_delay_ms: 8000,
            multiplier: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessSection {
    pub keywords_file: Option<PathBuf>,
}

impl CliConfig {
    pub fn from_toml_str(s: &str) -> VoxspecResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| VoxspecError::Config {
            reason: format!("failed to parse config TOML: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> VoxspecResult<()> {
        if self.generator.timeout_secs == 0 {
            return Err(VoxspecError::Config {
                reason: "generator.timeout_secs must be greater than 0".to_string(),
            });
        }
        if !self.generator.temperature.is_finite() {
            return Err(VoxspecError::Config {
                reason: "generator.temperature must be a finite number".to_string(),
            });
        }
        if !self.retry.multiplier.is_finite() || self.retry.multiplier < 1.0 {
            return Err(VoxspecError::Config {
                reason: format!(
                    "retry.multiplier must be a finite number >= 1.0, got {}",
                    self.retry.multiplier
                ),
            });
        }
        Ok(())
    }

    /// Load `explicit` if given (it must exist), else `voxspec.toml` in the
    /// working directory if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> VoxspecResult<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    debug!("no config file; using defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| VoxspecError::Config {
            reason: format!("failed to read config file '{}': {e}", path.display()),
        })?;
        debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&contents)
    }

    pub fn generation_policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            timeout: Duration::from_secs(self.generator.timeout_secs),
            retry: RetryPolicy {
                max_retries: self.retry.max_retries,
                initial_delay: Duration::from_millis(self.retry.initial_delay_ms),
                max_delay: Duration::from_millis(self.retry.max_delay_ms),
                multiplier: self.retry.multiplier,
            },
        }
    }

    /// `base` (from `OpenAiConfig::from_env`) with this file's generator
    /// section applied. A base URL already moved off the default by
    /// `OPENAI_BASE_URL` is kept.
    pub fn apply_to(&self, mut base: OpenAiConfig) -> OpenAiConfig {
        base.model = self.generator.model.clone();
        base.temperature = self.generator.temperature;
        base.timeout = Duration::from_secs(self.generator.timeout_secs);
        if base.base_url == DEFAULT_BASE_URL {
            if let Some(url) = &self.generator.base_url {
                base.base_url = url.clone();
            }
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = CliConfig::from_toml_str("").unwrap();
        assert_eq!(config, CliConfig::default());
        assert_eq!(config.generation_policy(), GenerationPolicy::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = CliConfig::from_toml_str(
            r#"
                [generator]
                model = "gpt-4o"
                timeout_secs = 10

                [retry]
                max_retries = 0

                [harness]
                keywords_file = "kw.toml"
            "#,
        )
        .unwrap();

        assert_eq!(config.generator.model, "gpt-4o");
        assert!((config.generator.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.retry.initial_delay_ms, 500);
        assert_eq!(
            config.harness.keywords_file.as_deref(),
            Some(Path::new("kw.toml"))
        );

        let policy = config.generation_policy();
        assert_eq!(policy.timeout, Duration::from_secs(10));
        assert_eq!(policy.retry.max_retries, 0);
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let err = CliConfig::from_toml_str("[generator]\nmodle = \"x\"").unwrap_err();
        assert!(matches!(err, VoxspecError::Config { .. }));
    }

    #[test]
    fn test_out_of_range_retry_values_are_config_errors() {
        for toml in [
            "[retry]\nmultiplier = -2.0",
            "[retry]\nmultiplier = nan",
            "[retry]\nmultiplier = inf",
            "[retry]\nmultiplier = 0.5",
            "[generator]\ntimeout_secs = 0",
            "[generator]\ntemperature = nan",
        ] {
            match CliConfig::from_toml_str(toml) {
                Err(VoxspecError::Config { reason }) => {
                    assert!(reason.contains("must be"), "{toml}: {reason}")
                }
                other => panic!("{toml}: expected Config error, got {other:?}"),
            }
        }
        assert!(CliConfig::from_toml_str("[retry]\nmultiplier = 1.0").is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = CliConfig::load(Some(Path::new("/nonexistent/voxspec.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_env_base_url_wins_over_file() {
        let config = CliConfig::from_toml_str(
            "[generator]\nbase_url = \"http://file.local/v1\"\ntemperature = 0.7",
        )
        .unwrap();

        let from_file = config.apply_to(OpenAiConfig::new("sk"));
        assert_eq!(from_file.base_url, "http://file.local/v1");
        assert!((from_file.temperature - 0.7).abs() < f32::EPSILON);

        let mut env = OpenAiConfig::new("sk");
        env.base_url = "http://env.local/v1".to_string();
        let from_env = config.apply_to(env);
        assert_eq!(from_env.base_url, "http://env.local/v1");
        assert!((from_env.temperature - 0.7).abs() < f32::EPSILON);

        let untouched = CliConfig::default().apply_to(OpenAiConfig::new("sk"));
        assert_eq!(untouched.base_url, DEFAULT_BASE_URL);
    }
}
