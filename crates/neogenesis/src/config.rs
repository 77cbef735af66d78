//! Runtime configuration for the CLI and the enhancement client.
//!
//! Values come from [`Config::default`], then environment variables, then
//! command-line flags applied by the binary.

use std::path::PathBuf;

use crate::api::RetryConfig;
use crate::enhance::Enhancer;
use crate::preamble::ELITE_PREAMBLE;
use crate::{DEFAULT_MODEL, OpenRouterClient};

/// API key variable.
pub const ENV_API_KEY: &str = "OPENROUTER_KEY";
/// Model override variable.
pub const ENV_MODEL: &str = "NEOGENESIS_MODEL";
/// History file override variable.
pub const ENV_HISTORY: &str = "NEOGENESIS_HISTORY";

/// Default history location, relative to the working directory.
pub const DEFAULT_HISTORY_PATH: &str = ".neogenesis/history.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,
    /// History file. Default: [`DEFAULT_HISTORY_PATH`].
    pub history_path: PathBuf,
    /// Maximum tokens per reply. Default: `4096`.
    pub max_tokens: u32,
    /// Sampling temperature. Default: `0.7`.
    pub temperature: f32,
    /// Retries for transient API failures. Default: `2`.
    pub max_retries: u32,
    /// Prepend [`ELITE_PREAMBLE`] to enhanced prompts. Default: `true`.
    pub preamble: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            history_path: PathBuf::from(DEFAULT_HISTORY_PATH),
            max_tokens: 4096,
            temperature: 0.7,
            max_retries: 2,
            preamble: true,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`. Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(model) = var(ENV_MODEL) {
            config.model = model;
        }
        if let Some(path) = var(ENV_HISTORY) {
            config.history_path = PathBuf::from(path);
        }
        config
    }

    /// Build an [`Enhancer`] with this configuration.
    pub fn build_enhancer(&self, api_key: impl Into<String>) -> Result<Enhancer, String> {
        let client = OpenRouterClient::new(api_key)
            .map_err(|e| format!("failed to create API client: {e}"))?;
        let enhancer = Enhancer::new(client, self.model.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature)
            .with_retry(RetryConfig::with_retries(self.max_retries));
        Ok(if self.preamble {
            enhancer.with_preamble(ELITE_PREAMBLE)
        } else {
            enhancer
        })
    }
}

/// Read the API key from the environment.
pub fn api_key() -> Result<String, String> {
    std::env::var(ENV_API_KEY)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| format!("{ENV_API_KEY} environment variable is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.model, "google/gemini-2.5-flash");
        assert_eq!(
            config.history_path,
            PathBuf::from(".neogenesis/history.json")
        );
        assert_eq!(config.max_retries, 2);
        assert!(config.preamble);
    }

    #[test]
    fn environment_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_MODEL, "openai/gpt-4o-mini"),
            (ENV_HISTORY, "/tmp/neo.json"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert_eq!(config.history_path, PathBuf::from("/tmp/neo.json"));
    }

    #[test]
    fn blank_environment_values_ignored() {
        let config = Config::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn enhancer_builds_offline() {
        assert!(Config::default().build_enhancer("test-key").is_ok());
    }
}
