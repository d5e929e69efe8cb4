use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the optional config file in the workspace root
pub const CONFIG_FILE_NAME: &str = "autofix.toml";

/// Configuration loaded from autofix.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

/// Where the diagnostic text comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Diagnostic file, relative to the workspace
    #[serde(default = "default_error_file")]
    pub error_file: PathBuf,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            error_file: default_error_file(),
        }
    }
}

fn default_error_file() -> PathBuf {
    PathBuf::from("error_output.txt")
}

/// Remote repair oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Messages API endpoint
    #[serde(default = "default_oracle_url")]
    pub url: String,
    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,
    /// Completion token budget
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Timeout in seconds for API requests
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            url: default_oracle_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            timeout_seconds: default_timeout(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_oracle_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_model() -> String {
    "claude-3-opus-20240229".to_string()
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_timeout() -> u64 {
    300
}

fn default_api_key_env() -> String {
    "CLAUDE_API_KEY".to_string()
}

impl OracleConfig {
    /// Read the credential from the configured environment variable.
    /// Empty values count as unset.
    pub fn credential(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e))?;
        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    /// Try to load config from autofix.toml in the given directory
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI overrides into the config
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(input) = overrides.input {
            self.input.error_file = input;
        }
        if let Some(m) = overrides.model {
            self.oracle.model = m;
        }
        if let Some(u) = overrides.url {
            self.oracle.url = u;
        }
        if let Some(t) = overrides.timeout {
            self.oracle.timeout_seconds = t;
        }
        if let Some(n) = overrides.max_tokens {
            self.oracle.max_tokens = n;
        }
        self
    }
}

/// Values supplied on the command line that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub model: Option<String>,
    pub url: Option<String>,
    pub timeout: Option<u64>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    ReadError(PathBuf, std::io::Error),
    #[error("Failed to parse config file {0}: {1}")]
    ParseError(PathBuf, toml::de::Error),
}
