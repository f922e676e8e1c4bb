//! Configuration file support

use rehearse_ai::Provider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for rehearse
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider (groq, openai, or any other name for a custom endpoint)
    pub provider: Option<String>,
    /// Chat model answering as the candidate
    pub chat_model: Option<String>,
    /// Speech-to-text model
    pub stt_model: Option<String>,
    /// Override the provider's API base URL
    pub base_url: Option<String>,
    /// Spoken language hint (ISO-639-1, e.g. "en")
    pub language: Option<String>,
    /// File whose contents replace the built-in persona
    pub persona_file: Option<String>,
    /// API key (environment variable takes precedence)
    pub api_key: Option<String>,
    /// Completed rounds kept before the conversation resets
    pub history_window: Option<usize>,
    /// Document context clamp, in characters
    pub max_context_chars: Option<usize>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    /// Per-request timeout for provider calls
    pub request_timeout_secs: Option<u64>,
}

/// Local secret store kept next to the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct Secrets {
    api_key: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rehearse")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("REHEARSE_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Path of `secrets.toml` beside a config file
    pub fn secrets_path_for(config_path: &Path) -> PathBuf {
        config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("secrets.toml")
    }

    /// Load config from the default location
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`. A missing file gives defaults; an unreadable
    /// or malformed one gives defaults with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Write the example config to `path` unless a file is already there
    pub fn init_at(path: &Path) -> std::io::Result<PathBuf> {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, example_config())?;
        Ok(path.to_path_buf())
    }

    /// Create the default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        Self::init_at(&Self::config_path())
    }

    /// Resolved provider, Groq when unset
    pub fn provider(&self) -> Provider {
        self.provider
            .as_deref()
            .map(Provider::parse)
            .unwrap_or(Provider::Groq)
    }

    /// API key for `provider`: environment, then config, then `secrets.toml`
    pub fn resolve_api_key(&self, provider: Provider) -> Option<String> {
        self.resolve_api_key_with(
            provider.api_key_env_var(),
            &Self::secrets_path_for(&Self::config_path()),
        )
    }

    fn resolve_api_key_with(&self, env_var: &str, secrets_path: &Path) -> Option<String> {
        rehearse_ai::providers::get_api_key(None, env_var)
            .or_else(|| {
                self.api_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
            })
            .or_else(|| load_secret(secrets_path))
    }
}

fn load_secret(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str::<Secrets>(&content) {
        Ok(secrets) => secrets
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty()),
        Err(e) => {
            eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
            None
        }
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# rehearse configuration file
# Place at ~/.config/rehearse/config.toml (Linux), ~/Library/Application Support/rehearse/config.toml (Mac)
# or %APPDATA%\rehearse\config.toml (Windows). Override with REHEARSE_CONFIG_PATH.

# Provider (groq, openai)
provider = "groq"

# Chat model answering as the candidate
chat_model = "llama-3.3-70b-versatile"

# Speech-to-text model
stt_model = "whisper-large-v3-turbo"

# Spoken language hint (optional, auto-detected when unset)
# language = "en"

# Replace the built-in candidate persona (optional)
# persona_file = "~/.config/rehearse/persona.txt"

# Completed question/answer rounds kept before the conversation starts fresh
history_window = 10

# Maximum characters of uploaded document text sent with each question
max_context_chars = 16000

# Sampling
temperature = 0.5
top_p = 1.0

# Per-request timeout in seconds
request_timeout_secs = 120

# API key (optional; GROQ_API_KEY or secrets.toml next to this file also work)
# api_key = "gsk_..."
"#
}
