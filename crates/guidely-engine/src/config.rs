//! Configuration for the guidely hero section.
//!
//! Every field has a default, so a partial JSON file only overrides what it
//! names.

use crate::conversation::DEFAULT_RESPONSES;
use crate::typewriter::TypewriterTiming;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Fixed text the animated phrases are appended to.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Phrase endings cycled by the placeholder.
    #[serde(default = "default_phrases")]
    pub phrases: Vec<String>,

    /// Placeholder animation timing.
    #[serde(default)]
    pub timing: TypewriterTiming,

    /// Words alternated in the headline.
    #[serde(default = "default_headline_words")]
    pub headline_words: Vec<String>,

    /// How often the headline word changes, in milliseconds.
    #[serde(default = "default_headline_interval_ms")]
    pub headline_interval_ms: u64,

    /// Artificial delay before the bot replies, in milliseconds.
    #[serde(default = "default_response_latency_ms")]
    pub response_latency_ms: u64,

    /// Replies the stub bot chooses from.
    #[serde(default = "default_responses")]
    pub responses: Vec<String>,

    /// Placeholder of the input once in chat mode.
    #[serde(default = "default_chat_placeholder")]
    pub chat_placeholder: String,

    /// Terminal UI tick rate in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_prefix() -> String {
    "I want a guide ".into()
}

fn default_phrases() -> Vec<String> {
    vec![
        "in Oslo on the 15th of December".into(),
        "in Munich on November 29th".into(),
        "in Paris on the 10th of December".into(),
    ]
}

fn default_headline_words() -> Vec<String> {
    vec!["tour".into(), "guide".into()]
}

fn default_headline_interval_ms() -> u64 {
    5000
}

fn default_response_latency_ms() -> u64 {
    1000
}

fn default_responses() -> Vec<String> {
    DEFAULT_RESPONSES.iter().map(|s| (*s).to_string()).collect()
}

fn default_chat_placeholder() -> String {
    "Type your message...".into()
}

fn default_tick_rate_ms() -> u64 {
    20
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            phrases: default_phrases(),
            timing: TypewriterTiming::default(),
            headline_words: default_headline_words(),
            headline_interval_ms: default_headline_interval_ms(),
            response_latency_ms: default_response_latency_ms(),
            responses: default_responses(),
            chat_placeholder: default_chat_placeholder(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config: Self = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Check the values a file could get wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ranges = [
            ("typing", self.timing.typing),
            ("pause", self.timing.pause),
            ("deleting", self.timing.deleting),
            ("transition", self.timing.transition),
        ];
        for (name, range) in ranges {
            if range.min_ms > range.max_ms {
                return Err(ConfigError::Invalid(format!(
                    "{name} range is inverted ({}ms > {}ms)",
                    range.min_ms, range.max_ms
                )));
            }
        }

        let intervals = [
            ("timing.blink_ms", self.timing.blink_ms),
            ("headline_interval_ms", self.headline_interval_ms),
            ("tick_rate_ms", self.tick_rate_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }

        if self.headline_words.is_empty() {
            return Err(ConfigError::Invalid("headline_words is empty".into()));
        }
        if self.responses.is_empty() {
            return Err(ConfigError::Invalid("responses is empty".into()));
        }
        Ok(())
    }

    pub fn headline_interval(&self) -> Duration {
        Duration::from_millis(self.headline_interval_ms)
    }

    pub fn response_latency(&self) -> Duration {
        Duration::from_millis(self.response_latency_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A value is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
