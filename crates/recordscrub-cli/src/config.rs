use recordscrub_batch::{BatchConfig, MalformedPolicy};
use recordscrub_pii::{DEFAULT_MASK_CHAR, MaskerConfig, REDACTION_TOKEN, RedactorConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrubConfig {
    #[serde(default)]
    pub masking: MaskingConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskingConfig {
    #[serde(default = "default_mask_char")]
    pub mask_char: char,

    #[serde(default = "default_redaction_token")]
    pub redaction_token: String,

    #[serde(default = "default_combinatorial_threshold")]
    pub combinatorial_threshold: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_false")]
    pub json: bool,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            mask_char: default_mask_char(),
            redaction_token: default_redaction_token(),
            combinatorial_threshold: default_combinatorial_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl MaskingConfig {
    pub fn to_redactor_config(&self) -> RedactorConfig {
        RedactorConfig {
            masking: MaskerConfig {
                mask_char: self.mask_char,
                redaction_token: self.redaction_token.clone(),
            },
            combinatorial_threshold: self.combinatorial_threshold,
        }
    }
}

impl ScrubConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("RECORDSCRUB_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Ok(val) = std::env::var("RECORDSCRUB_LOG_JSON") {
            if let Ok(enabled) = val.parse::<bool>() {
                self.logging.json = enabled;
            }
        }

        // Masking settings
        if let Ok(val) = std::env::var("RECORDSCRUB_MASK_CHAR") {
            let mut chars = val.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => self.masking.mask_char = c,
                _ => eprintln!(
                    "Warning: Invalid RECORDSCRUB_MASK_CHAR '{}', expected a single character",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("RECORDSCRUB_REDACTION_TOKEN") {
            self.masking.redaction_token = val;
        }

        if let Ok(val) = std::env::var("RECORDSCRUB_COMBINATORIAL_THRESHOLD") {
            match val.parse::<usize>() {
                Ok(threshold) => self.masking.combinatorial_threshold = threshold,
                Err(_) => eprintln!(
                    "Warning: Invalid RECORDSCRUB_COMBINATORIAL_THRESHOLD '{}', using {}",
                    val, self.masking.combinatorial_threshold
                ),
            }
        }

        // Batch settings
        if let Ok(val) = std::env::var("RECORDSCRUB_ON_MALFORMED") {
            match val.parse::<MalformedPolicy>() {
                Ok(policy) => self.batch.on_malformed = policy,
                Err(e) => eprintln!("Warning: {}, using {}", e, self.batch.on_malformed),
            }
        }

        if let Ok(val) = std::env::var("RECORDSCRUB_EMIT_STATUS") {
            if let Ok(enabled) = val.parse::<bool>() {
                self.batch.emit_status = enabled;
            }
        }
    }
}

fn default_mask_char() -> char {
    DEFAULT_MASK_CHAR
}

fn default_redaction_token() -> String {
    REDACTION_TOKEN.to_string()
}

fn default_combinatorial_threshold() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_false() -> bool {
    false
}
