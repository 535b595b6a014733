//! # Configuration Management
//!
//! Centralized configuration for fingerprinting and frame exchange.
//!
//! The frame section holds the out-of-band parameters both peers must agree on
//! (header pattern, padding modulus, keystream length). None of them travel in the
//! frame itself, so a mismatch only shows up as a validation or parse failure on decode.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-specific overrides via `from_env()`

use crate::error::{FingerprintError, Result};
use crate::utils::timeout;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::Level;

/// Header pattern of the observed protocol
pub const DEFAULT_HEADER_PATTERN: [u8; 2] = [3, 7];

/// Upper bound (inclusive) on random padding bytes in the observed protocol
pub const DEFAULT_PADDING_MODULUS: u8 = 3;

/// Keystream bytes carried in each frame in the observed protocol
pub const DEFAULT_KEYSTREAM_LENGTH: usize = 7;

/// Keystreams longer than this are almost certainly a misconfiguration
pub const MAX_KEYSTREAM_LENGTH: usize = 4096;

/// Largest response body the exchange layer will try to decode (16 MB)
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CodecConfig {
    /// Frame codec parameters
    #[serde(default)]
    pub frame: FrameConfig,

    /// Outbound exchange settings
    #[serde(default)]
    pub transport: TransportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CodecConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            FingerprintError::ConfigError(format!("Failed to open config file: {e}"))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            FingerprintError::ConfigError(format!("Failed to read config file: {e}"))
        })?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| FingerprintError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(endpoint) = std::env::var("FINGERPRINT_FRAME_ENDPOINT") {
            config.transport.endpoint = endpoint;
        }

        if let Ok(timeout) = std::env::var("FINGERPRINT_FRAME_TIMEOUT_MS") {
            let millis = timeout.parse::<u64>().map_err(|e| {
                FingerprintError::ConfigError(format!("Invalid FINGERPRINT_FRAME_TIMEOUT_MS: {e}"))
            })?;
            config.transport.timeout = Duration::from_millis(millis);
        }

        if let Ok(length) = std::env::var("FINGERPRINT_FRAME_KEYSTREAM_LENGTH") {
            config.frame.keystream_length = length.parse::<usize>().map_err(|e| {
                FingerprintError::ConfigError(format!(
                    "Invalid FINGERPRINT_FRAME_KEYSTREAM_LENGTH: {e}"
                ))
            })?;
        }

        if let Ok(modulus) = std::env::var("FINGERPRINT_FRAME_PADDING_MODULUS") {
            config.frame.padding_modulus = modulus.parse::<u8>().map_err(|e| {
                FingerprintError::ConfigError(format!(
                    "Invalid FINGERPRINT_FRAME_PADDING_MODULUS: {e}"
                ))
            })?;
        }

        if let Ok(level) = std::env::var("FINGERPRINT_FRAME_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                FingerprintError::ConfigError(format!("Invalid FINGERPRINT_FRAME_LOG_LEVEL: {level}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| {
            FingerprintError::ConfigError(format!("Failed to serialize config: {e}"))
        })?;

        std::fs::write(path, content).map_err(|e| {
            FingerprintError::ConfigError(format!("Failed to write config file: {e}"))
        })?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.frame.validate());
        errors.extend(self.transport.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        strict(self.validate())
    }
}

fn strict(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(FingerprintError::ConfigError(format!(
            "Configuration validation failed:\n  - {}",
            errors.join("\n  - ")
        )))
    }
}

/// Frame codec parameters shared out of band with the remote peer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FrameConfig {
    /// Values added to the seed byte to form the frame header
    pub header_pattern: Vec<u8>,

    /// Padding length is drawn from `0..=padding_modulus`
    pub padding_modulus: u8,

    /// Number of keystream bytes per frame
    pub keystream_length: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            header_pattern: DEFAULT_HEADER_PATTERN.to_vec(),
            padding_modulus: DEFAULT_PADDING_MODULUS,
            keystream_length: DEFAULT_KEYSTREAM_LENGTH,
        }
    }
}

impl FrameConfig {
    /// Build a frame configuration from its three parameters
    pub fn new(header_pattern: impl Into<Vec<u8>>, padding_modulus: u8, keystream_length: usize) -> Self {
        Self {
            header_pattern: header_pattern.into(),
            padding_modulus,
            keystream_length,
        }
    }

    /// Validate frame configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.keystream_length == 0 {
            errors.push("Keystream length must be greater than 0".to_string());
        } else if self.keystream_length > MAX_KEYSTREAM_LENGTH {
            errors.push(format!(
                "Keystream length too large: {} (maximum: {MAX_KEYSTREAM_LENGTH})",
                self.keystream_length
            ));
        }

        // Without header bytes a decoder cannot tell a foreign frame from a valid one
        if self.header_pattern.is_empty() {
            errors.push("Header pattern should not be empty (frames become unverifiable)".to_string());
        }

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        strict(self.validate())
    }

    /// Bytes a frame occupies before any padding, keystream or payload
    pub fn fixed_overhead(&self) -> usize {
        self.header_pattern.len() + 2
    }
}

/// Outbound exchange settings handed to the transport collaborator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Verification endpoint URL
    pub endpoint: String,

    /// Deadline for a single exchange
    #[serde(with = "duration_serde")]
    pub timeout: Duration,

    /// Content type announced for the frame body
    pub content_type: String,

    /// Largest response body accepted for decoding
    pub max_response_size: usize,

    /// Extra request headers, passed through untouched
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            endpoint: String::from("http://127.0.0.1:8080/"),
            timeout: timeout::DEFAULT_TIMEOUT,
            content_type: String::from("text/plain"),
            max_response_size: MAX_RESPONSE_SIZE,
            headers: BTreeMap::new(),
        }
    }
}

impl TransportConfig {
    /// Validate transport configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.endpoint.is_empty() {
            errors.push("Transport endpoint cannot be empty".to_string());
        } else if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            errors.push(format!(
                "Invalid transport endpoint: '{}' (expected an http:// or https:// URL)",
                self.endpoint
            ));
        }

        if self.timeout.as_millis() < 100 {
            errors.push("Transport timeout too short (minimum: 100ms)".to_string());
        } else if self.timeout.as_secs() > 300 {
            errors.push("Transport timeout too long (maximum: 300s)".to_string());
        }

        if self.content_type.is_empty() {
            errors.push("Content type cannot be empty".to_string());
        }

        if self.max_response_size == 0 {
            errors.push("Max response size cannot be 0".to_string());
        } else if self.max_response_size > 100 * 1024 * 1024 {
            errors.push(format!(
                "Max response size too large: {} bytes (maximum recommended: 100 MB)",
                self.max_response_size
            ));
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("fingerprint-frame"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for Duration serialization/deserialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = duration.as_millis() as u64;
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
