//! Error types for configuration and audio loading.
//!
//! Nothing here ends a run: run failures are `sim::FailReason`. These errors
//! are returned to the shell, logged, and the frame loop keeps going.

use std::fmt;

/// A tuning or settings document could not be applied
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON did not parse, or a field had the wrong type
    Parse(serde_json::Error),
    /// A value parsed but is outside its usable range
    OutOfRange {
        /// Dotted path of the offending field
        field: &'static str,
        value: f32,
        /// Human-readable description of the accepted range
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(err) => write!(f, "invalid config: {err}"),
            ConfigError::OutOfRange {
                field,
                value,
                expected,
            } => write!(f, "config field `{field}` = {value} (expected {expected})"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(err) => Some(err),
            ConfigError::OutOfRange { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// The music bed could not be set up. Playback is skipped, never retried.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// `AudioContext` unavailable (insecure context, no audio device)
    Context(String),
    /// Track request failed or returned a non-OK status
    Fetch { url: String, status: Option<u16> },
    /// Track bytes could not be decoded
    Decode { url: String, detail: String },
    /// Creating or connecting audio nodes failed
    Graph(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Context(detail) => write!(f, "audio context unavailable: {detail}"),
            AudioError::Fetch {
                url,
                status: Some(status),
            } => write!(f, "failed to load audio track {url}: HTTP {status}"),
            AudioError::Fetch { url, status: None } => {
                write!(f, "failed to load audio track {url}")
            }
            AudioError::Decode { url, detail } => {
                write!(f, "failed to decode audio track {url}: {detail}")
            }
            AudioError::Graph(detail) => write!(f, "audio graph setup failed: {detail}"),
        }
    }
}

impl std::error::Error for AudioError {}
