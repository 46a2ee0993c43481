//! Harness configuration.
//!
//! Read from the environment, then overridden by command-line flags:
//! - `FRANKENFMT_WIDTH`: how padding measures text. `term` (default) uses
//!   terminal columns, `bytes` uses byte length.
//! - `FRANKENFMT_LOG`: path of a JSONL file that receives one structured log
//!   entry per executed fixture case.

use std::path::PathBuf;

use frankenfmt_core::{ByteWidth, TermWidth, WidthError, WidthMeasure};
use serde::{Deserialize, Serialize};

pub const WIDTH_ENV: &str = "FRANKENFMT_WIDTH";
pub const LOG_ENV: &str = "FRANKENFMT_LOG";

/// Width measurement used for padding.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthPolicy {
    #[default]
    Term,
    Bytes,
}

impl WidthPolicy {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// [`WidthPolicy::Term`].
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "bytes" | "byte" | "len" | "raw" => Self::Bytes,
            _ => Self::Term,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Term => "term",
            Self::Bytes => "bytes",
        }
    }
}

impl WidthMeasure for WidthPolicy {
    fn measure(&mut self, text: &[u8]) -> Result<u32, WidthError> {
        match self {
            Self::Term => TermWidth.measure(text),
            Self::Bytes => ByteWidth.measure(text),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    pub width: WidthPolicy,
    pub log_path: Option<PathBuf>,
}

impl HarnessConfig {
    /// Configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            width: lookup(WIDTH_ENV)
                .map(|v| WidthPolicy::from_str_loose(&v))
                .unwrap_or_default(),
            log_path: lookup(LOG_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, width: Option<WidthPolicy>, log_path: Option<PathBuf>) -> Self {
        if let Some(width) = width {
            self.width = width;
        }
        if log_path.is_some() {
            self.log_path = log_path;
        }
        self
    }
}
