use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::keyword_matcher;
use crate::segment_scanner::ScanOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Scanner tuning parameters
    #[serde(default)]
    pub scan: ScanSettings,

    /// Built-in keyword sets to merge into the vocabulary
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Extra user-supplied keywords added to the vocabulary
    #[serde(default)]
    pub extra_keywords: Vec<String>,

    /// File extensions considered when scanning a directory
    #[serde(default = "default_file_extensions")]
    pub file_extensions: Vec<String>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Scanner parameters persisted in the config file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    /// Lines considered together for the trigger decision
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Minimum summed keyword hits within one window to open a segment
    #[serde(default = "default_keyword_threshold")]
    pub keyword_threshold: usize,

    /// Hard cap on lines per segment
    #[serde(default = "default_max_segment_length")]
    pub max_segment_length: usize,

    /// Consecutive zero-hit lines allowed before growth stops
    #[serde(default = "default_max_blank_lines")]
    pub max_blank_lines: usize,

    /// Minimum hit-carrying lines for a segment to be kept
    #[serde(default = "default_min_keyword_lines")]
    pub min_keyword_lines: usize,

    /// Segments returned after ranking; 0 keeps all of them
    #[serde(default)]
    pub top_n: usize,
}

impl ScanSettings {
    // @returns: Core scan options mirroring these settings
    pub fn to_options(&self) -> ScanOptions {
        ScanOptions {
            window_size: self.window_size,
            keyword_threshold: self.keyword_threshold,
            max_segment_length: self.max_segment_length,
            max_blank_lines: self.max_blank_lines,
            min_keyword_lines: self.min_keyword_lines,
            top_n: self.top_n,
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            keyword_threshold: default_keyword_threshold(),
            max_segment_length: default_max_segment_length(),
            max_blank_lines: default_max_blank_lines(),
            min_keyword_lines: default_min_keyword_lines(),
            top_n: 0,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_window_size() -> usize {
    5
}

fn default_keyword_threshold() -> usize {
    3
}

fn default_max_segment_length() -> usize {
    20
}

fn default_max_blank_lines() -> usize {
    2
}

fn default_min_keyword_lines() -> usize {
    2
}

fn default_languages() -> Vec<String> {
    vec!["c".to_string(), "cpp".to_string(), "java".to_string()]
}

fn default_file_extensions() -> Vec<String> {
    vec!["log".to_string(), "txt".to_string()]
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Scanner parameters are checked before any scan starts
        self.scan
            .to_options()
            .validate()
            .map_err(|e| anyhow!("{}", e))?;

        // The vocabulary must not end up empty
        if self.languages.is_empty() && self.extra_keywords.is_empty() {
            return Err(anyhow!(
                "At least one keyword language or extra keyword is required"
            ));
        }

        // Every requested language needs a built-in keyword set
        for language in &self.languages {
            if keyword_matcher::builtin_keywords(language).is_none() {
                return Err(anyhow!(
                    "Unknown keyword language '{}' (available: {})",
                    language,
                    keyword_matcher::builtin_languages().join(", ")
                ));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            scan: ScanSettings::default(),
            languages: default_languages(),
            extra_keywords: Vec::new(),
            file_extensions: default_file_extensions(),
            log_level: LogLevel::default(),
        }
    }
}
