use anyhow::{Context, Result};
use log::{info, warn};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::default::Default;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::formats::ass::{self, DEFAULT_STYLE_HEADER};

/// Application configuration module
/// This module handles loading, validating and resolving the settings that
/// drive a cleaning run.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Longest time in seconds a single cue may stay on screen
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,

    /// Ordered pattern -> replacement table applied to every line
    #[serde(default)]
    pub replacements: ReplacementTable,

    /// ASS template whose header replaces the built-in style header
    #[serde(default)]
    pub ass_file: Option<PathBuf>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Number of documents processed at the same time
    #[serde(default = "default_concurrent_documents")]
    pub concurrent_documents: usize,

    /// Convert Traditional Chinese text to Simplified before cleaning
    #[serde(default)]
    pub to_simplified: bool,
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

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Ordered pattern -> replacement pairs.
///
/// Keeps the order in which the entries appear in the configuration file. A
/// repeated pattern overwrites the earlier replacement but keeps its
/// position, and an empty (`null`) replacement deletes the match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplacementTable {
    entries: Vec<(String, String)>,
}

impl ReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, replacing the value of an existing pattern in place
    pub fn insert(&mut self, pattern: impl Into<String>, replacement: impl Into<String>) {
        let pattern = pattern.into();
        let replacement = replacement.into();
        match self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            Some(entry) => entry.1 = replacement,
            None => self.entries.push((pattern, replacement)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, r)| (p.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>, R: Into<String>> FromIterator<(P, R)> for ReplacementTable {
    fn from_iter<T: IntoIterator<Item = (P, R)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (pattern, replacement) in iter {
            table.insert(pattern, replacement);
        }
        table
    }
}

impl Serialize for ReplacementTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (pattern, replacement) in &self.entries {
            map.serialize_entry(pattern, replacement)?;
        }
        map.end()
    }
}

struct ReplacementTableVisitor;

impl<'de> Visitor<'de> for ReplacementTableVisitor {
    type Value = ReplacementTable;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping of pattern to replacement text")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut table = ReplacementTable::new();
        while let Some((pattern, replacement)) = access.next_entry::<String, Option<String>>()? {
            table.insert(pattern, replacement.unwrap_or_default());
        }
        Ok(table)
    }

    fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(ReplacementTable::new())
    }
}

impl<'de> Deserialize<'de> for ReplacementTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ReplacementTableVisitor)
    }
}

fn default_max_duration() -> f64 {
    7.0
}

fn default_concurrent_documents() -> usize {
    4
}

impl Config {
    /// Load configuration from `path`.
    ///
    /// `.json` files are read as JSON, anything else as YAML. A missing file
    /// is not an error: the defaults are used.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Config file not found at '{}', using defaults.", path.display());
            return Ok(Self::default());
        }

        info!("Using config file: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Parse a YAML configuration document
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        // An empty YAML document deserializes to null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(content: &str) -> std::result::Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.max_duration.is_finite() || self.max_duration <= 0.0 {
            return Err(ConfigError::InvalidDuration(self.max_duration));
        }

        if self.concurrent_documents == 0 {
            return Err(ConfigError::InvalidConcurrency(self.concurrent_documents));
        }

        Ok(())
    }

    /// Resolve the style header written at the top of every ASS output.
    ///
    /// Uses the header of `ass_file` when it exists and has a dialogue
    /// section; otherwise falls back to the built-in header.
    pub fn style_header(&self) -> Result<String> {
        let Some(template) = &self.ass_file else {
            return Ok(DEFAULT_STYLE_HEADER.to_string());
        };

        if !template.exists() {
            warn!("ASS template not found: {}, using the default style header", template.display());
            return Ok(DEFAULT_STYLE_HEADER.to_string());
        }

        let content = fs::read_to_string(template)
            .with_context(|| format!("Failed to read ASS template: {}", template.display()))?;
        let content = content.trim_start_matches('\u{feff}').trim();

        match ass::split_header(content) {
            Some((header, _)) => {
                info!("Using style header from {}", template.display());
                Ok(header.to_string())
            }
            None => {
                warn!(
                    "ASS template has no Dialogue line, using the default style header: {}",
                    template.display()
                );
                Ok(DEFAULT_STYLE_HEADER.to_string())
            }
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            max_duration: default_max_duration(),
            replacements: ReplacementTable::default(),
            ass_file: None,
            log_level: LogLevel::default(),
            concurrent_documents: default_concurrent_documents(),
            to_simplified: false,
        }
    }
}
