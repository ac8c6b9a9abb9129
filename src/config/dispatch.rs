//! Dispatcher configuration structures.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, PositionAllocator};
use crate::util::serde::CapacityClass;

/// Queue store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueBackendConfig {
    /// In-memory queues for development/testing.
    #[default]
    InMemory,
    /// JSON-lines files under `data_dir`.
    File,
}

/// What the car directory is known to support, established once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryCapabilities {
    /// The directory tracks an active/suspended flag. When `false`, every car
    /// is treated as active and the suspension check is skipped.
    pub active_flag: bool,
}

impl Default for DirectoryCapabilities {
    fn default() -> Self {
        Self { active_flag: true }
    }
}

/// Root dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Supported capacity classes (seat counts).
    pub capacity_classes: Vec<u32>,
    /// Insert attempts before an admission is reported as congested.
    pub max_insert_attempts: u32,
    /// Timeout applied to each store round-trip, in milliseconds.
    pub store_timeout_ms: u64,
    /// Queue backend selection.
    pub queue: QueueBackendConfig,
    /// Directory for file-backed queues.
    pub data_dir: Option<PathBuf>,
    /// Car directory capabilities.
    pub directory: DirectoryCapabilities,
    /// Maximum events kept by the in-memory audit sink.
    pub audit_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            capacity_classes: vec![4, 5, 6, 7, 8],
            max_insert_attempts: PositionAllocator::DEFAULT_MAX_ATTEMPTS,
            store_timeout_ms: 5_000,
            queue: QueueBackendConfig::InMemory,
            data_dir: None,
            directory: DirectoryCapabilities::default(),
            audit_capacity: 1_024,
        }
    }
}

impl DispatchConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity_classes.is_empty() {
            return Err("at least one capacity class must be defined".into());
        }
        let mut seen = BTreeSet::new();
        for &seats in &self.capacity_classes {
            if seats == 0 {
                return Err("capacity classes must be greater than 0".into());
            }
            if !seen.insert(seats) {
                return Err(format!("capacity class {seats} listed twice"));
            }
        }
        if self.max_insert_attempts == 0 {
            return Err("max_insert_attempts must be greater than 0".into());
        }
        if self.store_timeout_ms == 0 {
            return Err("store_timeout_ms must be greater than 0".into());
        }
        if self.queue == QueueBackendConfig::File && self.data_dir.is_none() {
            return Err("file queue backend requires data_dir".into());
        }
        Ok(())
    }

    /// Supported classes, ascending.
    pub fn classes(&self) -> Vec<CapacityClass> {
        let set: BTreeSet<u32> = self.capacity_classes.iter().copied().collect();
        set.into_iter().map(CapacityClass).collect()
    }

    /// Per-round-trip store timeout.
    pub const fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load configuration from the environment.
    ///
    /// Reads `.env` if present, starts from the JSON file named by
    /// `DISPATCH_CONFIG` (or defaults), then applies the
    /// `DISPATCH_CAPACITY_CLASSES`, `DISPATCH_MAX_INSERT_ATTEMPTS`,
    /// `DISPATCH_STORE_TIMEOUT_MS` and `DISPATCH_DATA_DIR` overrides.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();

        let mut cfg: Self = match std::env::var("DISPATCH_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {path}"))?;
                serde_json::from_str(&raw).with_context(|| format!("parsing config file {path}"))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(raw) = std::env::var("DISPATCH_CAPACITY_CLASSES") {
            cfg.capacity_classes = parse_classes(&raw)?;
        }
        if let Ok(raw) = std::env::var("DISPATCH_MAX_INSERT_ATTEMPTS") {
            cfg.max_insert_attempts = raw
                .trim()
                .parse()
                .context("DISPATCH_MAX_INSERT_ATTEMPTS must be an integer")?;
        }
        if let Ok(raw) = std::env::var("DISPATCH_STORE_TIMEOUT_MS") {
            cfg.store_timeout_ms = raw
                .trim()
                .parse()
                .context("DISPATCH_STORE_TIMEOUT_MS must be an integer")?;
        }
        if let Ok(dir) = std::env::var("DISPATCH_DATA_DIR") {
            cfg.data_dir = Some(PathBuf::from(dir));
            cfg.queue = QueueBackendConfig::File;
        }

        cfg.validate().map_err(anyhow::Error::msg)?;
        Ok(cfg)
    }
}

/// Parse a comma-separated list of seat counts such as `"4,5,6,7,8"`.
pub fn parse_classes(raw: &str) -> AppResult<Vec<u32>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .with_context(|| format!("invalid capacity class `{s}`"))
        })
        .collect()
}
