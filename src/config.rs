// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from an optional YAML file and then overridden by
//! environment variables:
//!
//! - `STROKESEG_CONFIG`: path of the YAML file (default `strokeseg.yaml`)
//! - `STROKESEG_BACKEND_URL`: base URL of the processing backend
//!
//! A missing file yields the defaults; a file that fails to parse is an error.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "STROKESEG_CONFIG";
pub const BACKEND_URL_ENV: &str = "STROKESEG_BACKEND_URL";
pub const DEFAULT_CONFIG_FILE: &str = "strokeseg.yaml";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
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
    /// Filter string understood by `env_logger`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Connection and polling settings for the processing backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// Status checks before giving up; 0 polls forever.
    pub max_poll_attempts: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: 60,
            connect_timeout_secs: 10,
            poll_interval_ms: 5000,
            max_poll_attempts: 720,
        }
    }
}

impl ServiceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_limit(&self) -> Option<u32> {
        (self.max_poll_attempts > 0).then_some(self.max_poll_attempts)
    }
}

/// Display box and stroke appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Size of the fixed box a loaded image is fitted into.
    pub width: u32,
    pub height: u32,
    pub stroke_color: [u8; 3],
    /// Stroke width in working-resolution pixels (scaled by zoom on screen).
    pub stroke_width: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            stroke_color: [255, 0, 0],
            stroke_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: LogLevel,
    pub service: ServiceConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Load from the configured file (if any) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            config.service.base_url = url;
        }
        config.normalize()?;
        Ok(config)
    }

    /// Parse a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml(&yaml).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.normalize()?;
        Ok(config)
    }

    fn normalize(&mut self) -> Result<()> {
        self.service.base_url = self.service.base_url.trim_end_matches('/').to_string();
        if self.display.width == 0 || self.display.height == 0 {
            anyhow::bail!(
                "display box must be non-empty, got {}x{}",
                self.display.width,
                self.display.height
            );
        }
        if !(self.display.stroke_width.is_finite() && self.display.stroke_width > 0.0) {
            anyhow::bail!("stroke_width must be positive, got {}", self.display.stroke_width);
        }
        Ok(())
    }
}
