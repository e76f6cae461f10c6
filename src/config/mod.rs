// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for WhisperLens

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analyzers::AnalysisOption;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Result generator settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Screenshot import settings
    #[serde(default)]
    pub acquisition: AcquisitionConfig,

    /// Session start-up settings
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Simulated latency before a result is produced
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Fixed RNG seed; random per run when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub default_option: AnalysisOption,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AcquisitionConfig {
    /// Maximum screenshots taken per picking session
    #[serde(default = "default_selection_limit")]
    pub selection_limit: usize,
    /// Simulated per-image processing time
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,
    /// Longest side after downscaling, in pixels
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct SessionConfig {
    /// Start already onboarded
    #[serde(default)]
    pub skip_onboarding: bool,
}

// Default value functions
fn default_delay_ms() -> u64 { 2500 }
fn default_selection_limit() -> usize { 10 }
fn default_processing_delay_ms() -> u64 { 500 }
fn default_max_dimension() -> u32 { 2048 }
fn default_jpeg_quality() -> u8 { 85 }

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            seed: None,
            default_option: AnalysisOption::default(),
        }
    }
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            selection_limit: default_selection_limit(),
            processing_delay_ms: default_processing_delay_ms(),
            max_dimension: default_max_dimension(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::WhisperLensError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the acquisition pipeline cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let acq = &self.acquisition;
        if acq.selection_limit == 0 {
            return Err(crate::WhisperLensError::Config(
                "acquisition.selection_limit must be at least 1".to_string(),
            ));
        }
        if !(1..=100).contains(&acq.jpeg_quality) {
            return Err(crate::WhisperLensError::Config(format!(
                "acquisition.jpeg_quality must be within 1-100, got {}",
                acq.jpeg_quality
            )));
        }
        if acq.max_dimension == 0 {
            return Err(crate::WhisperLensError::Config(
                "acquisition.max_dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
