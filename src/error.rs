// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for WhisperLens

use thiserror::Error;

/// Result type alias for WhisperLens operations
pub type Result<T> = std::result::Result<T, WhisperLensError>;

/// WhisperLens error types
#[derive(Error, Debug)]
pub enum WhisperLensError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Acquisition error: {0}")]
    Acquisition(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("No screenshots imported yet")]
    NoCaptures,

    #[error("An analysis result is waiting to be saved or discarded")]
    AnalysisPending,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
