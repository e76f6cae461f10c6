// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Screenshot import
//!
//! One call to [`ImageSource::acquire`] is one picking session. Every selected
//! file is read and prepared on its own task and posted to a channel as soon as
//! it is ready, so delivery order is completion order. Failures stay here: an
//! unreadable file is skipped and undecodable bytes are delivered unchanged.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::AcquisitionConfig;
use crate::{Result, WhisperLensError};

/// A screenshot ready to hand to the session
#[derive(Debug, Clone)]
pub struct AcquiredImage {
    pub source: PathBuf,
    pub bytes: Vec<u8>,
    /// False when the bytes could not be decoded and were passed through raw
    pub reencoded: bool,
}

/// Reads screenshots from disk and normalises them to JPEG
#[derive(Debug, Clone, Default)]
pub struct ImageSource {
    config: AcquisitionConfig,
}

impl ImageSource {
    pub fn new(config: AcquisitionConfig) -> Self {
        Self { config }
    }

    /// Start a picking session. The receiver closes once every item has been delivered.
    pub fn acquire(&self, paths: Vec<PathBuf>) -> mpsc::Receiver<AcquiredImage> {
        let limit = self.config.selection_limit;
        if paths.len() > limit {
            warn!(
                "Selected {} screenshots, only the first {} are imported",
                paths.len(),
                limit
            );
        }

        let (tx, rx) = mpsc::channel(limit.max(1));
        for path in paths.into_iter().take(limit) {
            let tx = tx.clone();
            let config = self.config.clone();
            tokio::spawn(async move {
                match load_image(&path, &config).await {
                    Ok(image) => {
                        if tx.send(image).await.is_err() {
                            debug!("Picking session closed before {:?} was delivered", path);
                        }
                    }
                    Err(e) => warn!("Skipping {:?}: {}", path, e),
                }
            });
        }

        rx
    }
}

/// Read one file and prepare it off the async workers
async fn load_image(path: &Path, config: &AcquisitionConfig) -> Result<AcquiredImage> {
    let data = tokio::fs::read(path).await?;

    if config.processing_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.processing_delay_ms)).await;
    }

    let max_dimension = config.max_dimension;
    let quality = config.jpeg_quality;
    let source = path.to_path_buf();

    let (bytes, reencoded) = tokio::task::spawn_blocking(move || {
        match prepare_image(&data, max_dimension, quality) {
            Ok(jpeg) => (jpeg, true),
            Err(e) => {
                warn!("Could not decode screenshot, keeping original bytes: {}", e);
                (data, false)
            }
        }
    })
    .await
    .map_err(|e| WhisperLensError::Acquisition(format!("Image task failed: {}", e)))?;

    info!("Imported {:?} ({} bytes)", source, bytes.len());

    Ok(AcquiredImage {
        source,
        bytes,
        reencoded,
    })
}

/// Downscale to fit `max_dimension` and re-encode as JPEG
pub fn prepare_image(data: &[u8], max_dimension: u32, quality: u8) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data)?;

    let img = if img.width() > max_dimension || img.height() > max_dimension {
        img.resize(max_dimension, max_dimension, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel
    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    JpegEncoder::new_with_quality(&mut buffer, quality).encode_image(&rgb)?;

    Ok(buffer)
}
