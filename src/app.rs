// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Analysis flow: import, analyze, then save or discard
//!
//! [`App`] is the one context object handed to every collaborator. It owns the
//! [`Session`], the acquisition source and the result generator, and holds the
//! pending result between an analysis run and the user's save/discard choice.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::acquisition::ImageSource;
use crate::analyzers::{AnalysisResult, ResultGenerator, SimulatedGenerator};
use crate::config::AppConfig;
use crate::history::Analysis;
use crate::session::{Screen, Session};
use crate::{Result, WhisperLensError};

/// One screenshot added by [`App::import`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub id: String,
    /// False when the file could not be decoded and its raw bytes were kept
    pub reencoded: bool,
}

pub struct App {
    session: Session,
    source: ImageSource,
    generator: Arc<dyn ResultGenerator>,
    pending: Option<AnalysisResult>,
}

impl App {
    /// Build the application with the simulated generator
    pub fn new(config: &AppConfig) -> Self {
        let generator = Arc::new(SimulatedGenerator::from_config(&config.analysis));
        Self::with_generator(config, generator)
    }

    /// Build the application around any analysis backend
    pub fn with_generator(config: &AppConfig, generator: Arc<dyn ResultGenerator>) -> Self {
        info!("Using result generator: {}", generator.name());
        Self {
            session: Session::from_config(config),
            source: ImageSource::new(config.acquisition.clone()),
            generator,
            pending: None,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Result waiting for save or discard
    pub fn pending(&self) -> Option<&AnalysisResult> {
        self.pending.as_ref()
    }

    /// Run one picking session and add every delivered screenshot in arrival order
    pub async fn import(&mut self, paths: Vec<PathBuf>) -> Vec<Imported> {
        let mut rx = self.source.acquire(paths);
        let mut added = Vec::new();
        while let Some(image) = rx.recv().await {
            let id = self.session.add_captured_image(image.bytes);
            if !image.reencoded {
                warn!(
                    "Capture {} from {:?} is not a readable image, shown as a placeholder",
                    id, image.source
                );
            }
            added.push(Imported {
                id,
                reencoded: image.reencoded,
            });
        }
        let placeholders = added.iter().filter(|i| !i.reencoded).count();
        info!(
            "Picking session added {} screenshot(s), {} placeholder(s)",
            added.len(),
            placeholders
        );
        added
    }

    /// Navigate. Leaving the analysis screen drops any unsaved result.
    pub fn set_active_screen(&mut self, screen: Screen) {
        if screen != Screen::Analyze && self.pending.take().is_some() {
            debug!("Dropped unsaved result on the way to {}", screen);
        }
        self.session.set_active_screen(screen);
    }

    /// Leave the home screen for the analysis screen with the user's comment
    pub fn start_analysis(&mut self, comment: impl Into<String>) -> Result<()> {
        if self.session.captured_images().is_empty() {
            return Err(WhisperLensError::NoCaptures);
        }
        self.session.set_user_comment(comment);
        self.session.set_active_screen(Screen::Analyze);
        Ok(())
    }

    /// Ask the generator for a result and hold it until saved or discarded
    pub async fn run_analysis(&mut self) -> Result<AnalysisResult> {
        if self.pending.is_some() {
            return Err(WhisperLensError::AnalysisPending);
        }
        let state = self.session.state();
        if state.captured_images.is_empty() {
            return Err(WhisperLensError::NoCaptures);
        }

        let result = self
            .generator
            .produce_result(&state.captured_images, state.selected_option, &state.comment)
            .await?;

        info!("Detected tone: {} ({})", result.tone.label(), result.tone);
        self.pending = Some(result.clone());
        Ok(result)
    }

    /// Save the pending result to history and return home.
    ///
    /// Only a result shown on the analysis screen can be saved. The capture
    /// list and selected option are kept as they are.
    pub fn save_result(&mut self) -> Option<Analysis> {
        if self.session.state().active_screen != Screen::Analyze {
            warn!("Nothing to save outside the analysis screen");
            return None;
        }
        let Some(result) = self.pending.take() else {
            warn!("Nothing to save");
            return None;
        };
        let entry = self.session.add_analysis(result.advice, result.tone).clone();
        self.set_active_screen(Screen::Home);
        info!("Saved analysis {}", entry.id);
        Some(entry)
    }

    /// Drop the pending result and return home
    pub fn discard_result(&mut self) {
        self.set_active_screen(Screen::Home);
    }
}
