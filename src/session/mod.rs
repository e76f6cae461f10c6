// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Session state container
//!
//! Single owner of all mutable session state. Every applied mutation publishes
//! an immutable [`Snapshot`] over a watch channel so views can render from the
//! latest snapshot without touching the container.

pub mod images;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::analyzers::{AnalysisOption, ToneType};
use crate::config::AppConfig;
use crate::history::{create_entry, Analysis, History};
use crate::{Result, WhisperLensError};

pub use images::CapturedImage;

/// Top-level screens reachable through navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    #[default]
    Home,
    Analyze,
    History,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Chat Whisper Lens",
            Screen::Analyze => "Analyse",
            Screen::History => "Historique",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            Screen::Home => "Analysez les intentions derrière les messages",
            Screen::Analyze => "Comprenez le message",
            Screen::History => "Consultez vos analyses passées",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Home => "home",
            Screen::Analyze => "analyze",
            Screen::History => "history",
        };
        f.write_str(name)
    }
}

impl FromStr for Screen {
    type Err = WhisperLensError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" => Ok(Screen::Home),
            "analyze" => Ok(Screen::Analyze),
            "history" => Ok(Screen::History),
            other => Err(WhisperLensError::InvalidArgument(format!("unknown screen '{}'", other))),
        }
    }
}

/// What the renderer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Shown until the user is onboarded, regardless of the active screen
    Onboarding,
    Screen(Screen),
}

/// Plain session data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub onboarded: bool,
    pub active_screen: Screen,
    pub captured_images: Vec<CapturedImage>,
    pub selected_option: AnalysisOption,
    pub comment: String,
    /// Shared with earlier snapshots until the next saved analysis
    pub history: Arc<History>,
}

impl SessionState {
    pub fn route(&self) -> Route {
        if self.onboarded {
            Route::Screen(self.active_screen)
        } else {
            Route::Onboarding
        }
    }

    pub fn analyses(&self) -> &[Arc<Analysis>] {
        self.history.entries()
    }
}

/// Immutable view of the session at one revision
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub revision: u64,
    pub state: Arc<SessionState>,
}

impl Deref for Snapshot {
    type Target = SessionState;

    fn deref(&self) -> &SessionState {
        &self.state
    }
}

/// Receiver side of the snapshot channel
pub type SessionWatcher = watch::Receiver<Snapshot>;

/// The session state container
pub struct Session {
    state: SessionState,
    revision: u64,
    publisher: watch::Sender<Snapshot>,
}

impl Session {
    /// Fresh session: not onboarded, home screen, nothing imported
    pub fn new() -> Self {
        Self::with_state(SessionState::default())
    }

    /// Session seeded from configuration defaults
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_state(SessionState {
            onboarded: config.session.skip_onboarding,
            selected_option: config.analysis.default_option,
            ..SessionState::default()
        })
    }

    fn with_state(state: SessionState) -> Self {
        let (publisher, _rx) = watch::channel(Snapshot {
            revision: 0,
            state: Arc::new(state.clone()),
        });
        Self {
            state,
            revision: 0,
            publisher,
        }
    }

    /// Current state, borrowed from the container
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.publisher.borrow().clone()
    }

    /// Subscribe to snapshots published after every applied mutation
    pub fn subscribe(&self) -> SessionWatcher {
        self.publisher.subscribe()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn publish(&mut self) {
        self.revision += 1;
        self.publisher.send_replace(Snapshot {
            revision: self.revision,
            state: Arc::new(self.state.clone()),
        });
    }

    pub fn set_onboarded(&mut self, value: bool) {
        self.state.onboarded = value;
        self.publish();
    }

    pub fn set_active_screen(&mut self, screen: Screen) {
        debug!("Screen -> {}", screen);
        self.state.active_screen = screen;
        self.publish();
    }

    /// Append a capture at the end of the list. Returns its id.
    pub fn add_captured_image(&mut self, bytes: impl Into<Arc<[u8]>>) -> String {
        let image = CapturedImage::new(bytes, self.state.captured_images.len());
        let id = image.id.clone();
        debug!("Added capture {} at #{}", id, image.order);
        self.state.captured_images.push(image);
        self.publish();
        id
    }

    /// Remove a capture by id. Unknown ids are ignored.
    pub fn remove_captured_image(&mut self, id: &str) {
        if images::remove(&mut self.state.captured_images, id) {
            debug!("Removed capture {}", id);
            self.publish();
        }
    }

    /// Move a capture to `new_index`. Unknown ids and out-of-range indices are ignored.
    pub fn update_image_order(&mut self, id: &str, new_index: usize) {
        if images::move_to(&mut self.state.captured_images, id, new_index) {
            debug!("Moved capture {} to #{}", id, new_index);
            self.publish();
        }
    }

    pub fn set_selected_analysis_option(&mut self, option: AnalysisOption) {
        self.state.selected_option = option;
        self.publish();
    }

    pub fn set_user_comment(&mut self, text: impl Into<String>) {
        self.state.comment = text.into();
        self.publish();
    }

    /// Record an analysis of the current captures under the selected option.
    ///
    /// The capture list and selected option are left as they are.
    pub fn add_analysis(&mut self, advice: impl Into<String>, tone: ToneType) -> &Analysis {
        let entry = create_entry(
            self.state.selected_option,
            self.state.captured_images.clone(),
            advice.into(),
            tone,
        );
        debug!("Recorded analysis {} ({})", entry.id, tone);
        Arc::make_mut(&mut self.state.history).append(entry);
        self.publish();
        &self.state.history.entries()[self.state.history.len() - 1]
    }

    pub fn captured_images(&self) -> &[CapturedImage] {
        &self.state.captured_images
    }

    pub fn analyses(&self) -> &[Arc<Analysis>] {
        self.state.history.entries()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_dense_order(session: &Session) {
        for (index, image) in session.captured_images().iter().enumerate() {
            assert_eq!(image.order, index);
        }
    }

    fn ids(session: &Session) -> Vec<String> {
        session.captured_images().iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new();
        let state = session.state();
        assert!(!state.onboarded);
        assert_eq!(state.active_screen, Screen::Home);
        assert_eq!(state.selected_option, AnalysisOption::ResponseAdvice);
        assert!(state.captured_images.is_empty());
        assert!(state.comment.is_empty());
        assert!(state.history.is_empty());
        assert_eq!(state.route(), Route::Onboarding);
    }

    #[test]
    fn test_add_then_remove_first() {
        let mut session = Session::new();
        let a = session.add_captured_image(b"bytes-a".to_vec());
        let b = session.add_captured_image(b"bytes-b".to_vec());

        let orders: Vec<_> = session.captured_images().iter().map(|i| i.order).collect();
        assert_eq!(orders, vec![0, 1]);

        session.remove_captured_image(&a);
        assert_eq!(session.captured_images().len(), 1);
        assert_eq!(session.captured_images()[0].id, b);
        assert_eq!(session.captured_images()[0].order, 0);
        assert_eq!(&*session.captured_images()[0].bytes, b"bytes-b");
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut session = Session::new();
        session.add_captured_image(b"a".to_vec());
        session.add_captured_image(b"b".to_vec());
        let before = session.captured_images().to_vec();
        let revision = session.revision();

        session.remove_captured_image("not-an-id");
        assert_eq!(session.captured_images(), &before[..]);
        assert_eq!(session.revision(), revision);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut session = Session::new();
        let a = session.add_captured_image(b"a".to_vec());
        session.add_captured_image(b"b".to_vec());

        session.remove_captured_image(&a);
        let after_first = session.captured_images().to_vec();
        session.remove_captured_image(&a);
        assert_eq!(session.captured_images(), &after_first[..]);
    }

    #[test]
    fn test_update_order_moves_item() {
        let mut session = Session::new();
        let a = session.add_captured_image(b"a".to_vec());
        let b = session.add_captured_image(b"b".to_vec());
        let c = session.add_captured_image(b"c".to_vec());

        session.update_image_order(&c, 0);
        assert_eq!(ids(&session), vec![c, a, b]);
        assert_dense_order(&session);
    }

    #[test]
    fn test_update_order_ignores_invalid_input() {
        let mut session = Session::new();
        let a = session.add_captured_image(b"a".to_vec());
        session.add_captured_image(b"b".to_vec());
        let before = session.captured_images().to_vec();

        session.update_image_order(&a, 2);
        assert_eq!(session.captured_images(), &before[..]);

        session.update_image_order("unknown", 0);
        assert_eq!(session.captured_images(), &before[..]);
    }

    #[test]
    fn test_order_stays_dense_under_random_edits() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut session = Session::new();

        for step in 0..500 {
            let len = session.captured_images().len();
            match rng.gen_range(0..3) {
                0 => {
                    session.add_captured_image(vec![step as u8]);
                }
                1 if len > 0 => {
                    let id = session.captured_images()[rng.gen_range(0..len)].id.clone();
                    session.remove_captured_image(&id);
                }
                2 if len > 0 => {
                    let id = session.captured_images()[rng.gen_range(0..len)].id.clone();
                    // Deliberately include one out-of-range target
                    session.update_image_order(&id, rng.gen_range(0..=len));
                }
                _ => {}
            }
            assert_dense_order(&session);
        }
    }

    #[test]
    fn test_analysis_snapshot_is_isolated() {
        let mut session = Session::new();
        let a = session.add_captured_image(b"a".to_vec());
        session.add_captured_image(b"b".to_vec());
        let saved_images = session.captured_images().to_vec();

        session.add_analysis("advice", ToneType::Friendly);
        session.remove_captured_image(&a);

        assert_eq!(session.captured_images().len(), 1);
        assert_eq!(session.analyses()[0].images, saved_images);
    }

    #[test]
    fn test_add_analysis_keeps_working_state() {
        let mut session = Session::new();
        session.add_captured_image(b"a".to_vec());
        session.set_selected_analysis_option(AnalysisOption::HiddenIntentions);

        let entry = session.add_analysis("advice", ToneType::Toxic).clone();
        assert_eq!(entry.selected_option, AnalysisOption::HiddenIntentions);
        assert_eq!(entry.tone, ToneType::Toxic);

        assert_eq!(session.captured_images().len(), 1);
        assert_eq!(session.state().selected_option, AnalysisOption::HiddenIntentions);
    }

    #[test]
    fn test_history_is_append_only() {
        let mut session = Session::new();
        session.add_analysis("one", ToneType::Friendly);
        session.add_analysis("two", ToneType::Flirty);
        session.add_analysis("three", ToneType::Professional);

        let advice: Vec<_> = session.analyses().iter().map(|a| a.advice.as_str()).collect();
        assert_eq!(advice, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_snapshots_share_history() {
        let mut session = Session::new();
        session.add_captured_image(b"a".to_vec());
        for i in 0..50 {
            session.add_analysis(format!("advice {}", i), ToneType::Ambiguous);
        }

        let before = session.snapshot();
        session.set_user_comment("edit");
        session.add_captured_image(b"b".to_vec());
        let after = session.snapshot();

        assert!(Arc::ptr_eq(&before.history, &after.history));
        assert_eq!(before.history.entries().as_ptr(), after.history.entries().as_ptr());

        // A new analysis replaces the list but keeps the recorded entries
        session.add_analysis("one more", ToneType::Friendly);
        let latest = session.snapshot();
        assert_eq!(before.history.len(), 50);
        assert_eq!(latest.history.len(), 51);
        assert!(Arc::ptr_eq(&before.analyses()[0], &latest.analyses()[0]));
    }

    #[test]
    fn test_onboarded_reflects_last_call() {
        let mut session = Session::new();
        session.set_onboarded(true);
        assert_eq!(session.state().route(), Route::Screen(Screen::Home));
        session.set_onboarded(false);
        assert!(!session.state().onboarded);
        assert_eq!(session.state().route(), Route::Onboarding);
    }

    #[test]
    fn test_onboarding_gate_hides_active_screen() {
        let mut session = Session::new();
        session.set_active_screen(Screen::History);
        assert_eq!(session.state().route(), Route::Onboarding);
        session.set_onboarded(true);
        assert_eq!(session.state().route(), Route::Screen(Screen::History));
    }

    #[test]
    fn test_setters() {
        let mut session = Session::new();
        session.set_user_comment("on se parle depuis deux jours");
        session.set_selected_analysis_option(AnalysisOption::RelationshipDynamics);
        assert_eq!(session.state().comment, "on se parle depuis deux jours");
        assert_eq!(session.state().selected_option, AnalysisOption::RelationshipDynamics);
    }

    #[test]
    fn test_subscribers_see_snapshots() {
        let mut session = Session::new();
        let mut rx = session.subscribe();
        assert!(!rx.has_changed().unwrap());

        let id = session.add_captured_image(b"a".to_vec());
        assert!(rx.has_changed().unwrap());
        {
            let snapshot = rx.borrow_and_update();
            assert_eq!(snapshot.revision, 1);
            assert_eq!(snapshot.captured_images[0].id, id);
        }

        // Ignored mutations publish nothing
        session.update_image_order(&id, 5);
        assert!(!rx.has_changed().unwrap());

        // Old snapshots are unaffected by later mutations
        let held = session.snapshot();
        session.remove_captured_image(&id);
        assert_eq!(held.captured_images.len(), 1);
        assert!(session.snapshot().captured_images.is_empty());
    }

    #[test]
    fn test_from_config() {
        let mut config = AppConfig::default();
        config.session.skip_onboarding = true;
        config.analysis.default_option = AnalysisOption::ToneAnalysis;

        let session = Session::from_config(&config);
        assert!(session.state().onboarded);
        assert_eq!(session.state().selected_option, AnalysisOption::ToneAnalysis);
    }

    #[test]
    fn test_screen_parsing() {
        assert_eq!("History".parse::<Screen>().unwrap(), Screen::History);
        assert!("settings".parse::<Screen>().is_err());
        assert_eq!(Screen::Analyze.to_string(), "analyze");
    }
}
