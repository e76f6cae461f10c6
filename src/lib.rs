// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! WhisperLens: chat screenshot tone analysis
//!
//! Session core for importing chat screenshots, choosing an analysis option and
//! keeping an in-memory history of tone/advice assessments. The analysis backend
//! is a simulated generator behind a swappable trait.

pub mod acquisition;
pub mod analyzers;
pub mod app;
pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod shell;

pub use app::App;
pub use config::AppConfig;
pub use error::{Result, WhisperLensError};
pub use session::Session;
