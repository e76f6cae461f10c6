// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! In-memory history of saved analyses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::analyzers::{AnalysisOption, ToneType};
use crate::session::CapturedImage;

/// A saved analysis. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub id: String,
    pub selected_option: AnalysisOption,
    /// Copy of the capture list at save time
    pub images: Vec<CapturedImage>,
    pub timestamp: DateTime<Utc>,
    pub advice: String,
    pub tone: ToneType,
}

/// Append-only list of analyses in save order.
///
/// Entries are shared, so cloning the list copies pointers rather than records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Arc<Analysis>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the history
    pub fn append(&mut self, entry: Analysis) {
        self.entries.push(Arc::new(entry));
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[Arc<Analysis>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Create a new history entry stamped with a fresh id and the current time
pub fn create_entry(
    selected_option: AnalysisOption,
    images: Vec<CapturedImage>,
    advice: String,
    tone: ToneType,
) -> Analysis {
    Analysis {
        id: uuid::Uuid::new_v4().to_string(),
        selected_option,
        images,
        timestamp: Utc::now(),
        advice,
        tone,
    }
}
