// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Result generators that turn a set of screenshots into a tone assessment

pub mod simulated;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::session::CapturedImage;
use crate::{Result, WhisperLensError};

pub use simulated::SimulatedGenerator;

/// What kind of feedback the user asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisOption {
    #[default]
    ResponseAdvice,
    ToneAnalysis,
    HiddenIntentions,
    RelationshipDynamics,
}

impl AnalysisOption {
    pub const ALL: [AnalysisOption; 4] = [
        AnalysisOption::ResponseAdvice,
        AnalysisOption::ToneAnalysis,
        AnalysisOption::HiddenIntentions,
        AnalysisOption::RelationshipDynamics,
    ];

    /// Kebab-case tag used on the command line and in JSON
    pub fn tag(&self) -> &'static str {
        match self {
            AnalysisOption::ResponseAdvice => "response-advice",
            AnalysisOption::ToneAnalysis => "tone-analysis",
            AnalysisOption::HiddenIntentions => "hidden-intentions",
            AnalysisOption::RelationshipDynamics => "relationship-dynamics",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AnalysisOption::ResponseAdvice => "Conseil de réponse",
            AnalysisOption::ToneAnalysis => "Analyse du ton",
            AnalysisOption::HiddenIntentions => "Intentions cachées",
            AnalysisOption::RelationshipDynamics => "Dynamique relationnelle",
        }
    }

    /// The question the option answers, as shown to the user
    pub fn description(&self) -> &'static str {
        match self {
            AnalysisOption::ResponseAdvice => "Comment devrais-je répondre à ce message?",
            AnalysisOption::ToneAnalysis => "Quelle est l'intention derrière ce message?",
            AnalysisOption::HiddenIntentions => "Y a-t-il des intentions non dites?",
            AnalysisOption::RelationshipDynamics => "Que dit cet échange de notre relation?",
        }
    }
}

impl fmt::Display for AnalysisOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for AnalysisOption {
    type Err = WhisperLensError;

    fn from_str(s: &str) -> Result<Self> {
        AnalysisOption::ALL
            .into_iter()
            .find(|option| option.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WhisperLensError::InvalidArgument(format!("unknown analysis option '{}'", s)))
    }
}

/// Detected emotional register of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneType {
    Friendly,
    Flirty,
    Professional,
    Ambiguous,
    Toxic,
    Manipulative,
}

impl ToneType {
    pub const ALL: [ToneType; 6] = [
        ToneType::Friendly,
        ToneType::Flirty,
        ToneType::Professional,
        ToneType::Ambiguous,
        ToneType::Toxic,
        ToneType::Manipulative,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            ToneType::Friendly => "friendly",
            ToneType::Flirty => "flirty",
            ToneType::Professional => "professional",
            ToneType::Ambiguous => "ambiguous",
            ToneType::Toxic => "toxic",
            ToneType::Manipulative => "manipulative",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            ToneType::Friendly => "Amical",
            ToneType::Flirty => "Flirt",
            ToneType::Professional => "Professionnel",
            ToneType::Ambiguous => "Ambigu",
            ToneType::Toxic => "Toxique",
            ToneType::Manipulative => "Manipulateur",
        }
    }
}

impl fmt::Display for ToneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ToneType {
    type Err = WhisperLensError;

    fn from_str(s: &str) -> Result<Self> {
        ToneType::ALL
            .into_iter()
            .find(|tone| tone.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WhisperLensError::InvalidArgument(format!("unknown tone '{}'", s)))
    }
}

/// Outcome of one analysis run, before it is saved to history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tone: ToneType,
    pub advice: String,
}

/// Trait for analysis backends
#[async_trait]
pub trait ResultGenerator: Send + Sync {
    /// Name of this generator
    fn name(&self) -> &'static str;

    /// Assess the screenshots under the chosen option and user comment
    async fn produce_result(
        &self,
        images: &[CapturedImage],
        option: AnalysisOption,
        comment: &str,
    ) -> Result<AnalysisResult>;
}
