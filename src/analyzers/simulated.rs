// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Placeholder generator that picks a tone and advice at random

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info};

use super::{AnalysisOption, AnalysisResult, ResultGenerator, ToneType};
use crate::config::AnalysisConfig;
use crate::session::CapturedImage;
use crate::{Result, WhisperLensError};

/// Fixed advice table the simulated backend draws from
pub const ADVICE: [&str; 4] = [
    "Ce message est clairement professionnel. La personne souhaite établir une relation de travail. \
     Répondez de manière formelle tout en restant cordiale.",
    "Il y a une ambiguïté dans ce message. La personne semble intéressée mais garde une certaine distance. \
     Clarifiez ses intentions avant d'aller plus loin.",
    "Le ton est amical mais avec des sous-entendus. La personne cherche probablement à créer un lien plus \
     personnel. Vous pouvez répondre de façon détendue mais sans vous engager trop.",
    "Ce message contient des drapeaux rouges. La personne utilise des techniques de manipulation \
     émotionnelle. Soyez prudent dans votre réponse et maintenez des limites claires.",
];

/// Generator that waits a fixed delay, then draws uniformly from the tone set
/// and the advice table. Inputs are ignored.
pub struct SimulatedGenerator {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl SimulatedGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic generator for reproducible runs
    pub fn with_seed(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        let delay = Duration::from_millis(config.delay_ms);
        match config.seed {
            Some(seed) => Self::with_seed(delay, seed),
            None => Self::new(delay),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn draw(&self) -> Result<AnalysisResult> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| WhisperLensError::Analysis("Generator lock poisoned".to_string()))?;

        let tone = ToneType::ALL
            .choose(&mut *rng)
            .copied()
            .unwrap_or(ToneType::Professional);
        let advice = ADVICE.choose(&mut *rng).copied().unwrap_or(ADVICE[0]);

        Ok(AnalysisResult {
            tone,
            advice: advice.to_string(),
        })
    }
}

impl Default for SimulatedGenerator {
    fn default() -> Self {
        Self::new(Duration::from_millis(2500))
    }
}

#[async_trait]
impl ResultGenerator for SimulatedGenerator {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn produce_result(
        &self,
        images: &[CapturedImage],
        option: AnalysisOption,
        comment: &str,
    ) -> Result<AnalysisResult> {
        info!(
            "Analyzing {} screenshot(s) for '{}' ({} char comment)",
            images.len(),
            option,
            comment.chars().count()
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = self.draw()?;
        debug!("Simulated tone: {}", result.tone);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[tokio::test]
    async fn test_result_comes_from_fixed_tables() {
        let generator = SimulatedGenerator::with_seed(Duration::ZERO, 7);
        for _ in 0..20 {
            let result = generator
                .produce_result(&[], AnalysisOption::ToneAnalysis, "")
                .await
                .unwrap();
            assert!(ToneType::ALL.contains(&result.tone));
            assert!(ADVICE.contains(&result.advice.as_str()));
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_sequence() {
        let a = SimulatedGenerator::with_seed(Duration::ZERO, 42);
        let b = SimulatedGenerator::with_seed(Duration::ZERO, 42);
        for _ in 0..5 {
            let ra = a.produce_result(&[], AnalysisOption::default(), "").await.unwrap();
            let rb = b.produce_result(&[], AnalysisOption::default(), "").await.unwrap();
            assert_eq!(ra, rb);
        }
    }

    #[tokio::test]
    async fn test_draws_cover_every_tone() {
        let generator = SimulatedGenerator::with_seed(Duration::ZERO, 1);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            let result = generator.produce_result(&[], AnalysisOption::default(), "").await.unwrap();
            seen.insert(result.tone);
        }
        assert_eq!(seen.len(), ToneType::ALL.len());
    }

    #[tokio::test]
    async fn test_waits_for_configured_delay() {
        let generator = SimulatedGenerator::with_seed(Duration::from_millis(30), 3);
        let start = std::time::Instant::now();
        generator.produce_result(&[], AnalysisOption::default(), "").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_from_config() {
        let config = AnalysisConfig {
            delay_ms: 10,
            seed: Some(9),
            default_option: AnalysisOption::HiddenIntentions,
        };
        let generator = SimulatedGenerator::from_config(&config);
        assert_eq!(generator.delay(), Duration::from_millis(10));
        assert_eq!(SimulatedGenerator::default().delay(), Duration::from_millis(2500));
    }
}
