//! Pure credit decisioning: score calculation, risk tiering, approval estimate and explanations.
//!
//! Every call depends only on its input, so the engine can be shared freely across threads.

mod factors;
mod policy;
mod rules;

pub use factors::{ContributingFactor, FactorImpact};
pub use policy::RiskTier;

use super::domain::{ApplicationInput, RawApplication};
use super::normalizer::{normalize, InvalidInputError};
use rules::ScoreSignals;
use serde::{Deserialize, Serialize};

/// Lowest and highest score the engine can report.
pub const SCORE_RANGE: (u16, u16) = (rules::MIN_SCORE as u16, rules::MAX_SCORE as u16);

/// Stateless evaluator turning a validated application into a decision.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecisionEngine;

impl DecisionEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, input: &ApplicationInput) -> DecisionResult {
        let signals = ScoreSignals::from_input(input);
        let (adjustments, score) = rules::score_application(input, &signals);

        DecisionResult {
            score,
            risk_tier: RiskTier::from_score(score),
            approval_probability_pct: policy::approval_probability_pct(score),
            factors: factors::contributing_factors(input, &signals),
            adjustments,
        }
    }

    /// Normalize raw form values and score them. Fails before any computation on invalid input.
    pub fn decide(&self, raw: &RawApplication) -> Result<DecisionResult, InvalidInputError> {
        let input = normalize(raw)?;
        Ok(self.score(&input))
    }
}

/// Formula inputs that can move the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRule {
    Income,
    DebtToIncome,
    Employment,
    Age,
    CreditToIncome,
    ExistingCredit,
}

/// Discrete contribution to a score, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreAdjustment {
    pub rule: ScoreRule,
    pub points: i16,
    pub note: String,
}

/// Engine output: one per scored application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    pub score: u16,
    pub risk_tier: RiskTier,
    pub approval_probability_pct: u8,
    pub factors: Vec<ContributingFactor>,
    #[serde(default)]
    pub adjustments: Vec<ScoreAdjustment>,
}

impl DecisionResult {
    pub fn summary(&self) -> String {
        format!(
            "score {} ({} risk, {}% approval estimate)",
            self.score,
            self.risk_tier.label(),
            self.approval_probability_pct
        )
    }
}
