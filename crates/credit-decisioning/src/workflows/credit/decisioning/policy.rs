use serde::{Deserialize, Serialize};

/// Coarse default-risk classification derived from the clamped score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn from_score(score: u16) -> Self {
        if score >= 700 {
            RiskTier::Low
        } else if score >= 600 {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

/// Score floors and the approval percentage they map to, checked top-down.
const APPROVAL_STEPS: [(u16, u8); 5] = [(750, 95), (700, 85), (650, 70), (600, 50), (550, 30)];
const APPROVAL_FLOOR_PCT: u8 = 15;

/// Heuristic approval percentage for a score.
///
/// This is a fixed step function, not a calibrated probability: it has never been fitted
/// against historical outcomes and should be presented as guidance only.
pub(crate) fn approval_probability_pct(score: u16) -> u8 {
    APPROVAL_STEPS
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map(|(_, pct)| *pct)
        .unwrap_or(APPROVAL_FLOOR_PCT)
}
