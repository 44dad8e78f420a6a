use serde::{Deserialize, Serialize};

use super::decisioning::RiskTier;
use super::domain::ApplicationStatus;
use super::repository::ApplicationRecord;

/// Portfolio summary backing the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_applications: usize,
    /// Percentage of all applications that were approved.
    pub approval_rate: f64,
    pub average_loan_amount: f64,
    pub average_credit_score: u16,
    pub risk_distribution: RiskDistribution,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskDistribution {
    fn record(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Low => self.low += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::High => self.high += 1,
        }
    }
}

impl DashboardStats {
    pub fn from_records(records: &[ApplicationRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total = records.len();
        let mut approved = 0usize;
        let mut loan_total = 0.0;
        let mut score_total = 0u64;
        let mut risk_distribution = RiskDistribution::default();

        for record in records {
            if record.status == ApplicationStatus::Approved {
                approved += 1;
            }
            loan_total += record.input.credit_amount_requested();
            score_total += u64::from(record.decision.score);
            risk_distribution.record(record.decision.risk_tier);
        }

        let average_loan_amount = (loan_total / total as f64 * 100.0).round() / 100.0;

        Self {
            total_applications: total,
            approval_rate: approved as f64 / total as f64 * 100.0,
            average_loan_amount,
            average_credit_score: (score_total / total as u64) as u16,
            risk_distribution,
        }
    }
}
