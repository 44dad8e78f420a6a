//! Credit application decisioning: input normalization, the scoring engine, and the intake
//! service that stores scored applications for review.

pub mod analytics;
pub mod decisioning;
pub mod domain;
pub mod normalizer;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use analytics::{DashboardStats, RiskDistribution};
pub use decisioning::{
    ContributingFactor, DecisionEngine, DecisionResult, FactorImpact, RiskTier, ScoreAdjustment,
    ScoreRule, SCORE_RANGE,
};
pub use domain::{ApplicationId, ApplicationInput, ApplicationStatus, RawApplication, RawField};
pub use normalizer::{normalize, FieldViolation, InputField, InvalidInputError, ViolationReason};
pub use repository::{ApplicationRecord, ApplicationRepository, ApplicationView, RepositoryError};
pub use router::application_router;
pub use service::{ApplicationServiceError, CreditApplicationService};
