use super::common::*;
use crate::workflows::credit::domain::{ApplicationInput, RawField};
use crate::workflows::credit::normalizer::InputField;
use crate::workflows::credit::{
    ContributingFactor, DecisionEngine, FactorImpact, RiskTier, ScoreRule,
};

fn factor_texts(factors: &[ContributingFactor]) -> Vec<(&str, FactorImpact)> {
    factors
        .iter()
        .map(|factor| (factor.text.as_str(), factor.impact))
        .collect()
}

#[test]
fn strong_applicant_scores_low_risk() {
    let decision = DecisionEngine::new()
        .decide(&strong_application())
        .expect("valid application");

    assert_eq!(decision.score, 795);
    assert_eq!(decision.risk_tier, RiskTier::Low);
    assert_eq!(decision.approval_probability_pct, 95);
    assert_eq!(
        factor_texts(&decision.factors),
        vec![
            ("Low debt-to-income ratio", FactorImpact::Positive),
            ("Stable employment history", FactorImpact::Positive),
            ("No existing credits", FactorImpact::Positive),
        ]
    );
}

#[test]
fn adjustments_explain_the_score() {
    let decision = DecisionEngine::new()
        .decide(&strong_application())
        .expect("valid application");

    let rules: Vec<(ScoreRule, i16)> = decision
        .adjustments
        .iter()
        .map(|adjustment| (adjustment.rule, adjustment.points))
        .collect();
    assert_eq!(
        rules,
        vec![
            (ScoreRule::Income, 50),
            (ScoreRule::DebtToIncome, 25),
            (ScoreRule::Employment, 40),
            (ScoreRule::Age, 30),
            (ScoreRule::CreditToIncome, 30),
            (ScoreRule::ExistingCredit, 20),
        ]
    );
}

#[test]
fn income_at_the_upper_boundary_earns_the_middle_tier() {
    let mut raw = strong_application();
    raw.annual_income = Some(RawField::Number(100_000.0));
    let decision = DecisionEngine::new().decide(&raw).expect("valid application");

    let income = decision
        .adjustments
        .iter()
        .find(|adjustment| adjustment.rule == ScoreRule::Income)
        .expect("income adjustment recorded");
    assert_eq!(income.points, 50);
}

#[test]
fn zero_income_is_high_risk_without_failing() {
    let decision = DecisionEngine::new()
        .decide(&no_income_application())
        .expect("zero income is valid");

    assert_eq!(decision.score, 510);
    assert_eq!(decision.risk_tier, RiskTier::High);
    assert_eq!(decision.approval_probability_pct, 15);
    assert_eq!(
        factor_texts(&decision.factors),
        vec![
            ("Low annual income", FactorImpact::Negative),
            ("High debt-to-income ratio", FactorImpact::Negative),
        ]
    );
}

#[test]
fn underage_applicants_are_rejected_before_scoring() {
    let error = DecisionEngine::new()
        .decide(&underage_application())
        .expect_err("age 15 is invalid");
    assert!(error.involves(InputField::Age));
    assert_eq!(error.violations().len(), 1);
}

#[test]
fn scoring_is_deterministic() {
    let engine = DecisionEngine::new();
    let input = ApplicationInput::new(82_000.0, 2_400.0, 3.5, 52, 40_000.0, 3)
        .expect("valid input");
    assert_eq!(engine.score(&input), engine.score(&input));
}

#[test]
fn decision_serializes_with_camel_case_keys() {
    let decision = DecisionEngine::new()
        .decide(&strong_application())
        .expect("valid application");
    let json = serde_json::to_value(&decision).expect("serializes");

    assert_eq!(json["score"], 795);
    assert_eq!(json["riskTier"], "Low");
    assert_eq!(json["approvalProbabilityPct"], 95);
    assert_eq!(json["factors"][0]["impact"], "Positive");
}
