//! Invariants of the decisioning engine that must hold for every valid input.
use credit_decisioning::workflows::credit::{
    ApplicationInput, DecisionEngine, RawApplication, RawField, RiskTier, SCORE_RANGE,
};
use proptest::prelude::*;

fn applicant() -> impl Strategy<Value = ApplicationInput> {
    (
        0.0..2_000_000.0f64,
        0.0..100_000.0f64,
        0.0..50.0f64,
        18u8..=100,
        1_000.0..5_000_000.0f64,
        0u32..20,
    )
        .prop_map(|(income, debt, years, age, credit, lines)| {
            ApplicationInput::new(income, debt, years, age, credit, lines)
                .expect("strategy only generates valid input")
        })
}

proptest! {
    #[test]
    fn score_is_clamped(input in applicant()) {
        let decision = DecisionEngine::new().score(&input);
        prop_assert!(decision.score >= SCORE_RANGE.0);
        prop_assert!(decision.score <= SCORE_RANGE.1);
    }

    #[test]
    fn scoring_is_deterministic(input in applicant()) {
        let engine = DecisionEngine::new();
        prop_assert_eq!(engine.score(&input), engine.score(&input));
    }

    #[test]
    fn tier_and_probability_follow_score(input in applicant()) {
        let decision = DecisionEngine::new().score(&input);
        prop_assert_eq!(decision.risk_tier, RiskTier::from_score(decision.score));
        let expected = match decision.score {
            750..=u16::MAX => 95,
            700..=749 => 85,
            650..=699 => 70,
            600..=649 => 50,
            550..=599 => 30,
            _ => 15,
        };
        prop_assert_eq!(decision.approval_probability_pct, expected);
    }

    #[test]
    fn adjustments_sum_to_unclamped_score(input in applicant()) {
        let decision = DecisionEngine::new().score(&input);
        let raw: i32 = 600 + decision.adjustments.iter().map(|a| i32::from(a.points)).sum::<i32>();
        prop_assert_eq!(i32::from(decision.score), raw.clamp(300, 850));
    }

    #[test]
    fn zero_income_never_fails(age in 18u8..=100, credit in 1_000.0..1_000_000.0f64, debt in 0.0..10_000.0f64) {
        let input = ApplicationInput::new(0.0, debt, 0.0, age, credit, 1).expect("valid input");
        let decision = DecisionEngine::new().score(&input);
        prop_assert_eq!(decision.risk_tier, RiskTier::High);
    }

    #[test]
    fn arbitrary_text_never_panics(
        income in "\\PC*",
        age in "\\PC*",
        credit in "\\PC*",
    ) {
        let raw = RawApplication {
            annual_income: Some(RawField::Text(income)),
            age: Some(RawField::Text(age)),
            credit_amount_requested: Some(RawField::Text(credit)),
            ..RawApplication::default()
        };
        let _ = DecisionEngine::new().decide(&raw);
    }
}
