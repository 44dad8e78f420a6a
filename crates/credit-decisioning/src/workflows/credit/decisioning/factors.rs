use serde::{Deserialize, Serialize};

use super::super::domain::ApplicationInput;
use super::rules::ScoreSignals;

/// Direction in which a factor pushes the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorImpact {
    Positive,
    Negative,
}

/// Human-readable explanation attached to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributingFactor {
    pub text: String,
    pub impact: FactorImpact,
}

impl ContributingFactor {
    fn positive(text: &str) -> Self {
        Self {
            text: text.to_string(),
            impact: FactorImpact::Positive,
        }
    }

    fn negative(text: &str) -> Self {
        Self {
            text: text.to_string(),
            impact: FactorImpact::Negative,
        }
    }
}

/// Emission order is fixed: income, debt ratio, employment, existing credit.
pub(crate) fn contributing_factors(
    input: &ApplicationInput,
    signals: &ScoreSignals,
) -> Vec<ContributingFactor> {
    let mut factors = Vec::new();

    let income = input.annual_income();
    if income > 75_000.0 {
        factors.push(ContributingFactor::positive("Strong annual income"));
    } else if income < 30_000.0 {
        factors.push(ContributingFactor::negative("Low annual income"));
    }

    let dti = signals.debt_to_income;
    if dti < 0.3 {
        factors.push(ContributingFactor::positive("Low debt-to-income ratio"));
    } else if dti > 0.5 {
        factors.push(ContributingFactor::negative("High debt-to-income ratio"));
    }

    if input.employment_years() > 3.0 {
        factors.push(ContributingFactor::positive("Stable employment history"));
    }

    match input.existing_credit_lines() {
        0 => factors.push(ContributingFactor::positive("No existing credits")),
        lines if lines > 2 => factors.push(ContributingFactor::negative("Multiple existing credits")),
        _ => {}
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &ApplicationInput) -> Vec<(String, FactorImpact)> {
        contributing_factors(input, &ScoreSignals::from_input(input))
            .into_iter()
            .map(|factor| (factor.text, factor.impact))
            .collect()
    }

    #[test]
    fn strong_applicant_collects_positive_factors_in_order() {
        let input = ApplicationInput::new(90_000.0, 500.0, 8.0, 35, 20_000.0, 0).unwrap();
        assert_eq!(
            texts(&input),
            vec![
                ("Strong annual income".to_string(), FactorImpact::Positive),
                ("Low debt-to-income ratio".to_string(), FactorImpact::Positive),
                ("Stable employment history".to_string(), FactorImpact::Positive),
                ("No existing credits".to_string(), FactorImpact::Positive),
            ]
        );
    }

    #[test]
    fn weak_applicant_collects_negative_factors() {
        let input = ApplicationInput::new(24_000.0, 1_200.0, 1.0, 22, 10_000.0, 3).unwrap();
        assert_eq!(
            texts(&input),
            vec![
                ("Low annual income".to_string(), FactorImpact::Negative),
                ("High debt-to-income ratio".to_string(), FactorImpact::Negative),
                ("Multiple existing credits".to_string(), FactorImpact::Negative),
            ]
        );
    }

    #[test]
    fn middle_of_the_road_values_emit_nothing() {
        // income 50k -> 4166.67 monthly; debt 1500 -> ratio 0.36
        let input = ApplicationInput::new(50_000.0, 1_500.0, 3.0, 40, 10_000.0, 2).unwrap();
        assert!(texts(&input).is_empty());
    }

    #[test]
    fn zero_income_reports_high_debt_ratio() {
        let input = ApplicationInput::new(0.0, 0.0, 0.0, 40, 10_000.0, 1).unwrap();
        assert_eq!(
            texts(&input),
            vec![
                ("Low annual income".to_string(), FactorImpact::Negative),
                ("High debt-to-income ratio".to_string(), FactorImpact::Negative),
            ]
        );
    }
}
