use super::super::domain::ApplicationInput;
use super::{ScoreAdjustment, ScoreRule};

pub(crate) const BASE_SCORE: i32 = 600;
pub(crate) const MIN_SCORE: i32 = 300;
pub(crate) const MAX_SCORE: i32 = 850;

/// Ratios shared between the score calculator and the factor analyzer.
pub(crate) struct ScoreSignals {
    pub debt_to_income: f64,
    pub credit_to_income: f64,
}

impl ScoreSignals {
    pub(crate) fn from_input(input: &ApplicationInput) -> Self {
        let income = input.annual_income();
        Self {
            debt_to_income: ratio(input.monthly_debt(), income / 12.0),
            credit_to_income: ratio(input.credit_amount_requested(), income),
        }
    }
}

/// Zero income has no meaningful ratio; it resolves to the worst case.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        f64::INFINITY
    }
}

pub(crate) fn score_application(
    input: &ApplicationInput,
    signals: &ScoreSignals,
) -> (Vec<ScoreAdjustment>, u16) {
    let mut adjustments = Vec::new();
    let mut record = |rule: ScoreRule, points: i16, note: String| {
        if points != 0 {
            adjustments.push(ScoreAdjustment { rule, points, note });
        }
    };

    let income = input.annual_income();
    let income_points = if income > 100_000.0 {
        100
    } else if income > 50_000.0 {
        50
    } else if income > 30_000.0 {
        25
    } else {
        0
    };
    record(
        ScoreRule::Income,
        income_points,
        format!("annual income {income:.0}"),
    );

    let dti = signals.debt_to_income;
    let dti_points = if dti < 0.2 {
        50
    } else if dti < 0.4 {
        25
    } else if dti > 0.6 {
        -50
    } else {
        0
    };
    record(
        ScoreRule::DebtToIncome,
        dti_points,
        format!("debt-to-income ratio {}", format_ratio(dti)),
    );

    let years = input.employment_years();
    let employment_points = if years > 5.0 {
        40
    } else if years > 2.0 {
        20
    } else {
        0
    };
    record(
        ScoreRule::Employment,
        employment_points,
        format!("{years} year(s) of employment"),
    );

    let age = input.age();
    let age_points = match age {
        30..=50 => 30,
        51..=u8::MAX => 15,
        _ => 0,
    };
    record(ScoreRule::Age, age_points, format!("applicant age {age}"));

    let cti = signals.credit_to_income;
    let credit_points = if cti < 0.3 {
        30
    } else if cti > 0.8 {
        -40
    } else {
        0
    };
    record(
        ScoreRule::CreditToIncome,
        credit_points,
        format!("credit-to-income ratio {}", format_ratio(cti)),
    );

    let lines = input.existing_credit_lines();
    let credit_line_points = match lines {
        0 => 20,
        1..=3 => 0,
        _ => -30,
    };
    record(
        ScoreRule::ExistingCredit,
        credit_line_points,
        format!("{lines} existing credit line(s)"),
    );

    let raw_score = BASE_SCORE
        + adjustments
            .iter()
            .map(|adjustment| i32::from(adjustment.points))
            .sum::<i32>();
    let score = raw_score.clamp(MIN_SCORE, MAX_SCORE) as u16;

    (adjustments, score)
}

fn format_ratio(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "undefined (no income)".to_string()
    }
}
