use crate::infra::InMemoryApplicationRepository;
use clap::Args;
use credit_decisioning::config::IntakeConfig;
use credit_decisioning::error::AppError;
use credit_decisioning::workflows::batch::{BatchOutcome, BatchReport, CsvApplicationImporter};
use credit_decisioning::workflows::credit::{
    ApplicationStatus, CreditApplicationService, DecisionEngine, DecisionResult, FactorImpact,
    RawApplication, RawField,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ScoreArgs {
    /// Gross annual income
    #[arg(long)]
    pub(crate) annual_income: Option<String>,
    /// Total monthly debt payments
    #[arg(long)]
    pub(crate) monthly_debt: Option<String>,
    /// Years with the current employer
    #[arg(long)]
    pub(crate) employment_years: Option<String>,
    /// Applicant age in whole years (18-100)
    #[arg(long)]
    pub(crate) age: Option<String>,
    /// Requested credit amount (at least 1000)
    #[arg(long)]
    pub(crate) credit_amount: Option<String>,
    /// Number of open credit lines
    #[arg(long)]
    pub(crate) existing_credit_lines: Option<String>,
    /// Print the decision as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

impl ScoreArgs {
    fn to_raw(&self) -> RawApplication {
        let field = |value: &Option<String>| value.clone().map(RawField::Text);
        RawApplication {
            annual_income: field(&self.annual_income),
            monthly_debt: field(&self.monthly_debt),
            employment_years: field(&self.employment_years),
            age: field(&self.age),
            credit_amount_requested: field(&self.credit_amount),
            existing_credit_lines: field(&self.existing_credit_lines),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one application per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Stop after this many rows
    #[arg(long)]
    pub(crate) max_rows: Option<usize>,
    /// Print the full report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Leave every demo application pending instead of reviewing them
    #[arg(long)]
    pub(crate) skip_review: bool,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let decision = DecisionEngine::new().decide(&args.to_raw())?;

    if args.json {
        print_json(&decision);
    } else {
        render_decision(&decision, "");
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let mut importer = CsvApplicationImporter::new(DecisionEngine::new());
    if let Some(limit) = args.max_rows {
        importer = importer.with_row_limit(limit);
    }
    let report = importer.from_path(&args.csv)?;

    if args.json {
        print_json(&report);
    } else {
        render_batch(&report);
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let repository = Arc::new(InMemoryApplicationRepository::default());
    let service = CreditApplicationService::new(repository, IntakeConfig::default());

    println!("Credit decisioning demo");
    for (label, raw) in demo_applicants() {
        println!("\n{label}");
        match service.submit(&raw) {
            Ok(record) => {
                println!("  Application {} submitted", record.application_id.0);
                render_decision(&record.decision, "  ");

                if args.skip_review {
                    continue;
                }
                let verdict = if record.decision.approval_probability_pct >= 50 {
                    ApplicationStatus::Approved
                } else {
                    ApplicationStatus::Rejected
                };
                match service.update_status(&record.application_id, verdict) {
                    Ok(updated) => println!("  Reviewer decision: {}", updated.status.label()),
                    Err(err) => println!("  Review failed: {}", err),
                }
            }
            Err(err) => println!("  Submission rejected: {}", err),
        }
    }

    match service.dashboard() {
        Ok(stats) => {
            println!("\nDashboard");
            println!("  Applications: {}", stats.total_applications);
            println!("  Approval rate: {:.1}%", stats.approval_rate);
            println!("  Average loan amount: {:.2}", stats.average_loan_amount);
            println!("  Average credit score: {}", stats.average_credit_score);
            println!(
                "  Risk distribution: {} low / {} medium / {} high",
                stats.risk_distribution.low,
                stats.risk_distribution.medium,
                stats.risk_distribution.high
            );
        }
        Err(err) => println!("\nDashboard unavailable: {}", err),
    }

    Ok(())
}

fn demo_applicants() -> Vec<(&'static str, RawApplication)> {
    let form = |income: &str, debt: &str, years: &str, age: &str, credit: &str, lines: &str| {
        RawApplication {
            annual_income: Some(income.into()),
            monthly_debt: Some(debt.into()),
            employment_years: Some(years.into()),
            age: Some(age.into()),
            credit_amount_requested: Some(credit.into()),
            existing_credit_lines: Some(lines.into()),
        }
    };

    vec![
        (
            "Established professional",
            form("60000", "1000", "6", "40", "15000", "0"),
        ),
        (
            "Recent graduate",
            form("32000", "1200", "1", "24", "12000", "2"),
        ),
        ("No declared income", form("", "", "", "35", "5000", "1")),
        ("Underage applicant", form("18000", "0", "0", "16", "2000", "0")),
    ]
}

fn render_decision(decision: &DecisionResult, indent: &str) {
    println!(
        "{indent}Score: {} | Risk: {} | Approval estimate: {}%",
        decision.score,
        decision.risk_tier.label(),
        decision.approval_probability_pct
    );
    if decision.factors.is_empty() {
        println!("{indent}Factors: none");
    } else {
        println!("{indent}Factors:");
        for factor in &decision.factors {
            let marker = match factor.impact {
                FactorImpact::Positive => '+',
                FactorImpact::Negative => '-',
            };
            println!("{indent}  {marker} {}", factor.text);
        }
    }
}

fn render_batch(report: &BatchReport) {
    println!(
        "Batch scoring: {} row(s), {} scored, {} rejected",
        report.rows.len(),
        report.scored(),
        report.rejected()
    );
    for row in &report.rows {
        match &row.outcome {
            BatchOutcome::Scored(decision) => println!(
                "  line {:>4}: {} ({} risk, {}%)",
                row.line,
                decision.score,
                decision.risk_tier.label(),
                decision.approval_probability_pct
            ),
            BatchOutcome::Rejected(error) => println!("  line {:>4}: {}", row.line, error),
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("JSON output unavailable: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_args_map_to_raw_form_fields() {
        let args = ScoreArgs {
            annual_income: Some("60000".into()),
            age: Some("40".into()),
            credit_amount: Some("15000".into()),
            ..ScoreArgs::default()
        };
        let raw = args.to_raw();
        assert_eq!(raw.credit_amount_requested, Some(RawField::Text("15000".into())));
        assert!(raw.monthly_debt.is_none());
    }

    #[test]
    fn score_command_surfaces_invalid_input() {
        let args = ScoreArgs {
            age: Some("12".into()),
            credit_amount: Some("5000".into()),
            ..ScoreArgs::default()
        };
        assert!(matches!(run_score(args), Err(AppError::Input(_))));
    }

    #[test]
    fn demo_applicants_cover_every_outcome() {
        let engine = DecisionEngine::new();
        let outcomes: Vec<bool> = demo_applicants()
            .iter()
            .map(|(_, raw)| engine.decide(raw).is_ok())
            .collect();
        assert_eq!(outcomes, vec![true, true, true, false]);
    }

    #[test]
    fn demo_runs_end_to_end() {
        run_demo(DemoArgs::default()).expect("demo completes");
    }
}
