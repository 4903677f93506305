//! Command-line surface.
//!
//! Usage:
//!   savings-advisor serve --port 8080
//!   savings-advisor advise --income 2500 --savings 100 --target 3000 \
//!       --timeline-months 18 --goal "Japan" --expense rent=800 --expense leisures=250

use std::collections::BTreeMap;
use std::net::IpAddr;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::api::{AdviseError, AdvisePayload, advise_from_payload};

#[derive(Parser, Debug)]
#[command(
    name = "savings-advisor",
    about = "Savings goal advisor (savings rate, feasibility, milestones, 50/30/20 check)"
)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP JSON API
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Evaluate one savings goal and print the report as JSON
    Advise(AdviseArgs),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Advise(#[from] AdviseError),
    #[error("failed to render report: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Args, Debug)]
pub struct AdviseArgs {
    #[arg(long, help = "Monthly net income")]
    pub income: f64,
    #[arg(long, default_value_t = 0.0, help = "Current savings balance")]
    pub savings: f64,
    #[arg(long, help = "Savings target amount")]
    pub target: f64,
    #[arg(
        long,
        conflicts_with = "target_date",
        required_unless_present = "target_date",
        help = "Months left to reach the target"
    )]
    pub timeline_months: Option<i64>,
    #[arg(long, help = "Deadline as YYYY-MM-DD or YYYY-MM")]
    pub target_date: Option<String>,
    #[arg(long, help = "Short description of the goal")]
    pub goal: String,
    #[arg(
        long = "expense",
        value_name = "CATEGORY=AMOUNT",
        value_parser = parse_expense,
        help = "Monthly expense, repeatable (e.g. rent=800)"
    )]
    pub expenses: Vec<(String, f64)>,
    #[arg(long, help = "Date the plans are anchored to, defaults to today")]
    pub reference_date: Option<String>,
    #[arg(long, help = "Pretty-print the JSON report")]
    pub pretty: bool,
}

impl AdviseArgs {
    pub fn into_payload(self) -> AdvisePayload {
        let mut expenses: BTreeMap<String, Option<f64>> = BTreeMap::new();
        for (category, amount) in self.expenses {
            let total = expenses.entry(category).or_insert(Some(0.0));
            *total = total.map(|sum| sum + amount);
        }

        AdvisePayload {
            monthly_income: Some(self.income),
            current_savings: Some(self.savings),
            target_amount: Some(self.target),
            timeline_months: self.timeline_months,
            target_date: self.target_date,
            goal_description: Some(self.goal),
            expenses,
            reference_date: self.reference_date,
        }
    }
}

/// Evaluates the goal described by `args` and renders the API response document.
pub fn render_advice(args: AdviseArgs, today: NaiveDate) -> Result<String, RenderError> {
    let pretty = args.pretty;
    let response = advise_from_payload(args.into_payload(), today)?;
    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    Ok(json)
}

fn parse_expense(raw: &str) -> Result<(String, f64), String> {
    let (name, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=AMOUNT, got {raw:?}"))?;
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid amount for {name}: {e}"))?;
    Ok((name.trim().to_string(), amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 4).expect("valid date")
    }

    fn advise_args(extra: &[&str]) -> AdviseArgs {
        let mut argv = vec![
            "savings-advisor",
            "advise",
            "--income",
            "2500",
            "--savings",
            "100",
            "--target",
            "10000",
            "--goal",
            "Japan",
            "--expense",
            "rent=800",
            "--expense",
            "groceries=300",
            "--expense",
            "transportation=100",
            "--expense",
            "pet_expenses=100",
            "--expense",
            "leisures=250",
        ];
        argv.extend_from_slice(extra);
        let cli = Cli::try_parse_from(argv).expect("arguments parse");
        match cli.command {
            Commands::Advise(args) => args,
            other => panic!("expected advise command, got {other:?}"),
        }
    }

    #[test]
    fn parse_expense_splits_category_and_amount() {
        assert_eq!(
            parse_expense("dining_out= 120.5"),
            Ok(("dining_out".to_string(), 120.5))
        );
        assert!(parse_expense("rent").is_err());
        assert!(parse_expense("rent=lots").is_err());
    }

    #[test]
    fn serve_defaults_to_port_8080() {
        let cli = Cli::try_parse_from(["savings-advisor", "serve"]).expect("parses");
        let Commands::Serve { port, host } = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(port, 8080);
        assert!(host.is_unspecified());
    }

    #[test]
    fn advise_requires_a_timeline_or_date() {
        let err = Cli::try_parse_from([
            "savings-advisor",
            "advise",
            "--income",
            "1",
            "--target",
            "1",
            "--goal",
            "x",
        ])
        .expect_err("timeline required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn repeated_expense_categories_are_summed() {
        let args = advise_args(&["--timeline-months", "6", "--expense", "rent=50"]);
        let payload = args.into_payload();
        assert_eq!(payload.expenses.get("rent"), Some(&Some(850.0)));
    }

    #[test]
    fn render_advice_prints_adjustment_plans() {
        let args = advise_args(&["--timeline-months", "6"]);
        let json = render_advice(args, today()).expect("advice renders");
        assert!(json.contains("\"budget_adjustement_solution_1\":[1650.0,\"2025-06\"]"));
        assert!(json.contains("\"budget_adjustement_solution_2\":[950.0,\"2025-10\"]"));
    }

    #[test]
    fn render_advice_accepts_target_date() {
        let args = advise_args(&[
            "--target-date",
            "2025-06",
            "--reference-date",
            "2024-12-04",
            "--pretty",
        ]);
        let json = render_advice(args, today()).expect("advice renders");
        assert!(json.contains("\"timelineMonths\": 6"));
    }

    #[test]
    fn render_advice_surfaces_validation_errors() {
        let args = advise_args(&["--timeline-months", "6", "--expense", "yacht=5"]);
        let err = render_advice(args, today()).expect_err("unknown category");
        assert!(matches!(err, RenderError::Advise(AdviseError::Invalid(_))));
    }
}
