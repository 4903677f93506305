use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::calendar::add_months;
use super::categories::ExpenseCategory;
use super::error::{EngineError, Result};
use super::types::{
    BudgetAdjustment, BudgetClassification, BudgetSplit, BudgetVerdict, Evaluation, Feasibility,
    FinancialFacts, Milestone, Rule503020, SavingsPlan,
};

const ESSENTIALS_SHARE: f64 = 0.5;
const DISCRETIONARY_SHARE: f64 = 0.3;
const SAVINGS_SHARE: f64 = 0.2;

/// Runs every rule in dependency order against a fresh set of derived facts.
///
/// `reference_date` anchors the month arithmetic of the adjustment plans, so the
/// same facts and date always produce the same evaluation.
pub fn evaluate(facts: &FinancialFacts, reference_date: NaiveDate) -> Result<Evaluation> {
    let savings_rate = compute_savings_rate(facts.monthly_income, facts.monthly_expenses());

    let feasibility = check_feasibility(
        savings_rate,
        facts.target_amount,
        facts.timeline_months,
        facts.current_savings,
    )?;

    let milestone = generate_milestone(
        feasibility,
        savings_rate,
        facts.target_amount,
        facts.timeline_months,
        facts.current_savings,
    )?;

    let adjustment = if feasibility.suggest_adjustments() {
        Some(suggest_adjustment(
            savings_rate,
            facts.target_amount,
            facts.current_savings,
            facts.timeline_months,
            facts.non_vital_expenses(),
            reference_date,
        )?)
    } else {
        None
    };

    let classification = classify_50_30_20(
        facts.monthly_income,
        facts.vital_expenses(),
        facts.non_vital_expenses(),
    );

    Ok(Evaluation {
        savings_rate,
        feasibility,
        milestone,
        adjustment,
        classification,
    })
}

/// Monthly saving capacity. A deficit is reported as zero, not as a negative rate.
pub fn compute_savings_rate(income: f64, expenses: f64) -> f64 {
    let savings_rate = (income - expenses).max(0.0);
    debug!(income, expenses, savings_rate, "computed savings rate");
    savings_rate
}

pub fn check_feasibility(
    savings_rate: f64,
    target: f64,
    timeline_months: i64,
    current_savings: f64,
) -> Result<Feasibility> {
    let months = timeline_as_divisor(timeline_months)?;
    let required_rate = target / months;

    // The second branch compares the savings balance with a monthly amount.
    // Kept as-is until the intended formula is confirmed.
    let feasibility = if savings_rate >= required_rate {
        Feasibility::WithoutSavings
    } else if current_savings >= (target - current_savings) / months {
        Feasibility::WithCurrentSavings
    } else {
        Feasibility::NeedsAdjustment
    };

    debug!(savings_rate, required_rate, ?feasibility, "checked feasibility");
    Ok(feasibility)
}

/// Selects the milestone regime from the feasibility branch that fired.
/// Returns `None` when the goal needs adjusting instead.
pub fn generate_milestone(
    feasibility: Feasibility,
    savings_rate: f64,
    target: f64,
    timeline_months: i64,
    current_savings: f64,
) -> Result<Option<Milestone>> {
    let months = timeline_as_divisor(timeline_months)?;

    // A balance that already covers the target wins over any monthly figure.
    let milestone = match feasibility {
        Feasibility::NeedsAdjustment => None,
        _ if current_savings == target => Some(Milestone::TargetMet),
        _ if current_savings > target => Some(Milestone::TargetExceeded {
            surplus: current_savings - target,
        }),
        Feasibility::WithoutSavings => {
            let raw = target / months;
            let net = (target - current_savings) / months;
            Some(Milestone::WithoutSavings {
                raw,
                net,
                savings_exceeds_milestone: savings_rate > net,
            })
        }
        Feasibility::WithCurrentSavings => Some(Milestone::Monthly {
            amount: (target - current_savings) / months,
        }),
    };

    debug!(?milestone, "generated milestone");
    Ok(milestone)
}

pub fn suggest_adjustment(
    savings_rate: f64,
    target: f64,
    current_savings: f64,
    timeline_months: i64,
    non_vital_expenses: &BTreeMap<ExpenseCategory, f64>,
    reference_date: NaiveDate,
) -> Result<BudgetAdjustment> {
    if savings_rate == 0.0 {
        debug!("zero savings rate, goal cannot be reached");
        return Ok(BudgetAdjustment::Impossible);
    }

    let months = timeline_as_divisor(timeline_months)?;
    let deadline_offset = u32::try_from(timeline_months)
        .map_err(|_| EngineError::TimelineTooLong(timeline_months))?;

    let total_needed = target - current_savings;
    let monthly_needed = total_needed / months;
    let additional_needed = monthly_needed - savings_rate;
    // Saturating cast. Horizons past the calendar leave the keep-pace plan undated.
    let months_needed = (total_needed / savings_rate).floor() as u32;

    let keep_deadline = SavingsPlan {
        amount: monthly_needed,
        target_month: add_months(reference_date, deadline_offset)?,
    };
    let keep_pace = match add_months(reference_date, months_needed) {
        Ok(target_month) => Some(SavingsPlan {
            amount: savings_rate,
            target_month,
        }),
        Err(e) => {
            debug!(error = %e, "current pace never reaches the goal on the calendar");
            None
        }
    };
    let reduce_discretionary = non_vital_expenses.values().sum::<f64>() > 0.0;

    debug!(
        total_needed,
        monthly_needed,
        additional_needed,
        months_needed,
        deadline_month = %keep_deadline.target_month,
        completion_month = ?keep_pace.map(|plan| plan.target_month),
        "suggested budget adjustment"
    );

    Ok(BudgetAdjustment::Plans {
        reduce_discretionary,
        total_needed,
        monthly_needed,
        additional_needed,
        months_needed,
        keep_deadline,
        keep_pace,
    })
}

pub fn classify_50_30_20(
    income: f64,
    vital_expenses: &BTreeMap<ExpenseCategory, f64>,
    non_vital_expenses: &BTreeMap<ExpenseCategory, f64>,
) -> BudgetClassification {
    let recommended = BudgetSplit {
        essentials: ESSENTIALS_SHARE * income,
        discretionary: DISCRETIONARY_SHARE * income,
        savings: SAVINGS_SHARE * income,
    };

    let essentials = vital_expenses.values().sum::<f64>();
    let discretionary = non_vital_expenses.values().sum::<f64>();
    let actual = BudgetSplit {
        essentials,
        discretionary,
        savings: (income - (essentials + discretionary)).max(0.0),
    };

    let verdict = if actual.savings >= recommended.savings {
        BudgetVerdict::Success {
            trim_discretionary: actual.discretionary > recommended.discretionary,
        }
    } else {
        BudgetVerdict::Warning
    };

    let classification = BudgetClassification {
        rule: Rule503020 {
            recommended,
            actual,
        },
        verdict,
        essentials_over: actual.essentials > 1.5 * recommended.essentials,
        discretionary_under_30: actual.discretionary < 0.3 * recommended.discretionary,
    };
    debug!(?classification, "classified budget against 50-30-20");
    classification
}

fn timeline_as_divisor(timeline_months: i64) -> Result<f64> {
    if timeline_months <= 0 {
        return Err(EngineError::NonPositiveTimeline(timeline_months));
    }
    Ok(timeline_months as f64)
}
