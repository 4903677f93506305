use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use super::categories::ExpenseCategory;
use super::types::FinancialFacts;

/// A form submission before any checks have run.
#[derive(Debug, Clone, Default)]
pub struct RawFacts {
    pub monthly_income: Option<f64>,
    pub current_savings: Option<f64>,
    pub target_amount: Option<f64>,
    pub timeline_months: Option<i64>,
    pub goal_description: Option<String>,
    pub expenses: BTreeMap<String, Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field that failed, in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid input: {}", summary(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn validate(raw: RawFacts) -> Result<FinancialFacts, ValidationErrors> {
    let mut errors = Vec::new();
    let mut reject = |field: &str, message: &str| {
        errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    };

    let income = raw.monthly_income.filter(|v| v.is_finite() && *v > 0.0);
    if income.is_none() {
        reject("monthly_income", "Income must be a positive number.");
    }

    let savings = raw.current_savings.filter(|v| v.is_finite() && *v >= 0.0);
    if savings.is_none() {
        reject("current_savings", "Saving must be a non-negative number.");
    }

    let goal = raw
        .goal_description
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty());
    if goal.is_none() {
        reject("goal_description", "Goal description cannot be empty.");
    }

    let target = raw.target_amount.filter(|v| v.is_finite() && *v > 0.0);
    if target.is_none() {
        reject("target_amount", "Saving target must be a positive number.");
    }

    let timeline = raw.timeline_months.filter(|v| *v > 0);
    if timeline.is_none() {
        reject(
            "timeline_months",
            "Saving timeline must be a positive number of months.",
        );
    }

    let mut expenses = Vec::with_capacity(raw.expenses.len());
    for (name, cost) in &raw.expenses {
        let field = format!("expenses.{name}");
        let Some(category) = ExpenseCategory::parse(name) else {
            reject(&field, "Unknown expense category.");
            continue;
        };
        match cost.filter(|v| v.is_finite() && *v > 0.0) {
            Some(amount) => expenses.push((category, amount)),
            None => reject(&field, "Cost must be a positive number."),
        }
    }

    match (income, savings, target, timeline, goal) {
        (Some(income), Some(savings), Some(target), Some(timeline), Some(goal))
            if errors.is_empty() =>
        {
            Ok(FinancialFacts::new(
                income, savings, target, timeline, goal, expenses,
            ))
        }
        _ => Err(ValidationErrors(errors)),
    }
}
