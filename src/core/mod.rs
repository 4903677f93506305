pub mod calendar;
mod categories;
mod engine;
mod error;
mod report;
mod types;
mod validation;

pub use categories::{ExpenseCategory, ExpenseKind, NON_VITAL_CATEGORIES, VITAL_CATEGORIES};
pub use engine::{
    check_feasibility, classify_50_30_20, compute_savings_rate, evaluate, generate_milestone,
    suggest_adjustment,
};
pub use error::EngineError;
pub use report::{AdvisoryReport, CategoryShare, income_shares};
pub use types::{
    BudgetAdjustment, BudgetClassification, BudgetSplit, BudgetVerdict, Evaluation, Feasibility,
    FinancialFacts, Milestone, Rule503020, SavingsPlan,
};
pub use validation::{FieldError, RawFacts, ValidationErrors, validate};
