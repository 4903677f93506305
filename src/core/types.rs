use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use super::calendar::YearMonth;
use super::categories::{ExpenseCategory, ExpenseKind};

/// One user's financial situation, immutable for the duration of an evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialFacts {
    pub monthly_income: f64,
    pub current_savings: f64,
    pub target_amount: f64,
    pub timeline_months: i64,
    pub goal_description: String,
    vital_expenses: BTreeMap<ExpenseCategory, f64>,
    non_vital_expenses: BTreeMap<ExpenseCategory, f64>,
}

impl FinancialFacts {
    /// Files every expense under its vocabulary. A category listed twice is summed.
    pub fn new(
        monthly_income: f64,
        current_savings: f64,
        target_amount: f64,
        timeline_months: i64,
        goal_description: impl Into<String>,
        expenses: impl IntoIterator<Item = (ExpenseCategory, f64)>,
    ) -> Self {
        let mut vital_expenses = BTreeMap::new();
        let mut non_vital_expenses = BTreeMap::new();
        for (category, amount) in expenses {
            let bucket = match category.kind() {
                ExpenseKind::Vital => &mut vital_expenses,
                ExpenseKind::NonVital => &mut non_vital_expenses,
            };
            *bucket.entry(category).or_insert(0.0) += amount;
        }

        Self {
            monthly_income,
            current_savings,
            target_amount,
            timeline_months,
            goal_description: goal_description.into(),
            vital_expenses,
            non_vital_expenses,
        }
    }

    pub fn vital_expenses(&self) -> &BTreeMap<ExpenseCategory, f64> {
        &self.vital_expenses
    }

    pub fn non_vital_expenses(&self) -> &BTreeMap<ExpenseCategory, f64> {
        &self.non_vital_expenses
    }

    pub fn total_vital(&self) -> f64 {
        self.vital_expenses.values().sum()
    }

    pub fn total_non_vital(&self) -> f64 {
        self.non_vital_expenses.values().sum()
    }

    pub fn monthly_expenses(&self) -> f64 {
        self.total_vital() + self.total_non_vital()
    }
}

/// Outcome of the feasibility rule. Exactly one branch holds per evaluation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Feasibility {
    /// The savings rate alone covers `target / timeline`.
    WithoutSavings,
    /// Reachable only once current savings are counted.
    WithCurrentSavings,
    NeedsAdjustment,
}

impl Feasibility {
    pub fn goal_achievable(self) -> bool {
        !self.suggest_adjustments()
    }

    pub fn goal_achievable_without_savings(self) -> bool {
        self == Feasibility::WithoutSavings
    }

    pub fn suggest_adjustments(self) -> bool {
        self == Feasibility::NeedsAdjustment
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Milestone {
    WithoutSavings {
        raw: f64,
        net: f64,
        savings_exceeds_milestone: bool,
    },
    TargetMet,
    TargetExceeded {
        surplus: f64,
    },
    Monthly {
        amount: f64,
    },
}

impl Milestone {
    /// The monthly contribution declared by the milestone, if any.
    pub fn monthly_milestone(&self) -> Option<f64> {
        match *self {
            Milestone::WithoutSavings { raw, .. } => Some(raw),
            Milestone::Monthly { amount } => Some(amount),
            Milestone::TargetMet | Milestone::TargetExceeded { .. } => None,
        }
    }

    pub fn savings_exceeds_milestone(&self) -> bool {
        matches!(
            self,
            Milestone::WithoutSavings {
                savings_exceeds_milestone: true,
                ..
            }
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SavingsPlan {
    pub amount: f64,
    pub target_month: YearMonth,
}

impl Serialize for SavingsPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.amount, self.target_month).serialize(serializer)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BudgetAdjustment {
    /// Zero saving capacity: no timeline can be extrapolated.
    Impossible,
    Plans {
        reduce_discretionary: bool,
        total_needed: f64,
        monthly_needed: f64,
        additional_needed: f64,
        months_needed: u32,
        /// Raise the monthly saving and keep the original deadline.
        keep_deadline: SavingsPlan,
        /// Keep the current pace and finish later. `None` when that finish lies
        /// beyond any representable month.
        keep_pace: Option<SavingsPlan>,
    },
}

/// Essentials / discretionary / savings amounts, serialised as a 3-element array.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BudgetSplit {
    pub essentials: f64,
    pub discretionary: f64,
    pub savings: f64,
}

impl BudgetSplit {
    pub fn total(self) -> f64 {
        self.essentials + self.discretionary + self.savings
    }
}

impl Serialize for BudgetSplit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.essentials, self.discretionary, self.savings].serialize(serializer)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Rule503020 {
    pub recommended: BudgetSplit,
    pub actual: BudgetSplit,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BudgetVerdict {
    Success { trim_discretionary: bool },
    Warning,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BudgetClassification {
    pub rule: Rule503020,
    pub verdict: BudgetVerdict,
    pub essentials_over: bool,
    pub discretionary_under_30: bool,
}

/// Every fact derived for one evaluation call.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    pub savings_rate: f64,
    pub feasibility: Feasibility,
    pub milestone: Option<Milestone>,
    pub adjustment: Option<BudgetAdjustment>,
    pub classification: BudgetClassification,
}
