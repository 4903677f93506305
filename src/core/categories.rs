use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExpenseKind {
    Vital,
    NonVital,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Rent,
    Utilities,
    Groceries,
    Transportation,
    Insurance,
    Medical,
    Education,
    LoanRepayment,
    PetExpenses,
    Leisures,
    Gaming,
    DiningOut,
    Vacation,
    Hobbies,
    Subscriptions,
    Shopping,
    GymMembership,
    BeautyCare,
    Alcohol,
    Socializing,
    Events,
}

/// Mandatory spending, in the order the advisor form lists it.
pub const VITAL_CATEGORIES: [ExpenseCategory; 9] = [
    ExpenseCategory::Rent,
    ExpenseCategory::Utilities,
    ExpenseCategory::Groceries,
    ExpenseCategory::Transportation,
    ExpenseCategory::Insurance,
    ExpenseCategory::Medical,
    ExpenseCategory::Education,
    ExpenseCategory::LoanRepayment,
    ExpenseCategory::PetExpenses,
];

/// Discretionary spending, in the order the advisor form lists it.
pub const NON_VITAL_CATEGORIES: [ExpenseCategory; 12] = [
    ExpenseCategory::Leisures,
    ExpenseCategory::Gaming,
    ExpenseCategory::DiningOut,
    ExpenseCategory::Vacation,
    ExpenseCategory::Hobbies,
    ExpenseCategory::Subscriptions,
    ExpenseCategory::Shopping,
    ExpenseCategory::GymMembership,
    ExpenseCategory::BeautyCare,
    ExpenseCategory::Alcohol,
    ExpenseCategory::Socializing,
    ExpenseCategory::Events,
];

impl ExpenseCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Groceries => "groceries",
            ExpenseCategory::Transportation => "transportation",
            ExpenseCategory::Insurance => "insurance",
            ExpenseCategory::Medical => "medical",
            ExpenseCategory::Education => "education",
            ExpenseCategory::LoanRepayment => "loan_repayment",
            ExpenseCategory::PetExpenses => "pet_expenses",
            ExpenseCategory::Leisures => "leisures",
            ExpenseCategory::Gaming => "gaming",
            ExpenseCategory::DiningOut => "dining_out",
            ExpenseCategory::Vacation => "vacation",
            ExpenseCategory::Hobbies => "hobbies",
            ExpenseCategory::Subscriptions => "subscriptions",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::GymMembership => "gym_membership",
            ExpenseCategory::BeautyCare => "beauty_care",
            ExpenseCategory::Alcohol => "alcohol",
            ExpenseCategory::Socializing => "socializing",
            ExpenseCategory::Events => "events",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        VITAL_CATEGORIES
            .iter()
            .chain(NON_VITAL_CATEGORIES.iter())
            .copied()
            .find(|category| category.as_str() == name.trim())
    }

    pub fn kind(self) -> ExpenseKind {
        if VITAL_CATEGORIES.contains(&self) {
            ExpenseKind::Vital
        } else {
            ExpenseKind::NonVital
        }
    }

    pub fn is_vital(self) -> bool {
        self.kind() == ExpenseKind::Vital
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
