//! Renders derived facts into the key/value document consumed by the UI and
//! persistence layers.

use serde::Serialize;

use super::types::{
    BudgetAdjustment, BudgetVerdict, Evaluation, Feasibility, FinancialFacts, Milestone,
    Rule503020, SavingsPlan,
};

const REDUCE_DISCRETIONARY_TIP: &str =
    "Consider reducing discretionary expenses to increase your savings rate.";

/// Keys are absent when the rule producing them did not fire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisoryReport {
    pub goal_description: String,
    pub savings_rate: String,
    pub feasibility_check: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_exceeds_milestone: Option<String>,
    #[serde(rename = "budget_adjustement", skip_serializing_if = "Option::is_none")]
    pub budget_adjustment: Option<String>,
    #[serde(
        rename = "budget_adjustement_solution_1",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_adjustment_solution_1: Option<SavingsPlan>,
    #[serde(
        rename = "budget_adjustement_solution_2",
        skip_serializing_if = "Option::is_none"
    )]
    pub budget_adjustment_solution_2: Option<SavingsPlan>,
    pub rule_50_30_20: Rule503020,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_recommendations_success: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_recommendations_warning: Option<String>,
}

/// One slice of the income pie.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    pub percent_of_income: f64,
}

impl Evaluation {
    pub fn report(&self, facts: &FinancialFacts) -> AdvisoryReport {
        let (solution_1, solution_2) = match self.adjustment {
            Some(BudgetAdjustment::Plans {
                keep_deadline,
                keep_pace,
                ..
            }) => (Some(keep_deadline), keep_pace),
            _ => (None, None),
        };

        let (success, warning) = match self.classification.verdict {
            BudgetVerdict::Success { trim_discretionary } => {
                let mut message = String::from(
                    "Your actual distribution is better than the one recommended by the 50/30/20 rule, Good job!",
                );
                if trim_discretionary {
                    message.push_str(
                        " You can save even more if you limit your discretionary expenses.",
                    );
                }
                (Some(message), None)
            }
            BudgetVerdict::Warning => (
                None,
                Some(
                    "We recommend you to follow the 50/30/20 rule to have more savings."
                        .to_string(),
                ),
            ),
        };

        AdvisoryReport {
            goal_description: facts.goal_description.clone(),
            savings_rate: format!("Calculated savings rate: {:.2}", self.savings_rate),
            feasibility_check: feasibility_narrative(self.feasibility).to_string(),
            milestone: self.milestone.as_ref().map(milestone_narrative),
            savings_exceeds_milestone: self
                .milestone
                .filter(Milestone::savings_exceeds_milestone)
                .map(|_| "You can save more than the required amount.".to_string()),
            budget_adjustment: self
                .adjustment
                .as_ref()
                .map(|adjustment| adjustment_narrative(adjustment, self.savings_rate)),
            budget_adjustment_solution_1: solution_1,
            budget_adjustment_solution_2: solution_2,
            rule_50_30_20: self.classification.rule,
            follow_recommendations_success: success,
            follow_recommendations_warning: warning,
        }
    }
}

fn feasibility_narrative(feasibility: Feasibility) -> &'static str {
    match feasibility {
        Feasibility::WithoutSavings => {
            "Goal is achievable without considering your current savings."
        }
        Feasibility::WithCurrentSavings => {
            "Goal is achievable only when considering your current savings."
        }
        Feasibility::NeedsAdjustment => {
            "Goal is not achievable within the given timeline. Consider budget adjustments."
        }
    }
}

fn milestone_narrative(milestone: &Milestone) -> String {
    match *milestone {
        Milestone::WithoutSavings { raw, net, .. } => format!(
            "To reach your goal, you need to save {raw:.2} per month. \
             When considering your current savings, you can reach your goal saving only {net:.2} per month."
        ),
        Milestone::TargetMet => {
            "Your savings match exactly your savings target. No need for further savings."
                .to_string()
        }
        Milestone::TargetExceeded { surplus } => format!(
            "You have enough current savings to satisfy your goal. You will save {surplus:.2} more than your target."
        ),
        Milestone::Monthly { amount } => {
            format!("To reach your goal, save {amount:.2} per month.")
        }
    }
}

fn adjustment_narrative(adjustment: &BudgetAdjustment, savings_rate: f64) -> String {
    match adjustment {
        BudgetAdjustment::Impossible => {
            "This saving goal is impossible with your current budget. \
             Consider a more realistic target or a longer timeline."
                .to_string()
        }
        BudgetAdjustment::Plans {
            reduce_discretionary,
            monthly_needed,
            additional_needed,
            keep_pace,
            ..
        } => {
            let mut message = String::new();
            if *reduce_discretionary {
                message.push_str(REDUCE_DISCRETIONARY_TIP);
                message.push(' ');
            }
            message.push_str(&format!(
                "You need to monthly save {monthly_needed:.2}, but you are only saving {savings_rate:.2}, \
                 that means you need to save an additional {additional_needed:.2} per month. "
            ));
            match keep_pace {
                Some(plan) => message.push_str(&format!(
                    "Otherwise, your goal will be reached, approximately, in {}.",
                    plan.target_month
                )),
                None => message.push_str(
                    "At your current pace, your goal will not be reached in any foreseeable time.",
                ),
            }
            message
        }
    }
}

/// Share of income taken by each expense, followed by the savings rate.
pub fn income_shares(facts: &FinancialFacts, savings_rate: f64) -> Vec<CategoryShare> {
    let percent = |amount: f64| {
        if facts.monthly_income > 0.0 {
            amount / facts.monthly_income * 100.0
        } else {
            0.0
        }
    };

    facts
        .vital_expenses()
        .iter()
        .chain(facts.non_vital_expenses().iter())
        .map(|(category, &amount)| (category.as_str(), amount))
        .chain(std::iter::once(("savings_rate", savings_rate)))
        .map(|(category, amount)| CategoryShare {
            category: category.to_string(),
            amount,
            percent_of_income: percent(amount),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::Value;

    use crate::core::categories::ExpenseCategory::*;
    use crate::core::engine::evaluate;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn reference_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 4).expect("valid date")
    }

    fn facts(target: f64, timeline: i64, savings: f64) -> FinancialFacts {
        FinancialFacts::new(
            2500.0,
            savings,
            target,
            timeline,
            "vacation: going to Japan",
            [
                (Rent, 800.0),
                (Groceries, 300.0),
                (Transportation, 100.0),
                (PetExpenses, 100.0),
                (Leisures, 250.0),
            ],
        )
    }

    fn report_json(facts: &FinancialFacts) -> Value {
        let report = evaluate(facts, reference_date())
            .expect("evaluates")
            .report(facts);
        serde_json::to_value(report).expect("report serializes")
    }

    #[test]
    fn achievable_report_contains_milestones_and_no_adjustment() {
        let json = report_json(&facts(3000.0, 18, 100.0));

        assert_eq!(json["savings_rate"], "Calculated savings rate: 950.00");
        assert_eq!(
            json["feasibility_check"],
            "Goal is achievable without considering your current savings."
        );
        let milestone = json["milestone"].as_str().expect("milestone present");
        assert!(milestone.contains("166.67"));
        assert!(milestone.contains("161.11"));
        assert_eq!(
            json["savings_exceeds_milestone"],
            "You can save more than the required amount."
        );
        assert!(json.get("budget_adjustement").is_none());
        assert!(json.get("budget_adjustement_solution_1").is_none());
        assert!(json.get("follow_recommendations_warning").is_none());
        assert_eq!(
            json["follow_recommendations_success"],
            "Your actual distribution is better than the one recommended by the 50/30/20 rule, Good job!"
        );
    }

    #[test]
    fn infeasible_report_lists_both_solutions() {
        let json = report_json(&facts(10_000.0, 6, 100.0));

        assert!(json.get("milestone").is_none());
        let narrative = json["budget_adjustement"].as_str().expect("adjustment present");
        assert!(narrative.starts_with(REDUCE_DISCRETIONARY_TIP));
        assert!(narrative.contains("1650.00"));
        assert!(narrative.contains("950.00"));
        assert!(narrative.contains("700.00"));
        assert!(narrative.contains("2025-10"));

        assert_eq!(json["budget_adjustement_solution_1"][1], "2025-06");
        assert_approx(
            json["budget_adjustement_solution_1"][0].as_f64().expect("amount"),
            1650.0,
        );
        assert_eq!(json["budget_adjustement_solution_2"][1], "2025-10");
        assert_approx(
            json["budget_adjustement_solution_2"][0].as_f64().expect("amount"),
            950.0,
        );
    }

    #[test]
    fn matched_target_reports_no_further_saving() {
        let facts = FinancialFacts::new(900.0, 500.0, 500.0, 5, "bike", [(Rent, 900.0)]);
        let json = report_json(&facts);

        assert_eq!(
            json["milestone"],
            "Your savings match exactly your savings target. No need for further savings."
        );
        assert!(json.get("savings_exceeds_milestone").is_none());
    }

    #[test]
    fn matched_target_with_ample_savings_rate_needs_no_further_saving() {
        let facts = facts(3000.0, 18, 3000.0);
        let evaluation = evaluate(&facts, reference_date()).expect("evaluates");
        assert_eq!(evaluation.feasibility, Feasibility::WithoutSavings);
        assert_eq!(evaluation.milestone.and_then(|m| m.monthly_milestone()), None);

        let json = serde_json::to_value(evaluation.report(&facts)).expect("report serializes");
        assert_eq!(
            json["milestone"],
            "Your savings match exactly your savings target. No need for further savings."
        );
        assert!(json.get("savings_exceeds_milestone").is_none());
        assert!(json.get("budget_adjustement").is_none());
    }

    #[test]
    fn undatable_pace_plan_is_left_out_of_the_report() {
        let facts = FinancialFacts::new(1000.01, 0.0, 1.0e9, 12, "house", [(Rent, 1000.0)]);
        let json = report_json(&facts);

        let narrative = json["budget_adjustement"].as_str().expect("adjustment present");
        assert!(narrative.contains("not be reached in any foreseeable time"));
        assert_eq!(json["budget_adjustement_solution_1"][1], "2025-12");
        assert!(json.get("budget_adjustement_solution_2").is_none());
    }

    #[test]
    fn zero_capacity_report_has_impossible_narrative_without_solutions() {
        let facts = FinancialFacts::new(900.0, 0.0, 5000.0, 5, "car", [(Rent, 900.0)]);
        let json = report_json(&facts);

        let narrative = json["budget_adjustement"].as_str().expect("adjustment present");
        assert!(narrative.contains("impossible"));
        assert!(json.get("budget_adjustement_solution_1").is_none());
        assert!(json.get("budget_adjustement_solution_2").is_none());
        assert_eq!(
            json["follow_recommendations_warning"],
            "We recommend you to follow the 50/30/20 rule to have more savings."
        );
        assert!(json.get("follow_recommendations_success").is_none());
    }

    #[test]
    fn success_without_discretionary_spend_has_no_trim_suffix() {
        let facts = FinancialFacts::new(4000.0, 0.0, 1000.0, 10, "laptop", [(Rent, 1200.0)]);
        let json = report_json(&facts);
        let success = json["follow_recommendations_success"]
            .as_str()
            .expect("success present");
        assert!(!success.contains("discretionary"));
    }

    #[test]
    fn rule_50_30_20_serializes_as_triples() {
        let json = report_json(&facts(3000.0, 18, 100.0));
        let rule = &json["rule_50_30_20"];
        let recommended: Vec<f64> = rule["recommended"]
            .as_array()
            .expect("array")
            .iter()
            .filter_map(Value::as_f64)
            .collect();
        let actual: Vec<f64> = rule["actual"]
            .as_array()
            .expect("array")
            .iter()
            .filter_map(Value::as_f64)
            .collect();
        assert_eq!(recommended.len(), 3);
        assert_eq!(actual.len(), 3);
        assert_approx(recommended[2], 500.0);
        assert_approx(actual[0], 1300.0);
        assert_approx(actual[2], 950.0);
    }

    #[test]
    fn identical_inputs_serialize_byte_identically() {
        let facts = facts(10_000.0, 6, 100.0);
        let first = serde_json::to_string(&report_json(&facts)).expect("serialize");
        let second = serde_json::to_string(&report_json(&facts)).expect("serialize");
        assert_eq!(first, second);
    }

    #[test]
    fn income_shares_end_with_savings_rate() {
        let facts = facts(3000.0, 18, 100.0);
        let shares = income_shares(&facts, 950.0);

        assert_eq!(shares.len(), 6);
        assert_eq!(shares[0].category, "rent");
        assert_approx(shares[0].percent_of_income, 32.0);
        let last = shares.last().expect("savings slice");
        assert_eq!(last.category, "savings_rate");
        assert_approx(last.percent_of_income, 38.0);
        let total: f64 = shares.iter().map(|s| s.percent_of_income).sum();
        assert_approx(total, 100.0);
    }
}
