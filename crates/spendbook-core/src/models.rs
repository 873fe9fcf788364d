use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two record tables an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Expense,
    Income,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Expense => write!(f, "Expense"),
            RecordKind::Income => write!(f, "Income"),
        }
    }
}

/// One stored expense row.
///
/// `date` is kept as text; the store compares dates lexicographically, so
/// callers are expected to supply ISO-8601 strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

/// One stored income row. Income carries a single classifying `source`
/// field instead of category/subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub date: String,
    pub amount: f64,
    pub source: String,
    pub note: String,
}

/// Fields for inserting a new expense. `subcategory` and `note` default to
/// the empty string when the caller omits them.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

/// Fields for inserting a new income entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub date: String,
    pub amount: f64,
    pub source: String,
    pub note: String,
}

/// Partial update for an expense. `None` means "leave unchanged"; a
/// supplied value overwrites the field, and an explicit empty string
/// counts as supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.subcategory.is_none()
            && self.note.is_none()
    }
}

/// Partial update for an income entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeChanges {
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub note: Option<String>,
}

impl IncomeChanges {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.amount.is_none() && self.source.is_none() && self.note.is_none()
    }
}

/// Net balance over a date range, with the two totals it was derived from
/// and the echoed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub start_date: String,
    pub end_date: String,
}

/// Per-category expense total and row count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total_amount: f64,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_changes_detected() {
        assert!(ExpenseChanges::default().is_empty());
        assert!(IncomeChanges::default().is_empty());

        let changes = ExpenseChanges {
            subcategory: Some(String::new()),
            ..Default::default()
        };
        assert!(!changes.is_empty(), "explicit empty string is a change");
    }

    #[test]
    fn expense_serializes_with_column_names() {
        let expense = Expense {
            id: 1,
            date: "2024-01-05".to_string(),
            amount: 50.0,
            category: "Food & Dining".to_string(),
            subcategory: String::new(),
            note: String::new(),
        };
        let value = serde_json::to_value(&expense).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["date"], "2024-01-05");
        assert_eq!(value["category"], "Food & Dining");
        assert_eq!(value["subcategory"], "");
    }
}
