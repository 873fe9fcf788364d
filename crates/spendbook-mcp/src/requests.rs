use schemars::JsonSchema;
use serde::Deserialize;

/// Arguments for `add_expense`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddExpenseRequest {
    /// Calendar date of the expense, ISO-8601 (YYYY-MM-DD).
    pub date: String,
    /// Amount spent; callers supply positive magnitudes.
    pub amount: f64,
    /// Category name, e.g. "Food & Dining".
    pub category: String,
    /// Finer-grained classification; defaults to empty.
    #[serde(default)]
    pub subcategory: String,
    /// Free-form note; defaults to empty.
    #[serde(default)]
    pub note: String,
}

/// Arguments for `edit_expense`. Only supplied fields are changed; an
/// explicitly supplied empty string overwrites, an omitted field does not.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EditExpenseRequest {
    /// Identifier of the expense to edit.
    pub id: i64,
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub note: Option<String>,
}

/// Arguments for `add_income`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct AddIncomeRequest {
    /// Calendar date of the income entry, ISO-8601 (YYYY-MM-DD).
    pub date: String,
    /// Amount received; callers supply positive magnitudes.
    pub amount: f64,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    /// Free-form note; defaults to empty.
    #[serde(default)]
    pub note: String,
}

/// Arguments for `edit_income`. Same presence semantics as
/// [`EditExpenseRequest`].
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EditIncomeRequest {
    /// Identifier of the income entry to edit.
    pub id: i64,
    pub date: Option<String>,
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub note: Option<String>,
}

/// Arguments for `delete_expense` and `delete_income`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteRequest {
    /// Identifier of the record to delete.
    pub id: i64,
}

/// Inclusive date range shared by the list and balance tools. Dates are
/// compared as text, so both ends must use the same sortable format.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DateRangeRequest {
    /// First date included in the range, ISO-8601.
    pub start_date: String,
    /// Last date included in the range, ISO-8601.
    pub end_date: String,
}

/// Arguments for `summarize`.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SummarizeRequest {
    /// First date included in the range, ISO-8601.
    pub start_date: String,
    /// Last date included in the range, ISO-8601.
    pub end_date: String,
    /// Restrict the summary to a single category when supplied.
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_expense_optional_fields_default_to_empty() {
        let req: AddExpenseRequest = serde_json::from_value(json!({
            "date": "2024-01-05",
            "amount": 50.0,
            "category": "Food & Dining"
        }))
        .unwrap();
        assert_eq!(req.subcategory, "");
        assert_eq!(req.note, "");
    }

    #[test]
    fn edit_expense_preserves_field_presence() {
        let req: EditExpenseRequest = serde_json::from_value(json!({
            "id": 3,
            "subcategory": ""
        }))
        .unwrap();
        // Explicit empty string survives as a change; omitted fields stay None.
        assert_eq!(req.subcategory.as_deref(), Some(""));
        assert!(req.date.is_none());
        assert!(req.amount.is_none());
        assert!(req.category.is_none());
        assert!(req.note.is_none());
    }

    #[test]
    fn summarize_category_is_optional() {
        let req: SummarizeRequest = serde_json::from_value(json!({
            "start_date": "2024-01-01",
            "end_date": "2024-01-31"
        }))
        .unwrap();
        assert!(req.category.is_none());
    }
}
