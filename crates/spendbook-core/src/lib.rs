//! Core types for the Spendbook expense tracker.
//!
//! This crate holds the record and command types shared between the
//! storage layer and the MCP tool surface, plus the `StoreError` taxonomy.

pub mod error;
pub mod models;

// Re-export key types at crate root for convenience
pub use error::StoreError;
pub use models::{
    BalanceReport, CategorySummary, Expense, ExpenseChanges, Income, IncomeChanges, NewExpense,
    NewIncome, RecordKind,
};
