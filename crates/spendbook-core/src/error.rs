use thiserror::Error;

use crate::models::RecordKind;

/// Store-level failures, as surfaced to the tool layer.
///
/// Every variant is converted into a structured error result at the
/// operation boundary; none of these abort the process. Only store
/// initialization failure is fatal, and that propagates out of `main`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced identifier does not exist in its table.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: RecordKind, id: i64 },

    /// A mutating call supplied no fields to change.
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// The store file or its location is not writable. Detected by a
    /// substring match on the driver's error text, a loose heuristic.
    #[error("database is in read-only mode, check file permissions: {0}")]
    ReadOnly(String),

    /// Any other store-level failure (corruption, disk full, lock timeout).
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn not_found(kind: RecordKind, id: i64) -> Self {
        StoreError::NotFound { kind, id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_record_kind() {
        let err = StoreError::not_found(RecordKind::Expense, 42);
        assert_eq!(err.to_string(), "Expense with id 42 not found");

        let err = StoreError::not_found(RecordKind::Income, 7);
        assert_eq!(err.to_string(), "Income with id 7 not found");
    }

    #[test]
    fn read_only_message_mentions_permissions() {
        let err = StoreError::ReadOnly("attempt to write a readonly database".to_string());
        assert!(err.to_string().contains("read-only"));
        assert!(err.to_string().contains("permissions"));
    }
}
