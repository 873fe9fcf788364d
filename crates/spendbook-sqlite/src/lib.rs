//! SQLite storage for Spendbook.
//!
//! Every operation opens its own short-lived connection, runs one statement
//! (or a small fixed sequence), and drops the connection. Concurrency is
//! left to SQLite's WAL locking; there is no pool and no shared handle.

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::ConnectOptions;

use spendbook_core::{
    BalanceReport, CategorySummary, Expense, ExpenseChanges, Income, IncomeChanges, NewExpense,
    NewIncome, RecordKind, StoreError,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    amount REAL NOT NULL,
    category TEXT NOT NULL,
    subcategory TEXT DEFAULT '',
    note TEXT DEFAULT ''
);

CREATE TABLE IF NOT EXISTS income (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    amount REAL NOT NULL,
    source TEXT NOT NULL,
    note TEXT DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);
";

/// Handle to the single-file expense store.
///
/// Cloning is cheap; the handle only carries the resolved file path.
/// Connections are opened per operation, never held.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open the store at `path`, creating the tables if needed and
    /// verifying that the location is writable with a round-trip
    /// insert+delete. Must run before any operation is reachable;
    /// failure here is fatal to startup.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.init_schema().await?;
        Ok(store)
    }

    /// The resolved store file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn connect(&self) -> Result<SqliteConnection, StoreError> {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .connect()
            .await
            .map_err(classify)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;

        // The driver prepares one statement at a time, so the schema batch
        // is split and executed statement by statement.
        for statement in SCHEMA.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&mut conn)
                    .await
                    .map_err(classify)?;
            }
        }

        // Write probe: a read-only location must fail here, at startup,
        // not at the first add_* call.
        sqlx::query("INSERT INTO expenses (date, amount, category) VALUES ('2000-01-01', 0, 'write-probe')")
            .execute(&mut conn)
            .await
            .map_err(classify)?;
        sqlx::query("DELETE FROM expenses WHERE category = 'write-probe'")
            .execute(&mut conn)
            .await
            .map_err(classify)?;

        tracing::debug!(path = %self.path.display(), "store initialized");
        Ok(())
    }

    // ----- expenses -----

    /// Insert one expense row and return its new identifier.
    pub async fn add_expense(&self, expense: &NewExpense) -> Result<i64, StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query(
            "INSERT INTO expenses (date, amount, category, subcategory, note) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&expense.date)
        .bind(expense.amount)
        .bind(&expense.category)
        .bind(&expense.subcategory)
        .bind(&expense.note)
        .execute(&mut conn)
        .await
        .map_err(classify)?;
        Ok(result.last_insert_rowid())
    }

    /// Update exactly the supplied fields of an expense and return how many
    /// were changed. Supplying no fields at all is a caller error
    /// (`NoFieldsToUpdate`), reported before the identifier is even looked
    /// up; a missing identifier with fields supplied is `NotFound`.
    pub async fn edit_expense(&self, id: i64, changes: &ExpenseChanges) -> Result<usize, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::NoFieldsToUpdate);
        }

        let mut conn = self.connect().await?;
        ensure_exists(&mut conn, RecordKind::Expense, id).await?;

        let mut assignments: Vec<&str> = Vec::new();
        if changes.date.is_some() {
            assignments.push("date = ?");
        }
        if changes.amount.is_some() {
            assignments.push("amount = ?");
        }
        if changes.category.is_some() {
            assignments.push("category = ?");
        }
        if changes.subcategory.is_some() {
            assignments.push("subcategory = ?");
        }
        if changes.note.is_some() {
            assignments.push("note = ?");
        }

        // Column names come from the fixed list above; values are always
        // bound, never interpolated.
        let sql = format!("UPDATE expenses SET {} WHERE id = ?", assignments.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(date) = &changes.date {
            query = query.bind(date);
        }
        if let Some(amount) = changes.amount {
            query = query.bind(amount);
        }
        if let Some(category) = &changes.category {
            query = query.bind(category);
        }
        if let Some(subcategory) = &changes.subcategory {
            query = query.bind(subcategory);
        }
        if let Some(note) = &changes.note {
            query = query.bind(note);
        }
        query.bind(id).execute(&mut conn).await.map_err(classify)?;

        Ok(assignments.len())
    }

    /// Remove one expense row. `NotFound` when the identifier is absent.
    pub async fn delete_expense(&self, id: i64) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        ensure_exists(&mut conn, RecordKind::Expense, id).await?;
        sqlx::query("DELETE FROM expenses WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(classify)?;
        Ok(())
    }

    /// All expenses with `start_date <= date <= end_date` under
    /// lexicographic comparison, date descending with ties broken by id
    /// descending. An empty range yields an empty vec, not an error.
    pub async fn list_expenses(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<Expense>, StoreError> {
        let mut conn = self.connect().await?;
        let rows: Vec<(i64, String, f64, String, String, String)> = sqlx::query_as(
            "SELECT id, date, amount, category, subcategory, note
             FROM expenses
             WHERE date BETWEEN ? AND ?
             ORDER BY date DESC, id DESC",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&mut conn)
        .await
        .map_err(classify)?;

        Ok(rows
            .into_iter()
            .map(|(id, date, amount, category, subcategory, note)| Expense {
                id,
                date,
                amount,
                category,
                subcategory,
                note,
            })
            .collect())
    }

    // ----- income -----

    /// Insert one income row and return its new identifier.
    pub async fn add_income(&self, income: &NewIncome) -> Result<i64, StoreError> {
        let mut conn = self.connect().await?;
        let result = sqlx::query("INSERT INTO income (date, amount, source, note) VALUES (?, ?, ?, ?)")
            .bind(&income.date)
            .bind(income.amount)
            .bind(&income.source)
            .bind(&income.note)
            .execute(&mut conn)
            .await
            .map_err(classify)?;
        Ok(result.last_insert_rowid())
    }

    /// Income counterpart of [`SqliteStore::edit_expense`].
    pub async fn edit_income(&self, id: i64, changes: &IncomeChanges) -> Result<usize, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::NoFieldsToUpdate);
        }

        let mut conn = self.connect().await?;
        ensure_exists(&mut conn, RecordKind::Income, id).await?;

        let mut assignments: Vec<&str> = Vec::new();
        if changes.date.is_some() {
            assignments.push("date = ?");
        }
        if changes.amount.is_some() {
            assignments.push("amount = ?");
        }
        if changes.source.is_some() {
            assignments.push("source = ?");
        }
        if changes.note.is_some() {
            assignments.push("note = ?");
        }

        let sql = format!("UPDATE income SET {} WHERE id = ?", assignments.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(date) = &changes.date {
            query = query.bind(date);
        }
        if let Some(amount) = changes.amount {
            query = query.bind(amount);
        }
        if let Some(source) = &changes.source {
            query = query.bind(source);
        }
        if let Some(note) = &changes.note {
            query = query.bind(note);
        }
        query.bind(id).execute(&mut conn).await.map_err(classify)?;

        Ok(assignments.len())
    }

    /// Remove one income row. `NotFound` when the identifier is absent.
    pub async fn delete_income(&self, id: i64) -> Result<(), StoreError> {
        let mut conn = self.connect().await?;
        ensure_exists(&mut conn, RecordKind::Income, id).await?;
        sqlx::query("DELETE FROM income WHERE id = ?")
            .bind(id)
            .execute(&mut conn)
            .await
            .map_err(classify)?;
        Ok(())
    }

    /// Income counterpart of [`SqliteStore::list_expenses`].
    pub async fn list_income(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<Income>, StoreError> {
        let mut conn = self.connect().await?;
        let rows: Vec<(i64, String, f64, String, String)> = sqlx::query_as(
            "SELECT id, date, amount, source, note
             FROM income
             WHERE date BETWEEN ? AND ?
             ORDER BY date DESC, id DESC",
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_all(&mut conn)
        .await
        .map_err(classify)?;

        Ok(rows
            .into_iter()
            .map(|(id, date, amount, source, note)| Income {
                id,
                date,
                amount,
                source,
                note,
            })
            .collect())
    }

    // ----- aggregates -----

    /// Net balance over the inclusive range: total income minus total
    /// expenses, each sum defaulting to zero when nothing matches.
    ///
    /// The two sums share a connection but run without a transaction; a
    /// write landing between them shows up in one total and not the other.
    pub async fn balance(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<BalanceReport, StoreError> {
        let mut conn = self.connect().await?;

        let (expense_sum,): (Option<f64>,) =
            sqlx::query_as("SELECT SUM(amount) FROM expenses WHERE date BETWEEN ? AND ?")
                .bind(start_date)
                .bind(end_date)
                .fetch_one(&mut conn)
                .await
                .map_err(classify)?;

        let (income_sum,): (Option<f64>,) =
            sqlx::query_as("SELECT SUM(amount) FROM income WHERE date BETWEEN ? AND ?")
                .bind(start_date)
                .bind(end_date)
                .fetch_one(&mut conn)
                .await
                .map_err(classify)?;

        let total_expenses = expense_sum.unwrap_or(0.0);
        let total_income = income_sum.unwrap_or(0.0);

        Ok(BalanceReport {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
        })
    }

    /// Per-category expense totals and row counts over the inclusive
    /// range, largest total first. A supplied category restricts the rows
    /// before grouping. Tie order among equal totals is whatever SQLite
    /// returns; callers must not rely on it.
    pub async fn summarize(
        &self,
        start_date: &str,
        end_date: &str,
        category: Option<&str>,
    ) -> Result<Vec<CategorySummary>, StoreError> {
        let mut conn = self.connect().await?;

        let rows: Vec<(String, f64, i64)> = if let Some(category) = category {
            sqlx::query_as(
                "SELECT category, SUM(amount) AS total_amount, COUNT(*) AS count
                 FROM expenses
                 WHERE date BETWEEN ? AND ? AND category = ?
                 GROUP BY category
                 ORDER BY total_amount DESC",
            )
            .bind(start_date)
            .bind(end_date)
            .bind(category)
            .fetch_all(&mut conn)
            .await
            .map_err(classify)?
        } else {
            sqlx::query_as(
                "SELECT category, SUM(amount) AS total_amount, COUNT(*) AS count
                 FROM expenses
                 WHERE date BETWEEN ? AND ?
                 GROUP BY category
                 ORDER BY total_amount DESC",
            )
            .bind(start_date)
            .bind(end_date)
            .fetch_all(&mut conn)
            .await
            .map_err(classify)?
        };

        Ok(rows
            .into_iter()
            .map(|(category, total_amount, count)| CategorySummary {
                category,
                total_amount,
                count,
            })
            .collect())
    }
}

async fn ensure_exists(
    conn: &mut SqliteConnection,
    kind: RecordKind,
    id: i64,
) -> Result<(), StoreError> {
    let sql = match kind {
        RecordKind::Expense => "SELECT id FROM expenses WHERE id = ?",
        RecordKind::Income => "SELECT id FROM income WHERE id = ?",
    };
    let row: Option<(i64,)> = sqlx::query_as(sql)
        .bind(id)
        .fetch_optional(conn)
        .await
        .map_err(classify)?;
    match row {
        Some(_) => Ok(()),
        None => Err(StoreError::not_found(kind, id)),
    }
}

/// Best-effort classification of driver errors. SQLite reports unwritable
/// locations as "attempt to write a readonly database", so a substring
/// match on the message text is the discriminator.
fn classify(err: sqlx::Error) -> StoreError {
    let message = err.to_string();
    if message.to_lowercase().contains("readonly") {
        StoreError::ReadOnly(message)
    } else {
        StoreError::Database(message)
    }
}
