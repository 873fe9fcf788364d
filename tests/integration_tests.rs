use spendbook_core::{ExpenseChanges, NewExpense, NewIncome, StoreError};
use spendbook_sqlite::SqliteStore;
use tempfile::TempDir;

async fn setup() -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("spendbook.db"))
        .await
        .unwrap();
    (dir, store)
}

fn expense(date: &str, amount: f64, category: &str) -> NewExpense {
    NewExpense {
        date: date.to_string(),
        amount,
        category: category.to_string(),
        subcategory: String::new(),
        note: String::new(),
    }
}

#[tokio::test]
async fn test_month_of_activity_end_to_end() {
    let (_dir, store) = setup().await;

    store
        .add_expense(&expense("2024-01-05", 50.0, "Food & Dining"))
        .await
        .unwrap();
    store
        .add_expense(&expense("2024-01-10", 20.0, "Food & Dining"))
        .await
        .unwrap();
    store
        .add_income(&NewIncome {
            date: "2024-01-07".to_string(),
            amount: 1000.0,
            source: "Salary".to_string(),
            note: String::new(),
        })
        .await
        .unwrap();

    let report = store.balance("2024-01-01", "2024-01-31").await.unwrap();
    assert_eq!(report.total_income, 1000.0);
    assert_eq!(report.total_expenses, 70.0);
    assert_eq!(report.balance, 930.0);
    assert_eq!(report.start_date, "2024-01-01");
    assert_eq!(report.end_date, "2024-01-31");

    let groups = store
        .summarize("2024-01-01", "2024-01-31", None)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].category, "Food & Dining");
    assert_eq!(groups[0].total_amount, 70.0);
    assert_eq!(groups[0].count, 2);
}

#[tokio::test]
async fn test_edit_then_aggregates_stay_consistent() {
    let (_dir, store) = setup().await;

    let groceries = store
        .add_expense(&expense("2024-03-02", 80.0, "Food & Dining"))
        .await
        .unwrap();
    store
        .add_expense(&expense("2024-03-15", 40.0, "Transportation"))
        .await
        .unwrap();

    // Recategorize the first entry; the summary must follow.
    store
        .edit_expense(
            groceries,
            &ExpenseChanges {
                category: Some("Shopping".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let groups = store
        .summarize("2024-03-01", "2024-03-31", None)
        .await
        .unwrap();
    let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(names, vec!["Shopping", "Transportation"]);

    let total: f64 = groups.iter().map(|g| g.total_amount).sum();
    let report = store.balance("2024-03-01", "2024-03-31").await.unwrap();
    assert_eq!(total, report.total_expenses);
}

#[tokio::test]
async fn test_delete_everything_returns_to_empty() {
    let (_dir, store) = setup().await;

    let a = store
        .add_expense(&expense("2024-02-01", 10.0, "Other"))
        .await
        .unwrap();
    let b = store
        .add_income(&NewIncome {
            date: "2024-02-02".to_string(),
            amount: 500.0,
            source: "Refund".to_string(),
            note: String::new(),
        })
        .await
        .unwrap();

    store.delete_expense(a).await.unwrap();
    store.delete_income(b).await.unwrap();

    assert!(store
        .list_expenses("2024-02-01", "2024-02-28")
        .await
        .unwrap()
        .is_empty());
    assert!(store
        .list_income("2024-02-01", "2024-02-28")
        .await
        .unwrap()
        .is_empty());

    let report = store.balance("2024-02-01", "2024-02-28").await.unwrap();
    assert_eq!(report.balance, 0.0);

    // Deleted identifiers stay dead.
    assert!(matches!(
        store.delete_expense(a).await.unwrap_err(),
        StoreError::NotFound { .. }
    ));
    assert!(matches!(
        store.delete_income(b).await.unwrap_err(),
        StoreError::NotFound { .. }
    ));
}

#[tokio::test]
async fn test_concurrent_adds_all_land() {
    let (_dir, store) = setup().await;

    // Each operation opens its own connection; WAL serializes the writers.
    let mut handles = Vec::new();
    for i in 0..10 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store
                .add_expense(&NewExpense {
                    date: format!("2024-04-{:02}", i + 1),
                    amount: 1.0,
                    category: "Other".to_string(),
                    subcategory: String::new(),
                    note: String::new(),
                })
                .await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 10, "every concurrent insert got a distinct id");

    let rows = store.list_expenses("2024-04-01", "2024-04-30").await.unwrap();
    assert_eq!(rows.len(), 10);
}
