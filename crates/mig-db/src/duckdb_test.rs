use super::*;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
}

#[tokio::test]
async fn test_new_memory_special_case() {
    let db = DuckDbBackend::new(":memory:").unwrap();
    db.execute_batch("CREATE TABLE t (id INT)").await.unwrap();
    assert!(db.relation_exists("t").await.unwrap());
}

#[tokio::test]
async fn test_from_path_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.duckdb");

    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.execute_batch("CREATE TABLE persisted (id INT); INSERT INTO persisted VALUES (7);")
            .await
            .unwrap();
    }

    let db = DuckDbBackend::from_path(&path).unwrap();
    let value = db.query_one("SELECT id FROM persisted").await.unwrap();
    assert_eq!(value, Some("7".to_string()));
}

#[tokio::test]
async fn test_execute_batch() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT); CREATE TABLE t2 (id INT); INSERT INTO t1 VALUES (1);",
    )
    .await
    .unwrap();

    assert!(db.relation_exists("t1").await.unwrap());
    assert!(db.relation_exists("t2").await.unwrap());
}

#[tokio::test]
async fn test_execute_returns_affected_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE nums AS SELECT * FROM range(5) t(n)")
        .await
        .unwrap();

    let affected = db.execute("DELETE FROM nums WHERE n < 3").await.unwrap();
    assert_eq!(affected, 3);
}

#[tokio::test]
async fn test_execute_params() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE names (name TEXT)").await.unwrap();

    let inserted = db
        .execute_params("INSERT INTO names VALUES (?)", &["O'Brien"])
        .await
        .unwrap();
    assert_eq!(inserted, 1);

    let name = db.query_one("SELECT name FROM names").await.unwrap();
    assert_eq!(name, Some("O'Brien".to_string()));
}

#[tokio::test]
async fn test_query_one_no_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE empty_t (name TEXT)").await.unwrap();

    let value = db.query_one("SELECT name FROM empty_t").await.unwrap();
    assert_eq!(value, None);
}

#[tokio::test]
async fn test_query_one_missing_table_is_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.query_one("SELECT name FROM nope").await.unwrap_err();
    assert!(matches!(err, DbError::TableNotFound(_)));
}

#[tokio::test]
async fn test_query_rows_renders_text_and_null() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE mixed (id INT, label TEXT);
         INSERT INTO mixed VALUES (1, 'a'), (2, NULL);",
    )
    .await
    .unwrap();

    let rows = db
        .query_rows("SELECT id, label FROM mixed ORDER BY id")
        .await
        .unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Some("1".to_string()), Some("a".to_string())],
            vec![Some("2".to_string()), None],
        ]
    );
}

#[tokio::test]
async fn test_transaction_commits_on_success() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_in_transaction(
        "CREATE TABLE users (id INT); INSERT INTO users VALUES (1), (2);",
    )
    .await
    .unwrap();

    assert!(db.relation_exists("users").await.unwrap());
    let count = db.query_one("SELECT COUNT(*) FROM users").await.unwrap();
    assert_eq!(count, Some("2".to_string()));
}

#[tokio::test]
async fn test_transaction_rolls_back_on_error() {
    let db = DuckDbBackend::in_memory().unwrap();

    let err = db
        .execute_in_transaction(
            "CREATE TABLE partial (id INT);
             INSERT INTO partial VALUES (1);
             SELECT CAST('not a number' AS INTEGER);",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));

    // The CREATE TABLE before the failing statement must not survive
    assert!(!db.relation_exists("partial").await.unwrap());

    // The connection is usable again after the rollback
    db.execute_in_transaction("CREATE TABLE after_failure (id INT)")
        .await
        .unwrap();
    assert!(db.relation_exists("after_failure").await.unwrap());
}

#[tokio::test]
async fn test_transaction_commit_failure_is_reported() {
    let db = DuckDbBackend::in_memory().unwrap();

    // The script ends the transaction itself, so the closing COMMIT and the
    // follow-up ROLLBACK both fail
    let err = db
        .execute_in_transaction("CREATE TABLE self_committed (id INT); COMMIT;")
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::TransactionError(ref msg) if msg.starts_with("COMMIT failed")));

    // The connection is left outside any transaction and stays usable
    db.execute_in_transaction("CREATE TABLE after_commit_failure (id INT)")
        .await
        .unwrap();
    assert!(db.relation_exists("after_commit_failure").await.unwrap());
}

#[tokio::test]
async fn test_transaction_parse_error_leaves_nothing() {
    let db = DuckDbBackend::in_memory().unwrap();

    let result = db
        .execute_in_transaction("CREATE TABLE never (id INT); SELEC broken;")
        .await;
    assert!(result.is_err());
    assert!(!db.relation_exists("never").await.unwrap());
}

#[tokio::test]
async fn test_constraint_violation_classified() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE TABLE pk (id INTEGER PRIMARY KEY); INSERT INTO pk VALUES (1);")
        .await
        .unwrap();

    let err = db.execute("INSERT INTO pk VALUES (1)").await.unwrap_err();
    assert!(matches!(err, DbError::ConstraintViolation(_)));
}

#[tokio::test]
async fn test_relation_not_exists() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert!(!db.relation_exists("nonexistent").await.unwrap());
}

#[tokio::test]
async fn test_relation_exists_schema_qualified() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE SCHEMA staging; CREATE TABLE staging.t (id INT);")
        .await
        .unwrap();

    assert!(db.relation_exists("staging.t").await.unwrap());
    assert!(!db.relation_exists("t").await.unwrap());
}
