//! Integration tests for hana-query-builder
//!
//! The adapter is driven against an in-memory executor that records every
//! statement it receives and answers with canned responses.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use hana_query_builder::{
    Adapter, AdapterConfig, AdapterError, Executor, Mapper, Record, Response, Result,
};
use serde_json::{Value, json};

type Responder = Box<dyn Fn(&str) -> Result<Response> + Send + Sync>;

/// Records statements and answers each with `respond`
struct RecordingExecutor {
    statements: Mutex<Vec<String>>,
    respond: Responder,
}

impl RecordingExecutor {
    fn new(respond: impl Fn(&str) -> Result<Response> + Send + Sync + 'static) -> Self {
        Self {
            statements: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Every statement affects one row
    fn affecting_one() -> Self {
        Self::new(|_| Ok(Response::Affected(1)))
    }

    fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }
}

impl Executor for RecordingExecutor {
    async fn execute(&self, sql: &str) -> Result<Response> {
        self.statements.lock().unwrap().push(sql.to_string());
        (self.respond)(sql)
    }
}

struct SlowExecutor;

impl Executor for SlowExecutor {
    async fn execute(&self, _sql: &str) -> Result<Response> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Response::Affected(1))
    }
}

fn jobs() -> Mapper {
    Mapper::new("WB_Queue", "/AZR/WB_QUEUE").id_attribute("WB_QUEUE_ID")
}

fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

fn adapter(executor: RecordingExecutor) -> Adapter<RecordingExecutor> {
    Adapter::new(executor, AdapterConfig::default())
}

// ==================== Query Tests ====================

#[tokio::test]
async fn test_find_all_compiles_query() {
    let adapter = adapter(RecordingExecutor::new(|_| {
        Ok(Response::Rows(vec![
            record(json!({"WB_QUEUE_ID": 1})),
            record(json!({"WB_QUEUE_ID": 2})),
        ]))
    }));

    let rows = adapter
        .find_all(
            &jobs(),
            &json!({
                "QUEUE_ID": "PlanCalc",
                "where": {"WB_QUEUE_ID": {"in": [1, 2]}},
                "orderBy": "WB_QUEUE_ID desc",
                "limit": 10
            }),
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(
        adapter.executor().statements(),
        vec![
            "SELECT \"/AZR/WB_QUEUE\".* FROM \"/AZR/WB_QUEUE\" WHERE QUEUE_ID = 'PlanCalc' AND WB_QUEUE_ID IN (1, 2) ORDER BY 'WB_QUEUE_ID' DESC LIMIT 10"
        ]
    );
}

#[tokio::test]
async fn test_find_returns_first_row() {
    let adapter = adapter(RecordingExecutor::new(|_| {
        Ok(Response::Rows(vec![record(json!({"WB_QUEUE_ID": 100100100, "QUEUE_ID": "PlanCalc"}))]))
    }));

    let found = adapter.find(&jobs(), &json!(100100100)).await.unwrap().unwrap();

    assert_eq!(found["QUEUE_ID"], json!("PlanCalc"));
    assert_eq!(
        adapter.executor().statements(),
        vec![
            "SELECT \"/AZR/WB_QUEUE\".* FROM \"/AZR/WB_QUEUE\" WHERE \"/AZR/WB_QUEUE\".\"WB_QUEUE_ID\" = 100100100"
        ]
    );
}

#[tokio::test]
async fn test_find_missing_record() {
    let adapter = adapter(RecordingExecutor::new(|_| Ok(Response::Rows(Vec::new()))));
    assert!(adapter.find(&jobs(), &json!(1)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_count() {
    let adapter = adapter(RecordingExecutor::new(|_| {
        Ok(Response::Rows(vec![record(json!({"COUNT": 3}))]))
    }));

    let count = adapter
        .count(&jobs(), &json!({"WB_QUEUE_ID": {"in": [1, 2, 3]}}))
        .await
        .unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        adapter.executor().statements(),
        vec!["SELECT COUNT(*) AS COUNT FROM \"/AZR/WB_QUEUE\" WHERE WB_QUEUE_ID IN (1, 2, 3)"]
    );
}

#[tokio::test]
async fn test_count_accepts_textual_count() {
    let adapter = adapter(RecordingExecutor::new(|_| {
        Ok(Response::Rows(vec![record(json!({"COUNT": "42"}))]))
    }));
    assert_eq!(adapter.count(&jobs(), &json!({})).await.unwrap(), 42);
}

#[tokio::test]
async fn test_count_without_rows_fails() {
    let adapter = adapter(RecordingExecutor::new(|_| Ok(Response::Rows(Vec::new()))));
    let err = adapter.count(&jobs(), &json!({})).await.unwrap_err();
    assert!(matches!(err, AdapterError::UnexpectedResponse(_)));
}

#[tokio::test]
async fn test_sum() {
    let adapter = adapter(RecordingExecutor::new(|_| {
        Ok(Response::Rows(vec![record(json!({"SUM": 12.5}))]))
    }));

    let sum = adapter
        .sum(&jobs(), "ITEM_WB_ID", &json!({"PROCESS_STATUS": "done"}))
        .await
        .unwrap();

    assert_eq!(sum, json!(12.5));
    assert_eq!(
        adapter.executor().statements(),
        vec!["SELECT SUM(ITEM_WB_ID) AS SUM FROM \"/AZR/WB_QUEUE\" WHERE PROCESS_STATUS = 'done'"]
    );
}

#[tokio::test]
async fn test_sum_rejects_invalid_field_before_executing() {
    let adapter = adapter(RecordingExecutor::affecting_one());

    let err = adapter.sum(&jobs(), "", &json!({})).await.unwrap_err();
    assert!(matches!(err, AdapterError::InvalidFieldType(_)));

    let err = adapter.sum(&jobs(), "A); DROP TABLE X; --", &json!({})).await.unwrap_err();
    assert!(matches!(err, AdapterError::InvalidFieldType(_)));

    assert!(adapter.executor().statements().is_empty());
}

// ==================== Create Tests ====================

#[tokio::test]
async fn test_create_single_record() {
    let adapter = adapter(RecordingExecutor::affecting_one());
    let props = json!({"WB_QUEUE_ID": 100100100});

    let created = adapter.create(&jobs(), &props).await.unwrap();

    assert_eq!(created, props);
    assert_eq!(
        adapter.executor().statements(),
        vec!["INSERT INTO \"/AZR/WB_QUEUE\" (WB_QUEUE_ID) VALUES (100100100)"]
    );
}

#[tokio::test]
async fn test_create_many_aligns_columns() {
    let adapter = adapter(RecordingExecutor::affecting_one());
    let records = json!([
        {"WB_QUEUE_ID": 100100200, "QUEUE_ID": "PlanCalc"},
        {"WB_QUEUE_ID": 100100300, "CREATED_DTTS": "20211109100000"}
    ]);

    let created = adapter.create_many(&jobs(), &records).await.unwrap();
    assert_eq!(created, records);

    let mut statements = adapter.executor().statements();
    statements.sort();
    assert_eq!(
        statements,
        vec![
            "INSERT INTO \"/AZR/WB_QUEUE\" (CREATED_DTTS, QUEUE_ID, WB_QUEUE_ID) VALUES ('20211109100000', NULL, 100100300)",
            "INSERT INTO \"/AZR/WB_QUEUE\" (CREATED_DTTS, QUEUE_ID, WB_QUEUE_ID) VALUES (NULL, 'PlanCalc', 100100200)",
        ]
    );
}

#[tokio::test]
async fn test_create_rejects_empty_input_before_executing() {
    let adapter = adapter(RecordingExecutor::affecting_one());

    let err = adapter.create(&jobs(), &json!([])).await.unwrap_err();
    assert!(matches!(err, AdapterError::EmptyInput(_)));
    let err = adapter.create(&jobs(), &json!({})).await.unwrap_err();
    assert!(matches!(err, AdapterError::EmptyInput(_)));
    let err = adapter.create(&jobs(), &json!([{}])).await.unwrap_err();
    assert!(matches!(err, AdapterError::EmptyInput(_)));

    assert!(adapter.executor().statements().is_empty());
}

#[tokio::test]
async fn test_create_fails_when_a_row_is_not_inserted() {
    let adapter = adapter(RecordingExecutor::new(|sql| {
        let affected = if sql.contains("VALUES (2)") { 0 } else { 1 };
        Ok(Response::Affected(affected))
    }));

    let err = adapter
        .create(&jobs(), &json!([{"WB_QUEUE_ID": 1}, {"WB_QUEUE_ID": 2}]))
        .await
        .unwrap_err();

    match err {
        AdapterError::NoRowsAffected { operation, sql } => {
            assert_eq!(operation, "Creation");
            assert!(sql.contains("VALUES (1)"));
            assert!(sql.contains("VALUES (2)"));
        }
        other => panic!("Expected NoRowsAffected, got {:?}", other),
    }
}

// ==================== Update Tests ====================

#[tokio::test]
async fn test_update_by_id() {
    let adapter = adapter(RecordingExecutor::affecting_one());

    let affected = adapter
        .update(
            &jobs(),
            &json!(100100100),
            &json!({"QUEUE_ID": "PlanCalc", "CREATED_DTTS": "20211109100000"}),
        )
        .await
        .unwrap();

    assert_eq!(affected, 1);
    assert_eq!(
        adapter.executor().statements(),
        vec![
            "UPDATE \"/AZR/WB_QUEUE\" SET QUEUE_ID = 'PlanCalc', CREATED_DTTS = '20211109100000' WHERE \"WB_QUEUE_ID\" = 100100100"
        ]
    );
}

#[tokio::test]
async fn test_update_rejects_empty_props() {
    let adapter = adapter(RecordingExecutor::affecting_one());

    let err = adapter.update(&jobs(), &json!(1), &json!({})).await.unwrap_err();
    assert!(matches!(err, AdapterError::EmptyAssignment));
    let err = adapter
        .update_all(&jobs(), &json!({}), &json!({"a": 1}))
        .await
        .unwrap_err();
    assert!(matches!(err, AdapterError::EmptyAssignment));

    assert!(adapter.executor().statements().is_empty());
}

#[tokio::test]
async fn test_update_all() {
    let adapter = adapter(RecordingExecutor::new(|_| Ok(Response::Affected(3))));

    let affected = adapter
        .update_all(
            &jobs(),
            &json!({"QUEUE_ID": "PlanCalc"}),
            &json!({"WB_QUEUE_ID": {"in": [100100200, 100100300, 100100400]}}),
        )
        .await
        .unwrap();

    assert_eq!(affected, 3);
    assert_eq!(
        adapter.executor().statements(),
        vec![
            "UPDATE \"/AZR/WB_QUEUE\" SET QUEUE_ID = 'PlanCalc' WHERE WB_QUEUE_ID IN (100100200, 100100300, 100100400)"
        ]
    );
}

#[tokio::test]
async fn test_update_many() {
    let adapter = adapter(RecordingExecutor::affecting_one());

    let updated = adapter
        .update_many(
            &jobs(),
            &[
                json!({"WB_QUEUE_ID": 100100200, "QUEUE_ID": "PlanCalc"}),
                json!({"WB_QUEUE_ID": 100100300, "CREATED_DTTS": "20211109100000"}),
            ],
        )
        .await
        .unwrap();

    assert_eq!(updated, 2);
    let mut statements = adapter.executor().statements();
    statements.sort();
    assert_eq!(
        statements,
        vec![
            "UPDATE \"/AZR/WB_QUEUE\" SET WB_QUEUE_ID = 100100200, QUEUE_ID = 'PlanCalc' WHERE \"WB_QUEUE_ID\" = 100100200",
            "UPDATE \"/AZR/WB_QUEUE\" SET WB_QUEUE_ID = 100100300, CREATED_DTTS = '20211109100000' WHERE \"WB_QUEUE_ID\" = 100100300",
        ]
    );
}

#[tokio::test]
async fn test_update_many_validates_every_record_first() {
    let adapter = adapter(RecordingExecutor::affecting_one());

    let err = adapter
        .update_many(&jobs(), &[json!({"WB_QUEUE_ID": 1, "QUEUE_ID": "x"}), json!({})])
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::EmptyAssignment));
    assert!(adapter.executor().statements().is_empty());
}

#[tokio::test]
async fn test_update_many_fails_when_a_record_is_missing() {
    let adapter = adapter(RecordingExecutor::new(|_| Ok(Response::Affected(0))));

    let err = adapter
        .update_many(&jobs(), &[json!({"WB_QUEUE_ID": 9, "QUEUE_ID": "x"})])
        .await
        .unwrap_err();

    assert!(matches!(err, AdapterError::NoRowsAffected { operation: "Update", .. }));
}

// ==================== Destroy Tests ====================

#[tokio::test]
async fn test_destroy_and_destroy_all() {
    let adapter = adapter(RecordingExecutor::affecting_one());

    adapter.destroy(&jobs(), &json!(100100100)).await.unwrap();
    adapter
        .destroy_all(&jobs(), &json!({"WB_QUEUE_ID": {"nin": []}}))
        .await
        .unwrap();
    adapter.destroy(&jobs(), &json!("A-1")).await.unwrap();

    assert_eq!(
        adapter.executor().statements(),
        vec![
            "DELETE FROM \"/AZR/WB_QUEUE\" WHERE \"WB_QUEUE_ID\" = 100100100",
            "DELETE FROM \"/AZR/WB_QUEUE\" WHERE 1 = 0",
            "DELETE FROM \"/AZR/WB_QUEUE\" WHERE \"WB_QUEUE_ID\" = 'A-1'",
        ]
    );
}

// ==================== Collaborator Tests ====================

#[tokio::test]
async fn test_custom_table_resolver() {
    let adapter = adapter(RecordingExecutor::affecting_one())
        .with_table_resolver(|mapper: &Mapper| format!("\"SAPABAP1\".\"{}\"", mapper.table));

    adapter.destroy_all(&jobs(), &json!({})).await.unwrap();

    assert_eq!(
        adapter.executor().statements(),
        vec!["DELETE FROM \"SAPABAP1\".\"/AZR/WB_QUEUE\""]
    );
}

#[tokio::test]
async fn test_executor_error_propagates() {
    let adapter = adapter(RecordingExecutor::new(|_| {
        Err(AdapterError::execution("connection refused"))
    }));

    let err = adapter.find_all(&jobs(), &json!({})).await.unwrap_err();
    assert!(matches!(err, AdapterError::Execution(msg) if msg == "connection refused"));
}

#[tokio::test]
async fn test_statement_timeout() {
    let config = AdapterConfig::builder()
        .request_timeout(Duration::from_millis(20))
        .build();
    let adapter = Adapter::new(SlowExecutor, config);

    let err = adapter.destroy(&jobs(), &json!(1)).await.unwrap_err();
    assert!(matches!(err, AdapterError::Execution(msg) if msg.contains("timed out")));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_adapter_across_tasks() {
    let adapter = Arc::new(adapter(RecordingExecutor::new(|_| {
        Ok(Response::Rows(vec![record(json!({"COUNT": 1}))]))
    })));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let adapter = Arc::clone(&adapter);
            tokio::spawn(async move { adapter.count(&jobs(), &json!({"WB_QUEUE_ID": i})).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), 1);
    }

    let mut statements = adapter.executor().statements();
    statements.sort();
    statements.dedup();
    assert_eq!(statements.len(), 8);
}
