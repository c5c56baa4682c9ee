//! Tests against a real PostgreSQL server.
//!
//! They read the same `POSTGRES_*` variables as the application (a local
//! `.env` file works) and are ignored by default:
//!
//! ```text
//! cargo test -p database -- --ignored
//! ```
//!
//! Each test works in its own throwaway schema so it never touches an
//! existing `academics` table.

use configuration::EnvSettings;
use database::{DbGateway, DbValue, FIXED_QUERIES};
use std::sync::Arc;

struct Scratch {
    gateway: DbGateway,
    schema: String,
}

impl Scratch {
    async fn new(tag: &str) -> Self {
        dotenvy::dotenv().ok();
        let mut gateway = DbGateway::new(Arc::new(EnvSettings::new()));
        let schema = format!("academics_test_{}_{}", tag, std::process::id());

        gateway
            .execute(&format!(
                "DROP SCHEMA IF EXISTS {schema} CASCADE; CREATE SCHEMA {schema}; SET search_path TO {schema};"
            ))
            .await
            .expect("scratch schema");

        Self { gateway, schema }
    }

    async fn seed(&mut self, full_name: &str, specialization: &str) {
        self.gateway
            .execute(&format!(
                "INSERT INTO academics (full_name, birth_date, specialization, year_rank_assignment) \
                 VALUES ('{full_name}', DATE '1950-03-14', '{specialization}', 1990);"
            ))
            .await
            .expect("seed row");
    }

    async fn teardown(mut self) {
        let schema = self.schema.clone();
        self.gateway
            .execute(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE;"))
            .await
            .expect("drop scratch schema");
        self.gateway.close().await;
    }
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn ensure_schema_is_idempotent() {
    let mut scratch = Scratch::new("idempotent").await;

    scratch.gateway.ensure_schema().await.unwrap();
    scratch.gateway.ensure_schema().await.unwrap();

    let rows = scratch
        .gateway
        .execute(&format!(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = '{}' AND table_name = 'academics';",
            scratch.schema
        ))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values(), &[DbValue::Int(1)]);

    scratch.teardown().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn fixed_queries_on_an_empty_table() {
    let mut scratch = Scratch::new("empty").await;
    scratch.gateway.ensure_schema().await.unwrap();

    for (index, query) in FIXED_QUERIES.iter().enumerate() {
        let rows = scratch.gateway.execute(query).await.unwrap();
        let expected = if index == 5 || index == 6 { 1 } else { 0 };
        assert_eq!(rows.len(), expected, "query {index}: {query}");
    }

    scratch.teardown().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn ordering_by_name_length_puts_short_names_first() {
    let mut scratch = Scratch::new("ordering").await;
    scratch.gateway.ensure_schema().await.unwrap();
    scratch.seed("Ivanov", "Physics").await;
    scratch.seed("A", "Mathematics").await;

    let rows = scratch.gateway.execute(FIXED_QUERIES[0]).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].values()[1], DbValue::Text("A".into()));
    assert_eq!(rows[1].values()[1], DbValue::Text("Ivanov".into()));
    assert!(matches!(rows[0].values()[2], DbValue::Date(_)));

    scratch.teardown().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn day_difference_is_a_single_integer() {
    let mut scratch = Scratch::new("days").await;
    scratch.gateway.ensure_schema().await.unwrap();
    scratch.seed("Ivanov", "Physics").await;

    let rows = scratch.gateway.execute(FIXED_QUERIES[6]).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].len(), 1);
    assert!(matches!(rows[0].values()[0], DbValue::Int(_)));

    scratch.teardown().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn status_query_labels_long_specializations() {
    let mut scratch = Scratch::new("status").await;
    scratch.gateway.ensure_schema().await.unwrap();
    scratch.seed("Ivanov", "Mathematics").await;
    scratch.seed("Petrov", "Law").await;

    let mut rows = scratch.gateway.execute(FIXED_QUERIES[7]).await.unwrap();
    rows.sort_by_key(|row| row.to_string());

    assert_eq!(rows[0].to_string(), "('Law', 'короткий')");
    assert_eq!(rows[1].to_string(), "('Mathematics', 'длинный')");

    scratch.teardown().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn query_errors_keep_the_connection() {
    let mut scratch = Scratch::new("syntax").await;

    let err = scratch.gateway.execute("SELEC 1;").await.unwrap_err();
    assert!(err.to_string().starts_with("Error executing query: "));
    assert!(scratch.gateway.is_connected());

    scratch.teardown().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn execute_reconnects_after_close() {
    dotenvy::dotenv().ok();
    let mut gateway = DbGateway::new(Arc::new(EnvSettings::new()));

    gateway.execute("SELECT 1;").await.unwrap();
    assert!(gateway.is_connected());

    gateway.close().await;
    assert!(!gateway.is_connected());

    let rows = gateway.execute("SELECT 1;").await.unwrap();
    assert_eq!(rows[0].values(), &[DbValue::Int(1)]);
    assert!(gateway.is_connected());

    gateway.close().await;
}

#[tokio::test]
#[ignore = "needs a PostgreSQL server"]
async fn execute_reconnects_after_the_server_ends_the_session() {
    dotenvy::dotenv().ok();
    let mut gateway = DbGateway::new(Arc::new(EnvSettings::new()));
    let mut admin = DbGateway::new(Arc::new(EnvSettings::new()));

    let rows = gateway.execute("SELECT pg_backend_pid();").await.unwrap();
    let DbValue::Int(pid) = rows[0].values()[0] else {
        panic!("backend pid should be an integer: {rows:?}");
    };

    admin
        .execute(&format!("SELECT pg_terminate_backend({pid});"))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    // The first use after termination fails and drops the dead connection...
    assert!(gateway.execute("SELECT 1;").await.is_err());
    assert!(!gateway.is_connected());

    // ...and the next one opens a fresh one.
    let rows = gateway.execute("SELECT 1;").await.unwrap();
    assert_eq!(rows[0].values(), &[DbValue::Int(1)]);
    assert!(gateway.is_connected());

    gateway.close().await;
    admin.close().await;
}
