use crate::connection::connect;
use crate::error::DbError;
use crate::row::DbRow;
use crate::schema::ACADEMICS_DDL;
use async_trait::async_trait;
use configuration::SettingsProvider;
use sqlx::postgres::PgConnection;
use sqlx::Connection;
use std::sync::Arc;

/// The three things the presentation shell needs from a database.
///
/// `DbGateway` is the real implementation; the shell's tests use an
/// in-memory one.
///
/// Futures are not `Send`: the shell awaits every call inline on one task.
#[async_trait(?Send)]
pub trait QueryGateway {
    /// Creates the `academics` table if it does not exist yet.
    async fn ensure_schema(&mut self) -> Result<(), DbError>;

    /// Runs one query verbatim and returns every row it produced.
    async fn execute(&mut self, query: &str) -> Result<Vec<DbRow>, DbError>;

    /// Releases the connection, if any. Safe to call repeatedly.
    async fn close(&mut self);
}

/// Whether the gateway currently holds an open connection.
#[derive(Debug, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected(PgConnection),
}

/// Owns at most one connection to the PostgreSQL server.
///
/// The connection is opened lazily by the first operation that needs it and
/// reopened the same way after it is lost or closed. There is no pool and no
/// retry: a failed operation is simply reported to the caller.
pub struct DbGateway {
    settings: Arc<dyn SettingsProvider>,
    state: ConnectionState,
}

impl DbGateway {
    /// Creates a disconnected gateway. Nothing touches the network until the
    /// first operation.
    pub fn new(settings: Arc<dyn SettingsProvider>) -> Self {
        Self {
            settings,
            state: ConnectionState::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected(_))
    }

    /// Moves the open connection out of the state, opening one first if needed.
    ///
    /// The state is `Disconnected` while the caller holds the connection; the
    /// caller decides whether to put it back.
    async fn take_connection(&mut self) -> Result<PgConnection, DbError> {
        match std::mem::take(&mut self.state) {
            ConnectionState::Connected(conn) => Ok(conn),
            ConnectionState::Disconnected => connect(self.settings.as_ref()).await,
        }
    }

    /// Puts the connection back unless the error says it is no longer usable.
    fn restore_after_error(&mut self, conn: PgConnection, error: &sqlx::Error) {
        if is_connection_lost(error) {
            tracing::warn!(error = %error, "Database connection lost; will reconnect on next use.");
            drop(conn);
        } else {
            self.state = ConnectionState::Connected(conn);
        }
    }

    pub async fn ensure_schema(&mut self) -> Result<(), DbError> {
        let mut conn = self.take_connection().await?;

        // Single statement in autocommit mode: committed as soon as it succeeds.
        match sqlx::raw_sql(ACADEMICS_DDL).execute(&mut conn).await {
            Ok(_) => {
                self.state = ConnectionState::Connected(conn);
                tracing::info!("Schema for `academics` is in place.");
                Ok(())
            }
            Err(e) => {
                self.restore_after_error(conn, &e);
                Err(DbError::Schema(e))
            }
        }
    }

    pub async fn execute(&mut self, query: &str) -> Result<Vec<DbRow>, DbError> {
        let mut conn = self.take_connection().await?;

        tracing::debug!(query, "Executing query.");
        match sqlx::raw_sql(query).fetch_all(&mut conn).await {
            Ok(rows) => {
                self.state = ConnectionState::Connected(conn);
                let rows: Vec<DbRow> = rows.iter().map(DbRow::from_pg_row).collect();
                tracing::info!(rows = rows.len(), "Query finished.");
                Ok(rows)
            }
            Err(e) => {
                self.restore_after_error(conn, &e);
                Err(DbError::Query(e))
            }
        }
    }

    pub async fn close(&mut self) {
        match std::mem::take(&mut self.state) {
            ConnectionState::Connected(conn) => match conn.close().await {
                Ok(()) => tracing::info!("Database connection closed."),
                Err(e) => tracing::warn!(error = %e, "Database connection did not close cleanly."),
            },
            ConnectionState::Disconnected => {
                tracing::debug!("Close requested with no open connection.");
            }
        }
    }
}

#[async_trait(?Send)]
impl QueryGateway for DbGateway {
    async fn ensure_schema(&mut self) -> Result<(), DbError> {
        DbGateway::ensure_schema(self).await
    }

    async fn execute(&mut self, query: &str) -> Result<Vec<DbRow>, DbError> {
        DbGateway::execute(self, query).await
    }

    async fn close(&mut self) {
        DbGateway::close(self).await
    }
}

fn is_connection_lost(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::Protocol(_) | sqlx::Error::WorkerCrashed => true,
        // Class 57P (operator intervention, e.g. pg_terminate_backend) and
        // class 08 (connection exception) end the server session.
        sqlx::Error::Database(e) => e
            .code()
            .is_some_and(|code| code.starts_with("57P") || code.starts_with("08")),
        _ => false,
    }
}
