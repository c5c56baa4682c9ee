use crate::error::DbError;
use configuration::{DbSettings, SettingsProvider};
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

/// Builds the driver's connection options from our settings.
pub fn connect_options(settings: &DbSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
        .application_name("academics")
}

/// Opens a single connection to the PostgreSQL server.
///
/// The settings are read from the provider right now, not cached, so a
/// missing variable is reported at connection time as a `DbError::Config`.
pub async fn connect(provider: &dyn SettingsProvider) -> Result<PgConnection, DbError> {
    let settings = provider.db_settings()?;
    tracing::info!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        "Connecting to the database."
    );

    PgConnection::connect_with(&connect_options(&settings))
        .await
        .map_err(DbError::Connection)
}
