use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;

/// Every connection variable starts with this prefix (`POSTGRES_DB`, `POSTGRES_USER`, ...).
pub const ENV_PREFIX: &str = "POSTGRES";

/// The parameters needed to open a connection to the PostgreSQL server.
#[derive(Clone, PartialEq, Eq)]
pub struct DbSettings {
    /// The database name (`POSTGRES_DB`).
    pub name: String,
    /// The login role (`POSTGRES_USER`).
    pub user: String,
    /// The role's password (`POSTGRES_PASSWORD`).
    pub password: String,
    /// The server host name or address (`POSTGRES_HOST`).
    pub host: String,
    /// The server TCP port (`POSTGRES_PORT`).
    pub port: u16,
}

// Hand-written so the password never ends up in a log line.
impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"********")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

/// A source of connection settings.
///
/// The gateway calls this every time it opens a connection, so a provider
/// that reads live state (like [`EnvSettings`]) sees changes between calls.
pub trait SettingsProvider: Send + Sync {
    fn db_settings(&self) -> Result<DbSettings, ConfigError>;
}

/// Fixed settings act as their own provider.
impl SettingsProvider for DbSettings {
    fn db_settings(&self) -> Result<DbSettings, ConfigError> {
        Ok(self.clone())
    }
}

/// The raw, unvalidated shape of the `POSTGRES_*` variables after the
/// prefix has been stripped and the keys lowercased.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDbSettings {
    db: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<String>,
}

/// Reads the `POSTGRES_*` variables on demand.
///
/// By default the process environment is read. Tests can supply an explicit
/// variable map instead with [`EnvSettings::from_vars`].
#[derive(Debug, Clone, Default)]
pub struct EnvSettings {
    vars: Option<config::Map<String, String>>,
}

impl EnvSettings {
    /// A provider backed by the live process environment.
    pub fn new() -> Self {
        Self { vars: None }
    }

    /// A provider backed by a fixed set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { vars: Some(vars) }
    }

    fn load_raw(&self) -> Result<RawDbSettings, ConfigError> {
        let builder = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .source(self.vars.clone()),
            )
            .build()?;

        Ok(builder.try_deserialize::<RawDbSettings>()?)
    }
}

impl SettingsProvider for EnvSettings {
    fn db_settings(&self) -> Result<DbSettings, ConfigError> {
        let raw = self.load_raw()?;

        let settings = DbSettings {
            name: required(raw.db, "POSTGRES_DB")?,
            user: required(raw.user, "POSTGRES_USER")?,
            password: required(raw.password, "POSTGRES_PASSWORD")?,
            host: required(raw.host, "POSTGRES_HOST")?,
            port: parse_port(&required(raw.port, "POSTGRES_PORT")?)?,
        };

        tracing::debug!(settings = ?settings, "Loaded database settings from the environment.");
        Ok(settings)
    }
}

fn required(value: Option<String>, var: &'static str) -> Result<String, ConfigError> {
    match value {
        None => Err(ConfigError::MissingVar(var)),
        Some(v) if v.trim().is_empty() => Err(ConfigError::ValidationError(format!(
            "{var} is set but empty"
        ))),
        Some(v) => Ok(v),
    }
}

fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(ConfigError::ValidationError(format!(
            "POSTGRES_PORT must be a TCP port number, got '{raw}'"
        ))),
        Ok(port) => Ok(port),
    }
}
