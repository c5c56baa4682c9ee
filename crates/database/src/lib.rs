//! # Database Crate
//!
//! The gateway between the application and PostgreSQL.
//!
//! ## Public API
//!
//! - `DbGateway`: owns at most one connection, opened lazily, and offers
//!   `ensure_schema`, `execute` and `close`.
//! - `QueryGateway`: the trait the presentation shell is written against.
//! - `FIXED_QUERIES` / `ACADEMICS_DDL`: the only SQL this application sends.
//! - `DbRow` / `DbValue` / `format_rows`: untyped result rows and their text form.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod catalog;
pub mod connection;
pub mod error;
pub mod gateway;
pub mod row;
pub mod schema;

// Re-export the key components to create a clean, public-facing API.
pub use catalog::{fixed_query, FIXED_QUERIES, QUERY_COUNT};
pub use connection::{connect, connect_options};
pub use error::DbError;
pub use gateway::{ConnectionState, DbGateway, QueryGateway};
pub use row::{format_rows, DbRow, DbValue};
pub use schema::ACADEMICS_DDL;
