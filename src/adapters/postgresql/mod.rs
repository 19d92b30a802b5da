//! PostgreSQL integration
//!
//! Reads transaction and customer records and the unit hierarchy from
//! PostgreSQL.

pub mod client;
pub mod hierarchy;
pub mod models;
pub mod source;

pub use client::PostgresClient;
pub use hierarchy::PostgresHierarchyProvider;
pub use source::PostgresRowSource;
