//! Persistence core for the journal application: a bounded PostgreSQL
//! connection pool plus a transaction runner for units of work.
//!
//! The host application calls [`db::init`] once at startup with a loaded
//! [`StorageConfig`], then routes every unit of work through
//! [`with_transaction`] with the returned pool.

pub mod config;
pub mod db;
pub mod error;

pub use config::StorageConfig;
pub use db::connection::{
    acquire, close_pool, create_pool, create_pool_with_config, DbPool, IsolationLevel, PoolConfig,
};
pub use db::init;
pub use db::schema::{ensure_schema, ColumnSpec, TableSchema, ARTICLES};
pub use db::transaction::with_transaction;
pub use error::StorageError;
