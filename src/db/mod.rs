//! Database layer
//!
//! This module provides database abstraction for the Tinta blog engine.
//! It supports:
//! - SQLite (default, for local single-binary deployment)
//! - MySQL (for production deployment)
//!
//! The backend is selected by the configured `production` flag.

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
