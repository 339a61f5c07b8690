//! PostgreSQL persistence adapter using Diesel.
//!
//! Row structs (`models.rs`) and the table definition (`schema.rs`) stay
//! private; only the repository, the pool and the migration runner are
//! exported.
//!
//! # Example
//!
//! ```ignore
//! use worksheets::outbound::persistence::{DbPool, DieselWorksheetRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/worksheets")).await?;
//! let repository = DieselWorksheetRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_worksheet_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_worksheet_repository::DieselWorksheetRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
