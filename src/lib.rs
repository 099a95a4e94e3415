//! Transactional SQLite store handle with write-ahead-log durability.
//!
//! # Intention
//!
//! - Provide one handle type that opens a durable SQLite connection,
//!   negotiates WAL mode best-effort, and runs every mutating statement
//!   inside exactly one transaction.
//! - Surface query results as ordered rows with named columns, ready for
//!   tabular-data consumers.
//! - Classify every engine failure uniformly (operation + cause), report
//!   it once, and re-raise it — never swallow, never retry.
//!
//! # Architectural Boundaries
//!
//! - Only SQLite/database code belongs here; callers own SQL dialect,
//!   schema design, and anything they do with query results.
//! - No internal locking beyond the engine's: concurrent writers are the
//!   caller's problem, encoded as `&mut self` on mutating operations.

pub mod error;
pub mod rows;
pub mod sqlite;
pub mod value;

pub use error::StoreError;
pub use rows::{Row, Rows};
pub use sqlite::{Durability, SqliteStore, StoreConfig};
pub use value::{Params, Value};
