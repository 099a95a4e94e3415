//! The transactional store handle.

use rusqlite::Connection;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{intercept, StoreError};
use crate::rows::Rows;
use crate::value::{Params, Value};

/// Durability mode negotiated at construction.
///
/// Write-ahead logging is requested best-effort; targets that do not
/// support it (in-memory databases, for one) leave the handle on the
/// engine's default journal mode. The outcome holds for the handle's
/// lifetime and is never re-negotiated per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Durability {
    WriteAheadLog,
    Default,
}

/// Connection settings for a [`SqliteStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Location of the store, passed through to the engine unmodified
    /// (a file path, or `:memory:`).
    pub target: String,
    /// How long the engine waits on a held write lock before reporting
    /// contention. `None` keeps the engine default.
    pub busy_timeout: Option<Duration>,
}

impl StoreConfig {
    /// Config for the given connection target with engine-default settings.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            busy_timeout: None,
        }
    }

    /// Set the engine's lock-wait timeout.
    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = Some(timeout);
        self
    }
}

/// One logical connection to a durable SQLite store.
///
/// Every mutating operation runs inside exactly one transaction that
/// commits all of its effects or none. Mutating operations take
/// `&mut self`: the handle does no internal locking, so concurrent
/// writers must be serialized by the caller.
pub struct SqliteStore {
    conn: Connection,
    durability: Durability,
}

impl SqliteStore {
    /// Open a store at the given connection target.
    pub fn open(target: impl Into<String>) -> Result<Self, StoreError> {
        Self::open_with(StoreConfig::new(target))
    }

    /// Open a store with explicit connection settings.
    ///
    /// Failure to reach the target is fatal. Failure to enable
    /// write-ahead logging is not: the handle degrades to
    /// [`Durability::Default`] with a warning and remains usable.
    pub fn open_with(config: StoreConfig) -> Result<Self, StoreError> {
        let conn = intercept("open", Connection::open(&config.target))?;
        if let Some(timeout) = config.busy_timeout {
            intercept("open", conn.busy_timeout(timeout))?;
        }

        let durability = match conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        }) {
            Ok(mode) if mode.eq_ignore_ascii_case("wal") => Durability::WriteAheadLog,
            Ok(mode) => {
                warn!(target = %config.target, %mode, "write-ahead logging unavailable, using engine default");
                Durability::Default
            }
            Err(e) => {
                warn!(target = %config.target, error = %e, "failed to enable write-ahead logging");
                Durability::Default
            }
        };

        debug!(target = %config.target, ?durability, "store opened");
        Ok(Self { conn, durability })
    }

    /// The durability mode negotiated when this handle was opened.
    pub fn durability(&self) -> Durability {
        self.durability
    }

    /// Run a DDL script inside one transaction.
    ///
    /// The script is expected to be idempotent (`CREATE TABLE IF NOT
    /// EXISTS ...`). Multi-statement scripts are accepted.
    pub fn create_table(&mut self, ddl: &str) -> Result<(), StoreError> {
        let conn = &mut self.conn;
        intercept(
            "create_table",
            (|| {
                let tx = conn.transaction()?;
                tx.execute_batch(ddl)?;
                tx.commit()
            })(),
        )
    }

    /// Execute one mutating statement inside one transaction.
    ///
    /// Returns the engine-reported affected-row count. On error the
    /// transaction is rolled back in full.
    pub fn execute(&mut self, sql: &str, params: &Params) -> Result<usize, StoreError> {
        let conn = &mut self.conn;
        intercept(
            "execute",
            (|| {
                let tx = conn.transaction()?;
                let affected = tx.prepare(sql)?.execute(&params.bindings()[..])?;
                tx.commit()?;
                Ok(affected)
            })(),
        )
    }

    /// Apply one statement to every parameter set inside a single
    /// transaction.
    ///
    /// An empty sequence is a reported no-op: no transaction is opened
    /// and `Ok(0)` is returned. Otherwise a failure anywhere in the
    /// batch rolls back the whole batch; on success the summed
    /// engine-reported affected count is returned.
    pub fn execute_many(&mut self, sql: &str, param_sets: &[Params]) -> Result<usize, StoreError> {
        if param_sets.is_empty() {
            warn!("execute_many called with no parameter sets, nothing executed");
            return Ok(0);
        }
        let conn = &mut self.conn;
        let affected = intercept(
            "execute_many",
            (|| {
                let tx = conn.transaction()?;
                let mut affected = 0;
                {
                    let mut stmt = tx.prepare(sql)?;
                    for params in param_sets {
                        affected += stmt.execute(&params.bindings()[..])?;
                    }
                }
                tx.commit()?;
                Ok(affected)
            })(),
        )?;
        info!(rows = affected, "batch execution committed");
        Ok(affected)
    }

    /// Run a read-only statement and materialize the result.
    ///
    /// Reads rely on the engine's default read consistency; no explicit
    /// transaction is opened.
    pub fn query(&self, sql: &str, params: &Params) -> Result<Rows, StoreError> {
        let conn = &self.conn;
        intercept(
            "query",
            (|| {
                let mut stmt = conn.prepare(sql)?;
                let columns: Vec<String> =
                    stmt.column_names().iter().map(|c| c.to_string()).collect();
                let width = columns.len();
                let mut rows = stmt.query(&params.bindings()[..])?;
                let mut out = Vec::new();
                while let Some(row) = rows.next()? {
                    let mut values = Vec::with_capacity(width);
                    for i in 0..width {
                        values.push(Value::from(row.get_ref(i)?));
                    }
                    out.push(values);
                }
                Ok(Rows::new(columns, out))
            })(),
        )
    }

    /// Reclaim free space in the store.
    ///
    /// SQLite refuses `VACUUM` inside an explicit transaction, so the
    /// statement runs under the engine's own implicit one. Exclusive at
    /// the engine level: do not call while other writers are active.
    pub fn vacuum(&mut self) -> Result<(), StoreError> {
        intercept("vacuum", self.conn.execute_batch("VACUUM"))
    }

    /// Whether a table with the given name exists, per the catalog.
    pub fn table_exists(&self, name: &str) -> Result<bool, StoreError> {
        let rows = self.query(
            "SELECT name FROM sqlite_master WHERE type='table' AND name=:name",
            &Params::new().with_value("name", name),
        )?;
        Ok(!rows.is_empty())
    }
}
