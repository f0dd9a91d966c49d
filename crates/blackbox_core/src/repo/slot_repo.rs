//! Durable slot contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the single key-value slot the vault collection persists into.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - One namespace maps to at most one row; writes replace the full payload.
//! - `clear_slot` removes the row entirely, so a wiped vault is
//!   indistinguishable from a never-written one.

use crate::db::DbError;
use rusqlite::{params, Connection};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed namespace key for the vault note collection.
pub const VAULT_NAMESPACE: &str = "blackbox_vault";

pub type SlotResult<T> = Result<T, SlotError>;

/// Slot persistence error.
#[derive(Debug)]
pub enum SlotError {
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for SlotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for SlotError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SlotError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the durable vault slot.
pub trait SlotRepository {
    /// Reads the current payload, `None` when the slot row is absent.
    fn read_slot(&self) -> SlotResult<Option<String>>;
    /// Writes the full payload, replacing any previous value.
    fn write_slot(&self, payload: &str) -> SlotResult<()>;
    /// Deletes the slot row. Idempotent.
    fn clear_slot(&self) -> SlotResult<()>;
}

/// SQLite-backed slot repository bound to the vault namespace.
#[derive(Debug)]
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
    namespace: &'static str,
}

impl<'conn> SqliteSlotRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> SlotResult<Self> {
        ensure_slot_connection_ready(conn)?;
        Ok(Self {
            conn,
            namespace: VAULT_NAMESPACE,
        })
    }

    /// Namespace this repository is bound to.
    pub fn namespace(&self) -> &'static str {
        self.namespace
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self) -> SlotResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM slots WHERE namespace = ?1;")?;
        let mut rows = stmt.query([self.namespace])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(row.get(0)?));
        }
        Ok(None)
    }

    fn write_slot(&self, payload: &str) -> SlotResult<()> {
        self.conn.execute(
            "INSERT INTO slots (namespace, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(namespace) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.namespace, payload],
        )?;
        Ok(())
    }

    fn clear_slot(&self) -> SlotResult<()> {
        self.conn.execute(
            "DELETE FROM slots WHERE namespace = ?1;",
            [self.namespace],
        )?;
        Ok(())
    }
}

fn ensure_slot_connection_ready(conn: &Connection) -> SlotResult<()> {
    if !table_exists(conn, "slots")? {
        return Err(SlotError::MissingRequiredTable("slots"));
    }

    for column in ["namespace", "payload", "updated_at"] {
        if !table_has_column(conn, "slots", column)? {
            return Err(SlotError::MissingRequiredColumn {
                table: "slots",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> SlotResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> SlotResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
