//! Table metadata shared by the query layer and the relationship loader.

use sqlx::sqlite::SqliteRow;
use std::fmt::Debug;

use crate::error::HirelinkError;

/// A row type backed by a table with a single integer primary key `id`.
///
/// `COLUMNS` lists the columns this type reads. A type may read a subset of
/// the table's columns; that is how partial loads are declared.
pub trait Entity: Sized + Send + Unpin + Clone + Debug + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    /// Decodes the entity from columns aliased as `{prefix}{column}`.
    fn decode(row: &SqliteRow, prefix: &str) -> Result<Self, sqlx::Error>;
}

/// `alias.col AS prefixcol, ...` for every column of `E`.
pub fn select_list<E: Entity>(alias: &str, prefix: &str) -> String {
    E::COLUMNS
        .iter()
        .map(|c| format!("{alias}.{c} AS {prefix}{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Rejects column names that `E` does not declare.
pub fn ensure_column<E: Entity>(column: &str) -> Result<(), HirelinkError> {
    if E::COLUMNS.contains(&column) {
        Ok(())
    } else {
        Err(HirelinkError::UnknownColumn {
            table: E::TABLE,
            column: column.to_string(),
        })
    }
}

pub(crate) fn prefixed(prefix: &str, column: &str) -> String {
    format!("{prefix}{column}")
}
