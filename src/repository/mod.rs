//! Persistence of read forms.
//!
//! Writes are best-effort: [`persist`] logs failures and hands them back so
//! the caller can decide to ignore them, but an upload never fails because
//! the row could not be saved.

pub mod form_row;
mod mysql;

pub use form_row::{coerce_date, insert_statement, ColumnKind, ColumnValue, FormRow, COLUMNS};
pub use mysql::MysqlFormStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::extraction::NormalizedRecord;

/// Errors while saving a form.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Destination for form rows.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Insert one row in a single transaction.
    async fn save(&self, row: &FormRow) -> Result<(), StoreError>;
}

/// Map `record` onto the table columns and save it.
///
/// Exactly one insert is attempted per call, even for an empty record.
pub async fn persist(store: &dyn FormStore, record: &NormalizedRecord) -> Result<(), StoreError> {
    let row = FormRow::from_record(record);
    store.save(&row).await
}
