use record_crud_core::contract::Record;
use record_crud_core::update_expression::UpdateSpec;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The write's existence condition did not hold.
    #[error("conditional check failed")]
    ConditionFailed,
    #[error("{0}")]
    Backend(String),
}

/// Key-value record storage addressed by the configured key field.
///
/// Implementations must be safe to share across concurrent invocations.
pub trait RecordStore: Send + Sync {
    /// Unconditional write; replaces any record under the same key.
    fn put(&self, record: &Record) -> Result<(), StoreError>;

    /// Write that fails with `ConditionFailed` when the key already exists.
    fn put_if_absent(&self, record: &Record) -> Result<(), StoreError>;

    fn get(&self, key: &str) -> Result<Option<Record>, StoreError>;

    /// Applies `update` to an existing record and returns the full updated
    /// record. Fails with `ConditionFailed` when the key does not exist.
    fn update_existing(&self, key: &str, update: &UpdateSpec) -> Result<Record, StoreError>;

    /// Removes the record; deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}
