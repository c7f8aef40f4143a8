use std::collections::BTreeMap;

use parking_lot::RwLock;
use record_crud_core::contract::Record;
use record_crud_core::update_expression::UpdateSpec;
use serde_json::Value;

use crate::adapters::record_store::{RecordStore, StoreError};

/// Process-local store with the same conditional semantics as the DynamoDB
/// adapter.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    key_field: String,
    records: RwLock<BTreeMap<String, Record>>,
}

impl InMemoryRecordStore {
    pub fn new(key_field: impl Into<String>) -> Self {
        Self {
            key_field: key_field.into(),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn key_of(&self, record: &Record) -> Result<String, StoreError> {
        match record.get(&self.key_field) {
            Some(Value::String(key)) if !key.is_empty() => Ok(key.clone()),
            _ => Err(StoreError::Backend(format!(
                "record is missing string key attribute '{}'",
                self.key_field
            ))),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn put(&self, record: &Record) -> Result<(), StoreError> {
        let key = self.key_of(record)?;
        self.records.write().insert(key, record.clone());
        Ok(())
    }

    fn put_if_absent(&self, record: &Record) -> Result<(), StoreError> {
        let key = self.key_of(record)?;
        let mut records = self.records.write();
        if records.contains_key(&key) {
            return Err(StoreError::ConditionFailed);
        }
        records.insert(key, record.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Record>, StoreError> {
        Ok(self.records.read().get(key).cloned())
    }

    fn update_existing(&self, key: &str, update: &UpdateSpec) -> Result<Record, StoreError> {
        let mut records = self.records.write();
        let record = records.get_mut(key).ok_or(StoreError::ConditionFailed)?;
        update.apply_to(record);
        Ok(record.clone())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.records.write().remove(key);
        Ok(())
    }
}
