//! DynamoDB-backed record store.
//!
//! The store trait is synchronous; SDK calls are driven to completion on the
//! current multi-threaded Tokio runtime via `block_in_place`.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use record_crud_core::config::HandlerConfig;
use record_crud_core::contract::Record;
use record_crud_core::update_expression::UpdateSpec;
use serde_json::{Number, Value};

use crate::adapters::record_store::{RecordStore, StoreError};

/// Expression placeholder for the key attribute in existence conditions.
const KEY_NAME_TOKEN: &str = "#pk";

#[derive(Clone)]
pub struct DynamoDbRecordStore {
    client: Client,
    table_name: String,
    key_field: String,
}

impl std::fmt::Debug for DynamoDbRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamoDbRecordStore")
            .field("table_name", &self.table_name)
            .field("key_field", &self.key_field)
            .finish()
    }
}

impl DynamoDbRecordStore {
    /// Builds the client from shared SDK config, with an optional endpoint
    /// override (e.g. LocalStack).
    pub fn from_sdk_config(
        sdk_config: &aws_config::SdkConfig,
        config: &HandlerConfig,
        endpoint_url: Option<String>,
    ) -> Self {
        let mut builder = aws_sdk_dynamodb::config::Builder::from(sdk_config);
        if let Some(endpoint_url) = endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        Self::from_client(
            Client::from_conf(builder.build()),
            config.table_name.clone(),
            config.key_field.clone(),
        )
    }

    pub fn from_client(
        client: Client,
        table_name: impl Into<String>,
        key_field: impl Into<String>,
    ) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            key_field: key_field.into(),
        }
    }

    fn key(&self, key: &str) -> HashMap<String, AttributeValue> {
        HashMap::from([(self.key_field.clone(), AttributeValue::S(key.to_string()))])
    }
}

impl RecordStore for DynamoDbRecordStore {
    fn put(&self, record: &Record) -> Result<(), StoreError> {
        let request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)));

        run_blocking(request.send())
            .map(|_| ())
            .map_err(|error| StoreError::Backend(format!("failed to put item: {error}")))
    }

    fn put_if_absent(&self, record: &Record) -> Result<(), StoreError> {
        let request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(record_to_item(record)))
            .condition_expression(format!("attribute_not_exists({KEY_NAME_TOKEN})"))
            .expression_attribute_names(KEY_NAME_TOKEN, &self.key_field);

        match run_blocking(request.send()) {
            Ok(_) => Ok(()),
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|service| service.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::ConditionFailed)
            }
            Err(error) => Err(StoreError::Backend(format!(
                "failed to put item: {error}"
            ))),
        }
    }

    fn get(&self, key: &str) -> Result<Option<Record>, StoreError> {
        let request = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key(key)))
            .consistent_read(true);

        let output = run_blocking(request.send())
            .map_err(|error| StoreError::Backend(format!("failed to get item: {error}")))?;
        output.item().map(item_to_record).transpose()
    }

    fn update_existing(&self, key: &str, update: &UpdateSpec) -> Result<Record, StoreError> {
        let values: HashMap<String, AttributeValue> = update
            .attribute_values()
            .map(|(token, value)| (token.to_string(), to_attribute_value(value)))
            .collect();

        let request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key(key)))
            .update_expression(update.expression())
            .condition_expression(format!("attribute_exists({KEY_NAME_TOKEN})"))
            .set_expression_attribute_names(Some(update_attribute_names(update, &self.key_field)))
            .set_expression_attribute_values(Some(values))
            .return_values(ReturnValue::AllNew);

        let output = match run_blocking(request.send()) {
            Ok(output) => output,
            Err(error)
                if error
                    .as_service_error()
                    .is_some_and(|service| service.is_conditional_check_failed_exception()) =>
            {
                return Err(StoreError::ConditionFailed);
            }
            Err(error) => {
                return Err(StoreError::Backend(format!(
                    "failed to update item: {error}"
                )));
            }
        };

        let attributes = output.attributes().ok_or_else(|| {
            StoreError::Backend("update returned no attributes".to_string())
        })?;
        item_to_record(attributes)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let request = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(self.key(key)));

        run_blocking(request.send())
            .map(|_| ())
            .map_err(|error| StoreError::Backend(format!("failed to delete item: {error}")))
    }
}

fn run_blocking<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Expression attribute names for an update: the assignment tokens plus the key
/// placeholder used by the existence condition.
fn update_attribute_names(update: &UpdateSpec, key_field: &str) -> HashMap<String, String> {
    let mut names: HashMap<String, String> = update
        .attribute_names()
        .map(|(token, name)| (token.to_string(), name.to_string()))
        .collect();
    names.insert(KEY_NAME_TOKEN.to_string(), key_field.to_string());
    names
}

pub fn record_to_item(record: &Record) -> HashMap<String, AttributeValue> {
    record
        .iter()
        .map(|(name, value)| (name.clone(), to_attribute_value(value)))
        .collect()
}

/// Converts a stored item into a record ordered by attribute name.
pub fn item_to_record(item: &HashMap<String, AttributeValue>) -> Result<Record, StoreError> {
    let ordered: BTreeMap<&String, &AttributeValue> = item.iter().collect();
    ordered
        .into_iter()
        .map(|(name, value)| from_attribute_value(value).map(|value| (name.clone(), value)))
        .collect()
}

pub fn to_attribute_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute_value).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .iter()
                .map(|(name, value)| (name.clone(), to_attribute_value(value)))
                .collect(),
        ),
    }
}

pub fn from_attribute_value(value: &AttributeValue) -> Result<Value, StoreError> {
    match value {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(flag) => Ok(Value::Bool(*flag)),
        AttributeValue::N(raw) => parse_number(raw),
        AttributeValue::S(text) => Ok(Value::String(text.clone())),
        AttributeValue::L(items) => items
            .iter()
            .map(from_attribute_value)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(fields) => item_to_record(fields).map(Value::Object),
        AttributeValue::Ss(items) => Ok(Value::Array(
            items.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(items) => items
            .iter()
            .map(|raw| parse_number(raw))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::B(_) | AttributeValue::Bs(_) => Err(StoreError::Backend(
            "binary attributes are not supported".to_string(),
        )),
        _ => Err(StoreError::Backend(
            "unsupported attribute type in stored item".to_string(),
        )),
    }
}

fn parse_number(raw: &str) -> Result<Value, StoreError> {
    raw.parse::<Number>()
        .map(Value::Number)
        .map_err(|error| StoreError::Backend(format!("invalid number attribute '{raw}': {error}")))
}
