use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::Action;

/// A stored record: field name to JSON value, in insertion order.
pub type Record = Map<String, Value>;

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HttpContext {
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RequestContext {
    #[serde(default)]
    pub http: Option<HttpContext>,
}

/// API Gateway proxy event, reduced to the fields the handler routes on.
///
/// Parameter maps hold raw JSON values so that a non-string parameter is
/// skipped during key extraction instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawEvent {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, rename = "pathParameters")]
    pub path_parameters: Option<BTreeMap<String, Value>>,
    #[serde(default, rename = "queryStringParameters")]
    pub query_string_parameters: Option<BTreeMap<String, Value>>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default, rename = "requestContext")]
    pub request_context: Option<RequestContext>,
    #[serde(default, rename = "httpMethod")]
    pub http_method: Option<String>,
}

impl RawEvent {
    /// HTTP method from the v2 request context, falling back to the v1 field.
    pub fn method(&self) -> Option<&str> {
        self.request_context
            .as_ref()
            .and_then(|context| context.http.as_ref())
            .and_then(|http| http.method.as_deref())
            .or(self.http_method.as_deref())
    }
}

/// Ordered field set taken from a request body.
///
/// A `None` value is the absent marker: the field was intentionally omitted and
/// must not be written. It is distinct from a present `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload {
    fields: Vec<(String, Option<Value>)>,
}

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.set(name.into(), Some(value));
    }

    pub fn mark_absent(&mut self, name: impl Into<String>) {
        self.set(name.into(), None);
    }

    fn set(&mut self, name: String, value: Option<Value>) {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Present value for `name`; absent-marked fields read as `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .and_then(|(_, value)| value.as_ref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Present fields as a record, in payload order.
    pub fn to_record(&self) -> Record {
        self.fields
            .iter()
            .filter_map(|(name, value)| value.clone().map(|value| (name.clone(), value)))
            .collect()
    }
}

impl From<Record> for Payload {
    fn from(record: Record) -> Self {
        Self {
            fields: record
                .into_iter()
                .map(|(name, value)| (name, Some(value)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub action: Action,
    pub key: Option<String>,
    pub payload: Payload,
}
