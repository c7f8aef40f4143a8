use std::time::Instant;

use record_crud_core::action::Action;
use record_crud_core::config::HandlerConfig;
use record_crud_core::contract::{NormalizedRequest, Payload};
use record_crud_core::error::CrudError;
use record_crud_core::normalize::normalize_event;
use record_crud_core::update_expression::build_update_spec;
use serde_json::{json, Map, Value};

use crate::adapters::record_store::{RecordStore, StoreError};
use crate::handlers::response::{error_response, success_response, ApiGatewayResponse};

pub const UPDATED_MESSAGE: &str = "The item is updated";
pub const UNCHANGED_MESSAGE: &str = "No changes to apply";
pub const DELETED_MESSAGE: &str = "Deleted";

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutcome {
    pub status_code: u16,
    pub body: Value,
}

impl HandlerOutcome {
    fn ok(body: Value) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    fn created(body: Value) -> Self {
        Self {
            status_code: 201,
            body,
        }
    }
}

/// Routes API Gateway events to single-key CRUD operations on a record store.
///
/// The store is injected once and reused for every invocation.
#[derive(Debug)]
pub struct RecordHandler<S> {
    store: S,
    config: HandlerConfig,
}

impl<S: RecordStore> RecordHandler<S> {
    pub fn new(store: S, config: HandlerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Handles one invocation. Every failure is converted into an error
    /// envelope here; nothing escapes as a runtime error.
    pub fn handle_event(&self, event: Value) -> ApiGatewayResponse {
        let started_at = Instant::now();

        let request = match normalize_event(event, &self.config.key_field) {
            Ok(value) => value,
            Err(error) => return log_rejection(None, None, &error, started_at),
        };

        let action = request.action;
        let key = request.key.clone();
        match self.dispatch(request) {
            Ok(outcome) => {
                tracing::info!(
                    component = "record_handler",
                    event = "request_completed",
                    action = action.as_str(),
                    key = key.as_deref().unwrap_or_default(),
                    status_code = outcome.status_code,
                    duration_ms = started_at.elapsed().as_millis() as u64,
                );
                success_response(outcome.status_code, &outcome.body)
            }
            Err(error) => log_rejection(Some(action), key.as_deref(), &error, started_at),
        }
    }

    pub fn dispatch(&self, request: NormalizedRequest) -> Result<HandlerOutcome, CrudError> {
        match request.action {
            Action::Create => self.create(request.key, &request.payload, false),
            Action::Insert => self.create(request.key, &request.payload, true),
            Action::Read => self.read(self.require_key(request.key)?),
            Action::Update => self.update(self.require_key(request.key)?, &request.payload),
            Action::Delete => self.delete(self.require_key(request.key)?),
        }
    }

    fn require_key(&self, key: Option<String>) -> Result<String, CrudError> {
        key.ok_or_else(|| CrudError::missing_key(&self.config.key_field))
    }

    fn create(
        &self,
        key: Option<String>,
        payload: &Payload,
        if_absent: bool,
    ) -> Result<HandlerOutcome, CrudError> {
        let key_field = &self.config.key_field;
        let Some(key) = key else {
            return Err(CrudError::Validation(format!("Missing {key_field} in body")));
        };

        let mut item = payload.to_record();
        item.insert(key_field.clone(), Value::String(key.clone()));

        if if_absent {
            self.store.put_if_absent(&item).map_err(|error| match error {
                StoreError::ConditionFailed => {
                    CrudError::Conflict(format!("{key_field} '{key}' already exists"))
                }
                other => unexpected(other),
            })?;
        } else {
            self.store.put(&item).map_err(unexpected)?;
        }

        Ok(HandlerOutcome::created(json!({ "item": item })))
    }

    fn read(&self, key: String) -> Result<HandlerOutcome, CrudError> {
        let record = self
            .store
            .get(&key)
            .map_err(unexpected)?
            .ok_or_else(CrudError::not_found)?;
        Ok(HandlerOutcome::ok(Value::Object(record)))
    }

    fn update(&self, key: String, payload: &Payload) -> Result<HandlerOutcome, CrudError> {
        let key_fields = [self.config.key_field.as_str()];
        let Some(update) = build_update_spec(payload, &key_fields) else {
            let record = self
                .store
                .get(&key)
                .map_err(unexpected)?
                .ok_or_else(CrudError::not_found)?;
            return Ok(HandlerOutcome::ok(json!({
                "message": UNCHANGED_MESSAGE,
                "item": record,
            })));
        };

        let item = self
            .store
            .update_existing(&key, &update)
            .map_err(|error| match error {
                StoreError::ConditionFailed => CrudError::not_found(),
                other => unexpected(other),
            })?;

        Ok(HandlerOutcome::ok(json!({
            "message": UPDATED_MESSAGE,
            "item": item,
        })))
    }

    fn delete(&self, key: String) -> Result<HandlerOutcome, CrudError> {
        self.store.delete(&key).map_err(unexpected)?;

        let mut body = Map::new();
        body.insert("message".to_string(), Value::from(DELETED_MESSAGE));
        body.insert(self.config.key_field.clone(), Value::String(key));
        Ok(HandlerOutcome::ok(Value::Object(body)))
    }
}

fn unexpected(error: StoreError) -> CrudError {
    CrudError::Unexpected(error.to_string())
}

fn log_rejection(
    action: Option<Action>,
    key: Option<&str>,
    error: &CrudError,
    started_at: Instant,
) -> ApiGatewayResponse {
    let response = error_response(error);
    let action = action.map(Action::as_str).unwrap_or_default();
    let key = key.unwrap_or_default();
    let duration_ms = started_at.elapsed().as_millis() as u64;

    if response.status_code >= 500 {
        tracing::error!(
            component = "record_handler",
            event = "request_failed",
            action,
            key,
            status_code = response.status_code,
            error_kind = error.kind(),
            error = %error,
            duration_ms,
        );
    } else {
        tracing::warn!(
            component = "record_handler",
            event = "request_rejected",
            action,
            key,
            status_code = response.status_code,
            error_kind = error.kind(),
            error = %error,
            duration_ms,
        );
    }

    response
}
