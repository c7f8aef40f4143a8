use serde_json::Value;

use crate::action::resolve_action;
use crate::contract::{NormalizedRequest, Payload, RawEvent, Record};
use crate::error::CrudError;

/// Turns a raw invocation event into `{action, key, payload}`.
pub fn normalize_event(event: Value, key_field: &str) -> Result<NormalizedRequest, CrudError> {
    if !event.is_object() {
        return Err(CrudError::Unexpected(
            "Request event must be a JSON object".to_string(),
        ));
    }

    let event = serde_json::from_value::<RawEvent>(event)
        .map_err(|error| CrudError::Unexpected(format!("Malformed request event: {error}")))?;
    normalize_raw_event(event, key_field)
}

pub fn normalize_raw_event(
    event: RawEvent,
    key_field: &str,
) -> Result<NormalizedRequest, CrudError> {
    let action = resolve_action(event.action.as_deref(), event.method())?;
    let body = decode_body(event.body.as_ref())?;
    let key = extract_key(&event, &body, key_field);

    Ok(NormalizedRequest {
        action,
        key,
        payload: Payload::from(body),
    })
}

/// Decodes a structured or JSON-encoded body. Missing, `null` and empty bodies
/// decode to an empty record.
pub fn decode_body(body: Option<&Value>) -> Result<Record, CrudError> {
    match body {
        None | Some(Value::Null) => Ok(Record::new()),
        Some(Value::Object(record)) => Ok(record.clone()),
        Some(Value::String(text)) if text.is_empty() => Ok(Record::new()),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(Value::Null) => Ok(Record::new()),
            Ok(_) => Err(CrudError::Unexpected(
                "Request body must be a JSON object".to_string(),
            )),
            Err(error) => Err(CrudError::Unexpected(format!(
                "Malformed JSON body: {error}"
            ))),
        },
        Some(_) => Err(CrudError::Unexpected(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

/// First non-empty key from path parameters, then query parameters, then body.
fn extract_key(event: &RawEvent, body: &Record, key_field: &str) -> Option<String> {
    [
        event.path_parameters.as_ref(),
        event.query_string_parameters.as_ref(),
    ]
    .into_iter()
    .flatten()
    .filter_map(|parameters| parameters.get(key_field))
    .chain(body.get(key_field))
    .find_map(non_empty_key)
}

fn non_empty_key(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::action::Action;

    #[test]
    fn path_key_wins_over_body_key() {
        let request = normalize_event(
            json!({
                "httpMethod": "GET",
                "pathParameters": {"id": "p1"},
                "body": {"id": "b1"}
            }),
            "id",
        )
        .expect("request should normalize");

        assert_eq!(request.key.as_deref(), Some("p1"));
        assert_eq!(request.action, Action::Read);
    }

    #[test]
    fn empty_candidates_are_skipped() {
        let request = normalize_event(
            json!({
                "httpMethod": "GET",
                "pathParameters": {"id": ""},
                "queryStringParameters": {"id": "q1"},
                "body": {"id": "b1"}
            }),
            "id",
        )
        .expect("request should normalize");

        assert_eq!(request.key.as_deref(), Some("q1"));
    }

    #[test]
    fn falls_back_to_body_key_from_encoded_body() {
        let request = normalize_event(
            json!({
                "requestContext": {"http": {"method": "POST"}},
                "body": "{\"id\":\"b1\",\"name\":\"A\"}"
            }),
            "id",
        )
        .expect("request should normalize");

        assert_eq!(request.action, Action::Create);
        assert_eq!(request.key.as_deref(), Some("b1"));
        assert_eq!(request.payload.get("name"), Some(&json!("A")));
    }

    #[test]
    fn non_string_body_key_is_not_a_key() {
        let request = normalize_event(
            json!({"httpMethod": "GET", "body": {"id": 7}}),
            "id",
        )
        .expect("request should normalize");

        assert!(request.key.is_none());
    }

    #[test]
    fn missing_or_empty_body_is_an_empty_payload() {
        for body in [json!(null), json!(""), json!("null")] {
            let request = normalize_event(json!({"httpMethod": "DELETE", "body": body}), "id")
                .expect("request should normalize");
            assert!(request.payload.is_empty());
        }
    }

    #[test]
    fn malformed_json_body_is_unexpected() {
        let error = normalize_event(json!({"httpMethod": "POST", "body": "{not json"}), "id")
            .expect_err("body should fail");

        assert!(matches!(error, CrudError::Unexpected(_)));
        assert!(error.to_string().starts_with("Malformed JSON body"));
    }

    #[test]
    fn array_body_is_rejected() {
        let error = normalize_event(json!({"httpMethod": "POST", "body": "[1,2]"}), "id")
            .expect_err("body should fail");

        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn non_object_event_is_rejected() {
        let error = normalize_event(json!("GET"), "id").expect_err("event should fail");
        assert!(matches!(error, CrudError::Unexpected(_)));
    }
}
