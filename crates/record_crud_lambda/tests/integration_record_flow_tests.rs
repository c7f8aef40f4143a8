use record_crud_core::config::HandlerConfig;
use record_crud_lambda::adapters::memory::InMemoryRecordStore;
use record_crud_lambda::handlers::records::{RecordHandler, DELETED_MESSAGE, UPDATED_MESSAGE};
use record_crud_lambda::handlers::response::ApiGatewayResponse;
use serde_json::{json, Value};

fn id_handler() -> RecordHandler<InMemoryRecordStore> {
    RecordHandler::new(
        InMemoryRecordStore::new("id"),
        HandlerConfig::resolve(Some("Records".to_string()), Some("id".to_string())),
    )
}

fn body(response: &ApiGatewayResponse) -> Value {
    response.body_json().expect("response body should be JSON")
}

fn create(handler: &RecordHandler<InMemoryRecordStore>, payload: Value) -> ApiGatewayResponse {
    handler.handle_event(json!({
        "requestContext": {"http": {"method": "POST"}},
        "body": payload.to_string()
    }))
}

fn read(handler: &RecordHandler<InMemoryRecordStore>, key: &str) -> ApiGatewayResponse {
    handler.handle_event(json!({
        "requestContext": {"http": {"method": "GET"}},
        "pathParameters": {"id": key}
    }))
}

#[test]
fn create_then_read_returns_record() {
    let handler = id_handler();

    let created = create(&handler, json!({"id": "s1", "name": "A"}));
    assert_eq!(created.status_code, 201);
    assert_eq!(body(&created), json!({"item": {"id": "s1", "name": "A"}}));

    let fetched = read(&handler, "s1");
    assert_eq!(fetched.status_code, 200);
    assert_eq!(body(&fetched), json!({"id": "s1", "name": "A"}));
    assert_eq!(
        fetched.headers,
        json!({"Content-Type": "application/json"})
    );
}

#[test]
fn create_is_an_upsert() {
    let handler = id_handler();

    assert_eq!(create(&handler, json!({"id": "s1", "name": "A"})).status_code, 201);
    assert_eq!(create(&handler, json!({"id": "s1", "name": "B"})).status_code, 201);

    assert_eq!(body(&read(&handler, "s1")), json!({"id": "s1", "name": "B"}));
    assert_eq!(handler.store().len(), 1);
}

#[test]
fn read_of_missing_record_is_not_found() {
    let handler = id_handler();
    let response = read(&handler, "ghost");

    assert_eq!(response.status_code, 404);
    assert_eq!(body(&response), json!({"error": "Not found"}));
}

#[test]
fn update_of_never_created_key_is_not_found() {
    let handler = id_handler();
    let response = handler.handle_event(json!({
        "httpMethod": "PUT",
        "pathParameters": {"id": "ghost"},
        "body": {"name": "B"}
    }));

    assert_eq!(response.status_code, 404);
    assert!(handler.store().is_empty());
}

#[test]
fn update_preserves_identity_and_untouched_fields() {
    let handler = id_handler();
    create(&handler, json!({"id": "s1", "name": "A", "year": 2}));

    let response = handler.handle_event(json!({
        "httpMethod": "PUT",
        "pathParameters": {"id": "s1"},
        "body": "{\"id\":\"hijack\",\"name\":\"B\"}"
    }));

    assert_eq!(response.status_code, 200);
    assert_eq!(
        body(&response),
        json!({"message": UPDATED_MESSAGE, "item": {"id": "s1", "name": "B", "year": 2}})
    );
    assert_eq!(read(&handler, "hijack").status_code, 404);
}

#[test]
fn delete_is_idempotent() {
    let handler = id_handler();
    create(&handler, json!({"id": "s1"}));

    for _ in 0..2 {
        let response = handler.handle_event(json!({
            "httpMethod": "DELETE",
            "queryStringParameters": {"id": "s1"}
        }));
        assert_eq!(response.status_code, 200);
        assert_eq!(body(&response), json!({"message": DELETED_MESSAGE, "id": "s1"}));
    }

    assert_eq!(read(&handler, "s1").status_code, 404);
}

#[test]
fn explicit_action_overrides_method() {
    let handler = id_handler();
    create(&handler, json!({"id": "s1", "name": "A"}));

    let response = handler.handle_event(json!({
        "action": "GeT",
        "httpMethod": "POST",
        "pathParameters": {"id": "s1"},
        "body": {"id": "s1", "name": "overwritten?"}
    }));

    assert_eq!(response.status_code, 200);
    assert_eq!(body(&response), json!({"id": "s1", "name": "A"}));
}

#[test]
fn path_key_takes_precedence_over_body_key() {
    let handler = id_handler();
    let response = handler.handle_event(json!({
        "httpMethod": "POST",
        "pathParameters": {"id": "p1"},
        "body": {"id": "b1", "name": "A"}
    }));

    assert_eq!(body(&response), json!({"item": {"id": "p1", "name": "A"}}));
    assert_eq!(read(&handler, "p1").status_code, 200);
    assert_eq!(read(&handler, "b1").status_code, 404);
}

#[test]
fn missing_key_is_a_validation_error_for_every_action() {
    let handler = id_handler();
    for method in ["GET", "PUT", "DELETE"] {
        let response = handler.handle_event(json!({"httpMethod": method}));
        assert_eq!(response.status_code, 400, "method {method}");
        assert_eq!(body(&response), json!({"error": "Missing id"}));
    }
}

#[test]
fn unroutable_request_fails_closed() {
    let handler = id_handler();
    let response = handler.handle_event(json!({"pathParameters": {"id": "s1"}}));

    assert_eq!(response.status_code, 400);
    assert!(body(&response)["error"].is_string());
}
