use record_crud_core::contract::CONTENT_TYPE_JSON;
use record_crud_core::error::CrudError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    /// Parses the JSON-encoded body back into a value.
    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

pub fn success_response(status_code: u16, payload: &Value) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code,
        headers: json!({"Content-Type": CONTENT_TYPE_JSON}),
        body: payload.to_string(),
    }
}

pub fn error_response(error: &CrudError) -> ApiGatewayResponse {
    ApiGatewayResponse {
        status_code: error.status_code(),
        headers: json!({"Content-Type": CONTENT_TYPE_JSON}),
        body: json!({"error": error.to_string()}).to_string(),
    }
}
