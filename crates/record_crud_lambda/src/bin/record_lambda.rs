use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use record_crud_core::config::HandlerConfig;
use record_crud_lambda::adapters::dynamodb::DynamoDbRecordStore;
use record_crud_lambda::handlers::records::RecordHandler;
use record_crud_lambda::handlers::response::ApiGatewayResponse;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging();

    let config = HandlerConfig::resolve(optional_env("TABLE_NAME"), optional_env("RECORD_KEY_FIELD"));
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store =
        DynamoDbRecordStore::from_sdk_config(&aws_config, &config, optional_env("DYNAMODB_ENDPOINT_URL"));

    tracing::info!(
        component = "record_lambda",
        event = "runtime_started",
        table_name = %config.table_name,
        key_field = %config.key_field,
    );

    let handler = Arc::new(RecordHandler::new(store, config));
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { Ok::<ApiGatewayResponse, Error>(handler.handle_event(event.payload)) }
    }))
    .await
}
