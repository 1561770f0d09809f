use std::sync::Arc;

use axum::http::{ header, HeaderMap };
use axum::routing::{ get, put };
use axum::Router;
use serde_json::Value;

pub mod customer;
pub mod address;

use crate::db::payload::ValidationError;
use crate::db::{ AddressRepository, CustomerRepository };
use crate::error::{ AppError, Result };

#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerRepository>,
    pub addresses: Arc<AddressRepository>,
}

impl AppState {
    pub fn new(customers: Arc<CustomerRepository>, addresses: Arc<AddressRepository>) -> Self {
        Self { customers, addresses }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(customer::index))
        .route("/health", get(health_check))
        .route("/customers", get(customer::list_customers).post(customer::create_customer))
        .route(
            "/customers/{id}",
            get(customer::get_customer)
                .put(customer::update_customer)
                .delete(customer::delete_customer)
        )
        .route("/customers/{id}/suspend", put(customer::suspend_customer))
        .route("/customers/{id}/restore", put(customer::restore_customer))
        .route(
            "/customers/{id}/addresses",
            get(address::list_addresses).post(address::create_address)
        )
        .route(
            "/customers/{id}/addresses/{aid}",
            get(address::get_address).put(address::update_address).delete(address::delete_address)
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Media-type gate plus JSON parse for the write endpoints. The content type
/// is checked before the body is touched, so a wrong content type is a 415
/// before any persistence attempt.
pub(crate) fn parse_json_body(
    headers: &HeaderMap,
    body: &str,
    entity: &'static str
) -> Result<Value> {
    check_content_type(headers)?;
    parse_json(body, entity)
}

pub(crate) fn parse_json(body: &str, entity: &'static str) -> Result<Value> {
    serde_json
        ::from_str(body)
        .map_err(|_| AppError::Validation(ValidationError::MalformedBody { entity }))
}

pub(crate) fn check_content_type(headers: &HeaderMap) -> Result<()> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");

    if content_type == "application/json" || content_type.starts_with("application/json;") {
        return Ok(());
    }

    tracing::error!("Invalid Content-Type: {}", content_type);
    Err(AppError::UnsupportedMediaType("application/json"))
}
