use axum::extract::{ Path, State };
use axum::http::{ HeaderMap, StatusCode };
use axum::Json;

use crate::db::entity::address;
use crate::db::payload::AddressData;
use crate::error::{ AppError, Result };

use super::AppState;

pub async fn list_addresses(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>
) -> Result<Json<Vec<address::Model>>> {
    tracing::info!("Request for all addresses of customer with id: {}", customer_id);

    if !state.customers.exists(customer_id).await? {
        return Err(customer_not_found(customer_id));
    }

    let addresses = state.addresses.list_by_customer(customer_id).await?;
    Ok(Json(addresses))
}

pub async fn create_address(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    headers: HeaderMap,
    body: String
) -> Result<(StatusCode, Json<address::Model>)> {
    tracing::info!("Request to create an address for customer with id: {}", customer_id);

    super::check_content_type(&headers)?;

    // Resolve the parent before reading the body: a bad payload against a
    // missing customer is a 404, not a 400.
    if !state.customers.exists(customer_id).await? {
        return Err(customer_not_found(customer_id));
    }

    let value = super::parse_json(&body, "Address")?;
    let data = AddressData::deserialize(&value)?;

    let created = state.addresses.create(customer_id, &data).await?;
    tracing::info!("Address with id [{}] created for customer [{}]", created.id, customer_id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_address(
    State(state): State<AppState>,
    Path((customer_id, address_id)): Path<(i32, i32)>
) -> Result<Json<address::Model>> {
    tracing::info!("Request to retrieve address {} for customer id: {}", address_id, customer_id);

    let address = state.addresses
        .find(address_id).await?
        .ok_or_else(|| address_not_found(address_id))?;

    Ok(Json(address))
}

pub async fn update_address(
    State(state): State<AppState>,
    Path((customer_id, address_id)): Path<(i32, i32)>,
    headers: HeaderMap,
    body: String
) -> Result<Json<address::Model>> {
    tracing::info!("Request to update address {} for customer id: {}", address_id, customer_id);

    super::check_content_type(&headers)?;

    if state.addresses.find(address_id).await?.is_none() {
        return Err(address_not_found(address_id));
    }

    let value = super::parse_json(&body, "Address")?;
    let data = AddressData::deserialize(&value)?;

    let updated = state.addresses
        .update(address_id, &data).await?
        .ok_or_else(|| address_not_found(address_id))?;

    Ok(Json(updated))
}

pub async fn delete_address(
    State(state): State<AppState>,
    Path((customer_id, address_id)): Path<(i32, i32)>
) -> Result<StatusCode> {
    tracing::info!("Request to delete address {} for customer id: {}", address_id, customer_id);

    state.addresses.delete(address_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn customer_not_found(customer_id: i32) -> AppError {
    AppError::NotFound(format!("Customer with id '{}' could not be found.", customer_id))
}

fn address_not_found(address_id: i32) -> AppError {
    AppError::NotFound(format!("Address with id '{}' could not be found.", address_id))
}
