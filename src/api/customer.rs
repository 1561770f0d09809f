use axum::extract::{ Path, Query, State };
use axum::http::{ header, HeaderMap, StatusCode };
use axum::response::IntoResponse;
use axum::Json;
use serde::{ Deserialize, Serialize };

use crate::db::entity::address;
use crate::db::payload::CustomerData;
use crate::db::{ CustomerFilter, CustomerWithAddresses };
use crate::enums::AccountStatus;
use crate::error::{ AppError, Result };

use super::AppState;

#[derive(Serialize)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub account_status: String,
    pub addresses: Vec<address::Model>,
}

impl From<CustomerWithAddresses> for CustomerResponse {
    fn from((customer, addresses): CustomerWithAddresses) -> Self {
        Self {
            id: customer.id,
            name: customer.name,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            phone_number: customer.phone_number,
            account_status: customer.account_status,
            addresses,
        }
    }
}

#[derive(Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub url: &'static str,
}

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "Customer Service",
        version: env!("CARGO_PKG_VERSION"),
        url: "/customers",
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub street: Option<String>,
    pub postalcode: Option<String>,
}

impl ListQuery {
    /// Filters are mutually exclusive; the first recognized non-empty
    /// parameter wins, in this order.
    pub fn filter(&self) -> Option<CustomerFilter> {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|v| !v.is_empty()).cloned()
        }

        if let Some(value) = non_empty(&self.name) {
            return Some(CustomerFilter::Name(value));
        }
        if let Some(value) = non_empty(&self.first_name) {
            return Some(CustomerFilter::FirstName(value));
        }
        if let Some(value) = non_empty(&self.last_name) {
            return Some(CustomerFilter::LastName(value));
        }
        if let Some(value) = non_empty(&self.email) {
            return Some(CustomerFilter::Email(value));
        }
        if let Some(value) = non_empty(&self.phone_number) {
            return Some(CustomerFilter::PhoneNumber(value));
        }
        if let Some(value) = non_empty(&self.street) {
            return Some(CustomerFilter::Street(value));
        }
        if let Some(value) = non_empty(&self.postalcode) {
            return Some(CustomerFilter::Postalcode(value));
        }
        None
    }
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>
) -> Result<Json<Vec<CustomerResponse>>> {
    tracing::info!("Request for customer list");

    let customers = match query.filter() {
        Some(filter) => state.customers.find_by(&filter).await?,
        None => state.customers.all().await?,
    };

    let results: Vec<CustomerResponse> = customers.into_iter().map(Into::into).collect();
    tracing::info!("Returning {} customers", results.len());

    Ok(Json(results))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>
) -> Result<Json<CustomerResponse>> {
    tracing::info!("Request for customer with id: {}", customer_id);

    let customer = state.customers
        .find(customer_id).await?
        .ok_or_else(|| customer_not_found(customer_id))?;

    Ok(Json(customer.into()))
}

pub async fn create_customer(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String
) -> Result<impl IntoResponse> {
    tracing::info!("Request to create a customer");

    let value = super::parse_json_body(&headers, &body, "Customer")?;
    let data = CustomerData::deserialize(&value)?;

    let created = state.customers.create(&data).await?;
    let location = format!("/customers/{}", created.0.id);
    tracing::info!("Customer with id [{}] created", created.0.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CustomerResponse::from(created)),
    ))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
    headers: HeaderMap,
    body: String
) -> Result<Json<CustomerResponse>> {
    tracing::info!("Request to update customer with id: {}", customer_id);

    super::check_content_type(&headers)?;

    // Resolve the id before reading the body: a bad payload against a
    // missing id is a 404, not a 400.
    if !state.customers.exists(customer_id).await? {
        return Err(customer_not_found(customer_id));
    }

    let value = super::parse_json(&body, "Customer")?;
    let data = CustomerData::deserialize(&value)?;

    let updated = state.customers
        .update(customer_id, &data).await?
        .ok_or_else(|| customer_not_found(customer_id))?;

    tracing::info!("Customer with id [{}] updated", customer_id);
    Ok(Json(updated.into()))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>
) -> Result<StatusCode> {
    tracing::info!("Request to delete customer with id: {}", customer_id);

    state.customers.delete(customer_id).await?;

    tracing::info!("Customer with id [{}] delete complete", customer_id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn suspend_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>
) -> Result<Json<CustomerResponse>> {
    tracing::info!("Request to suspend customer with id: {}", customer_id);
    set_account_status(&state, customer_id, AccountStatus::Suspended).await
}

pub async fn restore_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>
) -> Result<Json<CustomerResponse>> {
    tracing::info!("Request to restore customer with id: {}", customer_id);
    set_account_status(&state, customer_id, AccountStatus::Active).await
}

// Suspending a suspended customer (or restoring an active one) commits the
// same value again and returns 200.
async fn set_account_status(
    state: &AppState,
    customer_id: i32,
    status: AccountStatus
) -> Result<Json<CustomerResponse>> {
    let updated = state.customers
        .set_status(customer_id, status).await?
        .ok_or_else(|| customer_not_found(customer_id))?;

    tracing::info!("Customer with id [{}] is now {}", customer_id, status);
    Ok(Json(updated.into()))
}

fn customer_not_found(customer_id: i32) -> AppError {
    AppError::NotFound(format!("Customer with id '{}' was not found.", customer_id))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::Request;
    use sea_orm::{ DatabaseBackend, DatabaseConnection, MockDatabase };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::db::entity::customer;
    use crate::db::{ AddressRepository, CustomerRepository };
    use crate::retry::RetryPolicy;

    use super::*;

    fn state_with(db: DatabaseConnection) -> AppState {
        let retry = RetryPolicy::new(1, Duration::from_millis(1), 2.0);
        AppState::new(
            Arc::new(CustomerRepository::new(crate::db::clone_connection(&db), retry.clone())),
            Arc::new(AddressRepository::new(db, retry))
        )
    }

    fn customer_row() -> customer::Model {
        customer::Model {
            id: 7,
            name: "jdoe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: None,
            account_status: "active".to_string(),
        }
    }

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        let mut query = ListQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "name" => query.name = value,
                "first_name" => query.first_name = value,
                "last_name" => query.last_name = value,
                "email" => query.email = value,
                "phone_number" => query.phone_number = value,
                "street" => query.street = value,
                "postalcode" => query.postalcode = value,
                other => panic!("unknown query parameter {}", other),
            }
        }
        query
    }

    #[test]
    fn test_no_parameters_means_no_filter() {
        assert_eq!(ListQuery::default().filter(), None);
    }

    #[test]
    fn test_single_parameter_selects_its_filter() {
        assert_eq!(
            query(&[("email", "jane@x.com")]).filter(),
            Some(CustomerFilter::Email("jane@x.com".to_string()))
        );
        assert_eq!(
            query(&[("street", "1 Main")]).filter(),
            Some(CustomerFilter::Street("1 Main".to_string()))
        );
    }

    #[test]
    fn test_first_recognized_parameter_wins() {
        let q = query(&[("last_name", "Doe"), ("email", "jane@x.com"), ("postalcode", "62704")]);
        assert_eq!(q.filter(), Some(CustomerFilter::LastName("Doe".to_string())));
    }

    #[test]
    fn test_empty_parameters_are_skipped() {
        let q = query(&[("name", ""), ("phone_number", "555-1212")]);
        assert_eq!(q.filter(), Some(CustomerFilter::PhoneNumber("555-1212".to_string())));
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_404_before_body_validation() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<customer::Model>::new()])
            .into_connection();

        let request = Request::builder()
            .method("PUT")
            .uri("/customers/9999")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = crate::api::router(state_with(db)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_existing_customer_with_bad_body_is_400() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![customer_row()]])
            .into_connection();

        let request = Request::builder()
            .method("PUT")
            .uri("/customers/7")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();

        let response = crate::api::router(state_with(db)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_response_serializes_with_nested_addresses() {
        let customer = customer::Model {
            id: 7,
            name: "jdoe".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone_number: None,
            account_status: "active".to_string(),
        };
        let address = address::Model {
            id: 3,
            customer_id: 7,
            name: "Home".to_string(),
            street: "1 Main".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postalcode: "62704".to_string(),
        };

        let response = CustomerResponse::from((customer, vec![address]));
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "id": 7,
                "name": "jdoe",
                "first_name": "Jane",
                "last_name": "Doe",
                "email": "jane@x.com",
                "phone_number": null,
                "account_status": "active",
                "addresses": [{
                    "id": 3,
                    "customer_id": 7,
                    "name": "Home",
                    "street": "1 Main",
                    "city": "Springfield",
                    "state": "IL",
                    "postalcode": "62704"
                }]
            })
        );
    }
}
