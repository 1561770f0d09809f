//! Parse-and-validate step between raw JSON bodies and entity state.
//!
//! Callers branch on the typed outcome; a failed validation is an ordinary
//! value here and becomes an HTTP 400 at the controller boundary.

use serde_json::{ Map, Value };
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {entity}: missing {field}")] MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Invalid {entity}: body of request contained bad or no data")] MalformedBody {
        entity: &'static str,
    },
}

impl ValidationError {
    /// Name of the offending field, when one can be singled out.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField { field, .. } => Some(field),
            ValidationError::MalformedBody { .. } => None,
        }
    }
}

/// Validated customer payload, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerData {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub account_status: String,
    pub addresses: Vec<AddressData>,
}

impl CustomerData {
    const ENTITY: &'static str = "Customer";

    pub fn deserialize(data: &Value) -> Result<Self, ValidationError> {
        let map = data
            .as_object()
            .ok_or(ValidationError::MalformedBody { entity: Self::ENTITY })?;

        // The addresses key may be absent, but if present it must be a list
        let addresses = match map.get("addresses") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) =>
                items
                    .iter()
                    .map(AddressData::deserialize)
                    .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(ValidationError::MalformedBody { entity: Self::ENTITY });
            }
        };

        Ok(CustomerData {
            name: required_string(map, Self::ENTITY, "name")?,
            first_name: required_string(map, Self::ENTITY, "first_name")?,
            last_name: required_string(map, Self::ENTITY, "last_name")?,
            email: required_string(map, Self::ENTITY, "email")?,
            phone_number: optional_string(map, Self::ENTITY, "phone_number")?,
            account_status: required_string(map, Self::ENTITY, "account_status")?,
            addresses,
        })
    }
}

/// Validated address payload, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressData {
    pub customer_id: i32,
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub postalcode: String,
}

impl AddressData {
    const ENTITY: &'static str = "Address";

    pub fn deserialize(data: &Value) -> Result<Self, ValidationError> {
        let map = data
            .as_object()
            .ok_or(ValidationError::MalformedBody { entity: Self::ENTITY })?;

        Ok(AddressData {
            customer_id: required_i32(map, Self::ENTITY, "customer_id")?,
            name: required_string(map, Self::ENTITY, "name")?,
            street: required_string(map, Self::ENTITY, "street")?,
            city: required_string(map, Self::ENTITY, "city")?,
            state: required_string(map, Self::ENTITY, "state")?,
            postalcode: required_string(map, Self::ENTITY, "postalcode")?,
        })
    }
}

fn required_string(
    map: &Map<String, Value>,
    entity: &'static str,
    field: &'static str
) -> Result<String, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField { entity, field }),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(ValidationError::MalformedBody { entity }),
    }
}

fn optional_string(
    map: &Map<String, Value>,
    entity: &'static str,
    field: &'static str
) -> Result<Option<String>, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(ValidationError::MalformedBody { entity }),
    }
}

fn required_i32(
    map: &Map<String, Value>,
    entity: &'static str,
    field: &'static str
) -> Result<i32, ValidationError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(ValidationError::MissingField { entity, field }),
        Some(Value::Number(value)) =>
            value
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or(ValidationError::MalformedBody { entity }),
        Some(_) => Err(ValidationError::MalformedBody { entity }),
    }
}
