//! Address routes, nested under a customer.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chicken_direct_core::{AddressId, CustomerId};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::error::{ApiError, Result};
use crate::models::{Address, NewAddress};
use crate::services::AddressService;
use crate::state::AppState;

/// Request body for creating or replacing an address.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    pub street: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl AddressRequest {
    fn validate(self) -> Result<NewAddress> {
        let mut errors = BTreeMap::new();

        let street = require_text(&mut errors, "street", self.street);
        let city = require_text(&mut errors, "city", self.city);
        let postal_code = require_text(&mut errors, "postalCode", self.postal_code);
        let country = require_text(&mut errors, "country", self.country);

        match (street, city, postal_code, country) {
            (Some(street), Some(city), Some(postal_code), Some(country)) => Ok(NewAddress {
                street,
                city,
                postal_code,
                country,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// An address as returned to clients. The owning customer is implied by
/// the request path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            street: address.street,
            city: address.city,
            postal_code: address.postal_code,
            country: address.country,
        }
    }
}

/// POST /api/customers/{customer_id}/addresses
///
/// # Errors
///
/// Returns 400 on validation failure, 404 if the customer does not exist.
pub async fn create(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Json(request): Json<AddressRequest>,
) -> Result<(StatusCode, Json<AddressResponse>)> {
    let new = request.validate()?;
    let address = AddressService::new(state.pool())
        .create(customer_id, &new)
        .await?;

    Ok((StatusCode::CREATED, Json(address.into())))
}

/// GET /api/customers/{customer_id}/addresses
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn list(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<Vec<AddressResponse>>> {
    let addresses = AddressService::new(state.pool()).list(customer_id).await?;

    Ok(Json(addresses.into_iter().map(Into::into).collect()))
}

/// PUT /api/customers/{customer_id}/addresses/{address_id}
///
/// Ownership-checked full replace.
///
/// # Errors
///
/// Returns 400 on validation failure, 404 if the address does not exist
/// under this customer.
pub async fn update(
    State(state): State<AppState>,
    Path((customer_id, address_id)): Path<(CustomerId, AddressId)>,
    Json(request): Json<AddressRequest>,
) -> Result<Json<AddressResponse>> {
    let new = request.validate()?;
    let address = AddressService::new(state.pool())
        .update(customer_id, address_id, &new)
        .await?;

    Ok(Json(address.into()))
}

/// DELETE /api/customers/{customer_id}/addresses/{address_id}
///
/// # Errors
///
/// Returns 404 if the address does not exist under this customer.
pub async fn delete(
    State(state): State<AppState>,
    Path((customer_id, address_id)): Path<(CustomerId, AddressId)>,
) -> Result<StatusCode> {
    AddressService::new(state.pool())
        .delete(customer_id, address_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
