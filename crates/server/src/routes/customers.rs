//! Customer routes.
//!
//! The customer representation embeds its addresses and a summary of the
//! orders still referencing it.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chicken_direct_core::{CustomerId, Email};
use serde::{Deserialize, Serialize};

use super::orders::OrderSummaryResponse;
use super::{addresses::AddressResponse, require_text};
use crate::error::{ApiError, Result};
use crate::models::{CustomerDetails, NewCustomer};
use crate::services::CustomerService;
use crate::state::AppState;

/// Request body for creating or replacing a customer.
///
/// Every field is optional at the serde level so validation can report
/// all missing fields at once instead of failing on the first.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl CustomerRequest {
    fn validate(self) -> Result<NewCustomer> {
        let mut errors = BTreeMap::new();

        let name = require_text(&mut errors, "name", self.name);
        let phone = require_text(&mut errors, "phone", self.phone);
        let email = require_text(&mut errors, "email", self.email).and_then(|raw| {
            match Email::parse(&raw) {
                Ok(email) => Some(email),
                Err(_) => {
                    errors.insert(
                        "email".to_owned(),
                        "must be a well-formed email address".to_owned(),
                    );
                    None
                }
            }
        });

        match (name, phone, email) {
            (Some(name), Some(phone), Some(email)) => Ok(NewCustomer { name, phone, email }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// A customer with its addresses and order summaries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub email: Email,
    pub addresses: Vec<AddressResponse>,
    pub orders: Vec<OrderSummaryResponse>,
}

impl From<CustomerDetails> for CustomerResponse {
    fn from(details: CustomerDetails) -> Self {
        Self {
            id: details.customer.id,
            name: details.customer.name,
            phone: details.customer.phone,
            email: details.customer.email,
            addresses: details
                .addresses
                .into_iter()
                .map(AddressResponse::from)
                .collect(),
            orders: details
                .orders
                .into_iter()
                .map(OrderSummaryResponse::from)
                .collect(),
        }
    }
}

/// POST /api/customers
///
/// # Errors
///
/// Returns 400 on validation failure.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> Result<(StatusCode, Json<CustomerResponse>)> {
    let new = request.validate()?;
    let details = CustomerService::new(state.pool()).create(&new).await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /api/customers
///
/// # Errors
///
/// Returns 500 on repository failure.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<CustomerResponse>>> {
    let details = CustomerService::new(state.pool()).list().await?;

    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// GET /api/customers/{customer_id}
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn get(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<Json<CustomerResponse>> {
    let details = CustomerService::new(state.pool()).get(customer_id).await?;

    Ok(Json(details.into()))
}

/// PUT /api/customers/{customer_id}
///
/// Full replace: every field is overwritten.
///
/// # Errors
///
/// Returns 400 on validation failure, 404 if the customer does not exist.
pub async fn update(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<CustomerResponse>> {
    let new = request.validate()?;
    let details = CustomerService::new(state.pool())
        .update(customer_id, &new)
        .await?;

    Ok(Json(details.into()))
}

/// DELETE /api/customers/{customer_id}
///
/// # Errors
///
/// Returns 404 if the customer does not exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(customer_id): Path<CustomerId>,
) -> Result<StatusCode> {
    CustomerService::new(state.pool()).delete(customer_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
