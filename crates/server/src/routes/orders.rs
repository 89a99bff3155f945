//! Order routes.
//!
//! The order representation exposes the snapshot fields taken at
//! creation, a nullable customer summary, and the line items with totals
//! computed from current product prices.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chicken_direct_core::{AddressId, CustomerId, OrderId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order_items::OrderItemResponse;
use super::require;
use crate::error::{ApiError, Result};
use crate::models::{Order, OrderChanges, OrderDetails};
use crate::services::OrderService;
use crate::state::AppState;

/// Request body for creating an order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer_id: Option<CustomerId>,
    pub shipping_address_id: Option<AddressId>,
    pub total_price: Option<Decimal>,
    pub shipping_charge: Option<Decimal>,
    /// Defaults to `false` when absent.
    pub is_shipped: Option<bool>,
}

/// Validated order creation values.
#[derive(Debug)]
pub struct CreateOrder {
    pub customer_id: CustomerId,
    pub shipping_address_id: AddressId,
    pub total_price: Decimal,
    pub shipping_charge: Decimal,
    pub is_shipped: bool,
}

impl CreateOrderRequest {
    fn validate(self) -> Result<CreateOrder> {
        let mut errors = BTreeMap::new();

        let customer_id = require(&mut errors, "customerId", self.customer_id);
        let shipping_address_id = require(&mut errors, "shippingAddressId", self.shipping_address_id);
        let total_price = require(&mut errors, "totalPrice", self.total_price)
            .and_then(|p| non_negative(&mut errors, "totalPrice", p));
        let shipping_charge = require(&mut errors, "shippingCharge", self.shipping_charge)
            .and_then(|p| non_negative(&mut errors, "shippingCharge", p));

        match (customer_id, shipping_address_id, total_price, shipping_charge) {
            (Some(customer_id), Some(shipping_address_id), Some(total_price), Some(shipping_charge)) => {
                Ok(CreateOrder {
                    customer_id,
                    shipping_address_id,
                    total_price,
                    shipping_charge,
                    is_shipped: self.is_shipped.unwrap_or(false),
                })
            }
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// Request body for a partial order update.
///
/// `isShipped` is required and always applied; the price fields are
/// optional and merged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub total_price: Option<Decimal>,
    pub shipping_charge: Option<Decimal>,
    pub is_shipped: Option<bool>,
}

impl UpdateOrderRequest {
    fn validate(self) -> Result<OrderChanges> {
        let mut errors = BTreeMap::new();

        let total_price = self
            .total_price
            .and_then(|p| non_negative(&mut errors, "totalPrice", p));
        let shipping_charge = self
            .shipping_charge
            .and_then(|p| non_negative(&mut errors, "shippingCharge", p));
        let is_shipped = require(&mut errors, "isShipped", self.is_shipped);

        match is_shipped {
            Some(is_shipped) if errors.is_empty() => Ok(OrderChanges {
                total_price,
                shipping_charge,
                is_shipped,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

fn non_negative(
    errors: &mut BTreeMap<String, String>,
    field: &str,
    value: Decimal,
) -> Option<Decimal> {
    if value < Decimal::ZERO {
        errors.insert(
            field.to_owned(),
            "must be greater than or equal to 0".to_owned(),
        );
        return None;
    }
    Some(value)
}

/// The snapshot customer fields plus the weak reference.
///
/// `id` goes null when the customer is deleted; `name` and `email` come
/// from the snapshot and never change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummaryResponse {
    pub id: Option<CustomerId>,
    pub name: String,
    pub email: String,
}

/// An order with its snapshot fields and items.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer: CustomerSummaryResponse,
    pub shipping_street: String,
    pub shipping_city: String,
    pub shipping_postal_code: String,
    pub shipping_country: String,
    pub total_price: Decimal,
    pub shipping_charge: Decimal,
    pub is_shipped: bool,
    pub creation_date: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderDetails> for OrderResponse {
    fn from(details: OrderDetails) -> Self {
        let order = details.order;
        Self {
            id: order.id,
            customer: CustomerSummaryResponse {
                id: order.customer_id,
                name: order.customer.name,
                email: order.customer.email.into_inner(),
            },
            shipping_street: order.shipping.street,
            shipping_city: order.shipping.city,
            shipping_postal_code: order.shipping.postal_code,
            shipping_country: order.shipping.country,
            total_price: order.total_price,
            shipping_charge: order.shipping_charge,
            is_shipped: order.is_shipped,
            creation_date: order.creation_date,
            items: details
                .items
                .into_iter()
                .map(OrderItemResponse::from)
                .collect(),
        }
    }
}

/// The order summary embedded in customer representations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryResponse {
    pub id: OrderId,
    pub total_price: Decimal,
    pub shipping_charge: Decimal,
    pub is_shipped: bool,
    pub creation_date: DateTime<Utc>,
}

impl From<Order> for OrderSummaryResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            total_price: order.total_price,
            shipping_charge: order.shipping_charge,
            is_shipped: order.is_shipped,
            creation_date: order.creation_date,
        }
    }
}

/// POST /api/orders
///
/// Takes the customer and address snapshot at this moment.
///
/// # Errors
///
/// Returns 400 on validation failure, 404 if the customer or shipping
/// address does not exist.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let create = request.validate()?;
    let details = OrderService::new(state.pool())
        .create(
            create.customer_id,
            create.shipping_address_id,
            create.total_price,
            create.shipping_charge,
            create.is_shipped,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /api/orders
///
/// # Errors
///
/// Returns 500 on repository failure.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderResponse>>> {
    let details = OrderService::new(state.pool()).list().await?;

    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// GET /api/orders/{order_id}
///
/// # Errors
///
/// Returns 404 if the order does not exist.
pub async fn get(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderResponse>> {
    let details = OrderService::new(state.pool()).get(order_id).await?;

    Ok(Json(details.into()))
}

/// PUT /api/orders/{order_id}
///
/// Partial merge of the mutable fields; the snapshot is untouchable.
///
/// # Errors
///
/// Returns 400 on validation failure, 404 if the order does not exist.
pub async fn update(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>> {
    let changes = request.validate()?;
    let details = OrderService::new(state.pool())
        .update(order_id, changes)
        .await?;

    Ok(Json(details.into()))
}

/// DELETE /api/orders/{order_id}
///
/// # Errors
///
/// Returns 404 if the order does not exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(order_id): Path<OrderId>,
) -> Result<StatusCode> {
    OrderService::new(state.pool()).delete(order_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_references_and_prices() {
        let request = CreateOrderRequest {
            customer_id: None,
            shipping_address_id: None,
            total_price: None,
            shipping_charge: Some(Decimal::new(-500, 2)),
            is_shipped: None,
        };

        let err = request.validate().unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(fields.get("customerId").unwrap(), "must not be null");
        assert_eq!(fields.get("shippingAddressId").unwrap(), "must not be null");
        assert_eq!(fields.get("totalPrice").unwrap(), "must not be null");
        assert_eq!(
            fields.get("shippingCharge").unwrap(),
            "must be greater than or equal to 0"
        );
    }

    #[test]
    fn test_create_defaults_is_shipped_to_false() {
        let request = CreateOrderRequest {
            customer_id: Some(CustomerId::new(1)),
            shipping_address_id: Some(AddressId::new(2)),
            total_price: Some(Decimal::new(10000, 2)),
            shipping_charge: Some(Decimal::new(1000, 2)),
            is_shipped: None,
        };

        let create = request.validate().unwrap();
        assert!(!create.is_shipped);
    }

    #[test]
    fn test_update_requires_is_shipped() {
        let request = UpdateOrderRequest {
            total_price: None,
            shipping_charge: None,
            is_shipped: None,
        };

        let err = request.validate().unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(fields.get("isShipped").unwrap(), "must not be null");
    }
}
