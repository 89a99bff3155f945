//! Order item routes.
//!
//! Line items are flat resources keyed by their own id; `lineTotal` in
//! the response is computed from the product's current price on every
//! read.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chicken_direct_core::{OrderId, OrderItemId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::products::ProductResponse;
use super::require;
use crate::error::{ApiError, Result};
use crate::models::OrderItemDetails;
use crate::services::OrderItemService;
use crate::state::AppState;

/// Request body for creating a line item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItemRequest {
    pub order_id: Option<OrderId>,
    pub product_id: Option<ProductId>,
    pub quantity: Option<i64>,
}

/// Validated line item creation values.
#[derive(Debug)]
pub struct CreateOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
}

impl CreateOrderItemRequest {
    fn validate(self) -> Result<CreateOrderItem> {
        let mut errors = BTreeMap::new();

        let order_id = require(&mut errors, "orderId", self.order_id);
        let product_id = require(&mut errors, "productId", self.product_id);
        let quantity = require(&mut errors, "quantity", self.quantity).and_then(|q| {
            if q > 0 {
                Some(q)
            } else {
                errors.insert("quantity".to_owned(), "must be greater than 0".to_owned());
                None
            }
        });

        match (order_id, product_id, quantity) {
            (Some(order_id), Some(product_id), Some(quantity)) => Ok(CreateOrderItem {
                order_id,
                product_id,
                quantity,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// A line item with its product and computed total.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: OrderItemId,
    pub quantity: i64,
    pub product: ProductResponse,
    pub order_id: OrderId,
    pub line_total: Decimal,
}

impl From<OrderItemDetails> for OrderItemResponse {
    fn from(details: OrderItemDetails) -> Self {
        Self {
            id: details.item.id,
            quantity: details.item.quantity,
            product: details.product.into(),
            order_id: details.item.order_id,
            line_total: details.line_total,
        }
    }
}

/// POST /api/order-items
///
/// # Errors
///
/// Returns 400 on validation failure, 404 if the order or product does
/// not exist.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderItemRequest>,
) -> Result<(StatusCode, Json<OrderItemResponse>)> {
    let create = request.validate()?;
    let details = OrderItemService::new(state.pool())
        .create(create.order_id, create.product_id, create.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(details.into())))
}

/// GET /api/order-items
///
/// # Errors
///
/// Returns 500 on repository failure.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<OrderItemResponse>>> {
    let details = OrderItemService::new(state.pool()).list().await?;

    Ok(Json(details.into_iter().map(Into::into).collect()))
}

/// GET /api/order-items/{order_item_id}
///
/// # Errors
///
/// Returns 404 if the line item does not exist.
pub async fn get(
    State(state): State<AppState>,
    Path(order_item_id): Path<OrderItemId>,
) -> Result<Json<OrderItemResponse>> {
    let details = OrderItemService::new(state.pool()).get(order_item_id).await?;

    Ok(Json(details.into()))
}

/// DELETE /api/order-items/{order_item_id}
///
/// # Errors
///
/// Returns 404 if the line item does not exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(order_item_id): Path<OrderItemId>,
) -> Result<StatusCode> {
    OrderItemService::new(state.pool()).delete(order_item_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let request = CreateOrderItemRequest {
            order_id: Some(OrderId::new(1)),
            product_id: Some(ProductId::new(2)),
            quantity: Some(0),
        };

        let err = request.validate().unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(fields.get("quantity").unwrap(), "must be greater than 0");
    }

    #[test]
    fn test_validate_requires_references() {
        let request = CreateOrderItemRequest {
            order_id: None,
            product_id: None,
            quantity: Some(2),
        };

        let err = request.validate().unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(fields.get("orderId").unwrap(), "must not be null");
        assert_eq!(fields.get("productId").unwrap(), "must not be null");
    }
}
