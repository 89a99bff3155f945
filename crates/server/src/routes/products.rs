//! Product routes.
//!
//! Product update is a partial merge: absent fields keep their stored
//! values, present fields are validated and applied.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chicken_direct_core::{ProductId, ProductStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{require, require_text};
use crate::error::{ApiError, Result};
use crate::models::{NewProduct, Product, ProductChanges};
use crate::services::ProductService;
use crate::state::AppState;

/// Request body for creating a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<String>,
    pub quantity_on_hand: Option<i64>,
}

impl CreateProductRequest {
    fn validate(self) -> Result<NewProduct> {
        let mut errors = BTreeMap::new();

        let name = require_text(&mut errors, "name", self.name);
        let description = require_text(&mut errors, "description", self.description);
        let price =
            require(&mut errors, "price", self.price).and_then(|p| non_negative(&mut errors, "price", p));
        let status = require(&mut errors, "status", self.status)
            .and_then(|s| parse_status(&mut errors, &s));
        let quantity_on_hand = require(&mut errors, "quantityOnHand", self.quantity_on_hand)
            .and_then(|q| non_negative_quantity(&mut errors, q));

        match (name, description, price, status, quantity_on_hand) {
            (Some(name), Some(description), Some(price), Some(status), Some(quantity_on_hand)) => {
                Ok(NewProduct {
                    name,
                    description,
                    price,
                    status,
                    quantity_on_hand,
                })
            }
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// Request body for a partial product update. Absent fields are left
/// unchanged; present fields obey the same constraints as at creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub status: Option<String>,
    pub quantity_on_hand: Option<i64>,
}

impl UpdateProductRequest {
    fn validate(self) -> Result<ProductChanges> {
        let mut errors = BTreeMap::new();

        let name = match self.name {
            Some(name) => require_text(&mut errors, "name", Some(name)),
            None => None,
        };
        let description = match self.description {
            Some(description) => require_text(&mut errors, "description", Some(description)),
            None => None,
        };
        let price = self.price.and_then(|p| non_negative(&mut errors, "price", p));
        let status = self
            .status
            .and_then(|s| parse_status(&mut errors, &s));
        let quantity_on_hand = self
            .quantity_on_hand
            .and_then(|q| non_negative_quantity(&mut errors, q));

        if errors.is_empty() {
            Ok(ProductChanges {
                name,
                description,
                price,
                status,
                quantity_on_hand,
            })
        } else {
            Err(ApiError::Validation(errors))
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

fn non_negative_quantity(errors: &mut BTreeMap<String, String>, value: i64) -> Option<i64> {
    if value < 0 {
        errors.insert(
            "quantityOnHand".to_owned(),
            "must be greater than or equal to 0".to_owned(),
        );
        return None;
    }
    Some(value)
}

fn parse_status(errors: &mut BTreeMap<String, String>, value: &str) -> Option<ProductStatus> {
    match value.parse() {
        Ok(status) => Some(status),
        Err(_) => {
            errors.insert(
                "status".to_owned(),
                "must be one of IN_STOCK, OUT_OF_STOCK".to_owned(),
            );
            None
        }
    }
}

/// A product as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub status: ProductStatus,
    pub quantity_on_hand: i64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            status: product.status,
            quantity_on_hand: product.quantity_on_hand,
        }
    }
}

/// POST /api/products
///
/// # Errors
///
/// Returns 400 on validation failure.
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let new = request.validate()?;
    let product = ProductService::new(state.pool()).create(&new).await?;

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// GET /api/products
///
/// # Errors
///
/// Returns 500 on repository failure.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = ProductService::new(state.pool()).list().await?;

    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /api/products/{product_id}
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn get(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ProductResponse>> {
    let product = ProductService::new(state.pool()).get(product_id).await?;

    Ok(Json(product.into()))
}

/// PUT /api/products/{product_id}
///
/// Partial merge: only the supplied fields change.
///
/// # Errors
///
/// Returns 400 on validation failure, 404 if the product does not exist.
pub async fn update(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
    Json(request): Json<UpdateProductRequest>,
) -> Result<Json<ProductResponse>> {
    let changes = request.validate()?;
    let product = ProductService::new(state.pool())
        .update(product_id, changes)
        .await?;

    Ok(Json(product.into()))
}

/// DELETE /api/products/{product_id}
///
/// # Errors
///
/// Returns 404 if the product does not exist.
pub async fn delete(
    State(state): State<AppState>,
    Path(product_id): Path<ProductId>,
) -> Result<StatusCode> {
    ProductService::new(state.pool()).delete(product_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_rejects_negative_price_and_quantity() {
        let request = CreateProductRequest {
            name: Some("Whole chicken".to_owned()),
            description: Some("Free range".to_owned()),
            price: Some(Decimal::new(-100, 2)),
            status: Some("IN_STOCK".to_owned()),
            quantity_on_hand: Some(-1),
        };

        let err = request.validate().unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(
            fields.get("price").unwrap(),
            "must be greater than or equal to 0"
        );
        assert_eq!(
            fields.get("quantityOnHand").unwrap(),
            "must be greater than or equal to 0"
        );
    }

    #[test]
    fn test_create_rejects_unknown_status() {
        let request = CreateProductRequest {
            name: Some("Whole chicken".to_owned()),
            description: Some("Free range".to_owned()),
            price: Some(Decimal::new(12000, 2)),
            status: Some("SOLD_OUT".to_owned()),
            quantity_on_hand: Some(5),
        };

        let err = request.validate().unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };

        assert_eq!(
            fields.get("status").unwrap(),
            "must be one of IN_STOCK, OUT_OF_STOCK"
        );
    }

    #[test]
    fn test_update_allows_everything_absent() {
        let request = UpdateProductRequest {
            name: None,
            description: None,
            price: None,
            status: None,
            quantity_on_hand: None,
        };

        let changes = request.validate().unwrap();
        assert!(changes.name.is_none());
        assert!(changes.price.is_none());
    }

    #[test]
    fn test_update_rejects_blank_present_name() {
        let request = UpdateProductRequest {
            name: Some("  ".to_owned()),
            description: None,
            price: None,
            status: None,
            quantity_on_hand: None,
        };

        let err = request.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
