// src/models/product.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::order::validate_not_negative;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Disponivel,
    Vendido,
    Inativo,
}

impl ProductStatus {
    /// Status do produto depois de uma baixa de estoque.
    pub fn after_sale(remaining: Decimal) -> Self {
        if remaining <= Decimal::ZERO {
            ProductStatus::Vendido
        } else {
            ProductStatus::Disponivel
        }
    }
}

// --- Produto agrícola (pertence a um agricultor) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub farmer_id: Uuid,
    #[schema(example = "Milho branco")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "cereais")]
    pub category: Option<String>,
    #[schema(example = "25.00")]
    pub price: Decimal,
    #[schema(example = "100")]
    pub quantity: Decimal,
    #[schema(example = "kg")]
    pub unit: String,
    pub harvest_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Produto com os dados públicos do vendedor (listagens)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProductListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub farmer_user_id: Uuid,
    pub farm_area: Option<Decimal>,
    pub production_type: Option<String>,
    pub seller_name: String,
    pub seller_city: Option<String>,
    pub seller_province: Option<String>,
    pub seller_phone: Option<String>,
}

/// Filtros aceitos pela listagem pública.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub province: Option<String>,
    pub search: Option<String>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    #[schema(example = "Milho branco")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "cereais")]
    pub category: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "25.00")]
    pub price: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "100")]
    pub quantity: Decimal,

    #[schema(example = "kg")]
    pub unit: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
}

/// Atualização parcial: campos ausentes mantêm o valor atual.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub harvest_date: Option<NaiveDate>,
    pub photo_url: Option<String>,
    pub status: Option<ProductStatus>,
}

/// Resultado da baixa de estoque de um produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockOutcome {
    pub remaining: Decimal,
    pub status: ProductStatus,
}

impl StockOutcome {
    /// `None` quando não há estoque suficiente para a quantidade pedida.
    pub fn for_sale(available: Decimal, requested: Decimal) -> Option<Self> {
        if requested > available {
            return None;
        }
        let remaining = available - requested;
        Some(Self {
            remaining,
            status: ProductStatus::after_sale(remaining),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn selling_the_whole_stock_marks_product_as_sold() {
        let outcome = StockOutcome::for_sale(dec(3), dec(3)).unwrap();
        assert_eq!(outcome.remaining, Decimal::ZERO);
        assert_eq!(outcome.status, ProductStatus::Vendido);
    }

    #[test]
    fn partial_sale_keeps_product_available() {
        let outcome = StockOutcome::for_sale(dec(3), dec(1)).unwrap();
        assert_eq!(outcome.remaining, dec(2));
        assert_eq!(outcome.status, ProductStatus::Disponivel);
    }

    #[test]
    fn overselling_is_refused() {
        assert!(StockOutcome::for_sale(dec(2), dec(5)).is_none());
    }

    #[test]
    fn negative_amounts_are_rejected_in_partial_updates() {
        let update = UpdateProductPayload {
            price: Some(dec(-1)),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        let price_errors = &errors.field_errors()["price"];
        assert_eq!(price_errors[0].message.as_deref(), Some("O valor não pode ser negativo."));

        assert!(UpdateProductPayload::default().validate().is_ok());
        let zero = UpdateProductPayload {
            quantity: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(zero.validate().is_ok());
    }

    #[test]
    fn status_names_match_the_database_enum() {
        assert_eq!(serde_json::to_string(&ProductStatus::Disponivel).unwrap(), "\"disponivel\"");
        assert_eq!(serde_json::to_string(&ProductStatus::Vendido).unwrap(), "\"vendido\"");
    }
}
