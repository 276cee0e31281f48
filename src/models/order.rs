// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::delivery::DeliveryTracking;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pendente,
    Confirmado,
    EmTransito,
    Entregue,
    Cancelado,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pendente,
    Pago,
    Reembolsado,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub buyer_id: Uuid,
    #[schema(example = "25.00")]
    pub total_amount: Decimal,
    #[schema(example = "mpesa")]
    pub payment_method: Option<String>,
    pub delivery_address: Option<String>,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    #[schema(example = "2")]
    pub quantity: Decimal,
    #[schema(example = "10.00")]
    pub unit_price: Decimal,
    #[schema(example = "20.00")]
    pub subtotal: Decimal,
    pub created_at: DateTime<Utc>,
}

// Pedido com os dados do comprador (listagens e detalhe)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OrderRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub buyer_name: String,
    pub buyer_phone: Option<String>,
    pub buyer_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct OrderItemDetail {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub product_name: String,
    pub photo_url: Option<String>,
    pub seller_name: Option<String>,
    pub seller_phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub header: OrderRow,
    pub items: Vec<OrderItemDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryTracking>,
}

/// Quais pedidos o usuário autenticado pode ver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    Buyer(Uuid),
    Farmer(Uuid),
    Transporter(Uuid),
    All,
}

// ---
// Payloads
// ---

pub(crate) fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("A quantidade deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderItemInput {
    pub product_id: Uuid,

    #[validate(custom(function = "validate_positive"))]
    #[schema(example = "2")]
    pub quantity: Decimal,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "10.00")]
    pub unit_price: Decimal,
}

impl OrderItemInput {
    pub fn subtotal(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

/// Soma dos subtotais, calculada uma única vez na criação do pedido.
pub fn order_total(items: &[OrderItemInput]) -> Decimal {
    items.iter().map(OrderItemInput::subtotal).sum()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Carrinho vazio"), nested)]
    pub items: Vec<OrderItemInput>,

    #[schema(example = "mpesa")]
    pub payment_method: Option<String>,

    #[schema(example = "Bairro Munhava, Beira")]
    pub delivery_address: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderStatusPayload {
    pub payment_status: Option<PaymentStatus>,
    pub order_status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, unit_price: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: Uuid::new_v4(),
            quantity: Decimal::from(quantity),
            unit_price: Decimal::from(unit_price),
        }
    }

    #[test]
    fn total_is_the_sum_of_item_subtotals() {
        let items = vec![item(2, 10), item(1, 5)];
        assert_eq!(items[0].subtotal(), Decimal::from(20));
        assert_eq!(items[1].subtotal(), Decimal::from(5));
        assert_eq!(order_total(&items), Decimal::from(25));
    }

    #[test]
    fn empty_cart_is_rejected() {
        let payload: CreateOrderPayload = serde_json::from_str(r#"{"payment_method": "mpesa"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn zero_quantity_items_are_rejected() {
        let payload = CreateOrderPayload {
            items: vec![item(0, 10)],
            payment_method: None,
            delivery_address: None,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn order_status_uses_snake_case_on_the_wire() {
        assert_eq!(serde_json::to_string(&OrderStatus::EmTransito).unwrap(), "\"em_transito\"");
        let status: PaymentStatus = serde_json::from_str("\"pago\"").unwrap();
        assert_eq!(status, PaymentStatus::Pago);
    }
}
