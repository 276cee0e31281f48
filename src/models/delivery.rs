// src/models/delivery.rs

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::order::OrderStatus;

/// Prazo estimado contado a partir do aceite.
pub const ESTIMATED_DELIVERY_HOURS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "delivery_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Pendente,
    Aceito,
    EmTransito,
    Entregue,
}

impl DeliveryStatus {
    /// Transições que o transportador pode pedir via atualização de status.
    /// `Pendente -> Aceito` só acontece pelo aceite.
    pub fn can_transition_to(self, next: DeliveryStatus) -> bool {
        matches!(
            (self, next),
            (DeliveryStatus::Aceito, DeliveryStatus::EmTransito)
                | (DeliveryStatus::Aceito, DeliveryStatus::Entregue)
                | (DeliveryStatus::EmTransito, DeliveryStatus::Entregue)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == DeliveryStatus::Entregue
    }
}

/// Efeitos colaterais de uma mudança de status sobre o pedido e o transportador.
/// `None` deixa o valor atual como está.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEffects {
    pub order_status: Option<OrderStatus>,
    pub transporter_available: Option<bool>,
}

impl CompletionEffects {
    pub fn after(next: DeliveryStatus) -> Self {
        if next.is_terminal() {
            Self {
                order_status: Some(OrderStatus::Entregue),
                transporter_available: Some(true),
            }
        } else {
            Self {
                order_status: None,
                transporter_available: None,
            }
        }
    }
}

pub fn estimated_delivery_from(accepted_at: DateTime<Utc>) -> DateTime<Utc> {
    accepted_at + Duration::hours(ESTIMATED_DELIVERY_HOURS)
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Delivery {
    pub id: Uuid,
    pub order_id: Uuid,
    pub transporter_id: Option<Uuid>,
    #[schema(example = "Mercado do Goto, Beira")]
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    #[schema(example = "150.00")]
    pub delivery_fee: Option<Decimal>,
    pub status: DeliveryStatus,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub actual_delivery: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Entrega com o resumo do pedido (listagens do transportador)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DeliveryListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub delivery: Delivery,
    pub order_total: Decimal,
    pub order_delivery_address: Option<String>,
    pub buyer_name: String,
    pub buyer_phone: Option<String>,
}

// Entrega com os dados do transportador (rastreamento)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct DeliveryTracking {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub delivery: Delivery,
    pub vehicle_type: Option<String>,
    pub vehicle_plate: Option<String>,
    pub transporter_name: Option<String>,
    pub transporter_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDeliveryPayload {
    pub order_id: Uuid,
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
    pub origin_lat: Option<f64>,
    pub origin_lng: Option<f64>,
    pub destination_lat: Option<f64>,
    pub destination_lng: Option<f64>,
    pub delivery_fee: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateDeliveryStatusPayload {
    pub status: DeliveryStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_only_moves_forward() {
        use DeliveryStatus::*;
        assert!(Aceito.can_transition_to(EmTransito));
        assert!(EmTransito.can_transition_to(Entregue));
        assert!(Aceito.can_transition_to(Entregue));

        assert!(!Pendente.can_transition_to(Aceito));
        assert!(!Pendente.can_transition_to(Entregue));
        assert!(!Entregue.can_transition_to(EmTransito));
        assert!(!EmTransito.can_transition_to(Aceito));
    }

    #[test]
    fn only_delivered_is_terminal() {
        assert!(DeliveryStatus::Entregue.is_terminal());
        assert!(!DeliveryStatus::EmTransito.is_terminal());
    }

    #[test]
    fn completion_delivers_the_order_and_frees_the_transporter() {
        let effects = CompletionEffects::after(DeliveryStatus::Entregue);
        assert_eq!(effects.order_status, Some(OrderStatus::Entregue));
        assert_eq!(effects.transporter_available, Some(true));
    }

    #[test]
    fn in_transit_changes_nothing_else() {
        let effects = CompletionEffects::after(DeliveryStatus::EmTransito);
        assert_eq!(effects.order_status, None);
        assert_eq!(effects.transporter_available, None);
    }

    #[test]
    fn estimate_is_two_hours_after_acceptance() {
        let accepted = Utc::now();
        assert_eq!(estimated_delivery_from(accepted) - accepted, Duration::hours(2));
    }
}
