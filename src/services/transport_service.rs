// src/services/transport_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeliveryRepository, OrderRepository},
    models::delivery::{
        estimated_delivery_from, CompletionEffects, CreateDeliveryPayload, Delivery,
        DeliveryListing, DeliveryStatus, DeliveryTracking,
    },
};

/// Só o transportador atribuído move a entrega, e só para a frente.
pub fn check_status_change(
    delivery: &Delivery,
    transporter_id: Uuid,
    next: DeliveryStatus,
) -> Result<(), AppError> {
    if delivery.transporter_id != Some(transporter_id) {
        return Err(AppError::Forbidden);
    }
    if !delivery.status.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "Transição de status inválida: {:?} -> {:?}",
            delivery.status, next
        )));
    }
    Ok(())
}

#[derive(Clone)]
pub struct TransportService {
    delivery_repo: DeliveryRepository,
    order_repo: OrderRepository,
    pool: PgPool,
}

impl TransportService {
    pub fn new(delivery_repo: DeliveryRepository, order_repo: OrderRepository, pool: PgPool) -> Self {
        Self { delivery_repo, order_repo, pool }
    }

    pub async fn create_delivery(&self, payload: &CreateDeliveryPayload) -> Result<Delivery, AppError> {
        if !self.order_repo.exists(payload.order_id).await? {
            return Err(AppError::not_found("Pedido não encontrado"));
        }
        let delivery = self.delivery_repo.create(payload).await?;
        tracing::info!("🚚 Entrega {} aberta para o pedido {}", delivery.id, delivery.order_id);
        Ok(delivery)
    }

    pub async fn list_available(&self) -> Result<Vec<DeliveryListing>, AppError> {
        self.delivery_repo.list_available().await
    }

    pub async fn list_mine(&self, transporter_id: Uuid) -> Result<Vec<DeliveryListing>, AppError> {
        self.delivery_repo.list_by_transporter(transporter_id).await
    }

    pub async fn accept(&self, id: Uuid, transporter_id: Uuid) -> Result<Delivery, AppError> {
        let mut tx = self.pool.begin().await?;

        let estimated = estimated_delivery_from(Utc::now());
        let Some(delivery) = self
            .delivery_repo
            .accept(&mut *tx, id, transporter_id, estimated)
            .await?
        else {
            // Nada foi atualizado: ou a entrega não existe, ou alguém aceitou antes
            return match self.delivery_repo.find(id).await? {
                None => Err(AppError::not_found("Entrega não encontrada")),
                Some(_) => Err(AppError::DeliveryAlreadyTaken),
            };
        };

        self.delivery_repo
            .set_transporter_available(&mut *tx, transporter_id, false)
            .await?;

        tx.commit().await?;

        tracing::info!("🚚 Entrega {} aceita pelo transportador {}", id, transporter_id);
        Ok(delivery)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        transporter_id: Uuid,
        next: DeliveryStatus,
    ) -> Result<Delivery, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = self
            .delivery_repo
            .find_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Entrega não encontrada"))?;

        check_status_change(&current, transporter_id, next)?;

        let actual_delivery = next.is_terminal().then(Utc::now);
        let updated = self
            .delivery_repo
            .update_status(&mut *tx, id, next, actual_delivery)
            .await?;

        // Entrega concluída: transportador livre de novo e pedido entregue, tudo junto
        let effects = CompletionEffects::after(next);
        if let Some(available) = effects.transporter_available {
            self.delivery_repo
                .set_transporter_available(&mut *tx, transporter_id, available)
                .await?;
        }
        if let Some(order_status) = effects.order_status {
            self.order_repo
                .set_status(&mut *tx, updated.order_id, order_status)
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn track(&self, order_id: Uuid) -> Result<DeliveryTracking, AppError> {
        self.delivery_repo
            .track_by_order(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Entrega não encontrada"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivery(transporter_id: Option<Uuid>, status: DeliveryStatus) -> Delivery {
        Delivery {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            transporter_id,
            origin_address: None,
            destination_address: None,
            origin_lat: None,
            origin_lng: None,
            destination_lat: None,
            destination_lng: None,
            delivery_fee: None,
            status,
            estimated_delivery: None,
            actual_delivery: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn assigned_transporter_moves_delivery_forward() {
        let me = Uuid::new_v4();
        let d = delivery(Some(me), DeliveryStatus::Aceito);
        assert!(check_status_change(&d, me, DeliveryStatus::EmTransito).is_ok());
        assert!(check_status_change(&d, me, DeliveryStatus::Entregue).is_ok());
    }

    #[test]
    fn another_transporter_is_denied() {
        let d = delivery(Some(Uuid::new_v4()), DeliveryStatus::Aceito);
        let err = check_status_change(&d, Uuid::new_v4(), DeliveryStatus::EmTransito).unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[test]
    fn unassigned_delivery_cannot_be_updated() {
        let d = delivery(None, DeliveryStatus::Pendente);
        assert!(check_status_change(&d, Uuid::new_v4(), DeliveryStatus::EmTransito).is_err());
    }

    #[test]
    fn delivered_is_final() {
        let me = Uuid::new_v4();
        let d = delivery(Some(me), DeliveryStatus::Entregue);
        let err = check_status_change(&d, me, DeliveryStatus::EmTransito).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
