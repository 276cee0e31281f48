// src/db/delivery_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::delivery::{
        CreateDeliveryPayload, Delivery, DeliveryListing, DeliveryStatus, DeliveryTracking,
    },
};

const DELIVERY_COLUMNS: &str = r#"
    d.id, d.order_id, d.transporter_id, d.origin_address, d.destination_address,
    d.origin_lat, d.origin_lng, d.destination_lat, d.destination_lng, d.delivery_fee,
    d.status, d.estimated_delivery, d.actual_delivery, d.created_at, d.updated_at
"#;

// Resumo do pedido e do comprador para o transportador
const ORDER_JOIN: &str = r#"
    o.total_amount AS order_total, o.delivery_address AS order_delivery_address,
    u.full_name AS buyer_name, u.phone AS buyer_phone
FROM deliveries d
JOIN orders o ON o.id = d.order_id
JOIN users u ON u.id = o.buyer_id
"#;

#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

impl DeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateDeliveryPayload) -> Result<Delivery, AppError> {
        let sql = format!(
            r#"
            INSERT INTO deliveries AS d (
                order_id, origin_address, destination_address,
                origin_lat, origin_lng, destination_lat, destination_lng, delivery_fee
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {DELIVERY_COLUMNS}
            "#
        );
        let delivery = sqlx::query_as::<_, Delivery>(&sql)
            .bind(payload.order_id)
            .bind(&payload.origin_address)
            .bind(&payload.destination_address)
            .bind(payload.origin_lat)
            .bind(payload.origin_lng)
            .bind(payload.destination_lat)
            .bind(payload.destination_lng)
            .bind(payload.delivery_fee)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::Conflict("Este pedido já possui uma entrega".into());
                    }
                }
                e.into()
            })?;
        Ok(delivery)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Delivery>, AppError> {
        let sql = format!("SELECT {DELIVERY_COLUMNS} FROM deliveries d WHERE d.id = $1");
        let delivery = sqlx::query_as::<_, Delivery>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(delivery)
    }

    pub async fn find_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Delivery>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {DELIVERY_COLUMNS} FROM deliveries d WHERE d.id = $1 FOR UPDATE");
        let delivery = sqlx::query_as::<_, Delivery>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(delivery)
    }

    /// Entregas pendentes que ninguém aceitou ainda, mais recentes primeiro.
    pub async fn list_available(&self) -> Result<Vec<DeliveryListing>, AppError> {
        let sql = format!(
            r#"
            SELECT {DELIVERY_COLUMNS}, {ORDER_JOIN}
            WHERE d.status = 'pendente' AND d.transporter_id IS NULL
            ORDER BY d.created_at DESC
            "#
        );
        let deliveries = sqlx::query_as::<_, DeliveryListing>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(deliveries)
    }

    pub async fn list_by_transporter(&self, transporter_id: Uuid) -> Result<Vec<DeliveryListing>, AppError> {
        let sql = format!(
            r#"
            SELECT {DELIVERY_COLUMNS}, {ORDER_JOIN}
            WHERE d.transporter_id = $1
            ORDER BY d.created_at DESC
            "#
        );
        let deliveries = sqlx::query_as::<_, DeliveryListing>(&sql)
            .bind(transporter_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(deliveries)
    }

    /// Aceite condicional: só pega a entrega se ainda estiver livre.
    /// `None` significa que outro transportador chegou antes (ou a entrega não existe).
    pub async fn accept<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        transporter_id: Uuid,
        estimated_delivery: DateTime<Utc>,
    ) -> Result<Option<Delivery>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE deliveries AS d SET
                transporter_id = $2,
                status = 'aceito',
                estimated_delivery = $3,
                updated_at = NOW()
            WHERE d.id = $1 AND d.transporter_id IS NULL AND d.status = 'pendente'
            RETURNING {DELIVERY_COLUMNS}
            "#
        );
        let delivery = sqlx::query_as::<_, Delivery>(&sql)
            .bind(id)
            .bind(transporter_id)
            .bind(estimated_delivery)
            .fetch_optional(executor)
            .await?;
        Ok(delivery)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: DeliveryStatus,
        actual_delivery: Option<DateTime<Utc>>,
    ) -> Result<Delivery, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE deliveries AS d SET
                status = $2,
                actual_delivery = COALESCE($3, d.actual_delivery),
                updated_at = NOW()
            WHERE d.id = $1
            RETURNING {DELIVERY_COLUMNS}
            "#
        );
        let delivery = sqlx::query_as::<_, Delivery>(&sql)
            .bind(id)
            .bind(status)
            .bind(actual_delivery)
            .fetch_one(executor)
            .await?;
        Ok(delivery)
    }

    pub async fn set_transporter_available<'e, E>(
        &self,
        executor: E,
        transporter_id: Uuid,
        is_available: bool,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE transporters SET is_available = $2 WHERE id = $1")
            .bind(transporter_id)
            .bind(is_available)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Rastreamento público pelo pedido, com os dados do transportador (se já houver).
    pub async fn track_by_order(&self, order_id: Uuid) -> Result<Option<DeliveryTracking>, AppError> {
        let sql = format!(
            r#"
            SELECT {DELIVERY_COLUMNS},
                   t.vehicle_type, t.vehicle_plate,
                   u.full_name AS transporter_name, u.phone AS transporter_phone
            FROM deliveries d
            LEFT JOIN transporters t ON t.id = d.transporter_id
            LEFT JOIN users u ON u.id = t.user_id
            WHERE d.order_id = $1
            "#
        );
        let tracking = sqlx::query_as::<_, DeliveryTracking>(&sql)
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(tracking)
    }
}
