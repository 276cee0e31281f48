// src/db/admin_repo.rs
//
// Leituras do painel administrativo. As agregações são feitas em Rust
// (`DashboardStats::compute`), aqui só se buscam as colunas necessárias.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        admin::{OrderSnapshot, TransactionEntry},
        auth::Role,
        delivery::DeliveryStatus,
        product::ProductStatus,
    },
};

/// Limite da listagem de transações.
pub const TRANSACTIONS_LIMIT: i64 = 100;

#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn active_user_roles(&self) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_scalar::<_, Role>("SELECT user_type FROM users WHERE is_active = TRUE")
            .fetch_all(&self.pool)
            .await?;
        Ok(roles)
    }

    pub async fn product_statuses(&self) -> Result<Vec<ProductStatus>, AppError> {
        let statuses = sqlx::query_scalar::<_, ProductStatus>("SELECT status FROM products")
            .fetch_all(&self.pool)
            .await?;
        Ok(statuses)
    }

    pub async fn order_snapshots(&self) -> Result<Vec<OrderSnapshot>, AppError> {
        let orders = sqlx::query_as::<_, OrderSnapshot>(
            "SELECT id, total_amount, order_status, created_at FROM orders",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn delivery_statuses(&self) -> Result<Vec<DeliveryStatus>, AppError> {
        let statuses = sqlx::query_scalar::<_, DeliveryStatus>("SELECT status FROM deliveries")
            .fetch_all(&self.pool)
            .await?;
        Ok(statuses)
    }

    /// Totais dos pedidos criados em `[start, end)`.
    pub async fn order_totals_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Decimal>, AppError> {
        let totals = sqlx::query_scalar::<_, Decimal>(
            "SELECT total_amount FROM orders WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(totals)
    }

    pub async fn new_users_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE created_at >= $1 AND created_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn latest_transactions(&self) -> Result<Vec<TransactionEntry>, AppError> {
        let transactions = sqlx::query_as::<_, TransactionEntry>(
            r#"
            SELECT t.id, t.user_id, t.order_id, t.amount, t.transaction_type, t.status, t.created_at,
                   u.full_name, u.email, u.user_type
            FROM transactions t
            JOIN users u ON u.id = t.user_id
            ORDER BY t.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(TRANSACTIONS_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(transactions)
    }
}
