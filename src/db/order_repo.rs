// src/db/order_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::order::{
        Order, OrderItem, OrderItemDetail, OrderItemInput, OrderRow, OrderScope, OrderStatus,
        PaymentStatus,
    },
};

const ORDER_COLUMNS: &str = r#"
    o.id, o.buyer_id, o.total_amount, o.payment_method, o.delivery_address,
    o.order_status, o.payment_status, o.created_at, o.updated_at
"#;

const BUYER_JOIN: &str = r#"
    u.full_name AS buyer_name, u.phone AS buyer_phone, u.address AS buyer_address
FROM orders o
JOIN users u ON u.id = o.buyer_id
"#;

/// Cláusula WHERE que restringe os pedidos ao escopo do usuário.
/// `param` é o índice do placeholder usado para o id do escopo.
pub(crate) fn scope_clause(scope: OrderScope, param: usize) -> (String, Option<Uuid>) {
    match scope {
        OrderScope::Buyer(id) => (format!("o.buyer_id = ${param}"), Some(id)),
        OrderScope::Farmer(id) => (
            format!(
                "EXISTS (SELECT 1 FROM order_items oi JOIN products p ON p.id = oi.product_id \
                 WHERE oi.order_id = o.id AND p.farmer_id = ${param})"
            ),
            Some(id),
        ),
        OrderScope::Transporter(id) => (
            format!(
                "EXISTS (SELECT 1 FROM deliveries d WHERE d.order_id = o.id AND d.transporter_id = ${param})"
            ),
            Some(id),
        ),
        OrderScope::All => ("TRUE".to_string(), None),
    }
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_order<'e, E>(
        &self,
        executor: E,
        buyer_id: Uuid,
        total_amount: Decimal,
        payment_method: Option<&str>,
        delivery_address: Option<&str>,
    ) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO orders AS o (buyer_id, total_amount, payment_method, delivery_address)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(buyer_id)
            .bind(total_amount)
            .bind(payment_method)
            .bind(delivery_address)
            .fetch_one(executor)
            .await?;
        Ok(order)
    }

    pub async fn insert_item<'e, E>(&self, executor: E, order_id: Uuid, item: &OrderItemInput) -> Result<OrderItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order_item = sqlx::query_as::<_, OrderItem>(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, unit_price, subtotal)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, order_id, product_id, quantity, unit_price, subtotal, created_at
            "#,
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.subtotal())
        .fetch_one(executor)
        .await?;
        Ok(order_item)
    }

    pub async fn list(&self, scope: OrderScope) -> Result<Vec<OrderRow>, AppError> {
        let (clause, scope_id) = scope_clause(scope, 1);
        let sql = format!(
            "SELECT {ORDER_COLUMNS}, {BUYER_JOIN} WHERE {clause} ORDER BY o.created_at DESC"
        );

        let mut query = sqlx::query_as::<Postgres, OrderRow>(&sql);
        if let Some(id) = scope_id {
            query = query.bind(id);
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Pedido visível dentro do escopo; `None` se não existe ou não pertence ao escopo.
    pub async fn find_row(&self, id: Uuid, scope: OrderScope) -> Result<Option<OrderRow>, AppError> {
        let (clause, scope_id) = scope_clause(scope, 2);
        let sql = format!("SELECT {ORDER_COLUMNS}, {BUYER_JOIN} WHERE o.id = $1 AND {clause}");

        let mut query = sqlx::query_as::<Postgres, OrderRow>(&sql).bind(id);
        if let Some(scope_id) = scope_id {
            query = query.bind(scope_id);
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn items(&self, order_id: Uuid) -> Result<Vec<OrderItemDetail>, AppError> {
        let items = sqlx::query_as::<_, OrderItemDetail>(
            r#"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.unit_price, oi.subtotal,
                   p.name AS product_name, p.photo_url,
                   u.full_name AS seller_name, u.phone AS seller_phone
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            LEFT JOIN farmers f ON f.id = p.farmer_id
            LEFT JOIN users u ON u.id = f.user_id
            WHERE oi.order_id = $1
            ORDER BY oi.created_at
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        payment_status: Option<PaymentStatus>,
        order_status: Option<OrderStatus>,
    ) -> Result<Option<Order>, AppError> {
        let sql = format!(
            r#"
            UPDATE orders AS o SET
                payment_status = COALESCE($2, o.payment_status),
                order_status   = COALESCE($3, o.order_status),
                updated_at     = NOW()
            WHERE o.id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );
        let order = sqlx::query_as::<_, Order>(&sql)
            .bind(id)
            .bind(payment_status)
            .bind(order_status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    pub async fn set_status<'e, E>(&self, executor: E, id: Uuid, status: OrderStatus) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE orders SET order_status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_scope_binds_nothing() {
        let (clause, id) = scope_clause(OrderScope::All, 1);
        assert_eq!(clause, "TRUE");
        assert!(id.is_none());
    }

    #[test]
    fn buyer_scope_filters_on_the_given_placeholder() {
        let buyer = Uuid::new_v4();
        let (clause, id) = scope_clause(OrderScope::Buyer(buyer), 2);
        assert_eq!(clause, "o.buyer_id = $2");
        assert_eq!(id, Some(buyer));
    }

    #[test]
    fn farmer_and_transporter_scopes_use_subqueries() {
        let (farmer_clause, _) = scope_clause(OrderScope::Farmer(Uuid::new_v4()), 1);
        assert!(farmer_clause.contains("p.farmer_id = $1"));

        let (transporter_clause, _) = scope_clause(OrderScope::Transporter(Uuid::new_v4()), 3);
        assert!(transporter_clause.contains("d.transporter_id = $3"));
    }
}
