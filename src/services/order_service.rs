// src/services/order_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DeliveryRepository, OrderRepository, ProductRepository, UserRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        auth::Role,
        order::{
            order_total, CreateOrderPayload, Order, OrderDetail, OrderItemInput, OrderRow,
            OrderScope, UpdateOrderStatusPayload,
        },
        product::{Product, ProductStatus, StockOutcome},
    },
};

/// Confere uma linha do carrinho contra o produto travado no banco.
/// O preço guardado é o que vale; o carrinho só é aceito se bater com ele.
pub fn check_line(product: &Product, item: &OrderItemInput) -> Result<StockOutcome, AppError> {
    if product.status != ProductStatus::Disponivel {
        return Err(AppError::Conflict(format!("Produto indisponível: {}", product.name)));
    }
    if product.price != item.unit_price {
        return Err(AppError::PriceChanged);
    }
    StockOutcome::for_sale(product.quantity, item.quantity).ok_or(AppError::InsufficientStock)
}

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    product_repo: ProductRepository,
    delivery_repo: DeliveryRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        product_repo: ProductRepository,
        delivery_repo: DeliveryRepository,
        user_repo: UserRepository,
        pool: PgPool,
    ) -> Self {
        Self { order_repo, product_repo, delivery_repo, user_repo, pool }
    }

    /// Cria o pedido, os itens e dá baixa no estoque numa única transação.
    /// Qualquer item recusado desfaz o pedido inteiro.
    pub async fn place_order(&self, buyer_id: Uuid, payload: &CreateOrderPayload) -> Result<Order, AppError> {
        let total = order_total(&payload.items);

        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .insert_order(
                &mut *tx,
                buyer_id,
                total,
                payload.payment_method.as_deref(),
                payload.delivery_address.as_deref(),
            )
            .await?;

        for item in &payload.items {
            // FOR UPDATE: pedidos concorrentes pelo mesmo produto esperam aqui
            let product = self
                .product_repo
                .lock_for_sale(&mut *tx, item.product_id)
                .await?
                .ok_or_else(|| AppError::not_found("Produto não encontrado"))?;

            let outcome = check_line(&product, item)?;

            self.order_repo.insert_item(&mut *tx, order.id, item).await?;
            self.product_repo.apply_sale(&mut *tx, product.id, outcome).await?;
        }

        tx.commit().await?;

        tracing::info!(
            "🧾 Pedido {} criado pelo comprador {} ({} itens, total {})",
            order.id,
            buyer_id,
            payload.items.len(),
            total
        );
        Ok(order)
    }

    /// Traduz o perfil do usuário no conjunto de pedidos que ele pode ver.
    pub async fn scope_for(&self, user: &AuthenticatedUser) -> Result<OrderScope, AppError> {
        let scope = match user.role {
            Role::Admin => OrderScope::All,
            Role::Comprador => OrderScope::Buyer(user.id),
            Role::Agricultor => OrderScope::Farmer(self.profile_id(user).await?),
            Role::Transportador => OrderScope::Transporter(self.profile_id(user).await?),
            Role::Fornecedor => return Err(AppError::Forbidden),
        };
        Ok(scope)
    }

    async fn profile_id(&self, user: &AuthenticatedUser) -> Result<Uuid, AppError> {
        self.user_repo
            .find_profile_id(user.role, user.id)
            .await?
            .ok_or(AppError::ProfileNotFound(user.role))
    }

    pub async fn list(&self, scope: OrderScope) -> Result<Vec<OrderRow>, AppError> {
        self.order_repo.list(scope).await
    }

    pub async fn get(&self, id: Uuid, scope: OrderScope) -> Result<OrderDetail, AppError> {
        let header = self
            .order_repo
            .find_row(id, scope)
            .await?
            .ok_or_else(|| AppError::not_found("Pedido não encontrado"))?;

        let items = self.order_repo.items(id).await?;
        let delivery = self.delivery_repo.track_by_order(id).await?;

        Ok(OrderDetail { header, items, delivery })
    }

    /// Admin, o comprador dono ou um agricultor com itens no pedido.
    pub async fn update_status(
        &self,
        id: Uuid,
        scope: OrderScope,
        payload: &UpdateOrderStatusPayload,
    ) -> Result<Order, AppError> {
        if matches!(scope, OrderScope::Transporter(_)) {
            return Err(AppError::Forbidden);
        }
        if payload.payment_status.is_none() && payload.order_status.is_none() {
            return Err(AppError::BadRequest("Nenhum status informado".into()));
        }

        if self.order_repo.find_row(id, scope).await?.is_none() {
            return Err(AppError::not_found("Pedido não encontrado"));
        }

        self.order_repo
            .update_status(id, payload.payment_status, payload.order_status)
            .await?
            .ok_or_else(|| AppError::not_found("Pedido não encontrado"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(price: i64, quantity: i64, status: ProductStatus) -> Product {
        Product {
            id: Uuid::new_v4(),
            farmer_id: Uuid::new_v4(),
            name: "Milho".into(),
            description: None,
            category: None,
            price: Decimal::from(price),
            quantity: Decimal::from(quantity),
            unit: "kg".into(),
            harvest_date: None,
            photo_url: None,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(product: &Product, quantity: i64, unit_price: i64) -> OrderItemInput {
        OrderItemInput {
            product_id: product.id,
            quantity: Decimal::from(quantity),
            unit_price: Decimal::from(unit_price),
        }
    }

    #[test]
    fn buying_the_last_units_sells_out_the_product() {
        let milho = product(10, 3, ProductStatus::Disponivel);
        let outcome = check_line(&milho, &line(&milho, 3, 10)).unwrap();
        assert_eq!(outcome.remaining, Decimal::ZERO);
        assert_eq!(outcome.status, ProductStatus::Vendido);
    }

    #[test]
    fn stale_price_is_rejected() {
        let milho = product(12, 3, ProductStatus::Disponivel);
        assert!(matches!(check_line(&milho, &line(&milho, 1, 10)), Err(AppError::PriceChanged)));
    }

    #[test]
    fn stock_never_goes_negative() {
        let milho = product(10, 2, ProductStatus::Disponivel);
        assert!(matches!(check_line(&milho, &line(&milho, 5, 10)), Err(AppError::InsufficientStock)));
    }

    #[test]
    fn sold_out_products_cannot_be_ordered() {
        let milho = product(10, 0, ProductStatus::Vendido);
        assert!(matches!(check_line(&milho, &line(&milho, 1, 10)), Err(AppError::Conflict(_))));
    }
}
