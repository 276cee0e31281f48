// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::product::{
        CreateProductPayload, Product, ProductFilter, ProductListing, ProductStatus, StockOutcome,
        UpdateProductPayload,
    },
};

const PRODUCT_COLUMNS: &str = r#"
    p.id, p.farmer_id, p.name, p.description, p.category, p.price, p.quantity, p.unit,
    p.harvest_date, p.photo_url, p.status, p.created_at, p.updated_at
"#;

// Dados públicos do vendedor juntados a cada produto
const SELLER_JOIN: &str = r#"
    f.user_id AS farmer_user_id, f.farm_area, f.production_type,
    u.full_name AS seller_name, u.city AS seller_city,
    u.province AS seller_province, u.phone AS seller_phone
FROM products p
JOIN farmers f ON f.id = p.farmer_id
JOIN users u ON u.id = f.user_id
"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, farmer_id: Uuid, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let sql = format!(
            r#"
            INSERT INTO products AS p (
                farmer_id, name, description, category, price, quantity, unit, harvest_date, photo_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'kg'), $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(farmer_id)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(&payload.category)
            .bind(payload.price)
            .bind(payload.quantity)
            .bind(&payload.unit)
            .bind(payload.harvest_date)
            .bind(&payload.photo_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }

    /// Listagem pública, mais recentes primeiro. Sem status no filtro, só os disponíveis.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>, AppError> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}, {SELLER_JOIN}
            WHERE p.status = $1
              AND ($2::text IS NULL OR p.category = $2)
              AND ($3::text IS NULL OR u.province = $3)
              AND ($4::text IS NULL OR p.name ILIKE '%' || $4 || '%')
            ORDER BY p.created_at DESC
            "#
        );
        let products = sqlx::query_as::<_, ProductListing>(&sql)
            .bind(filter.status.unwrap_or(ProductStatus::Disponivel))
            .bind(&filter.category)
            .bind(&filter.province)
            .bind(&filter.search)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_listing(&self, id: Uuid) -> Result<Option<ProductListing>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS}, {SELLER_JOIN} WHERE p.id = $1");
        let product = sqlx::query_as::<_, ProductListing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list_by_farmer(&self, farmer_id: Uuid) -> Result<Vec<Product>, AppError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.farmer_id = $1 ORDER BY p.created_at DESC"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(farmer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Atualização parcial restrita ao dono. `None` quando o produto não é dele (ou não existe).
    pub async fn update(
        &self,
        id: Uuid,
        farmer_id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError> {
        let sql = format!(
            r#"
            UPDATE products AS p SET
                name         = COALESCE($3, p.name),
                description  = COALESCE($4, p.description),
                category     = COALESCE($5, p.category),
                price        = COALESCE($6, p.price),
                quantity     = COALESCE($7, p.quantity),
                unit         = COALESCE($8, p.unit),
                harvest_date = COALESCE($9, p.harvest_date),
                photo_url    = COALESCE($10, p.photo_url),
                status       = COALESCE($11, p.status),
                updated_at   = NOW()
            WHERE p.id = $1 AND p.farmer_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(farmer_id)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(&payload.category)
            .bind(payload.price)
            .bind(payload.quantity)
            .bind(&payload.unit)
            .bind(payload.harvest_date)
            .bind(&payload.photo_url)
            .bind(payload.status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn delete(&self, id: Uuid, farmer_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND farmer_id = $2")
            .bind(id)
            .bind(farmer_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    // --- Baixa de estoque (sempre dentro da transação do pedido) ---

    /// Trava a linha do produto até o fim da transação.
    pub async fn lock_for_sale<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1 FOR UPDATE");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn apply_sale<'e, E>(&self, executor: E, id: Uuid, outcome: StockOutcome) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE products SET quantity = $2, status = $3, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(outcome.remaining)
            .bind(outcome.status)
            .execute(executor)
            .await?;
        Ok(())
    }
}
