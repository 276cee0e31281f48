// src/db/supplier_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        pest::SupplierRecommendation,
        supplier::{
            CreateSupplierProductPayload, SupplierProduct, SupplierProductFilter,
            SupplierProductListing, UpdateSupplierProductPayload,
        },
    },
};

const SUPPLIER_PRODUCT_COLUMNS: &str = r#"
    sp.id, sp.supplier_id, sp.name, sp.category, sp.description, sp.price, sp.stock_quantity,
    sp.unit, sp.photo_url, sp.is_available, sp.created_at, sp.updated_at
"#;

const SUPPLIER_JOIN: &str = r#"
    s.company_name, s.business_type, s.description AS supplier_description,
    u.email AS supplier_email, u.phone AS supplier_phone, u.address AS supplier_address,
    u.city AS supplier_city, u.province AS supplier_province
FROM supplier_products sp
JOIN suppliers s ON s.id = sp.supplier_id
JOIN users u ON u.id = s.user_id
"#;

#[derive(Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        supplier_id: Uuid,
        payload: &CreateSupplierProductPayload,
    ) -> Result<SupplierProduct, AppError> {
        let sql = format!(
            r#"
            INSERT INTO supplier_products AS sp (
                supplier_id, name, category, description, price, stock_quantity, unit, photo_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {SUPPLIER_PRODUCT_COLUMNS}
            "#
        );
        let product = sqlx::query_as::<_, SupplierProduct>(&sql)
            .bind(supplier_id)
            .bind(&payload.name)
            .bind(&payload.category)
            .bind(&payload.description)
            .bind(payload.price)
            .bind(payload.stock_quantity)
            .bind(&payload.unit)
            .bind(&payload.photo_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }

    /// Catálogo público: só insumos disponíveis, mais recentes primeiro.
    pub async fn list(&self, filter: &SupplierProductFilter) -> Result<Vec<SupplierProductListing>, AppError> {
        let sql = format!(
            r#"
            SELECT {SUPPLIER_PRODUCT_COLUMNS}, {SUPPLIER_JOIN}
            WHERE sp.is_available = TRUE
              AND ($1::text IS NULL OR sp.category = $1)
              AND ($2::text IS NULL OR sp.name ILIKE '%' || $2 || '%')
            ORDER BY sp.created_at DESC
            "#
        );
        let products = sqlx::query_as::<_, SupplierProductListing>(&sql)
            .bind(&filter.category)
            .bind(&filter.search)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn find_listing(&self, id: Uuid) -> Result<Option<SupplierProductListing>, AppError> {
        let sql = format!("SELECT {SUPPLIER_PRODUCT_COLUMNS}, {SUPPLIER_JOIN} WHERE sp.id = $1");
        let product = sqlx::query_as::<_, SupplierProductListing>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list_by_supplier(&self, supplier_id: Uuid) -> Result<Vec<SupplierProduct>, AppError> {
        let sql = format!(
            "SELECT {SUPPLIER_PRODUCT_COLUMNS} FROM supplier_products sp WHERE sp.supplier_id = $1 ORDER BY sp.created_at DESC"
        );
        let products = sqlx::query_as::<_, SupplierProduct>(&sql)
            .bind(supplier_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    /// Atualização parcial restrita ao fornecedor dono do insumo.
    pub async fn update(
        &self,
        id: Uuid,
        supplier_id: Uuid,
        payload: &UpdateSupplierProductPayload,
    ) -> Result<Option<SupplierProduct>, AppError> {
        let sql = format!(
            r#"
            UPDATE supplier_products AS sp SET
                name           = COALESCE($3, sp.name),
                category       = COALESCE($4, sp.category),
                description    = COALESCE($5, sp.description),
                price          = COALESCE($6, sp.price),
                stock_quantity = COALESCE($7, sp.stock_quantity),
                unit           = COALESCE($8, sp.unit),
                photo_url      = COALESCE($9, sp.photo_url),
                is_available   = COALESCE($10, sp.is_available),
                updated_at     = NOW()
            WHERE sp.id = $1 AND sp.supplier_id = $2
            RETURNING {SUPPLIER_PRODUCT_COLUMNS}
            "#
        );
        let product = sqlx::query_as::<_, SupplierProduct>(&sql)
            .bind(id)
            .bind(supplier_id)
            .bind(&payload.name)
            .bind(&payload.category)
            .bind(&payload.description)
            .bind(payload.price)
            .bind(payload.stock_quantity)
            .bind(&payload.unit)
            .bind(&payload.photo_url)
            .bind(payload.is_available)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    /// Um insumo disponível cujo nome contém o termo, para acompanhar o diagnóstico de praga.
    pub async fn find_recommendation(&self, term: &str) -> Result<Option<SupplierRecommendation>, AppError> {
        let recommendation = sqlx::query_as::<_, SupplierRecommendation>(
            r#"
            SELECT sp.id, sp.name, sp.supplier_id, s.company_name
            FROM supplier_products sp
            JOIN suppliers s ON s.id = sp.supplier_id
            WHERE sp.is_available = TRUE AND sp.name ILIKE '%' || $1 || '%'
            ORDER BY sp.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(term)
        .fetch_optional(&self.pool)
        .await?;
        Ok(recommendation)
    }
}
