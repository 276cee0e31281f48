// src/db/pest_repo.rs

use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::pest::{PestDiagnostic, PestDiagnosticHistoryEntry, PestMatch},
};

const DIAGNOSTIC_COLUMNS: &str = r#"
    d.id, d.farmer_id, d.image_url, d.description, d.pest_type, d.severity,
    d.recommended_product, d.recommended_supplier_id, d.diagnosis_result, d.created_at
"#;

#[derive(Clone)]
pub struct PestRepository {
    pool: PgPool,
}

impl PestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Guarda uma cópia do resultado; mudanças futuras no catálogo não alteram o histórico.
    pub async fn insert(
        &self,
        farmer_id: Uuid,
        image_url: &str,
        description: Option<&str>,
        result: &PestMatch,
        supplier_id: Option<Uuid>,
    ) -> Result<PestDiagnostic, AppError> {
        let sql = format!(
            r#"
            INSERT INTO pest_diagnostics AS d (
                farmer_id, image_url, description, pest_type, severity,
                recommended_product, recommended_supplier_id, diagnosis_result
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {DIAGNOSTIC_COLUMNS}
            "#
        );
        let diagnostic = sqlx::query_as::<_, PestDiagnostic>(&sql)
            .bind(farmer_id)
            .bind(image_url)
            .bind(description)
            .bind(&result.name)
            .bind(&result.severity)
            .bind(&result.recommended_product)
            .bind(supplier_id)
            .bind(Json(result))
            .fetch_one(&self.pool)
            .await?;
        Ok(diagnostic)
    }

    pub async fn history(&self, farmer_id: Uuid) -> Result<Vec<PestDiagnosticHistoryEntry>, AppError> {
        let sql = format!(
            r#"
            SELECT {DIAGNOSTIC_COLUMNS},
                   s.company_name AS supplier_company_name, u.phone AS supplier_phone
            FROM pest_diagnostics d
            LEFT JOIN suppliers s ON s.id = d.recommended_supplier_id
            LEFT JOIN users u ON u.id = s.user_id
            WHERE d.farmer_id = $1
            ORDER BY d.created_at DESC
            "#
        );
        let entries = sqlx::query_as::<_, PestDiagnosticHistoryEntry>(&sql)
            .bind(farmer_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}
