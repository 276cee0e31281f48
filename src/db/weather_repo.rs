// src/db/weather_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::weather::{AlertFilter, CreateAlertPayload, WeatherAlert},
};

const ALERT_COLUMNS: &str = r#"
    id, region, province, alert_type, severity, description, start_date, end_date, is_active, created_at
"#;

#[derive(Clone)]
pub struct WeatherRepository {
    pool: PgPool,
}

impl WeatherRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apenas alertas ativos, mais recentes primeiro.
    pub async fn list_active(&self, filter: &AlertFilter) -> Result<Vec<WeatherAlert>, AppError> {
        let sql = format!(
            r#"
            SELECT {ALERT_COLUMNS} FROM weather_alerts
            WHERE is_active = TRUE AND ($1::text IS NULL OR province = $1)
            ORDER BY created_at DESC
            "#
        );
        let alerts = sqlx::query_as::<_, WeatherAlert>(&sql)
            .bind(&filter.province)
            .fetch_all(&self.pool)
            .await?;
        Ok(alerts)
    }

    pub async fn create(&self, payload: &CreateAlertPayload) -> Result<WeatherAlert, AppError> {
        let sql = format!(
            r#"
            INSERT INTO weather_alerts (region, province, alert_type, severity, description, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ALERT_COLUMNS}
            "#
        );
        let alert = sqlx::query_as::<_, WeatherAlert>(&sql)
            .bind(&payload.region)
            .bind(&payload.province)
            .bind(&payload.alert_type)
            .bind(&payload.severity)
            .bind(&payload.description)
            .bind(payload.start_date)
            .bind(payload.end_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(alert)
    }
}
