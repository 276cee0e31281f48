// src/db/cooperative_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cooperative::{
        Cooperative, CooperativeMember, CooperativeSummary, CreateCooperativePayload,
        MemberProfile, Membership,
    },
};

const COOPERATIVE_COLUMNS: &str = "c.id, c.name, c.description, c.location, c.leader_id, c.created_at";

// Líder e contagem de membros de cada cooperativa
const SUMMARY_SELECT: &str = r#"
    SELECT c.id, c.name, c.description, c.location, c.leader_id, c.created_at,
           u.full_name AS leader_name, u.phone AS leader_phone,
           (SELECT COUNT(*) FROM cooperative_members m WHERE m.cooperative_id = c.id) AS member_count
    FROM cooperatives c
    JOIN farmers f ON f.id = c.leader_id
    JOIN users u ON u.id = f.user_id
"#;

#[derive(Clone)]
pub struct CooperativeRepository {
    pool: PgPool,
}

impl CooperativeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        leader_id: Uuid,
        payload: &CreateCooperativePayload,
    ) -> Result<Cooperative, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO cooperatives AS c (name, description, location, leader_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {COOPERATIVE_COLUMNS}
            "#
        );
        let cooperative = sqlx::query_as::<_, Cooperative>(&sql)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(&payload.location)
            .bind(leader_id)
            .fetch_one(executor)
            .await?;
        Ok(cooperative)
    }

    /// Inscreve o agricultor. Repetição vira 400 e cooperativa inexistente vira 404.
    pub async fn add_member<'e, E>(
        &self,
        executor: E,
        cooperative_id: Uuid,
        farmer_id: Uuid,
    ) -> Result<CooperativeMember, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, CooperativeMember>(
            r#"
            INSERT INTO cooperative_members (cooperative_id, farmer_id)
            VALUES ($1, $2)
            RETURNING id, cooperative_id, farmer_id, joined_at
            "#,
        )
        .bind(cooperative_id)
        .bind(farmer_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::BadRequest("Já é membro desta cooperativa".into());
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::not_found("Cooperativa não encontrada");
                }
            }
            e.into()
        })
    }

    pub async fn list(&self) -> Result<Vec<CooperativeSummary>, AppError> {
        let sql = format!("{SUMMARY_SELECT} ORDER BY c.created_at DESC");
        let cooperatives = sqlx::query_as::<_, CooperativeSummary>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(cooperatives)
    }

    pub async fn find_summary(&self, id: Uuid) -> Result<Option<CooperativeSummary>, AppError> {
        let sql = format!("{SUMMARY_SELECT} WHERE c.id = $1");
        let cooperative = sqlx::query_as::<_, CooperativeSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cooperative)
    }

    pub async fn members(&self, cooperative_id: Uuid) -> Result<Vec<MemberProfile>, AppError> {
        let members = sqlx::query_as::<_, MemberProfile>(
            r#"
            SELECT m.id, m.farmer_id, m.joined_at, f.farm_area, f.production_type,
                   u.full_name, u.phone, u.city
            FROM cooperative_members m
            JOIN farmers f ON f.id = m.farmer_id
            JOIN users u ON u.id = f.user_id
            WHERE m.cooperative_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(cooperative_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    pub async fn remove_member(&self, cooperative_id: Uuid, farmer_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM cooperative_members WHERE cooperative_id = $1 AND farmer_id = $2")
            .bind(cooperative_id)
            .bind(farmer_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn memberships(&self, farmer_id: Uuid) -> Result<Vec<Membership>, AppError> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT m.id, m.cooperative_id, m.farmer_id, m.joined_at,
                   c.name AS cooperative_name, c.description AS cooperative_description,
                   c.location AS cooperative_location
            FROM cooperative_members m
            JOIN cooperatives c ON c.id = m.cooperative_id
            WHERE m.farmer_id = $1
            ORDER BY m.joined_at DESC
            "#,
        )
        .bind(farmer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(memberships)
    }
}
