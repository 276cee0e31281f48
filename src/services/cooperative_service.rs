// src/services/cooperative_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CooperativeRepository,
    models::cooperative::{
        Cooperative, CooperativeDetail, CooperativeMember, CooperativeSummary,
        CreateCooperativePayload, Membership,
    },
};

#[derive(Clone)]
pub struct CooperativeService {
    cooperative_repo: CooperativeRepository,
    pool: PgPool,
}

impl CooperativeService {
    pub fn new(cooperative_repo: CooperativeRepository, pool: PgPool) -> Self {
        Self { cooperative_repo, pool }
    }

    /// Cria a cooperativa e inscreve o criador como primeiro membro, na mesma transação.
    pub async fn create(&self, leader_id: Uuid, payload: &CreateCooperativePayload) -> Result<Cooperative, AppError> {
        let mut tx = self.pool.begin().await?;

        let cooperative = self.cooperative_repo.create(&mut *tx, leader_id, payload).await?;
        self.cooperative_repo
            .add_member(&mut *tx, cooperative.id, leader_id)
            .await?;

        tx.commit().await?;

        tracing::info!("🤝 Cooperativa '{}' criada pelo agricultor {}", cooperative.name, leader_id);
        Ok(cooperative)
    }

    pub async fn list(&self) -> Result<Vec<CooperativeSummary>, AppError> {
        self.cooperative_repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<CooperativeDetail, AppError> {
        let summary = self
            .cooperative_repo
            .find_summary(id)
            .await?
            .ok_or_else(|| AppError::not_found("Cooperativa não encontrada"))?;
        let members = self.cooperative_repo.members(id).await?;
        Ok(CooperativeDetail { summary, members })
    }

    pub async fn join(&self, cooperative_id: Uuid, farmer_id: Uuid) -> Result<CooperativeMember, AppError> {
        self.cooperative_repo
            .add_member(&self.pool, cooperative_id, farmer_id)
            .await
    }

    pub async fn leave(&self, cooperative_id: Uuid, farmer_id: Uuid) -> Result<(), AppError> {
        match self.cooperative_repo.remove_member(cooperative_id, farmer_id).await? {
            0 => Err(AppError::not_found("Vínculo com a cooperativa não encontrado")),
            _ => Ok(()),
        }
    }

    pub async fn memberships(&self, farmer_id: Uuid) -> Result<Vec<Membership>, AppError> {
        self.cooperative_repo.memberships(farmer_id).await
    }
}
