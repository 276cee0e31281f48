// src/models/cooperative.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cooperative {
    pub id: Uuid,
    #[schema(example = "Cooperativa Agrícola de Nhamatanda")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "Nhamatanda, Sofala")]
    pub location: Option<String>,
    pub leader_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CooperativeSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub cooperative: Cooperative,
    pub leader_name: String,
    pub leader_phone: Option<String>,
    pub member_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CooperativeMember {
    pub id: Uuid,
    pub cooperative_id: Uuid,
    pub farmer_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

// Membro com os dados do agricultor (detalhe da cooperativa)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct MemberProfile {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub farm_area: Option<Decimal>,
    pub production_type: Option<String>,
    pub full_name: String,
    pub phone: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CooperativeDetail {
    #[serde(flatten)]
    pub summary: CooperativeSummary,
    pub members: Vec<MemberProfile>,
}

// Participação do agricultor com os dados da cooperativa
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Membership {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub member: CooperativeMember,
    pub cooperative_name: String,
    pub cooperative_description: Option<String>,
    pub cooperative_location: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCooperativePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome da cooperativa é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
}
