// src/models/pest.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Entrada do catálogo fixo de pragas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PestSignature {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub severity: &'static str,
    pub recommended_product: &'static str,
    pub description: &'static str,
}

/// Resultado do diagnóstico, guardado como cópia (não referência ao catálogo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PestMatch {
    pub name: String,
    pub severity: String,
    pub recommended_product: String,
    pub description: String,
    /// Palavra-chave que decidiu o diagnóstico; ausente no resultado "não identificado".
    pub matched_keyword: Option<String>,
}

impl PestMatch {
    pub fn is_identified(&self) -> bool {
        self.matched_keyword.is_some()
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PestDiagnostic {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub image_url: String,
    pub description: Option<String>,
    pub pest_type: String,
    pub severity: String,
    pub recommended_product: String,
    pub recommended_supplier_id: Option<Uuid>,
    #[schema(value_type = PestMatch)]
    pub diagnosis_result: Json<PestMatch>,
    pub created_at: DateTime<Utc>,
}

// Histórico: diagnóstico com o fornecedor recomendado
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct PestDiagnosticHistoryEntry {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub diagnostic: PestDiagnostic,
    pub supplier_company_name: Option<String>,
    pub supplier_phone: Option<String>,
}

/// Produto de fornecedor sugerido para o tratamento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SupplierRecommendation {
    pub id: Uuid,
    pub name: String,
    pub supplier_id: Uuid,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiagnosisOutcome {
    #[serde(flatten)]
    pub diagnostic: PestDiagnostic,
    pub supplier_info: Option<SupplierRecommendation>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DiagnosePayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Imagem é obrigatória"))]
    #[schema(example = "https://exemplo.co.mz/fotos/milho.jpg")]
    pub image_url: String,

    #[schema(example = "folha com buraco de lagarta no milho")]
    pub description: Option<String>,
}
