// src/services/pest_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PestRepository, SupplierRepository},
    models::pest::{DiagnosePayload, DiagnosisOutcome, PestDiagnosticHistoryEntry, PestSignature},
    services::pest_matcher::{self, PEST_CATALOG},
};

#[derive(Clone)]
pub struct PestService {
    pest_repo: PestRepository,
    supplier_repo: SupplierRepository,
}

impl PestService {
    pub fn new(pest_repo: PestRepository, supplier_repo: SupplierRepository) -> Self {
        Self { pest_repo, supplier_repo }
    }

    pub async fn diagnose(&self, farmer_id: Uuid, payload: &DiagnosePayload) -> Result<DiagnosisOutcome, AppError> {
        let description = payload.description.as_deref().filter(|d| !d.trim().is_empty());
        let result = pest_matcher::diagnose(description);

        let supplier_info = match pest_matcher::recommendation_term(&result) {
            Some(term) => self.supplier_repo.find_recommendation(term).await?,
            None => None,
        };

        let diagnostic = self
            .pest_repo
            .insert(
                farmer_id,
                &payload.image_url,
                description,
                &result,
                supplier_info.as_ref().map(|s| s.supplier_id),
            )
            .await?;

        tracing::info!(
            "🐛 Diagnóstico {} para o agricultor {}: {}",
            diagnostic.id,
            farmer_id,
            result.name
        );

        Ok(DiagnosisOutcome { diagnostic, supplier_info })
    }

    pub async fn history(&self, farmer_id: Uuid) -> Result<Vec<PestDiagnosticHistoryEntry>, AppError> {
        self.pest_repo.history(farmer_id).await
    }

    pub fn common_pests(&self) -> &'static [PestSignature] {
        PEST_CATALOG
    }
}
