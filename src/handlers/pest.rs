// src/handlers/pest.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{
    common::{error::AppError, validated_json::ValidatedJson},
    config::AppState,
    middleware::rbac::CurrentFarmer,
    models::pest::{DiagnosePayload, DiagnosisOutcome, PestDiagnosticHistoryEntry},
};

// POST /api/pest/diagnose
#[utoipa::path(
    post,
    path = "/api/pest/diagnose",
    tag = "Pest",
    request_body = DiagnosePayload,
    responses(
        (status = 201, description = "Diagnóstico realizado: { message, diagnostic }", body = DiagnosisOutcome),
        (status = 400, description = "Imagem é obrigatória"),
        (status = 404, description = "Agricultor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn diagnose(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
    ValidatedJson(payload): ValidatedJson<DiagnosePayload>,
) -> Result<impl IntoResponse, AppError> {
    let diagnostic = app_state.pest_service.diagnose(farmer.farmer_id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Diagnóstico realizado", "diagnostic": diagnostic })),
    ))
}

// GET /api/pest/history
#[utoipa::path(
    get,
    path = "/api/pest/history",
    tag = "Pest",
    responses(
        (status = 200, description = "Diagnósticos do agricultor: { diagnostics }", body = [PestDiagnosticHistoryEntry])
    ),
    security(("api_jwt" = []))
)]
pub async fn history(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    let diagnostics = app_state.pest_service.history(farmer.farmer_id).await?;
    Ok(Json(json!({ "diagnostics": diagnostics })))
}

// GET /api/pest/common-pests
#[utoipa::path(
    get,
    path = "/api/pest/common-pests",
    tag = "Pest",
    responses(
        (status = 200, description = "Catálogo de pragas conhecidas: { pests }")
    )
)]
pub async fn common_pests(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "pests": app_state.pest_service.common_pests() }))
}
