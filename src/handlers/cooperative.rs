// src/handlers/cooperative.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        extract::Path,
        validated_json::ValidatedJson,
    },
    config::AppState,
    middleware::rbac::CurrentFarmer,
    models::cooperative::{
        Cooperative, CooperativeDetail, CooperativeMember, CooperativeSummary,
        CreateCooperativePayload, Membership,
    },
};

// POST /api/cooperative
#[utoipa::path(
    post,
    path = "/api/cooperative",
    tag = "Cooperative",
    request_body = CreateCooperativePayload,
    responses(
        (status = 201, description = "Cooperativa criada: { message, cooperative }", body = Cooperative)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_cooperative(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
    ValidatedJson(payload): ValidatedJson<CreateCooperativePayload>,
) -> Result<impl IntoResponse, AppError> {
    let cooperative = app_state
        .cooperative_service
        .create(farmer.farmer_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Cooperativa criada", "cooperative": cooperative })),
    ))
}

// GET /api/cooperative
#[utoipa::path(
    get,
    path = "/api/cooperative",
    tag = "Cooperative",
    responses(
        (status = 200, description = "Cooperativas com líder e número de membros: { cooperatives }", body = [CooperativeSummary])
    )
)]
pub async fn list_cooperatives(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let cooperatives = app_state.cooperative_service.list().await?;
    Ok(Json(json!({ "cooperatives": cooperatives })))
}

// GET /api/cooperative/{id}
#[utoipa::path(
    get,
    path = "/api/cooperative/{id}",
    tag = "Cooperative",
    params(("id" = Uuid, Path, description = "ID da cooperativa")),
    responses(
        (status = 200, description = "Cooperativa com membros: { cooperative }", body = CooperativeDetail),
        (status = 404, description = "Cooperativa não encontrada")
    )
)]
pub async fn get_cooperative(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let cooperative = app_state.cooperative_service.get(id).await?;
    Ok(Json(json!({ "cooperative": cooperative })))
}

// POST /api/cooperative/{id}/join
#[utoipa::path(
    post,
    path = "/api/cooperative/{id}/join",
    tag = "Cooperative",
    params(("id" = Uuid, Path, description = "ID da cooperativa")),
    responses(
        (status = 201, description = "Entrou na cooperativa: { message, membership }", body = CooperativeMember),
        (status = 400, description = "Já é membro desta cooperativa"),
        (status = 404, description = "Cooperativa não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn join_cooperative(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let membership = app_state.cooperative_service.join(id, farmer.farmer_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Entrou na cooperativa", "membership": membership })),
    ))
}

// DELETE /api/cooperative/{id}/leave
#[utoipa::path(
    delete,
    path = "/api/cooperative/{id}/leave",
    tag = "Cooperative",
    params(("id" = Uuid, Path, description = "ID da cooperativa")),
    responses(
        (status = 200, description = "Saiu da cooperativa"),
        (status = 404, description = "O agricultor não é membro")
    ),
    security(("api_jwt" = []))
)]
pub async fn leave_cooperative(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.cooperative_service.leave(id, farmer.farmer_id).await?;
    Ok(Json(json!({ "message": "Saiu da cooperativa" })))
}

// GET /api/cooperative/my/memberships
#[utoipa::path(
    get,
    path = "/api/cooperative/my/memberships",
    tag = "Cooperative",
    responses(
        (status = 200, description = "Cooperativas do agricultor: { memberships }", body = [Membership])
    ),
    security(("api_jwt" = []))
)]
pub async fn my_memberships(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    let memberships = app_state.cooperative_service.memberships(farmer.farmer_id).await?;
    Ok(Json(json!({ "memberships": memberships })))
}
