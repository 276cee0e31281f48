// src/handlers/admin.rs
//
// Todas as rotas exigem o perfil admin.

use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        extract::{Path, Query},
        validated_json::ValidatedJson,
    },
    config::AppState,
    middleware::rbac::{AdminOnly, RequireRole},
    models::{
        admin::{
            DashboardResponse, MonthlyReport, MonthlyReportQuery, ToggleActivePayload,
            TransactionEntry, UserFilter, VerifyUserPayload,
        },
        auth::User,
    },
};

// GET /api/admin/dashboard
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    tag = "Admin",
    responses(
        (status = 200, description = "Indicadores e pedidos recentes", body = DashboardResponse),
        (status = 403, description = "Acesso negado")
    ),
    security(("api_jwt" = []))
)]
pub async fn dashboard(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = app_state.admin_service.dashboard().await?;
    Ok(Json(dashboard))
}

// GET /api/admin/users
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(UserFilter),
    responses(
        (status = 200, description = "Usuários cadastrados: { users }", body = [User])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Query(filter): Query<UserFilter>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.admin_service.users(&filter).await?;
    Ok(Json(json!({ "users": users })))
}

// PUT /api/admin/users/{id}/verify
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/verify",
    tag = "Admin",
    request_body = VerifyUserPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado: { message, user }", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn verify_user(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<VerifyUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.admin_service.set_verified(id, payload.is_verified).await?;
    Ok(Json(json!({ "message": "Usuário atualizado", "user": user })))
}

// PUT /api/admin/users/{id}/toggle-active
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/toggle-active",
    tag = "Admin",
    request_body = ToggleActivePayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Status atualizado: { message, user }", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn toggle_user_active(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ToggleActivePayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.admin_service.set_active(id, payload.is_active).await?;
    Ok(Json(json!({ "message": "Status atualizado", "user": user })))
}

// GET /api/admin/transactions
#[utoipa::path(
    get,
    path = "/api/admin/transactions",
    tag = "Admin",
    responses(
        (status = 200, description = "Últimas 100 transações: { transactions }", body = [TransactionEntry])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let transactions = app_state.admin_service.transactions().await?;
    Ok(Json(json!({ "transactions": transactions })))
}

// GET /api/admin/reports/monthly
#[utoipa::path(
    get,
    path = "/api/admin/reports/monthly",
    tag = "Admin",
    params(MonthlyReportQuery),
    responses(
        (status = 200, description = "Relatório do mês: { report }", body = MonthlyReport),
        (status = 400, description = "Mês ou ano inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn monthly_report(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    Query(query): Query<MonthlyReportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.admin_service.monthly_report(&query).await?;
    Ok(Json(json!({ "report": report })))
}
