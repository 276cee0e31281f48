// src/handlers/transport.rs

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
    middleware::{auth::AuthenticatedUser, rbac::CurrentTransporter},
    models::delivery::{
        CreateDeliveryPayload, Delivery, DeliveryListing, DeliveryTracking,
        UpdateDeliveryStatusPayload,
    },
};

// POST /api/transport/create-delivery
#[utoipa::path(
    post,
    path = "/api/transport/create-delivery",
    tag = "Transport",
    request_body = CreateDeliveryPayload,
    responses(
        (status = 201, description = "Entrega criada: { message, delivery }", body = Delivery),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "O pedido já possui entrega")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_delivery(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateDeliveryPayload>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state.transport_service.create_delivery(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Entrega criada", "delivery": delivery })),
    ))
}

// GET /api/transport/available
#[utoipa::path(
    get,
    path = "/api/transport/available",
    tag = "Transport",
    responses(
        (status = 200, description = "Entregas sem transportador: { deliveries }", body = [DeliveryListing])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_available(
    State(app_state): State<AppState>,
    _transporter: CurrentTransporter,
) -> Result<impl IntoResponse, AppError> {
    let deliveries = app_state.transport_service.list_available().await?;
    Ok(Json(json!({ "deliveries": deliveries })))
}

// POST /api/transport/{id}/accept
#[utoipa::path(
    post,
    path = "/api/transport/{id}/accept",
    tag = "Transport",
    params(("id" = Uuid, Path, description = "ID da entrega")),
    responses(
        (status = 200, description = "Entrega aceita: { message, delivery }", body = Delivery),
        (status = 404, description = "Entrega não encontrada"),
        (status = 409, description = "Entrega já foi aceita")
    ),
    security(("api_jwt" = []))
)]
pub async fn accept_delivery(
    State(app_state): State<AppState>,
    transporter: CurrentTransporter,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state
        .transport_service
        .accept(id, transporter.transporter_id)
        .await?;
    Ok(Json(json!({ "message": "Entrega aceita", "delivery": delivery })))
}

// PUT /api/transport/{id}/status
#[utoipa::path(
    put,
    path = "/api/transport/{id}/status",
    tag = "Transport",
    request_body = UpdateDeliveryStatusPayload,
    params(("id" = Uuid, Path, description = "ID da entrega")),
    responses(
        (status = 200, description = "Status atualizado: { message, delivery }", body = Delivery),
        (status = 400, description = "Transição de status inválida"),
        (status = 403, description = "Entrega de outro transportador")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_delivery_status(
    State(app_state): State<AppState>,
    transporter: CurrentTransporter,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDeliveryStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state
        .transport_service
        .update_status(id, transporter.transporter_id, payload.status)
        .await?;
    Ok(Json(json!({ "message": "Status atualizado", "delivery": delivery })))
}

// GET /api/transport/my-deliveries
#[utoipa::path(
    get,
    path = "/api/transport/my-deliveries",
    tag = "Transport",
    responses(
        (status = 200, description = "Entregas do transportador: { deliveries }", body = [DeliveryListing])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_deliveries(
    State(app_state): State<AppState>,
    transporter: CurrentTransporter,
) -> Result<impl IntoResponse, AppError> {
    let deliveries = app_state
        .transport_service
        .list_mine(transporter.transporter_id)
        .await?;
    Ok(Json(json!({ "deliveries": deliveries })))
}

// GET /api/transport/track/{order_id}
#[utoipa::path(
    get,
    path = "/api/transport/track/{order_id}",
    tag = "Transport",
    params(("order_id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Rastreio da entrega: { delivery }", body = DeliveryTracking),
        (status = 404, description = "Entrega não encontrada")
    )
)]
pub async fn track_delivery(
    State(app_state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let delivery = app_state.transport_service.track(order_id).await?;
    Ok(Json(json!({ "delivery": delivery })))
}
