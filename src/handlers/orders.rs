// src/handlers/orders.rs

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
    middleware::rbac::{BuyerOnly, OrderParticipant, RequireRole},
    models::order::{CreateOrderPayload, Order, OrderDetail, OrderRow, UpdateOrderStatusPayload},
};

// POST /api/orders
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado: { message, order }", body = Order),
        (status = 400, description = "Carrinho vazio"),
        (status = 409, description = "Estoque insuficiente ou preço alterado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    RequireRole(buyer, _): RequireRole<BuyerOnly>,
    ValidatedJson(payload): ValidatedJson<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.place_order(buyer.id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Pedido criado com sucesso", "order": order })),
    ))
}

// GET /api/orders
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "Pedidos visíveis ao perfil: { orders }", body = [OrderRow]),
        (status = 403, description = "Fornecedores não participam de pedidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<OrderParticipant>,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.order_service.scope_for(&user).await?;
    let orders = app_state.order_service.list(scope).await?;
    Ok(Json(json!({ "orders": orders })))
}

// GET /api/orders/{id}
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido com itens e entrega: { order }", body = OrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<OrderParticipant>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.order_service.scope_for(&user).await?;
    let order = app_state.order_service.get(id, scope).await?;
    Ok(Json(json!({ "order": order })))
}

// PUT /api/orders/{id}/status
#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "Orders",
    request_body = UpdateOrderStatusPayload,
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Status atualizado: { message, order }", body = Order),
        (status = 400, description = "Nenhum status informado"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    RequireRole(user, _): RequireRole<OrderParticipant>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let scope = app_state.order_service.scope_for(&user).await?;
    let order = app_state.order_service.update_status(id, scope, &payload).await?;
    Ok(Json(json!({ "message": "Status atualizado", "order": order })))
}
