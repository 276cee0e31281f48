// src/handlers/products.rs

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
        extract::{Path, Query},
        validated_json::ValidatedJson,
    },
    config::AppState,
    middleware::rbac::CurrentFarmer,
    models::product::{
        CreateProductPayload, Product, ProductFilter, ProductListing, UpdateProductPayload,
    },
};

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado: { message, product }", body = Product),
        (status = 403, description = "Apenas agricultores")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
    ValidatedJson(payload): ValidatedJson<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.create(farmer.farmer_id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Produto criado com sucesso", "product": product })),
    ))
}

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Produtos à venda: { products }", body = [ProductListing])
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list(&filter).await?;
    Ok(Json(json!({ "products": products })))
}

// GET /api/products/mine
#[utoipa::path(
    get,
    path = "/api/products/mine",
    tag = "Products",
    responses(
        (status = 200, description = "Produtos do agricultor: { products }", body = [Product])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_products(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list_mine(farmer.farmer_id).await?;
    Ok(Json(json!({ "products": products })))
}

// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto com o vendedor: { product }", body = ProductListing),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.get(id).await?;
    Ok(Json(json!({ "product": product })))
}

// PUT /api/products/{id}
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado: { message, product }", body = Product),
        (status = 404, description = "Produto não encontrado ou de outro agricultor")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .product_service
        .update(id, farmer.farmer_id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Produto atualizado", "product": product })))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto removido"),
        (status = 404, description = "Produto não encontrado ou de outro agricultor")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    farmer: CurrentFarmer,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete(id, farmer.farmer_id).await?;
    Ok(Json(json!({ "message": "Produto removido com sucesso" })))
}
