// src/handlers/supplier.rs

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
    middleware::rbac::CurrentSupplier,
    models::supplier::{
        CreateSupplierProductPayload, SupplierProduct, SupplierProductFilter,
        SupplierProductListing, UpdateSupplierProductPayload, SUPPLY_CATEGORIES,
    },
};

// POST /api/supplier/products
#[utoipa::path(
    post,
    path = "/api/supplier/products",
    tag = "Supplier",
    request_body = CreateSupplierProductPayload,
    responses(
        (status = 201, description = "Produto criado: { message, product }", body = SupplierProduct),
        (status = 404, description = "Fornecedor não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    supplier: CurrentSupplier,
    ValidatedJson(payload): ValidatedJson<CreateSupplierProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.supplier_service.create(supplier.supplier_id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Produto criado", "product": product })),
    ))
}

// GET /api/supplier/products
#[utoipa::path(
    get,
    path = "/api/supplier/products",
    tag = "Supplier",
    params(SupplierProductFilter),
    responses(
        (status = 200, description = "Insumos disponíveis: { products }", body = [SupplierProductListing])
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    Query(filter): Query<SupplierProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.supplier_service.list(&filter).await?;
    Ok(Json(json!({ "products": products })))
}

// GET /api/supplier/products/{id}
#[utoipa::path(
    get,
    path = "/api/supplier/products/{id}",
    tag = "Supplier",
    params(("id" = Uuid, Path, description = "ID do insumo")),
    responses(
        (status = 200, description = "Insumo com o fornecedor: { product }", body = SupplierProductListing),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.supplier_service.get(id).await?;
    Ok(Json(json!({ "product": product })))
}

// PUT /api/supplier/products/{id}
#[utoipa::path(
    put,
    path = "/api/supplier/products/{id}",
    tag = "Supplier",
    request_body = UpdateSupplierProductPayload,
    params(("id" = Uuid, Path, description = "ID do insumo")),
    responses(
        (status = 200, description = "Produto atualizado: { message, product }", body = SupplierProduct),
        (status = 404, description = "Produto não encontrado ou de outro fornecedor")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    supplier: CurrentSupplier,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSupplierProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state
        .supplier_service
        .update(id, supplier.supplier_id, &payload)
        .await?;
    Ok(Json(json!({ "message": "Produto atualizado", "product": product })))
}

// GET /api/supplier/my-products
#[utoipa::path(
    get,
    path = "/api/supplier/my-products",
    tag = "Supplier",
    responses(
        (status = 200, description = "Insumos do fornecedor: { products }", body = [SupplierProduct])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_products(
    State(app_state): State<AppState>,
    supplier: CurrentSupplier,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.supplier_service.list_mine(supplier.supplier_id).await?;
    Ok(Json(json!({ "products": products })))
}

// GET /api/supplier/categories
#[utoipa::path(
    get,
    path = "/api/supplier/categories",
    tag = "Supplier",
    responses(
        (status = 200, description = "Categorias de insumos: { categories }")
    )
)]
pub async fn list_categories() -> impl IntoResponse {
    Json(json!({ "categories": SUPPLY_CATEGORIES }))
}
