// src/services/product_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::product::{
        CreateProductPayload, Product, ProductFilter, ProductListing, UpdateProductPayload,
    },
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn create(&self, farmer_id: Uuid, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let product = self.product_repo.create(farmer_id, payload).await?;
        tracing::info!("🌽 Produto {} publicado pelo agricultor {}", product.id, farmer_id);
        Ok(product)
    }

    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<ProductListing>, AppError> {
        self.product_repo.list(filter).await
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductListing, AppError> {
        self.product_repo
            .find_listing(id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto não encontrado"))
    }

    pub async fn list_mine(&self, farmer_id: Uuid) -> Result<Vec<Product>, AppError> {
        self.product_repo.list_by_farmer(farmer_id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        farmer_id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        self.product_repo
            .update(id, farmer_id, payload)
            .await?
            .ok_or_else(|| AppError::not_found("Produto não encontrado"))
    }

    pub async fn delete(&self, id: Uuid, farmer_id: Uuid) -> Result<(), AppError> {
        match self.product_repo.delete(id, farmer_id).await? {
            0 => Err(AppError::not_found("Produto não encontrado")),
            _ => Ok(()),
        }
    }
}
