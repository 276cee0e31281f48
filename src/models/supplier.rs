// src/models/supplier.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::order::validate_not_negative;

// --- Insumos vendidos por fornecedores ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SupplierProduct {
    pub id: Uuid,
    pub supplier_id: Uuid,
    #[schema(example = "Óleo de Neem 1L")]
    pub name: String,
    #[schema(example = "defensivos")]
    pub category: Option<String>,
    pub description: Option<String>,
    #[schema(example = "350.00")]
    pub price: Decimal,
    pub stock_quantity: Decimal,
    pub unit: Option<String>,
    pub photo_url: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SupplierProductListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: SupplierProduct,
    pub company_name: Option<String>,
    pub business_type: Option<String>,
    pub supplier_description: Option<String>,
    pub supplier_email: String,
    pub supplier_phone: Option<String>,
    pub supplier_address: Option<String>,
    pub supplier_city: Option<String>,
    pub supplier_province: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SupplierProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplierProductPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[serde(default)]
    #[validate(custom(function = "validate_not_negative"))]
    pub stock_quantity: Decimal,

    pub unit: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierProductPayload {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "validate_not_negative"))]
    pub stock_quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub photo_url: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SupplyCategory {
    pub value: &'static str,
    pub label: &'static str,
}

pub const SUPPLY_CATEGORIES: &[SupplyCategory] = &[
    SupplyCategory { value: "sementes", label: "Sementes" },
    SupplyCategory { value: "defensivos", label: "Defensivos Agrícolas" },
    SupplyCategory { value: "fertilizantes", label: "Fertilizantes" },
    SupplyCategory { value: "equipamentos", label: "Equipamentos" },
    SupplyCategory { value: "outros", label: "Outros" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_rejects_negative_stock_only_when_sent() {
        let update = UpdateSupplierProductPayload {
            stock_quantity: Some(Decimal::from(-3)),
            ..Default::default()
        };
        let errors = update.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("stock_quantity"));

        assert!(UpdateSupplierProductPayload::default().validate().is_ok());
    }
}
