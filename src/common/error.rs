// src/common/error.rs

use std::collections::{BTreeMap, BTreeSet};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrorsKind;

use crate::models::auth::Role;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    // Corpo JSON que nem chegou a ser desserializado
    #[error("Payload inválido: {0}")]
    MalformedPayload(String),

    #[error("Token não fornecido")]
    MissingToken,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Conta inativa")]
    InactiveAccount,

    #[error("Email já cadastrado")]
    EmailAlreadyExists,

    // Linha de extensão (agricultor, transportador, fornecedor) ausente
    #[error("Perfil não encontrado: {0:?}")]
    ProfileNotFound(Role),

    // Mensagem completa, com a concordância do recurso ("Entrega não encontrada")
    #[error("{0}")]
    ResourceNotFound(String),

    #[error("Estoque insuficiente")]
    InsufficientStock,

    #[error("Preço do produto foi alterado")]
    PriceChanged,

    #[error("Entrega já foi aceita")]
    DeliveryAlreadyTaken,

    #[error("{0}")]
    Conflict(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(message: &str) -> Self {
        AppError::ResourceNotFound(message.to_string())
    }
}

fn profile_label(role: Role) -> &'static str {
    match role {
        Role::Agricultor => "Agricultor não encontrado",
        Role::Transportador => "Transportador não encontrado",
        Role::Fornecedor => "Fornecedor não encontrado",
        Role::Comprador | Role::Admin => "Perfil não encontrado",
    }
}

// Achata os erros, inclusive os de itens aninhados ("items[0].quantity")
fn collect_messages(
    errors: &validator::ValidationErrors,
    prefix: &str,
    details: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                details.insert(path, messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(inner, &path, details),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(inner, &format!("{path}[{index}]"), details);
                }
            }
        }
    }
}

fn validation_response(errors: validator::ValidationErrors) -> Response {
    let mut details = BTreeMap::new();
    collect_messages(&errors, "", &mut details);

    let distinct: BTreeSet<&String> = details.values().flatten().collect();

    // Uma única mensagem vira o próprio erro ("Carrinho vazio", "Dados incompletos"...)
    let error = match (distinct.len(), distinct.iter().next()) {
        (1, Some(message)) => message.to_string(),
        _ => "Um ou mais campos são inválidos.".to_string(),
    };

    let body = Json(json!({
        "error": error,
        "details": details,
    }));
    (StatusCode::BAD_REQUEST, body).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message): (StatusCode, String) = match self {
            AppError::ValidationError(errors) => return validation_response(errors),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::MalformedPayload(detail) => {
                tracing::debug!("Payload rejeitado: {}", detail);
                (StatusCode::BAD_REQUEST, "Dados inválidos na requisição.".into())
            }
            AppError::MissingToken => (StatusCode::UNAUTHORIZED, "Token não fornecido".into()),
            AppError::InvalidToken => (StatusCode::FORBIDDEN, "Token inválido".into()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Acesso negado".into()),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Credenciais inválidas".into()),
            AppError::InactiveAccount => (StatusCode::FORBIDDEN, "Conta inativa".into()),
            AppError::EmailAlreadyExists => (StatusCode::BAD_REQUEST, "Email já cadastrado".into()),
            AppError::ProfileNotFound(role) => (StatusCode::NOT_FOUND, profile_label(role).into()),
            AppError::ResourceNotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::InsufficientStock => (StatusCode::CONFLICT, "Estoque insuficiente".into()),
            AppError::PriceChanged => (StatusCode::CONFLICT, "Preço do produto foi alterado".into()),
            AppError::DeliveryAlreadyTaken => (StatusCode::CONFLICT, "Entrega já foi aceita".into()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),

            // Todos os outros erros (banco, bcrypt, jwt, anyhow) viram 500.
            // O detalhe vai para o log, o cliente recebe só a mensagem genérica.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".into(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::CreateOrderPayload;
    use validator::Validate;

    async fn body_of(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[derive(Validate)]
    struct Cart {
        #[validate(length(min = 1, message = "Carrinho vazio"))]
        items: Vec<u8>,
    }

    #[tokio::test]
    async fn single_validation_message_becomes_the_error() {
        let errors = Cart { items: vec![] }.validate().unwrap_err();
        let (status, body) = body_of(AppError::from(errors).into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Carrinho vazio");
        assert_eq!(body["details"]["items"][0], "Carrinho vazio");
    }

    #[tokio::test]
    async fn nested_item_errors_keep_their_message() {
        let payload: CreateOrderPayload = serde_json::from_value(json!({
            "items": [{ "product_id": uuid::Uuid::new_v4(), "quantity": 0, "unit_price": 10 }]
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();

        let (status, body) = body_of(AppError::from(errors).into_response()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "A quantidade deve ser maior que zero.");
        assert_eq!(body["details"]["items[0].quantity"][0], "A quantidade deve ser maior que zero.");
    }

    #[tokio::test]
    async fn auth_errors_map_to_their_status_codes() {
        let cases = [
            (AppError::MissingToken, StatusCode::UNAUTHORIZED, "Token não fornecido"),
            (AppError::InvalidToken, StatusCode::FORBIDDEN, "Token inválido"),
            (AppError::Forbidden, StatusCode::FORBIDDEN, "Acesso negado"),
            (AppError::InactiveAccount, StatusCode::FORBIDDEN, "Conta inativa"),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED, "Credenciais inválidas"),
        ];

        for (error, expected_status, expected_message) in cases {
            let (status, body) = body_of(error.into_response()).await;
            assert_eq!(status, expected_status);
            assert_eq!(body["error"], expected_message);
        }
    }

    #[tokio::test]
    async fn missing_profile_names_the_role() {
        let (status, body) =
            body_of(AppError::ProfileNotFound(Role::Transportador).into_response()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Transportador não encontrado");
    }

    #[tokio::test]
    async fn not_found_keeps_the_resource_gender() {
        let (status, body) = body_of(AppError::not_found("Entrega não encontrada").into_response()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Entrega não encontrada");
    }

    #[tokio::test]
    async fn database_failures_hide_the_detail() {
        let (status, body) = body_of(AppError::from(sqlx::Error::RowNotFound).into_response()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Ocorreu um erro inesperado.");
    }
}
