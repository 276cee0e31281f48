// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Perfis de usuário ---
// O tipo do usuário é resolvido uma única vez, quando o token é validado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Agricultor,
    Comprador,
    Transportador,
    Fornecedor,
    Admin,
}

impl Role {
    /// Tabela de extensão criada no registro para este perfil (se houver).
    pub fn profile_table(self) -> Option<&'static str> {
        match self {
            Role::Agricultor => Some("farmers"),
            Role::Transportador => Some("transporters"),
            Role::Fornecedor => Some("suppliers"),
            Role::Comprador | Role::Admin => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Agricultor => "agricultor",
            Role::Comprador => "comprador",
            Role::Transportador => "transportador",
            Role::Fornecedor => "fornecedor",
            Role::Admin => "admin",
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    #[schema(example = "João Machava")]
    pub full_name: String,
    pub user_type: Role,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[schema(example = "Sofala")]
    pub province: Option<String>,
    #[schema(example = "pt")]
    pub language: String,
    pub photo_url: Option<String>,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados públicos devolvidos junto com o token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub user_type: Role,
    pub language: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            user_type: user.user_type,
            language: user.language.clone(),
        }
    }
}

// Dados para registro de um novo usuário
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[serde(default)]
    #[validate(
        length(min = 1, message = "Campos obrigatórios faltando"),
        email(message = "O e-mail fornecido é inválido.")
    )]
    #[schema(example = "joao@exemplo.co.mz")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Campos obrigatórios faltando"))]
    pub full_name: String,

    pub user_type: Option<Role>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub language: Option<String>,
}

// Dados para login
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email e senha são obrigatórios"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email e senha são obrigatórios"))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "Login realizado com sucesso")]
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,     // Subject (ID do usuário)
    pub email: String,
    pub role: Role,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_farmer_transporter_and_supplier_get_extension_rows() {
        assert_eq!(Role::Agricultor.profile_table(), Some("farmers"));
        assert_eq!(Role::Transportador.profile_table(), Some("transporters"));
        assert_eq!(Role::Fornecedor.profile_table(), Some("suppliers"));
        assert_eq!(Role::Comprador.profile_table(), None);
        assert_eq!(Role::Admin.profile_table(), None);
    }

    #[test]
    fn role_uses_portuguese_wire_names() {
        let role: Role = serde_json::from_str("\"transportador\"").unwrap();
        assert_eq!(role, Role::Transportador);
        assert_eq!(serde_json::to_string(&Role::Fornecedor).unwrap(), "\"fornecedor\"");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn register_payload_rejects_blank_required_fields() {
        let payload: RegisterUserPayload =
            serde_json::from_str(r#"{"email": "", "password": "segredo1"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("full_name"));
        assert!(!fields.contains_key("password"));
    }
}
