// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Claims, Role},
    services::auth::AuthService,
};

/// Identidade anexada à requisição depois da verificação do token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Lê o header `Authorization: Bearer` e valida o token.
/// Header ausente é 401; token malformado, com assinatura errada ou expirado é 403.
pub fn authenticate(headers: &HeaderMap, auth_service: &AuthService) -> Result<AuthenticatedUser, AppError> {
    if !headers.contains_key(header::AUTHORIZATION) {
        return Err(AppError::MissingToken);
    }

    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let claims = auth_service.validate_token(bearer.token())?;
    Ok(claims.into())
}

// O middleware em si
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(request.headers(), &app_state.auth_service)?;

    // Insere o usuário nos "extensions" da requisição
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers.
// Funciona com ou sem o `auth_guard` na frente da rota.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        let user = authenticate(&parts.headers, &app_state.auth_service)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::UserRepository;
    use axum::http::HeaderValue;
    use sqlx::postgres::PgPoolOptions;

    // Pool preguiçoso: nenhum teste aqui chega a abrir conexão.
    fn auth_service() -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/agro_test")
            .unwrap();
        AuthService::new(UserRepository::new(pool.clone()), "segredo-de-teste".into(), pool)
    }

    #[tokio::test]
    async fn missing_header_is_missing_token() {
        let err = authenticate(&HeaderMap::new(), &auth_service()).unwrap_err();
        assert!(matches!(err, AppError::MissingToken));
    }

    #[tokio::test]
    async fn garbage_token_is_invalid_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        let err = authenticate(&headers, &auth_service()).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_invalid_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpzZW5oYQ=="));
        let err = authenticate(&headers, &auth_service()).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[tokio::test]
    async fn issued_token_authenticates() {
        let service = auth_service();
        let id = Uuid::new_v4();
        let token = service.create_token(id, "ana@exemplo.co.mz", Role::Comprador).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );

        let user = authenticate(&headers, &service).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Comprador);
        assert_eq!(user.email, "ana@exemplo.co.mz");
    }
}
