// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, LoginUserPayload, RegisterUserPayload, Role, UserSummary},
};

/// Validade do token emitido no registro e no login.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Decide o login depois de achar o usuário.
/// Senha errada é sempre "Credenciais inválidas", mesmo com a conta inativa.
pub fn login_outcome(password_valid: bool, is_active: bool) -> Result<(), AppError> {
    if !password_valid {
        return Err(AppError::InvalidCredentials);
    }
    if !is_active {
        return Err(AppError::InactiveAccount);
    }
    Ok(())
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    pub async fn register_user(&self, payload: &RegisterUserPayload) -> Result<AuthResponse, AppError> {
        let role = payload
            .user_type
            .ok_or_else(|| AppError::BadRequest("Campos obrigatórios faltando".into()))?;

        // 1. Hashing (fora da transação, não toca no banco)
        let password_clone = payload.password.clone();
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        if self.user_repo.email_exists(&mut *tx, &payload.email).await? {
            return Err(AppError::EmailAlreadyExists);
        }

        // 2. Cria o usuário
        let new_user = self
            .user_repo
            .create_user(&mut *tx, payload, role, &hashed_password)
            .await?;

        // 3. Linha de extensão do perfil (só agricultor, transportador e fornecedor).
        // Se falhar, o usuário criado acima é desfeito junto.
        self.user_repo.create_profile(&mut *tx, role, new_user.id).await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        tracing::info!("👤 Novo usuário registrado: {} ({})", new_user.id, role.as_str());

        let token = self.create_token(new_user.id, &new_user.email, new_user.user_type)?;
        Ok(AuthResponse {
            message: "Usuário registrado com sucesso".into(),
            user: UserSummary::from(&new_user),
            token,
        })
    }

    pub async fn login_user(&self, payload: &LoginUserPayload) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = payload.password.clone();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        login_outcome(is_password_valid, user.is_active)?;

        let token = self.create_token(user.id, &user.email, user.user_type)?;
        Ok(AuthResponse {
            message: "Login realizado com sucesso".into(),
            user: UserSummary::from(&user),
            token,
        })
    }

    /// Verifica assinatura e expiração. Não consulta o banco: o token vale até expirar.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    pub fn create_token(&self, user_id: Uuid, email: &str, role: Role) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn service(secret: &str) -> AuthService {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/agro_test")
            .unwrap();
        AuthService::new(UserRepository::new(pool.clone()), secret.into(), pool)
    }

    #[tokio::test]
    async fn token_round_trip_keeps_identity() {
        let auth = service("segredo");
        let id = Uuid::new_v4();
        let token = auth.create_token(id, "joao@exemplo.co.mz", Role::Agricultor).unwrap();

        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "joao@exemplo.co.mz");
        assert_eq!(claims.role, Role::Agricultor);
        assert_eq!(claims.exp - claims.iat, (TOKEN_TTL_DAYS * 24 * 3600) as usize);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let token = service("outro").create_token(Uuid::new_v4(), "a@b.co", Role::Admin).unwrap();
        assert!(matches!(service("segredo").validate_token(&token), Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let past = Utc::now() - chrono::Duration::days(1);
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@b.co".into(),
            role: Role::Comprador,
            exp: past.timestamp() as usize,
            iat: (past - chrono::Duration::days(7)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"segredo")).unwrap();

        assert!(matches!(service("segredo").validate_token(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn inactive_account_with_right_password_is_inactive_not_invalid() {
        assert!(matches!(login_outcome(true, false), Err(AppError::InactiveAccount)));
    }

    #[test]
    fn wrong_password_is_invalid_credentials_even_when_inactive() {
        assert!(matches!(login_outcome(false, false), Err(AppError::InvalidCredentials)));
        assert!(matches!(login_outcome(false, true), Err(AppError::InvalidCredentials)));
        assert!(login_outcome(true, true).is_ok());
    }
}
