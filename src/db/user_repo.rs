// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        admin::UserFilter,
        auth::{RegisterUserPayload, Role, User},
    },
};

const USER_COLUMNS: &str = r#"
    id, email, password_hash, full_name, user_type, phone, address, city, province,
    language, photo_url, is_active, is_verified, created_at, updated_at
"#;

// O repositório de usuários, responsável pelas tabelas 'users' e de perfis
/// Insert da linha de extensão criada no registro. Comprador e admin não têm uma.
pub fn profile_insert_sql(role: Role) -> Option<String> {
    role.profile_table()
        .map(|table| format!("INSERT INTO {table} (user_id) VALUES ($1)"))
}

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let maybe_user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }

    pub async fn email_exists<'e, E>(&self, executor: E, email: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    // Cria um novo usuário no banco de dados.
    // E-mail duplicado (corrida entre dois registros) vira EmailAlreadyExists.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        payload: &RegisterUserPayload,
        role: Role,
        password_hash: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO users (
                email, password_hash, full_name, user_type,
                phone, address, city, province, language
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 'pt'))
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&payload.email)
            .bind(password_hash)
            .bind(&payload.full_name)
            .bind(role)
            .bind(&payload.phone)
            .bind(&payload.address)
            .bind(&payload.city)
            .bind(&payload.province)
            .bind(&payload.language)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::EmailAlreadyExists;
                    }
                }
                e.into()
            })?;

        Ok(user)
    }

    /// Cria a linha de extensão do perfil. Comprador e admin não têm uma.
    pub async fn create_profile<'e, E>(&self, executor: E, role: Role, user_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let Some(sql) = profile_insert_sql(role) else {
            return Ok(());
        };

        sqlx::query(&sql).bind(user_id).execute(executor).await?;
        Ok(())
    }

    /// Id da linha de extensão (farmers, transporters, suppliers) do usuário.
    pub async fn find_profile_id(&self, role: Role, user_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let Some(table) = role.profile_table() else {
            return Ok(None);
        };

        let sql = format!("SELECT id FROM {table} WHERE user_id = $1");
        let id = sqlx::query_scalar::<_, Uuid>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    // --- Administração ---

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        let sql = format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE ($1::user_role IS NULL OR user_type = $1)
              AND ($2::boolean IS NULL OR is_verified = $2)
            ORDER BY created_at DESC
            "#
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(filter.user_type)
            .bind(filter.is_verified)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn set_verified(&self, id: Uuid, is_verified: bool) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET is_verified = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(is_verified)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Option<User>, AppError> {
        let sql = format!(
            "UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(is_active)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_inserts_into_the_matching_profile_table() {
        assert_eq!(
            profile_insert_sql(Role::Agricultor).as_deref(),
            Some("INSERT INTO farmers (user_id) VALUES ($1)")
        );
        assert_eq!(
            profile_insert_sql(Role::Transportador).as_deref(),
            Some("INSERT INTO transporters (user_id) VALUES ($1)")
        );
        assert_eq!(
            profile_insert_sql(Role::Fornecedor).as_deref(),
            Some("INSERT INTO suppliers (user_id) VALUES ($1)")
        );
    }

    #[test]
    fn buyers_and_admins_get_no_profile_row() {
        assert_eq!(profile_insert_sql(Role::Comprador), None);
        assert_eq!(profile_insert_sql(Role::Admin), None);
    }
}
