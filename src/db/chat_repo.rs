// src/db/chat_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::chat::{Chat, ChatMessage, ConversationPartner},
};

const CHAT_COLUMNS: &str = "c.id, c.sender_id, c.receiver_id, c.message, c.language, c.is_read, c.created_at";

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        message: &str,
        language: &str,
    ) -> Result<Chat, AppError> {
        let sql = format!(
            r#"
            INSERT INTO chats AS c (sender_id, receiver_id, message, language)
            VALUES ($1, $2, $3, $4)
            RETURNING {CHAT_COLUMNS}
            "#
        );
        let chat = sqlx::query_as::<_, Chat>(&sql)
            .bind(sender_id)
            .bind(receiver_id)
            .bind(message)
            .bind(language)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::not_found("Destinatário não encontrado");
                    }
                }
                e.into()
            })?;
        Ok(chat)
    }

    /// Destinatários das mensagens enviadas, mais recentes primeiro (com repetições).
    pub async fn sent_to(&self, user_id: Uuid) -> Result<Vec<ConversationPartner>, AppError> {
        let partners = sqlx::query_as::<_, ConversationPartner>(
            r#"
            SELECT u.id, u.full_name, u.photo_url
            FROM chats c JOIN users u ON u.id = c.receiver_id
            WHERE c.sender_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(partners)
    }

    /// Remetentes das mensagens recebidas, mais recentes primeiro (com repetições).
    pub async fn received_from(&self, user_id: Uuid) -> Result<Vec<ConversationPartner>, AppError> {
        let partners = sqlx::query_as::<_, ConversationPartner>(
            r#"
            SELECT u.id, u.full_name, u.photo_url
            FROM chats c JOIN users u ON u.id = c.sender_id
            WHERE c.receiver_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(partners)
    }

    /// Histórico nos dois sentidos, em ordem cronológica.
    pub async fn history(&self, user_id: Uuid, other_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        let sql = format!(
            r#"
            SELECT {CHAT_COLUMNS},
                   s.full_name AS sender_name, s.photo_url AS sender_photo_url,
                   r.full_name AS receiver_name, r.photo_url AS receiver_photo_url
            FROM chats c
            JOIN users s ON s.id = c.sender_id
            JOIN users r ON r.id = c.receiver_id
            WHERE (c.sender_id = $1 AND c.receiver_id = $2)
               OR (c.sender_id = $2 AND c.receiver_id = $1)
            ORDER BY c.created_at ASC
            "#
        );
        let messages = sqlx::query_as::<_, ChatMessage>(&sql)
            .bind(user_id)
            .bind(other_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(messages)
    }

    pub async fn mark_read(&self, receiver_id: Uuid, sender_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE chats SET is_read = TRUE WHERE receiver_id = $1 AND sender_id = $2 AND is_read = FALSE",
        )
        .bind(receiver_id)
        .bind(sender_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM chats WHERE receiver_id = $1 AND is_read = FALSE")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
