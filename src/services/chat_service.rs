// src/services/chat_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ChatRepository,
    models::chat::{merge_conversations, Chat, ChatMessage, ConversationPartner, SendMessagePayload},
    services::chatbot::{self, ChatLanguage, ChatbotReply},
};

#[derive(Clone)]
pub struct ChatService {
    chat_repo: ChatRepository,
}

impl ChatService {
    pub fn new(chat_repo: ChatRepository) -> Self {
        Self { chat_repo }
    }

    pub async fn send(&self, sender_id: Uuid, payload: &SendMessagePayload) -> Result<Chat, AppError> {
        let receiver_id = payload
            .receiver_id
            .ok_or_else(|| AppError::BadRequest("Dados incompletos".into()))?;
        let language = payload.language.as_deref().unwrap_or("pt");

        self.chat_repo
            .insert(sender_id, receiver_id, &payload.message, language)
            .await
    }

    pub async fn conversations(&self, user_id: Uuid) -> Result<Vec<ConversationPartner>, AppError> {
        let sent = self.chat_repo.sent_to(user_id).await?;
        let received = self.chat_repo.received_from(user_id).await?;
        Ok(merge_conversations(sent, received))
    }

    /// Devolve a conversa e marca como lidas as mensagens que o outro lado enviou.
    pub async fn messages_with(&self, user_id: Uuid, other_id: Uuid) -> Result<Vec<ChatMessage>, AppError> {
        let messages = self.chat_repo.history(user_id, other_id).await?;
        self.chat_repo.mark_read(user_id, other_id).await?;
        Ok(messages)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, AppError> {
        self.chat_repo.unread_count(user_id).await
    }

    pub fn chatbot_reply(&self, message: &str, requested: Option<&str>, header_language: Option<&str>) -> ChatbotReply {
        let language = ChatLanguage::resolve(requested, header_language);
        ChatbotReply {
            response: chatbot::reply(message, language).to_string(),
            language,
        }
    }
}
