// src/models/chat.rs

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Chat {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    #[schema(example = "Ainda tem milho disponível?")]
    pub message: String,
    #[schema(example = "pt")]
    pub language: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

// Mensagem com os nomes de quem enviou e de quem recebeu
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ChatMessage {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub chat: Chat,
    pub sender_name: String,
    pub sender_photo_url: Option<String>,
    pub receiver_name: String,
    pub receiver_photo_url: Option<String>,
}

/// O outro lado de uma conversa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ConversationPartner {
    pub id: Uuid,
    pub full_name: String,
    pub photo_url: Option<String>,
}

/// Une os destinatários das mensagens enviadas com os remetentes das
/// recebidas. Cada usuário aparece uma vez; o lado enviado tem precedência.
pub fn merge_conversations(
    sent_to: Vec<ConversationPartner>,
    received_from: Vec<ConversationPartner>,
) -> Vec<ConversationPartner> {
    let mut seen = HashSet::new();
    sent_to
        .into_iter()
        .chain(received_from)
        .filter(|partner| seen.insert(partner.id))
        .collect()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessagePayload {
    pub receiver_id: Option<Uuid>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Dados incompletos"))]
    pub message: String,

    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ChatbotPayload {
    #[serde(default)]
    #[schema(example = "Onde vejo os produtos?")]
    pub message: String,
    #[schema(example = "pt")]
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partner(id: Uuid, name: &str) -> ConversationPartner {
        ConversationPartner {
            id,
            full_name: name.to_string(),
            photo_url: None,
        }
    }

    #[test]
    fn conversations_list_each_counterparty_once() {
        let x = Uuid::new_v4();
        let y = Uuid::new_v4();

        // Várias mensagens enviadas para X e recebidas de Y.
        let sent = vec![partner(x, "X"), partner(x, "X"), partner(x, "X")];
        let received = vec![partner(y, "Y"), partner(y, "Y")];

        let conversations = merge_conversations(sent, received);
        let ids: Vec<Uuid> = conversations.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![x, y]);
    }

    #[test]
    fn sent_side_wins_when_both_directions_exist() {
        let x = Uuid::new_v4();
        let sent = vec![partner(x, "Nome atual")];
        let received = vec![partner(x, "Nome antigo")];

        let conversations = merge_conversations(sent, received);
        assert_eq!(conversations, vec![partner(x, "Nome atual")]);
    }

    #[test]
    fn no_messages_means_no_conversations() {
        assert!(merge_conversations(Vec::new(), Vec::new()).is_empty());
    }
}
