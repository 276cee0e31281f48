// src/handlers/chat.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        extract::Path,
        validated_json::ValidatedJson,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::chat::{Chat, ChatMessage, ChatbotPayload, ConversationPartner, SendMessagePayload},
    services::chatbot::ChatbotReply,
};

// POST /api/chat/send
#[utoipa::path(
    post,
    path = "/api/chat/send",
    tag = "Chat",
    request_body = SendMessagePayload,
    responses(
        (status = 201, description = "Mensagem enviada: { message, chat }", body = Chat),
        (status = 400, description = "Dados incompletos")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<SendMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    let chat = app_state.chat_service.send(user.id, &payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Mensagem enviada", "chat": chat })),
    ))
}

// GET /api/chat/conversations
#[utoipa::path(
    get,
    path = "/api/chat/conversations",
    tag = "Chat",
    responses(
        (status = 200, description = "Contatos com quem o usuário conversou: { conversations }", body = [ConversationPartner])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_conversations(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let conversations = app_state.chat_service.conversations(user.id).await?;
    Ok(Json(json!({ "conversations": conversations })))
}

// GET /api/chat/messages/{user_id}
#[utoipa::path(
    get,
    path = "/api/chat/messages/{user_id}",
    tag = "Chat",
    params(("user_id" = Uuid, Path, description = "ID do outro participante")),
    responses(
        (status = 200, description = "Histórico da conversa: { messages }", body = [ChatMessage])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(other_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let messages = app_state.chat_service.messages_with(user.id, other_id).await?;
    Ok(Json(json!({ "messages": messages })))
}

// GET /api/chat/unread
#[utoipa::path(
    get,
    path = "/api/chat/unread",
    tag = "Chat",
    responses(
        (status = 200, description = "Quantidade de mensagens não lidas: { unread_count }")
    ),
    security(("api_jwt" = []))
)]
pub async fn unread_count(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let count = app_state.chat_service.unread_count(user.id).await?;
    Ok(Json(json!({ "unread_count": count })))
}

// POST /api/chat/chatbot
#[utoipa::path(
    post,
    path = "/api/chat/chatbot",
    tag = "Chat",
    request_body = ChatbotPayload,
    params(("accept-language" = Option<String>, Header, description = "Idioma usado quando o corpo não informa")),
    responses(
        (status = 200, description = "Resposta do assistente", body = ChatbotReply)
    )
)]
pub async fn chatbot(
    State(app_state): State<AppState>,
    Locale(header_language): Locale,
    ValidatedJson(payload): ValidatedJson<ChatbotPayload>,
) -> Json<ChatbotReply> {
    Json(app_state.chat_service.chatbot_reply(
        &payload.message,
        payload.language.as_deref(),
        header_language.as_deref(),
    ))
}
