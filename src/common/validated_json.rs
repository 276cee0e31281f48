// src/common/validated_json.rs

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::common::error::AppError;

/// Corpo JSON já desserializado e validado.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::MalformedPayload(rejection.body_text()))?;

        payload.validate()?;
        Ok(ValidatedJson(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Message {
        #[serde(default)]
        #[validate(length(min = 1, message = "Dados incompletos"))]
        text: String,
    }

    fn json_request(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_a_valid_body() {
        let ValidatedJson(msg) = ValidatedJson::<Message>::from_request(json_request(r#"{"text":"olá"}"#), &())
            .await
            .unwrap();
        assert_eq!(msg.text, "olá");
    }

    #[tokio::test]
    async fn blank_field_is_a_validation_error() {
        let err = ValidatedJson::<Message>::from_request(json_request(r#"{}"#), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn broken_json_is_a_malformed_payload() {
        let err = ValidatedJson::<Message>::from_request(json_request("{not json"), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::MalformedPayload(_)));
    }
}
