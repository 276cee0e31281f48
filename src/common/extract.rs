// src/common/extract.rs
//
// `Path` e `Query` com a rejeição trocada por `AppError`, para que parâmetros
// inválidos também respondam `{ "error": ... }` em JSON.

use axum::{
    extract::{FromRequestParts, rejection::{PathRejection, QueryRejection}},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::common::error::AppError;

pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state).await?;
        Ok(Path(value))
    }
}

pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state).await?;
        Ok(Query(value))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Parâmetro de rota rejeitado: {}", rejection.body_text());
        AppError::BadRequest("Parâmetro inválido na URL".into())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!("Query string rejeitada: {}", rejection.body_text());
        AppError::BadRequest("Parâmetros de consulta inválidos".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::IntoResponse,
        routing::get,
        Router,
    };
    use serde::Deserialize;
    use tokio::net::TcpListener;
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Period {
        year: Option<i32>,
    }

    async fn echo_id(Path(id): Path<Uuid>) -> String {
        id.to_string()
    }

    fn parts_for(uri: &str) -> Parts {
        let (parts, _) = Request::builder().uri(uri).body(Body::empty()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn valid_query_is_extracted() {
        let Query(period) = Query::<Period>::from_request_parts(&mut parts_for("/r?year=2024"), &())
            .await
            .unwrap();
        assert_eq!(period.year, Some(2024));
    }

    #[tokio::test]
    async fn bad_query_becomes_a_json_error() {
        let err = Query::<Period>::from_request_parts(&mut parts_for("/r?year=dois-mil"), &())
            .await
            .err()
            .unwrap();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Parâmetros de consulta inválidos");
    }

    #[tokio::test]
    async fn malformed_uuid_in_the_path_answers_json() {
        let app = Router::new().route("/pedidos/{id}", get(echo_id));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let response = http.get(format!("http://{addr}/pedidos/nao-e-uuid")).send().await.unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Parâmetro inválido na URL");

        let id = Uuid::new_v4();
        let ok = http.get(format!("http://{addr}/pedidos/{id}")).send().await.unwrap();
        assert_eq!(ok.text().await.unwrap(), id.to_string());
    }
}
