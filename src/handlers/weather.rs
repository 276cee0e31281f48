// src/handlers/weather.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::{
    common::{
        error::AppError,
        extract::{Path, Query},
        validated_json::ValidatedJson,
    },
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::weather::{AlertFilter, CreateAlertPayload, Forecast, WeatherAlert},
};

// GET /api/weather/alerts
#[utoipa::path(
    get,
    path = "/api/weather/alerts",
    tag = "Weather",
    params(AlertFilter),
    responses(
        (status = 200, description = "Alertas ativos: { alerts }", body = [WeatherAlert])
    )
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    Query(filter): Query<AlertFilter>,
) -> Result<impl IntoResponse, AppError> {
    let alerts = app_state.weather_service.active_alerts(&filter).await?;
    Ok(Json(json!({ "alerts": alerts })))
}

// POST /api/weather/alerts
#[utoipa::path(
    post,
    path = "/api/weather/alerts",
    tag = "Weather",
    request_body = CreateAlertPayload,
    responses(
        (status = 201, description = "Alerta criado: { message, alert }", body = WeatherAlert)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_alert(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateAlertPayload>,
) -> Result<impl IntoResponse, AppError> {
    let alert = app_state.weather_service.create_alert(&payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Alerta criado", "alert": alert })),
    ))
}

// GET /api/weather/forecast/{province}
#[utoipa::path(
    get,
    path = "/api/weather/forecast/{province}",
    tag = "Weather",
    params(("province" = String, Path, description = "Nome da província")),
    responses(
        (status = 200, description = "Previsão simulada: { forecast }", body = Forecast)
    )
)]
pub async fn get_forecast(
    State(app_state): State<AppState>,
    Path(province): Path<String>,
) -> impl IntoResponse {
    Json(json!({ "forecast": app_state.weather_service.forecast(&province) }))
}
