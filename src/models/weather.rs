// src/models/weather.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WeatherAlert {
    pub id: Uuid,
    pub region: Option<String>,
    #[schema(example = "Sofala")]
    pub province: Option<String>,
    #[schema(example = "ciclone")]
    pub alert_type: String,
    #[schema(example = "alta")]
    pub severity: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertFilter {
    pub province: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAlertPayload {
    pub region: Option<String>,
    pub province: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "O tipo do alerta é obrigatório."))]
    pub alert_type: String,
    pub severity: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Forecast {
    pub province: String,
    #[schema(example = 28)]
    pub temperature: i32,
    pub humidity: i32,
    pub precipitation_chance: i32,
    pub wind_speed: i32,
    #[schema(example = "Ensolarado")]
    pub condition: String,
    pub forecast_date: DateTime<Utc>,
}
