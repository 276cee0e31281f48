// src/services/weather_service.rs

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::{
    common::error::AppError,
    db::WeatherRepository,
    models::weather::{AlertFilter, CreateAlertPayload, Forecast, WeatherAlert},
};

const CONDITIONS: [&str; 4] = ["Ensolarado", "Parcialmente nublado", "Nublado", "Chuvoso"];

/// Previsão simulada: não há fonte meteorológica real por trás.
pub fn simulated_forecast<R: Rng + ?Sized>(province: &str, rng: &mut R, now: DateTime<Utc>) -> Forecast {
    Forecast {
        province: province.to_string(),
        temperature: rng.gen_range(20..35),
        humidity: rng.gen_range(50..90),
        precipitation_chance: rng.gen_range(0..100),
        wind_speed: rng.gen_range(5..25),
        condition: CONDITIONS[rng.gen_range(0..CONDITIONS.len())].to_string(),
        forecast_date: now,
    }
}

#[derive(Clone)]
pub struct WeatherService {
    weather_repo: WeatherRepository,
}

impl WeatherService {
    pub fn new(weather_repo: WeatherRepository) -> Self {
        Self { weather_repo }
    }

    pub async fn active_alerts(&self, filter: &AlertFilter) -> Result<Vec<WeatherAlert>, AppError> {
        self.weather_repo.list_active(filter).await
    }

    pub async fn create_alert(&self, payload: &CreateAlertPayload) -> Result<WeatherAlert, AppError> {
        let alert = self.weather_repo.create(payload).await?;
        tracing::info!(
            "🌧️ Alerta '{}' criado para {}",
            alert.alert_type,
            alert.province.as_deref().unwrap_or("todas as províncias")
        );
        Ok(alert)
    }

    pub fn forecast(&self, province: &str) -> Forecast {
        simulated_forecast(province, &mut rand::thread_rng(), Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn forecast_values_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let f = simulated_forecast("Sofala", &mut rng, Utc::now());
            assert!((20..35).contains(&f.temperature));
            assert!((50..90).contains(&f.humidity));
            assert!((0..100).contains(&f.precipitation_chance));
            assert!((5..25).contains(&f.wind_speed));
            assert!(CONDITIONS.contains(&f.condition.as_str()));
        }
    }

    #[test]
    fn forecast_echoes_the_province() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(simulated_forecast("Manica", &mut rng, Utc::now()).province, "Manica");
    }
}
