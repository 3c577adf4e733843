use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::{SourceError, truncate_body},
    model::CityWeather,
};

use super::CityWeatherProvider;

const PROVIDER: &str = "openweather";
const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const MPS_TO_KNOTS: f64 = 1.94384;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    language: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, language: String, http: Client) -> Self {
        Self { api_key, language, http }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: Option<i64>,
    main: Option<OwMain>,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
}

fn parse_current(city: &str, body: &str) -> Result<CityWeather, SourceError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| SourceError::parse(PROVIDER, e))?;

    let (Some(main), Some(weather)) = (parsed.main, parsed.weather.into_iter().next()) else {
        return Err(SourceError::Empty { provider: PROVIDER });
    };

    Ok(CityWeather {
        city: city.to_string(),
        temperature_c: main.temp,
        description: weather.description,
        icon_url: weather.icon.map(|icon| format!("http://openweathermap.org/img/wn/{icon}@2x.png")),
        wind_kt: mps_to_knots(parsed.wind.speed),
        pressure_hpa: main.pressure,
        observed_at: parsed.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    })
}

/// m/s to knots, one decimal.
fn mps_to_knots(speed: f64) -> f64 {
    (speed * MPS_TO_KNOTS * 10.0).round() / 10.0
}

#[async_trait]
impl CityWeatherProvider for OpenWeatherProvider {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_city_weather(&self, city: &str) -> Result<CityWeather, SourceError> {
        debug!(url = CURRENT_URL, "requesting OpenWeather");

        let res = self
            .http
            .get(CURRENT_URL)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::transport(PROVIDER, e))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| SourceError::transport(PROVIDER, e))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_current(city, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    #[test]
    fn parses_current_weather() {
        let body = r#"{
            "dt": 1718196600,
            "name": "Paris",
            "main": {"temp": 18.4, "feels_like": 17.9, "pressure": 1021, "humidity": 60},
            "weather": [{"id": 800, "description": "ciel dégagé", "icon": "01d"}],
            "wind": {"speed": 4.1, "deg": 270}
        }"#;
        let weather = parse_current("Paris", body).expect("valid payload");

        assert_eq!(weather.city, "Paris");
        assert_eq!(weather.description, "ciel dégagé");
        assert_eq!(weather.pressure_hpa, 1021.0);
        assert_eq!(weather.wind_kt, 8.0);
        assert_eq!(
            weather.icon_url.as_deref(),
            Some("http://openweathermap.org/img/wn/01d@2x.png")
        );
        assert!(weather.observed_at.is_some());
    }

    #[test]
    fn wind_is_rounded_to_one_decimal() {
        assert_eq!(mps_to_knots(0.0), 0.0);
        assert_eq!(mps_to_knots(10.0), 19.4);
        assert_eq!(mps_to_knots(3.6), 7.0);
    }

    #[test]
    fn error_payload_without_main_is_empty() {
        let err = parse_current("Nowhere", r#"{"cod": "404", "message": "city not found"}"#)
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Empty);
    }
}
