use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{category::FlightCategory, error::SourceFailure};

/// One cloud layer as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudLayer {
    /// Cover code as reported, e.g. "BKN".
    pub cover: Option<String>,
    pub base_ft_agl: Option<f64>,
}

/// Provider payload for a single METAR or TAF query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawReport {
    pub raw: String,
    pub sanitized: String,
    pub visibility_m: Option<f64>,
    /// In provider order, normally bottom-up.
    pub clouds: Vec<CloudLayer>,
    pub observed_at: Option<DateTime<Utc>>,
}

impl RawReport {
    pub fn text(&self) -> ReportText {
        ReportText { raw: self.raw.clone(), sanitized: self.sanitized.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportText {
    pub raw: String,
    pub sanitized: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    pub name: String,
    pub coordinates: Option<Coordinates>,
}

impl StationInfo {
    pub const UNKNOWN_NAME: &'static str = "Unknown name";

    pub fn unknown() -> Self {
        Self { name: Self::UNKNOWN_NAME.to_string(), coordinates: None }
    }
}

/// General city weather, as opposed to the airport report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    pub city: String,
    pub temperature_c: f64,
    pub description: String,
    pub icon_url: Option<String>,
    pub wind_kt: f64,
    pub pressure_hpa: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationAggregate {
    pub station_id: String,
    pub station_name: String,
    pub coordinates: Option<Coordinates>,
    pub metar: Option<ReportText>,
    pub taf: Option<ReportText>,
    pub visibility_m: Option<f64>,
    pub ceiling_ft: Option<f64>,
    pub category: FlightCategory,
    pub observed_at: Option<DateTime<Utc>>,
    pub city_weather: Option<CityWeather>,
    pub failures: Vec<SourceFailure>,
}
