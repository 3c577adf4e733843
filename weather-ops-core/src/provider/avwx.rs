use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::{debug, instrument};

use crate::{
    error::{SourceError, truncate_body},
    model::{CloudLayer, Coordinates, RawReport, StationInfo},
};

use super::AviationProvider;

const PROVIDER: &str = "avwx";
const BASE_URL: &str = "https://avwx.rest/api";

#[derive(Debug, Clone)]
pub struct AvwxProvider {
    token: String,
    http: Client,
}

impl AvwxProvider {
    pub fn new(token: String, http: Client) -> Self {
        Self { token, http }
    }

    async fn get(&self, endpoint: &str, identifier: &str) -> Result<String, SourceError> {
        let url = format!("{BASE_URL}/{endpoint}/{identifier}");
        debug!(%url, "requesting AVWX");

        let res = self
            .http
            .get(&url)
            .query(&[("token", self.token.as_str()), ("format", "json")])
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

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct AvVisibility {
    #[serde(default, deserialize_with = "lenient_f64")]
    meters_float: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AvCloud {
    #[serde(rename = "type")]
    cover: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    base_feet_agl: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AvTime {
    dt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AvReport {
    #[serde(default)]
    raw: String,
    #[serde(default)]
    sanitized: String,
    visibility: Option<AvVisibility>,
    #[serde(default)]
    clouds: Vec<AvCloud>,
    time: Option<AvTime>,
}

#[derive(Debug, Deserialize)]
struct AvStation {
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Accept a number, a numeric string or null.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn parse_report(body: &str) -> Result<RawReport, SourceError> {
    let parsed: AvReport = serde_json::from_str(body).map_err(|e| SourceError::parse(PROVIDER, e))?;

    if parsed.raw.trim().is_empty() {
        return Err(SourceError::Empty { provider: PROVIDER });
    }

    let observed_at = parsed
        .time
        .and_then(|t| t.dt)
        .and_then(|dt| DateTime::parse_from_rfc3339(&dt).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Ok(RawReport {
        raw: parsed.raw,
        sanitized: parsed.sanitized,
        visibility_m: parsed.visibility.and_then(|v| v.meters_float),
        clouds: parsed
            .clouds
            .into_iter()
            .map(|c| CloudLayer { cover: c.cover, base_ft_agl: c.base_feet_agl })
            .collect(),
        observed_at,
    })
}

fn parse_station(body: &str) -> Result<StationInfo, SourceError> {
    let parsed: AvStation =
        serde_json::from_str(body).map_err(|e| SourceError::parse(PROVIDER, e))?;

    let coordinates = match (parsed.latitude, parsed.longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
        _ => None,
    };

    Ok(StationInfo {
        name: parsed.name.unwrap_or_else(|| StationInfo::UNKNOWN_NAME.to_string()),
        coordinates,
    })
}

#[async_trait]
impl AviationProvider for AvwxProvider {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_current(&self, identifier: &str) -> Result<RawReport, SourceError> {
        let body = self.get("metar", identifier).await?;
        parse_report(&body)
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_forecast(&self, identifier: &str) -> Result<RawReport, SourceError> {
        let body = self.get("taf", identifier).await?;
        parse_report(&body)
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_station(&self, identifier: &str) -> Result<StationInfo, SourceError> {
        let body = self.get("station", identifier).await?;
        parse_station(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    const METAR_BKN: &str = r#"{
        "raw": "EGLL 121250Z 24012KT 6000 FEW015 BKN022 14/09 Q1012",
        "sanitized": "EGLL 121250Z 24012KT 6000 FEW015 BKN022 14/09 Q1012",
        "time": {"repr": "121250Z", "dt": "2024-06-12T12:50:00Z"},
        "visibility": {"repr": "6000", "value": 6000, "meters_float": 6000.0},
        "clouds": [
            {"repr": "FEW015", "type": "FEW", "base_feet_agl": 1500},
            {"repr": "BKN022", "type": "BKN", "base_feet_agl": 2200}
        ]
    }"#;

    #[test]
    fn parses_metar_payload() {
        let report = parse_report(METAR_BKN).expect("valid payload");

        assert_eq!(report.visibility_m, Some(6000.0));
        assert_eq!(report.clouds.len(), 2);
        assert_eq!(report.clouds[0].cover.as_deref(), Some("FEW"));
        assert_eq!(report.clouds[0].base_ft_agl, Some(1500.0));
        assert_eq!(
            report.observed_at.map(|t| t.to_rfc3339()),
            Some("2024-06-12T12:50:00+00:00".to_string())
        );
    }

    #[test]
    fn visibility_accepts_numeric_strings() {
        let body = r#"{"raw": "KSFO 121256Z 9SM", "visibility": {"meters_float": "14484.1"}}"#;
        let report = parse_report(body).unwrap();

        assert_eq!(report.visibility_m, Some(14484.1));
        assert!(report.clouds.is_empty());
    }

    #[test]
    fn missing_structured_fields_are_absent() {
        let body = r#"{"raw": "LFPG 121230Z 27008KT CAVOK 18/09 Q1021", "visibility": null,
                       "clouds": [{"type": "NSC", "base_feet_agl": null}]}"#;
        let report = parse_report(body).unwrap();

        assert_eq!(report.visibility_m, None);
        assert_eq!(report.clouds[0].base_ft_agl, None);
        assert_eq!(report.observed_at, None);
    }

    #[test]
    fn empty_raw_is_reported_as_empty() {
        let err = parse_report(r#"{"sanitized": ""}"#).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Empty);
    }

    #[test]
    fn malformed_json_is_a_parse_failure() {
        let err = parse_report("<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[test]
    fn station_with_coordinates() {
        let station = parse_station(
            r#"{"icao": "LFPG", "name": "Charles de Gaulle International Airport",
                "latitude": 49.012798, "longitude": 2.55}"#,
        )
        .unwrap();

        assert_eq!(station.name, "Charles de Gaulle International Airport");
        assert_eq!(
            station.coordinates,
            Some(Coordinates { latitude: 49.012798, longitude: 2.55 })
        );
    }

    #[test]
    fn station_without_name_falls_back() {
        let station = parse_station(r#"{"latitude": 49.0}"#).unwrap();

        assert_eq!(station.name, "Unknown name");
        assert_eq!(station.coordinates, None);
    }
}
