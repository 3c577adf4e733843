//! Merging the independent report fetches into one [`ObservationAggregate`].
//!
//! Every source is optional: a failed fetch leaves its fields empty and adds a
//! [`SourceFailure`], and never hides data coming from the other sources.

use tracing::{info, warn};

use crate::{
    category::{FlightCategory, classify},
    error::{ReportSource, SourceError, SourceFailure},
    extract::{CeilingPolicy, FieldReadings, extract_fields},
    model::{ObservationAggregate, RawReport, StationInfo},
    provider::{AviationProvider, CityWeatherProvider},
};

/// Trim and upper-case an airport code. No further validation is done.
pub fn normalize_identifier(identifier: &str) -> String {
    identifier.trim().to_uppercase()
}

/// Build an aggregate from already-resolved sources.
pub fn assemble(
    identifier: &str,
    current: Option<&RawReport>,
    forecast: Option<&RawReport>,
    station: Option<StationInfo>,
    policy: CeilingPolicy,
) -> ObservationAggregate {
    let readings = current.map(|report| extract_fields(report, policy)).unwrap_or_default();
    let category = match current {
        Some(_) => classify(readings.visibility_m, readings.ceiling_ft),
        None => FlightCategory::InsufficientData,
    };
    let FieldReadings { visibility_m, ceiling_ft } = readings;
    let station = station.unwrap_or_else(StationInfo::unknown);

    ObservationAggregate {
        station_id: normalize_identifier(identifier),
        station_name: station.name,
        coordinates: station.coordinates,
        metar: current.map(RawReport::text),
        taf: forecast.map(RawReport::text),
        visibility_m,
        ceiling_ft,
        category,
        observed_at: current.and_then(|r| r.observed_at),
        city_weather: None,
        failures: Vec::new(),
    }
}

/// Runs one query end to end against the configured providers.
#[derive(Debug)]
pub struct ObservationService {
    aviation: Box<dyn AviationProvider>,
    city: Option<Box<dyn CityWeatherProvider>>,
    policy: CeilingPolicy,
}

impl ObservationService {
    pub fn new(aviation: Box<dyn AviationProvider>) -> Self {
        Self { aviation, city: None, policy: CeilingPolicy::default() }
    }

    pub fn with_city_provider(mut self, city: Box<dyn CityWeatherProvider>) -> Self {
        self.city = Some(city);
        self
    }

    pub fn with_ceiling_policy(mut self, policy: CeilingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch METAR, TAF and station data for `identifier`, one after the other,
    /// plus city weather when a city and a city provider are both present.
    pub async fn observe(&self, identifier: &str, city: Option<&str>) -> ObservationAggregate {
        let id = normalize_identifier(identifier);
        let mut failures = Vec::new();

        let current = self.aviation.fetch_current(&id).await;
        let current = settle(ReportSource::Metar, &id, current, &mut failures);

        let forecast = self.aviation.fetch_forecast(&id).await;
        let forecast = settle(ReportSource::Taf, &id, forecast, &mut failures);

        let station = self.aviation.fetch_station(&id).await;
        let station = settle(ReportSource::Station, &id, station, &mut failures);

        let mut aggregate = assemble(&id, current.as_ref(), forecast.as_ref(), station, self.policy);

        if let (Some(provider), Some(name)) = (&self.city, city) {
            let result = provider.fetch_city_weather(name.trim()).await;
            aggregate.city_weather = settle(ReportSource::CityWeather, name, result, &mut failures);
        }
        aggregate.failures = failures;

        info!(
            station = %aggregate.station_id,
            category = %aggregate.category,
            failed_sources = aggregate.failures.len(),
            "observation assembled"
        );

        aggregate
    }
}

fn settle<T>(
    source: ReportSource,
    query: &str,
    result: Result<T, SourceError>,
    failures: &mut Vec<SourceFailure>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(%source, query, error = %err, "source unavailable");
            failures.push(SourceFailure::new(source, &err));
            None
        }
    }
}
