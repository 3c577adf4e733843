//! Core library for the `wxops` aviation weather briefing.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Report providers (AVWX for METAR/TAF/stations, OpenWeather for city weather)
//! - Visibility/ceiling extraction and flight-category classification
//! - The merged observation handed to front-ends
//!
//! It is used by `weather-ops-cli`, but can also be reused by other binaries or services.

pub mod category;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod observation;
pub mod provider;

pub use category::{FlightCategory, classify};
pub use config::{Config, ProviderConfig};
pub use error::{FailureKind, ReportSource, SourceError, SourceFailure};
pub use extract::{CeilingPolicy, FieldReadings, extract_fields};
pub use model::{CityWeather, Coordinates, ObservationAggregate, RawReport, ReportText, StationInfo};
pub use observation::{ObservationService, assemble, normalize_identifier};
pub use provider::{AviationProvider, CityWeatherProvider, ProviderId};
