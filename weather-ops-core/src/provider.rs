use crate::{
    Config,
    error::SourceError,
    model::{CityWeather, RawReport, StationInfo},
    provider::{avwx::AvwxProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use std::{convert::TryFrom, fmt::Debug};

pub mod avwx;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Avwx,
    OpenWeather,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Avwx => "avwx",
            ProviderId::OpenWeather => "openweather",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::Avwx, ProviderId::OpenWeather]
    }

    /// Environment variable that may carry this provider's credential.
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderId::Avwx => "AVWX_TOKEN",
            ProviderId::OpenWeather => "OPENWEATHER_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "avwx" => Ok(ProviderId::Avwx),
            "openweather" => Ok(ProviderId::OpenWeather),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: avwx, openweather."
            )),
        }
    }
}

/// Airport report source: METAR, TAF and station metadata.
#[async_trait]
pub trait AviationProvider: Send + Sync + Debug {
    async fn fetch_current(&self, identifier: &str) -> Result<RawReport, SourceError>;

    async fn fetch_forecast(&self, identifier: &str) -> Result<RawReport, SourceError>;

    async fn fetch_station(&self, identifier: &str) -> Result<StationInfo, SourceError>;
}

/// General weather for a named city.
#[async_trait]
pub trait CityWeatherProvider: Send + Sync + Debug {
    async fn fetch_city_weather(&self, city: &str) -> Result<CityWeather, SourceError>;
}

fn http_client(config: &Config) -> anyhow::Result<Client> {
    Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))
}

fn api_key(id: ProviderId, config: &Config) -> anyhow::Result<String> {
    config.provider_api_key(id).map(str::to_owned).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `wxops configure {id}` or set {}.",
            id.env_var()
        )
    })
}

pub fn aviation_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn AviationProvider>> {
    let token = api_key(ProviderId::Avwx, config)?;
    Ok(Box::new(AvwxProvider::new(token, http_client(config)?)))
}

pub fn city_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn CityWeatherProvider>> {
    let key = api_key(ProviderId::OpenWeather, config)?;
    Ok(Box::new(OpenWeatherProvider::new(
        key,
        config.language().to_string(),
        http_client(config)?,
    )))
}
