use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::Password;
use tracing::debug;
use weather_ops_core::{
    CeilingPolicy, Config, ObservationService, ProviderId,
    provider::{aviation_provider_from_config, city_provider_from_config},
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxops", version, about = "Live METAR / TAF briefing with VFR/IFR analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key for a provider.
    Configure {
        /// Provider short name: "avwx" or "openweather".
        provider: String,
    },

    /// Show the current weather situation for an airport.
    Show {
        /// ICAO airport code, e.g. LFPG, KLAX, EGLL.
        icao: String,

        /// Also show OpenWeather conditions for this city.
        #[arg(long)]
        city: Option<String>,

        /// How to pick the ceiling from the reported cloud layers.
        #[arg(long, value_enum, default_value_t = CeilingArg::First)]
        ceiling: CeilingArg,

        /// Print the observation as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CeilingArg {
    /// First reported layer with a base.
    First,
    /// Lowest base among all layers.
    Lowest,
}

impl From<CeilingArg> for CeilingPolicy {
    fn from(arg: CeilingArg) -> Self {
        match arg {
            CeilingArg::First => CeilingPolicy::FirstReported,
            CeilingArg::Lowest => CeilingPolicy::Lowest,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { icao, city, ceiling, json } => {
                show(&icao, city.as_deref(), ceiling.into(), json).await
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_provider_api_key(id, api_key.trim().to_string());
    config.save()?;

    println!("Saved {id} credentials to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(
    icao: &str,
    city: Option<&str>,
    policy: CeilingPolicy,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    config.apply_env_overrides();

    let mut service =
        ObservationService::new(aviation_provider_from_config(&config)?).with_ceiling_policy(policy);

    if city.is_some() {
        service = service.with_city_provider(city_provider_from_config(&config)?);
    }

    debug!(icao, ?city, "running observation");
    let observation = service.observe(icao, city).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&observation)?);
    } else {
        print!("{}", render::briefing(&observation));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_options() {
        let cli = Cli::try_parse_from(["wxops", "show", "lfpg", "--city", "Paris", "--ceiling", "lowest"])
            .expect("valid args");

        match cli.command {
            Command::Show { icao, city, ceiling, json } => {
                assert_eq!(icao, "lfpg");
                assert_eq!(city.as_deref(), Some("Paris"));
                assert_eq!(CeilingPolicy::from(ceiling), CeilingPolicy::Lowest);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn ceiling_defaults_to_first_reported() {
        let cli = Cli::try_parse_from(["wxops", "show", "EGLL"]).expect("valid args");

        let Command::Show { ceiling, .. } = cli.command else {
            panic!("expected show");
        };
        assert_eq!(CeilingPolicy::from(ceiling), CeilingPolicy::FirstReported);
    }

    #[test]
    fn show_requires_an_icao_code() {
        assert!(Cli::try_parse_from(["wxops", "show"]).is_err());
    }
}
