use std::fmt::Write;

use chrono::{DateTime, Utc};
use weather_ops_core::{FlightCategory, ObservationAggregate, ReportText};

const LEGEND: &str = "\
Flight rules legend:
  VFR  = Good visual conditions (>= 1500 ft & >= 5000 m)
  MVFR = Marginal visual flight
  IFR  = Instrument flight required
  LIFR = Low visibility / low ceiling conditions
";

/// Plain-text briefing for one observation.
pub fn briefing(obs: &ObservationAggregate) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", obs.station_name, obs.station_id);
    if let Some(c) = obs.coordinates {
        let _ = writeln!(out, "Location: {:.4}, {:.4}", c.latitude, c.longitude);
    }
    out.push('\n');

    let _ = writeln!(out, "Flight conditions: {}", banner(obs.category));
    let _ = writeln!(
        out,
        "Visibility: {} m, Ceiling: {} ft",
        value_or_dash(obs.visibility_m),
        value_or_dash(obs.ceiling_ft),
    );
    if let Some(at) = obs.observed_at {
        let _ = writeln!(out, "Observed: {}", format_time(at));
    }
    out.push('\n');

    report_section(&mut out, "METAR (Current observation)", obs.metar.as_ref());
    report_section(&mut out, "TAF (Aeronautical forecast)", obs.taf.as_ref());

    if let Some(w) = &obs.city_weather {
        let _ = writeln!(out, "== {} weather ==", w.city);
        let _ = writeln!(out, "{:.1} °C, {}", w.temperature_c, w.description);
        let _ = writeln!(out, "Wind {} kt, pressure {} hPa", w.wind_kt, w.pressure_hpa);
        out.push('\n');
    }

    out.push_str(LEGEND);

    if !obs.failures.is_empty() {
        out.push('\n');
        for failure in &obs.failures {
            let _ = writeln!(out, "! {} unavailable: {}", failure.source, failure.message);
        }
    }

    out
}

fn banner(category: FlightCategory) -> String {
    match category {
        FlightCategory::InsufficientData => "Unable to analyze VFR/IFR conditions".to_string(),
        other => other.description().to_string(),
    }
}

fn report_section(out: &mut String, title: &str, report: Option<&ReportText>) {
    let _ = writeln!(out, "== {title} ==");
    match report {
        Some(text) => {
            let _ = writeln!(out, "{}", text.raw);
            if !text.sanitized.is_empty() && text.sanitized != text.raw {
                let _ = writeln!(out, "  {}", text.sanitized);
            }
        }
        None => {
            let kind = title.split_whitespace().next().unwrap_or(title);
            let _ = writeln!(out, "{kind} data unavailable.");
        }
    }
    out.push('\n');
}

fn value_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v}"))
}

fn format_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%MZ").to_string()
}
