use serde::Serialize;
use thiserror::Error;

/// Why a single provider fetch produced no data.
///
/// These never cross into aggregation as errors: the observation layer turns
/// them into absent fields plus a [`SourceFailure`] diagnostic.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {provider} failed: {message}")]
    Transport { provider: &'static str, message: String },

    #[error("{provider} returned status {status}: {body}")]
    Status { provider: &'static str, status: u16, body: String },

    #[error("could not parse {provider} response: {message}")]
    Parse { provider: &'static str, message: String },

    #[error("{provider} response carried no usable data")]
    Empty { provider: &'static str },
}

impl SourceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SourceError::Transport { .. } => FailureKind::Transport,
            SourceError::Status { .. } => FailureKind::Status,
            SourceError::Parse { .. } => FailureKind::Parse,
            SourceError::Empty { .. } => FailureKind::Empty,
        }
    }

    pub(crate) fn transport(provider: &'static str, err: reqwest::Error) -> Self {
        SourceError::Transport { provider, message: err.to_string() }
    }

    pub(crate) fn parse(provider: &'static str, err: serde_json::Error) -> Self {
        SourceError::Parse { provider, message: err.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Status,
    Parse,
    Empty,
}

/// Which upstream report a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSource {
    Metar,
    Taf,
    Station,
    CityWeather,
}

impl ReportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSource::Metar => "METAR",
            ReportSource::Taf => "TAF",
            ReportSource::Station => "station",
            ReportSource::CityWeather => "city weather",
        }
    }
}

impl std::fmt::Display for ReportSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source that was unavailable for this query, kept on the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: ReportSource,
    pub kind: FailureKind,
    pub message: String,
}

impl SourceFailure {
    pub fn new(source: ReportSource, err: &SourceError) -> Self {
        Self { source, kind: err.kind(), message: err.to_string() }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_records_kind_and_message() {
        let err = SourceError::Status { provider: "avwx", status: 404, body: "not found".into() };
        let failure = SourceFailure::new(ReportSource::Taf, &err);

        assert_eq!(failure.kind, FailureKind::Status);
        assert_eq!(failure.source, ReportSource::Taf);
        assert!(failure.message.contains("404"));
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);
        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
