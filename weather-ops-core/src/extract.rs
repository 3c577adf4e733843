use crate::model::RawReport;

/// Values forced by a CAVOK report.
pub const CAVOK_VISIBILITY_M: f64 = 10_000.0;
pub const CAVOK_CEILING_FT: f64 = 5_000.0;

/// How to pick the ceiling out of the reported cloud layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CeilingPolicy {
    /// First layer, in provider order, that carries a base altitude.
    #[default]
    FirstReported,
    /// Lowest base altitude across all layers.
    Lowest,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldReadings {
    pub visibility_m: Option<f64>,
    pub ceiling_ft: Option<f64>,
}

/// Pull visibility and ceiling out of a current observation.
pub fn extract_fields(report: &RawReport, policy: CeilingPolicy) -> FieldReadings {
    if is_cavok(&report.raw) {
        return FieldReadings {
            visibility_m: Some(CAVOK_VISIBILITY_M),
            ceiling_ft: Some(CAVOK_CEILING_FT),
        };
    }

    let mut bases = report.clouds.iter().filter_map(|layer| layer.base_ft_agl);
    let ceiling_ft = match policy {
        CeilingPolicy::FirstReported => bases.next(),
        CeilingPolicy::Lowest => bases.reduce(f64::min),
    };

    FieldReadings { visibility_m: report.visibility_m, ceiling_ft }
}

/// True when the raw report contains a standalone `CAVOK` group.
pub fn is_cavok(raw: &str) -> bool {
    raw.split_whitespace().any(|group| group.eq_ignore_ascii_case("CAVOK"))
}
