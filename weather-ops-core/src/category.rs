//! Flight-category grading from visibility and ceiling.

use serde::{Serialize, Serializer};

/// Standard flight-rule grades.
///
/// Ordering follows conservativeness: `Lifr < Ifr < Mvfr < Vfr`.
/// `InsufficientData` sorts below every determined grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlightCategory {
    InsufficientData,
    Lifr,
    Ifr,
    Mvfr,
    Vfr,
}

const VFR_MIN: (f64, f64) = (5000.0, 1500.0);
const MVFR_MIN: (f64, f64) = (3000.0, 1000.0);
const IFR_MIN: (f64, f64) = (1600.0, 500.0);

/// Grade a visibility (metres) and ceiling (feet AGL).
///
/// Thresholds are inclusive lower bounds checked from VFR down; a missing
/// value yields [`FlightCategory::InsufficientData`].
pub fn classify(visibility_m: Option<f64>, ceiling_ft: Option<f64>) -> FlightCategory {
    let (Some(vis), Some(ceil)) = (visibility_m, ceiling_ft) else {
        return FlightCategory::InsufficientData;
    };

    let meets = |(min_vis, min_ceil): (f64, f64)| vis >= min_vis && ceil >= min_ceil;

    if meets(VFR_MIN) {
        FlightCategory::Vfr
    } else if meets(MVFR_MIN) {
        FlightCategory::Mvfr
    } else if meets(IFR_MIN) {
        FlightCategory::Ifr
    } else {
        FlightCategory::Lifr
    }
}

impl FlightCategory {
    pub fn code(&self) -> &'static str {
        match self {
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
            FlightCategory::InsufficientData => "INSUFFICIENT_DATA",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FlightCategory::Vfr => "VFR (Visual Flight Rules)",
            FlightCategory::Mvfr => "MVFR (Marginal VFR)",
            FlightCategory::Ifr => "IFR (Instrument Flight Rules)",
            FlightCategory::Lifr => "LIFR (Low IFR)",
            FlightCategory::InsufficientData => "Insufficient data",
        }
    }

    pub fn is_determined(&self) -> bool {
        !matches!(self, FlightCategory::InsufficientData)
    }
}

impl std::fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for FlightCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
