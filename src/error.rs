use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Why a location has no sunrise or sunset on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarCondition {
    /// The sun never drops below the horizon.
    PolarDay,
    /// The sun never rises above the horizon.
    PolarNight,
}

impl fmt::Display for PolarCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolarCondition::PolarDay => write!(f, "polar day"),
            PolarCondition::PolarNight => write!(f, "polar night"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrectionError {
    #[error("array length mismatch: `{name}` has {actual} samples, expected {expected}")]
    ShapeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("no valid reference samples in {window}")]
    EmptyWindow { window: String },
    #[error(
        "no sunrise/sunset at entry {index} ({date}, lat {latitude}, lon {longitude}): {condition}"
    )]
    UndefinedHorizonEvent {
        index: usize,
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
        condition: PolarCondition,
    },
    #[error("percentile {0} is outside [0, 100]")]
    InvalidPercentile(f64),
    #[error("invalid depth band ({lower}, {upper}): lower must be finite and below upper")]
    InvalidDepthBand { lower: f64, upper: f64 },
    #[error("horizon angle {0} must lie strictly between -90 and 90 degrees")]
    InvalidHorizon(f64),
    #[error("invalid coordinate at entry {index}: lat {latitude}, lon {longitude}")]
    InvalidCoordinate {
        index: usize,
        latitude: f64,
        longitude: f64,
    },
}

/// Fails with `ShapeMismatch` unless `actual` has the reference length.
pub(crate) fn ensure_len(
    name: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), CorrectionError> {
    if expected != actual {
        return Err(CorrectionError::ShapeMismatch {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}
