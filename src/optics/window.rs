use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::error::CorrectionError;

/// Open depth interval `(lower, upper)` in metres, positive downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBand {
    lower: f64,
    upper: f64,
}

impl DepthBand {
    pub const BACKSCATTER: DepthBand = DepthBand {
        lower: 200.0,
        upper: 400.0,
    };
    pub const FLUORESCENCE: DepthBand = DepthBand {
        lower: 300.0,
        upper: 400.0,
    };

    pub fn new(lower: f64, upper: f64) -> Result<Self, CorrectionError> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(CorrectionError::InvalidDepthBand { lower, upper });
        }
        Ok(DepthBand { lower, upper })
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[inline]
    pub fn contains(&self, depth: f64) -> bool {
        self.lower < depth && depth < self.upper
    }
}

impl fmt::Display for DepthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "depth band ({} m, {} m)", self.lower, self.upper)
    }
}

impl<'de> Deserialize<'de> for DepthBand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct DepthBandHelper {
            lower: f64,
            upper: f64,
        }

        let helper = DepthBandHelper::deserialize(deserializer)?;
        DepthBand::new(helper.lower, helper.upper).map_err(serde::de::Error::custom)
    }
}

/// Marks the samples whose depth lies strictly inside `band`.
///
/// Missing depths are never selected.
pub fn depth_window(depth: &[f64], band: DepthBand) -> Vec<bool> {
    depth.iter().map(|&d| band.contains(d)).collect()
}
