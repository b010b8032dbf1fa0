//! Aligned glider profile arrays, read from JSON for the command-line tool.
//!
//! Missing samples are `null` in the file and become NaN in memory.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

use crate::error::{CorrectionError, ensure_len};

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse profile JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Shape(#[from] CorrectionError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub time: Vec<DateTime<Utc>>,
    pub latitude: Vec<f64>,
    pub longitude: Vec<f64>,
    depth: Vec<Option<f64>>,
    #[serde(default)]
    bbp: Option<Vec<Option<f64>>>,
    #[serde(default)]
    flr: Option<Vec<Option<f64>>>,
    #[serde(default)]
    par: Option<Vec<Option<f64>>>,
}

impl Profile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Profile, ProfileError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let profile: Profile = serde_json::from_reader(reader)?;
        profile.validate()?;

        Ok(profile)
    }

    /// Every series must be aligned with `time`.
    pub fn validate(&self) -> Result<(), CorrectionError> {
        let n = self.time.len();
        ensure_len("latitude", n, self.latitude.len())?;
        ensure_len("longitude", n, self.longitude.len())?;
        ensure_len("depth", n, self.depth.len())?;

        for (name, series) in [("bbp", &self.bbp), ("flr", &self.flr), ("par", &self.par)] {
            if let Some(series) = series {
                ensure_len(name, n, series.len())?;
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn depth(&self) -> Vec<f64> {
        to_nan(&self.depth)
    }

    pub fn bbp(&self) -> Option<Vec<f64>> {
        self.bbp.as_deref().map(to_nan)
    }

    pub fn flr(&self) -> Option<Vec<f64>> {
        self.flr.as_deref().map(to_nan)
    }

    pub fn par(&self) -> Option<Vec<f64>> {
        self.par.as_deref().map(to_nan)
    }
}

fn to_nan(series: &[Option<f64>]) -> Vec<f64> {
    series.iter().map(|v| v.unwrap_or(f64::NAN)).collect()
}
