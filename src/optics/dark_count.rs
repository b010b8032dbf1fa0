//! Dark-count correction.
//!
//! A single scalar noise floor is estimated as a percentile of reference
//! samples (a depth band, or deep night-time samples for PAR) and subtracted
//! from the whole series. Results below zero are clamped to zero; missing
//! samples stay missing.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Deserializer};
use std::fmt::{self, Display};

use super::percentile::{Percentile, nan_percentile, present};
use super::window::{DepthBand, depth_window};
use crate::error::{CorrectionError, ensure_len};
use crate::solar::{GEOMETRIC_HORIZON_DEG, sun_events, validate_horizon};

/// Channels corrected against a depth band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Backscatter,
    Fluorescence,
}

impl Channel {
    pub fn default_band(&self) -> DepthBand {
        match self {
            Channel::Backscatter => DepthBand::BACKSCATTER,
            Channel::Fluorescence => DepthBand::FLUORESCENCE,
        }
    }
}

impl Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Backscatter => write!(f, "bbp"),
            Channel::Fluorescence => write!(f, "flr"),
        }
    }
}

/// Depth-band corrector for one channel.
#[derive(Debug, Clone, Copy)]
pub struct DarkCountCorrector {
    pub band: DepthBand,
    pub percentile: Percentile,
}

impl DarkCountCorrector {
    pub fn new(band: DepthBand, percentile: Percentile) -> Self {
        Self { band, percentile }
    }

    pub fn for_channel(channel: Channel, percentile: Percentile) -> Self {
        Self::new(channel.default_band(), percentile)
    }

    pub fn noise_floor(&self, values: &[f64], depth: &[f64]) -> Result<f64, CorrectionError> {
        ensure_len("depth", values.len(), depth.len())?;
        let mask = depth_window(depth, self.band);
        floor_in(values, &mask, self.percentile, &self.band)
    }

    pub fn apply(&self, values: &[f64], depth: &[f64]) -> Result<Vec<f64>, CorrectionError> {
        let floor = self.noise_floor(values, depth)?;
        Ok(subtract_floor(values, floor))
    }
}

/// Options for the night-time PAR reference window.
#[derive(Debug, Clone, Copy)]
pub struct ParOptions {
    /// Only samples at or below this percentile of the profile depths are
    /// used as reference.
    pub depth_percentile: Percentile,
    /// Solar altitude separating day from night.
    pub horizon_deg: f64,
}

impl ParOptions {
    pub fn new(depth_percentile: Percentile, horizon_deg: f64) -> Result<Self, CorrectionError> {
        validate_horizon(horizon_deg)?;
        Ok(Self {
            depth_percentile,
            horizon_deg,
        })
    }
}

impl Default for ParOptions {
    fn default() -> Self {
        Self {
            depth_percentile: Percentile(90.0),
            horizon_deg: GEOMETRIC_HORIZON_DEG,
        }
    }
}

impl<'de> Deserialize<'de> for ParOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ParOptionsHelper {
            depth_percentile: Option<Percentile>,
            horizon_deg: Option<f64>,
        }

        let helper = ParOptionsHelper::deserialize(deserializer)?;
        let defaults = ParOptions::default();
        ParOptions::new(
            helper.depth_percentile.unwrap_or(defaults.depth_percentile),
            helper.horizon_deg.unwrap_or(defaults.horizon_deg),
        )
        .map_err(serde::de::Error::custom)
    }
}

/// Noise floor of `values[mask]`, ignoring missing samples.
pub fn noise_floor(
    values: &[f64],
    mask: &[bool],
    percentile: Percentile,
) -> Result<f64, CorrectionError> {
    ensure_len("mask", values.len(), mask.len())?;
    floor_in(values, mask, percentile, &"selection mask")
}

/// Subtracts the noise floor of `values[mask]` from every sample and clamps
/// the result at zero.
pub fn correct(
    values: &[f64],
    mask: &[bool],
    percentile: Percentile,
) -> Result<Vec<f64>, CorrectionError> {
    let floor = noise_floor(values, mask, percentile)?;
    Ok(subtract_floor(values, floor))
}

pub fn backscatter_dark_count(
    bbp: &[f64],
    depth: &[f64],
    percentile: f64,
) -> Result<Vec<f64>, CorrectionError> {
    DarkCountCorrector::for_channel(Channel::Backscatter, Percentile::try_from(percentile)?)
        .apply(bbp, depth)
}

pub fn fluorescence_dark_count(
    flr: &[f64],
    depth: &[f64],
    percentile: f64,
) -> Result<Vec<f64>, CorrectionError> {
    DarkCountCorrector::for_channel(Channel::Fluorescence, Percentile::try_from(percentile)?)
        .apply(flr, depth)
}

/// PAR dark count from deep night-time samples.
///
/// A sample is night-time when its instant falls before sunrise or after
/// sunset of its own local solar day at its location. Of those, only samples at or
/// below the `options.depth_percentile` depth of the profile are used.
pub fn par_dark_count(
    par: &[f64],
    depth: &[f64],
    time: &[DateTime<Utc>],
    lat: &[f64],
    lon: &[f64],
    percentile: f64,
    options: &ParOptions,
) -> Result<Vec<f64>, CorrectionError> {
    let floor = par_noise_floor(par, depth, time, lat, lon, percentile, options)?;
    Ok(subtract_floor(par, floor))
}

/// Noise floor of the PAR reference samples selected by [`par_dark_count`].
pub fn par_noise_floor(
    par: &[f64],
    depth: &[f64],
    time: &[DateTime<Utc>],
    lat: &[f64],
    lon: &[f64],
    percentile: f64,
    options: &ParOptions,
) -> Result<f64, CorrectionError> {
    let percentile = Percentile::try_from(percentile)?;
    let n = par.len();
    ensure_len("depth", n, depth.len())?;
    ensure_len("time", n, time.len())?;
    ensure_len("lat", n, lat.len())?;
    ensure_len("lon", n, lon.len())?;

    let window = format!(
        "night-time samples below the {}th depth percentile",
        options.depth_percentile.value()
    );

    let usable_depths = par
        .iter()
        .zip(depth)
        .map(|(&p, &d)| if p.is_nan() { None } else { present(d) });
    let min_depth = nan_percentile(usable_depths, options.depth_percentile)
        .ok_or_else(|| CorrectionError::EmptyWindow {
            window: window.clone(),
        })?;

    let mut mask = Vec::with_capacity(n);
    for (index, instant) in time.iter().enumerate() {
        let (sunrise, sunset) =
            sun_events(index, *instant, lat[index], lon[index], options.horizon_deg)?;
        let night = *instant < sunrise || *instant > sunset;
        mask.push(night && depth[index] >= min_depth);
    }

    debug!("par: reference depth >= {min_depth:.1} m");

    floor_in(par, &mask, percentile, &window)
}

fn floor_in(
    values: &[f64],
    mask: &[bool],
    percentile: Percentile,
    window: &dyn Display,
) -> Result<f64, CorrectionError> {
    let selected = values
        .iter()
        .zip(mask)
        .filter(|&(_, &selected)| selected)
        .map(|(&v, _)| present(v));

    let floor = nan_percentile(selected, percentile).ok_or_else(|| {
        CorrectionError::EmptyWindow {
            window: window.to_string(),
        }
    })?;

    debug!(
        "noise floor {floor} from {} ({} of {} samples, p{})",
        window,
        mask.iter().filter(|&&m| m).count(),
        values.len(),
        percentile.value()
    );

    Ok(floor)
}

/// Subtracts an already estimated `floor` from every sample and clamps the
/// result at zero. Missing samples stay missing.
pub fn subtract_floor(values: &[f64], floor: f64) -> Vec<f64> {
    let corrected: Vec<f64> = values
        .iter()
        .map(|&v| if v.is_nan() { v } else { (v - floor).max(0.0) })
        .collect();

    let clamped = values
        .iter()
        .filter(|&&v| !v.is_nan() && v - floor < 0.0)
        .count();
    if clamped > 0 {
        debug!("{clamped} samples below the noise floor clamped to zero");
    }

    corrected
}
