//! Dark-count correction for glider optics and the solar ephemeris it
//! relies on for day/night windows.

pub mod config;
pub mod error;
pub mod optics;
pub mod profile;
pub mod solar;

pub use error::{CorrectionError, PolarCondition};
pub use optics::{Percentile, backscatter_dark_count, fluorescence_dark_count, par_dark_count};
pub use solar::sunset_sunrise;
