//! Dark-count correction for glider optical channels
//!
//! Backscatter and fluorescence are corrected against a depth band assumed
//! free of signal. PAR is corrected against deep samples taken at night.

pub mod dark_count;
pub mod percentile;
pub mod window;

pub use dark_count::{
    Channel, DarkCountCorrector, ParOptions, backscatter_dark_count, correct,
    fluorescence_dark_count, noise_floor, par_dark_count, par_noise_floor, subtract_floor,
};
pub use percentile::{Percentile, nan_percentile, present};
pub use window::{DepthBand, depth_window};
