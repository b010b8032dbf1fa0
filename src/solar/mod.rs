//! Solar ephemeris: sun position, sunrise/sunset and day/night classification.

pub mod ephemeris;
pub mod position;

pub use ephemeris::{
    APPARENT_HORIZON_DEG, GEOMETRIC_HORIZON_DEG, local_solar_date, sun_events, sunset_sunrise,
    sunset_sunrise_with_horizon, validate_horizon,
};
pub use position::{SolarParameters, SolarPosition, is_daylight};
