//! Solar position from the NOAA solar calculator equations
//! (<https://gml.noaa.gov/grad/solcalc/calcdetails.html>).
//!
//! Declination and the equation of time are evaluated for a UTC instant.
//! Hour angle and altitude then follow from the observer's latitude and
//! longitude.

use chrono::{DateTime, Timelike, Utc};

/// Julian day of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian day of J2000.0.
const J2000_JD: f64 = 2_451_545.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;
const MS_PER_DAY: f64 = 86_400_000.0;

/// Sun-only quantities, independent of the observer.
#[derive(Debug, Clone, Copy)]
pub struct SolarParameters {
    pub declination_deg: f64,
    /// Apparent minus mean solar time, in minutes.
    pub equation_of_time_min: f64,
}

impl SolarParameters {
    pub fn at(instant: DateTime<Utc>) -> Self {
        let julian_day = instant.timestamp_millis() as f64 / MS_PER_DAY + UNIX_EPOCH_JD;
        let t = (julian_day - J2000_JD) / DAYS_PER_CENTURY;

        let mean_longitude = (280.46646 + t * (36000.76983 + t * 0.0003032)).rem_euclid(360.0);
        let mean_anomaly = 357.52911 + t * (35999.05029 - 0.0001537 * t);
        let eccentricity = 0.016708634 - t * (0.000042037 + 0.0000001267 * t);

        let m = mean_anomaly.to_radians();
        let equation_of_center = m.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
            + (2.0 * m).sin() * (0.019993 - 0.000101 * t)
            + (3.0 * m).sin() * 0.000289;

        let omega = (125.04 - 1934.136 * t).to_radians();
        let apparent_longitude =
            mean_longitude + equation_of_center - 0.00569 - 0.00478 * omega.sin();

        let mean_obliquity =
            23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - t * 0.001813))) / 60.0) / 60.0;
        let obliquity = (mean_obliquity + 0.00256 * omega.cos()).to_radians();

        let declination = (obliquity.sin() * apparent_longitude.to_radians().sin()).asin();

        let y = (obliquity / 2.0).tan().powi(2);
        let l0 = mean_longitude.to_radians();
        let e = eccentricity;
        let equation_of_time = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
            + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
            - 0.5 * y * y * (4.0 * l0).sin()
            - 1.25 * e * e * (2.0 * m).sin();

        SolarParameters {
            declination_deg: declination.to_degrees(),
            equation_of_time_min: 4.0 * equation_of_time.to_degrees(),
        }
    }
}

/// Sun position seen from one location at one instant.
#[derive(Debug, Clone)]
pub struct SolarPosition {
    pub declination_deg: f64,
    pub equation_of_time_min: f64,
    /// Negative in the morning, zero at local solar noon.
    pub hour_angle_deg: f64,
    pub altitude_angle_deg: f64,
    pub zenith_angle_deg: f64,
}

impl SolarPosition {
    /// # Arguments
    /// * `instant` - UTC time of observation
    /// * `latitude` - Latitude in decimal degrees (-90 to +90)
    /// * `longitude` - Longitude in decimal degrees, east positive
    pub fn calculate(instant: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        let params = SolarParameters::at(instant);

        let minutes_utc = instant.num_seconds_from_midnight() as f64 / 60.0
            + instant.nanosecond() as f64 / 60.0e9;
        let true_solar_time =
            (minutes_utc + params.equation_of_time_min + 4.0 * longitude).rem_euclid(1440.0);
        let hour_angle_deg = true_solar_time / 4.0 - 180.0;

        let lat = latitude.to_radians();
        let dec = params.declination_deg.to_radians();
        let sin_altitude =
            lat.sin() * dec.sin() + lat.cos() * dec.cos() * hour_angle_deg.to_radians().cos();
        let altitude_angle_deg = sin_altitude.clamp(-1.0, 1.0).asin().to_degrees();

        SolarPosition {
            declination_deg: params.declination_deg,
            equation_of_time_min: params.equation_of_time_min,
            hour_angle_deg,
            altitude_angle_deg,
            zenith_angle_deg: 90.0 - altitude_angle_deg,
        }
    }
}

/// Whether the sun is above `horizon_deg` at the given place and time.
pub fn is_daylight(
    instant: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    horizon_deg: f64,
) -> bool {
    SolarPosition::calculate(instant, latitude, longitude).altitude_angle_deg > horizon_deg
}
