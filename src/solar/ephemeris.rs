use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use log::debug;

use super::position::SolarParameters;
use crate::error::{CorrectionError, PolarCondition, ensure_len};

/// Geometric horizon: the centre of the solar disc at altitude zero.
pub const GEOMETRIC_HORIZON_DEG: f64 = 0.0;
/// Apparent horizon: refraction plus the solar semi-diameter.
pub const APPARENT_HORIZON_DEG: f64 = -0.833;

/// Refinement passes re-evaluating declination and equation of time at the
/// current event estimate.
const REFINEMENT_PASSES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HorizonEvent {
    Sunrise,
    Sunset,
}

/// Sunrise and sunset for every `(time, lat, lon)` entry, solved on the
/// local solar date of each timestamp against the geometric horizon.
///
/// The pair brackets the entry's own local day, so a sunrise may fall on the
/// previous UTC date east of Greenwich and a sunset on the next UTC date west
/// of it.
///
/// Fails on the first entry that has no horizon crossing (polar day or
/// polar night).
pub fn sunset_sunrise(
    time: &[DateTime<Utc>],
    lat: &[f64],
    lon: &[f64],
) -> Result<(Vec<DateTime<Utc>>, Vec<DateTime<Utc>>), CorrectionError> {
    sunset_sunrise_with_horizon(time, lat, lon, GEOMETRIC_HORIZON_DEG)
}

pub fn sunset_sunrise_with_horizon(
    time: &[DateTime<Utc>],
    lat: &[f64],
    lon: &[f64],
    horizon_deg: f64,
) -> Result<(Vec<DateTime<Utc>>, Vec<DateTime<Utc>>), CorrectionError> {
    ensure_len("lat", time.len(), lat.len())?;
    ensure_len("lon", time.len(), lon.len())?;

    let mut sunrise = Vec::with_capacity(time.len());
    let mut sunset = Vec::with_capacity(time.len());

    for (index, ((instant, &latitude), &longitude)) in time.iter().zip(lat).zip(lon).enumerate() {
        let (rise, set) = sun_events(index, *instant, latitude, longitude, horizon_deg)?;
        sunrise.push(rise);
        sunset.push(set);
    }

    Ok((sunrise, sunset))
}

/// Sunrise and sunset on the local solar date of `instant` for a single
/// location.
///
/// Longitudes in `[-180, 360]` are accepted and wrapped onto `[-180, 180)`.
/// `index` only labels the entry in a returned error.
pub fn sun_events(
    index: usize,
    instant: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    horizon_deg: f64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), CorrectionError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=360.0).contains(&longitude) {
        return Err(CorrectionError::InvalidCoordinate {
            index,
            latitude,
            longitude,
        });
    }
    validate_horizon(horizon_deg)?;

    let date = local_solar_date(instant, longitude);
    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    let solar_longitude = wrap_longitude(longitude);
    let solve = |event: HorizonEvent| {
        event_minutes(midnight, latitude, solar_longitude, horizon_deg, event).map_err(
            |condition| CorrectionError::UndefinedHorizonEvent {
                index,
                date,
                latitude,
                longitude,
                condition,
            },
        )
    };

    let rise = solve(HorizonEvent::Sunrise)?;
    let set = solve(HorizonEvent::Sunset)?;

    debug!(
        "entry {index}: {date} lat {latitude} lon {longitude}: rise {rise:.1} min, set {set:.1} min"
    );

    Ok((offset_minutes(midnight, rise), offset_minutes(midnight, set)))
}

/// Calendar date in local mean solar time, 15 degrees of longitude per hour
/// east of Greenwich.
pub fn local_solar_date(instant: DateTime<Utc>, longitude: f64) -> NaiveDate {
    offset_minutes(instant, 4.0 * wrap_longitude(longitude)).date_naive()
}

/// Rejects horizon angles at or beyond the zenith or nadir.
pub fn validate_horizon(horizon_deg: f64) -> Result<(), CorrectionError> {
    if horizon_deg.is_nan() || horizon_deg.abs() >= 90.0 {
        return Err(CorrectionError::InvalidHorizon(horizon_deg));
    }
    Ok(())
}

fn wrap_longitude(longitude: f64) -> f64 {
    (longitude + 180.0).rem_euclid(360.0) - 180.0
}

/// Minutes after `midnight` at which the sun crosses `horizon_deg`.
fn event_minutes(
    midnight: DateTime<Utc>,
    latitude: f64,
    longitude: f64,
    horizon_deg: f64,
    event: HorizonEvent,
) -> Result<f64, PolarCondition> {
    let sign = match event {
        HorizonEvent::Sunrise => -1.0,
        HorizonEvent::Sunset => 1.0,
    };

    let lat = latitude.to_radians();
    let mut minutes = 720.0 - 4.0 * longitude;

    for _ in 0..REFINEMENT_PASSES {
        let params = SolarParameters::at(offset_minutes(midnight, minutes));
        let dec = params.declination_deg.to_radians();

        let cos_hour_angle =
            (horizon_deg.to_radians().sin() - lat.sin() * dec.sin()) / (lat.cos() * dec.cos());
        if cos_hour_angle > 1.0 {
            return Err(PolarCondition::PolarNight);
        }
        if cos_hour_angle < -1.0 || cos_hour_angle.is_nan() {
            return Err(PolarCondition::PolarDay);
        }

        let hour_angle_deg = cos_hour_angle.acos().to_degrees();
        let solar_noon = 720.0 - 4.0 * longitude - params.equation_of_time_min;
        minutes = solar_noon + sign * 4.0 * hour_angle_deg;
    }

    Ok(minutes)
}

fn offset_minutes(origin: DateTime<Utc>, minutes: f64) -> DateTime<Utc> {
    origin + Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solar::SolarPosition;
    use chrono::Timelike;

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
            .and_utc()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
    }

    fn minutes_of_day(t: DateTime<Utc>) -> f64 {
        t.num_seconds_from_midnight() as f64 / 60.0
    }

    #[test]
    fn test_sunrise_earlier_in_southern_summer() {
        let time = [day(2000, 1, 1), day(2000, 1, 2), day(2000, 1, 3)];
        let lat = [-35.0, 35.0, 45.0];
        let lon = [0.0, 0.0, 0.0];

        let (sunrise, sunset) = sunset_sunrise(&time, &lat, &lon).unwrap();

        assert_eq!(sunrise.len(), lat.len());
        assert_eq!(sunset.len(), lat.len());
        assert!(sunrise[0] < sunrise[1]);

        // Each event lies on its own entry's date
        for (i, t) in time.iter().enumerate() {
            assert_eq!(sunrise[i].date_naive(), t.date_naive());
            assert!(sunrise[i] < sunset[i]);
        }
    }

    #[test]
    fn test_polar_day_fails() {
        let time = [day(2000, 12, 21), day(2000, 6, 21)];
        let lat = [-80.0, 80.0];
        let lon = [0.0, 0.0];

        let err = sunset_sunrise(&time, &lat, &lon).unwrap_err();
        assert_eq!(
            err,
            CorrectionError::UndefinedHorizonEvent {
                index: 0,
                date: NaiveDate::from_ymd_opt(2000, 12, 21).unwrap(),
                latitude: -80.0,
                longitude: 0.0,
                condition: PolarCondition::PolarDay,
            }
        );

        // The northern entry fails on its own as well
        let err = sunset_sunrise(&time[1..], &lat[1..], &lon[1..]).unwrap_err();
        assert!(matches!(
            err,
            CorrectionError::UndefinedHorizonEvent {
                index: 0,
                condition: PolarCondition::PolarDay,
                ..
            }
        ));
    }

    #[test]
    fn test_polar_night_fails() {
        let err = sunset_sunrise(&[day(2000, 12, 21)], &[80.0], &[0.0]).unwrap_err();
        assert!(matches!(
            err,
            CorrectionError::UndefinedHorizonEvent {
                condition: PolarCondition::PolarNight,
                ..
            }
        ));
    }

    #[test]
    fn test_altitude_is_zero_at_events() {
        let cases = [
            (day(2000, 1, 1), -35.0, 0.0),
            (day(2000, 3, 20), 0.0, 0.0),
            (day(2018, 12, 1), -54.0, 30.0),
        ];

        for (t, latitude, longitude) in cases {
            let (rise, set) = sun_events(0, t, latitude, longitude, 0.0).unwrap();
            for event in [rise, set] {
                let altitude = SolarPosition::calculate(event, latitude, longitude)
                    .altitude_angle_deg;
                assert!(
                    altitude.abs() < 0.05,
                    "Expected ~0° at {event} for lat {latitude}, got {altitude:.4}°"
                );
            }
        }
    }

    #[test]
    fn test_equinox_equator_twelve_hour_day() {
        let (rise, set) = sun_events(0, day(2000, 3, 20), 0.0, 0.0, 0.0).unwrap();
        let length = (set - rise).num_minutes();
        assert!((715..=725).contains(&length), "day length {length} min");
        // Equation of time is about -7.4 min
        let rise_min = minutes_of_day(rise);
        assert!((rise_min - 367.4).abs() < 2.0, "sunrise at {rise_min:.1} min");
    }

    #[test]
    fn test_apparent_horizon_london_midsummer() {
        // NOAA: 03:43 UTC sunrise, 20:21 UTC sunset
        let (sunrise, sunset) =
            sunset_sunrise_with_horizon(&[day(2000, 6, 21)], &[51.5], &[0.0], APPARENT_HORIZON_DEG)
                .unwrap();
        assert!((minutes_of_day(sunrise[0]) - 222.6).abs() < 3.0);
        assert!((minutes_of_day(sunset[0]) - 1221.0).abs() < 3.0);
    }

    #[test]
    fn test_eastern_longitude_rises_earlier() {
        let date = day(2018, 12, 1);
        let (greenwich, _) = sun_events(0, date, -54.0, 0.0, 0.0).unwrap();
        let (east, _) = sun_events(0, date, -54.0, 30.0, 0.0).unwrap();
        let shift = (greenwich - east).num_minutes();
        assert!((119..=121).contains(&shift), "shift {shift} min");
    }

    #[test]
    fn test_shape_and_coordinate_errors() {
        let err = sunset_sunrise(&[day(2000, 1, 1)], &[10.0, 20.0], &[0.0]).unwrap_err();
        assert!(matches!(err, CorrectionError::ShapeMismatch { name: "lat", .. }));

        let err = sunset_sunrise(&[day(2000, 1, 1)], &[95.0], &[0.0]).unwrap_err();
        assert!(matches!(err, CorrectionError::InvalidCoordinate { index: 0, .. }));
    }

    #[test]
    fn test_out_of_range_longitude_is_rejected() {
        for longitude in [1.0e13, -1.0e13, 360.5, -180.5, f64::NAN, f64::INFINITY] {
            let err = sunset_sunrise(&[day(2018, 12, 1)], &[0.0], &[longitude]).unwrap_err();
            assert!(
                matches!(err, CorrectionError::InvalidCoordinate { index: 0, .. }),
                "lon {longitude}: {err}"
            );
        }
    }

    #[test]
    fn test_longitude_wraps_past_antimeridian() {
        let t = utc(2018, 12, 1, 20, 0);
        let (west, _) = sun_events(0, t, 0.0, -170.0, 0.0).unwrap();
        let (wrapped, _) = sun_events(0, t, 0.0, 190.0, 0.0).unwrap();
        assert_eq!(west, wrapped);
    }

    #[test]
    fn test_horizon_must_stay_below_zenith() {
        for horizon_deg in [95.0, -90.0, f64::NAN] {
            let err = sun_events(0, day(2018, 12, 1), 0.0, 0.0, horizon_deg).unwrap_err();
            assert!(
                matches!(err, CorrectionError::InvalidHorizon(_)),
                "horizon {horizon_deg}: {err}"
            );
        }
    }

    #[test]
    fn test_events_bracket_local_day_far_from_greenwich() {
        // 20:00 UTC is 07:20 on Dec 2 at 170E and 08:40 on Dec 1 at 170W
        let t = utc(2018, 12, 1, 20, 0);
        let cases = [
            (170.0, NaiveDate::from_ymd_opt(2018, 12, 2).unwrap()),
            (-170.0, NaiveDate::from_ymd_opt(2018, 12, 1).unwrap()),
        ];

        for (longitude, local_date) in cases {
            assert_eq!(local_solar_date(t, longitude), local_date);

            let (sunrise, sunset) = sunset_sunrise(&[t], &[0.0], &[longitude]).unwrap();
            for event in [sunrise[0], sunset[0]] {
                assert_eq!(local_solar_date(event, longitude), local_date, "lon {longitude}");
            }

            // The sun is well up, so the sample lies between its events
            let altitude = SolarPosition::calculate(t, 0.0, longitude).altitude_angle_deg;
            assert!(altitude > 20.0, "lon {longitude}: altitude {altitude:.2}");
            assert!(sunrise[0] < t && t < sunset[0], "lon {longitude}: {sunrise:?} {sunset:?}");
        }
    }

    #[test]
    fn test_local_solar_date() {
        let t = utc(2018, 12, 1, 23, 0);
        assert_eq!(local_solar_date(t, 0.0), t.date_naive());
        assert_eq!(
            local_solar_date(t, 30.0),
            NaiveDate::from_ymd_opt(2018, 12, 2).unwrap()
        );
        assert_eq!(local_solar_date(t, 350.0), t.date_naive());
    }

    #[test]
    fn test_empty_input() {
        let (sunrise, sunset) = sunset_sunrise(&[], &[], &[]).unwrap();
        assert!(sunrise.is_empty());
        assert!(sunset.is_empty());
    }
}
