use serde::{Deserialize, Deserializer};

use crate::error::CorrectionError;

/// A percentile in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Percentile(pub(crate) f64);

impl Percentile {
    pub const MEDIAN: Percentile = Percentile(50.0);

    pub fn new(value: f64) -> Result<Self, CorrectionError> {
        if !(0.0..=100.0).contains(&value) {
            return Err(CorrectionError::InvalidPercentile(value));
        }
        Ok(Percentile(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

impl TryFrom<f64> for Percentile {
    type Error = CorrectionError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Percentile::new(value)
    }
}

impl<'de> Deserialize<'de> for Percentile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Percentile::new(value).map_err(serde::de::Error::custom)
    }
}

/// Lifts a raw sample into the optional form used by the percentile routine.
/// Not-a-number marks a missing sample.
#[inline]
pub fn present(value: f64) -> Option<f64> {
    if value.is_nan() { None } else { Some(value) }
}

/// Percentile of the present samples, interpolating linearly between the two
/// closest ranks (rank = p * (n - 1)).
///
/// Returns `None` when no sample is present.
pub fn nan_percentile<I>(samples: I, percentile: Percentile) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut sorted: Vec<f64> = samples.into_iter().flatten().collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let rank = percentile.fraction() * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(value: f64) -> Percentile {
        Percentile::new(value).unwrap()
    }

    #[test]
    fn test_percentile_bounds() {
        assert!(Percentile::new(0.0).is_ok());
        assert!(Percentile::new(100.0).is_ok());
        assert_eq!(
            Percentile::new(100.5),
            Err(CorrectionError::InvalidPercentile(100.5))
        );
        assert!(Percentile::new(-1.0).is_err());
        assert!(Percentile::new(f64::NAN).is_err());

        assert_eq!(Percentile::try_from(5.0_f64).map(|p| p.value()), Ok(5.0));
        assert_eq!(
            Percentile::try_from(-0.5_f64),
            Err(CorrectionError::InvalidPercentile(-0.5))
        );
    }

    #[test]
    fn test_linear_interpolation_matches_closest_ranks() {
        let values = [4.0, 1.0, 3.0, 2.0].map(Some);

        assert_eq!(nan_percentile(values, p(0.0)), Some(1.0));
        assert_eq!(nan_percentile(values, p(100.0)), Some(4.0));
        assert_eq!(nan_percentile(values, p(50.0)), Some(2.5));

        // rank = 0.05 * 3 = 0.15
        let p5 = nan_percentile(values, p(5.0)).unwrap();
        assert!((p5 - 1.15).abs() < 1e-12, "Expected 1.15, got {p5}");
    }

    #[test]
    fn test_missing_samples_are_skipped() {
        let values = [f64::NAN, 10.0, f64::NAN, 20.0].map(present);
        assert_eq!(nan_percentile(values, Percentile::MEDIAN), Some(15.0));
    }

    #[test]
    fn test_no_present_samples() {
        let values = [f64::NAN, f64::NAN].map(present);
        assert_eq!(nan_percentile(values, Percentile::MEDIAN), None);
        assert_eq!(nan_percentile(Vec::new(), Percentile::MEDIAN), None);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range() {
        let ok: Percentile = serde_json::from_str("95").unwrap();
        assert_eq!(ok.value(), 95.0);

        let err = serde_json::from_str::<Percentile>("150").unwrap_err();
        assert!(err.to_string().contains("outside [0, 100]"), "{err}");
    }
}
