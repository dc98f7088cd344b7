//! Trailing-horizon return calculations over an ordered value series

use crate::core::error::SourceError;
use serde::Serialize;
use std::fmt::Display;

/// Observations between the latest value and its one-week reference.
/// Trading observations, not calendar days.
const WEEK_OFFSET: usize = 5;

/// A trailing comparison window over which a percentage change is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    OneDay,
    OneWeek,
    OneMonth,
}

impl Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Horizon::OneDay => "1D",
                Horizon::OneWeek => "1W",
                Horizon::OneMonth => "1M",
            }
        )
    }
}

/// Latest value plus percentage changes over the fixed trailing horizons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnMetrics {
    pub current: f64,
    pub change_1d_pct: f64,
    pub change_1w_pct: f64,
    pub change_1m_pct: f64,
}

/// Rounds to 2 decimal places, halfway cases away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Selects the comparison value for one horizon.
///
/// A series shorter than the horizon degrades to the best available
/// reference instead of erroring: the 1-day reference falls back to the
/// latest value itself, the 1-week reference to the oldest observation.
/// The 1-month reference is always the oldest observation, however short
/// the series.
///
/// `values` must be non-empty and ordered oldest to newest.
pub fn reference_value(values: &[f64], horizon: Horizon) -> f64 {
    let last = values.len() - 1;
    match horizon {
        Horizon::OneDay => {
            if last >= 1 {
                values[last - 1]
            } else {
                values[last]
            }
        }
        Horizon::OneWeek => {
            if last >= WEEK_OFFSET {
                values[last - WEEK_OFFSET]
            } else {
                values[0]
            }
        }
        Horizon::OneMonth => values[0],
    }
}

/// Computes percentage changes of the latest value against each horizon's
/// reference, rounded to 2 decimal places.
///
/// The latest value is the last element. An empty series is `NoData`; a
/// zero-valued reference at any horizon is `ZeroReference`, never a NaN or
/// infinite change.
pub fn compute(values: &[f64]) -> Result<ReturnMetrics, SourceError> {
    let Some(&current) = values.last() else {
        return Err(SourceError::NoData);
    };

    let change = |horizon: Horizon| -> Result<f64, SourceError> {
        let reference = reference_value(values, horizon);
        if reference == 0.0 {
            return Err(SourceError::ZeroReference(horizon));
        }
        Ok(round2((current - reference) / reference * 100.0))
    };

    Ok(ReturnMetrics {
        current,
        change_1d_pct: change(Horizon::OneDay)?,
        change_1w_pct: change(Horizon::OneWeek)?,
        change_1m_pct: change(Horizon::OneMonth)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_observation_yields_zero_changes() {
        let metrics = compute(&[42.0]).unwrap();
        assert_eq!(metrics.current, 42.0);
        assert_eq!(metrics.change_1d_pct, 0.0);
        assert_eq!(metrics.change_1w_pct, 0.0);
        assert_eq!(metrics.change_1m_pct, 0.0);
    }

    #[test]
    fn test_short_series_falls_back_to_oldest() {
        let metrics = compute(&[100.0, 105.0, 110.0]).unwrap();
        assert_eq!(metrics.current, 110.0);
        assert_eq!(metrics.change_1d_pct, 4.76);
        // Week and month both degrade to the oldest observation.
        assert_eq!(metrics.change_1w_pct, 10.0);
        assert_eq!(metrics.change_1m_pct, 10.0);
    }

    #[test]
    fn test_week_reference_boundary_at_length_six() {
        let values = [90.0, 91.0, 92.0, 93.0, 94.0, 95.0];
        assert_eq!(reference_value(&values, Horizon::OneWeek), 90.0);

        let metrics = compute(&values).unwrap();
        assert_eq!(metrics.change_1w_pct, 5.56);
        assert_eq!(metrics.change_1m_pct, 5.56);
    }

    #[test]
    fn test_week_reference_boundary_at_length_five() {
        // One short of the full offset: degrades to the oldest observation.
        let values = [91.0, 92.0, 93.0, 94.0, 95.0];
        assert_eq!(reference_value(&values, Horizon::OneWeek), 91.0);
        assert_eq!(compute(&values).unwrap().change_1w_pct, 4.40);
    }

    #[test]
    fn test_week_reference_at_length_seven() {
        let values = [89.0, 90.0, 91.0, 92.0, 93.0, 94.0, 95.0];
        assert_eq!(reference_value(&values, Horizon::OneWeek), 90.0);
        assert_eq!(reference_value(&values, Horizon::OneMonth), 89.0);
        assert_eq!(reference_value(&values, Horizon::OneDay), 94.0);
    }

    #[test]
    fn test_negative_changes() {
        let metrics = compute(&[110.0, 105.0, 100.0]).unwrap();
        assert_eq!(metrics.change_1d_pct, -4.76);
        assert_eq!(metrics.change_1m_pct, -9.09);
    }

    #[test]
    fn test_zero_reference_is_an_error() {
        let err = compute(&[0.0, 5.0]).unwrap_err();
        assert!(matches!(err, SourceError::ZeroReference(Horizon::OneDay)));

        let err = compute(&[0.0, 4.0, 5.0]).unwrap_err();
        assert!(matches!(err, SourceError::ZeroReference(Horizon::OneWeek)));
        assert_eq!(err.to_string(), "zero reference price at 1W horizon");
    }

    #[test]
    fn test_empty_series_is_no_data() {
        assert!(matches!(compute(&[]), Err(SourceError::NoData)));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1.236), 1.24);
        assert_eq!(round2(-1.236), -1.24);
        assert_eq!(round2(10.0), 10.0);
    }
}
