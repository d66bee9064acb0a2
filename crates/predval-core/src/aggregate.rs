use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

use predval_parser::RecordSet;

use crate::window::Window;

/// Where a `(time, entity)` key was seen within a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyOutcome {
    Matched { actual: f64, predicted: f64 },
    ActualOnly(f64),
    PredictedOnly(f64),
}

impl KeyOutcome {
    /// Absolute error for matched keys. One-sided keys have no error; they
    /// are neither a perfect match nor a miss against zero.
    pub fn abs_error(&self) -> Option<f64> {
        match self {
            KeyOutcome::Matched { actual, predicted } => Some((actual - predicted).abs()),
            KeyOutcome::ActualOnly(_) | KeyOutcome::PredictedOnly(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowError {
    Mean(f64),
    /// No key in the window was present on both sides.
    NotAvailable,
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowError::Mean(value) => write!(f, "{:.2}", round_half_away(*value)),
            WindowError::NotAvailable => f.write_str("NA"),
        }
    }
}

/// Two-decimal rounding with exact ties going away from zero. `{:.2}` handles
/// every non-tie correctly on its own.
fn round_half_away(value: f64) -> f64 {
    // An exact tie is an odd multiple of 1/8, so `value * 100.0` is exact too.
    let eighths = value * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        (value * 100.0).round() / 100.0
    } else {
        value
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowBreakdown {
    pub matched: usize,
    pub actual_only: usize,
    pub predicted_only: usize,
    pub error: WindowError,
}

/// Full outer join of both record sets on `(time, entity)`, restricted to
/// the window. Keys come back ordered by time, then entity.
pub fn join_window<'a>(
    actual: &'a RecordSet,
    predicted: &'a RecordSet,
    window: &Window,
) -> BTreeMap<(i64, &'a str), KeyOutcome> {
    let mut joined = BTreeMap::new();

    for obs in actual.in_time_range(window.start(), window.end()) {
        joined.insert(obs.key(), KeyOutcome::ActualOnly(obs.value));
    }

    for obs in predicted.in_time_range(window.start(), window.end()) {
        match joined.entry(obs.key()) {
            Entry::Occupied(mut slot) => {
                if let KeyOutcome::ActualOnly(actual) = *slot.get() {
                    slot.insert(KeyOutcome::Matched {
                        actual,
                        predicted: obs.value,
                    });
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(KeyOutcome::PredictedOnly(obs.value));
            }
        }
    }

    joined
}

pub fn evaluate_window(actual: &RecordSet, predicted: &RecordSet, window: &Window) -> WindowBreakdown {
    let joined = join_window(actual, predicted, window);

    let mut matched = 0usize;
    let mut actual_only = 0usize;
    let mut predicted_only = 0usize;
    let mut total = 0.0f64;

    for outcome in joined.values() {
        match outcome.abs_error() {
            Some(err) => {
                matched += 1;
                total += err;
            }
            None if matches!(outcome, KeyOutcome::ActualOnly(_)) => actual_only += 1,
            None => predicted_only += 1,
        }
    }

    let error = if matched == 0 {
        WindowError::NotAvailable
    } else {
        WindowError::Mean(total / matched as f64)
    };

    WindowBreakdown {
        matched,
        actual_only,
        predicted_only,
        error,
    }
}

/// Mean absolute error over the keys present in both sets within the window.
pub fn compute_error(actual: &RecordSet, predicted: &RecordSet, window: &Window) -> WindowError {
    evaluate_window(actual, predicted, window).error
}
