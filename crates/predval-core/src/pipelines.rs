use std::io::Write;

use predval_parser::{normalize_table, NormalizeStats, RawTable, RecordSet};
use tracing::{debug, info, warn};

use crate::aggregate::{evaluate_window, WindowBreakdown};
use crate::config::WindowSize;
use crate::error::Result;
use crate::outputs::{format_result, write_result};
use crate::window::{Window, WindowClamp, WindowPlan};

/// Both cleaned record sets plus the windows to evaluate over them.
#[derive(Debug, Clone)]
pub struct Validation {
    actual: RecordSet,
    predicted: RecordSet,
    plan: WindowPlan,
    actual_stats: NormalizeStats,
    predicted_stats: NormalizeStats,
}

impl Validation {
    /// Normalizes both tables and plans windows over the actual time span.
    pub fn prepare(actual: &RawTable, predicted: &RawTable, window_size: WindowSize) -> Self {
        let actual = normalize_table(actual);
        let predicted = normalize_table(predicted);
        let plan = WindowPlan::for_records(&actual.records, window_size);

        Self {
            actual: actual.records,
            predicted: predicted.records,
            plan,
            actual_stats: actual.stats,
            predicted_stats: predicted.stats,
        }
    }

    pub fn plan(&self) -> &WindowPlan {
        &self.plan
    }

    /// Per-window results in window order, computed lazily.
    pub fn results(&self) -> impl Iterator<Item = (Window, WindowBreakdown)> + '_ {
        self.plan
            .iter()
            .map(move |window| (*window, evaluate_window(&self.actual, &self.predicted, window)))
    }

    /// Formatted output lines (without terminators) in window order.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.results()
            .map(|(window, breakdown)| format_result(&window, &breakdown.error))
    }

    /// Streams every result line into `sink`, returning the run summary.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<RunSummary> {
        let time_range = self.actual.time_bounds();

        if let Some(clamp) = self.plan.clamp() {
            warn!(
                requested = clamp.requested,
                applied = clamp.applied,
                "{clamp}"
            );
        }

        match time_range {
            Some((t_min, t_max)) => info!(
                windows = self.plan.len(),
                t_min, t_max, "Starting window averages"
            ),
            None => info!("No actual observations; nothing to average"),
        }

        let mut windows_written = 0usize;
        for (window, breakdown) in self.results() {
            debug!(
                window = %window,
                matched = breakdown.matched,
                actual_only = breakdown.actual_only,
                predicted_only = breakdown.predicted_only,
                error = %breakdown.error,
                "Averaged window"
            );
            write_result(sink, &window, &breakdown.error)?;
            windows_written += 1;
        }
        sink.flush()?;

        info!(windows_written, "Finished window averages");

        Ok(RunSummary {
            windows_written,
            time_range,
            clamp: self.plan.clamp().copied(),
            actual_stats: self.actual_stats,
            predicted_stats: self.predicted_stats,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub windows_written: usize,
    pub time_range: Option<(i64, i64)>,
    pub clamp: Option<WindowClamp>,
    pub actual_stats: NormalizeStats,
    pub predicted_stats: NormalizeStats,
}

impl RunSummary {
    pub fn warning(&self) -> Option<String> {
        self.clamp.map(|clamp| clamp.to_string())
    }
}

/// Runs the whole validation: window size first, then normalization,
/// planning and aggregation. `open_sink` is only called once the window size
/// is valid, so a bad size never creates or truncates the output.
pub fn run_validation<W, F>(
    actual: &RawTable,
    predicted: &RawTable,
    raw_window_size: &str,
    open_sink: F,
) -> Result<RunSummary>
where
    W: Write,
    F: FnOnce() -> std::io::Result<W>,
{
    let window_size = WindowSize::from_window_file(raw_window_size)?;
    let validation = Validation::prepare(actual, predicted, window_size);
    let mut sink = open_sink()?;
    validation.write_to(&mut sink)
}
