use std::fmt;

use predval_parser::RecordSet;

use crate::config::WindowSize;
use crate::error::{PipelineError, Result};

/// A contiguous run of integer time ticks, `start..=end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Window {
    start: i64,
    end: i64,
}

impl Window {
    pub fn new(start: i64, end: i64) -> Result<Self> {
        if start > end {
            return Err(PipelineError::InvertedWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    pub fn contains(&self, time: i64) -> bool {
        self.start <= time && time <= self.end
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Raised when the requested window is longer than the observed time span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowClamp {
    pub requested: usize,
    pub applied: usize,
}

impl fmt::Display for WindowClamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Window size is bigger than observation period. Using window size of {} instead.",
            self.applied
        )
    }
}

/// The ordered windows of one run, ascending by start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowPlan {
    windows: Vec<Window>,
    clamp: Option<WindowClamp>,
}

impl WindowPlan {
    /// Plans windows over the time span of the actual observations.
    pub fn for_records(actual: &RecordSet, size: WindowSize) -> Self {
        match actual.time_bounds() {
            Some((t_min, t_max)) => generate_windows(t_min, t_max, size),
            None => Self::default(),
        }
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.windows.iter()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn clamp(&self) -> Option<&WindowClamp> {
        self.clamp.as_ref()
    }
}

impl<'a> IntoIterator for &'a WindowPlan {
    type Item = &'a Window;
    type IntoIter = std::slice::Iter<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Slides a `size`-tick frame one tick at a time across `t_min..=t_max`.
///
/// A size longer than the span is clamped to the span (one window, with the
/// clamp recorded on the plan). `t_min > t_max` is an empty span and yields
/// no windows.
pub fn generate_windows(t_min: i64, t_max: i64, size: WindowSize) -> WindowPlan {
    if t_min > t_max {
        return WindowPlan::default();
    }

    // i128 keeps the span and window ends exact even across the full i64 range.
    let span = i128::from(t_max) - i128::from(t_min) + 1;
    let requested = size.get();
    let (applied, clamp) = match usize::try_from(span) {
        Ok(span) if requested > span => (span, Some(WindowClamp { requested, applied: span })),
        _ => (requested, None),
    };

    let width = applied as i128 - 1;
    let last_start = i128::from(t_max) - width;
    let windows = (i128::from(t_min)..=last_start)
        .map(|start| Window {
            start: start as i64,
            end: (start + width) as i64,
        })
        .collect();

    WindowPlan { windows, clamp }
}
