use std::fmt;
use std::str::FromStr;

use crate::error::{PipelineError, Result};

/// Number of consecutive time ticks per window. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowSize(usize);

impl WindowSize {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(PipelineError::WindowSizeTooSmall(0));
        }
        Ok(Self(size))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    /// Parses the window-size file contents. Only the first line is read;
    /// surrounding whitespace is allowed, anything else is rejected.
    pub fn from_window_file(contents: &str) -> Result<Self> {
        let first_line = contents.lines().next().unwrap_or_default();
        if first_line.trim().is_empty() {
            return Err(PipelineError::MissingWindowSize);
        }
        first_line.parse()
    }
}

impl FromStr for WindowSize {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::MissingWindowSize);
        }

        let value = trimmed
            .parse::<i64>()
            .map_err(|_| PipelineError::InvalidWindowSize(trimmed.to_string()))?;
        if value < 1 {
            return Err(PipelineError::WindowSizeTooSmall(value));
        }

        let size = usize::try_from(value)
            .map_err(|_| PipelineError::InvalidWindowSize(trimmed.to_string()))?;
        Self::new(size)
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
