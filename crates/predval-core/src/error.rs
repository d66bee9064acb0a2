// crates/predval-core/src/error.rs

use predval_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Window size is missing: expected a single integer on the first line")]
    MissingWindowSize,

    #[error("Window size must be a single integer, got '{0}'")]
    InvalidWindowSize(String),

    #[error("Window size must be at least 1, got {0}")]
    WindowSizeTooSmall(i64),

    #[error("Window start {start} is after end {end}")]
    InvertedWindow { start: i64, end: i64 },

    #[error("Input parsing failed: {0}")]
    Parser(#[from] ParserError),

    #[error("Output I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Window-size problems, raised before any output is produced.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingWindowSize
                | PipelineError::InvalidWindowSize(_)
                | PipelineError::WindowSizeTooSmall(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
