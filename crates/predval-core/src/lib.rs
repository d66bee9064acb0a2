pub mod aggregate;
pub mod config;
pub mod error;
pub mod outputs;
pub mod pipelines;
pub mod window;

pub use aggregate::{
    compute_error, evaluate_window, join_window, KeyOutcome, WindowBreakdown, WindowError,
};
pub use config::WindowSize;
pub use error::{PipelineError, Result};
pub use outputs::{format_result, write_result};
pub use pipelines::{run_validation, RunSummary, Validation};
pub use window::{generate_windows, Window, WindowClamp, WindowPlan};
