use std::io::{self, Write};

use crate::aggregate::WindowError;
use crate::window::Window;

pub const FIELD_SEPARATOR: char = '|';

/// Renders `start|end|error` for one window, without a line terminator.
pub fn format_result(window: &Window, error: &WindowError) -> String {
    format!(
        "{start}{sep}{end}{sep}{error}",
        start = window.start(),
        end = window.end(),
        sep = FIELD_SEPARATOR,
    )
}

/// Writes one newline-terminated result line.
pub fn write_result<W: Write>(sink: &mut W, window: &Window, error: &WindowError) -> io::Result<()> {
    writeln!(sink, "{}", format_result(window, error))
}
