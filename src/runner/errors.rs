use std::error::Error;

use owo_colors::{OwoColorize, Stream};

/// Counts and prints the failures reported while processing the input.
#[derive(Debug, Default)]
pub struct Diagnostics {
    error_count: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    /// Reports a failure concerning `subject` (usually the expression being processed).
    pub fn error(&mut self, subject: &str, error: &dyn Error) {
        self.error_count += 1;
        print_error(subject, error);
    }
}

fn print_error(subject: &str, error: &dyn Error) {
    let level = format!(
        "{}",
        "ERROR".if_supports_color(Stream::Stderr, |text| text.bright_red())
    );
    eprintln!("{} `{}`: {}", level, subject, error);

    let mut source = error.source();

    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
}
