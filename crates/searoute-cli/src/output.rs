//! Output formats and exit status helpers.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::ValueEnum;
use serde::Serialize;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    #[default]
    Text,
    /// The same JSON envelope the HTTP service returns.
    Json,
}

/// How a command finished when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Complete,
    /// Only part of the result was produced, such as a direct route without
    /// an optimized one.
    Partial,
}

impl CommandOutcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            CommandOutcome::Complete => ExitCode::SUCCESS,
            CommandOutcome::Partial => ExitCode::from(2),
        }
    }
}

/// Pretty-print a payload as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_outcome_is_not_success() {
        assert_eq!(CommandOutcome::Complete.exit_code(), ExitCode::SUCCESS);
        assert_ne!(CommandOutcome::Partial.exit_code(), ExitCode::SUCCESS);
    }
}
