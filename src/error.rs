//! Error types for shell operations.

use core::fmt;

/// Errors returned by shell configuration and registration operations.
///
/// Command handlers never produce a `CliError`; anything a handler wants the
/// operator to see goes into its output text. These errors cover resource
/// exhaustion and misuse of the host-facing API only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliError {
    /// An input buffer reached capacity.
    BufferFull,
    /// The command dispatch queue (or pending slot) is occupied.
    QueueFull,
    /// The user table is full.
    TooManyUsers,
    /// A terminal context has no room for another command slot.
    TooManyCommands,
    /// The terminal context stack is at maximum nesting depth.
    ContextStackFull,
    /// A sub-application is already running.
    AppAlreadyRunning,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::BufferFull => write!(f, "Input buffer full"),
            CliError::QueueFull => write!(f, "Command queue full"),
            CliError::TooManyUsers => write!(f, "User table full"),
            CliError::TooManyCommands => write!(f, "Too many commands in terminal context"),
            CliError::ContextStackFull => write!(f, "Terminal context stack full"),
            CliError::AppAlreadyRunning => write!(f, "A sub-application is already running"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CliError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            CliError::BufferFull => defmt::write!(f, "BufferFull"),
            CliError::QueueFull => defmt::write!(f, "QueueFull"),
            CliError::TooManyUsers => defmt::write!(f, "TooManyUsers"),
            CliError::TooManyCommands => defmt::write!(f, "TooManyCommands"),
            CliError::ContextStackFull => defmt::write!(f, "ContextStackFull"),
            CliError::AppAlreadyRunning => defmt::write!(f, "AppAlreadyRunning"),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use std::format;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", CliError::QueueFull), "Command queue full");
        assert_eq!(format!("{}", CliError::BufferFull), "Input buffer full");
        assert_eq!(
            format!("{}", CliError::AppAlreadyRunning),
            "A sub-application is already running"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(CliError::QueueFull, CliError::QueueFull);
        assert_ne!(CliError::QueueFull, CliError::BufferFull);
    }
}
