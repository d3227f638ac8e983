//! ANSI SGR escape sequences used by the terminal output.
//!
//! Only the sequences the shell actually emits are defined here. All output
//! assumes a VT100-compatible terminal on the other end of the serial link.

/// Black foreground.
pub const BLACK: &str = "\x1b[30m";
/// Red foreground.
pub const RED: &str = "\x1b[31m";
/// Magenta foreground.
pub const MAGENTA: &str = "\x1b[35m";
/// Cyan foreground.
pub const CYAN: &str = "\x1b[36m";
/// White background.
pub const BG_WHITE: &str = "\x1b[47m";
/// Reset all attributes.
pub const RESET: &str = "\x1b[0m";

/// Line terminator for everything the shell prints.
pub const NEWLINE: &str = "\r\n";
