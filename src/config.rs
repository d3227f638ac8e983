//! Capacity constants and runtime shell configuration.
//!
//! Buffer sizes are fixed at compile time so the whole shell can live in a
//! static or on the stack of the task that owns it. Runtime configuration
//! covers the user table, the inactivity timeout and the command set of the
//! root terminal context.

use heapless::Vec;

use crate::auth::UserRecord;
use crate::command::Command;
use crate::error::CliError;

/// Maximum length of a command line (and of any single input record).
pub const MAX_COMMAND_LEN: usize = 256;

/// An input line at rest: in the dispatch queue or the history ring.
pub type CmdLine = heapless::String<MAX_COMMAND_LEN>;

/// Maximum length of one response chunk produced by a command handler.
pub const MAX_RESPONSE_LEN: usize = 1024;

/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 16;

/// Maximum password length.
pub const MAX_PASSWORD_LEN: usize = 16;

/// Maximum number of entries in the user table.
pub const MAX_USERS: usize = 4;

/// Depth of the command dispatch queue in queued mode.
pub const CMD_QUEUE_DEPTH: usize = 4;

/// Input history records kept per terminal context (circular, oldest wins).
pub const HISTORY_RECORDS: usize = 16;

/// Maximum command slots per terminal context, built-ins included.
pub const MAX_COMMANDS: usize = 24;

/// Maximum terminal context nesting depth.
pub const MAX_CONTEXTS: usize = 8;

/// Inactivity sign-out applied when the configured timeout is zero.
pub const DEFAULT_SIGNOUT_SECS: u32 = 60;

/// Sub-application cycle delay when no work is pending, in milliseconds.
pub const APP_IDLE_DELAY_MS: u32 = 1;

/// Runtime configuration handed to the shell at construction.
pub struct ShellConfig {
    users: Vec<UserRecord, MAX_USERS>,
    /// Seconds of inactivity before automatic sign-out. Zero selects
    /// [`DEFAULT_SIGNOUT_SECS`].
    pub signout_secs: u32,
    /// Commands registered into the root terminal context on sign-in.
    pub root_commands: &'static [&'static dyn Command],
}

impl ShellConfig {
    /// Create an empty configuration with the default inactivity timeout.
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            signout_secs: DEFAULT_SIGNOUT_SECS,
            root_commands: &[],
        }
    }

    /// Add a user record to the table.
    pub fn add_user(&mut self, user: UserRecord) -> Result<(), CliError> {
        self.users.push(user).map_err(|_| CliError::TooManyUsers)
    }

    /// Registered user records.
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// Effective inactivity timeout in seconds.
    pub fn effective_signout_secs(&self) -> u32 {
        if self.signout_secs == 0 {
            DEFAULT_SIGNOUT_SECS
        } else {
            self.signout_secs
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ShellConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShellConfig")
            .field("users", &self.users.len())
            .field("signout_secs", &self.signout_secs)
            .field("root_commands", &self.root_commands.len())
            .finish()
    }
}
