//! # bastion-shell
//!
//! Interactive command shell for embedded network security appliances,
//! with zero heap allocation.
//!
//! **Key features:**
//! - **Static allocation** - All buffers bounded at compile time via `heapless`
//! - **Authenticated sessions** - Login state machine, hashed credentials,
//!   inactivity sign-out
//! - **Nested terminals** - Stackable command contexts with `do`/`exit`/
//!   `signout`/`help` built-ins
//! - **Sub-applications** - Long-running programs can borrow the byte stream,
//!   BREAK always returns it
//! - **Host-driven** - No tasks, no blocking; byte ingestion and time are
//!   pushed in by the firmware (RTOS tasks or a bare-metal main loop)
//!
//! The shell never reads the transport itself: the host feeds received bytes
//! into [`Shell::feed`] and drives execution from its own context, either a
//! dedicated command task ([`Shell::process_next`]) or a cooperative
//! [`Shell::poll`] loop.
//!
//! ## Optional Features
//!
//! - `defmt` - structured logging of session and dispatch events
//!
//! This library is `no_std` compatible.

#![no_std]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

extern crate heapless;
extern crate sha2;
extern crate subtle;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod ansi;
pub mod app;
pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod io;
pub mod shell;
pub mod terminal;
pub mod validate;

// ============================================================================
// Re-exports - Public API
// ============================================================================

// Core I/O
pub use io::CharIo;

// Configuration
pub use config::ShellConfig;

// Error types
pub use error::CliError;

// Authentication
pub use auth::{AuthState, PasswordHasher, Session, Sha256Hasher, UserRecord};

// Commands and terminals
pub use command::{CmdOutput, Command, OutputBuf, Services};
pub use terminal::Registry;

// Sub-applications
pub use app::{AppRunner, SubApp};

// Shell orchestration
pub use shell::{DispatchMode, KeyButton, Shell};

// ============================================================================
// Library Metadata
// ============================================================================

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    // No tests needed - all public APIs tested in their respective modules
}
