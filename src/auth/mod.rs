//! Session authentication.
//!
//! A four-state machine guards the shell: `AwaitingUsername` and
//! `AwaitingPassword` collect credentials through the line editor,
//! `Checking` defers the hash-and-scan to the next timer tick, and
//! `Authenticated` runs the inactivity countdown. The credential scan hashes
//! the typed password once and compares it against every user record with a
//! constant-time digest comparison.

pub mod password;

pub use password::{PasswordHasher, Sha256Hasher, HASH_LEN};

use heapless::String;
use subtle::ConstantTimeEq;

use crate::config::{ShellConfig, MAX_PASSWORD_LEN, MAX_USERNAME_LEN};
use crate::error::CliError;
use crate::shell::editor::{LineBuffer, LineEvent, StringKind};

/// One entry in the user table.
#[derive(Debug, Clone)]
pub struct UserRecord {
    username: String<MAX_USERNAME_LEN>,
    password_hash: [u8; HASH_LEN],
    admin: bool,
}

impl UserRecord {
    /// Create a user record from a username and a password digest.
    pub fn new(username: &str, password_hash: [u8; HASH_LEN], admin: bool) -> Result<Self, CliError> {
        let mut name = String::new();
        name.push_str(username).map_err(|_| CliError::BufferFull)?;
        Ok(Self { username: name, password_hash, admin })
    }

    /// The record's username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether this user gets administrator commands.
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}

/// Authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Collecting the username.
    AwaitingUsername,
    /// Collecting the password.
    AwaitingPassword,
    /// Credentials submitted; verification runs on the next tick.
    Checking,
    /// Session is open.
    Authenticated,
}

/// Reaction to one inbound byte while unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// Byte dropped.
    None,
    /// Echo this byte (`*` while typing the password).
    Echo(u8),
    /// Username terminated; print the password prompt.
    PasswordPrompt,
    /// Password terminated; echo the line break and wait for verification.
    Submitted,
}

/// State transition reported by the timer path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials matched a user record.
    SignedIn { admin: bool },
    /// Credentials matched nothing; back to the login prompt.
    Failed,
    /// The inactivity countdown expired.
    TimedOut,
}

/// Per-session authentication state.
#[derive(Debug)]
pub struct Session {
    state: AuthState,
    username: LineBuffer<MAX_USERNAME_LEN>,
    password: LineBuffer<MAX_PASSWORD_LEN>,
    admin: bool,
    signout_remaining: u32,
    accum_ms: u32,
}

impl Session {
    /// Create a session awaiting login.
    pub fn new() -> Self {
        Self {
            state: AuthState::AwaitingUsername,
            username: LineBuffer::new(),
            password: LineBuffer::new(),
            admin: false,
            signout_remaining: 0,
            accum_ms: 0,
        }
    }

    /// Current authentication state.
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// True once a login has completed.
    pub fn is_authenticated(&self) -> bool {
        self.state == AuthState::Authenticated
    }

    /// True for an open administrator session.
    pub fn is_admin(&self) -> bool {
        self.state == AuthState::Authenticated && self.admin
    }

    /// Username of the signed-in user (empty when unauthenticated).
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Reload the inactivity countdown. Called for every authenticated
    /// inbound byte.
    pub fn touch(&mut self, config: &ShellConfig) {
        self.signout_remaining = config.effective_signout_secs();
    }

    /// Drop back to `AwaitingUsername` and wipe both credential buffers.
    /// Idempotent.
    pub fn reset(&mut self) {
        self.state = AuthState::AwaitingUsername;
        self.username.clear();
        self.password.clear();
        self.admin = false;
        self.accum_ms = 0;
    }

    /// Route one inbound byte through the credential editors.
    ///
    /// Only meaningful before authentication; `Checking` and
    /// `Authenticated` drop everything.
    pub fn process_byte(&mut self, ch: u8) -> AuthEvent {
        match self.state {
            AuthState::AwaitingUsername => {
                match self.username.consume(ch, StringKind::Username) {
                    LineEvent::None => AuthEvent::None,
                    LineEvent::Echo(c) => AuthEvent::Echo(c),
                    LineEvent::Newline => {
                        self.state = AuthState::AwaitingPassword;
                        AuthEvent::PasswordPrompt
                    }
                }
            }
            AuthState::AwaitingPassword => {
                match self.password.consume(ch, StringKind::Password) {
                    LineEvent::None => AuthEvent::None,
                    LineEvent::Echo(c) => AuthEvent::Echo(c),
                    LineEvent::Newline => {
                        self.state = AuthState::Checking;
                        AuthEvent::Submitted
                    }
                }
            }
            AuthState::Checking | AuthState::Authenticated => AuthEvent::None,
        }
    }

    /// One-hertz timer tick: runs the deferred credential check and the
    /// inactivity countdown.
    pub fn tick<H: PasswordHasher>(
        &mut self,
        hasher: &H,
        config: &ShellConfig,
    ) -> Option<AuthOutcome> {
        match self.state {
            AuthState::Checking => Some(self.check(hasher, config)),
            AuthState::Authenticated => {
                self.signout_remaining = self.signout_remaining.saturating_sub(1);
                if self.signout_remaining == 0 {
                    self.reset();
                    Some(AuthOutcome::TimedOut)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Cooperative variant of [`tick`](Self::tick): accumulates elapsed
    /// milliseconds and consumes whole seconds from the countdown.
    pub fn poll<H: PasswordHasher>(
        &mut self,
        elapsed_ms: u32,
        hasher: &H,
        config: &ShellConfig,
    ) -> Option<AuthOutcome> {
        match self.state {
            AuthState::Checking => {
                self.accum_ms = 0;
                Some(self.check(hasher, config))
            }
            AuthState::Authenticated => {
                self.accum_ms = self.accum_ms.saturating_add(elapsed_ms);
                while self.accum_ms >= 1000 {
                    self.accum_ms -= 1000;
                    self.signout_remaining = self.signout_remaining.saturating_sub(1);
                    if self.signout_remaining == 0 {
                        self.reset();
                        return Some(AuthOutcome::TimedOut);
                    }
                }
                None
            }
            _ => {
                self.accum_ms = 0;
                None
            }
        }
    }

    fn check<H: PasswordHasher>(&mut self, hasher: &H, config: &ShellConfig) -> AuthOutcome {
        let digest = hasher.hash(self.password.as_str().as_bytes());
        for user in config.users() {
            let hash_match: bool = digest.ct_eq(&user.password_hash).into();
            if hash_match && user.username() == self.username.as_str() {
                self.admin = user.is_admin();
                self.password.clear();
                self.state = AuthState::Authenticated;
                self.touch(config);
                return AuthOutcome::SignedIn { admin: self.admin };
            }
        }
        self.reset();
        AuthOutcome::Failed
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
