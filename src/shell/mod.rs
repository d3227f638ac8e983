//! Shell orchestration: byte ingestion, mode routing and command dispatch.
//!
//! `Shell` owns every piece of session state: the authentication session,
//! the terminal context stack, the sub-application runner, the escape
//! decoder and the line editor. The host pushes received bytes in through
//! [`Shell::feed`] and drives time through either the timer-task API
//! ([`Shell::auth_tick`], [`Shell::process_next`], [`Shell::app_cycle`]) or
//! the cooperative [`Shell::poll`].
//!
//! Inbound bytes route by mode: unauthenticated bytes feed the credential
//! editors, bytes during a sub-application go to the application, and
//! everything else is line editing. Submitted lines are never executed
//! inline; they land in the dispatch back end and run from the host's
//! processing context.

pub mod decoder;
pub mod editor;

pub use decoder::{KeyButton, KeyDecoder, MAX_SEQUENCE_LEN};
pub use editor::{classify, LineBuffer, LineEvent, StringKind};

use core::fmt::Write as _;

use heapless::{Deque, String};

use crate::ansi::{BG_WHITE, BLACK, MAGENTA, NEWLINE, RED, RESET};
use crate::app::{AppRunner, SubApp};
use crate::auth::{AuthEvent, AuthOutcome, PasswordHasher, Session};
use crate::command::{CmdOutput, OutputBuf, Services};
use crate::config::{CmdLine, ShellConfig, CMD_QUEUE_DEPTH, MAX_COMMAND_LEN};
use crate::error::CliError;
use crate::io::CharIo;
use crate::terminal::{write_bad_params, write_not_recognised, Builtin, Registry, Resolution};

/// How submitted lines travel from the receive path to execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// Bounded FIFO drained by a dedicated host task calling
    /// [`Shell::process_next`].
    Queued,
    /// Single pending slot drained by [`Shell::poll`].
    Polled,
}

enum Dispatch {
    Queued(Deque<CmdLine, CMD_QUEUE_DEPTH>),
    Polled(Option<CmdLine>),
}

impl Dispatch {
    fn new(mode: DispatchMode) -> Self {
        match mode {
            DispatchMode::Queued => Dispatch::Queued(Deque::new()),
            DispatchMode::Polled => Dispatch::Polled(None),
        }
    }

    /// False when the back end is full; the caller keeps the line.
    fn submit(&mut self, line: CmdLine) -> bool {
        match self {
            Dispatch::Queued(queue) => queue.push_back(line).is_ok(),
            Dispatch::Polled(slot) => {
                if slot.is_some() {
                    false
                } else {
                    *slot = Some(line);
                    true
                }
            }
        }
    }

    fn take(&mut self) -> Option<CmdLine> {
        match self {
            Dispatch::Queued(queue) => queue.pop_front(),
            Dispatch::Polled(slot) => slot.take(),
        }
    }

    fn clear(&mut self) {
        match self {
            Dispatch::Queued(queue) => queue.clear(),
            Dispatch::Polled(slot) => *slot = None,
        }
    }
}

/// Result of one execution round against a context.
enum CmdStatus {
    Done,
    More,
    SignOut,
}

/// The interactive shell.
///
/// Generic over the output sink and the password hasher; both are required
/// at construction, so a shell without I/O or credential checking cannot
/// exist. The shell itself never blocks and owns no tasks.
pub struct Shell<'app, IO: CharIo, H: PasswordHasher> {
    io: IO,
    hasher: H,
    config: ShellConfig,
    session: Session,
    registry: Registry,
    apps: AppRunner<'app>,
    decoder: KeyDecoder,
    line: LineBuffer<MAX_COMMAND_LEN>,
    dispatch: Dispatch,
    app_wait_ms: u32,
    app_accum_ms: u32,
}

impl<'app, IO: CharIo, H: PasswordHasher> Shell<'app, IO, H> {
    /// Build a shell over an output sink, a password hasher and a runtime
    /// configuration.
    pub fn new(io: IO, hasher: H, config: ShellConfig, mode: DispatchMode) -> Self {
        Self {
            io,
            hasher,
            config,
            session: Session::new(),
            registry: Registry::new(),
            apps: AppRunner::new(),
            decoder: KeyDecoder::new(),
            line: LineBuffer::new(),
            dispatch: Dispatch::new(mode),
            app_wait_ms: 0,
            app_accum_ms: 0,
        }
    }

    /// Print the greeting and the login prompt. Call once after the
    /// transport is up.
    pub fn activate(&mut self) -> Result<(), IO::Error> {
        self.io.write_str(NEWLINE)?;
        self.io.write_str("Bastion security appliance terminal")?;
        self.io.write_str(NEWLINE)?;
        self.print_login_banner()
    }

    /// Ingest one received byte.
    pub fn feed(&mut self, ch: u8) -> Result<(), IO::Error> {
        if !self.session.is_authenticated() {
            return match self.session.process_byte(ch) {
                AuthEvent::None => Ok(()),
                AuthEvent::Echo(c) => self.io.put_char(c as char),
                AuthEvent::PasswordPrompt => {
                    self.io.write_str(NEWLINE)?;
                    self.write_field_prompt("password:")
                }
                AuthEvent::Submitted => self.io.write_str(NEWLINE),
            };
        }

        // Any authenticated traffic holds the session open.
        self.session.touch(&self.config);
        let key = self.decoder.feed(ch);

        if self.apps.is_running() {
            match key {
                KeyButton::Wait => {}
                KeyButton::None => {
                    if !self.apps.dispatch_char(ch) {
                        self.apps.terminate();
                    }
                }
                other => {
                    if !self.apps.dispatch_key(other) {
                        self.apps.terminate();
                    }
                }
            }
            return Ok(());
        }

        match key {
            KeyButton::None => match self.line.consume(ch, StringKind::Command) {
                LineEvent::None => Ok(()),
                LineEvent::Echo(c) => self.io.put_char(c as char),
                LineEvent::Newline => {
                    let mut submitted = CmdLine::new();
                    let _ = submitted.push_str(self.line.as_str());
                    // On a full back end the line stays in the editor.
                    if self.dispatch.submit(submitted) {
                        self.line.clear();
                        self.io.write_str(NEWLINE)?;
                    }
                    Ok(())
                }
            },
            // Decoded keys (and sequence fragments) are inert in line mode.
            _ => Ok(()),
        }
    }

    /// One-hertz timer hook for multitasking hosts: runs the deferred
    /// credential check and the inactivity countdown.
    pub fn auth_tick(&mut self) -> Result<(), IO::Error> {
        let outcome = self.session.tick(&self.hasher, &self.config);
        self.handle_auth_outcome(outcome)
    }

    /// Execute at most one dispatched line. Returns `true` when a line ran.
    pub fn process_next(&mut self) -> Result<bool, IO::Error> {
        if !self.session.is_authenticated() {
            return Ok(false);
        }
        let Some(line) = self.dispatch.take() else {
            return Ok(false);
        };
        self.run_line(&line)?;
        Ok(true)
    }

    /// One sub-application work cycle for multitasking hosts. Returns the
    /// delay in milliseconds before the next call.
    pub fn app_cycle(&mut self) -> u32 {
        self.apps.cycle()
    }

    /// Cooperative driver: advances the auth timer by `elapsed_ms`, paces
    /// the sub-application and drains at most one dispatched line.
    pub fn poll(&mut self, elapsed_ms: u32) -> Result<(), IO::Error> {
        let outcome = self.session.poll(elapsed_ms, &self.hasher, &self.config);
        self.handle_auth_outcome(outcome)?;

        if self.apps.is_running() {
            self.app_accum_ms = self.app_accum_ms.saturating_add(elapsed_ms);
            if self.app_accum_ms >= self.app_wait_ms {
                self.app_accum_ms = 0;
                self.app_wait_ms = self.apps.cycle();
            }
        } else {
            self.app_accum_ms = 0;
            self.app_wait_ms = 0;
        }

        self.process_next()?;
        Ok(())
    }

    /// Hand the byte stream to a sub-application.
    pub fn start_app(&mut self, app: &'app mut dyn SubApp) -> Result<(), CliError> {
        self.apps.start(app)
    }

    /// Stop the running sub-application, if any.
    pub fn terminate_app(&mut self) {
        self.apps.terminate();
    }

    /// True while a sub-application owns the byte stream.
    pub fn is_app_running(&self) -> bool {
        self.apps.is_running()
    }

    /// Authentication state of the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The terminal context stack.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The output sink.
    pub fn io(&self) -> &IO {
        &self.io
    }

    /// Mutable access to the output sink (flushing, test capture).
    pub fn io_mut(&mut self) -> &mut IO {
        &mut self.io
    }

    /// Runtime configuration.
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Mutable runtime configuration, for user table and timeout updates.
    pub fn config_mut(&mut self) -> &mut ShellConfig {
        &mut self.config
    }

    fn run_line(&mut self, line: &str) -> Result<(), IO::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("dispatch: {=str}", line);
        self.registry.record_history(line);
        loop {
            let Some(top) = self.registry.top_index() else {
                break;
            };
            let mut out = OutputBuf::new();
            match self.execute_at(top, line, &mut out) {
                CmdStatus::More => {
                    self.io.write_str(NEWLINE)?;
                    self.io.write_str(&out)?;
                }
                CmdStatus::Done => {
                    self.io.write_str(&out)?;
                    break;
                }
                CmdStatus::SignOut => return self.sign_out(None),
            }
        }
        self.print_prompt()
    }

    fn execute_at(&mut self, ctx: usize, line: &str, out: &mut OutputBuf) -> CmdStatus {
        match self.registry.resolve_in(ctx, line) {
            Resolution::NotFound => {
                write_not_recognised(out);
                CmdStatus::Done
            }
            Resolution::BadParams => {
                write_bad_params(out);
                CmdStatus::Done
            }
            Resolution::Builtin(Builtin::Exit) => {
                self.registry.unregister_context();
                CmdStatus::Done
            }
            Resolution::Builtin(Builtin::Signout) => CmdStatus::SignOut,
            Resolution::Builtin(Builtin::Help) => {
                if self.registry.help(ctx, line, out) {
                    CmdStatus::More
                } else {
                    CmdStatus::Done
                }
            }
            Resolution::Builtin(Builtin::Do) => {
                let rest = line
                    .strip_prefix("do")
                    .unwrap_or("")
                    .trim_start_matches(' ');
                if rest.is_empty() {
                    write_not_recognised(out);
                    CmdStatus::Done
                } else {
                    // Re-dispatch against the root context. `do` is absent
                    // from the root, so this cannot recurse further.
                    self.execute_at(0, rest, out)
                }
            }
            Resolution::Command(command) => {
                let mut services = Services {
                    registry: &mut self.registry,
                    apps: &mut self.apps,
                    admin: self.session.is_admin(),
                };
                match command.invoke(line, &mut services) {
                    CmdOutput::Done(text) => {
                        *out = text;
                        CmdStatus::Done
                    }
                    CmdOutput::More(text) => {
                        *out = text;
                        CmdStatus::More
                    }
                }
            }
        }
    }

    fn handle_auth_outcome(&mut self, outcome: Option<AuthOutcome>) -> Result<(), IO::Error> {
        match outcome {
            None => Ok(()),
            Some(AuthOutcome::SignedIn { admin }) => {
                #[cfg(feature = "defmt")]
                defmt::info!("session opened, admin={=bool}", admin);
                // A root set too large for one context is a firmware
                // configuration defect; the session still opens.
                let _ = self.registry.register_context(self.config.root_commands, admin);
                let role = if admin { "administrator" } else { "user" };
                let mut msg: String<96> = String::new();
                let _ = write!(msg, "Authorization complete ({MAGENTA}{role}{RESET}){NEWLINE}");
                self.io.write_str(&msg)?;
                self.print_prompt()
            }
            Some(AuthOutcome::Failed) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("login rejected");
                self.io.write_str("Incorrect login or password")?;
                self.io.write_str(NEWLINE)?;
                self.print_login_banner()
            }
            Some(AuthOutcome::TimedOut) => self.sign_out(Some("Inactivity period exceeded")),
        }
    }

    /// Close the session: wipe credentials, kill the running application,
    /// drop queued lines, then tear down the context stack.
    fn sign_out(&mut self, reason: Option<&str>) -> Result<(), IO::Error> {
        #[cfg(feature = "defmt")]
        defmt::info!("session closed");
        self.session.reset();
        self.apps.terminate();
        self.dispatch.clear();
        self.registry.unregister_all();
        self.line.clear();
        match reason {
            None => {
                self.io.write_str(NEWLINE)?;
                self.io.write_str("Sign out")?;
                self.io.write_str(NEWLINE)?;
            }
            Some(text) => {
                let mut msg: String<96> = String::new();
                let _ = write!(msg, "{NEWLINE}Sign out ({text}){NEWLINE}");
                self.io.write_str(&msg)?;
            }
        }
        self.print_login_banner()
    }

    /// Session prompt: inverse-video username plus `#` (administrator) or
    /// `>` (user). A no-op while unauthenticated.
    fn print_prompt(&mut self) -> Result<(), IO::Error> {
        if !self.session.is_authenticated() {
            return Ok(());
        }
        let marker = if self.session.is_admin() { '#' } else { '>' };
        let mut prompt: String<64> = String::new();
        let _ = write!(
            prompt,
            "{NEWLINE}{BG_WHITE}{BLACK}{}{marker}{RESET}",
            self.session.username()
        );
        self.io.write_str(&prompt)
    }

    fn print_login_banner(&mut self) -> Result<(), IO::Error> {
        let mut banner: String<64> = String::new();
        let _ = write!(banner, "{RED}Authorization required{RESET}{NEWLINE}");
        self.io.write_str(&banner)?;
        self.write_field_prompt("login:")
    }

    fn write_field_prompt(&mut self, label: &str) -> Result<(), IO::Error> {
        let mut prompt: String<64> = String::new();
        let _ = write!(prompt, "{BG_WHITE}{BLACK}{label}{RESET}");
        self.io.write_str(&prompt)
    }
}

impl<IO: CharIo, H: PasswordHasher> core::fmt::Debug for Shell<'_, IO, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Shell")
            .field("state", &self.session.state())
            .field("depth", &self.registry.depth())
            .field("app_running", &self.apps.is_running())
            .finish_non_exhaustive()
    }
}
