//! Shared fixtures for integration tests.

#![allow(dead_code)]

use bastion_shell::{
    CharIo, CmdOutput, Command, DispatchMode, PasswordHasher, Services, Sha256Hasher, Shell,
    ShellConfig, UserRecord,
};

/// Output-capturing sink.
pub struct MockIo {
    output: String,
}

impl MockIo {
    pub fn new() -> Self {
        Self { output: String::new() }
    }

    /// Drain captured output.
    pub fn take(&mut self) -> String {
        core::mem::take(&mut self.output)
    }
}

impl CharIo for MockIo {
    type Error = core::convert::Infallible;

    fn put_char(&mut self, c: char) -> Result<(), Self::Error> {
        self.output.push(c);
        Ok(())
    }
}

pub struct Status;

impl Command for Status {
    fn name(&self) -> &'static str {
        "status"
    }
    fn description(&self) -> &'static str {
        "show appliance status"
    }
    fn help(&self) -> &'static str {
        "Usage: status - show appliance status"
    }
    fn param_count(&self) -> Option<u8> {
        Some(0)
    }
    fn invoke(&self, _line: &str, _services: &mut Services<'_, '_>) -> CmdOutput {
        CmdOutput::done("status: ok")
    }
}

pub struct Reboot;

impl Command for Reboot {
    fn name(&self) -> &'static str {
        "reboot"
    }
    fn description(&self) -> &'static str {
        "restart the appliance"
    }
    fn param_count(&self) -> Option<u8> {
        Some(0)
    }
    fn admin_only(&self) -> bool {
        true
    }
    fn invoke(&self, _line: &str, _services: &mut Services<'_, '_>) -> CmdOutput {
        CmdOutput::done("rebooting")
    }
}

pub static NET_COMMANDS: &[&dyn Command] = &[&Status];

pub struct Net;

impl Command for Net {
    fn name(&self) -> &'static str {
        "net"
    }
    fn description(&self) -> &'static str {
        "enter the network terminal"
    }
    fn invoke(&self, _line: &str, services: &mut Services<'_, '_>) -> CmdOutput {
        match services.enter_terminal(NET_COMMANDS) {
            Ok(()) => CmdOutput::done("network terminal"),
            Err(_) => CmdOutput::done("nesting limit reached"),
        }
    }
}

pub static ROOT_COMMANDS: &[&dyn Command] = &[&Status, &Reboot, &Net];

pub const USER_NAME: &str = "operator";
pub const USER_PASSWORD: &str = "hunter2";
pub const ADMIN_NAME: &str = "root_op";
pub const ADMIN_PASSWORD: &str = "t0psecret";

/// Build a shell with one user, one administrator and the fixture command
/// set registered at the root.
pub fn create_shell<'app>(mode: DispatchMode) -> Shell<'app, MockIo, Sha256Hasher> {
    let hasher = Sha256Hasher::new();
    let mut config = ShellConfig::new();
    config
        .add_user(UserRecord::new(USER_NAME, hasher.hash(USER_PASSWORD.as_bytes()), false).unwrap())
        .unwrap();
    config
        .add_user(
            UserRecord::new(ADMIN_NAME, hasher.hash(ADMIN_PASSWORD.as_bytes()), true).unwrap(),
        )
        .unwrap();
    config.root_commands = ROOT_COMMANDS;
    Shell::new(MockIo::new(), hasher, config, mode)
}

/// Feed a string byte by byte.
pub fn feed_str(shell: &mut Shell<'_, MockIo, Sha256Hasher>, text: &str) {
    for &b in text.as_bytes() {
        shell.feed(b).unwrap();
    }
}

/// Run the login sequence and swallow its output.
pub fn login(shell: &mut Shell<'_, MockIo, Sha256Hasher>, username: &str, password: &str) {
    feed_str(shell, username);
    shell.feed(b'\r').unwrap();
    feed_str(shell, password);
    shell.feed(b'\r').unwrap();
    shell.auth_tick().unwrap();
    shell.io_mut().take();
}
