//! The command capability trait and handler output protocol.
//!
//! Firmware commands implement [`Command`] and are registered as `'static`
//! references; the registry stores trait objects, never copies. A handler
//! produces at most one response chunk per call and signals continuation
//! with [`CmdOutput::More`], in which case it is called again with the same
//! line until it answers [`CmdOutput::Done`]. Side effects that touch the
//! shell itself (nested terminals, sub-applications) go through the
//! [`Services`] handle instead of a reference to the shell.

use heapless::String;

use crate::app::{AppRunner, SubApp};
use crate::config::MAX_RESPONSE_LEN;
use crate::error::CliError;
use crate::terminal::Registry;

/// One response chunk. Longer text is truncated at the buffer capacity.
pub type OutputBuf = String<MAX_RESPONSE_LEN>;

/// Handler result: the response chunk plus whether more chunks follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmdOutput {
    /// Final (or only) chunk.
    Done(OutputBuf),
    /// Partial chunk; the handler will be called again.
    More(OutputBuf),
}

impl CmdOutput {
    /// Final chunk from a string slice, truncating at capacity.
    pub fn done(text: &str) -> Self {
        Self::Done(truncated(text))
    }

    /// Partial chunk from a string slice, truncating at capacity.
    pub fn more(text: &str) -> Self {
        Self::More(truncated(text))
    }
}

fn truncated(text: &str) -> OutputBuf {
    let mut buf = OutputBuf::new();
    for c in text.chars() {
        if buf.push(c).is_err() {
            break;
        }
    }
    buf
}

/// A shell command: descriptor plus handler.
///
/// `Sync` so command sets can be registered as `static` tables.
pub trait Command: Sync {
    /// Name the operator types. Also the resolution key: the registry
    /// matches it as a prefix of the input line with a space-or-end
    /// boundary.
    fn name(&self) -> &'static str;

    /// One-line description shown by `help`.
    fn description(&self) -> &'static str {
        ""
    }

    /// Usage text shown by `help <name>`.
    fn help(&self) -> &'static str {
        ""
    }

    /// Exact number of parameters the command takes, or `None` to skip the
    /// count check and let the handler validate.
    fn param_count(&self) -> Option<u8> {
        None
    }

    /// Visible to administrator sessions only.
    fn admin_only(&self) -> bool {
        false
    }

    /// Execute against the full input line.
    fn invoke(&self, line: &str, services: &mut Services<'_, '_>) -> CmdOutput;
}

/// Capabilities available to a command handler during `invoke`.
pub struct Services<'a, 'app> {
    pub(crate) registry: &'a mut Registry,
    pub(crate) apps: &'a mut AppRunner<'app>,
    pub(crate) admin: bool,
}

impl<'a, 'app> Services<'a, 'app> {
    /// Whether the session holds the administrator flag.
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Push a nested terminal context holding `commands` (filtered by the
    /// session's admin flag) on top of the current one.
    pub fn enter_terminal(
        &mut self,
        commands: &'static [&'static dyn Command],
    ) -> Result<(), CliError> {
        self.registry.register_context(commands, self.admin)
    }

    /// Hand the byte stream over to a sub-application.
    pub fn start_app(&mut self, app: &'app mut dyn SubApp) -> Result<(), CliError> {
        self.apps.start(app)
    }
}

impl core::fmt::Debug for Services<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Services")
            .field("admin", &self.admin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_constructors() {
        assert_eq!(CmdOutput::done("ok"), CmdOutput::Done(truncated("ok")));
        assert_eq!(CmdOutput::more("part"), CmdOutput::More(truncated("part")));
    }

    #[test]
    fn test_truncation_at_capacity() {
        extern crate std;
        let long = std::string::String::from_utf8(std::vec![b'x'; MAX_RESPONSE_LEN + 10]).unwrap();
        match CmdOutput::done(&long) {
            CmdOutput::Done(buf) => assert_eq!(buf.len(), MAX_RESPONSE_LEN),
            CmdOutput::More(_) => panic!("expected Done"),
        }
    }

    #[test]
    fn test_trait_defaults() {
        struct Bare;
        impl Command for Bare {
            fn name(&self) -> &'static str {
                "bare"
            }
            fn invoke(&self, _line: &str, _services: &mut Services<'_, '_>) -> CmdOutput {
                CmdOutput::done("")
            }
        }
        let cmd = Bare;
        assert_eq!(cmd.description(), "");
        assert_eq!(cmd.help(), "");
        assert_eq!(cmd.param_count(), None);
        assert!(!cmd.admin_only());
    }
}
