//! Terminal context stack and command registry.
//!
//! A terminal context is one level of the command hierarchy: a bounded list
//! of command slots plus a circular history of the lines submitted while it
//! was on top. Contexts stack; `exit` pops, `signout` tears the whole stack
//! down. Four built-ins frame every context: `do` and `exit` exist only
//! when a parent context exists, `signout` and `help` always.
//!
//! Resolution scans a context's slots in registration order and takes the
//! first whose name is a prefix of the input line ending at a space or the
//! end of the line. A slot that declares an exact parameter count rejects
//! the line before its handler runs.

use core::fmt::Write;

use heapless::{Deque, Vec};

use crate::ansi::{CYAN, RESET};
use crate::command::{Command, OutputBuf};
use crate::config::{CmdLine, HISTORY_RECORDS, MAX_COMMANDS, MAX_CONTEXTS};
use crate::error::CliError;
use crate::validate::{get_param, param_count};

/// Commands every context carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Do,
    Exit,
    Signout,
    Help,
}

impl Builtin {
    fn name(self) -> &'static str {
        match self {
            Builtin::Do => "do",
            Builtin::Exit => "exit",
            Builtin::Signout => "signout",
            Builtin::Help => "help",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Builtin::Do => "run a root terminal command from here",
            Builtin::Exit => "return to the previous terminal",
            Builtin::Signout => "end the session",
            Builtin::Help => "list commands or describe one command",
        }
    }

    fn help(self) -> &'static str {
        match self {
            Builtin::Do => "Usage: do <command> [params] - run a root terminal command without leaving this terminal",
            Builtin::Exit => "Usage: exit - return to the previous terminal",
            Builtin::Signout => "Usage: signout - end the session and return to the login prompt",
            Builtin::Help => "Usage: help [command] - list available commands, or show usage for one",
        }
    }

    fn param_count(self) -> Option<u8> {
        match self {
            Builtin::Exit | Builtin::Signout => Some(0),
            Builtin::Do | Builtin::Help => None,
        }
    }
}

/// One command slot in a context.
#[derive(Clone, Copy)]
enum Slot {
    Builtin(Builtin),
    User(&'static dyn Command),
}

impl Slot {
    fn name(&self) -> &'static str {
        match self {
            Slot::Builtin(b) => b.name(),
            Slot::User(c) => c.name(),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Slot::Builtin(b) => b.description(),
            Slot::User(c) => c.description(),
        }
    }

    fn help(&self) -> &'static str {
        match self {
            Slot::Builtin(b) => b.help(),
            Slot::User(c) => c.help(),
        }
    }

    fn param_count(&self) -> Option<u8> {
        match self {
            Slot::Builtin(b) => b.param_count(),
            Slot::User(c) => c.param_count(),
        }
    }
}

impl core::fmt::Debug for Slot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Slot({})", self.name())
    }
}

/// Outcome of resolving an input line in one context.
pub(crate) enum Resolution {
    /// No slot name matched with a valid boundary.
    NotFound,
    /// A slot matched but the line's parameter count is wrong.
    BadParams,
    /// A built-in matched.
    Builtin(Builtin),
    /// A user command matched.
    Command(&'static dyn Command),
}

#[derive(Debug)]
struct TerminalContext {
    slots: Vec<Slot, MAX_COMMANDS>,
    history: Deque<CmdLine, HISTORY_RECORDS>,
    help_cursor: usize,
}

impl TerminalContext {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            history: Deque::new(),
            help_cursor: 0,
        }
    }
}

/// The stack of registered terminal contexts.
#[derive(Debug)]
pub struct Registry {
    stack: Vec<TerminalContext, MAX_CONTEXTS>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Current nesting depth. Zero means no session is open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn top_index(&self) -> Option<usize> {
        self.stack.len().checked_sub(1)
    }

    /// Push a context. `do` and `exit` are included only when a parent
    /// exists; user commands only when their `admin_only` flag equals the
    /// session's `admin` flag.
    pub fn register_context(
        &mut self,
        commands: &'static [&'static dyn Command],
        admin: bool,
    ) -> Result<(), CliError> {
        let mut context = TerminalContext::new();
        if !self.stack.is_empty() {
            let _ = context.slots.push(Slot::Builtin(Builtin::Do));
            let _ = context.slots.push(Slot::Builtin(Builtin::Exit));
        }
        let _ = context.slots.push(Slot::Builtin(Builtin::Signout));
        let _ = context.slots.push(Slot::Builtin(Builtin::Help));
        for command in commands {
            if command.admin_only() == admin {
                context
                    .slots
                    .push(Slot::User(*command))
                    .map_err(|_| CliError::TooManyCommands)?;
            }
        }
        self.stack
            .push(context)
            .map_err(|_| CliError::ContextStackFull)
    }

    /// Pop the top context.
    pub fn unregister_context(&mut self) {
        let _ = self.stack.pop();
    }

    /// Tear down the whole stack (sign-out).
    pub fn unregister_all(&mut self) {
        self.stack.clear();
    }

    /// Resolve `line` against the context at `ctx`.
    pub(crate) fn resolve_in(&self, ctx: usize, line: &str) -> Resolution {
        let Some(context) = self.stack.get(ctx) else {
            return Resolution::NotFound;
        };
        for slot in &context.slots {
            let name = slot.name();
            if !line.starts_with(name) {
                continue;
            }
            match line.as_bytes().get(name.len()) {
                None | Some(b' ') => {}
                Some(_) => continue,
            }
            if let Some(expected) = slot.param_count() {
                if param_count(line) != expected as usize {
                    return Resolution::BadParams;
                }
            }
            return match slot {
                Slot::Builtin(b) => Resolution::Builtin(*b),
                Slot::User(c) => Resolution::Command(*c),
            };
        }
        Resolution::NotFound
    }

    /// Record a submitted line in the top context's history ring.
    pub(crate) fn record_history(&mut self, line: &str) {
        if let Some(context) = self.stack.last_mut() {
            let mut record = CmdLine::new();
            let _ = record.push_str(line);
            if context.history.is_full() {
                let _ = context.history.pop_front();
            }
            let _ = context.history.push_back(record);
        }
    }

    /// Run the `help` built-in against the context at `ctx`.
    ///
    /// With a parameter: emit the usage text of the first command whose
    /// name starts with it. Without: emit one listing entry per call from
    /// the context's cursor, wrapping to the start when the last entry has
    /// been shown. Returns `true` while more entries follow.
    pub(crate) fn help(&mut self, ctx: usize, line: &str, out: &mut OutputBuf) -> bool {
        let Some(context) = self.stack.get_mut(ctx) else {
            return false;
        };
        if let Some(wanted) = get_param(line, 1) {
            match context.slots.iter().find(|s| s.name().starts_with(wanted)) {
                Some(slot) => {
                    let _ = out.push_str(slot.help());
                }
                None => write_not_recognised(out),
            }
            return false;
        }
        // Slots are never empty: every context carries built-ins.
        let index = context.help_cursor.min(context.slots.len() - 1);
        let slot = context.slots[index];
        let _ = write!(
            out,
            "{}{:<16}{} - {}",
            CYAN,
            slot.name(),
            RESET,
            slot.description()
        );
        context.help_cursor = index + 1;
        if context.help_cursor >= context.slots.len() {
            context.help_cursor = 0;
            false
        } else {
            true
        }
    }

    #[cfg(test)]
    fn history_in(&self, ctx: usize) -> &Deque<CmdLine, HISTORY_RECORDS> {
        &self.stack[ctx].history
    }

    #[cfg(test)]
    fn slot_names(&self, ctx: usize) -> Vec<&'static str, MAX_COMMANDS> {
        self.stack[ctx].slots.iter().map(|s| s.name()).collect()
    }
}

pub(crate) fn write_not_recognised(out: &mut OutputBuf) {
    let _ = write!(
        out,
        "Command not recognised. Type {CYAN}help{RESET} to view a list of available commands."
    );
}

pub(crate) fn write_bad_params(out: &mut OutputBuf) {
    let _ = write!(
        out,
        "Incorrect command parameter(s). Type {CYAN}help{RESET} to view a list of available commands."
    );
}
