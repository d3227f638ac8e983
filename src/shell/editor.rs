//! Input character classification and destructive-backspace line editing.
//!
//! Three input roles share one editor: command lines, usernames and
//! passwords. The role decides which characters are stored and what gets
//! echoed (passwords echo `*`). Editing is append/erase only; there is no
//! cursor movement.

use heapless::String;

/// Role of the string being edited, selecting the accepted character class
/// and the echo behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// Command line: letters, digits, space and terminal punctuation.
    Command,
    /// Username: letters, digits and underscore.
    Username,
    /// Password: same class as commands, echoed as `*`.
    Password,
}

/// What the editor wants done with an inbound byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// Byte dropped: invalid for the role, buffer full, or newline on an
    /// empty buffer.
    None,
    /// A non-empty line was terminated.
    Newline,
    /// Byte stored (or erased); echo this byte back.
    Echo(u8),
}

const COMMAND_SPECIALS: &[u8] = b" `~!@#$%^&*()_-=+{}[];:.,<>\\/?'\"";
const USERNAME_SPECIALS: &[u8] = b"_";

/// Classify a byte for the given role.
///
/// Returns the byte to echo when the character is accepted: the character
/// itself, or `*` for passwords.
pub fn classify(ch: u8, kind: StringKind) -> Option<u8> {
    let specials = match kind {
        StringKind::Command | StringKind::Password => COMMAND_SPECIALS,
        StringKind::Username => USERNAME_SPECIALS,
    };
    let accepted = ch.is_ascii_alphanumeric() || specials.contains(&ch);
    if !accepted {
        return None;
    }
    match kind {
        StringKind::Password => Some(b'*'),
        _ => Some(ch),
    }
}

/// Bounded line buffer with destructive backspace.
#[derive(Debug, Default)]
pub struct LineBuffer<const N: usize> {
    buf: String<N>,
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self { buf: String::new() }
    }

    /// Current buffer contents.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// True when nothing has been typed.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discard the buffer contents.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Apply one inbound byte.
    ///
    /// CR and LF terminate a non-empty line and are dropped otherwise. DEL
    /// (0x7F) erases the last character and echoes itself; erasing an empty
    /// buffer is a no-op. Everything else goes through [`classify`].
    pub fn consume(&mut self, ch: u8, kind: StringKind) -> LineEvent {
        match ch {
            b'\r' | b'\n' => {
                if self.buf.is_empty() {
                    LineEvent::None
                } else {
                    LineEvent::Newline
                }
            }
            0x7f => {
                if self.buf.pop().is_some() {
                    LineEvent::Echo(0x7f)
                } else {
                    LineEvent::None
                }
            }
            _ => match classify(ch, kind) {
                Some(echo) if self.buf.push(ch as char).is_ok() => LineEvent::Echo(echo),
                _ => LineEvent::None,
            },
        }
    }
}
