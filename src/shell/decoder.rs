//! Keyboard escape-sequence decoder.
//!
//! A pure byte-at-a-time state machine: raw terminal bytes go in, logical
//! key events come out. It owns no I/O. Sequences follow the VT100 layout
//! (CSI arrows, tilde-terminated function and navigation keys).

use heapless::Vec;

/// Longest recognized escape sequence, in bytes.
pub const MAX_SEQUENCE_LEN: usize = 5;

const ESC: u8 = 0x1b;
const ETX: u8 = 0x03;
const HT: u8 = 0x09;

/// Result of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyButton {
    /// Plain byte, not part of any sequence. The caller owns it.
    None,
    /// Sequence in progress; the byte was consumed.
    Wait,
    /// Horizontal tab (0x09) received outside a sequence.
    Tab,
    /// Ctrl-C (0x03) received outside a sequence.
    Break,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Function key F1.
    F1,
    /// Function key F2.
    F2,
    /// Function key F3.
    F3,
    /// Function key F4.
    F4,
    /// Function key F5.
    F5,
    /// Function key F6.
    F6,
    /// Function key F7.
    F7,
    /// Function key F8.
    F8,
    /// Function key F9.
    F9,
    /// Function key F10.
    F10,
    /// Function key F11.
    F11,
    /// Function key F12.
    F12,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Insert key.
    Insert,
    /// Delete key.
    Delete,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// An escape sequence that matches nothing in the table.
    Other,
}

#[cfg(feature = "defmt")]
impl defmt::Format for KeyButton {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}", *self as u8)
    }
}

// VT100 layout. F1-F5 use the 11~..15~ block, F6-F12 carry the historical
// gaps (17~..21~, 23~, 24~).
const SEQUENCES: &[(KeyButton, &[u8])] = &[
    (KeyButton::Up, b"\x1b[A"),
    (KeyButton::Down, b"\x1b[B"),
    (KeyButton::Right, b"\x1b[C"),
    (KeyButton::Left, b"\x1b[D"),
    (KeyButton::Home, b"\x1b[1~"),
    (KeyButton::Insert, b"\x1b[2~"),
    (KeyButton::Delete, b"\x1b[3~"),
    (KeyButton::End, b"\x1b[4~"),
    (KeyButton::PageUp, b"\x1b[5~"),
    (KeyButton::PageDown, b"\x1b[6~"),
    (KeyButton::F1, b"\x1b[11~"),
    (KeyButton::F2, b"\x1b[12~"),
    (KeyButton::F3, b"\x1b[13~"),
    (KeyButton::F4, b"\x1b[14~"),
    (KeyButton::F5, b"\x1b[15~"),
    (KeyButton::F6, b"\x1b[17~"),
    (KeyButton::F7, b"\x1b[18~"),
    (KeyButton::F8, b"\x1b[19~"),
    (KeyButton::F9, b"\x1b[20~"),
    (KeyButton::F10, b"\x1b[21~"),
    (KeyButton::F11, b"\x1b[23~"),
    (KeyButton::F12, b"\x1b[24~"),
];

/// Escape-sequence decoder state.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    collected: Vec<u8, MAX_SEQUENCE_LEN>,
}

impl KeyDecoder {
    /// Create an idle decoder.
    pub fn new() -> Self {
        Self { collected: Vec::new() }
    }

    /// True while a sequence is being collected.
    pub fn is_collecting(&self) -> bool {
        !self.collected.is_empty()
    }

    /// Feed one byte.
    ///
    /// From idle: ESC starts collection (`Wait`), 0x03 is `Break`, 0x09 is
    /// `Tab`, anything else is `None`. While collecting, each byte is
    /// appended and matched against the table; a full buffer without a match
    /// resets the decoder and reports `Other`.
    pub fn feed(&mut self, ch: u8) -> KeyButton {
        if self.is_collecting() {
            if self.collected.is_full() {
                self.collected.clear();
                return KeyButton::Other;
            }
            // Capacity checked above.
            let _ = self.collected.push(ch);
            for &(button, seq) in SEQUENCES {
                if self.collected.as_slice() == seq {
                    self.collected.clear();
                    return button;
                }
            }
            return KeyButton::Wait;
        }

        match ch {
            ETX => KeyButton::Break,
            HT => KeyButton::Tab,
            ESC => {
                let _ = self.collected.push(ch);
                KeyButton::Wait
            }
            _ => KeyButton::None,
        }
    }
}
