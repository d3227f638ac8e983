//! Character output abstraction for platform-agnostic terminal I/O.
//!
//! The shell never reads from the transport itself; the host pushes received
//! bytes in via [`Shell::feed`](crate::shell::Shell::feed). `CharIo` covers
//! the output direction only: echo, prompts and command responses.

/// Platform-agnostic character output sink.
///
/// Implementations must not block indefinitely. On bare-metal targets a
/// blocking UART write is acceptable; buffered platforms should buffer
/// internally and flush outside the shell.
pub trait CharIo {
    /// Platform-specific error type
    type Error;

    /// Write a single character to the output.
    fn put_char(&mut self, c: char) -> Result<(), Self::Error>;

    /// Write a string to the output.
    ///
    /// Default implementation uses `put_char()` repeatedly.
    /// Override for more efficient bulk writes if needed.
    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for c in s.chars() {
            self.put_char(c)?;
        }
        Ok(())
    }
}
