use crate::application::session::KeypadCommand;
use crate::error::{CheckoutError, Result};
use std::io::BufRead;

/// Reads keypad presses, one per line, from a text source.
///
/// Blank lines and lines starting with `#` are skipped, so scripted sessions can
/// carry comments.
pub struct CommandReader<R: BufRead> {
    source: R,
}

impl<R: BufRead> CommandReader<R> {
    /// Creates a new `CommandReader` from any buffered source (e.g., stdin lock, file).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns an iterator that lazily reads and parses commands.
    pub fn commands(self) -> impl Iterator<Item = Result<KeypadCommand>> {
        self.source.lines().filter_map(|line| match line {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    None
                } else {
                    Some(line.parse())
                }
            }
            Err(e) => Some(Err(CheckoutError::from(e))),
        })
    }
}
