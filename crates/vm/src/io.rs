//! Runtime I/O collaborators.
//!
//! The engine never touches stdin or stdout itself. `READ` pulls integers
//! through [`Input`] and `WRITE` pushes them through [`Output`]; the
//! adapters here wrap any [`BufRead`]/[`Write`], so the CLI hands the
//! machine real stdio while tests hand it byte buffers.

use std::io::{BufRead, Write};

/// Source of integers for the `READ` instruction.
pub trait Input {
    /// The next integer, or `None` when the source is exhausted or the
    /// next line is not an integer.
    fn next_int(&mut self) -> Option<i32>;
}

/// Sink of integers for the `WRITE` instruction.
pub trait Output {
    /// Emit one integer.
    fn emit_int(&mut self, value: i32);
}

/// Line-oriented [`Input`]: one integer per non-blank line.
pub struct ReadInput<R: BufRead> {
    reader: R,
}

impl<R: BufRead> ReadInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Input for ReadInput<R> {
    fn next_int(&mut self) -> Option<i32> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).ok()? == 0 {
                return None;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return trimmed.parse().ok();
        }
    }
}

/// Line-oriented [`Output`]: one integer per line. Write errors are
/// ignored; a closed sink cannot fault the program.
pub struct WriteOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriteOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give the wrapped writer back (tests read the bytes out).
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for WriteOutput<W> {
    fn emit_int(&mut self, value: i32) {
        let _ = writeln!(self.writer, "{value}");
    }
}
