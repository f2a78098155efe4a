//! Console I/O for the menu.
//!
//! The session prints through a [`Console`] and reads exactly one answer from
//! it.  [`LineConsole`] implements the trait over any `BufRead`/`Write` pair:
//! [`LineConsole::stdio`] for the real terminal, in-memory buffers in tests.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

/// Terminal abstraction used by the session.
pub trait Console {
    /// Writes `text` verbatim and flushes.
    fn show(&mut self, text: &str) -> io::Result<()>;

    /// Writes `label` without a trailing newline, then reads one line.
    ///
    /// The line terminator is stripped.  Returns `Ok(None)` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>>;
}

/// A [`Console`] over a buffered reader and a writer.
#[derive(Debug)]
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the console and returns the writer (used by tests to inspect
    /// what was printed).
    pub fn into_output(self) -> W {
        self.output
    }
}

impl LineConsole<StdinLock<'static>, Stdout> {
    /// Console bound to the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for LineConsole<R, W> {
    fn show(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        self.output.flush()
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        self.show(label)?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        Ok(Some(trimmed.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
