//! Interactive confirmation.
//!
//! The catalog command asks before overwriting a catalog. The question is
//! behind [`Confirm`] so tests and `--yes` can answer it without a terminal.

use std::io::{self, BufRead, Write};

/// Something that can answer a yes/no question.
pub trait Confirm {
    /// Ask `prompt`; `true` means proceed.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Answers every question with yes (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(true)
    }
}

/// Prompts on `output` and reads one line from `input`.
///
/// An empty answer counts as `y`; any answer other than `y` declines, and so
/// does end of input.
#[derive(Debug)]
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl Prompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirm for Prompt<R, W> {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(false);
        }
        let answer = match line.trim() {
            "" => "y",
            other => other,
        };
        Ok(answer == "y")
    }
}
