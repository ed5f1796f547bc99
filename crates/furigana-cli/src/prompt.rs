//! Interactive adjudication over a line-based terminal.

use std::io::{self, BufRead, Write};

use furigana_core::substitute::{Adjudicator, ConversionRecord};

/// Lists the pending corrections and reads the number of one to revert.
/// An empty line, end of input, or the "keep" entry ends the loop.
pub struct PromptAdjudicator<R, W> {
    input: R,
    output: W,
}

impl PromptAdjudicator<io::StdinLock<'static>, io::Stderr> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptAdjudicator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, options: &[ConversionRecord]) -> io::Result<Option<usize>> {
        writeln!(self.output, "Corrections not found in the dictionary:")?;
        for (i, record) in options.iter().enumerate() {
            writeln!(self.output, "{:>3}. {record}", i + 1)?;
        }
        writeln!(self.output, "{:>3}. keep all", options.len() + 1)?;
        write!(self.output, "revert> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(match line.trim().parse::<usize>() {
            Ok(n) if (1..=options.len()).contains(&n) => Some(n - 1),
            _ => None,
        })
    }
}

impl<R: BufRead, W: Write> Adjudicator for PromptAdjudicator<R, W> {
    fn propose(&mut self, options: &[ConversionRecord]) -> Option<usize> {
        self.ask(options).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "prompt failed, keeping remaining corrections");
            None
        })
    }
}
