//! Line-oriented prompt/response over any reader and writer.

use std::io::{self, BufRead, Write};

/// Prompt-response terminal session.
///
/// Generic over the streams so sessions can be driven by stdin/stdout or by
/// in-memory buffers.
pub struct Prompter<R: BufRead, W: Write> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes `prompt` without a newline and reads one line of input.
    ///
    /// Returns `Ok(None)` at end of input. The trailing line terminator is
    /// stripped; other whitespace is preserved.
    pub fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// Writes one full line of output.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    /// Releases the underlying streams.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

#[cfg(test)]
mod tests {
    use super::Prompter;

    #[test]
    fn ask_strips_line_terminators_and_reports_eof() {
        let mut output = Vec::new();
        let mut prompter = Prompter::new("squat\r\nbench \n".as_bytes(), &mut output);

        assert_eq!(prompter.ask("a? ").expect("ask").as_deref(), Some("squat"));
        assert_eq!(prompter.ask("b? ").expect("ask").as_deref(), Some("bench "));
        assert_eq!(prompter.ask("c? ").expect("ask"), None);
        drop(prompter);

        let transcript = String::from_utf8(output).expect("utf-8 output");
        assert_eq!(transcript, "a? b? c? ");
    }
}
