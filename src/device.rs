use std::collections::VecDeque;
use std::io::{self, BufRead, ErrorKind, StdinLock, Write};

use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use crate::{error, output::Output, symbol::Word};

/// Source of values for `INP`.
pub trait InputDevice {
    fn read_value(&mut self) -> Result<Word>;
}

/// Sink for values from `OUT`.
pub trait OutputDevice {
    fn write_value(&mut self, value: Word) -> Result<()>;
}

/// Line-based input, one integer per line.
pub struct TerminalInput<R> {
    reader: R,
    line: String,
}

/// Prints one integer per line on stdout.
pub struct TerminalOutput;

impl TerminalInput<StdinLock<'static>> {
    pub fn stdin() -> Self {
        TerminalInput::new(io::stdin().lock())
    }
}

impl<R: BufRead> TerminalInput<R> {
    pub fn new(reader: R) -> Self {
        TerminalInput {
            reader,
            line: String::new(),
        }
    }
}

/// Accepts unsigned decimal integers from 0 to 999, ignoring surrounding whitespace.
pub fn parse_input(input: &str) -> Result<Word> {
    let input = input.trim();
    input
        .parse::<u16>()
        .ok()
        .filter(|_| input.chars().all(|c| c.is_ascii_digit()))
        .and_then(Word::new)
        .ok_or_else(|| error::run_invalid_input(input))
}

impl<R: BufRead> InputDevice for TerminalInput<R> {
    fn read_value(&mut self) -> Result<Word> {
        if !Output::is_minimal() {
            Output::Diagnostic.print_str(&format!("{} ", "INPUT:".cyan()));
            io::stderr().flush().into_diagnostic()?;
        }
        self.line.clear();
        let read = match self.reader.read_line(&mut self.line) {
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(error::run_invalid_input("<invalid UTF-8>"));
            }
            Err(e) => return Err(e).into_diagnostic(),
        };
        if read == 0 {
            return Err(error::run_input_eof());
        }
        parse_input(&self.line)
    }
}

impl OutputDevice for TerminalOutput {
    fn write_value(&mut self, value: Word) -> Result<()> {
        let value = value.value();
        if Output::is_minimal() {
            Output::Normal.print_str(&format!("{value}\n"));
        } else {
            Output::Normal.print_str(&format!("{} {value}\n", "OUTPUT:".cyan()));
        }
        io::stdout().flush().into_diagnostic()
    }
}

/// Queued input, mostly for driving programs from tests.
impl InputDevice for VecDeque<Word> {
    fn read_value(&mut self) -> Result<Word> {
        self.pop_front().ok_or_else(error::run_input_eof)
    }
}

/// Collected output.
impl OutputDevice for Vec<Word> {
    fn write_value(&mut self, value: Word) -> Result<()> {
        self.push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code_of;

    #[test]
    fn parses_input() {
        assert_eq!(parse_input("42\n").unwrap().value(), 42);
        assert_eq!(parse_input("  999 ").unwrap().value(), 999);
        for bad in ["", "abc", "-3", "+3", "1000", "4.5"] {
            assert_eq!(code_of(&parse_input(bad).unwrap_err()), "run::invalid_input");
        }
    }

    #[test]
    fn terminal_reads_lines() {
        Output::set_minimal(true);
        let mut term = TerminalInput::new("5\n12\nnope\n".as_bytes());
        assert_eq!(term.read_value().unwrap().value(), 5);
        assert_eq!(term.read_value().unwrap().value(), 12);
        assert_eq!(code_of(&term.read_value().unwrap_err()), "run::invalid_input");
        assert_eq!(code_of(&term.read_value().unwrap_err()), "run::invalid_input");
    }

    #[test]
    fn terminal_rejects_non_utf8() {
        Output::set_minimal(true);
        let mut term = TerminalInput::new(&[0xff, 0xfe, b'\n'][..]);
        assert_eq!(code_of(&term.read_value().unwrap_err()), "run::invalid_input");
    }

    #[test]
    fn queue_runs_dry() {
        let mut input: VecDeque<Word> = Word::new(1).into_iter().collect();
        assert!(input.read_value().is_ok());
        assert_eq!(code_of(&input.read_value().unwrap_err()), "run::invalid_input");
    }
}
