use crate::error::{Error, Result};
use std::str::FromStr;

/// A user action fed into a quiz session. Indices are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select { question: usize, option: i32 },
    /// Select an option on the question under the cursor.
    Answer(i32),
    Next,
    Previous,
    Skip,
    GoTo(usize),
    Submit,
    Retake,
    Quit,
}

/// Parses terminal input. Numbers typed by the user are one-based.
impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let word = parts
            .next()
            .ok_or_else(|| Error::InvalidCommand("empty command".to_string()))?
            .to_ascii_lowercase();
        let mut number = || -> Result<i64> {
            let raw = parts
                .next()
                .ok_or_else(|| Error::InvalidCommand(format!("'{}' needs a number", word)))?;
            raw.parse::<i64>()
                .map_err(|e| Error::InvalidCommand(format!("invalid number '{}': {}", raw, e)))
        };

        let command = match word.as_str() {
            "n" | "next" => Command::Next,
            "p" | "prev" | "previous" | "back" => Command::Previous,
            "s" | "skip" => Command::Skip,
            "submit" | "done" => Command::Submit,
            "retake" => Command::Retake,
            "q" | "quit" | "exit" => Command::Quit,
            "a" | "answer" => Command::Answer(option_index(number()?)?),
            "g" | "goto" => Command::GoTo(one_based(number()?)?),
            "select" => {
                let question = one_based(number()?)?;
                let option = option_index(number()?)?;
                Command::Select { question, option }
            }
            other => return Err(Error::InvalidCommand(format!("unknown command '{}'", other))),
        };
        Ok(command)
    }
}

fn one_based(n: i64) -> Result<usize> {
    if n < 1 {
        return Err(Error::InvalidCommand(format!("numbers start at 1, got {}", n)));
    }
    usize::try_from(n - 1)
        .map_err(|_| Error::InvalidCommand(format!("number {} is too large", n)))
}

fn option_index(n: i64) -> Result<i32> {
    let index = one_based(n)?;
    i32::try_from(index).map_err(|_| Error::InvalidCommand(format!("option {} does not exist", n)))
}
