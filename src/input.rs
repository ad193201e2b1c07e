use std::collections::VecDeque;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("no integer available, input is exhausted")]
    Exhausted,
    #[error("'{0}' is not an integer")]
    Malformed(String),
    #[error("could not read input: {0}")]
    Io(#[from] io::Error),
}

/// Whitespace-delimited integer reader for `Leer`.
pub struct InputReader<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> InputReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Blocks until one word is available and parses it.
    pub fn read_integer(&mut self) -> Result<i64, InputError> {
        let word = self.next_word()?.ok_or(InputError::Exhausted)?;
        word.parse::<i64>().map_err(|_| InputError::Malformed(word))
    }

    fn next_word(&mut self) -> Result<Option<String>, InputError> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_string));
        }
        Ok(self.pending.pop_front())
    }
}
