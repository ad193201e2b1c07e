use std::path::PathBuf;

/// Static table sizes. Exceeding any of them is a capacity error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Includes the end-of-input token.
    pub max_tokens: usize,
    pub max_variables: usize,
    pub max_identifier_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            max_variables: 256,
            max_identifier_len: 127,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub limits: Limits,
    /// Where to write the classified token report, if anywhere.
    pub token_dump: Option<PathBuf>,
}

impl Config {
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            limits,
            token_dump: None,
        }
    }
}
