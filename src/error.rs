use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::io::Write;
use std::ops::Range;
use thiserror::Error;

use crate::input::InputError;
use crate::symbols::SymbolError;

/// Character offsets into the program source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end.max(self.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    LexError,
    SyntaxError,
    CapacityError,
    RuntimeError,
    IoError,
}

impl ErrorKind {
    fn title(self) -> &'static str {
        match self {
            ErrorKind::LexError => "Lexical Error",
            ErrorKind::SyntaxError => "Syntax Error",
            ErrorKind::CapacityError => "Capacity Error",
            ErrorKind::RuntimeError => "Runtime Error",
            ErrorKind::IoError => "I/O Error",
        }
    }

    fn color(self) -> Color {
        match self {
            ErrorKind::LexError => Color::Red,
            ErrorKind::SyntaxError => Color::Yellow,
            ErrorKind::CapacityError => Color::Blue,
            ErrorKind::RuntimeError => Color::Magenta,
            ErrorKind::IoError => Color::Cyan,
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct GamaError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl GamaError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn lex_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::LexError, span, message)
    }

    pub fn syntax_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::SyntaxError, span, message)
    }

    pub fn capacity_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::CapacityError, span, message)
    }

    pub fn runtime_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::RuntimeError, span, message)
    }

    pub fn io_error(span: Span, message: String) -> Self {
        Self::new(ErrorKind::IoError, span, message)
    }

    /// Attaches the identifier span to a symbol table failure.
    pub fn from_symbol(error: SymbolError, span: Span) -> Self {
        match error {
            SymbolError::TooManyVariables { .. } => Self::capacity_error(span, error.to_string())
                .with_help("Raise the limit with --max-variables or reuse existing variables."),
            SymbolError::Uninitialized(_) => Self::runtime_error(span, error.to_string())
                .with_help("Assign a value with '=' or 'Leer' before reading the variable."),
            SymbolError::Undeclared(_) => Self::runtime_error(span, error.to_string())
                .with_help("Declare it first, for example: Entero x = 0;"),
        }
    }

    pub fn from_input(error: InputError, span: Span) -> Self {
        Self::runtime_error(span, format!("Leer failed: {}", error))
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    fn build_report<'a>(&self, filename: &'a str) -> Report<'a, (&'a str, Range<usize>)> {
        let color = self.kind.color();

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("{}: {}", self.kind.title().fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        report_builder.finish()
    }

    /// Renders the diagnostic to stderr.
    pub fn report(&self, source: &str, filename: Option<&str>) -> std::io::Result<()> {
        let filename = filename.unwrap_or("<stdin>");
        self.build_report(filename)
            .eprint((filename, Source::from(source)))
    }

    pub fn write_report<W: Write>(
        &self,
        source: &str,
        filename: Option<&str>,
        out: W,
    ) -> std::io::Result<()> {
        let filename = filename.unwrap_or("<stdin>");
        self.build_report(filename)
            .write((filename, Source::from(source)), out)
    }
}
