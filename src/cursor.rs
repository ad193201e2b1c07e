use crate::error::{GamaError, Span};
use crate::lexer::{Token, TokenType};

/// A position recorded by [`TokenCursor::mark`]. The only way to move the
/// cursor backwards is to hand one of these back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

impl Mark {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A token sub-range captured once and replayed by loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRange {
    pub start: Mark,
    pub end: Mark,
}

impl TokenRange {
    pub fn len(&self) -> usize {
        self.end.0 - self.start.0
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The single shared index into the token sequence.
pub struct TokenCursor {
    tokens: Vec<Token>,
    current: usize,
}

impl TokenCursor {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.is(TokenType::Eof)) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::new(
                TokenType::Eof,
                "EOF".to_string(),
                Span::new(end, end),
                line,
            ));
        }
        Self { tokens, current: 0 }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    pub fn peek_type(&self) -> TokenType {
        self.peek().token_type
    }

    pub fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().is(TokenType::Eof)
    }

    pub fn check(&self, token_type: TokenType) -> bool {
        self.peek().is(token_type)
    }

    /// Moves past the current token. Never moves past `Eof`.
    pub fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    pub fn match_type(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn consume(&mut self, token_type: TokenType, message: &str) -> Result<&Token, GamaError> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(message))
        }
    }

    /// A syntax error naming what the grammar wanted and what it found.
    pub fn unexpected(&self, message: &str) -> GamaError {
        GamaError::syntax_error(
            self.error_span(),
            format!("{}, found {}", message, self.peek()),
        )
    }

    /// Points at the current token, or just past the last real token at EOF.
    pub fn error_span(&self) -> Span {
        if self.is_at_end() && self.current > 0 {
            Span::single(self.tokens[self.current - 1].span.end)
        } else {
            self.peek().span
        }
    }

    pub fn mark(&self) -> Mark {
        Mark(self.current)
    }

    pub fn rewind(&mut self, mark: Mark) {
        self.current = mark.0;
    }

    pub fn range_from(&self, start: Mark) -> TokenRange {
        TokenRange {
            start,
            end: self.mark(),
        }
    }

    /// Span from the token at `start` through the last consumed token.
    pub fn span_from(&self, start: Mark) -> Span {
        let first = self.tokens[start.0.min(self.tokens.len() - 1)].span;
        if self.current > start.0 {
            first.to(self.previous().span)
        } else {
            first
        }
    }
}
