use crate::cursor::{TokenCursor, TokenRange};
use crate::error::{GamaError, Span};
use crate::evaluator::Evaluator;
use crate::input::InputReader;
use crate::lexer::{Token, TokenType};
use crate::symbols::SymbolTable;
use log::{debug, trace};
use std::io::{BufRead, Write};

/// Whether a statement applies its effects or is only consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Execute,
    Skip,
}

impl Mode {
    /// `Execute` only when both the enclosing mode and `condition` allow it.
    fn when(self, condition: bool) -> Mode {
        if self == Mode::Execute && condition {
            Mode::Execute
        } else {
            Mode::Skip
        }
    }
}

/// Single-pass interpreter: statements are recognized and executed (or
/// skipped) straight off the token sequence. The cursor is owned by one run.
pub struct Interpreter<R, W> {
    cursor: TokenCursor,
    symbols: SymbolTable,
    input: InputReader<R>,
    output: W,
}

impl<R: BufRead, W: Write> Interpreter<R, W> {
    pub fn new(tokens: Vec<Token>, max_variables: usize, input: R, output: W) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            symbols: SymbolTable::new(max_variables),
            input: InputReader::new(input),
            output,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs the whole program. Output written before an error stays written.
    pub fn run(&mut self) -> Result<(), GamaError> {
        while !self.cursor.is_at_end() {
            self.statement(Mode::Execute)?;
        }
        self.cursor.consume(TokenType::Eof, "Expected end of input")?;
        self.flush()?;
        debug!("program finished with {} variables", self.symbols.len());
        Ok(())
    }

    fn statement(&mut self, mode: Mode) -> Result<(), GamaError> {
        let token_type = self.cursor.peek_type();
        match token_type {
            t if t.is_type_keyword() => self.declaration(mode),
            TokenType::Print => self.print_statement(mode),
            TokenType::Sum => self.sum_statement(mode),
            TokenType::Read => self.read_statement(mode),
            TokenType::Identifier => self.assignment(mode),
            TokenType::If => self.if_statement(mode),
            TokenType::While => self.while_statement(mode),
            TokenType::Switch => self.switch_statement(mode),
            TokenType::LeftBrace => self.block(mode),
            _ => Err(self.cursor.unexpected("Expected a statement").with_help(
                "A statement starts with a type keyword, Imprimir, Suma, Leer, Si, Mientras, Switch, a variable name or '{'.",
            )),
        }
    }

    /// `<type> ident [= expr] (, ident [= expr])* ;`
    fn declaration(&mut self, mode: Mode) -> Result<(), GamaError> {
        self.cursor.advance();

        loop {
            let (name, span) = self.identifier("Expected variable name in declaration")?;

            if mode == Mode::Execute {
                let idx = self
                    .symbols
                    .declare(&name)
                    .map_err(|e| GamaError::from_symbol(e, span))?;
                self.symbols.undefine(idx);
            }

            if self.cursor.match_type(TokenType::Equal) {
                let value = self.evaluate(mode)?;
                if mode == Mode::Execute {
                    self.symbols
                        .set(&name, value)
                        .map_err(|e| GamaError::from_symbol(e, span))?;
                }
            }

            if !self.cursor.match_type(TokenType::Comma) {
                break;
            }
        }

        self.cursor
            .consume(TokenType::Semicolon, "Expected ';' after declaration")?;
        Ok(())
    }

    /// `Imprimir ( string | expr ) ;` or the same with braces.
    fn print_statement(&mut self, mode: Mode) -> Result<(), GamaError> {
        self.cursor.advance();

        let closer = match self.cursor.peek_type() {
            TokenType::LeftParen => TokenType::RightParen,
            TokenType::LeftBrace => TokenType::RightBrace,
            _ => {
                return Err(self
                    .cursor
                    .unexpected("Expected '(' or '{' after 'Imprimir'")
                    .with_help("Write Imprimir(expression); or Imprimir{\"text\"};"))
            }
        };
        self.cursor.advance();

        let text = if self.cursor.check(TokenType::String) {
            self.cursor.advance().lexeme.clone()
        } else {
            self.evaluate(mode)?.to_string()
        };

        let message = if closer == TokenType::RightParen {
            "Expected ')' after print argument"
        } else {
            "Expected '}' after print argument"
        };
        self.cursor.consume(closer, message)?;
        self.cursor
            .consume(TokenType::Semicolon, "Expected ';' after print statement")?;

        if mode == Mode::Execute {
            self.write_line(&text)?;
        }
        Ok(())
    }

    /// `Suma expr ;`
    fn sum_statement(&mut self, mode: Mode) -> Result<(), GamaError> {
        self.cursor.advance();
        let value = self.evaluate(mode)?;
        self.cursor
            .consume(TokenType::Semicolon, "Expected ';' after 'Suma' expression")?;

        if mode == Mode::Execute {
            self.write_line(&value.to_string())?;
        }
        Ok(())
    }

    /// `Leer ( ident ) ;`
    fn read_statement(&mut self, mode: Mode) -> Result<(), GamaError> {
        let start = self.cursor.mark();
        self.cursor.advance();
        self.cursor
            .consume(TokenType::LeftParen, "Expected '(' after 'Leer'")?;
        let (name, span) = self.identifier("Expected variable name inside 'Leer'")?;
        self.cursor
            .consume(TokenType::RightParen, "Expected ')' after variable name")?;
        self.cursor
            .consume(TokenType::Semicolon, "Expected ';' after read statement")?;

        if mode == Mode::Execute {
            self.flush()?;
            let value = self
                .input
                .read_integer()
                .map_err(|e| GamaError::from_input(e, self.cursor.span_from(start)))?;
            self.symbols
                .set(&name, value)
                .map_err(|e| GamaError::from_symbol(e, span))?;
        }
        Ok(())
    }

    /// `ident = expr ;`
    fn assignment(&mut self, mode: Mode) -> Result<(), GamaError> {
        let (name, span) = self.identifier("Expected variable name")?;
        self.cursor
            .consume(TokenType::Equal, &format!("Expected '=' after '{}'", name))?;
        let value = self.evaluate(mode)?;
        self.cursor
            .consume(TokenType::Semicolon, "Expected ';' after assignment")?;

        if mode == Mode::Execute {
            self.symbols
                .set(&name, value)
                .map_err(|e| GamaError::from_symbol(e, span))?;
        }
        Ok(())
    }

    /// `Si ( expr ) stmt [Sino stmt]`; the condition is evaluated once.
    fn if_statement(&mut self, mode: Mode) -> Result<(), GamaError> {
        self.cursor.advance();
        self.cursor
            .consume(TokenType::LeftParen, "Expected '(' after 'Si'")?;
        let condition = self.evaluate(mode)?;
        self.cursor
            .consume(TokenType::RightParen, "Expected ')' after 'Si' condition")?;

        self.statement(mode.when(condition != 0))?;
        if self.cursor.match_type(TokenType::Else) {
            self.statement(mode.when(condition == 0))?;
        }
        Ok(())
    }

    /// `Mientras ( expr ) stmt`
    ///
    /// The condition and body token ranges are recorded before the first
    /// iteration. Every iteration rewinds to the recorded condition, then to
    /// the recorded body; on exit the cursor lands on the recorded body end.
    fn while_statement(&mut self, mode: Mode) -> Result<(), GamaError> {
        let line = self.cursor.peek().line;
        self.cursor.advance();
        self.cursor
            .consume(TokenType::LeftParen, "Expected '(' after 'Mientras'")?;

        let condition_start = self.cursor.mark();
        let mut condition = self.evaluate(mode)?;
        let condition_range = self.cursor.range_from(condition_start);
        self.cursor
            .consume(TokenType::RightParen, "Expected ')' after 'Mientras' condition")?;

        let body_start = self.cursor.mark();
        self.statement(Mode::Skip)?;
        let body_range = self.cursor.range_from(body_start);

        if mode == Mode::Skip || condition == 0 {
            return Ok(());
        }

        let mut iterations: u64 = 0;
        while condition != 0 {
            self.replay_statement(&body_range)?;
            iterations += 1;
            condition = self.replay_condition(&condition_range)?;
        }
        self.cursor.rewind(body_range.end);

        trace!("loop on line {} ran {} iterations", line, iterations);
        Ok(())
    }

    fn replay_condition(&mut self, range: &TokenRange) -> Result<i64, GamaError> {
        self.cursor.rewind(range.start);
        let value = self.evaluate(Mode::Execute)?;
        debug_assert_eq!(self.cursor.mark(), range.end);
        Ok(value)
    }

    fn replay_statement(&mut self, range: &TokenRange) -> Result<(), GamaError> {
        self.cursor.rewind(range.start);
        self.statement(Mode::Execute)?;
        debug_assert_eq!(self.cursor.mark(), range.end);
        Ok(())
    }

    /// `Switch ( expr ) { (Caso NUM : stmt [Romper ;])* [Predeterminado : stmt [Romper ;]] }`
    ///
    /// Only the first arm whose label equals the selector runs. The default
    /// arm runs only if no case matched. Every other arm is skipped.
    fn switch_statement(&mut self, mode: Mode) -> Result<(), GamaError> {
        self.cursor.advance();
        self.cursor
            .consume(TokenType::LeftParen, "Expected '(' after 'Switch'")?;
        let selector = self.evaluate(mode)?;
        self.cursor
            .consume(TokenType::RightParen, "Expected ')' after 'Switch' selector")?;
        self.cursor
            .consume(TokenType::LeftBrace, "Expected '{' to open the 'Switch' arms")?;

        // Once an arm has run, every later arm is consumed in skip mode, so a
        // `Romper` after the executed arm needs no extra state.
        let mut matched = false;

        while self.cursor.match_type(TokenType::Case) {
            let label = self.case_label()?;
            self.cursor
                .consume(TokenType::Colon, "Expected ':' after case label")?;

            let runs = !matched && label == selector;
            if runs && mode == Mode::Execute {
                trace!("switch selector {} matched case {}", selector, label);
            }
            self.statement(mode.when(runs))?;
            matched |= runs;
            self.break_statement()?;
        }

        if self.cursor.match_type(TokenType::Default) {
            self.cursor
                .consume(TokenType::Colon, "Expected ':' after 'Predeterminado'")?;
            if !matched && mode == Mode::Execute {
                trace!("switch selector {} fell to default", selector);
            }
            self.statement(mode.when(!matched))?;
            self.break_statement()?;
        }

        self.cursor
            .consume(TokenType::RightBrace, "Expected '}' to close the 'Switch' arms")
            .map_err(|e| {
                e.with_help("Only 'Caso N:' arms and one final 'Predeterminado:' arm may appear inside a Switch.")
            })?;
        Ok(())
    }

    fn case_label(&mut self) -> Result<i64, GamaError> {
        let token = self
            .cursor
            .consume(TokenType::Integer, "Expected integer literal after 'Caso'")?;
        token
            .lexeme
            .parse::<i64>()
            .map_err(|_| GamaError::lex_error(token.span, format!("Invalid integer: {}", token.lexeme)))
    }

    /// Optional `Romper ;` after a switch arm.
    fn break_statement(&mut self) -> Result<(), GamaError> {
        if self.cursor.match_type(TokenType::Break) {
            self.cursor
                .consume(TokenType::Semicolon, "Expected ';' after 'Romper'")?;
        }
        Ok(())
    }

    /// `{ stmt* }`
    fn block(&mut self, mode: Mode) -> Result<(), GamaError> {
        self.cursor.advance();

        while !self.cursor.check(TokenType::RightBrace) && !self.cursor.is_at_end() {
            self.statement(mode)?;
        }

        self.cursor
            .consume(TokenType::RightBrace, "Expected '}' after block")
            .map_err(|e| {
                e.with_help("Block statements must be closed with '}' after the opening '{'.")
            })?;
        Ok(())
    }

    fn evaluate(&mut self, mode: Mode) -> Result<i64, GamaError> {
        Evaluator::new(&mut self.cursor, &self.symbols, mode).expression()
    }

    fn identifier(&mut self, message: &str) -> Result<(String, Span), GamaError> {
        let token = self.cursor.consume(TokenType::Identifier, message)?;
        Ok((token.lexeme.clone(), token.span))
    }

    fn write_line(&mut self, text: &str) -> Result<(), GamaError> {
        writeln!(self.output, "{}", text).map_err(|e| {
            GamaError::io_error(self.cursor.previous().span, format!("Failed to write output: {}", e))
        })
    }

    fn flush(&mut self) -> Result<(), GamaError> {
        self.output.flush().map_err(|e| {
            GamaError::io_error(self.cursor.previous().span, format!("Failed to flush output: {}", e))
        })
    }
}
