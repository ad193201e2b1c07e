use crate::config::Limits;
use crate::cursor::TokenCursor;
use crate::error::GamaError;
use crate::interpreter::Mode;
use crate::lexer::{Lexer, Token, TokenType};
use crate::symbols::SymbolTable;

const RELATIONAL: &[TokenType] = &[
    TokenType::EqualEqual,
    TokenType::BangEqual,
    TokenType::Less,
    TokenType::LessEqual,
    TokenType::Greater,
    TokenType::GreaterEqual,
];
const ADDITIVE: &[TokenType] = &[TokenType::Plus, TokenType::Minus];
const MULTIPLICATIVE: &[TokenType] = &[TokenType::Star, TokenType::Slash, TokenType::Percent];
const POWER: &[TokenType] = &[TokenType::Caret];

/// Precedence-climbing evaluator that computes while it parses.
///
/// Levels, loosest first: relational, additive, multiplicative, power,
/// unary. Every binary level is left-associative. In [`Mode::Skip`] the
/// same tokens are consumed but no operator is applied and no variable is
/// read, so skipped code can mention undefined names or divide by zero.
pub struct Evaluator<'a> {
    cursor: &'a mut TokenCursor,
    symbols: &'a SymbolTable,
    mode: Mode,
}

impl<'a> Evaluator<'a> {
    pub fn new(cursor: &'a mut TokenCursor, symbols: &'a SymbolTable, mode: Mode) -> Self {
        Self {
            cursor,
            symbols,
            mode,
        }
    }

    pub fn expression(&mut self) -> Result<i64, GamaError> {
        self.relational()
    }

    fn relational(&mut self) -> Result<i64, GamaError> {
        let mut left = self.additive()?;

        while let Some(operator) = self.match_operator(RELATIONAL) {
            let right = self.operand(&operator, Self::additive)?;
            left = self.apply(&operator, left, right)?;
        }

        Ok(left)
    }

    fn additive(&mut self) -> Result<i64, GamaError> {
        let mut left = self.multiplicative()?;

        while let Some(operator) = self.match_operator(ADDITIVE) {
            let right = self.operand(&operator, Self::multiplicative)?;
            left = self.apply(&operator, left, right)?;
        }

        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<i64, GamaError> {
        let mut left = self.power()?;

        while let Some(operator) = self.match_operator(MULTIPLICATIVE) {
            let right = self.operand(&operator, Self::power)?;
            left = self.apply(&operator, left, right)?;
        }

        Ok(left)
    }

    fn power(&mut self) -> Result<i64, GamaError> {
        let mut left = self.unary()?;

        while let Some(operator) = self.match_operator(POWER) {
            let right = self.operand(&operator, Self::unary)?;
            left = self.apply(&operator, left, right)?;
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<i64, GamaError> {
        if self.cursor.match_type(TokenType::Minus) {
            let value = self.primary()?;
            return Ok(value.wrapping_neg());
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<i64, GamaError> {
        match self.cursor.peek_type() {
            TokenType::LeftParen => {
                self.cursor.advance();
                let value = self.expression()?;
                self.cursor
                    .consume(TokenType::RightParen, "Expected ')' after expression")?;
                Ok(value)
            }
            TokenType::Integer => {
                let token = self.cursor.advance();
                if self.mode == Mode::Skip {
                    return Ok(0);
                }
                token.lexeme.parse::<i64>().map_err(|_| {
                    GamaError::lex_error(token.span, format!("Invalid integer: {}", token.lexeme))
                })
            }
            TokenType::Identifier => {
                let token = self.cursor.advance();
                if self.mode == Mode::Skip {
                    return Ok(0);
                }
                self.symbols
                    .get(&token.lexeme)
                    .map_err(|e| GamaError::from_symbol(e, token.span))
            }
            _ => Err(self
                .cursor
                .unexpected("Expected a number, a variable or '('")
                .with_help("An operand is an integer literal, a variable name or a parenthesized expression.")),
        }
    }

    fn match_operator(&mut self, types: &[TokenType]) -> Option<Token> {
        let token = self.cursor.peek();
        if types.contains(&token.token_type) {
            let token = token.clone();
            self.cursor.advance();
            Some(token)
        } else {
            None
        }
    }

    /// Parses the right-hand side of `operator`, reporting the operator when
    /// nothing that can start an operand follows it.
    fn operand(
        &mut self,
        operator: &Token,
        next: fn(&mut Self) -> Result<i64, GamaError>,
    ) -> Result<i64, GamaError> {
        match self.cursor.peek_type() {
            TokenType::LeftParen | TokenType::Integer | TokenType::Identifier | TokenType::Minus => {
                next(self)
            }
            _ => Err(self
                .cursor
                .unexpected(&format!("Expected expression after '{}'", operator.lexeme))
                .with_help("Binary operators require an operand on both sides.")),
        }
    }

    fn apply(&self, operator: &Token, left: i64, right: i64) -> Result<i64, GamaError> {
        if self.mode == Mode::Skip {
            return Ok(0);
        }

        let span = operator.span.to(self.cursor.previous().span);
        let value = match operator.token_type {
            TokenType::EqualEqual => (left == right) as i64,
            TokenType::BangEqual => (left != right) as i64,
            TokenType::Less => (left < right) as i64,
            TokenType::LessEqual => (left <= right) as i64,
            TokenType::Greater => (left > right) as i64,
            TokenType::GreaterEqual => (left >= right) as i64,
            TokenType::Plus => left.wrapping_add(right),
            TokenType::Minus => left.wrapping_sub(right),
            TokenType::Star => left.wrapping_mul(right),
            TokenType::Slash => {
                if right == 0 {
                    return Err(GamaError::runtime_error(span, "Division by zero".to_string()));
                }
                left.wrapping_div(right)
            }
            TokenType::Percent => {
                if right == 0 {
                    return Err(GamaError::runtime_error(span, "Modulo by zero".to_string()));
                }
                left.wrapping_rem(right)
            }
            TokenType::Caret => integer_power(left, right).ok_or_else(|| {
                GamaError::runtime_error(span, "Zero raised to a negative power".to_string())
            })?,
            _ => unreachable!(),
        };

        Ok(value)
    }
}

/// Integer exponentiation; negative exponents truncate the real result.
pub fn integer_power(base: i64, exponent: i64) -> Option<i64> {
    if exponent < 0 {
        return match base {
            0 => None,
            1 => Some(1),
            -1 => Some(if exponent % 2 == 0 { 1 } else { -1 }),
            _ => Some(0),
        };
    }

    let mut base = base;
    let mut exp = exponent as u64;
    let mut acc: i64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    Some(acc)
}

/// Lexes `source` and evaluates it as a single expression against `symbols`.
pub fn evaluate_str(source: &str, symbols: &SymbolTable) -> Result<i64, GamaError> {
    let tokens = Lexer::new(source, Limits::default()).scan_tokens()?;
    let mut cursor = TokenCursor::new(tokens);
    let value = Evaluator::new(&mut cursor, symbols, Mode::Execute).expression()?;
    if !cursor.is_at_end() {
        return Err(cursor.unexpected("Expected end of expression"));
    }
    Ok(value)
}

