use crate::config::Limits;
use crate::error::{GamaError, Span};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Colon,

    // Arithmetic operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,

    // One or two character tokens
    Equal,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Literals
    Identifier,
    String,
    Integer,

    // Type keywords
    Int,
    Char,
    Float,
    Var,
    Const,
    Items,
    Item,

    // Control keywords
    Print,
    Read,
    Sum,
    If,
    Else,
    While,
    Switch,
    Case,
    Default,
    Break,

    // Special
    Unknown,
    Eof,
}

/// Coarse classes used by the token report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Reserved,
    Identifier,
    Number,
    String,
    Operator,
    Symbol,
    Other,
}

impl TokenType {
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenType::Int
                | TokenType::Char
                | TokenType::Float
                | TokenType::Var
                | TokenType::Const
                | TokenType::Items
                | TokenType::Item
        )
    }

    pub fn class(self) -> TokenClass {
        use TokenType::*;
        match self {
            Int | Char | Float | Var | Const | Items | Item | Print | Read | Sum | If | Else
            | While | Switch | Case | Default | Break => TokenClass::Reserved,
            Identifier => TokenClass::Identifier,
            Integer => TokenClass::Number,
            String => TokenClass::String,
            Plus | Minus | Star | Slash | Percent | Caret | Equal | EqualEqual | BangEqual
            | Less | LessEqual | Greater | GreaterEqual => TokenClass::Operator,
            LeftParen | RightParen | LeftBrace | RightBrace | Comma | Semicolon | Colon => {
                TokenClass::Symbol
            }
            Unknown | Eof => TokenClass::Other,
        }
    }

    /// Upper-case name written to the token report.
    pub fn report_name(self) -> &'static str {
        use TokenType::*;
        match self {
            LeftParen => "LPAREN",
            RightParen => "RPAREN",
            LeftBrace => "LBRACE",
            RightBrace => "RBRACE",
            Comma => "COMMA",
            Semicolon => "SEMI",
            Colon => "COLON",
            Plus => "PLUS",
            Minus => "MINUS",
            Star => "MULT",
            Slash => "DIV",
            Percent => "MOD",
            Caret => "POW",
            Equal => "ASSIGN",
            EqualEqual => "EQ",
            BangEqual => "NEQ",
            Less => "LT",
            LessEqual => "LE",
            Greater => "GT",
            GreaterEqual => "GE",
            Identifier => "IDENT",
            String => "STRING",
            Integer => "NUM",
            Int => "INT",
            Char => "CHAR",
            Float => "FLOAT",
            Var => "VAR",
            Const => "CONST",
            Items => "ITEMS",
            Item => "ITEM",
            Print => "PRINT",
            Read => "READ",
            Sum => "SUM",
            If => "IF",
            Else => "ELSE",
            While => "WHILE",
            Switch => "SWITCH",
            Case => "CASE",
            Default => "DEFAULT",
            Break => "BREAK",
            Unknown => "UNKNOWN",
            Eof => "EOF",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    /// Source spelling; string literals hold their contents without quotes.
    pub lexeme: String,
    pub span: Span,
    pub line: usize,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, span: Span, line: usize) -> Self {
        Self {
            token_type,
            lexeme,
            span,
            line,
        }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.token_type {
            TokenType::Eof => write!(f, "end of input"),
            TokenType::String => write!(f, "string \"{}\"", self.lexeme),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

pub struct Lexer {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    limits: Limits,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    pub fn new(source: &str, limits: Limits) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("entero", TokenType::Int);
        keywords.insert("caracter", TokenType::Char);
        keywords.insert("flotante", TokenType::Float);
        keywords.insert("var", TokenType::Var);
        keywords.insert("const", TokenType::Const);
        keywords.insert("items", TokenType::Items);
        keywords.insert("item", TokenType::Item);
        keywords.insert("imprimir", TokenType::Print);
        keywords.insert("leer", TokenType::Read);
        keywords.insert("suma", TokenType::Sum);
        keywords.insert("si", TokenType::If);
        keywords.insert("sino", TokenType::Else);
        keywords.insert("mientras", TokenType::While);
        keywords.insert("switch", TokenType::Switch);
        keywords.insert("caso", TokenType::Case);
        keywords.insert("predeterminado", TokenType::Default);
        keywords.insert("romper", TokenType::Break);

        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            limits,
            keywords,
        }
    }

    /// Produces the whole token sequence, terminated by exactly one `Eof`.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, GamaError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.start = self.current;
        self.push_token(TokenType::Eof, "EOF".to_string())?;

        debug!(
            "lexed {} tokens over {} lines",
            self.tokens.len(),
            self.line
        );
        Ok(std::mem::take(&mut self.tokens))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn scan_token(&mut self) -> Result<(), GamaError> {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            ';' => self.add_token(TokenType::Semicolon),
            ':' => self.add_token(TokenType::Colon),
            '+' => self.add_token(TokenType::Plus),
            '-' => self.add_token(TokenType::Minus),
            '*' => self.add_token(TokenType::Star),
            '/' => self.add_token(TokenType::Slash),
            '%' => self.add_token(TokenType::Percent),
            '^' => self.add_token(TokenType::Caret),
            '=' => {
                let token_type = if self.match_char('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(token_type)
            }
            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenType::BangEqual)
                } else {
                    self.unknown(c)
                }
            }
            '<' => {
                let token_type = if self.match_char('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(token_type)
            }
            '>' => {
                let token_type = if self.match_char('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(token_type)
            }
            ' ' | '\r' | '\t' => Ok(()),
            '\n' => {
                self.line += 1;
                Ok(())
            }
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() => self.identifier(),
            _ => self.unknown(c),
        }
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.source[start..end].iter().collect()
    }

    fn string(&mut self) -> Result<(), GamaError> {
        while !self.is_at_end() && self.peek() != '"' && self.peek() != '\n' {
            self.current += 1;
        }

        if self.peek() != '"' {
            return Err(GamaError::lex_error(
                Span::new(self.start, self.current),
                format!("Unterminated string on line {}", self.line),
            )
            .with_help("String literals must close with '\"' on the line where they start."));
        }

        // Closing quote
        self.current += 1;

        let contents = self.text(self.start + 1, self.current - 1);
        self.push_token(TokenType::String, contents)
    }

    fn number(&mut self) -> Result<(), GamaError> {
        while self.peek().is_ascii_digit() {
            self.current += 1;
        }

        let digits = self.text(self.start, self.current);
        if digits.parse::<i64>().is_err() {
            return Err(GamaError::lex_error(
                Span::new(self.start, self.current),
                format!("Integer literal {} does not fit in a 64-bit cell", digits),
            ));
        }

        self.push_token(TokenType::Integer, digits)
    }

    fn identifier(&mut self) -> Result<(), GamaError> {
        while self.peek().is_ascii_alphanumeric() {
            self.current += 1;
        }

        let text = self.text(self.start, self.current);
        let token_type = self
            .keywords
            .get(text.to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(TokenType::Identifier);

        if token_type == TokenType::Identifier && text.len() > self.limits.max_identifier_len {
            return Err(GamaError::capacity_error(
                Span::new(self.start, self.current),
                format!(
                    "Identifier is {} characters long, the limit is {}",
                    text.len(),
                    self.limits.max_identifier_len
                ),
            ));
        }

        self.push_token(token_type, text)
    }

    fn unknown(&mut self, c: char) -> Result<(), GamaError> {
        warn!("unrecognized character '{}' on line {}", c, self.line);
        self.add_token(TokenType::Unknown)
    }

    fn add_token(&mut self, token_type: TokenType) -> Result<(), GamaError> {
        let text = self.text(self.start, self.current);
        self.push_token(token_type, text)
    }

    fn push_token(&mut self, token_type: TokenType, lexeme: String) -> Result<(), GamaError> {
        let span = if token_type == TokenType::Eof {
            Span::new(self.current, self.current)
        } else {
            Span::new(self.start, self.current)
        };

        if self.tokens.len() >= self.limits.max_tokens {
            return Err(GamaError::capacity_error(
                span,
                format!("Too many tokens (limit is {})", self.limits.max_tokens),
            )
            .with_help("Raise the limit with --max-tokens."));
        }

        self.tokens.push(Token::new(token_type, lexeme, span, self.line));
        Ok(())
    }
}
