// Gama Language Interpreter Library
//
// Single-pass interpreter for a small teaching language with Spanish
// keywords: integer variables, Imprimir/Leer, Si/Sino, Mientras and Switch.
// Statements are executed straight off the token sequence as they are
// recognized; untaken branches are consumed in skip mode.

// Public modules
pub mod config;
pub mod cursor;
pub mod dump;
pub mod error;
pub mod evaluator;
pub mod input;
pub mod interpreter;
pub mod lexer;
pub mod runner;
pub mod symbols;

// Re-export commonly used items
pub use config::{Config, Limits};
pub use cursor::{Mark, TokenCursor, TokenRange};
pub use error::{ErrorKind, GamaError, Span};
pub use evaluator::Evaluator;
pub use interpreter::{Interpreter, Mode};
pub use lexer::{Lexer, Token, TokenType};
pub use symbols::{SymbolError, SymbolTable};

// Re-export main functions
pub use runner::{execute, run};
