use crate::config::Config;
use crate::dump;
use crate::error::{GamaError, Span};
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use log::{debug, error};
use std::io::{self, BufRead, Write};

/// Lexes and runs `source`, writing program output and the final `OK` line
/// to `output`. Reads `Leer` values from `input`.
pub fn execute<R: BufRead, W: Write>(
    source: &str,
    config: &Config,
    input: R,
    mut output: W,
) -> Result<(), GamaError> {
    // Lexical analysis
    let mut lexer = Lexer::new(source, config.limits);
    let tokens = lexer.scan_tokens()?;

    if let Some(path) = &config.token_dump {
        debug!("writing token report to {}", path.display());
        dump::dump_tokens(path, &tokens).map_err(|e| {
            GamaError::io_error(
                Span::new(0, 0),
                format!("Cannot write token report '{}': {}", path.display(), e),
            )
        })?;
    }

    // Execution
    {
        let mut interpreter =
            Interpreter::new(tokens, config.limits.max_variables, input, &mut output);
        interpreter.run()?;
    }

    writeln!(output, "OK")
        .and_then(|_| output.flush())
        .map_err(|e| GamaError::io_error(Span::new(0, 0), format!("Failed to write output: {}", e)))
}

/// Runs against the process stdin/stdout and reports any error on stderr.
/// Returns whether the program completed.
pub fn run(source: &str, filename: Option<&str>, config: &Config) -> bool {
    let stdin = io::stdin();
    let stdout = io::stdout();

    match execute(source, config, stdin.lock(), stdout.lock()) {
        Ok(()) => true,
        Err(err) => {
            // Anything the program printed must precede the diagnostic.
            let _ = io::stdout().flush();
            if let Err(report_err) = err.report(source, filename) {
                error!("could not render diagnostic: {}", report_err);
                eprintln!("{}", err);
            }
            false
        }
    }
}
