use crate::lexer::{Token, TokenClass};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

const SECTIONS: &[(&str, TokenClass)] = &[
    ("Reserved words", TokenClass::Reserved),
    ("Identifiers", TokenClass::Identifier),
    ("Numbers", TokenClass::Number),
    ("Strings", TokenClass::String),
    ("Operators", TokenClass::Operator),
    ("Symbols", TokenClass::Symbol),
];

/// Writes the classified token list, one section per token class.
pub fn write_token_report<W: Write>(tokens: &[Token], out: &mut W) -> io::Result<()> {
    for (i, (title, class)) in SECTIONS.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "-- {} --", title)?;
        for token in tokens.iter().filter(|t| t.token_type.class() == *class) {
            writeln!(out, "{}\t{}", token.token_type.report_name(), token.lexeme)?;
        }
    }
    Ok(())
}

pub fn dump_tokens(path: &Path, tokens: &[Token]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_token_report(tokens, &mut out)?;
    out.flush()
}
