mod cursor;
mod lexer;
pub mod pattern;
mod parser;
pub mod token;

use tracing::debug;

use crate::ast::Expression;

pub use cursor::{Cursor, OutOfRange};
pub use lexer::{split, Lexer, LexerError, LexicalUnit};
pub use parser::{Parser, ParserConfig, ParserError, Rule, DEFAULT_MAX_DEPTH};
pub use token::{classify, Symbol, Token, TokenKind};

/// Splits `text` into lexical units and classifies each of them.
///
/// The whole text is split before anything is classified, so a malformed character anywhere in
/// the input is reported ahead of a misclassified unit.
pub fn tokenize(text: &str) -> Result<Vec<Token>, LexerError> {
    let tokens = split(text)?
        .into_iter()
        .map(classify)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(tokens = tokens.len(), "tokenized the input");

    Ok(tokens)
}

/// Parses `tokens` as a single expression, using the default configuration.
pub fn parse(tokens: &[Token]) -> Result<Expression, ParserError> {
    parse_with_config(tokens, ParserConfig::default())
}

pub fn parse_with_config(tokens: &[Token], config: ParserConfig) -> Result<Expression, ParserError> {
    Parser::new(config).parse(tokens)
}

/// Tokenizes and parses `text`.
pub fn parse_str(text: &str) -> Result<Expression, ParserError> {
    let tokens = tokenize(text)?;

    parse(&tokens)
}
