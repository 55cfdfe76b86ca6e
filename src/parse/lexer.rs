use std::error::Error;
use std::fmt::{self, Display};
use std::iter::FusedIterator;

use serde::Serialize;
use tracing::trace;
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::parse::cursor::Cursor;

const BYTE_ORDER_MARK: char = '\u{feff}';
const NEXT_LINE: char = '\u{85}';

// NEL is a control character that does not separate units
fn is_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != NEXT_LINE) || c == BYTE_ORDER_MARK
}

fn is_alphanumeric(c: char) -> bool {
    use GeneralCategory::*;

    c == '_'
        || matches!(
            get_general_category(c),
            UppercaseLetter
                | LowercaseLetter
                | TitlecaseLetter
                | ModifierLetter
                | OtherLetter
                | DecimalNumber
                | LetterNumber
                | OtherNumber
        )
}

fn is_symbol(c: char) -> bool {
    use GeneralCategory::*;

    c != '_'
        && matches!(
            get_general_category(c),
            ConnectorPunctuation
                | DashPunctuation
                | OpenPunctuation
                | ClosePunctuation
                | InitialPunctuation
                | FinalPunctuation
                | OtherPunctuation
                | MathSymbol
                | CurrencySymbol
                | ModifierSymbol
                | OtherSymbol
        )
}

// tabs and newlines are control characters too, but they separate units like any other space
fn is_invalid(c: char) -> bool {
    use GeneralCategory::*;

    !is_whitespace(c)
        && matches!(
            get_general_category(c),
            Control
                | Format
                | Surrogate
                | PrivateUse
                | Unassigned
                | NonspacingMark
                | SpacingMark
                | EnclosingMark
        )
}

fn is_string_delimiter(c: char) -> bool {
    c == '"' || c == '\''
}

/// An uninterpreted chunk of the input text.
#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
pub enum LexicalUnit {
    /// A run of letters, numbers and underscores.
    Alphanumeric(String),

    /// A quoted string with its escapes already resolved.
    String { content: String, delimiter: char },

    /// A single punctuation or symbol character.
    Symbol(char),
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum LexerError {
    InvalidCharacter(char),
    UnterminatedString,
    UnrecognizedSymbol(char),
    InvalidIdentifier(String),
}

impl Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lexical analysis failed: ")?;

        match self {
            Self::InvalidCharacter(c) => {
                write!(f, "encountered an invalid character '{}'", c.escape_unicode())
            }

            Self::UnterminatedString => write!(f, "the string is not terminated"),

            Self::UnrecognizedSymbol(c) => write!(f, "encountered an unrecognized symbol '{}'", c),

            Self::InvalidIdentifier(value) => {
                write!(f, "an identifier cannot start with a digit: `{}`", value)
            }
        }
    }
}

impl Error for LexerError {}

/// Splits text into lexical units, one codepoint at a time.
///
/// The lexer stops after yielding the first error.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a, char>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(cursor: Cursor<'a, char>) -> Self {
        Self {
            cursor,
            failed: false,
        }
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a [char] {
        let remaining = self.cursor.remaining();
        let n = remaining.iter().take_while(|&&c| predicate(c)).count();
        self.cursor = self.cursor.advance_by(n);

        &remaining[..n]
    }

    fn scan_alphanumeric(&mut self) -> LexicalUnit {
        LexicalUnit::Alphanumeric(self.consume_while(is_alphanumeric).iter().collect())
    }

    fn scan_string(&mut self, delimiter: char) -> Result<LexicalUnit, LexerError> {
        let mut cursor = self.cursor.advance();
        let mut content = String::new();

        loop {
            let c = *cursor
                .current()
                .map_err(|_| LexerError::UnterminatedString)?;

            if c == delimiter {
                break;
            }

            if c == '\\' {
                cursor = cursor.advance();
                let escaped = *cursor
                    .current()
                    .map_err(|_| LexerError::UnterminatedString)?;
                content.push(escaped);
            } else {
                content.push(c);
            }

            cursor = cursor.advance();
        }

        // step over the closing delimiter
        self.cursor = cursor.advance();

        Ok(LexicalUnit::String { content, delimiter })
    }

    fn scan_symbol(&mut self, c: char) -> LexicalUnit {
        self.cursor = self.cursor.advance();

        LexicalUnit::Symbol(c)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<LexicalUnit, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let result = loop {
            let c = *self.cursor.peek()?;

            break match c {
                _ if is_invalid(c) => Err(LexerError::InvalidCharacter(c)),
                _ if is_alphanumeric(c) => Ok(self.scan_alphanumeric()),
                _ if is_string_delimiter(c) => self.scan_string(c),
                _ if is_symbol(c) => Ok(self.scan_symbol(c)),

                _ => {
                    self.cursor = self.cursor.advance();

                    continue;
                }
            };
        };

        trace!(pos = self.cursor.pos(), unit = ?result);
        self.failed = result.is_err();

        Some(result)
    }
}

impl FusedIterator for Lexer<'_> {}

/// Splits `text` into lexical units.
pub fn split(text: &str) -> Result<Vec<LexicalUnit>, LexerError> {
    let chars = text.chars().collect::<Vec<_>>();

    Lexer::new(Cursor::new(&chars)).collect()
}
