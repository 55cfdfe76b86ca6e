use std::fmt::{self, Display};

use phf::phf_map;
use serde::Serialize;

use crate::parse::lexer::{LexerError, LexicalUnit};

/// A classified lexical unit.
#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
pub enum Token {
    Identifier(String),
    DigitSequence(String),
    StringLiteral { content: String, delimiter: char },
    False,
    Null,
    True,
    Symbol(Symbol),
}

/// The kind of a token, ignoring its payload.
#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Identifier,
    DigitSequence,
    StringLiteral,
    False,
    Null,
    True,
    Symbol(Symbol),
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Self::Identifier(_) => TokenKind::Identifier,
            Self::DigitSequence(_) => TokenKind::DigitSequence,
            Self::StringLiteral { .. } => TokenKind::StringLiteral,
            Self::False => TokenKind::False,
            Self::Null => TokenKind::Null,
            Self::True => TokenKind::True,
            Self::Symbol(sym) => TokenKind::Symbol(*sym),
        }
    }
}

impl From<Symbol> for TokenKind {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl From<Symbol> for Token {
    fn from(sym: Symbol) -> Self {
        Self::Symbol(sym)
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::DigitSequence => write!(f, "digit sequence"),
            Self::StringLiteral => write!(f, "string literal"),
            Self::False => write!(f, "`false`"),
            Self::Null => write!(f, "`null`"),
            Self::True => write!(f, "`true`"),
            Self::Symbol(sym) => write!(f, "`{}`", sym.as_char()),
        }
    }
}

/// Renders the token as source text that tokenizes back to the same token.
impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(value) | Self::DigitSequence(value) => write!(f, "{}", value),

            Self::StringLiteral { content, delimiter } => {
                write!(f, "{}", delimiter)?;

                for c in content.chars() {
                    if c == *delimiter || c == '\\' {
                        write!(f, "\\")?;
                    }

                    write!(f, "{}", c)?;
                }

                write!(f, "{}", delimiter)
            }

            Self::False => write!(f, "false"),
            Self::Null => write!(f, "null"),
            Self::True => write!(f, "true"),
            Self::Symbol(sym) => write!(f, "{}", sym.as_char()),
        }
    }
}

macro_rules! symbols {
    ($( $lit:literal => $variant:ident ),+ $(,)?) => {
        #[derive(Serialize, Debug, Clone, Copy, Hash, Eq, PartialEq)]
        pub enum Symbol {
            $( $variant ),+
        }

        impl Symbol {
            const SYMBOLS: phf::Map<char, Symbol> = phf_map! {
                $( $lit => Self::$variant ),+
            };

            pub fn parse(c: char) -> Option<Symbol> {
                Self::SYMBOLS.get(&c).copied()
            }

            pub fn as_char(self) -> char {
                match self {
                    $( Self::$variant => $lit ),+
                }
            }
        }
    };
}

symbols! {
    ',' => Comma,
    '.' => Period,
    '+' => Plus,
    '-' => Minus,
    '(' => ParenLeft,
    ')' => ParenRight,
    '[' => BracketLeft,
    ']' => BracketRight,
}

fn classify_alphanumeric(value: String) -> Result<Token, LexerError> {
    match value.as_str() {
        "false" => return Ok(Token::False),
        "null" => return Ok(Token::Null),
        "true" => return Ok(Token::True),
        _ => {}
    }

    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(Token::DigitSequence(value))
    } else if value.starts_with(|c: char| c.is_ascii_digit()) {
        Err(LexerError::InvalidIdentifier(value))
    } else {
        Ok(Token::Identifier(value))
    }
}

/// Reinterprets a lexical unit as a token.
pub fn classify(unit: LexicalUnit) -> Result<Token, LexerError> {
    match unit {
        LexicalUnit::Alphanumeric(value) => classify_alphanumeric(value),
        LexicalUnit::String { content, delimiter } => Ok(Token::StringLiteral { content, delimiter }),

        LexicalUnit::Symbol(c) => Symbol::parse(c)
            .map(Token::Symbol)
            .ok_or(LexerError::UnrecognizedSymbol(c)),
    }
}

impl TryFrom<LexicalUnit> for Token {
    type Error = LexerError;

    fn try_from(unit: LexicalUnit) -> Result<Self, Self::Error> {
        classify(unit)
    }
}
