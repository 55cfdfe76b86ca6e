use exparse::ast::dump::dump_tree;
use exparse::parse::{Symbol, Token};

pub fn ident(name: &str) -> Token {
    Token::Identifier(name.into())
}

pub fn digits(value: &str) -> Token {
    Token::DigitSequence(value.into())
}

pub fn string(content: &str, delimiter: char) -> Token {
    Token::StringLiteral {
        content: content.into(),
        delimiter,
    }
}

pub fn sym(symbol: Symbol) -> Token {
    Token::Symbol(symbol)
}

/// Parses `text` and renders either the tree outline or the error, the way fixtures store them.
pub fn render(text: &str) -> String {
    match exparse::parse_str(text) {
        Ok(expr) => dump_tree(&expr),
        Err(e) => format!("ERR {}\n", e),
    }
}

/// Builds `f(f(...f(0)...))`, which contains `levels` expressions nested inside one another.
pub fn nested_calls(levels: usize) -> String {
    let inner = levels.saturating_sub(1);

    format!("{}0{}", "f(".repeat(inner), ")".repeat(inner))
}

/// Builds `a[a[...a[0]...]]`, which contains `levels` expressions nested inside one another.
pub fn nested_brackets(levels: usize) -> String {
    let inner = levels.saturating_sub(1);

    format!("{}0{}", "a[".repeat(inner), "]".repeat(inner))
}
