//! The syntax tree produced by the parser.
//!
//! Every node keeps the tokens it was built from, so a tree can always be flattened back into
//! the exact token sequence it was parsed from (see [`Expression::tokens`]).

use std::fmt::{self, Display};

use serde::Serialize;

use crate::parse::token::{Symbol, Token};

use self::visit::{AstRecurse, TokenCollector, Visitor};

pub mod dump;
pub mod visit;

macro_rules! impl_recurse {
    (|$s:ident: $type:ty, $visitor:ident| $body:expr) => {
        impl AstRecurse for $type {
            fn recurse<V: Visitor<Output = ()>>(&$s, $visitor: &mut V) {
                $body;
            }
        }
    };
}

macro_rules! define_punctuation {
    ($( $name:ident => $symbol:ident, )+) => {
        $(
            #[derive(Serialize, Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
            pub struct $name;

            impl $name {
                pub const SYMBOL: Symbol = Symbol::$symbol;
            }

            impl From<$name> for Token {
                fn from(_: $name) -> Token {
                    Token::Symbol($name::SYMBOL)
                }
            }
        )+
    };
}

define_punctuation! {
    Comma => Comma,
    Period => Period,
    OpenParen => ParenLeft,
    CloseParen => ParenRight,
    OpenBracket => BracketLeft,
    CloseBracket => BracketRight,
}

/// Any node the grammar can produce.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum Node {
    Expression(Expression),
    Drilldown(Drilldown),
    FunctionCall(FunctionCall),
    Identifier(Identifier),
    Literal(Literal),
    NamedLiteral(NamedLiteral),
    NumberLiteral(NumberLiteral),
    StringLiteral(StringLiteral),
}

/// A base expression followed by any number of drilldown steps.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Expression {
    pub base: BaseExpression,
    pub drilldown: Vec<Drilldown>,
}

impl Expression {
    /// Flattens the tree back into the tokens it was parsed from.
    pub fn tokens(&self) -> Vec<Token> {
        let mut collector = TokenCollector::new();
        collector.visit_expression(self);

        collector.into_tokens()
    }
}

impl_recurse!(|self: Expression, visitor| {
    match &self.base {
        BaseExpression::Literal(lit) => visitor.visit_literal(lit),
        BaseExpression::FunctionCall(call) => visitor.visit_function_call(call),
        BaseExpression::Identifier(ident) => visitor.visit_identifier(ident),
    }

    for drilldown in &self.drilldown {
        visitor.visit_drilldown(drilldown);
    }
});

/// Renders the expression as source text.
impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in self.tokens() {
            write!(f, "{}", token)?;

            if token == Token::Symbol(Symbol::Comma) {
                write!(f, " ")?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum BaseExpression {
    Literal(Literal),
    FunctionCall(FunctionCall),
    Identifier(Identifier),
}

/// A postfix access step: `.name` or `[expr]`.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum Drilldown {
    Period {
        period: Period,
        property: Identifier,
    },

    Brackets {
        open: OpenBracket,
        index: Expression,
        close: CloseBracket,
    },
}

impl_recurse!(|self: Drilldown, visitor| match self {
    Drilldown::Period { property, .. } => visitor.visit_identifier(property),
    Drilldown::Brackets { index, .. } => visitor.visit_expression(index),
});

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub open_paren: OpenParen,
    pub arguments: Vec<Argument>,
    pub close_paren: CloseParen,
}

impl_recurse!(|self: FunctionCall, visitor| {
    for arg in &self.arguments {
        visitor.visit_argument(arg);
    }
});

/// A call argument with the comma that follows it.
///
/// Only the last argument of a call may lack a comma.
#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub struct Argument {
    pub value: Expression,
    pub comma: Option<Comma>,
}

impl_recurse!(|self: Argument, visitor| visitor.visit_expression(&self.value));

#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct Identifier {
    pub name: String,
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum Literal {
    Named(NamedLiteral),
    Number(NumberLiteral),
    String(StringLiteral),
}

impl_recurse!(|self: Literal, visitor| match self {
    Literal::Named(lit) => visitor.visit_named_literal(lit),
    Literal::Number(lit) => visitor.visit_number_literal(lit),
    Literal::String(lit) => visitor.visit_string_literal(lit),
});

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum NamedLiteral {
    False,
    Null,
    True,
}

impl From<NamedLiteral> for Token {
    fn from(lit: NamedLiteral) -> Token {
        match lit {
            NamedLiteral::False => Token::False,
            NamedLiteral::Null => Token::Null,
            NamedLiteral::True => Token::True,
        }
    }
}

impl Display for NamedLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Token::from(*self))
    }
}

#[derive(Serialize, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn symbol(self) -> Symbol {
        match self {
            Self::Plus => Symbol::Plus,
            Self::Minus => Symbol::Minus,
        }
    }
}

impl TryFrom<Symbol> for Sign {
    type Error = ();

    fn try_from(symbol: Symbol) -> Result<Self, Self::Error> {
        match symbol {
            Symbol::Plus => Ok(Self::Plus),
            Symbol::Minus => Ok(Self::Minus),
            _ => Err(()),
        }
    }
}

impl From<Sign> for Token {
    fn from(sign: Sign) -> Token {
        Token::Symbol(sign.symbol())
    }
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct NumberLiteral {
    pub sign: Option<Sign>,
    pub integer_part: String,
    pub decimal: Option<DecimalPart>,
}

/// The decimal point of a number literal and the digits after it, if any.
#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct DecimalPart {
    pub point: Period,
    pub fractional_part: Option<String>,
}

impl Display for NumberLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sign) = self.sign {
            write!(f, "{}", sign.symbol().as_char())?;
        }

        write!(f, "{}", self.integer_part)?;

        if let Some(decimal) = &self.decimal {
            write!(f, "{}", Period::SYMBOL.as_char())?;

            if let Some(digits) = &decimal.fractional_part {
                write!(f, "{}", digits)?;
            }
        }

        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
pub struct StringLiteral {
    pub content: String,
    pub delimiter: char,
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = Token::StringLiteral {
            content: self.content.clone(),
            delimiter: self.delimiter,
        };

        write!(f, "{}", token)
    }
}
