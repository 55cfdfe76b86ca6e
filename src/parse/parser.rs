use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::ops::{Deref, DerefMut};

use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::ast::{
    Argument, BaseExpression, CloseBracket, CloseParen, Comma, DecimalPart, Drilldown, Expression,
    FunctionCall, Identifier, Literal, NamedLiteral, Node, NumberLiteral, OpenBracket, OpenParen,
    Period, Sign, StringLiteral,
};
use crate::parse::cursor::Cursor;
use crate::parse::lexer::LexerError;
use crate::parse::pattern::{self, Item, Match, Pattern, PatternResult, RuleResult, RuleSet, TokenCursor};
use crate::parse::token::{Symbol, Token, TokenKind};
use crate::{expect_match, try_match};

pub const DEFAULT_MAX_DEPTH: usize = 32;

#[derive(Serialize, Debug, Clone, Eq, PartialEq)]
pub enum ParserError {
    Unparsable,
    IncompleteParse { unconsumed: usize },
    RecursionLimit(usize),
    LexerError(LexerError),
}

impl From<LexerError> for ParserError {
    fn from(e: LexerError) -> Self {
        Self::LexerError(e)
    }
}

impl Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparsable => write!(f, "the tokens do not form an expression"),

            Self::IncompleteParse { unconsumed } => write!(
                f,
                "encountered unexpected tokens after the expression ({} left unconsumed)",
                unconsumed
            ),

            Self::RecursionLimit(limit) => write!(
                f,
                "the expression is nested deeper than the limit of {} levels",
                limit
            ),

            Self::LexerError(err) => write!(f, "{}", err),
        }
    }
}

impl Error for ParserError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::LexerError(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct ParserConfig {
    /// How many expressions may be nested inside one another.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// The grammar rules, as referenced from patterns.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Rule {
    Expression,
    Drilldown,
    FunctionCall,
    Identifier,
    Literal,
    NamedLiteral,
    NumberLiteral,
    StringLiteral,
}

static EXPRESSION: Lazy<Pattern<Rule>> = Lazy::new(|| {
    Pattern::sequence([
        // a call must be tried before a bare identifier, or `f(x)` would stop right after `f`
        Pattern::alternatives([
            Pattern::syntax(Rule::Literal),
            Pattern::syntax(Rule::FunctionCall),
            Pattern::syntax(Rule::Identifier),
        ]),
        Pattern::any(Pattern::syntax(Rule::Drilldown)),
    ])
});

static DRILLDOWN: Lazy<Pattern<Rule>> = Lazy::new(|| {
    Pattern::alternatives([
        Pattern::sequence([
            Pattern::token(Symbol::Period),
            Pattern::syntax(Rule::Identifier),
        ]),
        Pattern::sequence([
            Pattern::token(Symbol::BracketLeft),
            Pattern::syntax(Rule::Expression),
            Pattern::token(Symbol::BracketRight),
        ]),
    ])
});

static FUNCTION_CALL: Lazy<Pattern<Rule>> = Lazy::new(|| {
    Pattern::sequence([
        Pattern::token(TokenKind::Identifier),
        Pattern::token(Symbol::ParenLeft),
        Pattern::optional(Pattern::sequence([
            Pattern::syntax(Rule::Expression),
            Pattern::any(Pattern::sequence([
                Pattern::token(Symbol::Comma),
                Pattern::syntax(Rule::Expression),
            ])),
            Pattern::optional(Pattern::token(Symbol::Comma)),
        ])),
        Pattern::token(Symbol::ParenRight),
    ])
});

static IDENTIFIER: Lazy<Pattern<Rule>> = Lazy::new(|| Pattern::token(TokenKind::Identifier));

static LITERAL: Lazy<Pattern<Rule>> = Lazy::new(|| {
    Pattern::alternatives([
        Pattern::syntax(Rule::NamedLiteral),
        Pattern::syntax(Rule::NumberLiteral),
        Pattern::syntax(Rule::StringLiteral),
    ])
});

static NAMED_LITERAL: Lazy<Pattern<Rule>> = Lazy::new(|| {
    Pattern::alternatives([
        Pattern::token(TokenKind::False),
        Pattern::token(TokenKind::Null),
        Pattern::token(TokenKind::True),
    ])
});

static NUMBER_LITERAL: Lazy<Pattern<Rule>> = Lazy::new(|| {
    Pattern::sequence([
        Pattern::optional(Pattern::alternatives([
            Pattern::token(Symbol::Minus),
            Pattern::token(Symbol::Plus),
        ])),
        Pattern::token(TokenKind::DigitSequence),
        // a trailing decimal point is allowed with or without a fractional part
        Pattern::optional(Pattern::sequence([
            Pattern::token(Symbol::Period),
            Pattern::optional(Pattern::token(TokenKind::DigitSequence)),
        ])),
    ])
});

static STRING_LITERAL: Lazy<Pattern<Rule>> = Lazy::new(|| Pattern::token(TokenKind::StringLiteral));

type GrammarResult<'t, N> = RuleResult<'t, N, ParserError>;

#[track_caller]
fn unexpected_result(item: impl Debug) -> ! {
    panic!("unexpected pattern parse result: {:?}", item)
}

fn into_node<'t, N>(
    result: Option<(N, TokenCursor<'t>)>,
    variant: impl FnOnce(N) -> Node,
) -> Option<(Node, TokenCursor<'t>)> {
    result.map(|(node, cursor)| (variant(node), cursor))
}

struct BoundedParser<'a> {
    parser: &'a mut Parser,
}

impl Drop for BoundedParser<'_> {
    fn drop(&mut self) {
        self.parser.remaining_depth += 1;
    }
}

impl Deref for BoundedParser<'_> {
    type Target = Parser;

    fn deref(&self) -> &Parser {
        self.parser
    }
}

impl DerefMut for BoundedParser<'_> {
    fn deref_mut(&mut self) -> &mut Parser {
        self.parser
    }
}

/// Parses a token sequence into an [`Expression`].
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
    remaining_depth: usize,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            remaining_depth: config.max_depth,
        }
    }

    fn bounded(&mut self) -> Result<BoundedParser<'_>, ParserError> {
        self.remaining_depth = self
            .remaining_depth
            .checked_sub(1)
            .ok_or(ParserError::RecursionLimit(self.config.max_depth))?;

        Ok(BoundedParser { parser: self })
    }

    fn match_pattern<'t>(
        &mut self,
        pattern: &Pattern<Rule>,
        cursor: TokenCursor<'t>,
    ) -> PatternResult<'t, Node, ParserError> {
        pattern::apply(self, pattern, cursor)
    }

    /// Parses all of `tokens` as a single expression.
    pub fn parse(mut self, tokens: &[Token]) -> Result<Expression, ParserError> {
        let (expr, cursor) = self
            .parse_expression(Cursor::new(tokens))?
            .ok_or(ParserError::Unparsable)?;

        if !cursor.is_exhausted() {
            return Err(ParserError::IncompleteParse {
                unconsumed: cursor.remaining().len(),
            });
        }

        debug!(tokens = tokens.len(), "parsed an expression");

        Ok(expr)
    }

    fn parse_expression<'t>(&mut self, cursor: TokenCursor<'t>) -> GrammarResult<'t, Expression> {
        self.bounded()?.parse_expression_body(cursor)
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_expression_body<'t>(
        &mut self,
        cursor: TokenCursor<'t>,
    ) -> GrammarResult<'t, Expression> {
        let Some(Match { items, cursor }) = self.match_pattern(&EXPRESSION, cursor)? else {
            return Ok(None);
        };

        let mut items = items.into_iter();

        let base = match items.next() {
            Some(Item::Node(Node::Literal(lit))) => BaseExpression::Literal(lit),
            Some(Item::Node(Node::FunctionCall(call))) => BaseExpression::FunctionCall(call),
            Some(Item::Node(Node::Identifier(ident))) => BaseExpression::Identifier(ident),
            other => unexpected_result(other),
        };

        let drilldown = items
            .map(|item| expect_match!(item, Item::Node(Node::Drilldown(drilldown)) => drilldown))
            .collect();

        Ok(Some((Expression { base, drilldown }, cursor)))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_drilldown<'t>(&mut self, cursor: TokenCursor<'t>) -> GrammarResult<'t, Drilldown> {
        let Some(Match { items, cursor }) = self.match_pattern(&DRILLDOWN, cursor)? else {
            return Ok(None);
        };

        let mut items = items.into_iter();

        let drilldown = match items.next() {
            Some(Item::Token(Token::Symbol(Symbol::Period))) => Drilldown::Period {
                period: Period,
                property: expect_match!(
                    items.next(),
                    Some(Item::Node(Node::Identifier(ident))) => ident
                ),
            },

            Some(Item::Token(Token::Symbol(Symbol::BracketLeft))) => Drilldown::Brackets {
                open: OpenBracket,
                index: expect_match!(items.next(), Some(Item::Node(Node::Expression(expr))) => expr),
                close: expect_match!(
                    items.next(),
                    Some(Item::Token(Token::Symbol(Symbol::BracketRight))) => CloseBracket
                ),
            },

            other => unexpected_result(other),
        };

        Ok(Some((drilldown, cursor)))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_function_call<'t>(
        &mut self,
        cursor: TokenCursor<'t>,
    ) -> GrammarResult<'t, FunctionCall> {
        let Some(Match { items, cursor }) = self.match_pattern(&FUNCTION_CALL, cursor)? else {
            return Ok(None);
        };

        let mut items = items.into_iter();
        let name = expect_match!(items.next(), Some(Item::Token(Token::Identifier(name))) => name);
        let open_paren = expect_match!(
            items.next(),
            Some(Item::Token(Token::Symbol(Symbol::ParenLeft))) => OpenParen
        );
        let close_paren = expect_match!(
            items.next_back(),
            Some(Item::Token(Token::Symbol(Symbol::ParenRight))) => CloseParen
        );

        // pair each argument with the comma right after it
        let mut items = items.peekable();
        let mut arguments = Vec::new();

        while let Some(item) = items.next() {
            let value = expect_match!(item, Item::Node(Node::Expression(expr)) => expr);
            let comma = items
                .next_if(|item| matches!(item, Item::Token(Token::Symbol(Symbol::Comma))))
                .map(|_| Comma);

            if comma.is_none() {
                if let Some(item) = items.peek() {
                    unexpected_result(item);
                }
            }

            arguments.push(Argument { value, comma });
        }

        Ok(Some((
            FunctionCall {
                name,
                open_paren,
                arguments,
                close_paren,
            },
            cursor,
        )))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_identifier<'t>(&mut self, cursor: TokenCursor<'t>) -> GrammarResult<'t, Identifier> {
        let Some(Match { items, cursor }) = self.match_pattern(&IDENTIFIER, cursor)? else {
            return Ok(None);
        };

        let name = expect_match!(
            items.into_iter().next(),
            Some(Item::Token(Token::Identifier(name))) => name
        );

        Ok(Some((Identifier { name }, cursor)))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_literal<'t>(&mut self, cursor: TokenCursor<'t>) -> GrammarResult<'t, Literal> {
        let Some(Match { items, cursor }) = self.match_pattern(&LITERAL, cursor)? else {
            return Ok(None);
        };

        let lit = match items.into_iter().next() {
            Some(Item::Node(Node::NamedLiteral(lit))) => Literal::Named(lit),
            Some(Item::Node(Node::NumberLiteral(lit))) => Literal::Number(lit),
            Some(Item::Node(Node::StringLiteral(lit))) => Literal::String(lit),
            other => unexpected_result(other),
        };

        Ok(Some((lit, cursor)))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_named_literal<'t>(
        &mut self,
        cursor: TokenCursor<'t>,
    ) -> GrammarResult<'t, NamedLiteral> {
        let Some(Match { items, cursor }) = self.match_pattern(&NAMED_LITERAL, cursor)? else {
            return Ok(None);
        };

        let lit = match items.into_iter().next() {
            Some(Item::Token(Token::False)) => NamedLiteral::False,
            Some(Item::Token(Token::Null)) => NamedLiteral::Null,
            Some(Item::Token(Token::True)) => NamedLiteral::True,
            other => unexpected_result(other),
        };

        Ok(Some((lit, cursor)))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_number_literal<'t>(
        &mut self,
        cursor: TokenCursor<'t>,
    ) -> GrammarResult<'t, NumberLiteral> {
        let Some(Match { items, cursor }) = self.match_pattern(&NUMBER_LITERAL, cursor)? else {
            return Ok(None);
        };

        let mut items = items.into_iter().peekable();

        let sign = items
            .peek()
            .and_then(|item| try_match!(item, Item::Token(Token::Symbol(sym)) => *sym))
            .and_then(|sym| Sign::try_from(sym).ok());

        if sign.is_some() {
            items.next();
        }

        let integer_part = expect_match!(
            items.next(),
            Some(Item::Token(Token::DigitSequence(digits))) => digits
        );

        // the fractional part only ever follows the decimal point
        let decimal = items.next().map(|item| {
            let point = expect_match!(item, Item::Token(Token::Symbol(Symbol::Period)) => Period);
            let fractional_part = items.next().map(|item| {
                expect_match!(item, Item::Token(Token::DigitSequence(digits)) => digits)
            });

            DecimalPart {
                point,
                fractional_part,
            }
        });

        Ok(Some((
            NumberLiteral {
                sign,
                integer_part,
                decimal,
            },
            cursor,
        )))
    }

    #[instrument(level = "trace", skip(self), ret)]
    fn parse_string_literal<'t>(
        &mut self,
        cursor: TokenCursor<'t>,
    ) -> GrammarResult<'t, StringLiteral> {
        let Some(Match { items, cursor }) = self.match_pattern(&STRING_LITERAL, cursor)? else {
            return Ok(None);
        };

        let (content, delimiter) = expect_match!(
            items.into_iter().next(),
            Some(Item::Token(Token::StringLiteral { content, delimiter })) => (content, delimiter)
        );

        Ok(Some((StringLiteral { content, delimiter }, cursor)))
    }
}

impl RuleSet for Parser {
    type Rule = Rule;
    type Node = Node;
    type Error = ParserError;

    fn apply_rule<'t>(&mut self, rule: Rule, cursor: TokenCursor<'t>) -> GrammarResult<'t, Node> {
        Ok(match rule {
            Rule::Expression => into_node(self.parse_expression(cursor)?, Node::Expression),
            Rule::Drilldown => into_node(self.parse_drilldown(cursor)?, Node::Drilldown),
            Rule::FunctionCall => into_node(self.parse_function_call(cursor)?, Node::FunctionCall),
            Rule::Identifier => into_node(self.parse_identifier(cursor)?, Node::Identifier),
            Rule::Literal => into_node(self.parse_literal(cursor)?, Node::Literal),
            Rule::NamedLiteral => into_node(self.parse_named_literal(cursor)?, Node::NamedLiteral),
            Rule::NumberLiteral => {
                into_node(self.parse_number_literal(cursor)?, Node::NumberLiteral)
            }
            Rule::StringLiteral => {
                into_node(self.parse_string_literal(cursor)?, Node::StringLiteral)
            }
        })
    }
}
