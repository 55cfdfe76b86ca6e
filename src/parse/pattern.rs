//! A small backtracking pattern interpreter over a token cursor.
//!
//! Grammar rules describe what they accept as a [`Pattern`] tree and plug themselves in through
//! [`Pattern::Syntax`], dispatched by a [`RuleSet`]. Failing to match is not an error: it is
//! reported as `Ok(None)` and the caller simply tries something else from its own cursor.
//! `Err` is reserved for conditions that must abort the whole parse.

use std::fmt;

use tracing::trace;

use crate::parse::cursor::Cursor;
use crate::parse::token::{Token, TokenKind};

pub type TokenCursor<'t> = Cursor<'t, Token>;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Pattern<R> {
    /// Consumes one token of the given kind.
    Token(TokenKind),

    /// Delegates to a grammar rule, producing a single node.
    Syntax(R),

    /// Matches every piece in order.
    Sequence(Vec<Pattern<R>>),

    /// Matches the first piece that succeeds.
    Alternatives(Vec<Pattern<R>>),

    /// Greedily matches `pattern` at least `min` and at most `max` times (unbounded if `None`).
    Repeat {
        min: usize,
        max: Option<usize>,
        pattern: Box<Pattern<R>>,
    },
}

impl<R> Pattern<R> {
    pub fn token(kind: impl Into<TokenKind>) -> Self {
        Self::Token(kind.into())
    }

    pub fn syntax(rule: R) -> Self {
        Self::Syntax(rule)
    }

    pub fn sequence(pieces: impl IntoIterator<Item = Pattern<R>>) -> Self {
        Self::Sequence(pieces.into_iter().collect())
    }

    pub fn alternatives(pieces: impl IntoIterator<Item = Pattern<R>>) -> Self {
        Self::Alternatives(pieces.into_iter().collect())
    }

    pub fn repeat(min: usize, max: Option<usize>, pattern: Pattern<R>) -> Self {
        Self::Repeat {
            min,
            max,
            pattern: Box::new(pattern),
        }
    }

    pub fn optional(pattern: Pattern<R>) -> Self {
        Self::repeat(0, Some(1), pattern)
    }

    pub fn any(pattern: Pattern<R>) -> Self {
        Self::repeat(0, None, pattern)
    }
}

/// A matched token or a node produced by a rule.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Item<N> {
    Token(Token),
    Node(N),
}

/// A successful match: everything matched, flattened in order, plus the cursor after it.
#[derive(Debug, Clone)]
pub struct Match<'t, N> {
    pub items: Vec<Item<N>>,
    pub cursor: TokenCursor<'t>,
}

impl<'t, N> Match<'t, N> {
    fn empty(cursor: TokenCursor<'t>) -> Self {
        Self {
            items: vec![],
            cursor,
        }
    }
}

pub type PatternResult<'t, N, E> = Result<Option<Match<'t, N>>, E>;
pub type RuleResult<'t, N, E> = Result<Option<(N, TokenCursor<'t>)>, E>;

/// Supplies the rules referenced by [`Pattern::Syntax`].
pub trait RuleSet {
    type Rule: Copy + fmt::Debug;
    type Node;
    type Error;

    fn apply_rule<'t>(
        &mut self,
        rule: Self::Rule,
        cursor: TokenCursor<'t>,
    ) -> RuleResult<'t, Self::Node, Self::Error>;
}

/// Matches `pattern` against the tokens starting at `cursor`.
pub fn apply<'t, S: RuleSet>(
    rules: &mut S,
    pattern: &Pattern<S::Rule>,
    cursor: TokenCursor<'t>,
) -> PatternResult<'t, S::Node, S::Error> {
    match pattern {
        Pattern::Token(kind) => Ok(match cursor.peek() {
            Some(token) if token.kind() == *kind => {
                trace!(pos = cursor.pos(), %kind, "matched token");

                Some(Match {
                    items: vec![Item::Token(token.clone())],
                    cursor: cursor.advance(),
                })
            }

            _ => None,
        }),

        Pattern::Syntax(rule) => Ok(rules
            .apply_rule(*rule, cursor)?
            .map(|(node, cursor)| Match {
                items: vec![Item::Node(node)],
                cursor,
            })),

        Pattern::Sequence(pieces) => {
            let mut result = Match::empty(cursor);

            for piece in pieces {
                let Some(piece_match) = apply(rules, piece, result.cursor)? else {
                    return Ok(None);
                };

                result.items.extend(piece_match.items);
                result.cursor = piece_match.cursor;
            }

            Ok(Some(result))
        }

        Pattern::Alternatives(pieces) => {
            for piece in pieces {
                if let Some(piece_match) = apply(rules, piece, cursor)? {
                    return Ok(Some(piece_match));
                }
            }

            Ok(None)
        }

        Pattern::Repeat { min, max, pattern } => {
            let mut result = Match::empty(cursor);
            let mut count = 0;
            let mut stalled = false;

            while max.map_or(true, |max| count < max) {
                let Some(repetition) = apply(rules, pattern, result.cursor)? else {
                    break;
                };

                let progressed = repetition.cursor.pos() != result.cursor.pos();
                result.items.extend(repetition.items);
                result.cursor = repetition.cursor;
                count += 1;

                // an unbounded repetition of an empty match would never end, and every further
                // repetition would succeed the same way
                if !progressed && max.is_none() {
                    stalled = true;

                    break;
                }
            }

            Ok((stalled || count >= *min).then_some(result))
        }
    }
}
