mod common;

use pretty_assertions::assert_eq;

use exparse::parse::pattern::{apply, Item, Pattern, RuleResult, RuleSet, TokenCursor};
use exparse::parse::{Cursor, Symbol, Token, TokenKind};

use self::common::{digits, ident, sym};

#[derive(Debug, Clone, Copy)]
enum TestRule {
    Digits,
    Reject,
    Abort,
    Empty,
}

#[derive(Default)]
struct TestRules {
    applied: usize,
}

impl RuleSet for TestRules {
    type Rule = TestRule;
    type Node = String;
    type Error = &'static str;

    fn apply_rule<'t>(
        &mut self,
        rule: TestRule,
        cursor: TokenCursor<'t>,
    ) -> RuleResult<'t, String, &'static str> {
        self.applied += 1;

        match rule {
            TestRule::Digits => Ok(match cursor.peek() {
                Some(Token::DigitSequence(value)) => Some((value.clone(), cursor.advance())),
                _ => None,
            }),

            TestRule::Reject => Ok(None),
            TestRule::Abort => Err("aborted"),
            TestRule::Empty => Ok(Some((String::new(), cursor))),
        }
    }
}

/// Returns the position after the match and the matched items.
fn run(
    pattern: &Pattern<TestRule>,
    tokens: &[Token],
) -> Result<Option<(usize, Vec<Item<String>>)>, &'static str> {
    let mut rules = TestRules::default();

    Ok(apply(&mut rules, pattern, Cursor::new(tokens))?.map(|m| (m.cursor.pos(), m.items)))
}

fn end_pos(pattern: &Pattern<TestRule>, tokens: &[Token]) -> Option<usize> {
    run(pattern, tokens).unwrap().map(|(pos, _)| pos)
}

#[test]
fn test_token_match() {
    let pattern = Pattern::token(TokenKind::Identifier);

    assert_eq!(
        run(&pattern, &[ident("x"), ident("y")]),
        Ok(Some((1, vec![Item::Token(ident("x"))])))
    );
    assert_eq!(run(&pattern, &[digits("1")]), Ok(None));
    assert_eq!(run(&pattern, &[]), Ok(None));
    assert_eq!(end_pos(&Pattern::token(Symbol::Comma), &[sym(Symbol::Comma)]), Some(1));
    assert_eq!(end_pos(&Pattern::token(Symbol::Comma), &[sym(Symbol::Period)]), None);
}

#[test]
fn test_syntax_match() {
    assert_eq!(
        run(&Pattern::syntax(TestRule::Digits), &[digits("42")]),
        Ok(Some((1, vec![Item::Node("42".to_string())])))
    );
    assert_eq!(run(&Pattern::syntax(TestRule::Reject), &[digits("42")]), Ok(None));
}

#[test]
fn test_sequence() {
    let pattern = Pattern::sequence([
        Pattern::token(TokenKind::Identifier),
        Pattern::token(Symbol::ParenLeft),
        Pattern::syntax(TestRule::Digits),
    ]);

    assert_eq!(
        run(&pattern, &[ident("f"), sym(Symbol::ParenLeft), digits("1")]),
        Ok(Some((
            3,
            vec![
                Item::Token(ident("f")),
                Item::Token(sym(Symbol::ParenLeft)),
                Item::Node("1".to_string()),
            ]
        )))
    );
    assert_eq!(run(&pattern, &[ident("f"), sym(Symbol::ParenLeft)]), Ok(None));
    assert_eq!(end_pos(&Pattern::sequence([]), &[ident("f")]), Some(0));
}

#[test]
fn test_alternatives_take_first_success() {
    let pattern = Pattern::alternatives([
        Pattern::token(TokenKind::Identifier),
        Pattern::sequence([
            Pattern::token(TokenKind::Identifier),
            Pattern::token(Symbol::Period),
        ]),
    ]);

    assert_eq!(end_pos(&pattern, &[ident("x"), sym(Symbol::Period)]), Some(1));

    let pattern = Pattern::alternatives([
        Pattern::syntax(TestRule::Reject),
        Pattern::token(TokenKind::DigitSequence),
    ]);

    assert_eq!(end_pos(&pattern, &[digits("1")]), Some(1));
    assert_eq!(end_pos(&Pattern::alternatives([]), &[digits("1")]), None);
}

#[test]
fn test_repeat_is_greedy_up_to_max() {
    let tokens = [digits("1"), digits("2"), digits("3")];

    assert_eq!(end_pos(&Pattern::repeat(0, Some(2), Pattern::syntax(TestRule::Digits)), &tokens), Some(2));
    assert_eq!(end_pos(&Pattern::any(Pattern::syntax(TestRule::Digits)), &tokens), Some(3));
    assert_eq!(end_pos(&Pattern::repeat(4, None, Pattern::syntax(TestRule::Digits)), &tokens), None);
}

#[test]
fn test_repeat_exact_count() {
    let pattern = Pattern::repeat(2, Some(2), Pattern::token(TokenKind::DigitSequence));
    let tokens = [digits("1"), digits("2"), digits("3")];

    assert_eq!(end_pos(&pattern, &tokens[..0]), None);
    assert_eq!(end_pos(&pattern, &tokens[..1]), None);
    assert_eq!(end_pos(&pattern, &tokens[..2]), Some(2));
    assert_eq!(end_pos(&pattern, &tokens[..3]), Some(2));
}

#[test]
fn test_optional() {
    let pattern = Pattern::optional(Pattern::token(Symbol::Comma));

    assert_eq!(run(&pattern, &[]), Ok(Some((0, vec![]))));
    assert_eq!(end_pos(&pattern, &[sym(Symbol::Comma), sym(Symbol::Comma)]), Some(1));
}

#[test]
fn test_unbounded_repeat_of_empty_match_terminates() {
    let mut rules = TestRules::default();
    let tokens = [digits("1")];
    let pattern = Pattern::any(Pattern::syntax(TestRule::Empty));

    let result = apply(&mut rules, &pattern, Cursor::new(&tokens)).unwrap().unwrap();

    assert_eq!(result.cursor.pos(), 0);
    assert_eq!(rules.applied, 1);

    let pattern = Pattern::repeat(3, None, Pattern::syntax(TestRule::Empty));
    assert_eq!(end_pos(&pattern, &tokens), Some(0));

    let pattern = Pattern::repeat(0, Some(3), Pattern::syntax(TestRule::Empty));
    assert_eq!(run(&pattern, &tokens).unwrap().unwrap().1.len(), 3);
}

#[test]
fn test_errors_abort_matching() {
    let tokens = [ident("x")];

    let pattern = Pattern::sequence([
        Pattern::token(TokenKind::Identifier),
        Pattern::syntax(TestRule::Abort),
    ]);
    assert_eq!(run(&pattern, &tokens), Err("aborted"));

    let pattern = Pattern::alternatives([
        Pattern::syntax(TestRule::Abort),
        Pattern::token(TokenKind::Identifier),
    ]);
    assert_eq!(run(&pattern, &tokens), Err("aborted"));

    let pattern = Pattern::any(Pattern::syntax(TestRule::Abort));
    assert_eq!(run(&pattern, &tokens), Err("aborted"));
}
