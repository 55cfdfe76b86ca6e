mod common;

use std::thread;

use insta::{assert_ron_snapshot, assert_snapshot};
use paste::paste;
use pretty_assertions::{assert_eq, assert_str_eq};

use exparse::ast::visit::{DefaultVisitor, Visitor};
use exparse::ast::{
    BaseExpression, Drilldown, Expression, FunctionCall, Identifier, Literal, NamedLiteral,
    NumberLiteral, Sign,
};
use exparse::parse::{LexerError, ParserConfig, ParserError, Symbol, DEFAULT_MAX_DEPTH};
use exparse::{parse, parse_str, parse_with_config, tokenize};

use self::common::{digits, ident, nested_brackets, nested_calls, render, sym};

macro_rules! run_parser_test {
    ($filename:expr) => ({
        let text = include_str!(concat!("parser/", $filename, ".expr"));
        let actual = render(text.trim_end());
        let expected = include_str!(concat!("parser/", $filename, ".tree"));

        assert_str_eq!(actual, expected, "while parsing {:?}", text);
    });

    { $( $filename:ident ),+ $(,)? } => {
        $(
            paste! {
                #[test]
                fn [< test_ $filename >]() {
                    run_parser_test!(stringify!($filename));
                }
            }
        )+
    };
}

run_parser_test! {
    fail_digit_identifier,
    fail_empty,
    fail_empty_argument,
    fail_lone_comma,
    fail_method_call,
    fail_unclosed_call,
    fail_unterminated_string,
    pass_call_empty,
    pass_call_mixed_args,
    pass_call_trailing_comma,
    pass_drilldown,
    pass_identifier,
    pass_named_literal,
    pass_nested_brackets,
    pass_numbers,
    pass_string_escapes,
}

fn base_of(expr: &Expression) -> &BaseExpression {
    assert!(expr.drilldown.is_empty(), "unexpected drilldown: {:?}", expr.drilldown);

    &expr.base
}

fn number(expr: &Expression) -> &NumberLiteral {
    match base_of(expr) {
        BaseExpression::Literal(Literal::Number(lit)) => lit,
        other => panic!("expected a number literal, got {:?}", other),
    }
}

fn call(expr: &Expression) -> &FunctionCall {
    match base_of(expr) {
        BaseExpression::FunctionCall(call) => call,
        other => panic!("expected a function call, got {:?}", other),
    }
}

#[test]
fn test_call_without_arguments() {
    let expr = parse_str("f()").unwrap();
    let call = call(&expr);

    assert_eq!(call.name, "f");
    assert!(call.arguments.is_empty());
}

#[test]
fn test_call_is_preferred_over_identifier() {
    let expr = parse_str("f(x)").unwrap();

    assert_eq!(call(&expr).arguments.len(), 1);
}

#[test]
fn test_call_argument_commas() {
    let expr = parse_str("f(true, false)").unwrap();
    let args = &call(&expr).arguments;

    assert_eq!(args.len(), 2);
    assert!(args[0].comma.is_some());
    assert!(args[1].comma.is_none());

    let expr = parse_str("f(true,)").unwrap();
    let args = &call(&expr).arguments;

    assert_eq!(args.len(), 1);
    assert!(args[0].comma.is_some());
    assert_eq!(
        *base_of(&args[0].value),
        BaseExpression::Literal(Literal::Named(NamedLiteral::True))
    );
}

#[test]
fn test_drilldown_order() {
    let expr = parse_str("x[true].y").unwrap();

    assert_eq!(
        expr.base,
        BaseExpression::Identifier(Identifier { name: "x".into() })
    );
    assert_eq!(expr.drilldown.len(), 2);

    match &expr.drilldown[0] {
        Drilldown::Brackets { index, .. } => assert_eq!(
            *base_of(index),
            BaseExpression::Literal(Literal::Named(NamedLiteral::True))
        ),

        other => panic!("expected brackets, got {:?}", other),
    }

    match &expr.drilldown[1] {
        Drilldown::Period { property, .. } => assert_eq!(property.name, "y"),
        other => panic!("expected a property access, got {:?}", other),
    }
}

#[test]
fn test_number_literals() {
    let expr = parse_str("123").unwrap();
    let lit = number(&expr);

    assert_eq!(lit.sign, None);
    assert_eq!(lit.integer_part, "123");
    assert!(lit.decimal.is_none());

    assert_eq!(
        parse(&[digits("123"), sym(Symbol::Comma)]),
        Err(ParserError::IncompleteParse { unconsumed: 1 })
    );

    let expr = parse_str("-1.").unwrap();
    let lit = number(&expr);

    assert_eq!(lit.sign, Some(Sign::Minus));
    assert_eq!(lit.decimal.as_ref().unwrap().fractional_part, None);

    let expr = parse_str("+ 1.25").unwrap();
    let lit = number(&expr);

    assert_eq!(lit.sign, Some(Sign::Plus));
    assert_eq!(lit.decimal.as_ref().unwrap().fractional_part.as_deref(), Some("25"));
}

#[test]
fn test_sign_requires_digits() {
    assert_eq!(parse_str("-x"), Err(ParserError::Unparsable));
    assert_eq!(parse_str("-"), Err(ParserError::Unparsable));
}

#[test]
fn test_empty_input_is_unparsable() {
    assert_eq!(parse(&[]), Err(ParserError::Unparsable));
    assert_eq!(parse(&[sym(Symbol::Comma)]), Err(ParserError::Unparsable));
}

#[test]
fn test_trailing_tokens_are_reported() {
    assert_eq!(
        parse(&[ident("x"), ident("y")]),
        Err(ParserError::IncompleteParse { unconsumed: 1 })
    );
    assert_eq!(
        parse_str("f(x)(y)"),
        Err(ParserError::IncompleteParse { unconsumed: 3 })
    );
    assert_eq!(
        parse_str("f(,)"),
        Err(ParserError::IncompleteParse { unconsumed: 3 })
    );
}

#[test]
fn test_lexer_errors_pass_through() {
    assert_eq!(
        parse_str("'abc"),
        Err(ParserError::LexerError(LexerError::UnterminatedString))
    );

    let err = parse_str("$").unwrap_err();

    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_tokens_round_trip() {
    let text = "f(-1.5, 'a', x[0].y, g(),)[null]";
    let tokens = tokenize(text).unwrap();
    let expr = parse(&tokens).unwrap();

    assert_eq!(expr.tokens(), tokens);
}

#[test]
fn test_number_tokens() {
    let expr = parse(&[sym(Symbol::Minus), digits("1"), sym(Symbol::Period), digits("50")]).unwrap();

    assert_eq!(number(&expr).to_string(), "-1.50");
}

#[test]
fn test_display() {
    let expr = parse_str(r#"f( a ,b)[ 'it\'s' ].c"#).unwrap();

    assert_snapshot!(expr.to_string(), @r"f(a, b)['it\'s'].c");
    assert_eq!(parse_str(&expr.to_string()), Ok(expr));
}

#[test]
fn test_error_messages() {
    assert_snapshot!(ParserError::Unparsable.to_string(), @"the tokens do not form an expression");
    assert_snapshot!(
        ParserError::IncompleteParse { unconsumed: 2 }.to_string(),
        @"encountered unexpected tokens after the expression (2 left unconsumed)"
    );
    assert_snapshot!(
        ParserError::RecursionLimit(8).to_string(),
        @"the expression is nested deeper than the limit of 8 levels"
    );
    assert_ron_snapshot!(ParserError::Unparsable, @"Unparsable");
}

#[test]
fn test_recursion_limit() {
    let config = ParserConfig { max_depth: 8 };

    let tokens = tokenize(&nested_brackets(8)).unwrap();
    assert!(parse_with_config(&tokens, config).is_ok());

    let tokens = tokenize(&nested_brackets(9)).unwrap();
    assert_eq!(
        parse_with_config(&tokens, config),
        Err(ParserError::RecursionLimit(8))
    );

    let tokens = tokenize("f(g(x))").unwrap();
    assert_eq!(
        parse_with_config(&tokens, ParserConfig { max_depth: 2 }),
        Err(ParserError::RecursionLimit(2))
    );
}

/// Parses `text` on a thread with the stack size `std::thread` uses by default.
fn parse_on_small_stack(text: String) -> Result<Expression, ParserError> {
    thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(move || parse_str(&text))
        .unwrap()
        .join()
        .unwrap()
}

#[test]
fn test_default_recursion_limit() {
    let shapes: [fn(usize) -> String; 2] = [nested_brackets, nested_calls];

    for nested in shapes {
        assert!(parse_on_small_stack(nested(DEFAULT_MAX_DEPTH)).is_ok());
        assert_eq!(
            parse_on_small_stack(nested(DEFAULT_MAX_DEPTH + 1)),
            Err(ParserError::RecursionLimit(DEFAULT_MAX_DEPTH))
        );
        assert_eq!(
            parse_on_small_stack(nested(10 * DEFAULT_MAX_DEPTH)),
            Err(ParserError::RecursionLimit(DEFAULT_MAX_DEPTH))
        );
    }
}

#[derive(Default)]
struct IdentifierCollector {
    names: Vec<String>,
}

impl DefaultVisitor for IdentifierCollector {
    fn visit_identifier(&mut self, ident: &Identifier) {
        self.names.push(ident.name.clone());
    }
}

#[test]
fn test_default_visitor_walks_whole_tree() {
    let expr = parse_str("f(a, b.c)[d]").unwrap();
    let mut collector = IdentifierCollector::default();
    Visitor::visit_expression(&mut collector, &expr);

    assert_eq!(collector.names, ["a", "b", "c", "d"]);
}
