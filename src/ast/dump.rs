use std::fmt::Display;
use std::io::{self, Write};

use itertools::Itertools;
use ron::ser::PrettyConfig;
use serde::Serialize;

use super::visit::{AstRecurse, Visitor};
use super::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DumpFormat {
    /// Source text.
    Source,

    /// An indented outline, one node (or token) per line.
    Tree,

    /// Rust's pretty-printed `Debug` representation.
    Debug,

    /// RON.
    Ron,
}

fn write_ron<T: Serialize>(value: &T, out: &mut impl Write) -> io::Result<()> {
    let ron = ron::ser::to_string_pretty(value, PrettyConfig::default())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;

    writeln!(out, "{}", ron)
}

pub fn dump_ast(format: DumpFormat, expr: &Expression, out: &mut impl Write) -> io::Result<()> {
    match format {
        DumpFormat::Source => writeln!(out, "{}", expr),
        DumpFormat::Tree => write!(out, "{}", dump_tree(expr)),
        DumpFormat::Debug => writeln!(out, "{:#?}", expr),
        DumpFormat::Ron => write_ron(expr, out),
    }
}

pub fn dump_tokens(format: DumpFormat, tokens: &[Token], out: &mut impl Write) -> io::Result<()> {
    match format {
        DumpFormat::Source => writeln!(out, "{}", tokens.iter().join(" ")),

        DumpFormat::Tree => {
            for token in tokens {
                match token {
                    Token::Identifier(_)
                    | Token::DigitSequence(_)
                    | Token::StringLiteral { .. } => writeln!(out, "{} {}", token.kind(), token)?,

                    _ => writeln!(out, "{}", token.kind())?,
                }
            }

            Ok(())
        }

        DumpFormat::Debug => writeln!(out, "{:#?}", tokens),
        DumpFormat::Ron => write_ron(&tokens, out),
    }
}

/// Renders the tree as an indented outline.
pub fn dump_tree(expr: &Expression) -> String {
    let mut dumper = TreeDumper::default();
    dumper.visit_expression(expr);

    dumper.out
}

#[derive(Default)]
struct TreeDumper {
    out: String,
    depth: usize,
}

impl TreeDumper {
    fn line(&mut self, text: impl Display) {
        let indent = "  ".repeat(self.depth);
        self.out.push_str(&format!("{}{}\n", indent, text));
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}

impl Visitor for TreeDumper {
    type Output = ();

    fn visit_expression(&mut self, expr: &Expression) {
        self.line("expression");
        self.nested(|this| expr.recurse(this));
    }

    fn visit_drilldown(&mut self, drilldown: &Drilldown) {
        match drilldown {
            Drilldown::Period { property, .. } => self.line(format!("period `{}`", property)),

            Drilldown::Brackets { index, .. } => {
                self.line("brackets");
                self.nested(|this| this.visit_expression(index));
            }
        }
    }

    fn visit_function_call(&mut self, call: &FunctionCall) {
        self.line(format!("call `{}`", call.name));
        self.nested(|this| call.recurse(this));
    }

    fn visit_argument(&mut self, arg: &Argument) {
        self.line(match arg.comma {
            Some(_) => "argument,",
            None => "argument",
        });
        self.nested(|this| arg.recurse(this));
    }

    fn visit_literal(&mut self, lit: &Literal) {
        lit.recurse(self);
    }

    fn visit_identifier(&mut self, ident: &Identifier) {
        self.line(format!("identifier `{}`", ident));
    }

    fn visit_named_literal(&mut self, lit: &NamedLiteral) {
        self.line(format!("named literal {}", lit));
    }

    fn visit_number_literal(&mut self, lit: &NumberLiteral) {
        self.line(format!("number literal {}", lit));
    }

    fn visit_string_literal(&mut self, lit: &StringLiteral) {
        self.line(format!("string literal {}", lit));
    }
}
