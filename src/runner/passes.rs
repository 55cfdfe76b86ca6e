use std::io;

use exparse::ast::dump::{dump_ast as dump_ast_to, dump_tokens};
use exparse::ast::Expression;
use exparse::parse::{self, Token};

use super::config::Stage;
use super::{PassOutput, RunnerCtx};

pub fn tokenize(ctx: &mut RunnerCtx, text: &str) -> Option<Vec<Token>> {
    parse::tokenize(text)
        .map_err(|e| ctx.diagnostics.error(text, &e))
        .ok()
}

pub fn dump_tokens_if_asked(ctx: &mut RunnerCtx, text: &str, tokens: &[Token]) -> PassOutput<()> {
    if ctx.config.stage != Stage::Lexer {
        return PassOutput::continue_with_output(());
    }

    if let Err(e) = dump_tokens(ctx.config.format, tokens, &mut io::stdout().lock()) {
        ctx.diagnostics.error(text, &e);
    }

    PassOutput::stop()
}

pub fn parse(ctx: &mut RunnerCtx, text: &str, tokens: &[Token]) -> Option<Expression> {
    parse::parse_with_config(tokens, ctx.config.parser)
        .map_err(|e| ctx.diagnostics.error(text, &e))
        .ok()
}

pub fn dump_ast(ctx: &mut RunnerCtx, text: &str, expr: &Expression) {
    if let Err(e) = dump_ast_to(ctx.config.format, expr, &mut io::stdout().lock()) {
        ctx.diagnostics.error(text, &e);
    }
}
