use std::io::{self, BufRead};
use std::process::ExitCode;

use tracing::debug;

use self::config::{parse_args_or_exit, ExparseConfig};
use self::errors::Diagnostics;

pub mod config;
mod errors;
mod passes;

pub enum CompilationControl {
    Continue,
    Stop,
}

pub struct PassOutput<O> {
    pub output: O,
    pub compilation_control: CompilationControl,
}

impl<O> PassOutput<O> {
    pub fn stop_with_output(output: O) -> Self {
        Self {
            output,
            compilation_control: CompilationControl::Stop,
        }
    }

    pub fn continue_with_output(output: O) -> Self {
        Self {
            output,
            compilation_control: CompilationControl::Continue,
        }
    }
}

impl PassOutput<()> {
    pub fn stop() -> Self {
        Self::stop_with_output(())
    }
}

pub struct RunnerCtx {
    pub config: ExparseConfig,
    pub diagnostics: Diagnostics,
}

macro_rules! return_if_stopped {
    ($e:expr) => {
        match $e {
            PassOutput {
                compilation_control: CompilationControl::Stop,
                ..
            } => return,

            PassOutput { output, .. } => output,
        }
    };
}

fn run_one(ctx: &mut RunnerCtx, text: &str) {
    let Some(tokens) = passes::tokenize(ctx, text) else { return };
    return_if_stopped!(passes::dump_tokens_if_asked(ctx, text, &tokens));

    let Some(expr) = passes::parse(ctx, text, &tokens) else { return };
    passes::dump_ast(ctx, text, &expr);
}

fn read_stdin(diagnostics: &mut Diagnostics) -> Vec<String> {
    let mut lines = vec![];

    for line in io::stdin().lock().lines() {
        match line {
            Ok(line) if line.trim().is_empty() => {}
            Ok(line) => lines.push(line),

            Err(e) => {
                diagnostics.error("<stdin>", &e);

                break;
            }
        }
    }

    lines
}

pub fn prepare_and_run() -> ExitCode {
    let mut config = parse_args_or_exit();
    let mut diagnostics = Diagnostics::new();

    let expressions = if config.expressions.is_empty() {
        read_stdin(&mut diagnostics)
    } else {
        std::mem::take(&mut config.expressions)
    };

    debug!(count = expressions.len(), stage = ?config.stage, "processing expressions");

    let mut ctx = RunnerCtx {
        config,
        diagnostics,
    };

    for text in &expressions {
        run_one(&mut ctx, text);
    }

    if ctx.diagnostics.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
