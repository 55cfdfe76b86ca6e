use clap::{arg, command, value_parser, Arg, ValueEnum};

use exparse::ast::dump::DumpFormat;
use exparse::parse::{ParserConfig, DEFAULT_MAX_DEPTH};

#[derive(Debug, Clone)]
pub struct ExparseConfig {
    /// Expressions given on the command line; stdin is read line by line when there are none.
    pub expressions: Vec<String>,
    pub stage: Stage,
    pub format: DumpFormat,
    pub parser: ParserConfig,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Stage {
    Lexer,
    #[default]
    Parser,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    Source,
    #[default]
    Tree,
    Debug,
    Ron,
}

impl From<OutputFormat> for DumpFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Source => Self::Source,
            OutputFormat::Tree => Self::Tree,
            OutputFormat::Debug => Self::Debug,
            OutputFormat::Ron => Self::Ron,
        }
    }
}

pub fn parse_args_or_exit() -> ExparseConfig {
    use clap::Command;

    fn command() -> Command {
        command!()
            .arg(
                arg!(expressions: [EXPR] ... "expressions to process (default: read lines from stdin)")
                    .required(false),
            )
            .arg(
                arg!(-s --stage <STAGE> "the stage to stop after")
                    .value_parser(value_parser!(Stage))
                    .required(false),
            )
            .arg(
                arg!(-f --format <FORMAT> "the output format")
                    .value_parser(value_parser!(OutputFormat))
                    .required(false),
            )
            .arg(
                Arg::new("max-depth")
                    .long("max-depth")
                    .value_name("DEPTH")
                    .help("how deeply expressions may be nested")
                    .value_parser(value_parser!(usize))
                    .required(false),
            )
    }

    let matches = command().get_matches();

    let expressions = matches
        .get_many::<String>("expressions")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    let stage = matches.get_one::<Stage>("stage").copied().unwrap_or_default();

    let format = matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or_default()
        .into();

    let max_depth = matches
        .get_one::<usize>("max-depth")
        .copied()
        .unwrap_or(DEFAULT_MAX_DEPTH);

    ExparseConfig {
        expressions,
        stage,
        format,
        parser: ParserConfig { max_depth },
    }
}
