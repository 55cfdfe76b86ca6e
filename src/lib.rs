pub mod ast;
pub mod parse;
pub mod util;

pub use parse::{parse, parse_str, parse_with_config, tokenize};
