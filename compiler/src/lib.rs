//! Provides for the parsing and compilation of a regex pattern into it's
//! corresponding runtime program.
//!
//! The supported syntax is intentionally small: literal characters, `.`,
//! `\`-escaped literals, capturing groups and the greedy `*`, `+` and `?`
//! quantifiers.
//!
//! # Example
//!
//! ```rust
//! use regex_compiler::compile_pattern;
//! use regex_runtime::matcher::{find_match, MatchResult};
//!
//! let program = compile_pattern("l(l)o").expect("failed to parse or compile");
//!
//! // matching is anchored at the start of the input.
//! assert!(matches!(find_match(&program, "hello", true), MatchResult::NoMatch));
//!
//! match find_match(&program, "llo world", true) {
//!     MatchResult::Match { end, thread } => {
//!         assert_eq!(3, end);
//!         // group 1 occupies slots 0 and 1.
//!         assert_eq!(
//!             vec![Some(1), Some(2)],
//!             thread.captures().resolve(program.num_slots())
//!         );
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

pub mod ast;
pub mod compiler;
pub mod parser;

pub use compiler::compile;
pub use parser::{parse, ParseErr};

use regex_runtime::Program;

/// Parses and compiles a pattern in one step.
pub fn compile_pattern(pattern: &str) -> Result<Program, ParseErr> {
    let input = pattern.chars().enumerate().collect::<Vec<(usize, char)>>();

    parse(&input).map(compile)
}
