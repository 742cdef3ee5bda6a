//! Streaming match and replace over text that arrives in arbitrary chunks.
//!
//! Output is produced as soon as it can be decided. Text that may still be
//! part of a match is retained until more input, or the end of the stream,
//! settles it. The concatenated output is the same however the input is
//! split.
//!
//! # Example
//!
//! ```
//! use regex_replace::StreamReplacer;
//!
//! let mut replacer = StreamReplacer::new("l+(o)", "[$1]").expect("invalid pattern");
//!
//! let mut output = String::new();
//! for chunk in ["he", "ll", "o wor", "ld"] {
//!     output.push_str(&replacer.submit(chunk));
//! }
//! output.push_str(&replacer.close());
//!
//! assert_eq!("he[o] world", output);
//! ```

mod driver;
pub mod replacement;

pub use driver::{process, StreamState};
pub use replacement::{Match, Replacement, Template};

use regex_compiler::ParseErr;
use regex_runtime::Program;

/// Replaces every match of a pattern in a stream of text chunks.
#[derive(Debug)]
pub struct StreamReplacer {
    program: Program,
    replacement: Replacement,
    state: StreamState,
    closed: bool,
}

impl StreamReplacer {
    /// Compiles `pattern` into a new replacer.
    pub fn new<R: Into<Replacement>>(pattern: &str, replacement: R) -> Result<Self, ParseErr> {
        regex_compiler::compile_pattern(pattern)
            .map(|program| Self::with_program(program, replacement))
    }

    /// Builds a replacer around an already compiled program.
    pub fn with_program<R: Into<Replacement>>(program: Program, replacement: R) -> Self {
        Self {
            program,
            replacement: replacement.into(),
            state: StreamState::default(),
            closed: false,
        }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Feeds the next chunk of input, returning all output that it settles.
    pub fn submit(&mut self, chunk: &str) -> String {
        if self.closed {
            if !chunk.is_empty() {
                log::warn!(
                    "discarding {} bytes submitted after the stream was closed",
                    chunk.len()
                );
            }
            return String::new();
        }

        process(
            &self.program,
            &mut self.replacement,
            &mut self.state,
            chunk,
            false,
        )
    }

    /// Marks the end of the stream, returning the remaining output. Closing
    /// an already closed stream returns nothing.
    pub fn close(&mut self) -> String {
        if self.closed {
            return String::new();
        }
        self.closed = true;

        let mut output = process(
            &self.program,
            &mut self.replacement,
            &mut self.state,
            "",
            true,
        );
        output.push_str(&self.state.take_buffer());
        output
    }

    /// Consumes the replacer, adapting an iterator of input chunks into an
    /// iterator of output.
    pub fn replace_chunks<I>(self, chunks: I) -> ReplaceChunks<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        ReplaceChunks {
            chunks: chunks.into_iter(),
            replacer: self,
        }
    }
}

/// Replaces every match of `program` in `input` in a single pass.
pub fn replace_all<R: Into<Replacement>>(program: &Program, input: &str, replacement: R) -> String {
    let mut replacement = replacement.into();
    let mut state = StreamState::default();

    let mut output = process(program, &mut replacement, &mut state, input, true);
    output.push_str(&state.take_buffer());
    output
}

/// An iterator over the output of a [StreamReplacer] fed from an iterator of
/// chunks. Chunks that settle no output yield nothing, and the remaining
/// output is yielded once the input is exhausted.
#[derive(Debug)]
pub struct ReplaceChunks<I> {
    chunks: I,
    replacer: StreamReplacer,
}

impl<I> Iterator for ReplaceChunks<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let output = match self.chunks.next() {
                Some(chunk) => self.replacer.submit(chunk.as_ref()),
                None if !self.replacer.is_closed() => self.replacer.close(),
                None => return None,
            };

            if !output.is_empty() {
                return Some(output);
            }
        }
    }
}
