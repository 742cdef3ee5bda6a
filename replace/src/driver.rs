//! The incremental match/replace loop shared by every streaming entry point.

use log::{debug, trace};
use regex_runtime::matcher::{find_match, MatchResult};
use regex_runtime::{Program, Thread};

use crate::replacement::{capture_groups, Match, Replacement};

/// The state carried between invocations of [process].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamState {
    /// Text received but not yet decided upon.
    buffer: String,
    /// The character offset of the head of `buffer` in the stream.
    global_pos: usize,
    /// Set once the empty match at the end of the stream has been probed.
    at_end: bool,
}

impl StreamState {
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn global_pos(&self) -> usize {
        self.global_pos
    }

    pub fn at_end(&self) -> bool {
        self.at_end
    }

    /// Removes and returns any retained text.
    pub fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

/// Appends `chunk` to the retained buffer and emits every piece of output
/// that can be decided with the input seen so far.
///
/// When `flush` is set, `chunk` is treated as the final input of the stream.
/// No decision is deferred and the buffer is left empty.
pub fn process(
    program: &Program,
    replacement: &mut Replacement,
    state: &mut StreamState,
    chunk: &str,
    flush: bool,
) -> String {
    state.buffer.push_str(chunk);
    debug!(
        "processing {} byte chunk, {} bytes buffered, flush: {}",
        chunk.len(),
        state.buffer.len(),
        flush
    );

    let mut output = String::new();
    // bytes of `buffer` already decided on.
    let mut consumed = 0;

    loop {
        let pending = &state.buffer[consumed..];

        if pending.is_empty() {
            if flush && !state.at_end {
                debug!("probing for an empty match at {}", state.global_pos);
                if let MatchResult::Match { thread, .. } = find_match(program, "", true) {
                    let m = build_match(program, &thread, "", 0, state.global_pos);
                    output.push_str(&replacement.render(&m));
                }
                state.at_end = true;
            }
            break;
        }

        match find_match(program, pending, flush) {
            MatchResult::Match { end, thread } => {
                let m = build_match(program, &thread, pending, end, state.global_pos);
                trace!("match of {:?} at {}", m.text, m.start);
                output.push_str(&replacement.render(&m));

                if end == 0 {
                    // an empty match can't make progress so the next
                    // character is passed through.
                    let next = pass_through(pending, &mut output);
                    consumed += next;
                    state.global_pos += 1;
                } else {
                    state.global_pos += m.text.chars().count();
                    consumed += end;
                }
            }
            MatchResult::NoMatch => {
                trace!("no match at {}", state.global_pos);
                consumed += pass_through(pending, &mut output);
                state.global_pos += 1;
            }
            MatchResult::Partial => {
                trace!(
                    "match at {} is undecided, retaining {} bytes",
                    state.global_pos,
                    pending.len()
                );
                break;
            }
        }
    }

    state.buffer.drain(..consumed);
    output
}

/// Copies the first character of `pending` to `output`, returning its length
/// in bytes.
fn pass_through(pending: &str, output: &mut String) -> usize {
    match pending.chars().next() {
        Some(c) => {
            output.push(c);
            c.len_utf8()
        }
        None => 0,
    }
}

fn build_match<'a>(
    program: &Program,
    thread: &Thread,
    source: &'a str,
    end: usize,
    start: usize,
) -> Match<'a> {
    let slots = thread.captures().resolve(program.num_slots());

    Match {
        text: source.get(..end).unwrap_or(""),
        groups: capture_groups(&slots, source),
        start,
    }
}
