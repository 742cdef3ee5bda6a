//! Anchored search over a bounded buffer that may still be growing.

use crate::{start, step, Opcode, Program, Thread};

/// The result of attempting a match anchored at the start of a buffer.
#[derive(Debug)]
pub enum MatchResult {
    /// A match spanning `0..end` bytes of the buffer, along with the thread
    /// whose captures describe it.
    Match { end: usize, thread: Thread },
    /// No match can begin at the start of the buffer, regardless of what
    /// follows it.
    NoMatch,
    /// The buffer was exhausted while threads were still live. More input is
    /// needed to decide the extent of the match.
    Partial,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Match { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self, MatchResult::Partial)
    }
}

/// Runs `program` anchored at offset 0 of `text`.
///
/// The match ending at the highest offset reached wins, with ties at the
/// same offset going to the highest priority thread. When `complete` is
/// `false` and the end of `text` is reached with consuming threads still
/// live, the outcome is undecidable and [MatchResult::Partial] is returned.
///
/// # Example
///
/// ```
/// use regex_runtime::*;
/// use regex_runtime::matcher::{find_match, MatchResult};
///
/// // approximate to `a+`
/// let prog = Program::default().with_opcodes(vec![
///     Opcode::Consume(InstConsume::new('a')),
///     Opcode::Split(InstSplit::new(InstIndex::from(0), InstIndex::from(2))),
///     Opcode::Match,
/// ]);
///
/// assert!(find_match(&prog, "aa", false).is_partial());
/// assert!(matches!(
///     find_match(&prog, "aa", true),
///     MatchResult::Match { end: 2, .. }
/// ));
/// assert!(matches!(
///     find_match(&prog, "aab", false),
///     MatchResult::Match { end: 2, .. }
/// ));
/// ```
pub fn find_match(program: &Program, text: &str, complete: bool) -> MatchResult {
    let mut threads = start(program, 0);
    let mut best = None;
    let mut input = text.chars();
    let mut sp = 0;

    loop {
        if let Some(thread) = threads
            .iter()
            .find(|t| matches!(program.get(t.inst()), Some(Opcode::Match)))
        {
            best = Some((sp, thread.clone()));
        }

        let has_active = threads
            .iter()
            .any(|t| program.get(t.inst()).map_or(false, Opcode::is_consuming));

        match input.next() {
            None if !complete && has_active => return MatchResult::Partial,
            None => break,
            Some(_) if !has_active => break,
            Some(next_char) => {
                threads = step(program, &threads, next_char, sp).threads;
                sp += next_char.len_utf8();
            }
        }
    }

    match best {
        Some((end, thread)) => MatchResult::Match { end, thread },
        None => MatchResult::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    fn end_of(res: MatchResult) -> Option<usize> {
        match res {
            MatchResult::Match { end, .. } => Some(end),
            _ => None,
        }
    }

    // `a*`
    fn zero_or_more() -> Program {
        Program::default().with_opcodes(vec![
            Opcode::Split(InstSplit::new(InstIndex::from(1), InstIndex::from(3))),
            Opcode::Consume(InstConsume::new('a')),
            Opcode::Jmp(InstJmp::new(InstIndex::from(0))),
            Opcode::Match,
        ])
    }

    #[test]
    fn should_evaluate_simple_linear_match_expression() {
        let prog = Program::default().with_opcodes(vec![
            Opcode::Consume(InstConsume::new('a')),
            Opcode::Any,
            Opcode::Match,
        ]);

        let input_output = vec![("ab", Some(2)), ("abc", Some(2)), ("ba", None)];

        for (test_id, (input, expected_res)) in input_output.into_iter().enumerate() {
            let res = end_of(find_match(&prog, input, true));
            assert_eq!((test_id, expected_res), (test_id, res))
        }
    }

    #[test]
    fn should_evaluate_eager_match_zero_or_more_expression() {
        let prog = zero_or_more();
        let input_output = vec![("", 0), ("a", 1), ("aaa", 3), ("b", 0), ("aab", 2)];

        for (test_id, (input, expected_end)) in input_output.into_iter().enumerate() {
            let res = end_of(find_match(&prog, input, true));
            assert_eq!((test_id, Some(expected_end)), (test_id, res))
        }
    }

    #[test]
    fn should_defer_while_a_consuming_thread_is_live() {
        let prog = zero_or_more();

        assert!(find_match(&prog, "", false).is_partial());
        assert!(find_match(&prog, "aa", false).is_partial());
        assert_eq!(Some(0), end_of(find_match(&prog, "b", false)));
    }

    #[test]
    fn should_not_match_one_or_more_against_empty_input() {
        // `a+`
        let prog = Program::default().with_opcodes(vec![
            Opcode::Consume(InstConsume::new('a')),
            Opcode::Split(InstSplit::new(InstIndex::from(0), InstIndex::from(2))),
            Opcode::Match,
        ]);

        assert!(matches!(find_match(&prog, "", true), MatchResult::NoMatch));
        assert!(matches!(find_match(&prog, "b", false), MatchResult::NoMatch));
        assert_eq!(Some(3), end_of(find_match(&prog, "aaa", true)));
    }

    #[test]
    fn should_keep_an_earlier_match_when_extension_fails() {
        // `a(bc)?`
        let prog = Program::default().with_num_slots(2).with_opcodes(vec![
            Opcode::Consume(InstConsume::new('a')),
            Opcode::Split(InstSplit::new(InstIndex::from(2), InstIndex::from(6))),
            Opcode::Save(InstSave::new(0)),
            Opcode::Consume(InstConsume::new('b')),
            Opcode::Consume(InstConsume::new('c')),
            Opcode::Save(InstSave::new(1)),
            Opcode::Match,
        ]);

        match find_match(&prog, "abd", false) {
            MatchResult::Match { end, thread } => {
                assert_eq!(1, end);
                assert_eq!(vec![None, None], thread.captures().resolve(2));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn should_evaluate_multiple_save_groups_expression() {
        // `(a.)(b)`
        let prog = Program::default().with_num_slots(4).with_opcodes(vec![
            Opcode::Save(InstSave::new(0)),
            Opcode::Consume(InstConsume::new('a')),
            Opcode::Any,
            Opcode::Save(InstSave::new(1)),
            Opcode::Save(InstSave::new(2)),
            Opcode::Consume(InstConsume::new('b')),
            Opcode::Save(InstSave::new(3)),
            Opcode::Match,
        ]);

        match find_match(&prog, "aab", true) {
            MatchResult::Match { end, thread } => {
                assert_eq!(3, end);
                assert_eq!(
                    vec![Some(0), Some(2), Some(2), Some(3)],
                    thread.captures().resolve(4)
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn should_measure_match_ends_in_bytes() {
        let prog = Program::default().with_opcodes(vec![
            Opcode::Any,
            Opcode::Consume(InstConsume::new('ß')),
            Opcode::Match,
        ]);

        assert_eq!(Some(4), end_of(find_match(&prog, "éßx", true)));
    }
}
