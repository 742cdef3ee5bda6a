use pretty_assertions::assert_eq;
use regex_compiler::{compile_pattern, ParseErr};
use regex_replace::{replace_all, Match, Replacement, StreamReplacer};
use regex_runtime::matcher::{find_match, MatchResult};

fn match_end(pattern: &str, input: &str) -> Option<usize> {
    let program = compile_pattern(pattern).expect("pattern should compile");

    match find_match(&program, input, true) {
        MatchResult::Match { end, .. } => Some(end),
        _ => None,
    }
}

#[test]
fn should_match_literal_patterns_in_full() {
    let inputs = vec!["a", "abc", "hello world", "naïve", "\\.\\*"];

    for (test_id, pattern) in inputs.into_iter().enumerate() {
        // an escaped character matches itself without the escape.
        let literal = pattern.replace('\\', "");
        assert_eq!(
            (test_id, Some(literal.len())),
            (test_id, match_end(pattern, &literal))
        )
    }
}

#[test]
fn should_match_zero_or_more_at_offset_zero() {
    let input_output = vec![("", 0), ("a", 1), ("aaa", 3), ("b", 0)];

    for (test_id, (input, expected_end)) in input_output.into_iter().enumerate() {
        assert_eq!((test_id, Some(expected_end)), (test_id, match_end("a*", input)))
    }
}

#[test]
fn should_require_one_occurrence_for_one_or_more() {
    assert_eq!(None, match_end("a+", ""));
    assert_eq!(Some(3), match_end("a+", "aaa"));
}

#[test]
fn should_capture_whole_match_in_zero_or_more_group() {
    let program = compile_pattern("(a*)").expect("pattern should compile");

    for (test_id, input) in ["", "a", "aaaa"].into_iter().enumerate() {
        match find_match(&program, input, true) {
            MatchResult::Match { end, thread } => {
                assert_eq!((test_id, input.len()), (test_id, end));
                assert_eq!(
                    (test_id, vec![Some(0), Some(input.len())]),
                    (test_id, thread.captures().resolve(program.num_slots()))
                );
            }
            other => panic!("case {}: unexpected result: {:?}", test_id, other),
        }

        let output = replace_all(
            &program,
            input,
            Replacement::callback(|m: &Match<'_>| format!("<{}|{}>", m.text, m.group(1))),
        );
        // a non-empty match is followed by the empty match at the end.
        let expected = match input {
            "" => "<|>".to_string(),
            _ => format!("<{0}|{0}><|>", input),
        };
        assert_eq!((test_id, expected), (test_id, output));
    }
}

#[test]
fn should_replace_empty_matches_around_every_character() {
    let program = compile_pattern("a*").expect("pattern should compile");

    assert_eq!("XbXbX", replace_all(&program, "bb", "X"));
}

#[test]
fn should_render_missing_groups_as_empty_strings() {
    let program = compile_pattern("(a)?").expect("pattern should compile");

    assert_eq!("[]b[]", replace_all(&program, "b", "[$1]"));
}

#[test]
fn should_yield_nothing_after_close() {
    let mut replacer = StreamReplacer::new("b", "c").expect("pattern should compile");

    assert_eq!("ac", replacer.submit("ab"));
    assert_eq!("", replacer.close());
    assert_eq!("", replacer.submit("bbb"));
    assert_eq!("", replacer.close());
}

#[test]
fn should_swap_groups_across_chunks() {
    let replacer = StreamReplacer::new("(b+)=(.)", "$2=$1").expect("pattern should compile");

    let output: String = replacer.replace_chunks(["b", "b=1 b", "=2"]).collect();

    assert_eq!("1=bb 2=b", output);
}

#[test]
fn should_reject_unsupported_syntax() {
    let input_output = vec![
        ("a|b", ParseErr::UnsupportedAlternation(1)),
        ("(ab", ParseErr::UnclosedGroup(0)),
        ("?", ParseErr::DanglingQuantifier(0)),
    ];

    for (test_id, (pattern, expected_err)) in input_output.into_iter().enumerate() {
        assert_eq!(
            (test_id, Some(expected_err)),
            (test_id, StreamReplacer::new(pattern, "").err())
        )
    }
}
