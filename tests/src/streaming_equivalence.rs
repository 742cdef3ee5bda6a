use pretty_assertions::assert_eq;
use regex_compiler::compile_pattern;
use regex_replace::{replace_all, StreamReplacer};

const CASES: [(&str, &str, &str); 10] = [
    ("a*", "X", "bb"),
    ("a*", "X", "aabaaab"),
    ("a+", "<$0>", "caaabaa"),
    ("(a)?", "[$1]", "bab"),
    ("l+(o)", "$1$1", "hello world, yellow llama"),
    ("(.)(.)", "$2$1", "abcdefg"),
    ("x(yz)*", "{$1}", "xyzyzxyxyzx"),
    ("\\.", "!", "a.b..c"),
    ("é+", "e", "caféé ébène"),
    ("", "-", "abc"),
];

fn stream_chunks(pattern: &str, replacement: &str, chunks: &[&str]) -> String {
    let mut replacer = StreamReplacer::new(pattern, replacement).expect("pattern should compile");
    let mut output = String::new();

    for chunk in chunks {
        output.push_str(&replacer.submit(chunk));
    }
    output.push_str(&replacer.close());
    output
}

fn single_shot(pattern: &str, replacement: &str, input: &str) -> String {
    let program = compile_pattern(pattern).expect("pattern should compile");
    replace_all(&program, input, replacement)
}

/// Splits `input` at every character boundary.
fn char_chunks(input: &str) -> Vec<&str> {
    input
        .char_indices()
        .map(|(idx, c)| &input[idx..idx + c.len_utf8()])
        .collect()
}

#[test]
fn should_match_single_shot_output_with_one_character_chunks() {
    for (test_id, (pattern, replacement, input)) in CASES.into_iter().enumerate() {
        assert_eq!(
            (test_id, single_shot(pattern, replacement, input)),
            (
                test_id,
                stream_chunks(pattern, replacement, &char_chunks(input))
            )
        )
    }
}

#[test]
fn should_match_single_shot_output_with_a_whole_chunk() {
    for (test_id, (pattern, replacement, input)) in CASES.into_iter().enumerate() {
        assert_eq!(
            (test_id, single_shot(pattern, replacement, input)),
            (test_id, stream_chunks(pattern, replacement, &[input]))
        )
    }
}

#[test]
fn should_match_single_shot_output_at_every_split_point() {
    for (test_id, (pattern, replacement, input)) in CASES.into_iter().enumerate() {
        let expected = single_shot(pattern, replacement, input);

        for (split, _) in input.char_indices().chain([(input.len(), ' ')]) {
            let (head, tail) = input.split_at(split);
            assert_eq!(
                (test_id, split, expected.clone()),
                (
                    test_id,
                    split,
                    stream_chunks(pattern, replacement, &[head, tail])
                )
            )
        }
    }
}

#[test]
fn should_match_single_shot_output_with_empty_chunks_interleaved() {
    for (test_id, (pattern, replacement, input)) in CASES.into_iter().enumerate() {
        let chunks: Vec<&str> = char_chunks(input)
            .into_iter()
            .flat_map(|chunk| ["", chunk])
            .collect();

        assert_eq!(
            (test_id, single_shot(pattern, replacement, input)),
            (test_id, stream_chunks(pattern, replacement, &chunks))
        )
    }
}
