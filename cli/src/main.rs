use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{arg, command, value_parser, ArgAction, ArgMatches, Command};
use regex_replace::StreamReplacer;

const DEFAULT_CHUNK_SIZE: &str = "8192";

fn cli() -> Command {
    command!()
        .about("Replace every match of a pattern in a stream of text")
        .arg(arg!(<PATTERN>).help("Pattern to search for"))
        .arg(
            arg!(<REPLACEMENT>)
                .help("Replacement template. `$N` expands to group N and `$$` to a literal `$`"),
        )
        .arg(
            arg!([FILE])
                .help("Input file. Standard input is read when omitted")
                .value_parser(value_parser!(PathBuf)),
        )
        // Keep options sorted alphabetically by their long name.
        .arg(
            arg!(-c --"chunk-size" <BYTES>)
                .help("Number of bytes read from the input at a time")
                .default_value(DEFAULT_CHUNK_SIZE)
                .value_parser(value_parser!(u32).range(1..)),
        )
        .arg(
            arg!(-d --"dump")
                .help("Print the compiled program to stderr before running")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = cli().get_matches();
    exec_replace(&args)
}

fn exec_replace(args: &ArgMatches) -> anyhow::Result<()> {
    let pattern = args
        .get_one::<String>("PATTERN")
        .context("missing pattern")?;
    let replacement = args
        .get_one::<String>("REPLACEMENT")
        .context("missing replacement")?;
    let chunk_size = args
        .get_one::<u32>("chunk-size")
        .map_or(8192, |size| *size as usize);

    let program = regex_compiler::compile_pattern(pattern)
        .with_context(|| format!("failed to compile pattern `{}`", pattern))?;

    if args.get_flag("dump") {
        eprintln!("{}", program);
    }

    let mut replacer = StreamReplacer::with_program(program, replacement.as_str());

    let input: Box<dyn Read> = match args.get_one::<PathBuf>("FILE") {
        Some(path) => Box::new(
            File::open(path).with_context(|| format!("can not open {:?}", path))?,
        ),
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());

    stream(input, &mut output, &mut replacer, chunk_size)?;
    output.flush().context("failed to flush output")
}

/// Feeds `input` through `replacer` in reads of `chunk_size` bytes, writing
/// the output as it becomes available.
fn stream<R: Read, W: Write>(
    mut input: R,
    output: &mut W,
    replacer: &mut StreamReplacer,
    chunk_size: usize,
) -> anyhow::Result<()> {
    let mut buf = vec![0u8; chunk_size];
    // the trailing bytes of a character split across reads.
    let mut carry: Vec<u8> = Vec::new();

    loop {
        let read = input.read(&mut buf).context("failed to read input")?;
        if read == 0 {
            break;
        }

        carry.extend_from_slice(&buf[..read]);
        let (text, tail_len) = split_utf8(&carry)?;
        let out = replacer.submit(text);
        output
            .write_all(out.as_bytes())
            .context("failed to write output")?;

        let tail_start = carry.len() - tail_len;
        carry.drain(..tail_start);
    }

    if !carry.is_empty() {
        anyhow::bail!("input ends with an incomplete utf-8 sequence");
    }

    output
        .write_all(replacer.close().as_bytes())
        .context("failed to write output")
}

/// Splits `bytes` into its longest valid utf-8 prefix and the length of an
/// incomplete character at its end, if any.
fn split_utf8(bytes: &[u8]) -> anyhow::Result<(&str, usize)> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok((text, 0)),
        // `error_len` is `None` when the input stops partway into a
        // character, which more input may complete.
        Err(err) if err.error_len().is_none() => {
            let valid = err.valid_up_to();
            let text = std::str::from_utf8(&bytes[..valid]).context("invalid utf-8 in input")?;
            Ok((text, bytes.len() - valid))
        }
        Err(err) => Err(err).context("invalid utf-8 in input"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_hold_back_incomplete_characters() {
        let bytes = "aé".as_bytes();

        let input_output = vec![
            (&bytes[..1], ("a", 0)),
            (&bytes[..2], ("a", 1)),
            (&bytes[..3], ("aé", 0)),
        ];

        for (test_id, (input, expected)) in input_output.into_iter().enumerate() {
            let res = split_utf8(input).ok();
            assert_eq!((test_id, Some(expected)), (test_id, res))
        }
    }

    #[test]
    fn should_reject_invalid_utf8() {
        assert!(split_utf8(&[b'a', 0xff, b'b']).is_err())
    }

    #[test]
    fn should_stream_input_across_small_reads() {
        let input = "héllo wörld".as_bytes();

        for chunk_size in 1..6 {
            let mut replacer =
                StreamReplacer::new("l+(.)", "<$1>").expect("pattern should compile");
            let mut output = vec![];

            stream(input, &mut output, &mut replacer, chunk_size).expect("stream should succeed");
            assert!(replacer.is_closed());
            assert_eq!(
                (chunk_size, "hé<o> wör<d>".to_string()),
                (chunk_size, String::from_utf8(output).expect("output should be utf-8"))
            );
        }
    }

    #[test]
    fn should_accept_chunk_size_flag() {
        let args = cli()
            .try_get_matches_from(["streamrep", "-c", "16", "--dump", "a", "b"])
            .expect("arguments should parse");

        assert_eq!(Some(&16), args.get_one::<u32>("chunk-size"));
        assert!(args.get_flag("dump"));
        assert!(cli()
            .try_get_matches_from(["streamrep", "-c", "0", "a", "b"])
            .is_err());
    }
}
