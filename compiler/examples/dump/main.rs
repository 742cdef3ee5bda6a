use regex_compiler::compile_pattern;

const SAMPLE_PATTERNS: [&str; 8] = ["abc", "a.c", "a*", "a+", "a?", "a(.)c", "(a*)", "\\."];

fn main() -> Result<(), String> {
    let patterns: Vec<String> = match std::env::args().skip(1).collect::<Vec<_>>() {
        args if args.is_empty() => SAMPLE_PATTERNS.iter().map(|p| p.to_string()).collect(),
        args => args,
    };

    for pattern in patterns {
        let program = compile_pattern(&pattern).map_err(|e| format!("{:?}: {}", pattern, e))?;

        println!("{:?}:", pattern);
        print!("{}", program);
        println!("slots: {}\n", program.num_slots());
    }

    Ok(())
}
