use std::fmt::Display;
use std::process::ExitCode;
use std::time::Instant;

use cup_cycle::{parse_labels, play_long, play_short, CupsError, Rules};

fn timed<T: Display>(part: &str, run: impl FnOnce() -> Result<T, CupsError>) -> Result<(), CupsError> {
    let watch = Instant::now();
    let answer = run()?;
    println!("Part {part}: {answer} (took {}ms)", watch.elapsed().as_millis());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    // a bare number is the labels themselves, anything else names an input file
    let arg = std::env::args().nth(1).unwrap_or_else(|| "input.txt".to_string());
    let input = if !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit()) {
        arg
    } else {
        match std::fs::read_to_string(&arg) {
            Ok(input) => input,
            Err(e) => {
                eprintln!("cannot read {arg:?}: {e}");
                return ExitCode::FAILURE;
            }
        }
    };

    let result = parse_labels(&input).and_then(|labels| {
        timed("A", || play_short(&labels, &Rules::short()))?;
        timed("B", || play_long(&labels, &Rules::long()))
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:?}");
            ExitCode::FAILURE
        }
    }
}
