use std::env;
use std::process::ExitCode;

use gosyntax::{dump_to_string, ParseMode, Parser, StderrErrorHandler};

fn main() -> ExitCode {
    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: cargo run --example parse -- <file.go>");
        return ExitCode::from(2);
    };

    let src = match std::fs::read_to_string(&path) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("{path}: {e}");
            return ExitCode::from(2);
        }
    };

    let mut parser = Parser::new(&src, ParseMode::File)
        .with_filename(path.as_str())
        .with_error_handler(StderrErrorHandler);
    let file = match parser.parse_file() {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };

    if let Some(file) = &file {
        print!("{}", dump_to_string(file));
    }
    if parser.has_errors() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
