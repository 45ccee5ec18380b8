use gosyntax::{ParseMode, Parser};
use walkdir::WalkDir;

/// Parses every `.go` file under `$GOSYNTAX_CORPUS`, e.g. a checkout of the Go
/// standard library.
#[test]
fn parses_go_corpus_if_configured() {
    let Some(root) = std::env::var_os("GOSYNTAX_CORPUS") else {
        eprintln!("GOSYNTAX_CORPUS not set; skipping corpus test");
        return;
    };

    let mut total = 0usize;
    for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("go") {
            continue;
        }
        // testdata holds deliberately broken sources.
        if path.components().any(|c| c.as_os_str() == "testdata") {
            continue;
        }
        let Ok(src) = std::fs::read_to_string(path) else {
            continue;
        };

        total += 1;
        let mut parser =
            Parser::new(&src, ParseMode::File).with_filename(path.display().to_string());
        let file = parser.parse_file().unwrap();
        if file.is_none() || parser.has_errors() {
            eprintln!("FAILED: {}", path.display());
            for d in parser.errors().iter().take(8) {
                eprintln!("  {d}");
            }
            panic!("Go corpus parse failed after {total} files");
        }
    }

    eprintln!("Parsed {total} Go files successfully.");
}
