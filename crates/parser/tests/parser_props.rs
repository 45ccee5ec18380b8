use gosyntax::{dump_to_string, DiagKind, ParseMode, Parser};
use proptest::prelude::*;

/// Token-sized pieces of Go, so most generated files get past the lexer and
/// drive the parser into its recovery paths.
fn go_ish() -> impl Strategy<Value = String> {
    let fixed = prop::sample::select(vec![
        "x", "T", "func", "var", "type", "if", "for", "switch", "case", "default", "select",
        "return", "go", "range", ":=", "=", "<-", "...", ",", ";", ":", ".", "(", ")", "[", "]",
        "{", "}", "*", "+", "1", "\"s\"", "\n", " ",
    ])
    .prop_map(str::to_owned);
    prop::collection::vec(fixed, 0..32).prop_map(|v| v.concat())
}

fn check_file(body: &str) -> Result<(), TestCaseError> {
    let src = format!("package p\n{body}");
    let run = || {
        let mut parser = Parser::new(&src, ParseMode::File);
        let file = parser.parse_file().map_err(|e| TestCaseError::fail(e.to_string()))?;
        Ok::<_, TestCaseError>((file, parser.take_errors()))
    };

    let (file, errors) = run()?;
    let lexed_cleanly = errors.iter().all(|e| e.kind() == DiagKind::Parse);
    prop_assert_eq!(file.is_some(), lexed_cleanly, "src={:?}", src);
    for e in &errors {
        prop_assert!(e.pos().offset as usize <= src.len());
    }
    if let Some(file) = &file {
        // Dumping touches every node.
        prop_assert!(dump_to_string(file).starts_with("File\n"));
    }

    prop_assert_eq!((file, errors), run()?, "parsing is not deterministic");
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn go_like_declarations_never_panic(body in go_ish()) {
        check_file(&body)?;
    }

    #[test]
    fn go_like_function_bodies_never_panic(body in go_ish()) {
        check_file(&format!("func f() {{\n{body}\n}}\n"))?;
    }

    #[test]
    fn arbitrary_text_never_panics(body in "[ -~\n]{0,64}") {
        check_file(&body)?;
    }

    #[test]
    fn single_declarations_never_panic(src in go_ish()) {
        let mut parser = Parser::new(&src, ParseMode::SingleDecl);
        let decl = parser.parse_single_decl().map_err(|e| TestCaseError::fail(e.to_string()))?;
        if decl.is_none() {
            prop_assert!(parser.has_errors(), "src={:?}", src);
        }
    }
}
