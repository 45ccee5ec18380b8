use gosyntax::{lex, Token};
use proptest::prelude::*;

/// Fragments that make generated inputs look enough like Go to exercise
/// semicolon insertion, literals and comments, not just error paths.
fn go_ish() -> impl Strategy<Value = String> {
    let fixed = prop::sample::select(vec![
        "x", "func", "return", "0x1F", "1.5e3", "\"s\\n\"", "`raw\n`", "'c'", "// c\n",
        "/* c\n */", "\n", " ", "{", "}", "++", ":=",
    ])
    .prop_map(str::to_owned);
    let frag = prop_oneof![4 => fixed, 1 => "[ -~]{1,3}"];
    prop::collection::vec(frag, 0..40).prop_map(|v| v.concat())
}

fn check_stream(s: &str) -> Result<(), TestCaseError> {
    let lexed = lex(s, None);

    let eofs = lexed.lexemes.iter().filter(|l| l.token == Token::Eof).count();
    prop_assert_eq!(eofs, 1, "input={:?}", s);
    prop_assert_eq!(lexed.lexemes.last().map(|l| l.token), Some(Token::Eof));

    let mut prev = (0u32, 0u32);
    for l in &lexed.lexemes {
        let here = (l.pos.line, l.pos.offset);
        prop_assert!(
            here >= prev,
            "position went backwards at {} in {:?}",
            l,
            s
        );
        prop_assert!(l.pos.offset as usize <= s.len());
        prev = here;
    }

    for e in &lexed.errors {
        prop_assert!(e.pos.offset as usize <= s.len());
    }

    prop_assert_eq!(&lexed, &lex(s, None), "lexing is not deterministic");
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn arbitrary_text_never_panics(s in ".*") {
        check_stream(&s)?;
    }

    #[test]
    fn go_like_text_is_well_formed(s in go_ish()) {
        check_stream(&s)?;
    }
}
