use gosyntax::{lex, LexErrorKind, Lexer, Token};

#[test]
fn unclosed_comment() {
    let lexed = lex("var x int\n/* comment", None);
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnclosedComment);
    assert_eq!(lexed.errors[0].kind.to_string(), "unclosed comment");
    // Reported where scanning stopped.
    assert_eq!(lexed.errors[0].pos.offset, 20);
    assert_eq!(lexed.errors[0].pos.line, 2);
}

#[test]
fn unterminated_string_at_end_of_input() {
    let src = "var y string = \"str";
    let lexed = lex(src, None);
    assert_eq!(lexed.errors.len(), 1);
    let err = &lexed.errors[0];
    assert_eq!(err.kind, LexErrorKind::UnterminatedString);
    assert_eq!(err.pos.line, 1);
    assert_eq!(err.pos.offset as usize, src.len());
    assert_eq!(err.to_string(), "1:19 LexError: unterminated string");
}

#[test]
fn unterminated_string_stops_at_newline() {
    let lexed = lex("x := \"abc\ny := 1\n", None);
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].pos.offset, 9);

    // Lexing resumes on the next line.
    let idents: Vec<&str> = lexed
        .lexemes
        .iter()
        .filter(|l| l.token == Token::Ident)
        .map(|l| l.text())
        .collect();
    assert_eq!(idents, vec!["x", "y"]);
}

#[test]
fn unterminated_raw_string() {
    let lexed = lex("`abc\ndef", None);
    assert_eq!(lexed.errors.len(), 1);
    assert_eq!(lexed.errors[0].kind, LexErrorKind::UnterminatedString);
    assert_eq!(lexed.errors[0].pos.offset, 8);
}

#[test]
fn unknown_characters_are_skipped() {
    let lexed = lex("a @ b # c", None);
    let kinds: Vec<LexErrorKind> = lexed.errors.iter().map(|e| e.kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            LexErrorKind::UnknownCharacter('@'),
            LexErrorKind::UnknownCharacter('#')
        ]
    );
    assert_eq!(lexed.errors[0].pos.offset, 2);
    assert_eq!(lexed.errors[1].pos.offset, 6);

    let toks: Vec<Token> = lexed.lexemes.iter().map(|l| l.token).collect();
    assert_eq!(
        toks,
        vec![Token::Ident, Token::Ident, Token::Ident, Token::Semi, Token::Eof]
    );
}

#[test]
fn several_errors_in_one_file() {
    let src = "package p\nvar a = 0b3\nvar b = '\nvar c = 1__2\n";
    let lexed = lex(src, None);
    let lines: Vec<u32> = lexed.errors.iter().map(|e| e.pos.line).collect();
    assert_eq!(lines, vec![2, 3, 4]);
}

#[test]
fn streaming_lexer_collects_errors() {
    let mut lexer = Lexer::new("x $");
    let toks: Vec<Token> = lexer.by_ref().map(|l| l.token).collect();
    assert_eq!(toks, vec![Token::Ident, Token::Eof]);
    assert!(lexer.has_errors());
    assert_eq!(lexer.errors().len(), 1);
    assert_eq!(lexer.take_errors().len(), 1);
    assert!(!lexer.has_errors());
}

#[test]
fn lexing_is_deterministic() {
    let src = "package main\nfunc f() { x := `raw` + \"s\"; y := 'c' /* c */ }\n@";
    assert_eq!(lex(src, Some("a.go")), lex(src, Some("a.go")));
}
