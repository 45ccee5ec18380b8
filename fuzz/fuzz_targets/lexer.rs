#![no_main]

use gosyntax::lexer::Lexer;
use gosyntax::Token;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let mut lx = Lexer::new(&s);

    let mut last = (0u32, 0u32);
    let mut steps = 0usize;
    let max_steps = s.len().saturating_mul(2) + 8;
    let mut saw_eof = false;

    for lexeme in lx.by_ref() {
        assert!(!saw_eof, "lexeme after end of input");
        let here = (lexeme.pos.line, lexeme.pos.offset);
        assert!(here >= last);
        assert!(lexeme.pos.offset as usize <= s.len());
        last = here;

        saw_eof = lexeme.token == Token::Eof;
        steps += 1;
        assert!(steps <= max_steps);
    }
    assert!(saw_eof);

    for e in lx.errors() {
        assert!(e.pos.offset as usize <= s.len());
    }
});
