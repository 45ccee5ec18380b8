#![no_main]

use gosyntax::{dump_to_string, ParseMode, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let mut parser = Parser::new(&s, ParseMode::File);
    let Ok(file) = parser.parse_file() else {
        unreachable!("mode matches entry point");
    };
    for d in parser.errors() {
        assert!(d.pos().offset as usize <= s.len());
    }
    if let Some(file) = file {
        let _ = dump_to_string(&file);
    }

    let mut single = Parser::new(&s, ParseMode::SingleDecl);
    if let Ok(None) = single.parse_single_decl() {
        assert!(single.has_errors());
    }
});
