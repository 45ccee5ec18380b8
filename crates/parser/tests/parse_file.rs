use std::cell::RefCell;

use gosyntax::ast::{Decl, ImportName, Spec, SpecType, TypeSpec};
use gosyntax::{parse_source, Diag, DiagKind, ParseMode, ParseModeError, Parser};

fn assert_parses(src: &str) -> gosyntax::ast::File {
    match parse_source(src) {
        Ok(file) => file,
        Err(f) => panic!("expected parse ok, got diagnostics: {:#?}", f.diags),
    }
}

#[test]
fn file_round_trip() {
    let file = assert_parses(
        "package main\nimport \"fmt\"\nfunc main() {}\nconst FOO = \"bar\"\nvar i int = 5\ntype integer int\n",
    );
    assert_eq!(file.package.name.name, "main");

    assert_eq!(file.imports.len(), 1);
    let specs = file.imports[0].spec().specs();
    assert_eq!(specs.len(), 1);
    let Spec::Import(import) = &specs[0] else {
        panic!("expected import spec, got {:?}", specs[0]);
    };
    assert_eq!(import.path.unquoted(), "fmt");
    assert!(import.name.is_none());

    let kinds: Vec<&str> = file
        .decls
        .iter()
        .map(|d| match d {
            Decl::Func(_) => "Func",
            Decl::Method(_) => "Method",
            Decl::Import(_) => "Import",
            Decl::Const(_) => "Const",
            Decl::Var(_) => "Var",
            Decl::Type(_) => "Type",
        })
        .collect();
    assert_eq!(kinds, vec!["Func", "Const", "Var", "Type"]);
}

#[test]
fn grouped_imports_and_decls() {
    let file = assert_parses(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
    str "strings"
)

const (
    A = iota
    B
    C int = 2
)

var (
    x = 1
    y, z int
)

type (
    T = int
    U[T any] struct { F T }
    V interface {
        M(x int) int
        ~int | ~string
    }
)
"#,
    );

    let imports = file.imports[0].spec();
    assert_eq!(imports.spec_type(), SpecType::Import);
    let names: Vec<Option<String>> = imports
        .specs()
        .iter()
        .map(|s| match s {
            Spec::Import(i) => match &i.name {
                Some(ImportName::Ident(id)) => Some(id.name.clone()),
                Some(ImportName::Dot(_)) => Some(".".to_owned()),
                None => None,
            },
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        names,
        vec![None, Some(".".into()), Some("_".into()), Some("str".into())]
    );

    let Decl::Const(consts) = &file.decls[0] else {
        panic!("expected const decl");
    };
    let consts = consts.spec().specs();
    assert_eq!(consts.len(), 3);
    let Spec::Const(b) = &consts[1] else {
        panic!("expected const spec");
    };
    assert!(b.values.is_none(), "implicit repetition keeps no values");

    let Decl::Type(types) = &file.decls[2] else {
        panic!("expected type decl");
    };
    let types = types.spec().specs();
    assert!(matches!(types[0], Spec::Type(TypeSpec::Alias(_))));
    let Spec::Type(TypeSpec::Def(generic)) = &types[1] else {
        panic!("expected type definition");
    };
    assert_eq!(generic.name.name, "U");
    assert!(generic.type_params.is_some());
}

#[test]
fn methods_and_generic_functions() {
    let file = assert_parses(
        r#"
package p

func (p *Point) Scale(f float64) { p.X *= f }

func Map[T, U any](xs []T, f func(T) U) []U {
    out := make([]U, 0, len(xs))
    for _, x := range xs {
        out = append(out, f(x))
    }
    return out
}

func external(x int) int
"#,
    );
    let Decl::Method(m) = &file.decls[0] else {
        panic!("expected method");
    };
    assert_eq!(m.name.name, "Scale");
    assert_eq!(m.receiver.params.len(), 1);

    let Decl::Func(f) = &file.decls[1] else {
        panic!("expected func");
    };
    let tparams = f.type_params.as_ref().expect("type params");
    assert_eq!(tparams.params[0].idents.names().collect::<Vec<_>>(), ["T", "U"]);
    assert_eq!(f.signature.params.params.len(), 2);

    let Decl::Func(ext) = &file.decls[2] else {
        panic!("expected func");
    };
    assert!(ext.body.is_none());
}

#[test]
fn comments_are_kept_on_the_file() {
    let file = assert_parses("// Package p.\npackage p\n\n/* x */ var x = 1 // trailing\n");
    let texts: Vec<&str> = file.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["// Package p.", "/* x */", "// trailing"]);
}

#[test]
fn filename_flows_into_tree_and_diagnostics() {
    let mut parser = Parser::new("package p\nvar = 1\n", ParseMode::File).with_filename("bad.go");
    let file = parser.parse_file().unwrap().unwrap();
    assert_eq!(file.filename.as_deref(), Some("bad.go"));
    assert_eq!(file.package.name.pos.filename(), Some("bad.go"));
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(
        parser.errors()[0].to_string(),
        "bad.go:2:14 ParseError: unexpected \"=\", expected identifier"
    );
}

#[test]
fn lex_errors_skip_parsing() {
    let mut parser = Parser::new("package p\nvar x = \"oops\n", ParseMode::File);
    assert!(parser.parse_file().unwrap().is_none());
    assert!(parser.has_errors());
    assert!(parser.errors().iter().all(|d| d.kind() == DiagKind::Lex));
}

#[test]
fn missing_package_clause_yields_no_file() {
    let mut parser = Parser::new("func main() {}\n", ParseMode::File);
    assert!(parser.parse_file().unwrap().is_none());
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(
        parser.errors()[0].message(),
        "unexpected \"func\", expected \"package\""
    );
}

#[test]
fn single_declaration_mode() {
    let mut parser = Parser::new("func f(a, b int) (int, error) { return a + b, nil }", ParseMode::SingleDecl);
    let decl = parser.parse_single_decl().unwrap();
    assert!(matches!(decl, Some(Decl::Func(_))), "{decl:?}");
    assert!(!parser.has_errors(), "{:?}", parser.errors());

    let mut parser = Parser::new("import \"os\"", ParseMode::SingleDecl);
    assert!(matches!(parser.parse_single_decl().unwrap(), Some(Decl::Import(_))));

    let mut parser = Parser::new("var x = 1\nvar y = 2\n", ParseMode::SingleDecl);
    assert!(parser.parse_single_decl().unwrap().is_some());
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(
        parser.errors()[0].message(),
        "unexpected \"var\" after declaration"
    );
}

#[test]
fn mode_misuse_fails_immediately() {
    let mut parser = Parser::new("package p\n", ParseMode::File);
    let err = parser.parse_single_decl().unwrap_err();
    assert_eq!(
        err,
        ParseModeError {
            configured: ParseMode::File,
            requested: ParseMode::SingleDecl,
        }
    );
    assert!(!parser.has_errors());

    let mut parser = Parser::new("var x int", ParseMode::SingleDecl);
    assert!(parser.parse_file().is_err());
}

#[test]
fn handler_sees_every_error_once() {
    let seen = RefCell::new(Vec::new());
    let mut parser = Parser::new(
        "package p\nvar = 1\nfunc f() { x := }\nfunc g() {}\n",
        ParseMode::File,
    )
    .with_error_handler(|d: &Diag| seen.borrow_mut().push(d.to_string()));

    let file = parser.parse_file().unwrap().unwrap();
    let count = parser.errors().len();
    drop(parser);

    assert_eq!(count, 2);
    assert_eq!(seen.borrow().len(), 2);
    assert_eq!(file.decls.len(), 2);
}

#[test]
fn reparsing_is_idempotent() {
    let src = "package p\nfunc f() { if x { y() } else if z { w() } }\nvar = 3\n";
    let mut parser = Parser::new(src, ParseMode::File);
    let first = parser.parse_file().unwrap();
    let first_errors = parser.errors().to_vec();
    let second = parser.parse_file().unwrap();
    assert_eq!(first, second);
    assert_eq!(first_errors, parser.errors());
    assert_eq!(first_errors.len(), 1);
}
