use gosyntax::ast::{
    BasicLit, CommCase, ElseBody, Expr, ExprStmt, GroupSpec, Ident, IfStmt, ImportDecl,
    ImportSpec, Keyword, LitKind, Punct, SimpleStmt, Spec, SpecType,
};
use gosyntax::{parse_source, Position, Token};

/// Messages produced by a function body that should not parse.
fn body_errors(body: &str) -> Vec<String> {
    let src = format!("package p\nfunc f() {{\n{body}\n}}\n");
    match parse_source(&src) {
        Ok(_) => panic!("{body:?} parsed"),
        Err(f) => f.diags.iter().map(|d| d.message()).collect(),
    }
}

fn kw(token: Token) -> Keyword {
    Keyword {
        pos: Position::default(),
        token,
    }
}

fn punct(token: Token) -> Punct {
    Punct {
        pos: Position::default(),
        token,
    }
}

fn import_spec(path: &str) -> Spec {
    Spec::Import(ImportSpec {
        name: None,
        path: BasicLit {
            pos: Position::default(),
            kind: LitKind::String,
            raw: format!("{path:?}"),
        },
    })
}

#[test]
fn short_var_decl_needs_names() {
    assert_eq!(
        body_errors("x, y.z := 1, 2"),
        ["non-name on left side of \":=\""]
    );
}

#[test]
fn expression_lists_need_an_assignment() {
    assert_eq!(
        body_errors("a, b++"),
        ["expected single expression instead of an expression list"]
    );
}

#[test]
fn go_and_defer_need_calls() {
    assert_eq!(body_errors("go f"), ["call expression expected"]);
    assert_eq!(body_errors("defer x.y"), ["call expression expected"]);
}

#[test]
fn type_switch_guard_must_assert_type_keyword() {
    assert_eq!(
        body_errors("switch x := y.(int) {}")[0],
        "type switch guard expected"
    );
}

#[test]
fn else_takes_if_or_block() {
    assert_eq!(body_errors("if x {} else for {}")[0], "malformed else branch");
}

#[test]
fn labels_are_single_identifiers() {
    assert_eq!(body_errors("a, b: x()")[0], "label expected");
}

#[test]
fn constructors_reject_mismatched_parts() {
    let stmt = SimpleStmt::Expr(ExprStmt {
        expr: Expr::Ident(Ident {
            pos: Position::default(),
            name: "x".into(),
        }),
    });
    let err = CommCase::new(kw(Token::KwCase), stmt).unwrap_err();
    assert_eq!(
        err.to_string(),
        "communication case must hold a send or receive statement"
    );

    assert!(ImportDecl::new(kw(Token::KwVar), import_spec("fmt")).is_err());
    assert!(ImportDecl::new(kw(Token::KwImport), import_spec("fmt")).is_ok());

    let inner = GroupSpec::new(
        SpecType::Import,
        punct(Token::LParen),
        vec![import_spec("os")],
        punct(Token::RParen),
    )
    .unwrap();
    let nested = GroupSpec::new(
        SpecType::Import,
        punct(Token::LParen),
        vec![Spec::Group(inner)],
        punct(Token::RParen),
    );
    assert!(nested.is_err());
}

#[test]
fn parsed_trees_satisfy_constructor_invariants() {
    let file = parse_source(
        "package p
func f() {
    if a {
    } else if b {
    } else {
    }
    select {
    case v := <-c:
    case c <- 1:
    }
}
",
    )
    .unwrap();
    let gosyntax::ast::Decl::Func(f) = &file.decls[0] else { panic!() };
    let stmts = &f.body.as_ref().unwrap().stmts.stmts;

    let gosyntax::ast::Stmt::If(outer) = &stmts[0] else { panic!() };
    let mut current: &IfStmt = outer;
    let mut depth = 1;
    loop {
        assert_eq!(current.else_keyword().is_some(), current.else_body().is_some());
        match current.else_body() {
            Some(ElseBody::If(next)) => {
                current = next;
                depth += 1;
            }
            _ => break,
        }
    }
    assert_eq!(depth, 2);

    let gosyntax::ast::Stmt::Select(sel) = &stmts[1] else { panic!() };
    for clause in &sel.clauses {
        let gosyntax::ast::CaseLabel::Case(case) = &clause.label else { panic!() };
        assert!(matches!(case.stmt(), SimpleStmt::Send(_) | SimpleStmt::Recv(_)));
    }
}
