use gosyntax::ast::{ArrayLen, AssertedType, Decl, Expr, SliceExpr, Spec, Type};
use gosyntax::parse_source;

/// Parses `src` as the initializer of a package-level variable.
fn expr(src: &str) -> Expr {
    let file = match parse_source(&format!("package p\nvar _ = {src}\n")) {
        Ok(file) => file,
        Err(f) => panic!("{src:?} failed: {:#?}", f.diags),
    };
    let Some(Decl::Var(var)) = file.decls.first() else {
        panic!("expected a var decl");
    };
    let Spec::Var(spec) = var.spec() else {
        panic!("expected a single var spec");
    };
    spec.values().expect("initializer").exprs[0].clone()
}

/// First diagnostic produced by an initializer that should not parse.
fn expr_error(src: &str) -> String {
    match parse_source(&format!("package p\nvar _ = {src}\n")) {
        Ok(file) => panic!("{src:?} parsed: {file:#?}"),
        Err(f) => f.diags[0].message(),
    }
}

/// Fully parenthesized rendering of operators and operands.
fn show(e: &Expr) -> String {
    match e {
        Expr::Ident(id) => id.name.clone(),
        Expr::BasicLit(lit) => lit.raw.clone(),
        Expr::Binary(b) => format!("({} {} {})", b.op.token.as_str(), show(&b.left), show(&b.right)),
        Expr::Unary(u) => format!("({} {})", u.op.token.as_str(), show(&u.expr)),
        Expr::Group(g) => show(&g.expr),
        Expr::Call(c) => {
            let args: Vec<String> = c.args.exprs.iter().map(show).collect();
            format!("{}({})", show(&c.func), args.join(", "))
        }
        Expr::Selector(s) => format!("{}.{}", show(&s.expr), s.selector.name),
        Expr::Index(i) => format!("{}[{}]", show(&i.expr), show(&i.index)),
        other => format!("<{other:?}>"),
    }
}

#[test]
fn binary_precedence() {
    for (src, want) in [
        ("a + b * c", "(+ a (* b c))"),
        ("a * b + c", "(+ (* a b) c)"),
        ("a - b - c", "(- (- a b) c)"),
        ("a || b && c == d", "(|| a (&& b (== c d)))"),
        ("a << 1 | b &^ c", "(| (<< a 1) (&^ b c))"),
        ("x < y == (z > w)", "(== (< x y) (> z w))"),
        ("1 + 2 + 3 * 4 / 5 % 6", "(+ (+ 1 2) (% (/ (* 3 4) 5) 6))"),
    ] {
        assert_eq!(show(&expr(src)), want, "{src}");
    }
}

#[test]
fn unary_binds_tighter_than_binary() {
    for (src, want) in [
        ("-x * y", "(* (- x) y)"),
        ("!*p", "(! (* p))"),
        ("^a + <-ch", "(+ (^ a) (<- ch))"),
        ("&s.f", "(& s.f)"),
        ("-f(x).y", "(- f(x).y)"),
    ] {
        assert_eq!(show(&expr(src)), want, "{src}");
    }
}

#[test]
fn calls_and_variadic_arguments() {
    let Expr::Call(call) = expr("f(a, b...)") else { panic!() };
    assert_eq!(call.args.exprs.len(), 2);
    assert!(call.ellipsis.is_some());

    let Expr::Call(call) = expr("g(\n\ta,\n\tb,\n)") else { panic!() };
    assert_eq!(call.args.exprs.len(), 2);
    assert!(call.ellipsis.is_none());

    let Expr::Call(call) = expr("make([]int, 0, 8)") else { panic!() };
    assert!(matches!(call.args.exprs[0], Expr::Type(Type::Slice(_))));

    let Expr::Call(call) = expr("new(T)") else { panic!() };
    assert!(matches!(call.args.exprs[0], Expr::Type(Type::Name(_))));

    assert_eq!(show(&expr("a.b.c(d)(e)")), "a.b.c(d)(e)");
}

#[test]
fn slices() {
    let Expr::Slice(SliceExpr::Simple(s)) = expr("s[1:2]") else { panic!() };
    assert!(s.low.is_some() && s.high.is_some());

    let Expr::Slice(SliceExpr::Simple(s)) = expr("s[:]") else { panic!() };
    assert!(s.low.is_none() && s.high.is_none());

    let Expr::Slice(SliceExpr::Full(s)) = expr("s[:n:cap(s)]") else { panic!() };
    assert!(s.low.is_none());
    assert_eq!(show(&s.max), "cap(s)");

    assert_eq!(expr_error("s[::3]"), "middle index required in 3-index slice");
    assert_eq!(expr_error("s[1:2:]"), "final index required in 3-index slice");
}

#[test]
fn index_and_instantiation() {
    assert!(matches!(expr("m[k]"), Expr::Index(_)));

    let Expr::Instantiation(inst) = expr("Map[string, int]") else { panic!() };
    assert_eq!(inst.type_args.types.types.len(), 2);

    let Expr::Instantiation(inst) = expr("Sum[[]float64]") else { panic!() };
    assert!(matches!(inst.type_args.types.types[0], Type::Slice(_)));

    let Expr::Call(call) = expr("Max[int, float64](a, b)") else { panic!() };
    assert!(matches!(*call.func, Expr::Instantiation(_)));
}

#[test]
fn type_assertions() {
    let Expr::TypeAssertion(a) = expr("x.(T)") else { panic!() };
    assert!(matches!(a.ty, AssertedType::Type(Type::Name(_))));

    let Expr::TypeAssertion(a) = expr("r.(*os.File)") else { panic!() };
    let AssertedType::Type(Type::Pointer(ptr)) = &a.ty else { panic!() };
    let Type::Name(name) = &*ptr.elem else { panic!() };
    assert_eq!(name.package.as_ref().unwrap().name, "os");
    assert_eq!(name.name.name, "File");
}

#[test]
fn function_literals() {
    let Expr::FuncLit(f) = expr("func(a int) int { return a * 2 }") else { panic!() };
    assert_eq!(f.ty.signature.params.params.len(), 1);
    assert_eq!(f.body.stmts.stmts.len(), 1);

    let Expr::Call(call) = expr("func() {}()") else { panic!() };
    assert!(matches!(*call.func, Expr::FuncLit(_)));

    assert!(matches!(expr("func(int) bool(nil)"), Expr::Call(_)));
}

#[test]
fn composite_literals() {
    let Expr::CompositeLit(lit) = expr("Point{X: 1, Y: 2}") else { panic!() };
    assert_eq!(lit.elements.elements.len(), 2);
    assert!(lit.elements.elements.iter().all(|e| e.key().is_some()));

    let Expr::CompositeLit(lit) = expr("[]int{1, 2, 3,}") else { panic!() };
    assert!(matches!(lit.ty.as_deref(), Some(Type::Slice(_))));
    assert_eq!(lit.elements.elements.len(), 3);

    let Expr::CompositeLit(lit) = expr("map[string][]int{\"a\": {1}, \"b\": nil}") else {
        panic!()
    };
    let Expr::CompositeLit(inner) = lit.elements.elements[0].element() else {
        panic!("nested literal value");
    };
    assert!(inner.ty.is_none());

    let Expr::CompositeLit(lit) = expr("[...]string{\"x\"}") else { panic!() };
    let Some(Type::Array(array)) = lit.ty.as_deref() else { panic!() };
    assert!(matches!(array.len, ArrayLen::Ellipsis(_)));

    let Expr::CompositeLit(lit) = expr("pkg.Pair[K, V]{}") else { panic!() };
    let Some(Type::Name(name)) = lit.ty.as_deref() else { panic!() };
    assert_eq!(name.package.as_ref().unwrap().name, "pkg");
    assert_eq!(name.type_args.as_ref().unwrap().types.types.len(), 2);
    assert!(lit.elements.elements.is_empty());

    let Expr::Unary(u) = expr("&T{}") else { panic!() };
    assert!(matches!(*u.expr, Expr::CompositeLit(_)));
}

#[test]
fn conversions() {
    let Expr::Call(call) = expr("[]byte(s)") else { panic!() };
    assert!(matches!(*call.func, Expr::Type(Type::Slice(_))));

    let Expr::Call(call) = expr("(*T)(p)") else { panic!() };
    assert!(matches!(*call.func, Expr::Group(_)));

    let Expr::Call(call) = expr("chan int(nil)") else { panic!() };
    assert!(matches!(*call.func, Expr::Type(Type::Chan(_))));
}

#[test]
fn malformed_expressions() {
    assert_eq!(expr_error(")"), "unexpected \")\" in operand expression");
    assert_eq!(expr_error("f(a b)"), "comma expected in argument list");
    assert_eq!(expr_error("T{1 2}"), "comma expected in element list");
    assert_eq!(
        expr_error("x.*y"),
        "expected selector or type assertion, got \"*\""
    );
}
