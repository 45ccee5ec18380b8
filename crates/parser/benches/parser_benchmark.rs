use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gosyntax::lexer::Lexer;
use gosyntax::walk::count_nodes;
use gosyntax::{dump_to_string, ParseMode, Parser};
use std::hint::black_box as bb;

// =============================================================================
// Corpus - Different sizes of Go code
// =============================================================================

const SMALL_HELLO_WORLD: &str = r#"
package main

func main() {
    println("Hello, World!")
}
"#;

const MEDIUM_STRUCT_METHODS: &str = r#"
package geometry

type Point struct {
    X, Y float64
}

func (p Point) Abs() float64 {
    return sqrt(p.X*p.X + p.Y*p.Y)
}

func (p *Point) Scale(f float64) {
    p.X = p.X * f
    p.Y = p.Y * f
}

type Rectangle struct {
    Width, Height float64
}

func (r Rectangle) Area() float64 {
    return r.Width * r.Height
}

func (r *Rectangle) Grow(delta float64) {
    r.Width += delta
    r.Height += delta
}
"#;

const LARGE_COMPLEX: &str = r#"
package compiler

import (
    "fmt"
    "strings"
)

type TokenKind int

const (
    TokEOF TokenKind = iota
    TokIdent
    TokNumber
    TokString
)

type Token struct {
    Kind TokenKind
    Text string
    Line int
}

type Lexer struct {
    input  []byte
    pos    int
    line   int
    tokens []Token
}

func NewLexer(source string) *Lexer {
    return &Lexer{
        input: []byte(source),
        pos:   0,
        line:  1,
    }
}

func (l *Lexer) NextToken() Token {
    if l.pos >= len(l.input) {
        return Token{Kind: TokEOF, Line: l.line}
    }

    ch := l.input[l.pos]
    if isLetter(ch) {
        return l.readIdent()
    }
    if isDigit(ch) {
        return l.readNumber()
    }

    l.pos++
    return Token{Kind: TokIdent, Text: string(ch), Line: l.line}
}

func (l *Lexer) readIdent() Token {
    start := l.pos
    for l.pos < len(l.input) && isLetter(l.input[l.pos]) {
        l.pos++
    }
    return Token{
        Kind: TokIdent,
        Text: string(l.input[start:l.pos]),
        Line: l.line,
    }
}

func (l *Lexer) readNumber() Token {
    start := l.pos
    for l.pos < len(l.input) && isDigit(l.input[l.pos]) {
        l.pos++
    }
    return Token{
        Kind: TokNumber,
        Text: string(l.input[start:l.pos]),
        Line: l.line,
    }
}

func isLetter(ch byte) bool {
    return (ch >= 'a' && ch <= 'z') || (ch >= 'A' && ch <= 'Z') || ch == '_'
}

func isDigit(ch byte) bool {
    return ch >= '0' && ch <= '9'
}
"#;

// =============================================================================
// Helpers
// =============================================================================

fn token_count(input: &str) -> usize {
    Lexer::new(input).count()
}

/// A file with `n` small functions, each touching statements, expressions and
/// composite literals.
fn make_functions(n: usize) -> String {
    let mut out = String::from("package gen\n\n");
    for i in 0..n {
        out.push_str(&format!(
            "func f{i}(xs []int) (sum int) {{\n\tfor _, x := range xs {{\n\t\tif x > {i} {{\n\t\t\tsum += x\n\t\t}}\n\t}}\n\t_ = map[string]int{{\"k\": {i}}}\n\treturn\n}}\n\n"
        ));
    }
    out
}

fn parse(input: &str) -> gosyntax::ast::File {
    let mut parser = Parser::new(input, ParseMode::File);
    match parser.parse_file() {
        Ok(Some(file)) if !parser.has_errors() => file,
        _ => panic!("benchmark input failed to parse: {:?}", parser.errors()),
    }
}

const CORPORA: [(&str, &str); 3] = [
    ("small", SMALL_HELLO_WORLD),
    ("medium", MEDIUM_STRUCT_METHODS),
    ("large", LARGE_COMPLEX),
];

// =============================================================================
// Benchmark 1: Lexer Performance
//  - iterate_only: tokenization + semicolon insertion without Vec allocation
//  - collect_with_capacity: "parser feed" style with a fixed capacity
// =============================================================================

fn bench_lexer(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    for (name, input) in CORPORA {
        let tok_count = token_count(input);

        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("iterate_only_bytes", name),
            &input,
            |b, &input| {
                b.iter(|| {
                    let mut acc: u64 = 0;
                    for lexeme in Lexer::new(bb(input)) {
                        acc = acc.wrapping_add(lexeme.pos.offset as u64);
                        acc = acc.wrapping_add(lexeme.token as u64);
                    }
                    bb(acc);
                });
            },
        );

        group.throughput(Throughput::Elements(tok_count as u64));
        group.bench_with_input(
            BenchmarkId::new("collect_with_capacity_tokens", name),
            &(input, tok_count),
            |b, &(input, tok_count)| {
                b.iter(|| {
                    let mut v = Vec::with_capacity(tok_count);
                    v.extend(Lexer::new(bb(input)));
                    bb(v.len());
                    bb(v);
                });
            },
        );
    }

    group.finish();
}

// =============================================================================
// Benchmark 2: Parser Performance (lex + parse + tree construction)
// =============================================================================

fn bench_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser");

    for (name, input) in CORPORA {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse_file", name), &input, |b, &input| {
            b.iter(|| bb(parse(bb(input))));
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 3: Tree Traversal
// - count_nodes: bare Walk dispatch
// - dump: Walk plus formatting
// =============================================================================

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");

    for (name, input) in CORPORA {
        let file = parse(input);
        group.throughput(Throughput::Elements(count_nodes(&file) as u64));
        group.bench_with_input(BenchmarkId::new("count_nodes", name), &file, |b, file| {
            b.iter(|| bb(count_nodes(bb(file))));
        });
        group.bench_with_input(BenchmarkId::new("dump", name), &file, |b, file| {
            b.iter(|| bb(dump_to_string(bb(file))));
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 4: Scalability
// Generated files of growing size, so per-byte cost should stay flat.
// =============================================================================

fn bench_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");

    for &n in &[10usize, 100, 1000] {
        let src = make_functions(n);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::new("lex", n), &src, |b, src| {
            b.iter(|| bb(Lexer::new(bb(src)).count()));
        });
        group.bench_with_input(BenchmarkId::new("parse", n), &src, |b, src| {
            b.iter(|| bb(parse(bb(src))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer,
    bench_parser,
    bench_walk,
    bench_scalability
);
criterion_main!(benches);
