//! # Go syntax tree
//!
//! Owned, immutable tree produced by the parser. Every node owns its children
//! outright; nothing is shared and nothing points back up.
//!
//! ## Conventions
//!
//! - Keywords, operators and punctuation are kept as [`Keyword`], [`Operator`]
//!   and [`Punct`] markers carrying their own [`Position`].
//! - Fields that can hold one of several node shapes are enums over those
//!   shapes ([`ElseBody`], [`Iteration`], [`SignatureResult`], ...).
//! - Nodes whose fields constrain each other ([`KeyedElement`], [`IfStmt`],
//!   [`VarSpec`], [`RangeClause`], [`CommCase`], [`GroupSpec`] and the spec
//!   wrapping declarations) keep those fields private and are built through
//!   fallible `new` constructors returning [`InvalidNode`].
//! - `#[derive(WalkAst)]` generates `impl crate::walk::Walk` so tools can
//!   enumerate children without knowing concrete types (see [`crate::walk`]).

use std::fmt;
use std::sync::Arc;

use ast_derive::WalkAst;

use crate::error::InvalidNode;
use crate::position::Position;
use crate::token::Token;

// =============================================================================
// Leaves
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Ident {
    pub pos: Position,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Keyword {
    pub pos: Position,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Operator {
    pub pos: Position,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Punct {
    pub pos: Position,
    pub token: Token,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
    RawString,
}

impl fmt::Display for LitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Literal exactly as written, quotes included.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct BasicLit {
    pub pos: Position,
    pub kind: LitKind,
    pub raw: String,
}

impl BasicLit {
    /// Text between the quotes for string and rune literals; escapes are not
    /// interpreted.
    pub fn unquoted(&self) -> &str {
        match self.kind {
            LitKind::String | LitKind::RawString | LitKind::Rune if self.raw.len() >= 2 => {
                &self.raw[1..self.raw.len() - 1]
            }
            _ => &self.raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Comment {
    pub pos: Position,
    pub token: Token,
    pub text: String,
}

// =============================================================================
// Lists
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct IdentList {
    pub idents: Vec<Ident>,
}

impl IdentList {
    /// Reinterprets the left side of `:=`, which is parsed as expressions.
    pub fn from_expr_list(list: ExprList) -> Result<Self, InvalidNode> {
        list.exprs
            .into_iter()
            .map(|e| match e {
                Expr::Ident(id) => Ok(id),
                _ => Err(InvalidNode::new(
                    "cannot create an identifier list from an arbitrary expression list",
                )),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|idents| Self { idents })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.idents.iter().map(|i| i.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ExprList {
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeList {
    pub types: Vec<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, WalkAst)]
pub struct StmtList {
    pub stmts: Vec<Stmt>,
}

// =============================================================================
// File
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct File {
    pub filename: Option<Arc<str>>,
    pub package: PackageClause,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Decl>,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct PackageClause {
    pub keyword: Keyword,
    pub name: Ident,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
#[walk(category = "Decl")]
pub enum Decl {
    Func(FuncDecl),
    Method(MethodDecl),
    Import(ImportDecl),
    Const(ConstDecl),
    Var(VarDecl),
    Type(TypeDecl),
}

/// ```text
/// FunctionDecl = "func" FunctionName [ TypeParameters ] Signature [ FunctionBody ] .
/// ```
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct FuncDecl {
    pub keyword: Keyword,
    pub name: Ident,
    pub type_params: Option<TypeParams>,
    pub signature: Signature,
    pub body: Option<BlockStmt>,
}

/// ```text
/// MethodDecl = "func" Receiver MethodName Signature [ FunctionBody ] .
/// ```
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct MethodDecl {
    pub keyword: Keyword,
    pub receiver: Params,
    pub name: Ident,
    pub signature: Signature,
    pub body: Option<BlockStmt>,
}

macro_rules! spec_decl {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $keyword:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
        pub struct $name {
            keyword: Keyword,
            spec: Spec,
        }

        impl $name {
            pub fn new(keyword: Keyword, spec: Spec) -> Result<Self, InvalidNode> {
                if keyword.token != Token::$keyword || spec.spec_type() != SpecType::$kind {
                    return Err(InvalidNode::new(format!(
                        "cannot create a {} from {} with a spec of type {}",
                        stringify!($name),
                        keyword.token,
                        spec.spec_type(),
                    )));
                }
                Ok(Self { keyword, spec })
            }

            #[inline]
            pub fn keyword(&self) -> &Keyword {
                &self.keyword
            }

            #[inline]
            pub fn spec(&self) -> &Spec {
                &self.spec
            }
        }
    };
}

spec_decl!(
    /// `import` followed by one spec or a parenthesized group.
    ImportDecl, Import, KwImport
);
spec_decl!(ConstDecl, Const, KwConst);
spec_decl!(VarDecl, Var, KwVar);
spec_decl!(TypeDecl, Type, KwType);

// =============================================================================
// Specs
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecType {
    Import,
    Var,
    Const,
    Type,
}

impl fmt::Display for SpecType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
#[walk(category = "Spec")]
pub enum Spec {
    Import(ImportSpec),
    Const(ConstSpec),
    Var(VarSpec),
    Type(TypeSpec),
    Group(GroupSpec),
}

impl Spec {
    pub fn spec_type(&self) -> SpecType {
        match self {
            Spec::Import(_) => SpecType::Import,
            Spec::Const(_) => SpecType::Const,
            Spec::Var(_) => SpecType::Var,
            Spec::Type(_) => SpecType::Type,
            Spec::Group(g) => g.spec_type,
        }
    }

    /// The specs of a group, or this spec alone.
    pub fn specs(&self) -> &[Spec] {
        match self {
            Spec::Group(g) => &g.specs,
            single => std::slice::from_ref(single),
        }
    }
}

/// Parenthesized list of specs of one kind.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct GroupSpec {
    spec_type: SpecType,
    l_paren: Punct,
    specs: Vec<Spec>,
    r_paren: Punct,
}

impl GroupSpec {
    pub fn new(
        spec_type: SpecType,
        l_paren: Punct,
        specs: Vec<Spec>,
        r_paren: Punct,
    ) -> Result<Self, InvalidNode> {
        if let Some(bad) = specs
            .iter()
            .find(|s| matches!(s, Spec::Group(_)) || s.spec_type() != spec_type)
        {
            return Err(InvalidNode::new(format!(
                "a {spec_type} group cannot contain a {} spec",
                bad.spec_type()
            )));
        }
        Ok(Self {
            spec_type,
            l_paren,
            specs,
            r_paren,
        })
    }

    #[inline]
    pub fn spec_type(&self) -> SpecType {
        self.spec_type
    }

    #[inline]
    pub fn specs(&self) -> &[Spec] {
        &self.specs
    }

    #[inline]
    pub fn l_paren(&self) -> &Punct {
        &self.l_paren
    }

    #[inline]
    pub fn r_paren(&self) -> &Punct {
        &self.r_paren
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ImportSpec {
    pub name: Option<ImportName>,
    pub path: BasicLit,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum ImportName {
    Ident(Ident),
    Dot(Punct),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ConstSpec {
    pub idents: IdentList,
    pub ty: Option<Type>,
    pub values: Option<ExprList>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct VarSpec {
    idents: IdentList,
    ty: Option<Type>,
    values: Option<ExprList>,
}

impl VarSpec {
    pub fn new(
        idents: IdentList,
        ty: Option<Type>,
        values: Option<ExprList>,
    ) -> Result<Self, InvalidNode> {
        if ty.is_none() && values.is_none() {
            return Err(InvalidNode::new("var must have either type or init value"));
        }
        Ok(Self { idents, ty, values })
    }

    #[inline]
    pub fn idents(&self) -> &IdentList {
        &self.idents
    }

    #[inline]
    pub fn ty(&self) -> Option<&Type> {
        self.ty.as_ref()
    }

    #[inline]
    pub fn values(&self) -> Option<&ExprList> {
        self.values.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum TypeSpec {
    Def(TypeDef),
    Alias(AliasDecl),
}

/// `type Name[TypeParams] Type`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeDef {
    pub name: Ident,
    pub type_params: Option<TypeParams>,
    pub ty: Type,
}

/// `type Name = Type`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct AliasDecl {
    pub name: Ident,
    pub assign: Operator,
    pub ty: Type,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
#[walk(category = "Stmt")]
pub enum Stmt {
    Decl(Decl),
    Block(BlockStmt),
    If(IfStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Select(SelectStmt),
    Labeled(LabeledStmt),
    Go(GoStmt),
    Defer(DeferStmt),
    Return(ReturnStmt),
    Goto(GotoStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Fallthrough(FallthroughStmt),
    Simple(SimpleStmt),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
#[walk(category = "SimpleStmt")]
pub enum SimpleStmt {
    Assignment(AssignmentStmt),
    ShortVarDecl(ShortVarDecl),
    IncDec(IncDecStmt),
    Send(SendStmt),
    Recv(RecvStmt),
    Expr(ExprStmt),
    Empty(EmptyStmt),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct BlockStmt {
    pub l_brace: Punct,
    pub stmts: StmtList,
    pub r_brace: Punct,
}

/// ```text
/// IfStmt = "if" [ SimpleStmt ";" ] Expression Block [ "else" ( IfStmt | Block ) ] .
/// ```
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct IfStmt {
    keyword: Keyword,
    init: Option<SimpleStmt>,
    cond: Expr,
    body: BlockStmt,
    else_branch: Option<ElseBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ElseBranch {
    pub keyword: Keyword,
    pub body: ElseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum ElseBody {
    If(Box<IfStmt>),
    Block(BlockStmt),
}

impl IfStmt {
    pub fn new(
        keyword: Keyword,
        init: Option<SimpleStmt>,
        cond: Expr,
        body: BlockStmt,
        else_keyword: Option<Keyword>,
        else_body: Option<ElseBody>,
    ) -> Result<Self, InvalidNode> {
        let else_branch = match (else_keyword, else_body) {
            (Some(keyword), Some(body)) => Some(ElseBranch { keyword, body }),
            (None, None) => None,
            _ => {
                return Err(InvalidNode::new(
                    "both \"else\" keyword and the body must be present or neither",
                ))
            }
        };
        Ok(Self {
            keyword,
            init,
            cond,
            body,
            else_branch,
        })
    }

    #[inline]
    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    #[inline]
    pub fn init(&self) -> Option<&SimpleStmt> {
        self.init.as_ref()
    }

    #[inline]
    pub fn cond(&self) -> &Expr {
        &self.cond
    }

    #[inline]
    pub fn body(&self) -> &BlockStmt {
        &self.body
    }

    #[inline]
    pub fn else_keyword(&self) -> Option<&Keyword> {
        self.else_branch.as_ref().map(|e| &e.keyword)
    }

    #[inline]
    pub fn else_body(&self) -> Option<&ElseBody> {
        self.else_branch.as_ref().map(|e| &e.body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ForStmt {
    pub keyword: Keyword,
    pub iteration: Option<Iteration>,
    pub body: BlockStmt,
}

/// What follows `for` before the body.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum Iteration {
    Cond(Expr),
    Clause(ForClause),
    Range(RangeClause),
}

/// `init; cond; post`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ForClause {
    pub init: Option<SimpleStmt>,
    pub cond: Option<Expr>,
    pub post: Option<SimpleStmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum BindingList {
    Idents(IdentList),
    Exprs(ExprList),
}

impl BindingList {
    pub fn len(&self) -> usize {
        match self {
            BindingList::Idents(l) => l.idents.len(),
            BindingList::Exprs(l) => l.exprs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Left side of `:=` or `=` in range clauses and receive statements.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Binding {
    pub list: BindingList,
    pub op: Operator,
}

/// ```text
/// RangeClause = [ ExpressionList "=" | IdentifierList ":=" ] "range" Expression .
/// ```
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct RangeClause {
    binding: Option<Binding>,
    keyword: Keyword,
    expr: Expr,
}

impl RangeClause {
    pub fn new(
        list: Option<BindingList>,
        op: Option<Operator>,
        keyword: Keyword,
        expr: Expr,
    ) -> Result<Self, InvalidNode> {
        let binding = match (list, op) {
            (Some(list), Some(op)) => Some(Binding { list, op }),
            (None, None) => None,
            _ => {
                return Err(InvalidNode::new(
                    "range clause must have both a binding list and its operator or neither",
                ))
            }
        };
        Ok(Self {
            binding,
            keyword,
            expr,
        })
    }

    #[inline]
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }

    #[inline]
    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    #[inline]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum SwitchStmt {
    Expr(ExprSwitchStmt),
    Type(TypeSwitchStmt),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ExprSwitchStmt {
    pub keyword: Keyword,
    pub init: Option<SimpleStmt>,
    pub tag: Option<Expr>,
    pub l_brace: Punct,
    pub clauses: Vec<ExprCaseClause>,
    pub r_brace: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeSwitchStmt {
    pub keyword: Keyword,
    pub init: Option<SimpleStmt>,
    pub guard: TypeSwitchGuard,
    pub l_brace: Punct,
    pub clauses: Vec<TypeCaseClause>,
    pub r_brace: Punct,
}

/// `[ x := ] expr.(type)`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeSwitchGuard {
    pub binding: Option<GuardBinding>,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct GuardBinding {
    pub ident: Ident,
    pub define: Operator,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct CaseClause<L> {
    pub label: CaseLabel<L>,
    pub colon: Punct,
    pub body: StmtList,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum CaseLabel<L> {
    Case(L),
    Default(DefaultCase),
}

pub type ExprCaseClause = CaseClause<ExprSwitchCase>;
pub type TypeCaseClause = CaseClause<TypeSwitchCase>;
pub type CommClause = CaseClause<CommCase>;

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct DefaultCase {
    pub keyword: Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ExprSwitchCase {
    pub keyword: Keyword,
    pub exprs: ExprList,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeSwitchCase {
    pub keyword: Keyword,
    pub types: TypeList,
}

/// `case` of a select: a send or a receive.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct CommCase {
    keyword: Keyword,
    stmt: SimpleStmt,
}

impl CommCase {
    pub fn new(keyword: Keyword, stmt: SimpleStmt) -> Result<Self, InvalidNode> {
        match stmt {
            SimpleStmt::Send(_) | SimpleStmt::Recv(_) => Ok(Self { keyword, stmt }),
            _ => Err(InvalidNode::new(
                "communication case must hold a send or receive statement",
            )),
        }
    }

    #[inline]
    pub fn keyword(&self) -> &Keyword {
        &self.keyword
    }

    #[inline]
    pub fn stmt(&self) -> &SimpleStmt {
        &self.stmt
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct SelectStmt {
    pub keyword: Keyword,
    pub l_brace: Punct,
    pub clauses: Vec<CommClause>,
    pub r_brace: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct LabeledStmt {
    pub label: Ident,
    pub colon: Punct,
    pub stmt: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct GoStmt {
    pub keyword: Keyword,
    pub call: CallExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct DeferStmt {
    pub keyword: Keyword,
    pub call: CallExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ReturnStmt {
    pub keyword: Keyword,
    pub results: Option<ExprList>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct GotoStmt {
    pub keyword: Keyword,
    pub label: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct BreakStmt {
    pub keyword: Keyword,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ContinueStmt {
    pub keyword: Keyword,
    pub label: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct FallthroughStmt {
    pub keyword: Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct AssignmentStmt {
    pub lhs: ExprList,
    pub op: Operator,
    pub rhs: ExprList,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ShortVarDecl {
    pub idents: IdentList,
    pub define: Operator,
    pub values: ExprList,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct IncDecStmt {
    pub expr: Expr,
    pub op: Operator,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct SendStmt {
    pub channel: Expr,
    pub arrow: Operator,
    pub value: Expr,
}

/// `[ lhs = | idents := ] <-ch` inside a select case.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct RecvStmt {
    pub binding: Option<Binding>,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ExprStmt {
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct EmptyStmt {
    pub pos: Position,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
#[walk(category = "Expr")]
pub enum Expr {
    #[walk(category = "PrimaryExpr")]
    Ident(Ident),
    #[walk(category = "PrimaryExpr")]
    BasicLit(BasicLit),
    #[walk(category = "PrimaryExpr")]
    CompositeLit(CompositeLit),
    #[walk(category = "PrimaryExpr")]
    FuncLit(FuncLit),
    #[walk(category = "PrimaryExpr")]
    Call(CallExpr),
    #[walk(category = "PrimaryExpr")]
    Index(IndexExpr),
    #[walk(category = "PrimaryExpr")]
    Instantiation(InstantiationExpr),
    #[walk(category = "PrimaryExpr")]
    Slice(SliceExpr),
    #[walk(category = "PrimaryExpr")]
    Selector(SelectorExpr),
    #[walk(category = "PrimaryExpr")]
    TypeAssertion(TypeAssertionExpr),
    #[walk(category = "PrimaryExpr")]
    Group(GroupExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    /// A type in operand position: conversions, builtin arguments.
    Type(Type),
}

impl Expr {
    pub fn is_primary(&self) -> bool {
        !matches!(self, Expr::Binary(_) | Expr::Unary(_))
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(id) => Some(id),
            _ => None,
        }
    }
}

/// ```text
/// CompositeLit = LiteralType LiteralValue .
/// ```
///
/// `ty` is absent for nested literal values whose type is elided.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct CompositeLit {
    pub ty: Option<Box<Type>>,
    pub l_brace: Punct,
    pub elements: ElementList,
    pub r_brace: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, WalkAst)]
pub struct ElementList {
    pub elements: Vec<KeyedElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct KeyedElement {
    key: Option<ElementKey>,
    element: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ElementKey {
    pub key: Expr,
    pub colon: Punct,
}

impl KeyedElement {
    pub fn new(key: Option<Expr>, colon: Option<Punct>, element: Expr) -> Result<Self, InvalidNode> {
        let key = match (key, colon) {
            (Some(key), Some(colon)) => Some(ElementKey { key, colon }),
            (None, None) => None,
            _ => {
                return Err(InvalidNode::new(
                    "keyed element must have both key and colon or neither",
                ))
            }
        };
        Ok(Self { key, element })
    }

    #[inline]
    pub fn key(&self) -> Option<&Expr> {
        self.key.as_ref().map(|k| &k.key)
    }

    #[inline]
    pub fn colon(&self) -> Option<&Punct> {
        self.key.as_ref().map(|k| &k.colon)
    }

    #[inline]
    pub fn element(&self) -> &Expr {
        &self.element
    }
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct FuncLit {
    pub ty: FuncType,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct CallExpr {
    pub func: Box<Expr>,
    pub l_paren: Punct,
    pub args: ExprList,
    pub ellipsis: Option<Punct>,
    pub r_paren: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct IndexExpr {
    pub expr: Box<Expr>,
    pub l_brack: Punct,
    pub index: Box<Expr>,
    pub r_brack: Punct,
}

/// Generic instantiation with several type arguments, `Pair[K, V]`.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct InstantiationExpr {
    pub expr: Box<Expr>,
    pub type_args: TypeArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum SliceExpr {
    Simple(SimpleSliceExpr),
    Full(FullSliceExpr),
}

/// `a[low : high]`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct SimpleSliceExpr {
    pub expr: Box<Expr>,
    pub l_brack: Punct,
    pub low: Option<Box<Expr>>,
    pub colon: Punct,
    pub high: Option<Box<Expr>>,
    pub r_brack: Punct,
}

/// `a[low : high : max]`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct FullSliceExpr {
    pub expr: Box<Expr>,
    pub l_brack: Punct,
    pub low: Option<Box<Expr>>,
    pub first_colon: Punct,
    pub high: Box<Expr>,
    pub second_colon: Punct,
    pub max: Box<Expr>,
    pub r_brack: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct SelectorExpr {
    pub expr: Box<Expr>,
    pub dot: Punct,
    pub selector: Ident,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeAssertionExpr {
    pub expr: Box<Expr>,
    pub dot: Punct,
    pub l_paren: Punct,
    pub ty: AssertedType,
    pub r_paren: Punct,
}

/// `x.(T)` or the type-switch form `x.(type)`.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum AssertedType {
    Type(Type),
    TypeKeyword(Keyword),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct GroupExpr {
    pub l_paren: Punct,
    pub expr: Box<Expr>,
    pub r_paren: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: Operator,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct UnaryExpr {
    pub op: Operator,
    pub expr: Box<Expr>,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
#[walk(category = "Type")]
pub enum Type {
    Name(TypeName),
    #[walk(category = "TypeLit")]
    Array(ArrayType),
    #[walk(category = "TypeLit")]
    Slice(SliceType),
    #[walk(category = "TypeLit")]
    Map(MapType),
    #[walk(category = "TypeLit")]
    Chan(ChannelType),
    #[walk(category = "TypeLit")]
    Func(FuncType),
    #[walk(category = "TypeLit")]
    Struct(StructType),
    #[walk(category = "TypeLit")]
    Interface(InterfaceType),
    #[walk(category = "TypeLit")]
    Pointer(PointerType),
    #[walk(category = "TypeLit")]
    Paren(ParenType),
}

/// `Name`, `pkg.Name`, either optionally followed by `[TypeArgs]`.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeName {
    pub package: Option<Ident>,
    pub name: Ident,
    pub type_args: Option<TypeArgs>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeArgs {
    pub l_brack: Punct,
    pub types: TypeList,
    pub r_brack: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ArrayType {
    pub l_brack: Punct,
    pub len: ArrayLen,
    pub r_brack: Punct,
    pub elem: Box<Type>,
}

/// `[N]T` or `[...]T`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum ArrayLen {
    Expr(Box<Expr>),
    Ellipsis(Punct),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct SliceType {
    pub l_brack: Punct,
    pub r_brack: Punct,
    pub elem: Box<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct MapType {
    pub keyword: Keyword,
    pub l_brack: Punct,
    pub key: Box<Type>,
    pub r_brack: Punct,
    pub value: Box<Type>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

impl fmt::Display for ChanDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// `chan T`, `chan<- T` or `<-chan T`; `arrow` is the `<-` if any.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ChannelType {
    pub dir: ChanDir,
    pub keyword: Keyword,
    pub arrow: Option<Operator>,
    pub elem: Box<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct FuncType {
    pub keyword: Keyword,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct StructType {
    pub keyword: Keyword,
    pub l_brace: Punct,
    pub fields: Vec<FieldDecl>,
    pub r_brace: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum FieldDecl {
    Named(NamedFieldDecl),
    Embedded(EmbeddedFieldDecl),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct NamedFieldDecl {
    pub idents: IdentList,
    pub ty: Type,
    pub tag: Option<BasicLit>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct EmbeddedFieldDecl {
    pub star: Option<Punct>,
    pub type_name: TypeName,
    pub tag: Option<BasicLit>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct InterfaceType {
    pub keyword: Keyword,
    pub l_brace: Punct,
    pub elems: Vec<InterfaceElem>,
    pub r_brace: Punct,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum InterfaceElem {
    Method(MethodElem),
    Type(TypeElem),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct MethodElem {
    pub name: Ident,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct PointerType {
    pub star: Punct,
    pub elem: Box<Type>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ParenType {
    pub l_paren: Punct,
    pub ty: Box<Type>,
    pub r_paren: Punct,
}

// =============================================================================
// Signatures and parameters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Signature {
    pub params: Params,
    pub result: Option<SignatureResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum SignatureResult {
    Params(Params),
    Type(Box<Type>),
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct Params {
    pub l_paren: Punct,
    pub params: Vec<ParamDecl>,
    pub r_paren: Punct,
}

impl Params {
    pub fn is_variadic(&self) -> bool {
        self.params.last().is_some_and(|p| p.ellipsis.is_some())
    }
}

/// One group of a parameter list: `a, b int`, `...T`, or a bare type.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct ParamDecl {
    pub idents: Option<IdentList>,
    pub ellipsis: Option<Punct>,
    pub ty: Type,
}

// =============================================================================
// Generics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeParams {
    pub l_brack: Punct,
    pub params: Vec<TypeParamDecl>,
    pub r_brack: Punct,
}

/// `K, V comparable`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeParamDecl {
    pub idents: IdentList,
    pub constraint: TypeElem,
}

/// Union of terms, `~int | ~string | MyType`.
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct TypeElem {
    pub terms: Vec<TypeTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub enum TypeTerm {
    Type(Type),
    Underlying(UnderlyingType),
}

/// `~T`
#[derive(Debug, Clone, PartialEq, Eq, WalkAst)]
pub struct UnderlyingType {
    pub tilde: Operator,
    pub ty: Type,
}
