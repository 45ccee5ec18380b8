use crate::ast::{
    AssertedType, AssignmentStmt, Binding, BindingList, BlockStmt, BreakStmt, CallExpr,
    CaseClause, CaseLabel, CommCase, ContinueStmt, DefaultCase, DeferStmt, ElseBody, EmptyStmt,
    Expr, ExprList, ExprStmt, ExprSwitchCase, ExprSwitchStmt, FallthroughStmt, ForClause, ForStmt,
    GoStmt, GotoStmt, GuardBinding, IdentList, IfStmt, IncDecStmt, Iteration, Keyword,
    LabeledStmt, RangeClause, RecvStmt, ReturnStmt, SelectStmt, SendStmt, ShortVarDecl,
    SimpleStmt, Stmt, StmtList, SwitchStmt, TypeSwitchCase, TypeSwitchGuard, TypeSwitchStmt,
};
use crate::token::Token;

use super::{PResult, Parser, Recovery};

/// Parses the label of one `case` kind; selects the clause flavour of
/// [`Parser::parse_case_clauses`].
pub(crate) trait CaseLabelParser: Sized {
    fn parse_label(p: &mut Parser<'_>, keyword: Keyword) -> PResult<Self>;
}

impl CaseLabelParser for ExprSwitchCase {
    fn parse_label(p: &mut Parser<'_>, keyword: Keyword) -> PResult<Self> {
        Ok(ExprSwitchCase {
            keyword,
            exprs: p.parse_expr_list()?,
        })
    }
}

impl CaseLabelParser for TypeSwitchCase {
    fn parse_label(p: &mut Parser<'_>, keyword: Keyword) -> PResult<Self> {
        Ok(TypeSwitchCase {
            keyword,
            types: p.parse_type_list()?,
        })
    }
}

impl CaseLabelParser for CommCase {
    fn parse_label(p: &mut Parser<'_>, keyword: Keyword) -> PResult<Self> {
        let stmt = p.parse_send_or_recv()?;
        p.build(CommCase::new(keyword, stmt))
    }
}

/// Header of a `switch` before its body is parsed.
enum SwitchHeader {
    Expr(Option<Expr>),
    Type(TypeSwitchGuard),
}

impl Parser<'_> {
    pub(crate) fn parse_block_stmt(&mut self) -> PResult<BlockStmt> {
        self.nested(|p| {
            p.in_header(false, |p| {
                Ok(BlockStmt {
                    l_brace: p.parse_punct(Token::LBrace)?,
                    stmts: p.parse_stmt_list(),
                    r_brace: p.parse_punct(Token::RBrace)?,
                })
            })
        })
    }

    /// Statements up to the closing `}` or the next case label. Failed
    /// statements are dropped after recovery.
    fn parse_stmt_list(&mut self) -> StmtList {
        let mut stmts = Vec::new();
        while !self.cursor.at_any(&[Token::KwCase, Token::KwDefault, Token::RBrace, Token::Eof]) {
            let start = self.cursor.index();
            match self.nested(Self::parse_stmt) {
                Ok(stmt) => stmts.push(stmt),
                Err(_) => self.recover(Recovery::Stmt, start),
            }
        }
        StmtList { stmts }
    }

    fn parse_stmt(&mut self) -> PResult<Stmt> {
        let stmt = match self.cursor.peek().token {
            Token::KwVar | Token::KwConst | Token::KwType => return self.parse_decl().map(Stmt::Decl),

            Token::LBrace => Stmt::Block(self.parse_block_stmt()?),
            Token::KwIf => Stmt::If(self.parse_if_stmt()?),
            Token::KwFor => Stmt::For(self.parse_for_stmt()?),
            Token::KwSwitch => Stmt::Switch(self.parse_switch_stmt()?),
            Token::KwSelect => Stmt::Select(self.parse_select_stmt()?),

            Token::KwGo => {
                let keyword = self.parse_keyword(Token::KwGo)?;
                Stmt::Go(GoStmt {
                    keyword,
                    call: self.parse_call_expr()?,
                })
            }
            Token::KwDefer => {
                let keyword = self.parse_keyword(Token::KwDefer)?;
                Stmt::Defer(DeferStmt {
                    keyword,
                    call: self.parse_call_expr()?,
                })
            }
            Token::KwReturn => {
                let keyword = self.parse_keyword(Token::KwReturn)?;
                let results = if self.cursor.at_any(&[Token::Semi, Token::RBrace]) {
                    None
                } else {
                    Some(self.parse_expr_list()?)
                };
                Stmt::Return(ReturnStmt { keyword, results })
            }
            Token::KwGoto => Stmt::Goto(GotoStmt {
                keyword: self.parse_keyword(Token::KwGoto)?,
                label: self.parse_ident()?,
            }),
            Token::KwBreak => Stmt::Break(BreakStmt {
                keyword: self.parse_keyword(Token::KwBreak)?,
                label: self.try_parse_ident(),
            }),
            Token::KwContinue => Stmt::Continue(ContinueStmt {
                keyword: self.parse_keyword(Token::KwContinue)?,
                label: self.try_parse_ident(),
            }),
            Token::KwFallthrough => Stmt::Fallthrough(FallthroughStmt {
                keyword: self.parse_keyword(Token::KwFallthrough)?,
            }),

            Token::Semi => {
                let pos = self.cursor.advance().pos;
                return Ok(Stmt::Simple(SimpleStmt::Empty(EmptyStmt { pos })));
            }

            Token::Ident
            | Token::IntLit
            | Token::FloatLit
            | Token::ImagLit
            | Token::RuneLit
            | Token::StringLit
            | Token::RawStringLit
            | Token::Plus
            | Token::Minus
            | Token::Bang
            | Token::Caret
            | Token::Star
            | Token::Amp
            | Token::Arrow
            | Token::KwFunc
            | Token::LParen
            | Token::LBrack
            | Token::KwStruct
            | Token::KwMap
            | Token::KwChan
            | Token::KwInterface => {
                let exprs = self.parse_expr_list()?;
                if self.cursor.at(Token::Colon) {
                    return self.parse_labeled_stmt(exprs).map(Stmt::Labeled);
                }
                Stmt::Simple(self.finish_simple_stmt(exprs)?)
            }

            tok => return self.error(format!("unrecognised statement {tok}")),
        };
        self.parse_semicolon()?;
        Ok(stmt)
    }

    fn parse_labeled_stmt(&mut self, exprs: ExprList) -> PResult<LabeledStmt> {
        let mut exprs = exprs.exprs.into_iter();
        let label = match (exprs.next(), exprs.next()) {
            (Some(Expr::Ident(label)), None) => label,
            _ => return self.error("label expected"),
        };
        let colon = self.parse_punct(Token::Colon)?;
        let stmt = if self.cursor.at(Token::RBrace) {
            Stmt::Simple(SimpleStmt::Empty(EmptyStmt {
                pos: self.cursor.pos(),
            }))
        } else {
            self.nested(Self::parse_stmt)?
        };
        Ok(LabeledStmt {
            label,
            colon,
            stmt: Box::new(stmt),
        })
    }

    /// Simple statement without its terminator, as found in headers.
    fn parse_simple_stmt(&mut self) -> PResult<SimpleStmt> {
        let exprs = self.parse_expr_list()?;
        self.finish_simple_stmt(exprs)
    }

    /// Decides the statement kind from what follows the leading expressions.
    fn finish_simple_stmt(&mut self, lhs: ExprList) -> PResult<SimpleStmt> {
        let tok = self.cursor.peek().token;
        if tok == Token::Define {
            let Ok(idents) = IdentList::from_expr_list(lhs) else {
                return self.error("non-name on left side of \":=\"");
            };
            return Ok(SimpleStmt::ShortVarDecl(ShortVarDecl {
                idents,
                define: self.parse_operator(Token::Define)?,
                values: self.parse_expr_list()?,
            }));
        }
        if tok.is_assign_op() {
            return Ok(SimpleStmt::Assignment(AssignmentStmt {
                lhs,
                op: self.parse_any_operator(),
                rhs: self.parse_expr_list()?,
            }));
        }

        let expr = self.single_expr(lhs)?;
        Ok(match tok {
            Token::Inc | Token::Dec => SimpleStmt::IncDec(IncDecStmt {
                expr,
                op: self.parse_any_operator(),
            }),
            Token::Arrow => SimpleStmt::Send(SendStmt {
                channel: expr,
                arrow: self.parse_operator(Token::Arrow)?,
                value: self.parse_expr()?,
            }),
            _ => SimpleStmt::Expr(ExprStmt { expr }),
        })
    }

    fn single_expr(&mut self, list: ExprList) -> PResult<Expr> {
        let mut exprs = list.exprs.into_iter();
        match (exprs.next(), exprs.next()) {
            (Some(expr), None) => Ok(expr),
            _ => self.error("expected single expression instead of an expression list"),
        }
    }

    fn parse_call_expr(&mut self) -> PResult<CallExpr> {
        match self.parse_expr()? {
            Expr::Call(call) => Ok(call),
            _ => self.error("call expression expected"),
        }
    }

    /// `[init;] stmt` of an `if` or `switch` header, both parsed as simple
    /// statements. Without a `;` the lone statement is returned second.
    fn parse_header_stmts(&mut self) -> PResult<(Option<SimpleStmt>, Option<SimpleStmt>)> {
        let first = if self.cursor.at_any(&[Token::Semi, Token::LBrace]) {
            None
        } else {
            Some(self.parse_simple_stmt()?)
        };
        if self.eat(Token::Semi).is_none() {
            return Ok((None, first));
        }
        let second = if self.cursor.at(Token::LBrace) {
            None
        } else {
            Some(self.parse_simple_stmt()?)
        };
        Ok((first, second))
    }

    fn header_expr(&mut self, stmt: SimpleStmt, what: &str) -> PResult<Expr> {
        match stmt {
            SimpleStmt::Expr(ExprStmt { expr }) => Ok(expr),
            _ => self.error(format!("{what} must be an expression")),
        }
    }

    // =========================================================================
    // if / for
    // =========================================================================

    fn parse_if_stmt(&mut self) -> PResult<IfStmt> {
        let keyword = self.parse_keyword(Token::KwIf)?;
        let (init, cond) = self.in_header(true, |p| {
            let (init, cond) = p.parse_header_stmts()?;
            let Some(cond) = cond else {
                return p.error("missing condition in if statement");
            };
            Ok((init, p.header_expr(cond, "if condition")?))
        })?;
        let body = self.parse_block_stmt()?;

        let (else_keyword, else_body) = match self.eat(Token::KwElse) {
            Some(lexeme) => {
                let else_keyword = Keyword {
                    pos: lexeme.pos,
                    token: Token::KwElse,
                };
                let else_body = match self.cursor.peek().token {
                    Token::KwIf => ElseBody::If(Box::new(self.nested(Self::parse_if_stmt)?)),
                    Token::LBrace => ElseBody::Block(self.parse_block_stmt()?),
                    _ => return self.error("malformed else branch"),
                };
                (Some(else_keyword), Some(else_body))
            }
            None => (None, None),
        };

        self.build(IfStmt::new(keyword, init, cond, body, else_keyword, else_body))
    }

    /// `for {}`, `for cond {}`, `for init; cond; post {}` and the range forms.
    fn parse_for_stmt(&mut self) -> PResult<ForStmt> {
        let keyword = self.parse_keyword(Token::KwFor)?;
        let iteration = self.in_header(true, |p| {
            if p.cursor.at(Token::LBrace) {
                return Ok(None);
            }
            if p.cursor.check_ahead_till(Token::LBrace, &[Token::KwRange]) {
                return p.parse_range_clause().map(|r| Some(Iteration::Range(r)));
            }
            let init = if p.cursor.at(Token::Semi) {
                None
            } else {
                Some(p.parse_simple_stmt()?)
            };
            match init {
                Some(cond) if !p.cursor.at(Token::Semi) => {
                    let cond = p.header_expr(cond, "for condition")?;
                    Ok(Some(Iteration::Cond(cond)))
                }
                init => p.parse_for_clause(init).map(|c| Some(Iteration::Clause(c))),
            }
        })?;
        let body = self.parse_block_stmt()?;
        Ok(ForStmt {
            keyword,
            iteration,
            body,
        })
    }

    /// Rest of `init; cond; post` once `init` has been read.
    fn parse_for_clause(&mut self, init: Option<SimpleStmt>) -> PResult<ForClause> {
        self.expect(Token::Semi)?;
        let cond = if self.cursor.at(Token::Semi) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(Token::Semi)?;
        let post = if self.cursor.at(Token::LBrace) {
            None
        } else {
            Some(self.parse_simple_stmt()?)
        };
        Ok(ForClause { init, cond, post })
    }

    fn parse_range_clause(&mut self) -> PResult<RangeClause> {
        let (list, op) = if self.cursor.at(Token::KwRange) {
            (None, None)
        } else if self.cursor.check_ahead_till(Token::KwRange, &[Token::Define]) {
            let idents = self.parse_ident_list()?;
            let op = self.parse_operator(Token::Define)?;
            (Some(BindingList::Idents(idents)), Some(op))
        } else {
            let exprs = self.parse_expr_list()?;
            let op = self.parse_operator(Token::Assign)?;
            (Some(BindingList::Exprs(exprs)), Some(op))
        };
        let keyword = self.parse_keyword(Token::KwRange)?;
        let expr = self.parse_expr()?;
        self.build(RangeClause::new(list, op, keyword, expr))
    }

    // =========================================================================
    // switch / select
    // =========================================================================

    fn parse_switch_stmt(&mut self) -> PResult<SwitchStmt> {
        let keyword = self.parse_keyword(Token::KwSwitch)?;
        let (init, header) = self.in_header(true, |p| {
            let (init, tag) = p.parse_header_stmts()?;
            let header = match tag {
                None => SwitchHeader::Expr(None),
                Some(SimpleStmt::Expr(ExprStmt { expr })) if is_type_guard(&expr) => {
                    SwitchHeader::Type(TypeSwitchGuard {
                        binding: None,
                        expr,
                    })
                }
                Some(SimpleStmt::ShortVarDecl(decl)) => {
                    SwitchHeader::Type(p.bound_type_switch_guard(decl)?)
                }
                Some(tag) => SwitchHeader::Expr(Some(p.header_expr(tag, "switch tag")?)),
            };
            Ok((init, header))
        })?;

        let l_brace = self.parse_punct(Token::LBrace)?;
        Ok(match header {
            SwitchHeader::Expr(tag) => SwitchStmt::Expr(ExprSwitchStmt {
                keyword,
                init,
                tag,
                l_brace,
                clauses: self.parse_case_clauses()?,
                r_brace: self.parse_punct(Token::RBrace)?,
            }),
            SwitchHeader::Type(guard) => SwitchStmt::Type(TypeSwitchStmt {
                keyword,
                init,
                guard,
                l_brace,
                clauses: self.parse_case_clauses()?,
                r_brace: self.parse_punct(Token::RBrace)?,
            }),
        })
    }

    /// `v := x.(type)`, read first as a short variable declaration.
    fn bound_type_switch_guard(&mut self, decl: ShortVarDecl) -> PResult<TypeSwitchGuard> {
        let mut idents = decl.idents.idents.into_iter();
        let mut values = decl.values.exprs.into_iter();
        match (idents.next(), idents.next(), values.next(), values.next()) {
            (Some(ident), None, Some(expr), None) if is_type_guard(&expr) => Ok(TypeSwitchGuard {
                binding: Some(GuardBinding {
                    ident,
                    define: decl.define,
                }),
                expr,
            }),
            _ => self.error("type switch guard expected"),
        }
    }

    fn parse_select_stmt(&mut self) -> PResult<SelectStmt> {
        Ok(SelectStmt {
            keyword: self.parse_keyword(Token::KwSelect)?,
            l_brace: self.parse_punct(Token::LBrace)?,
            clauses: self.parse_case_clauses()?,
            r_brace: self.parse_punct(Token::RBrace)?,
        })
    }

    fn parse_case_clauses<L: CaseLabelParser>(&mut self) -> PResult<Vec<CaseClause<L>>> {
        let mut clauses = Vec::new();
        while !self.cursor.at_any(&[Token::RBrace, Token::Eof]) {
            let label = match self.cursor.peek().token {
                Token::KwCase => {
                    let keyword = self.parse_keyword(Token::KwCase)?;
                    CaseLabel::Case(L::parse_label(self, keyword)?)
                }
                Token::KwDefault => CaseLabel::Default(DefaultCase {
                    keyword: self.parse_keyword(Token::KwDefault)?,
                }),
                tok => return self.error(format!("case expected, got {tok}")),
            };
            let colon = self.parse_punct(Token::Colon)?;
            let body = self.parse_stmt_list();
            clauses.push(CaseClause { label, colon, body });
        }
        Ok(clauses)
    }

    /// Statement of a select case: `ch <- v`, `<-ch`, `v = <-ch`, `v, ok := <-ch`.
    fn parse_send_or_recv(&mut self) -> PResult<SimpleStmt> {
        let binding = if self.cursor.check_ahead_till(Token::Colon, &[Token::Assign]) {
            let exprs = self.parse_expr_list()?;
            let op = self.parse_operator(Token::Assign)?;
            Some(Binding {
                list: BindingList::Exprs(exprs),
                op,
            })
        } else if self.cursor.check_ahead_till(Token::Colon, &[Token::Define]) {
            let idents = self.parse_ident_list()?;
            let op = self.parse_operator(Token::Define)?;
            Some(Binding {
                list: BindingList::Idents(idents),
                op,
            })
        } else {
            None
        };

        let expr = self.parse_expr()?;
        if binding.is_none() && self.cursor.at(Token::Arrow) {
            return Ok(SimpleStmt::Send(SendStmt {
                channel: expr,
                arrow: self.parse_operator(Token::Arrow)?,
                value: self.parse_expr()?,
            }));
        }
        Ok(SimpleStmt::Recv(RecvStmt { binding, expr }))
    }
}

/// `x.(type)`
fn is_type_guard(expr: &Expr) -> bool {
    matches!(expr, Expr::TypeAssertion(assert) if matches!(assert.ty, AssertedType::TypeKeyword(_)))
}
