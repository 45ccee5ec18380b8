use crate::ast::{
    AssertedType, BasicLit, BinaryExpr, CallExpr, CompositeLit, ElementList, Expr, ExprList,
    FullSliceExpr, FuncLit, GroupExpr, IndexExpr, InstantiationExpr, KeyedElement, LitKind,
    ParenType, PointerType, Punct, SelectorExpr, SimpleSliceExpr, SliceExpr, Type,
    TypeAssertionExpr, TypeArgs, TypeList, TypeName, UnaryExpr,
};
use crate::token::{Precedence, Token};

use super::{PResult, Parser};

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> PResult<Expr> {
        self.parse_binary_expr(Precedence::Or)
    }

    pub(crate) fn parse_expr_list(&mut self) -> PResult<ExprList> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(Token::Comma).is_some() {
            exprs.push(self.parse_expr()?);
        }
        Ok(ExprList { exprs })
    }

    /// Precedence climbing: operators binding at least as tightly as `min`
    /// fold to the left, the right operand climbs one level.
    fn parse_binary_expr(&mut self, min: Precedence) -> PResult<Expr> {
        let mut left = self.parse_unary_expr()?;
        loop {
            let prec = self.cursor.peek().token.precedence();
            if prec == Precedence::None || prec < min {
                return Ok(left);
            }
            let op = self.parse_any_operator();
            let right = self.parse_binary_expr(prec.next())?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
    }

    fn parse_unary_expr(&mut self) -> PResult<Expr> {
        self.nested(|p| {
            if p.cursor.peek().token.is_unary_op() {
                let op = p.parse_any_operator();
                let expr = p.parse_unary_expr()?;
                return Ok(Expr::Unary(UnaryExpr {
                    op,
                    expr: Box::new(expr),
                }));
            }
            p.parse_primary_expr()
        })
    }

    /// Operand followed by any number of index, slice, call, composite
    /// literal, selector and type assertion suffixes.
    pub(crate) fn parse_primary_expr(&mut self) -> PResult<Expr> {
        let mut expr = self.parse_operand()?;
        loop {
            expr = match self.cursor.peek().token {
                Token::LBrack => self.parse_index_or_slice(expr)?,
                Token::LParen => Expr::Call(self.parse_call(expr)?),
                Token::LBrace if self.allows_composite_lit(&expr) => {
                    let Some(ty) = type_from_expr(expr) else {
                        return self.error("composite literal type expected");
                    };
                    Expr::CompositeLit(self.parse_literal_value(Some(Box::new(ty)))?)
                }
                Token::Dot => self.parse_selector_or_assertion(expr)?,
                _ => return Ok(expr),
            };
        }
    }

    fn parse_operand(&mut self) -> PResult<Expr> {
        let kind = match self.cursor.peek().token {
            Token::IntLit => LitKind::Int,
            Token::FloatLit => LitKind::Float,
            Token::ImagLit => LitKind::Imag,
            Token::RuneLit => LitKind::Rune,
            Token::StringLit => LitKind::String,
            Token::RawStringLit => LitKind::RawString,
            Token::Ident => return self.parse_ident().map(Expr::Ident),
            Token::LParen => {
                return self.in_header(false, |p| {
                    Ok(Expr::Group(GroupExpr {
                        l_paren: p.parse_punct(Token::LParen)?,
                        expr: Box::new(p.parse_expr()?),
                        r_paren: p.parse_punct(Token::RParen)?,
                    }))
                })
            }
            Token::KwFunc => {
                let ty = self.parse_func_type()?;
                if !self.cursor.at(Token::LBrace) {
                    return Ok(Expr::Type(Type::Func(ty)));
                }
                let body = self.in_header(false, Self::parse_block_stmt)?;
                return Ok(Expr::FuncLit(FuncLit { ty, body }));
            }
            tok => {
                return match self.try_parse_type()? {
                    Some(ty) => Ok(Expr::Type(ty)),
                    None => self.error(format!("unexpected {tok} in operand expression")),
                }
            }
        };
        let lexeme = self.cursor.advance();
        Ok(Expr::BasicLit(BasicLit {
            pos: lexeme.pos,
            kind,
            raw: lexeme.literal.unwrap_or_default(),
        }))
    }

    /// A `{` after an expression opens a composite literal only when the
    /// expression denotes a type. Named types are ambiguous with the body of a
    /// control-flow statement and are not taken inside its header.
    fn allows_composite_lit(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Type(_) => true,
            Expr::Ident(_) | Expr::Selector(_) | Expr::Instantiation(_) | Expr::Index(_) => {
                !self.cf_header
            }
            _ => false,
        }
    }

    /// `{ elem, key: elem, ... }`; `ty` is `None` for elided nested literals.
    fn parse_literal_value(&mut self, ty: Option<Box<Type>>) -> PResult<CompositeLit> {
        self.nested(|p| {
            p.in_header(false, |p| {
                let l_brace = p.parse_punct(Token::LBrace)?;
                let mut elements = Vec::new();
                while !p.cursor.at_any(&[Token::RBrace, Token::Eof]) {
                    let first = p.parse_element()?;
                    let element = match p.try_parse_punct(Token::Colon) {
                        Some(colon) => {
                            let value = p.parse_element()?;
                            KeyedElement::new(Some(first), Some(colon), value)
                        }
                        None => KeyedElement::new(None, None, first),
                    };
                    elements.push(p.build(element)?);

                    if p.eat(Token::Comma).is_none() {
                        if !p.cursor.at(Token::RBrace) {
                            return p.error("comma expected in element list");
                        }
                        break;
                    }
                }
                let r_brace = p.parse_punct(Token::RBrace)?;
                Ok(CompositeLit {
                    ty,
                    l_brace,
                    elements: ElementList { elements },
                    r_brace,
                })
            })
        })
    }

    fn parse_element(&mut self) -> PResult<Expr> {
        if self.cursor.at(Token::LBrace) {
            self.parse_literal_value(None).map(Expr::CompositeLit)
        } else {
            self.parse_expr()
        }
    }

    /// Call arguments. `make` and `new` take a type first.
    fn parse_call(&mut self, func: Expr) -> PResult<CallExpr> {
        let type_first = matches!(&func, Expr::Ident(id) if id.name == "make" || id.name == "new");
        self.in_header(false, move |p| {
            let l_paren = p.parse_punct(Token::LParen)?;
            let mut args = Vec::new();
            let mut ellipsis = None;
            while !p.cursor.at_any(&[Token::RParen, Token::Eof]) {
                let arg = if type_first && args.is_empty() {
                    Expr::Type(p.parse_type()?)
                } else {
                    p.parse_expr()?
                };
                args.push(arg);

                if let Some(dots) = p.try_parse_punct(Token::Ellipsis) {
                    ellipsis = Some(dots);
                    p.eat(Token::Comma);
                    break;
                }
                if p.eat(Token::Comma).is_none() {
                    if !p.cursor.at(Token::RParen) {
                        return p.error("comma expected in argument list");
                    }
                    break;
                }
            }
            let r_paren = p.parse_punct(Token::RParen)?;
            Ok(CallExpr {
                func: Box::new(func),
                l_paren,
                args: ExprList { exprs: args },
                ellipsis,
                r_paren,
            })
        })
    }

    /// `a[i]`, `a[lo:hi]`, `a[lo:hi:max]`, `F[T]` or `Pair[K, V]`.
    fn parse_index_or_slice(&mut self, expr: Expr) -> PResult<Expr> {
        self.in_header(false, move |p| {
            let l_brack = p.parse_punct(Token::LBrack)?;
            if p.cursor.at(Token::Colon) {
                return p.finish_slice(expr, l_brack, None);
            }

            let first = p.parse_expr()?;
            match p.cursor.peek().token {
                Token::Colon => p.finish_slice(expr, l_brack, Some(first)),
                Token::Comma => {
                    let mut args = vec![first];
                    while p.eat(Token::Comma).is_some() && !p.cursor.at(Token::RBrack) {
                        args.push(p.parse_expr()?);
                    }
                    let r_brack = p.parse_punct(Token::RBrack)?;
                    let Some(types) = args.into_iter().map(type_from_expr).collect::<Option<Vec<_>>>() else {
                        return p.error("type argument expected");
                    };
                    Ok(instantiate(expr, l_brack, types, r_brack))
                }
                _ => {
                    let r_brack = p.parse_punct(Token::RBrack)?;
                    Ok(match first {
                        Expr::Type(ty) => instantiate(expr, l_brack, vec![ty], r_brack),
                        index => Expr::Index(IndexExpr {
                            expr: Box::new(expr),
                            l_brack,
                            index: Box::new(index),
                            r_brack,
                        }),
                    })
                }
            }
        })
    }

    fn finish_slice(&mut self, expr: Expr, l_brack: Punct, low: Option<Expr>) -> PResult<Expr> {
        let colon = self.parse_punct(Token::Colon)?;
        let high = if self.cursor.at_any(&[Token::Colon, Token::RBrack]) {
            None
        } else {
            Some(self.parse_expr()?)
        };

        let Some(second_colon) = self.try_parse_punct(Token::Colon) else {
            let r_brack = self.parse_punct(Token::RBrack)?;
            return Ok(Expr::Slice(SliceExpr::Simple(SimpleSliceExpr {
                expr: Box::new(expr),
                l_brack,
                low: low.map(Box::new),
                colon,
                high: high.map(Box::new),
                r_brack,
            })));
        };

        let Some(high) = high else {
            return self.error("middle index required in 3-index slice");
        };
        if self.cursor.at(Token::RBrack) {
            return self.error("final index required in 3-index slice");
        }
        let max = self.parse_expr()?;
        let r_brack = self.parse_punct(Token::RBrack)?;
        Ok(Expr::Slice(SliceExpr::Full(FullSliceExpr {
            expr: Box::new(expr),
            l_brack,
            low: low.map(Box::new),
            first_colon: colon,
            high: Box::new(high),
            second_colon,
            max: Box::new(max),
            r_brack,
        })))
    }

    fn parse_selector_or_assertion(&mut self, expr: Expr) -> PResult<Expr> {
        let dot = self.parse_punct(Token::Dot)?;
        match self.cursor.peek().token {
            Token::Ident => Ok(Expr::Selector(SelectorExpr {
                expr: Box::new(expr),
                dot,
                selector: self.parse_ident()?,
            })),
            Token::LParen => self.in_header(false, move |p| {
                let l_paren = p.parse_punct(Token::LParen)?;
                let ty = if p.cursor.at(Token::KwType) {
                    AssertedType::TypeKeyword(p.parse_keyword(Token::KwType)?)
                } else {
                    AssertedType::Type(p.parse_type()?)
                };
                let r_paren = p.parse_punct(Token::RParen)?;
                Ok(Expr::TypeAssertion(TypeAssertionExpr {
                    expr: Box::new(expr),
                    dot,
                    l_paren,
                    ty,
                    r_paren,
                }))
            }),
            tok => self.error(format!("expected selector or type assertion, got {tok}")),
        }
    }
}

fn instantiate(expr: Expr, l_brack: Punct, types: Vec<Type>, r_brack: Punct) -> Expr {
    Expr::Instantiation(InstantiationExpr {
        expr: Box::new(expr),
        type_args: TypeArgs {
            l_brack,
            types: TypeList { types },
            r_brack,
        },
    })
}

/// Reads an expression that was parsed before it was known to denote a type.
pub(crate) fn type_from_expr(expr: Expr) -> Option<Type> {
    match expr {
        Expr::Type(ty) => Some(ty),
        Expr::Ident(name) => Some(Type::Name(TypeName {
            package: None,
            name,
            type_args: None,
        })),
        Expr::Selector(sel) => match *sel.expr {
            Expr::Ident(package) => Some(Type::Name(TypeName {
                package: Some(package),
                name: sel.selector,
                type_args: None,
            })),
            _ => None,
        },
        Expr::Index(index) => {
            let arg = type_from_expr(*index.index)?;
            with_type_args(
                *index.expr,
                TypeArgs {
                    l_brack: index.l_brack,
                    types: TypeList { types: vec![arg] },
                    r_brack: index.r_brack,
                },
            )
        }
        Expr::Instantiation(inst) => with_type_args(*inst.expr, inst.type_args),
        Expr::Unary(unary) if unary.op.token == Token::Star => {
            Some(Type::Pointer(PointerType {
                star: Punct {
                    pos: unary.op.pos,
                    token: Token::Star,
                },
                elem: Box::new(type_from_expr(*unary.expr)?),
            }))
        }
        Expr::Group(group) => Some(Type::Paren(ParenType {
            l_paren: group.l_paren,
            ty: Box::new(type_from_expr(*group.expr)?),
            r_paren: group.r_paren,
        })),
        _ => None,
    }
}

fn with_type_args(base: Expr, type_args: TypeArgs) -> Option<Type> {
    match type_from_expr(base)? {
        Type::Name(name) if name.type_args.is_none() => Some(Type::Name(TypeName {
            type_args: Some(type_args),
            ..name
        })),
        _ => None,
    }
}
