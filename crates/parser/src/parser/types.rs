use crate::ast::{
    ArrayLen, ArrayType, BasicLit, ChanDir, ChannelType, EmbeddedFieldDecl, FieldDecl, FuncType,
    Ident, IdentList, InterfaceElem, InterfaceType, LitKind, MapType, MethodElem, NamedFieldDecl,
    ParamDecl, Params, ParenType, PointerType, Punct, Signature, SignatureResult, SliceType,
    StructType, Type, TypeArgs, TypeElem, TypeList, TypeName, TypeParamDecl, TypeParams, TypeTerm,
    UnderlyingType,
};
use crate::token::Token;

use super::{PResult, Parser};

/// One comma-separated entry of a parameter list before names and types are
/// told apart.
struct ParamEntry {
    name: Option<Ident>,
    ellipsis: Option<Punct>,
    ty: Option<Type>,
}

const FIELD_END: [Token; 4] = [
    Token::Semi,
    Token::RBrace,
    Token::StringLit,
    Token::RawStringLit,
];

impl Parser<'_> {
    pub(crate) fn parse_type(&mut self) -> PResult<Type> {
        match self.try_parse_type()? {
            Some(ty) => Ok(ty),
            None => {
                let tok = self.cursor.peek().token;
                self.error(format!("type expected, got {tok}"))
            }
        }
    }

    /// `Ok(None)` when the current token cannot start a type.
    pub(crate) fn try_parse_type(&mut self) -> PResult<Option<Type>> {
        self.nested(|p| {
            let ty = match p.cursor.peek().token {
                Token::Ident => Type::Name(p.parse_type_name()?),
                Token::Star => Type::Pointer(PointerType {
                    star: p.parse_punct(Token::Star)?,
                    elem: Box::new(p.parse_type()?),
                }),
                Token::LParen => Type::Paren(p.in_header(false, |p| {
                    Ok(ParenType {
                        l_paren: p.parse_punct(Token::LParen)?,
                        ty: Box::new(p.parse_type()?),
                        r_paren: p.parse_punct(Token::RParen)?,
                    })
                })?),
                Token::KwFunc => Type::Func(p.parse_func_type()?),
                Token::LBrack => p.parse_array_or_slice_type()?,
                Token::KwMap => Type::Map(p.parse_map_type()?),
                Token::KwChan | Token::Arrow => Type::Chan(p.parse_channel_type()?),
                Token::KwStruct => Type::Struct(p.parse_struct_type()?),
                Token::KwInterface => Type::Interface(p.parse_interface_type()?),
                _ => return Ok(None),
            };
            Ok(Some(ty))
        })
    }

    pub(crate) fn parse_type_list(&mut self) -> PResult<TypeList> {
        let mut types = vec![self.parse_type()?];
        while self.eat(Token::Comma).is_some() {
            types.push(self.parse_type()?);
        }
        Ok(TypeList { types })
    }

    /// `Name`, `pkg.Name`, optionally instantiated with `[Args]`.
    pub(crate) fn parse_type_name(&mut self) -> PResult<TypeName> {
        let first = self.parse_ident()?;
        let (package, name) = if self.eat(Token::Dot).is_some() {
            (Some(first), self.parse_ident()?)
        } else {
            (None, first)
        };
        let type_args = if self.cursor.at(Token::LBrack) {
            Some(self.parse_type_args()?)
        } else {
            None
        };
        Ok(TypeName {
            package,
            name,
            type_args,
        })
    }

    pub(crate) fn parse_type_args(&mut self) -> PResult<TypeArgs> {
        self.in_header(false, |p| {
            let l_brack = p.parse_punct(Token::LBrack)?;
            if p.cursor.at(Token::RBrack) {
                return p.error("type arguments cannot be empty");
            }
            let mut types = vec![p.parse_type()?];
            while p.eat(Token::Comma).is_some() && !p.cursor.at(Token::RBrack) {
                types.push(p.parse_type()?);
            }
            let r_brack = p.parse_punct(Token::RBrack)?;
            Ok(TypeArgs {
                l_brack,
                types: TypeList { types },
                r_brack,
            })
        })
    }

    fn parse_array_or_slice_type(&mut self) -> PResult<Type> {
        let l_brack = self.parse_punct(Token::LBrack)?;
        if let Some(r_brack) = self.try_parse_punct(Token::RBrack) {
            return Ok(Type::Slice(SliceType {
                l_brack,
                r_brack,
                elem: Box::new(self.parse_type()?),
            }));
        }

        let len = match self.try_parse_punct(Token::Ellipsis) {
            Some(ellipsis) => ArrayLen::Ellipsis(ellipsis),
            None => ArrayLen::Expr(Box::new(self.in_header(false, Self::parse_expr)?)),
        };
        let r_brack = self.parse_punct(Token::RBrack)?;
        Ok(Type::Array(ArrayType {
            l_brack,
            len,
            r_brack,
            elem: Box::new(self.parse_type()?),
        }))
    }

    fn parse_map_type(&mut self) -> PResult<MapType> {
        Ok(MapType {
            keyword: self.parse_keyword(Token::KwMap)?,
            l_brack: self.parse_punct(Token::LBrack)?,
            key: Box::new(self.parse_type()?),
            r_brack: self.parse_punct(Token::RBrack)?,
            value: Box::new(self.parse_type()?),
        })
    }

    /// `chan T`, `chan<- T`, `<-chan T`.
    fn parse_channel_type(&mut self) -> PResult<ChannelType> {
        if self.cursor.at(Token::Arrow) {
            let arrow = self.parse_operator(Token::Arrow)?;
            let keyword = self.parse_keyword(Token::KwChan)?;
            return Ok(ChannelType {
                dir: ChanDir::Recv,
                keyword,
                arrow: Some(arrow),
                elem: Box::new(self.parse_type()?),
            });
        }

        let keyword = self.parse_keyword(Token::KwChan)?;
        let (dir, arrow) = match self.cursor.peek().token {
            Token::Arrow => (ChanDir::Send, Some(self.parse_operator(Token::Arrow)?)),
            _ => (ChanDir::Both, None),
        };
        Ok(ChannelType {
            dir,
            keyword,
            arrow,
            elem: Box::new(self.parse_type()?),
        })
    }

    pub(crate) fn parse_func_type(&mut self) -> PResult<FuncType> {
        Ok(FuncType {
            keyword: self.parse_keyword(Token::KwFunc)?,
            signature: self.parse_signature()?,
        })
    }

    fn parse_struct_type(&mut self) -> PResult<StructType> {
        let keyword = self.parse_keyword(Token::KwStruct)?;
        let l_brace = self.parse_punct(Token::LBrace)?;
        let mut fields = Vec::new();
        while !self.cursor.at_any(&[Token::RBrace, Token::Eof]) {
            fields.push(self.parse_field_decl()?);
            self.parse_semicolon()?;
        }
        let r_brace = self.parse_punct(Token::RBrace)?;
        Ok(StructType {
            keyword,
            l_brace,
            fields,
            r_brace,
        })
    }

    fn parse_field_decl(&mut self) -> PResult<FieldDecl> {
        let embedded = match self.cursor.peek().token {
            Token::Star => true,
            Token::Ident => match self.cursor.peek_ahead(1).token {
                Token::Dot => true,
                Token::LBrack => self.cursor.check_ahead_after(Token::RBrack, &FIELD_END),
                next => FIELD_END.contains(&next),
            },
            _ => false,
        };

        if embedded {
            let star = self.try_parse_punct(Token::Star);
            let type_name = self.parse_type_name()?;
            let tag = self.try_parse_tag()?;
            return Ok(FieldDecl::Embedded(EmbeddedFieldDecl {
                star,
                type_name,
                tag,
            }));
        }

        let idents = self.parse_ident_list()?;
        let ty = self.parse_type()?;
        let tag = self.try_parse_tag()?;
        Ok(FieldDecl::Named(NamedFieldDecl { idents, ty, tag }))
    }

    fn try_parse_tag(&mut self) -> PResult<Option<BasicLit>> {
        if self.cursor.at_any(&[Token::StringLit, Token::RawStringLit]) {
            self.parse_string_lit().map(Some)
        } else {
            Ok(None)
        }
    }

    fn parse_interface_type(&mut self) -> PResult<InterfaceType> {
        let keyword = self.parse_keyword(Token::KwInterface)?;
        let l_brace = self.parse_punct(Token::LBrace)?;
        let mut elems = Vec::new();
        while !self.cursor.at_any(&[Token::RBrace, Token::Eof]) {
            let elem = if self.cursor.at(Token::Ident)
                && self.cursor.peek_ahead(1).token == Token::LParen
            {
                InterfaceElem::Method(MethodElem {
                    name: self.parse_ident()?,
                    signature: self.parse_signature()?,
                })
            } else {
                InterfaceElem::Type(self.parse_type_elem()?)
            };
            elems.push(elem);
            self.parse_semicolon()?;
        }
        let r_brace = self.parse_punct(Token::RBrace)?;
        Ok(InterfaceType {
            keyword,
            l_brace,
            elems,
            r_brace,
        })
    }

    // =========================================================================
    // Signatures
    // =========================================================================

    pub(crate) fn parse_signature(&mut self) -> PResult<Signature> {
        let params = self.parse_params(true)?;
        let result = if self.cursor.at(Token::LParen) {
            Some(SignatureResult::Params(self.parse_params(false)?))
        } else {
            self.try_parse_type()?
                .map(|ty| SignatureResult::Type(Box::new(ty)))
        };
        Ok(Signature { params, result })
    }

    /// Parameter list in parentheses. `variadic` allows `...` on the final
    /// parameter; receivers and result lists pass `false`.
    pub(crate) fn parse_params(&mut self, variadic: bool) -> PResult<Params> {
        self.in_header(false, |p| {
            let l_paren = p.parse_punct(Token::LParen)?;
            let mut entries = Vec::new();
            while !p.cursor.at_any(&[Token::RParen, Token::Eof]) {
                entries.push(p.parse_param_entry()?);
                if p.eat(Token::Comma).is_none() {
                    break;
                }
            }
            let params = p.resolve_params(entries, variadic)?;
            let r_paren = p.parse_punct(Token::RParen)?;
            Ok(Params {
                l_paren,
                params,
                r_paren,
            })
        })
    }

    fn parse_param_entry(&mut self) -> PResult<ParamEntry> {
        if self.cursor.at(Token::Ident) {
            let named = match self.cursor.peek_ahead(1).token {
                Token::Dot | Token::Comma | Token::RParen => false,
                Token::LBrack => !self
                    .cursor
                    .check_ahead_after(Token::RBrack, &[Token::Comma, Token::RParen]),
                _ => true,
            };
            if named {
                let name = self.parse_ident()?;
                let ellipsis = self.try_parse_punct(Token::Ellipsis);
                let ty = self.parse_type()?;
                return Ok(ParamEntry {
                    name: Some(name),
                    ellipsis,
                    ty: Some(ty),
                });
            }
            if matches!(self.cursor.peek_ahead(1).token, Token::Comma | Token::RParen) {
                return Ok(ParamEntry {
                    name: Some(self.parse_ident()?),
                    ellipsis: None,
                    ty: None,
                });
            }
        }

        let ellipsis = self.try_parse_punct(Token::Ellipsis);
        let ty = self.parse_type()?;
        Ok(ParamEntry {
            name: None,
            ellipsis,
            ty: Some(ty),
        })
    }

    /// Decides between `a, b int, c string` and `int, string` once the whole
    /// list is known: a single `name Type` entry makes every entry named, and
    /// bare names then share the type of the next named entry.
    fn resolve_params(
        &mut self,
        entries: Vec<ParamEntry>,
        variadic: bool,
    ) -> PResult<Vec<ParamDecl>> {
        let last = entries.len().saturating_sub(1);
        for (i, entry) in entries.iter().enumerate() {
            if entry.ellipsis.is_some() && (!variadic || i != last) {
                return self.error("can only use ... with final parameter in list");
            }
        }

        let named = entries.iter().any(|e| e.name.is_some() && e.ty.is_some());
        let mut params = Vec::with_capacity(entries.len());

        if !named {
            for entry in entries {
                let ty = match (entry.ty, entry.name) {
                    (Some(ty), _) => ty,
                    (None, Some(name)) => Type::Name(TypeName {
                        package: None,
                        name,
                        type_args: None,
                    }),
                    (None, None) => continue,
                };
                params.push(ParamDecl {
                    idents: None,
                    ellipsis: entry.ellipsis,
                    ty,
                });
            }
            return Ok(params);
        }

        let mut pending = Vec::new();
        for entry in entries {
            match (entry.name, entry.ty) {
                (Some(name), None) => pending.push(name),
                (Some(name), Some(ty)) => {
                    pending.push(name);
                    params.push(ParamDecl {
                        idents: Some(IdentList {
                            idents: std::mem::take(&mut pending),
                        }),
                        ellipsis: entry.ellipsis,
                        ty,
                    });
                }
                (None, _) => return self.error("mixed named and unnamed parameters"),
            }
        }
        if !pending.is_empty() {
            return self.error("mixed named and unnamed parameters");
        }
        Ok(params)
    }

    // =========================================================================
    // Generics
    // =========================================================================

    pub(crate) fn parse_type_params(&mut self) -> PResult<TypeParams> {
        self.in_header(false, |p| {
            let l_brack = p.parse_punct(Token::LBrack)?;
            let mut params = Vec::new();
            while !p.cursor.at_any(&[Token::RBrack, Token::Eof]) {
                params.push(TypeParamDecl {
                    idents: p.parse_ident_list()?,
                    constraint: p.parse_type_elem()?,
                });
                if p.eat(Token::Comma).is_none() {
                    break;
                }
            }
            if params.is_empty() {
                return p.error("empty type parameter list");
            }
            let r_brack = p.parse_punct(Token::RBrack)?;
            Ok(TypeParams {
                l_brack,
                params,
                r_brack,
            })
        })
    }

    /// `~int | ~string | T`
    pub(crate) fn parse_type_elem(&mut self) -> PResult<TypeElem> {
        let mut terms = vec![self.parse_type_term()?];
        while self.eat(Token::Pipe).is_some() {
            terms.push(self.parse_type_term()?);
        }
        Ok(TypeElem { terms })
    }

    fn parse_type_term(&mut self) -> PResult<TypeTerm> {
        if self.cursor.at(Token::Tilde) {
            let tilde = self.parse_operator(Token::Tilde)?;
            let ty = self.parse_type()?;
            return Ok(TypeTerm::Underlying(UnderlyingType { tilde, ty }));
        }
        Ok(TypeTerm::Type(self.parse_type()?))
    }

    // =========================================================================
    // Shared leaves
    // =========================================================================

    pub(crate) fn parse_ident_list(&mut self) -> PResult<IdentList> {
        let mut idents = vec![self.parse_ident()?];
        while self.eat(Token::Comma).is_some() {
            idents.push(self.parse_ident()?);
        }
        Ok(IdentList { idents })
    }

    pub(crate) fn parse_string_lit(&mut self) -> PResult<BasicLit> {
        let kind = match self.cursor.peek().token {
            Token::StringLit => LitKind::String,
            Token::RawStringLit => LitKind::RawString,
            tok => return self.error(format!("unexpected {tok}, expected string literal")),
        };
        let lexeme = self.cursor.advance();
        Ok(BasicLit {
            pos: lexeme.pos,
            kind,
            raw: lexeme.literal.unwrap_or_default(),
        })
    }
}
