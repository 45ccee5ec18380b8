use crate::ast::{
    AliasDecl, ConstDecl, ConstSpec, Decl, FuncDecl, GroupSpec, ImportDecl, ImportName,
    ImportSpec, MethodDecl, PackageClause, Spec, SpecType, TypeDecl, TypeDef, TypeSpec, VarDecl,
    VarSpec,
};
use crate::token::Token;

use super::{PResult, Parser, Recovery};

impl Parser<'_> {
    pub(super) fn parse_package_clause(&mut self) -> PResult<PackageClause> {
        let keyword = self.parse_keyword(Token::KwPackage)?;
        let name = self.parse_ident()?;
        self.parse_semicolon()?;
        Ok(PackageClause { keyword, name })
    }

    pub(super) fn parse_imports(&mut self) -> Vec<ImportDecl> {
        let mut imports = Vec::new();
        while self.cursor.at(Token::KwImport) {
            let start = self.cursor.index();
            match self.parse_import_decl() {
                Ok(import) => imports.push(import),
                Err(_) => self.recover(Recovery::Decl, start),
            }
        }
        imports
    }

    pub(super) fn parse_decls(&mut self) -> Vec<Decl> {
        let mut decls = Vec::new();
        while !self.cursor.at_end() {
            let start = self.cursor.index();
            match self.parse_decl() {
                Ok(decl) => decls.push(decl),
                Err(_) => self.recover(Recovery::Decl, start),
            }
        }
        decls
    }

    pub(super) fn parse_import_decl(&mut self) -> PResult<ImportDecl> {
        let keyword = self.parse_keyword(Token::KwImport)?;
        let spec = self.parse_spec(SpecType::Import)?;
        self.parse_semicolon()?;
        self.build(ImportDecl::new(keyword, spec))
    }

    /// Declarations allowed at top level and, except functions, in blocks.
    pub(super) fn parse_decl(&mut self) -> PResult<Decl> {
        let decl = match self.cursor.peek().token {
            Token::KwVar => {
                let keyword = self.parse_keyword(Token::KwVar)?;
                let spec = self.parse_spec(SpecType::Var)?;
                Decl::Var(self.build(VarDecl::new(keyword, spec))?)
            }
            Token::KwConst => {
                let keyword = self.parse_keyword(Token::KwConst)?;
                let spec = self.parse_spec(SpecType::Const)?;
                Decl::Const(self.build(ConstDecl::new(keyword, spec))?)
            }
            Token::KwType => {
                let keyword = self.parse_keyword(Token::KwType)?;
                let spec = self.parse_spec(SpecType::Type)?;
                Decl::Type(self.build(TypeDecl::new(keyword, spec))?)
            }
            Token::KwFunc => self.parse_func_or_method_decl()?,
            tok => return self.error(format!("declaration expected, got {tok}")),
        };
        self.parse_semicolon()?;
        Ok(decl)
    }

    /// A receiver list after `func` makes it a method.
    fn parse_func_or_method_decl(&mut self) -> PResult<Decl> {
        let keyword = self.parse_keyword(Token::KwFunc)?;
        let receiver = if self.cursor.at(Token::LParen) {
            Some(self.parse_params(false)?)
        } else {
            None
        };
        let name = self.parse_ident()?;
        let type_params = if receiver.is_none() && self.cursor.at(Token::LBrack) {
            Some(self.parse_type_params()?)
        } else {
            None
        };
        let signature = self.parse_signature()?;
        let body = if self.cursor.at(Token::LBrace) {
            Some(self.parse_block_stmt()?)
        } else {
            None
        };

        Ok(match receiver {
            Some(receiver) => Decl::Method(MethodDecl {
                keyword,
                receiver,
                name,
                signature,
                body,
            }),
            None => Decl::Func(FuncDecl {
                keyword,
                name,
                type_params,
                signature,
                body,
            }),
        })
    }

    // =========================================================================
    // Specs
    // =========================================================================

    fn parse_spec(&mut self, spec_type: SpecType) -> PResult<Spec> {
        if !self.cursor.at(Token::LParen) {
            return self.parse_single_spec(spec_type, true);
        }

        let l_paren = self.parse_punct(Token::LParen)?;
        let mut specs = Vec::new();
        while !self.cursor.at_any(&[Token::RParen, Token::Eof]) {
            specs.push(self.parse_single_spec(spec_type, specs.is_empty())?);
            self.parse_semicolon()?;
        }
        let r_paren = self.parse_punct(Token::RParen)?;
        let group = self.build(GroupSpec::new(spec_type, l_paren, specs, r_paren))?;
        Ok(Spec::Group(group))
    }

    /// `first` is set for an ungrouped spec and the first spec of a group; only
    /// those must initialize a constant.
    fn parse_single_spec(&mut self, spec_type: SpecType, first: bool) -> PResult<Spec> {
        match spec_type {
            SpecType::Import => self.parse_import_spec().map(Spec::Import),
            SpecType::Const => self.parse_const_spec(first).map(Spec::Const),
            SpecType::Var => self.parse_var_spec().map(Spec::Var),
            SpecType::Type => self.parse_type_spec().map(Spec::Type),
        }
    }

    fn parse_import_spec(&mut self) -> PResult<ImportSpec> {
        let name = match self.cursor.peek().token {
            Token::Ident => self.try_parse_ident().map(ImportName::Ident),
            Token::Dot => self.try_parse_punct(Token::Dot).map(ImportName::Dot),
            _ => None,
        };
        let path = self.parse_string_lit()?;
        Ok(ImportSpec { name, path })
    }

    fn parse_const_spec(&mut self, first: bool) -> PResult<ConstSpec> {
        let idents = self.parse_ident_list()?;
        let ty = self.try_parse_type()?;
        let values = if first || self.cursor.at(Token::Assign) {
            self.expect(Token::Assign)?;
            Some(self.parse_expr_list()?)
        } else {
            None
        };
        Ok(ConstSpec { idents, ty, values })
    }

    fn parse_var_spec(&mut self) -> PResult<VarSpec> {
        let idents = self.parse_ident_list()?;
        let ty = self.try_parse_type()?;
        let values = match self.eat(Token::Assign) {
            Some(_) => Some(self.parse_expr_list()?),
            None => None,
        };
        self.build(VarSpec::new(idents, ty, values))
    }

    fn parse_type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.parse_ident()?;
        if self.cursor.at(Token::Assign) {
            let assign = self.parse_operator(Token::Assign)?;
            let ty = self.parse_type()?;
            return Ok(TypeSpec::Alias(AliasDecl { name, assign, ty }));
        }

        let type_params = if self.at_type_params() {
            Some(self.parse_type_params()?)
        } else {
            None
        };
        let ty = self.parse_type()?;
        Ok(TypeSpec::Def(TypeDef {
            name,
            type_params,
            ty,
        }))
    }

    /// Tells `type A[T any] ...` from array types such as `type A [N]T`,
    /// `type A [N+1]T` and `type A [5]T`. A name followed by something that
    /// can start a constraint, or by a comma, opens a type parameter list.
    fn at_type_params(&self) -> bool {
        self.cursor.at(Token::LBrack)
            && self.cursor.peek_ahead(1).token == Token::Ident
            && matches!(
                self.cursor.peek_ahead(2).token,
                Token::Ident
                    | Token::Comma
                    | Token::Star
                    | Token::Tilde
                    | Token::LBrack
                    | Token::LParen
                    | Token::Arrow
                    | Token::KwFunc
                    | Token::KwMap
                    | Token::KwChan
                    | Token::KwStruct
                    | Token::KwInterface
            )
    }
}
