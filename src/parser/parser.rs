//! The declaration parser.
//!
//! A recursive-descent parser for the subset of Java needed for header
//! compilation: compilation units, package and import declarations, type
//! declarations and their members, type syntax, modifiers, and annotations.
//! Method bodies, initializer blocks, and enum-constant bodies are skipped
//! lexically; constant field initializers and annotation defaults are handed
//! to the constant-expression sub-parser.
//!
//! The parser owns the token stream and a one-token cache (`token`,
//! `location`). Sub-parsers share the stream: they receive the cached token
//! and hand their final token back, so the cache stays authoritative.

use crate::ast::{
    Annotation, ArrayType, ClassType, CompUnit, Expr, ExprKind, ImportDecl, Member, MethodDecl,
    Location, Modifiers, PackageDecl, PrimType, Type, TypeDecl, TypeKind, TypeParam, VarDecl,
    VoidType, WildcardType,
};
use crate::parser::const_expr::ConstExpressionParser;
use crate::parser::error::{ParseError, ParseErrorKind, ParseResult};
use crate::parser::initializer::VariableInitializerParser;
use crate::parser::lexer::{SavedToken, Token, TokenStream};
use crate::source::SourceFile;

const CTOR_NAME: &str = "<init>";

const ENUM_CONSTANT_MODIFIERS: Modifiers = Modifiers::PUBLIC
    .union(Modifiers::STATIC)
    .union(Modifiers::FINAL)
    .union(Modifiers::ACC_ENUM);

/// Parse a compilation unit from an anonymous source.
pub fn parse(source: &str) -> ParseResult<CompUnit> {
    parse_source(SourceFile::anonymous(source))
}

/// Parse a compilation unit. On error, no partial tree is returned.
pub fn parse_source(source: SourceFile) -> ParseResult<CompUnit> {
    Parser::new(source)?.compilation_unit()
}

pub struct Parser {
    stream: TokenStream,
    token: Token,
    location: Location,
}

impl Parser {
    pub fn new(source: SourceFile) -> ParseResult<Self> {
        let stream = TokenStream::new(source)?;
        let token = stream.current().token;
        let location = stream.location();
        Ok(Self { stream, token, location })
    }

    /// Parse the whole compilation unit. Consumes the parser: after a
    /// failure the stream is in an unspecified state.
    pub fn compilation_unit(mut self) -> ParseResult<CompUnit> {
        let location = self.location;
        let mut package = None;
        let mut imports = Vec::new();
        let mut type_decls = Vec::new();
        let mut modifiers = Modifiers::empty();
        let mut annotations: Vec<Annotation> = Vec::new();
        loop {
            match self.token {
                Token::Package => {
                    self.advance();
                    package = Some(self.package_declaration(std::mem::take(&mut annotations))?);
                }
                Token::Import => {
                    self.advance();
                    imports.push(self.import_declaration()?);
                }
                Token::Public => {
                    self.advance();
                    modifiers |= Modifiers::PUBLIC;
                }
                Token::Protected => {
                    self.advance();
                    modifiers |= Modifiers::PROTECTED;
                }
                Token::Private => {
                    self.advance();
                    modifiers |= Modifiers::PRIVATE;
                }
                Token::Static => {
                    self.advance();
                    modifiers |= Modifiers::STATIC;
                }
                Token::Abstract => {
                    self.advance();
                    modifiers |= Modifiers::ABSTRACT;
                }
                Token::Final => {
                    self.advance();
                    modifiers |= Modifiers::FINAL;
                }
                Token::Strictfp => {
                    self.advance();
                    modifiers |= Modifiers::STRICTFP;
                }
                Token::At => {
                    self.advance();
                    if self.token == Token::Interface {
                        type_decls.push(self.annotation_declaration(
                            take_modifiers(&mut modifiers),
                            std::mem::take(&mut annotations),
                        )?);
                    } else {
                        annotations.push(self.annotation()?);
                    }
                }
                Token::Class => {
                    type_decls.push(self.class_declaration(
                        take_modifiers(&mut modifiers),
                        std::mem::take(&mut annotations),
                    )?);
                }
                Token::Interface => {
                    type_decls.push(self.interface_declaration(
                        take_modifiers(&mut modifiers),
                        std::mem::take(&mut annotations),
                    )?);
                }
                Token::Enum => {
                    type_decls.push(self.enum_declaration(
                        take_modifiers(&mut modifiers),
                        std::mem::take(&mut annotations),
                    )?);
                }
                // Stray semicolons between declarations are allowed.
                Token::Semicolon => {
                    self.advance();
                }
                // Dangling modifiers or annotations are accepted silently.
                Token::Eof => {
                    return Ok(CompUnit {
                        location,
                        package,
                        imports,
                        type_decls,
                        source: self.stream.source().clone(),
                    });
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    // Token primitives

    fn advance(&mut self) {
        self.token = self.stream.advance();
        self.location = self.stream.location();
    }

    fn consume(&mut self, expected: Token) -> ParseResult<()> {
        if self.token != expected {
            return Err(self.error(ParseErrorKind::ExpectedToken { expected, found: self.token }));
        }
        self.advance();
        Ok(())
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.token == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume_identifier(&mut self) -> ParseResult<String> {
        if self.token != Token::Identifier {
            return Err(self.error(ParseErrorKind::ExpectedToken {
                expected: Token::Identifier,
                found: self.token,
            }));
        }
        let value = self.stream.value().to_string();
        self.advance();
        Ok(value)
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.stream.source().clone(), self.location, kind)
    }

    fn unexpected(&self) -> ParseError {
        let kind = if self.token == Token::Identifier {
            ParseErrorKind::UnexpectedIdentifier { name: self.stream.value().to_string() }
        } else {
            ParseErrorKind::UnexpectedToken { found: self.token }
        };
        self.error(kind)
    }

    // Package and import declarations

    fn package_declaration(&mut self, annotations: Vec<Annotation>) -> ParseResult<PackageDecl> {
        let location = self.location;
        let name = self.qualified_ident()?;
        self.consume(Token::Semicolon)?;
        Ok(PackageDecl { location, name, annotations })
    }

    fn import_declaration(&mut self) -> ParseResult<ImportDecl> {
        let location = self.location;
        let is_static = self.match_token(Token::Static);
        let mut name = vec![self.consume_identifier()?];
        let mut is_wildcard = false;
        while self.match_token(Token::Dot) {
            match self.token {
                Token::Identifier => name.push(self.consume_identifier()?),
                Token::Star => {
                    self.advance();
                    is_wildcard = true;
                    break;
                }
                _ => break,
            }
        }
        self.consume(Token::Semicolon)?;
        Ok(ImportDecl { location, name, is_static, is_wildcard })
    }

    fn qualified_ident(&mut self) -> ParseResult<Vec<String>> {
        let mut name = vec![self.consume_identifier()?];
        while self.match_token(Token::Dot) {
            name.push(self.consume_identifier()?);
        }
        Ok(name)
    }

    // Type declarations

    fn class_declaration(
        &mut self,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
    ) -> ParseResult<TypeDecl> {
        let location = self.location;
        self.consume(Token::Class)?;
        let name = self.consume_identifier()?;
        let type_params =
            if self.token == Token::Lt { self.type_params()? } else { Vec::new() };
        let extends =
            if self.match_token(Token::Extends) { Some(self.class_type()?) } else { None };
        let mut implements = Vec::new();
        if self.match_token(Token::Implements) {
            loop {
                implements.push(self.class_type()?);
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
        }
        self.consume(Token::LBrace)?;
        let members = self.class_members()?;
        self.consume(Token::RBrace)?;
        Ok(TypeDecl {
            location,
            modifiers,
            annotations,
            name,
            type_params,
            extends,
            implements,
            members,
            kind: TypeKind::Class,
        })
    }

    fn interface_declaration(
        &mut self,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
    ) -> ParseResult<TypeDecl> {
        let location = self.location;
        self.consume(Token::Interface)?;
        let name = self.consume_identifier()?;
        let type_params =
            if self.token == Token::Lt { self.type_params()? } else { Vec::new() };
        // An interface's supertypes all land in `implements`.
        let mut implements = Vec::new();
        if self.match_token(Token::Extends) {
            loop {
                implements.push(self.class_type()?);
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
        }
        self.consume(Token::LBrace)?;
        let members = self.class_members()?;
        self.consume(Token::RBrace)?;
        Ok(TypeDecl {
            location,
            modifiers,
            annotations,
            name,
            type_params,
            extends: None,
            implements,
            members,
            kind: TypeKind::Interface,
        })
    }

    fn annotation_declaration(
        &mut self,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
    ) -> ParseResult<TypeDecl> {
        let location = self.location;
        self.consume(Token::Interface)?;
        let name = self.consume_identifier()?;
        self.consume(Token::LBrace)?;
        let members = self.class_members()?;
        self.consume(Token::RBrace)?;
        Ok(TypeDecl {
            location,
            modifiers,
            annotations,
            name,
            type_params: Vec::new(),
            extends: None,
            implements: Vec::new(),
            members,
            kind: TypeKind::Annotation,
        })
    }

    fn enum_declaration(
        &mut self,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
    ) -> ParseResult<TypeDecl> {
        let location = self.location;
        self.consume(Token::Enum)?;
        let name = self.consume_identifier()?;
        let mut implements = Vec::new();
        if self.match_token(Token::Implements) {
            loop {
                implements.push(self.class_type()?);
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
        }
        self.consume(Token::LBrace)?;
        let mut members = self.enum_members(&name)?;
        members.extend(self.class_members()?);
        self.consume(Token::RBrace)?;
        Ok(TypeDecl {
            location,
            modifiers,
            annotations,
            name,
            type_params: Vec::new(),
            extends: None,
            implements,
            members,
            kind: TypeKind::Enum,
        })
    }

    /// The constants section at the head of an enum body. Constructor
    /// argument lists and constant class bodies are skipped, not parsed.
    fn enum_members(&mut self, enum_name: &str) -> ParseResult<Vec<Member>> {
        let mut members = Vec::new();
        let mut annotations: Vec<Annotation> = Vec::new();
        loop {
            match self.token {
                Token::Identifier => {
                    let location = self.location;
                    let name = self.consume_identifier()?;
                    if self.token == Token::LParen {
                        self.drop_parens()?;
                    }
                    let mut modifiers = ENUM_CONSTANT_MODIFIERS;
                    if self.token == Token::LBrace {
                        modifiers |= Modifiers::ENUM_IMPL;
                        self.drop_blocks()?;
                    }
                    self.match_token(Token::Comma);
                    members.push(Member::Field(VarDecl {
                        location,
                        modifiers,
                        annotations: std::mem::take(&mut annotations),
                        ty: Type::Class(ClassType {
                            location,
                            enclosing: None,
                            name: enum_name.to_string(),
                            type_args: Vec::new(),
                            annotations: Vec::new(),
                        }),
                        name,
                        initializer: None,
                    }));
                }
                Token::Semicolon => {
                    self.advance();
                    break;
                }
                Token::RBrace => break,
                Token::At => {
                    self.advance();
                    annotations.push(self.annotation()?);
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(members)
    }

    // Class members

    fn class_members(&mut self) -> ParseResult<Vec<Member>> {
        let mut members = Vec::new();
        let mut modifiers = Modifiers::empty();
        let mut annotations: Vec<Annotation> = Vec::new();
        loop {
            match self.token {
                Token::Public => {
                    self.advance();
                    modifiers |= Modifiers::PUBLIC;
                }
                Token::Protected => {
                    self.advance();
                    modifiers |= Modifiers::PROTECTED;
                }
                Token::Private => {
                    self.advance();
                    modifiers |= Modifiers::PRIVATE;
                }
                Token::Static => {
                    self.advance();
                    modifiers |= Modifiers::STATIC;
                }
                Token::Abstract => {
                    self.advance();
                    modifiers |= Modifiers::ABSTRACT;
                }
                Token::Final => {
                    self.advance();
                    modifiers |= Modifiers::FINAL;
                }
                Token::Native => {
                    self.advance();
                    modifiers |= Modifiers::NATIVE;
                }
                Token::Synchronized => {
                    self.advance();
                    modifiers |= Modifiers::SYNCHRONIZED;
                }
                Token::Transient => {
                    self.advance();
                    modifiers |= Modifiers::TRANSIENT;
                }
                Token::Volatile => {
                    self.advance();
                    modifiers |= Modifiers::VOLATILE;
                }
                Token::Strictfp => {
                    self.advance();
                    modifiers |= Modifiers::STRICTFP;
                }
                Token::Default => {
                    self.advance();
                    modifiers |= Modifiers::DEFAULT;
                }
                Token::At => {
                    self.advance();
                    if self.token == Token::Interface {
                        members.push(Member::Type(self.annotation_declaration(
                            take_modifiers(&mut modifiers),
                            std::mem::take(&mut annotations),
                        )?));
                    } else {
                        annotations.push(self.annotation()?);
                    }
                }
                Token::Identifier
                | Token::Boolean
                | Token::Byte
                | Token::Short
                | Token::Int
                | Token::Long
                | Token::Char
                | Token::Double
                | Token::Float
                | Token::Void
                | Token::Lt => {
                    members.extend(self.class_member(
                        take_modifiers(&mut modifiers),
                        std::mem::take(&mut annotations),
                    )?);
                }
                // Instance or static initializer block: skipped.
                Token::LBrace => {
                    self.drop_blocks()?;
                    modifiers = Modifiers::empty();
                    annotations.clear();
                }
                Token::Class => {
                    members.push(Member::Type(self.class_declaration(
                        take_modifiers(&mut modifiers),
                        std::mem::take(&mut annotations),
                    )?));
                }
                Token::Interface => {
                    members.push(Member::Type(self.interface_declaration(
                        take_modifiers(&mut modifiers),
                        std::mem::take(&mut annotations),
                    )?));
                }
                Token::Enum => {
                    members.push(Member::Type(self.enum_declaration(
                        take_modifiers(&mut modifiers),
                        std::mem::take(&mut annotations),
                    )?));
                }
                Token::RBrace => return Ok(members),
                Token::Semicolon => {
                    self.advance();
                }
                _ => return Err(self.unexpected()),
            }
        }
    }

    /// One member, after modifiers and annotations: disambiguates
    /// constructors, fields, and methods with one token of lookahead.
    fn class_member(
        &mut self,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
    ) -> ParseResult<Vec<Member>> {
        let mut type_params = Vec::new();
        if self.token == Token::Lt {
            type_params = self.type_params()?;
        }

        let type_annotations = self.parse_annotations()?;

        match self.token {
            Token::Void => {
                let location = self.location;
                self.advance();
                let result = Type::Void(VoidType { location, annotations: type_annotations });
                let name = self.consume_identifier()?;
                self.member_rest(location, modifiers, annotations, type_params, result, name)
            }
            Token::Boolean
            | Token::Byte
            | Token::Short
            | Token::Int
            | Token::Long
            | Token::Char
            | Token::Double
            | Token::Float => {
                let location = self.location;
                let result = self.reference_type(type_annotations)?;
                let name = self.consume_identifier()?;
                self.member_rest(location, modifiers, annotations, type_params, result, name)
            }
            Token::Identifier => {
                let location = self.location;
                let ident = self.consume_identifier()?;
                let mut result = match self.token {
                    // `Name(` can only be a constructor.
                    Token::LParen => {
                        return Ok(vec![self.method_rest(
                            location,
                            modifiers,
                            annotations,
                            type_params,
                            None,
                            ident,
                        )?]);
                    }
                    Token::Identifier => {
                        let result = Type::Class(ClassType {
                            location,
                            enclosing: None,
                            name: ident,
                            type_args: Vec::new(),
                            annotations: type_annotations,
                        });
                        let name = self.consume_identifier()?;
                        return self.member_rest(
                            location,
                            modifiers,
                            annotations,
                            type_params,
                            result,
                            name,
                        );
                    }
                    // C-style array dimensions after the type, with optional
                    // type annotations on each dimension.
                    Token::At | Token::LBracket => {
                        let mut result = Type::Class(ClassType {
                            location,
                            enclosing: None,
                            name: ident,
                            type_args: Vec::new(),
                            annotations: type_annotations,
                        });
                        let mut dim_annotations = self.parse_annotations()?;
                        self.consume(Token::LBracket)?;
                        loop {
                            result = Type::Array(ArrayType {
                                location,
                                annotations: dim_annotations,
                                element: Box::new(result),
                            });
                            self.consume(Token::RBracket)?;
                            dim_annotations = self.parse_annotations()?;
                            if !self.match_token(Token::LBracket) {
                                break;
                            }
                        }
                        result
                    }
                    Token::Lt => {
                        let type_args = self.type_args()?;
                        let mut result = Type::Class(ClassType {
                            location,
                            enclosing: None,
                            name: ident,
                            type_args,
                            annotations: type_annotations.clone(),
                        });
                        while self.match_token(Token::LBracket) {
                            self.consume(Token::RBracket)?;
                            result = Type::Array(ArrayType {
                                location,
                                annotations: type_annotations.clone(),
                                element: Box::new(result),
                            });
                        }
                        result
                    }
                    Token::Dot => Type::Class(ClassType {
                        location,
                        enclosing: None,
                        name: ident,
                        type_args: Vec::new(),
                        annotations: type_annotations,
                    }),
                    _ => return Err(self.unexpected()),
                };
                if self.match_token(Token::Dot) {
                    let enclosing = match result {
                        Type::Class(class_type) => class_type,
                        _ => return Err(self.unexpected()),
                    };
                    result = Type::Class(self.class_type_with(Some(enclosing))?);
                    while self.match_token(Token::LBracket) {
                        self.consume(Token::RBracket)?;
                        result = Type::Array(ArrayType {
                            location,
                            annotations: Vec::new(),
                            element: Box::new(result),
                        });
                    }
                }
                let name = self.consume_identifier()?;
                match self.token {
                    Token::LParen => Ok(vec![self.method_rest(
                        location,
                        modifiers,
                        annotations,
                        type_params,
                        Some(result),
                        name,
                    )?]),
                    Token::LBracket | Token::Semicolon | Token::Assign | Token::Comma => {
                        if !type_params.is_empty() {
                            return Err(self.generic_field_error(&type_params));
                        }
                        self.field_rest(location, modifiers, annotations, result, name)
                    }
                    _ => Err(self.unexpected()),
                }
            }
            _ => Err(self.unexpected()),
        }
    }

    fn member_rest(
        &mut self,
        location: Location,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        type_params: Vec<TypeParam>,
        result: Type,
        name: String,
    ) -> ParseResult<Vec<Member>> {
        match self.token {
            Token::Assign | Token::Semicolon | Token::LBracket | Token::Comma => {
                if !type_params.is_empty() {
                    return Err(self.generic_field_error(&type_params));
                }
                self.field_rest(location, modifiers, annotations, result, name)
            }
            Token::LParen => Ok(vec![self.method_rest(
                location,
                modifiers,
                annotations,
                type_params,
                Some(result),
                name,
            )?]),
            _ => Err(self.unexpected()),
        }
    }

    fn generic_field_error(&self, type_params: &[TypeParam]) -> ParseError {
        self.error(ParseErrorKind::GenericField {
            names: type_params.iter().map(|param| param.name.clone()).collect(),
        })
    }

    /// The tail of a field declaration, possibly covering several
    /// declarators. The splitter yields one token slice per declarator;
    /// extra `[]` pairs apply to that declarator only, and initializers that
    /// parse as array initializers are dropped.
    fn field_rest(
        &mut self,
        location: Location,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        base_ty: Type,
        name: String,
    ) -> ParseResult<Vec<Member>> {
        let slices = {
            let mut splitter =
                VariableInitializerParser::new(&mut self.stream, self.token, self.location);
            let slices = splitter.parse_initializers()?;
            self.token = splitter.token;
            self.location = splitter.location;
            slices
        };

        let mut members = Vec::new();
        let mut name = name;
        let mut first = true;
        for slice in slices {
            let mut tokens = slice.into_iter();

            if first {
                first = false;
            } else {
                match tokens.next() {
                    Some(saved) if saved.token == Token::Identifier => {
                        name = saved.value().to_string();
                    }
                    Some(saved) => {
                        return Err(self.error(ParseErrorKind::MalformedDeclarator {
                            found: saved.token,
                        }));
                    }
                    None => {
                        return Err(self.error(ParseErrorKind::MalformedDeclarator {
                            found: self.token,
                        }));
                    }
                }
            }

            let mut ty = base_ty.clone();
            if let Some(mut next) = tokens.next() {
                while next.token == Token::LBracket {
                    ty = Type::Array(ArrayType {
                        location: next.location,
                        annotations: Vec::new(),
                        element: Box::new(ty),
                    });
                    match tokens.next() {
                        Some(saved) if saved.token == Token::RBracket => {}
                        Some(saved) => {
                            return Err(self.error(ParseErrorKind::MalformedDeclarator {
                                found: saved.token,
                            }));
                        }
                        None => {
                            return Err(self.error(ParseErrorKind::MalformedDeclarator {
                                found: self.token,
                            }));
                        }
                    }
                    match tokens.next() {
                        Some(saved) => next = saved,
                        None => break,
                    }
                }
            }

            // Whatever remains of the slice is the initializer; replay it
            // through the constant-expression parser on its own stream.
            let rest: Vec<SavedToken> = tokens.collect();
            let mut replay = TokenStream::from_saved(self.stream.source().clone(), rest);
            let mut initializer = ConstExpressionParser::from_start(&mut replay).expression();
            if matches!(&initializer, Some(expr) if expr.kind() == ExprKind::ArrayInit) {
                initializer = None;
            }

            members.push(Member::Field(VarDecl {
                location,
                modifiers,
                annotations: annotations.clone(),
                ty,
                name: name.clone(),
                initializer,
            }));
        }
        self.consume(Token::Semicolon)?;
        Ok(members)
    }

    fn method_rest(
        &mut self,
        location: Location,
        modifiers: Modifiers,
        annotations: Vec<Annotation>,
        type_params: Vec<TypeParam>,
        result: Option<Type>,
        name: String,
    ) -> ParseResult<Member> {
        let mut modifiers = modifiers;
        self.consume(Token::LParen)?;
        let mut params = Vec::new();
        self.formal_params(&mut params, &mut modifiers)?;
        self.consume(Token::RParen)?;

        // C-style array dimensions after the parameter list apply to the
        // return type.
        let mut result = result;
        if self.token == Token::LBracket {
            if result.is_none() {
                return Err(self.unexpected());
            }
            while self.match_token(Token::LBracket) {
                self.consume(Token::RBracket)?;
                result = result.map(|ty| {
                    Type::Array(ArrayType {
                        location: ty.location(),
                        annotations: Vec::new(),
                        element: Box::new(ty),
                    })
                });
            }
        }

        let mut throws = Vec::new();
        if self.token == Token::Throws {
            self.advance();
            throws = self.exceptions()?;
        }

        let mut default_value = None;
        match self.token {
            Token::Semicolon => self.advance(),
            Token::LBrace => self.drop_blocks()?,
            Token::Default => {
                // Annotation-type element default value.
                self.advance();
                let mut expr = {
                    let mut sub =
                        ConstExpressionParser::new(&mut self.stream, self.token, self.location);
                    let expr = sub.expression();
                    self.token = sub.token;
                    self.location = sub.location;
                    expr
                };
                if expr.is_none() && self.token == Token::At {
                    self.advance();
                    expr = Some(Expr::Annotation(self.annotation()?));
                }
                match expr {
                    Some(expr) => default_value = Some(expr),
                    None => return Err(self.unexpected()),
                }
                self.consume(Token::Semicolon)?;
            }
            _ => return Err(self.unexpected()),
        }

        let name = if result.is_none() { CTOR_NAME.to_string() } else { name };
        Ok(Member::Method(MethodDecl {
            location,
            modifiers,
            annotations,
            type_params,
            return_type: result,
            name,
            params,
            throws,
            default_value,
        }))
    }

    fn exceptions(&mut self) -> ParseResult<Vec<ClassType>> {
        let mut exceptions = vec![self.class_type()?];
        while self.match_token(Token::Comma) {
            exceptions.push(self.class_type()?);
        }
        Ok(exceptions)
    }

    // Formal parameters

    fn formal_params(
        &mut self,
        params: &mut Vec<VarDecl>,
        method_modifiers: &mut Modifiers,
    ) -> ParseResult<()> {
        while self.token != Token::RParen {
            let formal = self.formal_param()?;
            if formal.modifiers.contains(Modifiers::VARARGS) {
                *method_modifiers |= Modifiers::VARARGS;
            }
            params.push(formal);
            if self.token != Token::Comma {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    fn formal_param(&mut self) -> ParseResult<VarDecl> {
        let location = self.location;
        let mut annotations = Vec::new();
        let mut modifiers = self.modifiers(&mut annotations)?;
        let leading = self.parse_annotations()?;
        let mut ty = self.reference_type(leading)?;
        let mut type_annotations = self.parse_annotations()?;
        if self.match_token(Token::Ellipsis) {
            modifiers |= Modifiers::VARARGS;
            ty = Type::Array(ArrayType {
                location: ty.location(),
                annotations: type_annotations.clone(),
                element: Box::new(ty),
            });
        }
        while self.token == Token::LBracket {
            self.consume(Token::LBracket)?;
            self.consume(Token::RBracket)?;
            ty = Type::Array(ArrayType {
                location: ty.location(),
                annotations: type_annotations.clone(),
                element: Box::new(ty),
            });
            type_annotations = self.parse_annotations()?;
        }
        // The name is `this` for receiver parameters; a qualified
        // `Outer.this` keeps only the final `this`.
        let mut name = self.ident_or_this()?;
        while self.token == Token::Dot {
            self.consume(Token::Dot)?;
            name = self.ident_or_this()?;
        }
        Ok(VarDecl { location, modifiers, annotations, ty, name, initializer: None })
    }

    fn ident_or_this(&mut self) -> ParseResult<String> {
        match self.token {
            Token::Identifier => self.consume_identifier(),
            Token::This => {
                self.advance();
                Ok("this".to_string())
            }
            _ => Err(self.unexpected()),
        }
    }

    fn modifiers(&mut self, annotations: &mut Vec<Annotation>) -> ParseResult<Modifiers> {
        let mut modifiers = Modifiers::empty();
        loop {
            match self.token {
                Token::Public => {
                    self.advance();
                    modifiers |= Modifiers::PUBLIC;
                }
                Token::Protected => {
                    self.advance();
                    modifiers |= Modifiers::PROTECTED;
                }
                Token::Private => {
                    self.advance();
                    modifiers |= Modifiers::PRIVATE;
                }
                Token::Static => {
                    self.advance();
                    modifiers |= Modifiers::STATIC;
                }
                Token::Abstract => {
                    self.advance();
                    modifiers |= Modifiers::ABSTRACT;
                }
                Token::Final => {
                    self.advance();
                    modifiers |= Modifiers::FINAL;
                }
                Token::Native => {
                    self.advance();
                    modifiers |= Modifiers::NATIVE;
                }
                Token::Synchronized => {
                    self.advance();
                    modifiers |= Modifiers::SYNCHRONIZED;
                }
                Token::Transient => {
                    self.advance();
                    modifiers |= Modifiers::TRANSIENT;
                }
                Token::Volatile => {
                    self.advance();
                    modifiers |= Modifiers::VOLATILE;
                }
                Token::Strictfp => {
                    self.advance();
                    modifiers |= Modifiers::STRICTFP;
                }
                Token::At => {
                    self.advance();
                    annotations.push(self.annotation()?);
                }
                _ => return Ok(modifiers),
            }
        }
    }

    // Lexical skipping

    fn drop_parens(&mut self) -> ParseResult<()> {
        self.consume(Token::LParen)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.token {
                Token::RParen => depth -= 1,
                Token::LParen => depth += 1,
                Token::Eof => {
                    return Err(self.error(ParseErrorKind::ExpectedToken {
                        expected: Token::RParen,
                        found: Token::Eof,
                    }));
                }
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    fn drop_blocks(&mut self) -> ParseResult<()> {
        self.consume(Token::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.token {
                Token::RBrace => depth -= 1,
                Token::LBrace => depth += 1,
                Token::Eof => {
                    return Err(self.error(ParseErrorKind::ExpectedToken {
                        expected: Token::RBrace,
                        found: Token::Eof,
                    }));
                }
                _ => {}
            }
            self.advance();
        }
        Ok(())
    }

    // Type syntax

    fn type_params(&mut self) -> ParseResult<Vec<TypeParam>> {
        self.consume(Token::Lt)?;
        let mut params = Vec::new();
        loop {
            let location = self.location;
            let annotations = self.parse_annotations()?;
            let name = self.consume_identifier()?;
            let bounds =
                if self.match_token(Token::Extends) { self.type_bounds()? } else { Vec::new() };
            params.push(TypeParam { location, name, bounds, annotations });
            match self.token {
                Token::Comma => self.advance(),
                Token::Gt => {
                    self.advance();
                    break;
                }
                _ => return Err(self.unexpected()),
            }
        }
        Ok(params)
    }

    fn type_bounds(&mut self) -> ParseResult<Vec<Type>> {
        let mut bounds = Vec::new();
        loop {
            bounds.push(Type::Class(self.class_type()?));
            if !self.match_token(Token::Amp) {
                break;
            }
        }
        Ok(bounds)
    }

    fn class_type(&mut self) -> ParseResult<ClassType> {
        self.class_type_with(None)
    }

    fn class_type_with(&mut self, enclosing: Option<ClassType>) -> ParseResult<ClassType> {
        let annotations = self.parse_annotations()?;
        self.class_type_annotated(enclosing, annotations)
    }

    /// A dot-separated chain of simple names, each with optional type
    /// arguments. Qualification folds left.
    fn class_type_annotated(
        &mut self,
        enclosing: Option<ClassType>,
        annotations: Vec<Annotation>,
    ) -> ParseResult<ClassType> {
        let location = self.location;
        let name = self.consume_identifier()?;
        let type_args = if self.token == Token::Lt { self.type_args()? } else { Vec::new() };
        let mut ty = ClassType {
            location,
            enclosing: enclosing.map(Box::new),
            name,
            type_args,
            annotations: annotations.clone(),
        };
        while self.match_token(Token::Dot) {
            let name = self.consume_identifier()?;
            let type_args = if self.token == Token::Lt { self.type_args()? } else { Vec::new() };
            ty = ClassType {
                location,
                enclosing: Some(Box::new(ty)),
                name,
                type_args,
                annotations: annotations.clone(),
            };
        }
        Ok(ty)
    }

    fn type_args(&mut self) -> ParseResult<Vec<Type>> {
        self.consume(Token::Lt)?;
        let mut args = Vec::new();
        loop {
            let type_annotations = self.parse_annotations()?;
            match self.token {
                Token::Question => {
                    let location = self.location;
                    self.advance();
                    match self.token {
                        Token::Extends => {
                            self.advance();
                            let bound_annotations = self.parse_annotations()?;
                            let upper = self.reference_type(bound_annotations)?;
                            args.push(Type::Wildcard(WildcardType {
                                location,
                                annotations: type_annotations,
                                upper: Some(Box::new(upper)),
                                lower: None,
                            }));
                        }
                        Token::Super => {
                            self.advance();
                            let bound_annotations = self.parse_annotations()?;
                            let lower = self.reference_type(bound_annotations)?;
                            args.push(Type::Wildcard(WildcardType {
                                location,
                                annotations: type_annotations,
                                upper: None,
                                lower: Some(Box::new(lower)),
                            }));
                        }
                        Token::Comma | Token::Gt | Token::RShift | Token::URShift => {
                            args.push(Type::Wildcard(WildcardType {
                                location,
                                annotations: type_annotations,
                                upper: None,
                                lower: None,
                            }));
                        }
                        _ => return Err(self.unexpected()),
                    }
                }
                Token::Identifier
                | Token::Boolean
                | Token::Byte
                | Token::Short
                | Token::Int
                | Token::Long
                | Token::Char
                | Token::Double
                | Token::Float => {
                    args.push(self.reference_type(type_annotations)?);
                }
                _ => return Err(self.unexpected()),
            }
            if !self.match_token(Token::Comma) {
                break;
            }
        }
        // The angle-bracket merge rule: a `>>` or `>>>` terminator is
        // rewritten in place so the enclosing context sees the remaining
        // close angles. The stream is not advanced.
        match self.token {
            Token::Gt => self.advance(),
            Token::RShift => self.token = Token::Gt,
            Token::URShift => self.token = Token::RShift,
            _ => return Err(self.unexpected()),
        }
        Ok(args)
    }

    /// A primitive or class type followed by any number of `[]` pairs.
    fn reference_type(&mut self, annotations: Vec<Annotation>) -> ParseResult<Type> {
        let location = self.location;
        let mut ty = match self.token {
            Token::Identifier => {
                Type::Class(self.class_type_annotated(None, annotations.clone())?)
            }
            _ => match self.token.primitive() {
                Some(kind) => {
                    self.advance();
                    Type::Primitive(PrimType { location, annotations: annotations.clone(), kind })
                }
                None => return Err(self.unexpected()),
            },
        };
        while self.match_token(Token::LBracket) {
            self.consume(Token::RBracket)?;
            ty = Type::Array(ArrayType {
                location,
                annotations: annotations.clone(),
                element: Box::new(ty),
            });
        }
        Ok(ty)
    }

    // Annotations

    fn parse_annotations(&mut self) -> ParseResult<Vec<Annotation>> {
        let mut annotations = Vec::new();
        while self.token == Token::At {
            self.advance();
            annotations.push(self.annotation()?);
        }
        Ok(annotations)
    }

    /// An annotation whose `@` has already been consumed. Argument
    /// expressions are parsed by the constant-expression sub-parser on the
    /// shared stream.
    fn annotation(&mut self) -> ParseResult<Annotation> {
        let location = self.location;
        let name = self.qualified_ident()?;
        let mut args = Vec::new();
        if self.token == Token::LParen {
            self.consume(Token::LParen)?;
            while self.token != Token::RParen {
                let arg = {
                    let mut sub =
                        ConstExpressionParser::new(&mut self.stream, self.token, self.location);
                    let arg = sub.expression();
                    self.token = sub.token;
                    self.location = sub.location;
                    arg
                };
                match arg {
                    Some(arg) => args.push(arg),
                    None => return Err(self.unexpected()),
                }
                if !self.match_token(Token::Comma) {
                    break;
                }
            }
            self.consume(Token::RParen)?;
        }
        Ok(Annotation { location, name, args })
    }
}

fn take_modifiers(modifiers: &mut Modifiers) -> Modifiers {
    std::mem::replace(modifiers, Modifiers::empty())
}
