//! The parser's core machinery (spec.md §4.3): token navigation, error
//! recovery, declaration-specifier resolution, and struct/union/enum
//! definitions. The expression, statement, and top-level-declaration grammars
//! live in `expr.rs`, `stmt.rs`, and `decl.rs` as further `impl Parser`
//! blocks, mirroring the teacher's practice of splitting one large stateful
//! struct's behavior across files by concern.

use c2js_common::diagnostics::DiagnosticKind;
use c2js_common::interner::Atom;
use c2js_common::session::CompilerSession;
use c2js_common::span::Span;
use c2js_lexer::{Keyword, Lexer, Punct, Token, TokenKind};
use c2js_symtab::{StorageClass, SymbolKind, SymbolTable};
use c2js_types::{layout::RawMember, Qualifiers, TypeId, TypeKind, TypeRegistry};

use crate::ast::Ast;
use crate::declarator::{Declarator, DeclaratorCore, DeclaratorSuffix, DirectDeclarator, ParamDecl};

/// Declaration specifiers resolved from the bag of keywords spec.md §4.3
/// describes (storage class, qualifiers, `inline`, type specifier).
pub struct DeclSpec {
    pub ty: TypeId,
    pub storage: StorageClass,
    pub qualifiers: Qualifiers,
    pub inline: bool,
    pub is_typedef: bool,
    /// True when no type specifier appeared at all and `ty` defaulted to
    /// `int` (pre-C99 "implicit int"); `c2js-sema` warns on this for a
    /// function definition's return type.
    pub implicit_int: bool,
}

pub struct Parser {
    lexer: Lexer,
    cur: Token,
    pub(crate) ast: Ast,
    pub(crate) symtab: SymbolTable,
    pub(crate) types: TypeRegistry,
}

pub struct ParseOutput {
    pub ast: Ast,
    pub symtab: SymbolTable,
    pub types: TypeRegistry,
}

impl Parser {
    pub fn new(session: &mut CompilerSession, text: &str, file: Atom) -> Self {
        let mut lexer = Lexer::new(text, file);
        let cur = lexer.bump(session);
        Parser {
            lexer,
            cur,
            ast: Ast::new(),
            symtab: SymbolTable::new(),
            types: TypeRegistry::new(),
        }
    }

    pub fn into_output(self) -> ParseOutput {
        ParseOutput {
            ast: self.ast,
            symtab: self.symtab,
            types: self.types,
        }
    }

    // ---- token navigation -----------------------------------------------

    pub(crate) fn cur_kind(&self) -> &TokenKind {
        &self.cur.kind
    }

    pub(crate) fn cur_span(&self) -> Span {
        self.cur.span
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.cur.is_eof()
    }

    pub(crate) fn at_punct(&self, p: Punct) -> bool {
        matches!(self.cur_kind(), TokenKind::Punct(q) if *q == p)
    }

    pub(crate) fn at_keyword(&self, k: Keyword) -> bool {
        matches!(self.cur_kind(), TokenKind::Keyword(q) if *q == k)
    }

    pub(crate) fn cur_ident(&self) -> Option<Atom> {
        match self.cur_kind() {
            TokenKind::Ident(a) => Some(*a),
            _ => None,
        }
    }

    /// One token of lookahead beyond `cur`, for the handful of grammar
    /// points that need it (identifier-colon label detection, `(void)`
    /// versus `(void *p)`, spec.md §4.3).
    pub(crate) fn peek2(&mut self, session: &mut CompilerSession) -> TokenKind {
        self.lexer.peek(session).kind
    }

    pub(crate) fn bump(&mut self, session: &mut CompilerSession) -> Token {
        let next = self.lexer.bump(session);
        std::mem::replace(&mut self.cur, next)
    }

    pub(crate) fn eat_punct(&mut self, session: &mut CompilerSession, p: Punct) -> bool {
        if self.at_punct(p) {
            self.bump(session);
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_keyword(&mut self, session: &mut CompilerSession, k: Keyword) -> bool {
        if self.at_keyword(k) {
            self.bump(session);
            true
        } else {
            false
        }
    }

    pub(crate) fn error_at(&self, session: &mut CompilerSession, span: Span, message: impl Into<String>) {
        self.error_at_kind(session, DiagnosticKind::Parse, span, message);
    }

    /// Like [`Parser::error_at`] but for the handful of sites (spec.md §4.4's
    /// check list) that are classified as type/semantic errors even though
    /// they're unavoidably detected during parsing, such as an identifier
    /// that must resolve to a `SymbolId` to build an `Ident` node at all.
    pub(crate) fn error_at_kind(
        &self,
        session: &mut CompilerSession,
        kind: DiagnosticKind,
        span: Span,
        message: impl Into<String>,
    ) {
        let loc = self.lexer.location_for(span);
        session.diagnostics.error(kind, loc, message);
    }

    pub(crate) fn expect_punct(&mut self, session: &mut CompilerSession, p: Punct) -> bool {
        if self.eat_punct(session, p) {
            true
        } else {
            let span = self.cur_span();
            let found = format!("{:?}", self.cur_kind());
            self.error_at(session, span, format!("expected {p:?}, found {found}"));
            false
        }
    }

    /// Skip tokens until `;`, `}`, or end of file (spec.md §4.3's diagnostics
    /// policy). Consumes a trailing `;`; leaves a `}` unconsumed so the
    /// enclosing block parser can still close out.
    pub(crate) fn synchronize(&mut self, session: &mut CompilerSession) {
        loop {
            if self.at_eof() || self.at_punct(Punct::RBrace) {
                return;
            }
            if self.at_punct(Punct::Semicolon) {
                self.bump(session);
                return;
            }
            self.bump(session);
        }
    }

    // ---- declaration specifiers -------------------------------------------

    fn is_typedef_name(&self, name: Atom) -> bool {
        self.symtab
            .lookup(name)
            .map(|id| self.symtab.get(id).kind == SymbolKind::Typedef)
            .unwrap_or(false)
    }

    /// True if `cur` can begin a declaration-specifier list (a storage
    /// class, qualifier, primitive keyword, `struct`/`union`/`enum`, or a
    /// typedef name) — used both to decide "is this a declaration" and to
    /// drive the specifier bag loop itself.
    pub(crate) fn starts_decl_specifiers(&self) -> bool {
        match self.cur_kind() {
            TokenKind::Keyword(k) => matches!(
                k,
                Keyword::Typedef
                    | Keyword::Extern
                    | Keyword::Static
                    | Keyword::Auto
                    | Keyword::Register
                    | Keyword::Const
                    | Keyword::Volatile
                    | Keyword::Restrict
                    | Keyword::Inline
                    | Keyword::Void
                    | Keyword::Bool
                    | Keyword::Char
                    | Keyword::Short
                    | Keyword::Int
                    | Keyword::Long
                    | Keyword::Float
                    | Keyword::Double
                    | Keyword::Signed
                    | Keyword::Unsigned
                    | Keyword::Struct
                    | Keyword::Union
                    | Keyword::Enum
            ),
            TokenKind::Ident(a) => self.is_typedef_name(*a),
            _ => false,
        }
    }

    pub(crate) fn parse_decl_specifiers(&mut self, session: &mut CompilerSession) -> DeclSpec {
        let mut storage = StorageClass::None;
        let mut qualifiers = Qualifiers::empty();
        let mut inline = false;
        let mut is_typedef = false;

        // Primitive-type bookkeeping: count how many `long`/`signed`/
        // `unsigned`/`short`/`int`/`char`/`double` keywords were seen so the
        // bag can be resolved once the specifier run ends (spec.md §4.3).
        let mut saw_void = false;
        let mut saw_bool = false;
        let mut saw_char = false;
        let mut saw_short = false;
        let mut saw_int = false;
        let mut long_count = 0u32;
        let mut saw_float = false;
        let mut saw_double = false;
        let mut saw_unsigned = false;
        let mut tagged_ty: Option<TypeId> = None;
        let mut typedef_ty: Option<TypeId> = None;

        loop {
            match self.cur_kind() {
                TokenKind::Keyword(Keyword::Typedef) => {
                    is_typedef = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Extern) => {
                    storage = StorageClass::Extern;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Static) => {
                    storage = StorageClass::Static;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Auto) => {
                    storage = StorageClass::Auto;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Register) => {
                    storage = StorageClass::Register;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Const) => {
                    qualifiers |= Qualifiers::CONST;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Volatile) => {
                    qualifiers |= Qualifiers::VOLATILE;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Restrict) => {
                    qualifiers |= Qualifiers::RESTRICT;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Inline) => {
                    inline = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Void) => {
                    saw_void = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Bool) => {
                    saw_bool = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Char) => {
                    saw_char = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Short) => {
                    saw_short = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Int) => {
                    saw_int = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Long) => {
                    long_count += 1;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Float) => {
                    saw_float = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Double) => {
                    saw_double = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Signed) => {
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Unsigned) => {
                    saw_unsigned = true;
                    self.bump(session);
                }
                TokenKind::Keyword(Keyword::Struct) => {
                    tagged_ty = Some(self.parse_struct_or_union(session, false));
                }
                TokenKind::Keyword(Keyword::Union) => {
                    tagged_ty = Some(self.parse_struct_or_union(session, true));
                }
                TokenKind::Keyword(Keyword::Enum) => {
                    tagged_ty = Some(self.parse_enum(session));
                }
                TokenKind::Ident(a)
                    if typedef_ty.is_none() && tagged_ty.is_none() && self.is_typedef_name(*a) =>
                {
                    let name = *a;
                    let id = self.symtab.lookup(name).expect("checked by is_typedef_name");
                    typedef_ty = Some(self.symtab.get(id).ty);
                    self.bump(session);
                }
                _ => break,
            }
        }

        let mut implicit_int = false;
        let ty = if let Some(t) = tagged_ty {
            t
        } else if let Some(t) = typedef_ty {
            t
        } else if saw_void {
            self.types.void()
        } else if saw_bool {
            self.types.bool_()
        } else if saw_char {
            self.types.char_(!saw_unsigned)
        } else if saw_short {
            self.types.short(!saw_unsigned)
        } else if long_count >= 2 {
            self.types.long_long(!saw_unsigned)
        } else if long_count == 1 && saw_double {
            self.types.long_double()
        } else if long_count == 1 {
            self.types.long(!saw_unsigned)
        } else if saw_double {
            self.types.double()
        } else if saw_float {
            self.types.float()
        } else if saw_int || saw_unsigned {
            self.types.int(!saw_unsigned)
        } else {
            // Pre-C99 "implicit int": a storage-class/qualifier keyword with
            // no type specifier at all (e.g. `static foo(void) { ... }`)
            // defaults to `int` rather than erroring; `c2js-sema` warns on
            // this when it is a function definition's return type.
            implicit_int = true;
            self.types.int(true)
        };

        let ty = if qualifiers.is_empty() { ty } else { self.types.qualified(ty, qualifiers) };

        DeclSpec {
            ty,
            storage,
            qualifiers,
            inline,
            is_typedef,
            implicit_int,
        }
    }

    // ---- declarators -------------------------------------------------------

    pub(crate) fn parse_declarator(&mut self, session: &mut CompilerSession) -> Declarator {
        let pointers = self.parse_pointer_quals(session);
        let direct = self.parse_direct_declarator(session);
        Declarator { pointers, direct }
    }

    fn parse_pointer_quals(&mut self, session: &mut CompilerSession) -> Vec<Qualifiers> {
        let mut out = Vec::new();
        while self.eat_punct(session, Punct::Star) {
            let mut q = Qualifiers::empty();
            loop {
                if self.eat_keyword(session, Keyword::Const) {
                    q |= Qualifiers::CONST;
                } else if self.eat_keyword(session, Keyword::Volatile) {
                    q |= Qualifiers::VOLATILE;
                } else if self.eat_keyword(session, Keyword::Restrict) {
                    q |= Qualifiers::RESTRICT;
                } else {
                    break;
                }
            }
            out.push(q);
        }
        out
    }

    fn parse_direct_declarator(&mut self, session: &mut CompilerSession) -> DirectDeclarator {
        let core = if self.eat_punct(session, Punct::LParen) {
            let inner = self.parse_declarator(session);
            self.expect_punct(session, Punct::RParen);
            DeclaratorCore::Grouped(Box::new(inner))
        } else if let Some(name) = self.cur_ident() {
            let span = self.cur_span();
            self.bump(session);
            DeclaratorCore::Name(Some(name), span)
        } else {
            DeclaratorCore::Name(None, self.cur_span())
        };

        let mut suffixes = Vec::new();
        loop {
            if self.eat_punct(session, Punct::LBracket) {
                let (size, vla_size) = if self.at_punct(Punct::RBracket) {
                    (None, None)
                } else {
                    match self.parse_array_size(session) {
                        Ok(n) => (Some(n), None),
                        Err(node) => (None, Some(node.index())),
                    }
                };
                self.expect_punct(session, Punct::RBracket);
                suffixes.push(DeclaratorSuffix::Array { size, vla_size });
            } else if self.eat_punct(session, Punct::LParen) {
                let (params, variadic, old_style_kr) = self.parse_param_list(session);
                self.expect_punct(session, Punct::RParen);
                suffixes.push(DeclaratorSuffix::Function { params, variadic, old_style_kr });
            } else {
                break;
            }
        }
        DirectDeclarator { core, suffixes }
    }

    fn parse_param_list(&mut self, session: &mut CompilerSession) -> (Vec<ParamDecl>, bool, bool) {
        let params = Vec::new();
        if self.at_keyword(Keyword::Void) {
            // Lookahead distinguishes `(void)` (no parameters) from
            // `(void *p)` (a parameter of type `void *`).
            let next = self.peek2(session);
            if matches!(next, TokenKind::Punct(Punct::RParen)) {
                self.bump(session);
                return (params, false, false);
            }
        }
        if self.at_punct(Punct::RParen) {
            // An empty parameter list with no `void`: old-style K&R
            // declarator, parameter types unknown (GLOSSARY).
            return (params, false, true);
        }
        self.parse_param_list_nonempty(session, params)
    }

    fn parse_param_list_nonempty(
        &mut self,
        session: &mut CompilerSession,
        mut params: Vec<ParamDecl>,
    ) -> (Vec<ParamDecl>, bool, bool) {
        loop {
            if self.eat_punct(session, Punct::Ellipsis) {
                return (params, true, false);
            }
            let spec = self.parse_decl_specifiers(session);
            let span_start = self.cur_span();
            let (name, ty, span) = if self.at_punct(Punct::Comma) || self.at_punct(Punct::RParen) {
                (None, spec.ty, span_start)
            } else {
                let declarator = self.parse_declarator(session);
                let (ty, name, span) = crate::declarator::resolve(&mut self.types, spec.ty, &declarator);
                (name, ty, span)
            };
            params.push(ParamDecl { name, ty, span });
            if !self.eat_punct(session, Punct::Comma) {
                break;
            }
        }
        (params, false, false)
    }

    /// A type name for casts, `sizeof`, and compound literals: declaration
    /// specifiers followed by an abstract declarator (spec.md §4.3).
    pub(crate) fn parse_type_name(&mut self, session: &mut CompilerSession) -> TypeId {
        let spec = self.parse_decl_specifiers(session);
        let declarator = self.parse_declarator(session);
        let (ty, _name, _span) = crate::declarator::resolve(&mut self.types, spec.ty, &declarator);
        ty
    }

    // ---- struct / union / enum ---------------------------------------------

    pub(crate) fn parse_struct_or_union(&mut self, session: &mut CompilerSession, is_union: bool) -> TypeId {
        self.bump(session); // `struct` / `union`
        let tag = self.cur_ident();
        if tag.is_some() {
            self.bump(session);
        }

        if !self.at_punct(Punct::LBrace) {
            // A reference to a tag, not a definition: reuse an existing type
            // in scope, or forward-declare a fresh incomplete one.
            return match tag.and_then(|t| self.symtab.lookup_tag(t)) {
                Some(ty) => ty,
                None => {
                    let ty = if is_union { self.types.new_union(tag) } else { self.types.new_struct(tag) };
                    if let Some(t) = tag {
                        self.symtab.declare_tag(t, ty);
                    }
                    ty
                }
            };
        }

        // A definition always introduces a fresh type per I-T2, unless this
        // is completing a forward declaration already in the *current* scope.
        let ty = match tag.and_then(|t| self.symtab.lookup_tag_in_current_scope(t)) {
            Some(existing) => existing,
            None => {
                let fresh = if is_union { self.types.new_union(tag) } else { self.types.new_struct(tag) };
                if let Some(t) = tag {
                    self.symtab.declare_tag(t, fresh);
                }
                fresh
            }
        };

        self.bump(session); // `{`
        let mut raw_members = Vec::new();
        let mut flexible_array_member = false;
        while !self.at_punct(Punct::RBrace) && !self.at_eof() {
            let spec = self.parse_decl_specifiers(session);
            loop {
                let declarator = self.parse_declarator(session);
                let (member_ty, name, _span) = crate::declarator::resolve(&mut self.types, spec.ty, &declarator);
                let bit_width = if self.eat_punct(session, Punct::Colon) {
                    Some(self.parse_const_int_expr(session) as u32)
                } else {
                    None
                };
                let member_name = name.unwrap_or_else(|| session.intern(""));
                if matches!(&self.types.get(member_ty).kind, TypeKind::Array(a) if a.count < 0) {
                    flexible_array_member = true;
                }
                raw_members.push(RawMember {
                    name: member_name,
                    ty: member_ty,
                    bit_width,
                });
                if !self.eat_punct(session, Punct::Comma) {
                    break;
                }
            }
            self.expect_punct(session, Punct::Semicolon);
        }
        self.expect_punct(session, Punct::RBrace);
        self.types.complete_aggregate(ty, raw_members, flexible_array_member);
        ty
    }

    pub(crate) fn parse_enum(&mut self, session: &mut CompilerSession) -> TypeId {
        self.bump(session); // `enum`
        let tag = self.cur_ident();
        if tag.is_some() {
            self.bump(session);
        }

        if !self.at_punct(Punct::LBrace) {
            return match tag.and_then(|t| self.symtab.lookup_tag(t)) {
                Some(ty) => ty,
                None => {
                    let ty = self.types.new_enum(tag);
                    if let Some(t) = tag {
                        self.symtab.declare_tag(t, ty);
                    }
                    ty
                }
            };
        }

        let ty = self.types.new_enum(tag);
        if let Some(t) = tag {
            self.symtab.declare_tag(t, ty);
        }
        self.bump(session); // `{`
        let mut next_value: i64 = 0;
        while !self.at_punct(Punct::RBrace) && !self.at_eof() {
            let name = match self.cur_ident() {
                Some(n) => n,
                None => {
                    let span = self.cur_span();
                    self.error_at(session, span, "expected an enumerator name");
                    break;
                }
            };
            let name_span = self.cur_span();
            self.bump(session);
            let value = if self.eat_punct(session, Punct::Assign) {
                self.parse_const_int_expr(session)
            } else {
                next_value
            };
            next_value = value + 1;
            match self.symtab.declare(name, SymbolKind::EnumConst, ty, StorageClass::None) {
                Ok(id) => {
                    let sym = self.symtab.get_mut(id);
                    sym.enum_value = Some(value);
                    sym.defined = true;
                }
                Err(_) => {
                    let spelling = session.resolve(name).to_string();
                    self.error_at(session, name_span, format!("redeclaration of enumerator '{spelling}'"));
                }
            }
            if !self.eat_punct(session, Punct::Comma) {
                break;
            }
        }
        self.expect_punct(session, Punct::RBrace);
        ty
    }
}

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod tests;
