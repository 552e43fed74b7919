//! The Java-subset parser.
//!
//! Recursive descent over the structural grammar: headers, class and member
//! declarations, signatures. Statement interiors and initializers come from
//! the scanner's raw capture, classified just enough for anchor discovery.
//! Parsing is fail-fast: a tool that rewrites source must not guess at a
//! file it cannot read back faithfully.

use thiserror::Error;

use viewbind_ast::{
    ClassArena, ClassDecl, ClassId, FieldDecl, Member, MethodDecl, MethodId, Modifiers, Param,
    Stmt, StmtId,
};

use crate::scanner::Scanner;
use crate::token::TokenKind;

/// Maximum class nesting depth before the parser gives up.
const MAX_RECURSION_DEPTH: u32 = 200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}:{column}: expected {expected}, found {found}")]
    Expected {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("unexpected end of file inside {context}")]
    UnexpectedEof { context: String },
    #[error("line {line}:{column}: top-level {what} declarations are not supported")]
    Unsupported {
        what: &'static str,
        line: usize,
        column: usize,
    },
    #[error("source contains no class declaration")]
    NoClass,
    #[error("line {line}:{column}: class nesting is too deep")]
    NestingTooDeep { line: usize, column: usize },
}

/// Parse one compilation unit into an arena.
pub fn parse(source: &str) -> Result<ClassArena, ParseError> {
    Parser::new(source).parse_unit()
}

/// The parser produces a [`ClassArena`] from Java source text.
pub struct Parser {
    scanner: Scanner,
    arena: ClassArena,
    /// Comments scanned past but not yet attached to a declaration.
    pending: Vec<String>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            scanner: Scanner::new(source),
            arena: ClassArena::new(),
            pending: Vec::new(),
        }
    }

    pub fn parse_unit(mut self) -> Result<ClassArena, ParseError> {
        self.next_token();
        self.arena.header = self.drain_pending();

        if self.optional(TokenKind::PackageKeyword) {
            let name = self.parse_qualified_name()?;
            self.expect(TokenKind::Semicolon)?;
            self.arena.package = Some(name);
        }

        while self.scanner.token() == TokenKind::ImportKeyword {
            self.next_token();
            let is_static = if self.at_text("static") {
                self.next_token();
                true
            } else {
                false
            };
            let name = self.parse_import_name()?;
            self.expect(TokenKind::Semicolon)?;
            self.arena.imports.push(if is_static {
                format!("static {name}")
            } else {
                name
            });
        }

        while self.scanner.token() != TokenKind::EndOfFile {
            let class = self.parse_top_level()?;
            self.arena.push_top_level(class);
        }

        if self.arena.top_level().is_empty() {
            return Err(ParseError::NoClass);
        }
        self.arena.footer = self.drain_pending();
        Ok(self.arena)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// Advance to the next structural token, buffering comment tokens into
    /// `pending` until a declaration claims them.
    fn next_token(&mut self) -> TokenKind {
        loop {
            let kind = self.scanner.scan();
            if kind == TokenKind::Comment {
                self.pending.push(self.scanner.token_value().to_string());
                continue;
            }
            return kind;
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.scanner.token() == kind {
            self.next_token();
            Ok(())
        } else {
            Err(self.expected_here(kind.describe()))
        }
    }

    fn optional(&mut self, kind: TokenKind) -> bool {
        if self.scanner.token() == kind {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn expect_identifier(&mut self, what: &str) -> Result<String, ParseError> {
        if self.scanner.token() == TokenKind::Identifier {
            let value = self.scanner.token_value().to_string();
            self.next_token();
            Ok(value)
        } else {
            Err(self.expected_here(what))
        }
    }

    /// Whether the current token is an identifier with this exact text.
    fn at_text(&self, text: &str) -> bool {
        self.scanner.token() == TokenKind::Identifier && self.scanner.token_value() == text
    }

    fn expected_here(&self, expected: &str) -> ParseError {
        let found = if self.scanner.token_value().is_empty() {
            self.scanner.token().describe().to_string()
        } else {
            format!("'{}'", self.scanner.token_value())
        };
        ParseError::Expected {
            expected: expected.to_string(),
            found,
            line: self.scanner.line_of(self.scanner.token_start()),
            column: self.scanner.column_of(self.scanner.token_start()),
        }
    }

    fn unsupported(&self, what: &'static str) -> ParseError {
        ParseError::Unsupported {
            what,
            line: self.scanner.line_of(self.scanner.token_start()),
            column: self.scanner.column_of(self.scanner.token_start()),
        }
    }

    fn drain_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_top_level(&mut self) -> Result<ClassId, ParseError> {
        let mut leading = self.drain_pending();
        while self.scanner.token() == TokenKind::At {
            leading.push(self.parse_annotation()?);
            leading.extend(self.drain_pending());
        }
        let modifiers = self.parse_modifiers();
        match self.scanner.token() {
            TokenKind::ClassKeyword => self.parse_class_tail(leading, modifiers, 0),
            TokenKind::InterfaceKeyword => Err(self.unsupported("interface")),
            TokenKind::EnumKeyword => Err(self.unsupported("enum")),
            _ => Err(self.expected_here("a class declaration")),
        }
    }

    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::NONE;
        while self.scanner.token() == TokenKind::Identifier {
            match Modifiers::from_keyword(self.scanner.token_value()) {
                Some(flag) => {
                    modifiers |= flag;
                    self.next_token();
                }
                None => break,
            }
        }
        modifiers
    }

    fn parse_class_tail(
        &mut self,
        leading: Vec<String>,
        modifiers: Modifiers,
        depth: u32,
    ) -> Result<ClassId, ParseError> {
        if depth > MAX_RECURSION_DEPTH {
            return Err(ParseError::NestingTooDeep {
                line: self.scanner.line_of(self.scanner.token_start()),
                column: self.scanner.column_of(self.scanner.token_start()),
            });
        }
        self.expect(TokenKind::ClassKeyword)?;
        let name = self.expect_identifier("a class name")?;
        let type_params = if self.scanner.token() == TokenKind::LessThan {
            Some(self.parse_angle_text()?)
        } else {
            None
        };
        let extends = if self.optional(TokenKind::ExtendsKeyword) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let mut implements = Vec::new();
        if self.optional(TokenKind::ImplementsKeyword) {
            loop {
                implements.push(self.parse_type()?);
                if !self.optional(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::OpenBrace)?;

        let mut members = Vec::new();
        while self.scanner.token() != TokenKind::CloseBrace {
            if self.scanner.token() == TokenKind::EndOfFile {
                return Err(ParseError::UnexpectedEof {
                    context: format!("class '{name}'"),
                });
            }
            self.parse_member(&mut members, depth)?;
        }
        for comment in self.drain_pending() {
            let stmt = self.arena.alloc_stmt(Stmt::Comment { text: comment });
            members.push(Member::Raw(stmt));
        }
        self.expect(TokenKind::CloseBrace)?;

        Ok(self.arena.alloc_class(ClassDecl {
            leading,
            modifiers,
            name,
            type_params,
            extends,
            implements,
            members,
        }))
    }

    /// Parse one class member. May push several members at once: a field
    /// declaration can carry multiple declarators, and leading comments of a
    /// verbatim member become members of their own.
    fn parse_member(&mut self, members: &mut Vec<Member>, depth: u32) -> Result<(), ParseError> {
        let mut leading = self.drain_pending();
        let lead_base = leading.len();
        let save = self.scanner.save_state();
        let save_pending = self.pending.len();

        while self.scanner.token() == TokenKind::At {
            leading.push(self.parse_annotation()?);
            leading.extend(self.drain_pending());
        }
        let modifiers = self.parse_modifiers();
        while self.scanner.token() == TokenKind::At {
            leading.push(self.parse_annotation()?);
            leading.extend(self.drain_pending());
        }

        match self.scanner.token() {
            TokenKind::ClassKeyword => {
                let class = self.parse_class_tail(leading, modifiers, depth + 1)?;
                members.push(Member::Class(class));
                Ok(())
            }
            TokenKind::InterfaceKeyword | TokenKind::EnumKeyword | TokenKind::OpenBrace => {
                // Nested interfaces, enums and initializer blocks are kept
                // verbatim. Rewind so the capture sees the whole declaration,
                // annotations and modifiers included.
                self.scanner.restore_state(save);
                self.pending.truncate(save_pending);
                leading.truncate(lead_base);
                for comment in leading {
                    let stmt = self.arena.alloc_stmt(Stmt::Comment { text: comment });
                    members.push(Member::Raw(stmt));
                }
                let text = self.scanner.rescan_raw_statement();
                self.next_token();
                let stmt = self.arena.alloc_stmt(Stmt::Raw { text });
                members.push(Member::Raw(stmt));
                Ok(())
            }
            _ => {
                let generics = if self.scanner.token() == TokenKind::LessThan {
                    Some(self.parse_angle_text()?)
                } else {
                    None
                };
                let ty = self.parse_type()?;
                if self.scanner.token() == TokenKind::OpenParen {
                    // no return type, so `ty` was the constructor's name
                    let method = self.parse_method_rest(leading, modifiers, None, ty)?;
                    members.push(Member::Method(method));
                    return Ok(());
                }
                let name = self.expect_identifier("a member name")?;
                if self.scanner.token() == TokenKind::OpenParen {
                    let return_type = match generics {
                        Some(g) => Some(format!("{g} {ty}")),
                        None => Some(ty),
                    };
                    let method = self.parse_method_rest(leading, modifiers, return_type, name)?;
                    members.push(Member::Method(method));
                    return Ok(());
                }
                self.parse_field_declarators(members, leading, modifiers, ty, name)
            }
        }
    }

    fn parse_field_declarators(
        &mut self,
        members: &mut Vec<Member>,
        leading: Vec<String>,
        modifiers: Modifiers,
        ty: String,
        first_name: String,
    ) -> Result<(), ParseError> {
        let mut leading = Some(leading);
        let mut name = first_name;
        loop {
            let mut field_ty = ty.clone();
            while self.optional(TokenKind::OpenBracket) {
                self.expect(TokenKind::CloseBracket)?;
                field_ty.push_str("[]");
            }
            let init = if self.scanner.token() == TokenKind::Equals {
                self.next_token();
                let text = self.scanner.rescan_initializer();
                self.next_token();
                Some(text)
            } else {
                None
            };
            let field = self.arena.alloc_field(FieldDecl {
                leading: leading.take().unwrap_or_default(),
                modifiers,
                ty: field_ty,
                name,
                init,
            });
            members.push(Member::Field(field));

            if self.optional(TokenKind::Comma) {
                name = self.expect_identifier("a field name")?;
                continue;
            }
            self.expect(TokenKind::Semicolon)?;
            return Ok(());
        }
    }

    fn parse_method_rest(
        &mut self,
        leading: Vec<String>,
        modifiers: Modifiers,
        return_type: Option<String>,
        name: String,
    ) -> Result<MethodId, ParseError> {
        self.expect(TokenKind::OpenParen)?;
        let mut params = Vec::new();
        if self.scanner.token() != TokenKind::CloseParen {
            loop {
                params.push(self.parse_param()?);
                if !self.optional(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::CloseParen)?;

        let mut throws = Vec::new();
        if self.optional(TokenKind::ThrowsKeyword) {
            loop {
                throws.push(self.parse_type()?);
                if !self.optional(TokenKind::Comma) {
                    break;
                }
            }
        }

        let (body, has_body) = if self.scanner.token() == TokenKind::OpenBrace {
            (self.parse_body(&name)?, true)
        } else {
            self.expect(TokenKind::Semicolon)?;
            (Vec::new(), false)
        };

        Ok(self.arena.alloc_method(MethodDecl {
            leading,
            modifiers,
            return_type,
            name,
            params,
            throws,
            body,
            has_body,
        }))
    }

    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let mut prefix = String::new();
        while self.scanner.token() == TokenKind::At {
            prefix.push_str(&self.parse_annotation()?);
            prefix.push(' ');
        }
        if self.at_text("final") {
            prefix.push_str("final ");
            self.next_token();
        }
        let mut ty = self.parse_type()?;
        let name = self.expect_identifier("a parameter name")?;
        while self.optional(TokenKind::OpenBracket) {
            self.expect(TokenKind::CloseBracket)?;
            ty.push_str("[]");
        }
        if !prefix.is_empty() {
            ty = format!("{prefix}{ty}");
        }
        Ok(Param { ty, name })
    }

    fn parse_annotation(&mut self) -> Result<String, ParseError> {
        self.expect(TokenKind::At)?;
        let mut text = String::from("@");
        text.push_str(&self.expect_identifier("an annotation name")?);
        while self.optional(TokenKind::Dot) {
            text.push('.');
            text.push_str(&self.expect_identifier("an annotation name")?);
        }
        if self.scanner.token() == TokenKind::OpenParen {
            text.push_str(&self.scanner.rescan_balanced_parens());
            self.next_token();
        }
        Ok(text)
    }

    // ========================================================================
    // Names and types
    // ========================================================================

    fn parse_qualified_name(&mut self) -> Result<String, ParseError> {
        let mut text = self.expect_identifier("a name")?;
        while self.optional(TokenKind::Dot) {
            text.push('.');
            text.push_str(&self.expect_identifier("a name")?);
        }
        Ok(text)
    }

    /// An import target: a qualified name, possibly ending in `.*`.
    fn parse_import_name(&mut self) -> Result<String, ParseError> {
        let mut text = self.expect_identifier("an import name")?;
        while self.optional(TokenKind::Dot) {
            if self.optional(TokenKind::Star) {
                text.push_str(".*");
                return Ok(text);
            }
            text.push('.');
            text.push_str(&self.expect_identifier("an import name")?);
        }
        Ok(text)
    }

    fn parse_type(&mut self) -> Result<String, ParseError> {
        let mut text = self.expect_identifier("a type name")?;
        while self.optional(TokenKind::Dot) {
            text.push('.');
            text.push_str(&self.expect_identifier("a type name")?);
        }
        if self.scanner.token() == TokenKind::LessThan {
            text.push_str(&self.parse_angle_text()?);
        }
        while self.optional(TokenKind::OpenBracket) {
            self.expect(TokenKind::CloseBracket)?;
            text.push_str("[]");
        }
        if self.optional(TokenKind::Ellipsis) {
            text.push_str("...");
        }
        Ok(text)
    }

    /// Reconstruct a balanced `< ... >` group from tokens, normalizing
    /// spacing. Used for type arguments and type parameter lists.
    fn parse_angle_text(&mut self) -> Result<String, ParseError> {
        self.expect(TokenKind::LessThan)?;
        let mut text = String::from("<");
        let mut depth = 1u32;
        loop {
            match self.scanner.token() {
                TokenKind::GreaterThan => {
                    text.push('>');
                    depth -= 1;
                    self.next_token();
                    if depth == 0 {
                        return Ok(text);
                    }
                }
                TokenKind::LessThan => {
                    text.push('<');
                    depth += 1;
                    self.next_token();
                }
                TokenKind::Identifier | TokenKind::ExtendsKeyword => {
                    if text.ends_with(|c: char| c.is_alphanumeric() || c == '?' || c == ']') {
                        text.push(' ');
                    }
                    text.push_str(self.scanner.token_value());
                    self.next_token();
                }
                TokenKind::Dot => {
                    text.push('.');
                    self.next_token();
                }
                TokenKind::Comma => {
                    text.push_str(", ");
                    self.next_token();
                }
                TokenKind::Question => {
                    text.push('?');
                    self.next_token();
                }
                TokenKind::OpenBracket => {
                    self.next_token();
                    self.expect(TokenKind::CloseBracket)?;
                    text.push_str("[]");
                }
                TokenKind::EndOfFile => {
                    return Err(ParseError::UnexpectedEof {
                        context: "a type argument list".to_string(),
                    });
                }
                _ => return Err(self.expected_here("a type argument")),
            }
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_body(&mut self, name: &str) -> Result<Vec<StmtId>, ParseError> {
        self.expect(TokenKind::OpenBrace)?;
        let mut body = Vec::new();
        loop {
            for comment in self.drain_pending() {
                body.push(self.arena.alloc_stmt(Stmt::Comment { text: comment }));
            }
            match self.scanner.token() {
                TokenKind::CloseBrace => {
                    self.next_token();
                    return Ok(body);
                }
                TokenKind::EndOfFile => {
                    return Err(ParseError::UnexpectedEof {
                        context: format!("the body of '{name}'"),
                    });
                }
                _ => {
                    let text = self.scanner.rescan_raw_statement();
                    self.next_token();
                    body.push(self.arena.alloc_stmt(classify_statement(&text)));
                }
            }
        }
    }
}

/// Classify one captured statement chunk. Only the shapes anchor discovery
/// needs are distinguished; everything else stays raw.
fn classify_statement(text: &str) -> Stmt {
    match text.strip_suffix(';') {
        Some(stripped) => {
            let stripped = stripped.trim_end();
            if let Some(rest) = strip_word(stripped, "return") {
                let rest = rest.trim();
                return Stmt::Return {
                    expr: (!rest.is_empty()).then(|| rest.to_string()),
                };
            }
            if let Some(local) = parse_local(stripped) {
                return local;
            }
            Stmt::expr(stripped)
        }
        None => Stmt::Raw {
            text: text.to_string(),
        },
    }
}

/// `text` minus a leading keyword, if the keyword occurs as a whole word.
fn strip_word<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_alphanumeric() || c == '_' || c == '$' => None,
        Some(_) => Some(rest),
    }
}

/// Try to read `[final] Type name [= init]` out of a statement chunk.
fn parse_local(text: &str) -> Option<Stmt> {
    let mut ty = String::new();
    let mut rest = text;
    while let Some(after) = strip_word(rest, "final") {
        ty.push_str("final ");
        rest = after.trim_start();
    }
    let (ty_text, rest) = take_type_text(rest)?;
    ty.push_str(ty_text);
    let rest = rest.trim_start();
    let (name, rest) = take_identifier(rest)?;
    let mut rest = rest.trim_start();
    while let Some(after) = rest.strip_prefix("[]") {
        ty.push_str("[]");
        rest = after.trim_start();
    }
    if rest.is_empty() {
        return Some(Stmt::Local {
            ty,
            name: name.to_string(),
            init: None,
        });
    }
    let init = rest.strip_prefix('=')?;
    if init.starts_with('=') {
        // a `==` comparison, not an initializer
        return None;
    }
    Some(Stmt::Local {
        ty,
        name: name.to_string(),
        init: Some(init.trim().to_string()),
    })
}

/// Split a leading type-shaped prefix (`ident(.ident)*`, generics, array
/// brackets) off a chunk of text.
fn take_type_text(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0u32;
    let mut end = 0;
    for (i, ch) in text.char_indices() {
        let keep = if depth > 0 {
            match ch {
                '<' => {
                    depth += 1;
                    true
                }
                '>' => {
                    depth -= 1;
                    true
                }
                _ => true,
            }
        } else {
            match ch {
                '<' => {
                    depth += 1;
                    true
                }
                '[' | ']' | '.' => true,
                c => c.is_alphanumeric() || c == '_' || c == '$',
            }
        };
        if !keep {
            end = i;
            break;
        }
        end = i + ch.len_utf8();
    }
    if end == 0 || depth != 0 {
        return None;
    }
    let (ty, rest) = text.split_at(end);
    let first = ty.chars().next()?;
    if !(first.is_alphabetic() || first == '_' || first == '$') {
        return None;
    }
    Some((ty, rest))
}

fn take_identifier(text: &str) -> Option<(&str, &str)> {
    let mut end = 0;
    for (i, ch) in text.char_indices() {
        let ok = if i == 0 {
            ch.is_alphabetic() || ch == '_' || ch == '$'
        } else {
            ch.is_alphanumeric() || ch == '_' || ch == '$'
        };
        if !ok {
            end = i;
            break;
        }
        end = i + ch.len_utf8();
    }
    if end == 0 {
        None
    } else {
        Some(text.split_at(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_classification() {
        assert!(matches!(
            classify_statement("super.onCreate(savedInstanceState);"),
            Stmt::Expr { callee: Some(c), .. } if c == "super.onCreate"
        ));
        assert_eq!(
            classify_statement("return inflater.inflate(R.layout.f, c, false);"),
            Stmt::Return {
                expr: Some("inflater.inflate(R.layout.f, c, false)".to_string()),
            }
        );
        assert_eq!(classify_statement("return;"), Stmt::Return { expr: None });
        assert_eq!(
            classify_statement("View view = inflater.inflate(R.layout.f, c, false);"),
            Stmt::Local {
                ty: "View".to_string(),
                name: "view".to_string(),
                init: Some("inflater.inflate(R.layout.f, c, false)".to_string()),
            }
        );
        assert!(matches!(
            classify_statement("if (done) { finish(); }"),
            Stmt::Raw { .. }
        ));
    }

    #[test]
    fn test_assignment_is_not_a_local() {
        assert!(matches!(
            classify_statement("mTitle = (TextView) findViewById(R.id.title);"),
            Stmt::Expr { callee: None, .. }
        ));
        assert!(matches!(
            classify_statement("count == expected;"),
            Stmt::Expr { .. }
        ));
    }

    #[test]
    fn test_local_with_generics_and_final() {
        assert_eq!(
            classify_statement("final List<String> names = new ArrayList<>();"),
            Stmt::Local {
                ty: "final List<String>".to_string(),
                name: "names".to_string(),
                init: Some("new ArrayList<>()".to_string()),
            }
        );
    }

    #[test]
    fn test_return_prefix_requires_word_boundary() {
        assert!(matches!(
            classify_statement("returnValue();"),
            Stmt::Expr { callee: Some(c), .. } if c == "returnValue"
        ));
    }
}
