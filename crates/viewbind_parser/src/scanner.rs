//! The Java scanner/lexer.
//!
//! Produces structural tokens for declarations and headers. Expression and
//! statement interiors are not tokenized: the parser calls the `rescan_*`
//! methods, which rewind to the current token and capture raw source text
//! with string, comment and bracket awareness.

use crate::token::TokenKind;

/// Saved scanner state for speculative parsing.
pub struct ScannerState {
    pub pos: usize,
    pub token_start: usize,
    pub token: TokenKind,
    pub token_value: String,
}

/// The scanner converts Java source text into structural tokens.
pub struct Scanner {
    /// The source text being scanned.
    text: Vec<char>,
    /// Current position in the text.
    pos: usize,
    /// Start of the current token (after leading whitespace).
    token_start: usize,
    /// The current token kind.
    token: TokenKind,
    /// The text of the current token.
    token_value: String,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            pos: 0,
            token_start: 0,
            token: TokenKind::Unknown,
            token_value: String::new(),
        }
    }

    #[inline]
    pub fn token(&self) -> TokenKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    /// 1-based line of a text position.
    pub fn line_of(&self, pos: usize) -> usize {
        self.text[..pos.min(self.text.len())]
            .iter()
            .filter(|&&c| c == '\n')
            .count()
            + 1
    }

    /// 1-based column of a text position.
    pub fn column_of(&self, pos: usize) -> usize {
        let pos = pos.min(self.text.len());
        let line_begin = self.text[..pos]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |i| i + 1);
        pos - line_begin + 1
    }

    /// Save the full scanner state for speculative parsing.
    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
        }
    }

    /// Restore the full scanner state from a saved state.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset).copied()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn chars_to_string(&self, start: usize, end: usize) -> String {
        self.text[start..end.min(self.text.len())].iter().collect()
    }

    /// Scan the next token and return its kind. Comments are returned as
    /// [`TokenKind::Comment`] tokens, never silently skipped.
    pub fn scan(&mut self) -> TokenKind {
        self.token_value.clear();

        while !self.is_eof() && self.text[self.pos].is_whitespace() {
            self.pos += 1;
        }
        self.token_start = self.pos;

        if self.is_eof() {
            self.token = TokenKind::EndOfFile;
            return self.token;
        }

        let ch = self.text[self.pos];
        self.token = match ch {
            '(' => { self.pos += 1; TokenKind::OpenParen }
            ')' => { self.pos += 1; TokenKind::CloseParen }
            '{' => { self.pos += 1; TokenKind::OpenBrace }
            '}' => { self.pos += 1; TokenKind::CloseBrace }
            '[' => { self.pos += 1; TokenKind::OpenBracket }
            ']' => { self.pos += 1; TokenKind::CloseBracket }
            ';' => { self.pos += 1; TokenKind::Semicolon }
            ',' => { self.pos += 1; TokenKind::Comma }
            '@' => { self.pos += 1; TokenKind::At }
            '<' => { self.pos += 1; TokenKind::LessThan }
            '>' => { self.pos += 1; TokenKind::GreaterThan }
            '?' => { self.pos += 1; TokenKind::Question }
            '=' => { self.pos += 1; TokenKind::Equals }
            '*' => { self.pos += 1; TokenKind::Star }

            '.' => self.scan_dot(),
            '/' => self.scan_slash(),
            '"' => self.scan_string_literal(),
            '\'' => self.scan_char_literal(),
            '0'..='9' => self.scan_number(),

            _ if is_identifier_start(ch) => self.scan_identifier(),

            _ => {
                self.pos += 1;
                TokenKind::Unknown
            }
        };

        self.token
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_dot(&mut self) -> TokenKind {
        if self.char_at(1) == Some('.') && self.char_at(2) == Some('.') {
            self.pos += 3;
            TokenKind::Ellipsis
        } else {
            self.pos += 1;
            TokenKind::Dot
        }
    }

    fn scan_slash(&mut self) -> TokenKind {
        if self.char_at(1) == Some('/') {
            let start = self.pos;
            self.skip_line_comment();
            self.token_value = self.chars_to_string(start, self.pos);
            TokenKind::Comment
        } else if self.char_at(1) == Some('*') {
            let start = self.pos;
            let indent = self.indent_of_line_at(start);
            self.skip_block_comment();
            self.token_value = dedent(&self.chars_to_string(start, self.pos), &indent);
            TokenKind::Comment
        } else {
            self.pos += 1;
            TokenKind::Unknown
        }
    }

    fn scan_string_literal(&mut self) -> TokenKind {
        let start = self.pos;
        self.skip_literal('"');
        self.token_value = self.chars_to_string(start, self.pos);
        TokenKind::StringLiteral
    }

    fn scan_char_literal(&mut self) -> TokenKind {
        let start = self.pos;
        self.skip_literal('\'');
        self.token_value = self.chars_to_string(start, self.pos);
        TokenKind::CharLiteral
    }

    /// Numbers are never structural; a loose greedy scan is enough to step
    /// over them.
    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;
        while !self.is_eof() {
            let ch = self.text[self.pos];
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.token_value = self.chars_to_string(start, self.pos);
        TokenKind::NumberLiteral
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        self.pos += 1;
        while !self.is_eof() && is_identifier_part(self.text[self.pos]) {
            self.pos += 1;
        }
        let text = self.chars_to_string(start, self.pos);

        if let Some(keyword) = TokenKind::from_keyword(&text) {
            self.token_value = text;
            return keyword;
        }

        self.token_value = text;
        TokenKind::Identifier
    }

    // ========================================================================
    // Raw capture
    // ========================================================================

    /// Re-capture one whole statement as raw text, starting at the current
    /// token. The capture tracks strings, comments and bracket depth; it ends
    /// after a top-level `;`, after a top-level closing `}` (following any
    /// `else`/`catch`/`finally`/`while` continuation), or just before the
    /// enclosing body's own `}`. Multi-line text is dedented by the indent of
    /// the statement's first line.
    ///
    /// The token state is stale afterwards; the caller must scan again.
    pub fn rescan_raw_statement(&mut self) -> String {
        self.pos = self.token_start;
        let start = self.pos;
        let indent = self.indent_of_line_at(start);
        let mut paren_depth = 0i32;
        let mut brace_depth = 0i32;

        while !self.is_eof() {
            let ch = self.text[self.pos];
            match ch {
                '"' | '\'' => self.skip_literal(ch),
                '/' if self.char_at(1) == Some('/') => self.skip_line_comment(),
                '/' if self.char_at(1) == Some('*') => self.skip_block_comment(),
                '(' | '[' => {
                    paren_depth += 1;
                    self.pos += 1;
                }
                ')' | ']' => {
                    paren_depth -= 1;
                    self.pos += 1;
                }
                '{' => {
                    brace_depth += 1;
                    self.pos += 1;
                }
                '}' => {
                    if brace_depth == 0 {
                        // the enclosing body's close, not ours
                        break;
                    }
                    brace_depth -= 1;
                    self.pos += 1;
                    if brace_depth == 0 && paren_depth <= 0 && !self.continues_statement() {
                        break;
                    }
                }
                ';' => {
                    self.pos += 1;
                    if paren_depth <= 0 && brace_depth == 0 {
                        break;
                    }
                }
                _ => self.pos += 1,
            }
        }

        let text = self.chars_to_string(start, self.pos);
        dedent(text.trim_end(), &indent)
    }

    /// Re-capture a field initializer starting at the current token. Stops
    /// *before* a top-level `,` or `;` (the declarator grammar owns those)
    /// and before an unbalanced `}`.
    ///
    /// The token state is stale afterwards; the caller must scan again.
    pub fn rescan_initializer(&mut self) -> String {
        self.pos = self.token_start;
        let start = self.pos;
        let indent = self.indent_of_line_at(start);
        let mut paren_depth = 0i32;
        let mut brace_depth = 0i32;

        while !self.is_eof() {
            let ch = self.text[self.pos];
            match ch {
                '"' | '\'' => {
                    self.skip_literal(ch);
                    continue;
                }
                '/' if self.char_at(1) == Some('/') => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.char_at(1) == Some('*') => {
                    self.skip_block_comment();
                    continue;
                }
                '(' | '[' => paren_depth += 1,
                ')' | ']' => {
                    if paren_depth == 0 {
                        break;
                    }
                    paren_depth -= 1;
                }
                '{' => brace_depth += 1,
                '}' => {
                    if brace_depth == 0 {
                        break;
                    }
                    brace_depth -= 1;
                }
                ';' | ',' if paren_depth == 0 && brace_depth == 0 => break,
                _ => {}
            }
            self.pos += 1;
        }

        let text = self.chars_to_string(start, self.pos);
        dedent(text.trim(), &indent)
    }

    /// Re-capture a balanced `( ... )` group verbatim, starting at the
    /// current `(` token. Used for annotation arguments.
    ///
    /// The token state is stale afterwards; the caller must scan again.
    pub fn rescan_balanced_parens(&mut self) -> String {
        self.pos = self.token_start;
        let start = self.pos;
        let mut depth = 0i32;

        while !self.is_eof() {
            let ch = self.text[self.pos];
            match ch {
                '"' | '\'' => {
                    self.skip_literal(ch);
                    continue;
                }
                '/' if self.char_at(1) == Some('/') => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.char_at(1) == Some('*') => {
                    self.skip_block_comment();
                    continue;
                }
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        break;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }

        self.chars_to_string(start, self.pos)
    }

    /// After a top-level `}`, decide whether the statement goes on. A `;`
    /// directly after ends it (anonymous class expressions); `else`, `catch`,
    /// `finally` and `while` chain onto the block that just closed.
    fn continues_statement(&mut self) -> bool {
        let mut probe = self.pos;
        while probe < self.text.len() && self.text[probe].is_whitespace() {
            probe += 1;
        }
        if self.text.get(probe) == Some(&';') {
            self.pos = probe + 1;
            return false;
        }
        let word_start = probe;
        while probe < self.text.len() && self.text[probe].is_ascii_alphabetic() {
            probe += 1;
        }
        let word: String = self.text[word_start..probe].iter().collect();
        matches!(word.as_str(), "else" | "catch" | "finally" | "while")
    }

    fn skip_literal(&mut self, quote: char) {
        self.pos += 1;
        while !self.is_eof() {
            let ch = self.text[self.pos];
            if ch == '\\' {
                self.pos += 2;
                continue;
            }
            if ch == quote {
                self.pos += 1;
                break;
            }
            if is_line_break(ch) {
                // unterminated literal, leave the newline for the caller
                break;
            }
            self.pos += 1;
        }
    }

    fn skip_line_comment(&mut self) {
        self.pos += 2;
        while !self.is_eof() && !is_line_break(self.text[self.pos]) {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while !self.is_eof() {
            if self.text[self.pos] == '*' && self.char_at(1) == Some('/') {
                self.pos += 2;
                return;
            }
            self.pos += 1;
        }
    }

    /// Leading whitespace of the line containing `pos`.
    fn indent_of_line_at(&self, pos: usize) -> String {
        let mut begin = pos.min(self.text.len());
        while begin > 0 && !is_line_break(self.text[begin - 1]) {
            begin -= 1;
        }
        let mut end = begin;
        while end < self.text.len() && matches!(self.text[end], ' ' | '\t') {
            end += 1;
        }
        self.text[begin..end].iter().collect()
    }
}

#[inline]
fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

#[inline]
fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_ascii_alphabetic()
        || (ch as u32 > 0x7F && unicode_xid::UnicodeXID::is_xid_start(ch))
}

#[inline]
fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch == '$' || ch.is_ascii_alphanumeric()
        || (ch as u32 > 0x7F && unicode_xid::UnicodeXID::is_xid_continue(ch))
}

/// Strip up to `indent.len()` leading blanks from every line but the first,
/// so captured text can be re-indented at any nesting level.
fn dedent(text: &str, indent: &str) -> String {
    if indent.is_empty() || !text.contains('\n') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if i == 0 {
            out.push_str(line);
            continue;
        }
        out.push('\n');
        let mut limit = indent.len();
        let mut rest = line;
        while limit > 0 {
            match rest.as_bytes().first() {
                Some(b' ') | Some(b'\t') => {
                    rest = &rest[1..];
                    limit -= 1;
                }
                _ => break,
            }
        }
        out.push_str(rest);
    }
    out
}
