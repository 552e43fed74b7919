//! Token kinds produced by the scanner.

/// The kinds of token the structural grammar distinguishes. Expression
/// interiors are captured as raw text, so operators do not need kinds of
/// their own; anything unrecognized scans as [`TokenKind::Unknown`] and is
/// swallowed by the next raw capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Unknown,
    EndOfFile,

    Identifier,
    StringLiteral,
    CharLiteral,
    NumberLiteral,
    /// A `//` or `/* */` comment, value holds the full text.
    Comment,

    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Dot,
    /// `...` in a varargs parameter.
    Ellipsis,
    At,
    LessThan,
    GreaterThan,
    Question,
    Equals,
    Star,

    PackageKeyword,
    ImportKeyword,
    ClassKeyword,
    InterfaceKeyword,
    EnumKeyword,
    ExtendsKeyword,
    ImplementsKeyword,
    ThrowsKeyword,
}

impl TokenKind {
    /// Map reserved words the structural grammar needs onto keyword kinds.
    /// Modifiers and primitive type names stay plain identifiers; the parser
    /// matches them by text.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        match text {
            "package" => Some(TokenKind::PackageKeyword),
            "import" => Some(TokenKind::ImportKeyword),
            "class" => Some(TokenKind::ClassKeyword),
            "interface" => Some(TokenKind::InterfaceKeyword),
            "enum" => Some(TokenKind::EnumKeyword),
            "extends" => Some(TokenKind::ExtendsKeyword),
            "implements" => Some(TokenKind::ImplementsKeyword),
            "throws" => Some(TokenKind::ThrowsKeyword),
            _ => None,
        }
    }

    /// Human-readable name for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Unknown => "an unrecognized character",
            TokenKind::EndOfFile => "end of file",
            TokenKind::Identifier => "an identifier",
            TokenKind::StringLiteral => "a string literal",
            TokenKind::CharLiteral => "a character literal",
            TokenKind::NumberLiteral => "a number",
            TokenKind::Comment => "a comment",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::OpenBrace => "'{'",
            TokenKind::CloseBrace => "'}'",
            TokenKind::OpenBracket => "'['",
            TokenKind::CloseBracket => "']'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Ellipsis => "'...'",
            TokenKind::At => "'@'",
            TokenKind::LessThan => "'<'",
            TokenKind::GreaterThan => "'>'",
            TokenKind::Question => "'?'",
            TokenKind::Equals => "'='",
            TokenKind::Star => "'*'",
            TokenKind::PackageKeyword => "'package'",
            TokenKind::ImportKeyword => "'import'",
            TokenKind::ClassKeyword => "'class'",
            TokenKind::InterfaceKeyword => "'interface'",
            TokenKind::EnumKeyword => "'enum'",
            TokenKind::ExtendsKeyword => "'extends'",
            TokenKind::ImplementsKeyword => "'implements'",
            TokenKind::ThrowsKeyword => "'throws'",
        }
    }
}
