//! Node definitions for the Java-subset syntax tree.
//!
//! Declarations reference their children through typed arena ids. Statement
//! bodies are kept at statement granularity: each statement stores its source
//! text plus just enough classification for anchor discovery.

// ============================================================================
// Typed arena ids
// ============================================================================

/// Index of a class declaration in a [`crate::ClassArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(u32);

impl ClassId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a field declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(u32);

impl FieldId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(u32);

impl MethodId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtId(u32);

impl StmtId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ============================================================================
// Modifiers
// ============================================================================

bitflags::bitflags! {
    /// Declaration modifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u16 {
        const NONE         = 0;
        const PUBLIC       = 1 << 0;
        const PROTECTED    = 1 << 1;
        const PRIVATE      = 1 << 2;
        const STATIC       = 1 << 3;
        const FINAL        = 1 << 4;
        const ABSTRACT     = 1 << 5;
        const SYNCHRONIZED = 1 << 6;
        const NATIVE       = 1 << 7;
        const TRANSIENT    = 1 << 8;
        const VOLATILE     = 1 << 9;

        const ACCESS = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

impl Modifiers {
    /// Map a modifier keyword to its flag.
    pub fn from_keyword(text: &str) -> Option<Modifiers> {
        match text {
            "public" => Some(Modifiers::PUBLIC),
            "protected" => Some(Modifiers::PROTECTED),
            "private" => Some(Modifiers::PRIVATE),
            "static" => Some(Modifiers::STATIC),
            "final" => Some(Modifiers::FINAL),
            "abstract" => Some(Modifiers::ABSTRACT),
            "synchronized" => Some(Modifiers::SYNCHRONIZED),
            "native" => Some(Modifiers::NATIVE),
            "transient" => Some(Modifiers::TRANSIENT),
            "volatile" => Some(Modifiers::VOLATILE),
            _ => None,
        }
    }

    /// The set's keywords in canonical declaration order.
    pub fn keywords(self) -> impl Iterator<Item = &'static str> {
        const ORDER: [(Modifiers, &str); 10] = [
            (Modifiers::PUBLIC, "public"),
            (Modifiers::PROTECTED, "protected"),
            (Modifiers::PRIVATE, "private"),
            (Modifiers::ABSTRACT, "abstract"),
            (Modifiers::STATIC, "static"),
            (Modifiers::FINAL, "final"),
            (Modifiers::TRANSIENT, "transient"),
            (Modifiers::VOLATILE, "volatile"),
            (Modifiers::SYNCHRONIZED, "synchronized"),
            (Modifiers::NATIVE, "native"),
        ];
        ORDER
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, word)| word)
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// One member slot of a class body, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Field(FieldId),
    Method(MethodId),
    Class(ClassId),
    /// A member kept verbatim: nested interfaces and enums, initializer
    /// blocks, stray comments. The id points at a [`Stmt::Raw`] or
    /// [`Stmt::Comment`].
    Raw(StmtId),
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// Doc comments and annotations, one entry per line, in source order.
    pub leading: Vec<String>,
    pub modifiers: Modifiers,
    pub name: String,
    /// Type parameter list as written, including the angle brackets.
    pub type_params: Option<String>,
    /// Supertype reference as written in the source (possibly a short name).
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub leading: Vec<String>,
    pub modifiers: Modifiers,
    pub ty: String,
    pub name: String,
    pub init: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub leading: Vec<String>,
    pub modifiers: Modifiers,
    /// `None` marks a constructor.
    pub return_type: Option<String>,
    pub name: String,
    pub params: Vec<Param>,
    pub throws: Vec<String>,
    pub body: Vec<StmtId>,
    /// Abstract and native methods carry no body.
    pub has_body: bool,
}

// ============================================================================
// Statements
// ============================================================================

/// A statement in a method body.
///
/// Statements keep their source text; only the shapes anchor discovery cares
/// about are classified. Everything else is [`Stmt::Raw`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// An expression statement, without the trailing semicolon. `callee` is
    /// the dotted head of the expression when it is a plain call.
    Expr { text: String, callee: Option<String> },
    /// A `return` statement with the returned expression text, if any.
    Return { expr: Option<String> },
    /// A local variable declaration.
    Local {
        ty: String,
        name: String,
        init: Option<String>,
    },
    /// A standalone comment line, text includes the `//` or `/* */` markers.
    Comment { text: String },
    /// Any other statement, kept verbatim. Multi-line text is stored dedented
    /// so the printer can re-indent it at any nesting level.
    Raw { text: String },
}

impl Stmt {
    /// Build an expression statement, extracting the dotted callee head when
    /// the text is a plain call like `setContentView(...)` or
    /// `super.onCreate(...)`.
    pub fn expr(text: impl Into<String>) -> Stmt {
        let text = text.into();
        let callee = callee_of(&text);
        Stmt::Expr { text, callee }
    }

    /// Whether this is an expression statement whose full dotted callee text
    /// equals `name`. `this.setContentView(...)` does not match
    /// `setContentView`.
    pub fn is_call_to(&self, name: &str) -> bool {
        matches!(self, Stmt::Expr { callee: Some(c), .. } if c == name)
    }
}

/// Extract the dotted callee head of a call expression, if the text starts
/// with `ident(.ident)* "("`.
fn callee_of(text: &str) -> Option<String> {
    let head = &text[..text.find('(')?];
    if head.is_empty() {
        return None;
    }
    let plain = head
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.');
    if plain && !head.starts_with('.') && !head.ends_with('.') {
        Some(head.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callee_extraction() {
        assert!(Stmt::expr("setContentView(R.layout.main)").is_call_to("setContentView"));
        assert!(Stmt::expr("super.onCreate(savedInstanceState)").is_call_to("super.onCreate"));
        assert!(!Stmt::expr("this.setContentView(R.layout.main)").is_call_to("setContentView"));
        assert!(Stmt::expr("this.setContentView(x)").is_call_to("this.setContentView"));
    }

    #[test]
    fn test_callee_rejects_non_calls() {
        assert_eq!(
            Stmt::expr("mTitle = (android.widget.TextView) findViewById(R.id.title)"),
            Stmt::Expr {
                text: "mTitle = (android.widget.TextView) findViewById(R.id.title)".to_string(),
                callee: None,
            }
        );
        assert_eq!(
            Stmt::expr("new Thread(r).start()"),
            Stmt::Expr {
                text: "new Thread(r).start()".to_string(),
                callee: None,
            }
        );
    }

    #[test]
    fn test_modifier_keywords() {
        assert_eq!(Modifiers::from_keyword("private"), Some(Modifiers::PRIVATE));
        assert_eq!(Modifiers::from_keyword("static"), Some(Modifiers::STATIC));
        assert_eq!(Modifiers::from_keyword("class"), None);
    }
}
