//! The owned node arena for one compilation unit.
//!
//! All nodes are allocated into `Vec` pools and addressed by typed indices.
//! Allocation never attaches: a node becomes part of the tree only when a
//! parser or an [`crate::EditBatch`] links it into a class body.

use crate::node::*;

/// Arena holding every node of one parsed compilation unit.
#[derive(Debug, Default)]
pub struct ClassArena {
    /// File comments before the `package` declaration, verbatim.
    pub header: Vec<String>,
    pub package: Option<String>,
    /// Import lines without the `import` keyword or semicolon. Static
    /// imports keep their `static ` prefix.
    pub imports: Vec<String>,
    /// Trailing comments after the last top-level class.
    pub footer: Vec<String>,
    top_level: Vec<ClassId>,
    classes: Vec<ClassDecl>,
    fields: Vec<FieldDecl>,
    methods: Vec<MethodDecl>,
    stmts: Vec<Stmt>,
}

impl ClassArena {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Allocation
    // ========================================================================

    pub fn alloc_class(&mut self, decl: ClassDecl) -> ClassId {
        let id = ClassId::new(self.classes.len());
        self.classes.push(decl);
        id
    }

    pub fn alloc_field(&mut self, decl: FieldDecl) -> FieldId {
        let id = FieldId::new(self.fields.len());
        self.fields.push(decl);
        id
    }

    pub fn alloc_method(&mut self, decl: MethodDecl) -> MethodId {
        let id = MethodId::new(self.methods.len());
        self.methods.push(decl);
        id
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(self.stmts.len());
        self.stmts.push(stmt);
        id
    }

    /// Attach a class as a top-level declaration of the unit.
    pub fn push_top_level(&mut self, id: ClassId) {
        self.top_level.push(id);
    }

    pub fn top_level(&self) -> &[ClassId] {
        &self.top_level
    }

    /// The primary (first) top-level class of the unit.
    pub fn root(&self) -> Option<ClassId> {
        self.top_level.first().copied()
    }

    // ========================================================================
    // Node access
    // ========================================================================

    #[inline]
    pub fn class(&self, id: ClassId) -> &ClassDecl {
        &self.classes[id.index()]
    }

    #[inline]
    pub fn class_mut(&mut self, id: ClassId) -> &mut ClassDecl {
        &mut self.classes[id.index()]
    }

    #[inline]
    pub fn field(&self, id: FieldId) -> &FieldDecl {
        &self.fields[id.index()]
    }

    #[inline]
    pub fn field_mut(&mut self, id: FieldId) -> &mut FieldDecl {
        &mut self.fields[id.index()]
    }

    #[inline]
    pub fn method(&self, id: MethodId) -> &MethodDecl {
        &self.methods[id.index()]
    }

    #[inline]
    pub fn method_mut(&mut self, id: MethodId) -> &mut MethodDecl {
        &mut self.methods[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn stmt_mut(&mut self, id: StmtId) -> &mut Stmt {
        &mut self.stmts[id.index()]
    }

    // ========================================================================
    // Member queries
    // ========================================================================

    /// Find a directly declared method by name. Inherited methods are not
    /// considered.
    pub fn find_method(&self, class: ClassId, name: &str) -> Option<MethodId> {
        self.class(class).members.iter().find_map(|m| match m {
            Member::Method(id) if self.method(*id).name == name => Some(*id),
            _ => None,
        })
    }

    /// Find a directly declared field by name.
    pub fn find_field(&self, class: ClassId, name: &str) -> Option<FieldId> {
        self.class(class).members.iter().find_map(|m| match m {
            Member::Field(id) if self.field(*id).name == name => Some(*id),
            _ => None,
        })
    }

    /// Find a nested class by name.
    pub fn find_class(&self, class: ClassId, name: &str) -> Option<ClassId> {
        self.class(class).members.iter().find_map(|m| match m {
            Member::Class(id) if self.class(*id).name == name => Some(*id),
            _ => None,
        })
    }

    pub fn fields_of(&self, class: ClassId) -> impl Iterator<Item = FieldId> + '_ {
        self.class(class).members.iter().filter_map(|m| match m {
            Member::Field(id) => Some(*id),
            _ => None,
        })
    }

    pub fn methods_of(&self, class: ClassId) -> impl Iterator<Item = MethodId> + '_ {
        self.class(class).members.iter().filter_map(|m| match m {
            Member::Method(id) => Some(*id),
            _ => None,
        })
    }

    /// Whether any expression statement of the method body contains `needle`
    /// as a literal substring. Comments, locals and returns do not count.
    pub fn method_contains(&self, method: MethodId, needle: &str) -> bool {
        self.method(method).body.iter().any(|&s| {
            matches!(self.stmt(s), Stmt::Expr { text, .. } if text.contains(needle))
        })
    }

    /// Resolve a short type name through the unit's imports. Static imports
    /// name members, not types, and are skipped.
    pub fn import_for(&self, short: &str) -> Option<&str> {
        self.imports
            .iter()
            .map(String::as_str)
            .filter(|imp| !imp.starts_with("static "))
            .find(|imp| {
                imp.strip_suffix(short)
                    .is_some_and(|prefix| prefix.ends_with('.'))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with_class() -> (ClassArena, ClassId) {
        let mut arena = ClassArena::new();
        let class = arena.alloc_class(ClassDecl {
            leading: vec![],
            modifiers: Modifiers::PUBLIC,
            name: "MainActivity".to_string(),
            type_params: None,
            extends: Some("Activity".to_string()),
            implements: vec![],
            members: vec![],
        });
        arena.push_top_level(class);
        (arena, class)
    }

    #[test]
    fn test_member_lookup() {
        let (mut arena, class) = arena_with_class();
        let field = arena.alloc_field(FieldDecl {
            leading: vec![],
            modifiers: Modifiers::PRIVATE,
            ty: "android.widget.TextView".to_string(),
            name: "mTitle".to_string(),
            init: None,
        });
        let method = arena.alloc_method(MethodDecl {
            leading: vec![],
            modifiers: Modifiers::PROTECTED,
            return_type: Some("void".to_string()),
            name: "onCreate".to_string(),
            params: vec![],
            throws: vec![],
            body: vec![],
            has_body: true,
        });
        arena.class_mut(class).members.push(Member::Field(field));
        arena.class_mut(class).members.push(Member::Method(method));

        assert_eq!(arena.find_field(class, "mTitle"), Some(field));
        assert_eq!(arena.find_method(class, "onCreate"), Some(method));
        assert_eq!(arena.find_method(class, "onDestroy"), None);
        assert_eq!(arena.fields_of(class).count(), 1);
    }

    #[test]
    fn test_method_contains_checks_expression_statements_only() {
        let (mut arena, class) = arena_with_class();
        let comment = arena.alloc_stmt(Stmt::Comment {
            text: "// findView(rootView)".to_string(),
        });
        let call = arena.alloc_stmt(Stmt::expr("findView()"));
        let method = arena.alloc_method(MethodDecl {
            leading: vec![],
            modifiers: Modifiers::PROTECTED,
            return_type: Some("void".to_string()),
            name: "onCreate".to_string(),
            params: vec![],
            throws: vec![],
            body: vec![comment],
            has_body: true,
        });
        arena.class_mut(class).members.push(Member::Method(method));

        assert!(!arena.method_contains(method, "findView("));
        arena.method_mut(method).body.push(call);
        assert!(arena.method_contains(method, "findView("));
    }

    #[test]
    fn test_import_resolution() {
        let (mut arena, _class) = arena_with_class();
        arena.imports.push("android.app.Activity".to_string());
        arena.imports.push("android.os.Bundle".to_string());

        assert_eq!(arena.import_for("Activity"), Some("android.app.Activity"));
        assert_eq!(arena.import_for("Bundle"), Some("android.os.Bundle"));
        // A suffix match without a package separator must not resolve.
        assert_eq!(arena.import_for("ctivity"), None);
        assert_eq!(arena.import_for("View"), None);
    }
}
