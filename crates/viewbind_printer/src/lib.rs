//! Java source emission.
//!
//! Renders a compilation unit back to text with normalized indentation.
//! Raw statement chunks were dedented at capture time; the printer re-indents
//! every line of a chunk to its new nesting depth, so a statement keeps its
//! shape wherever an edit moves it.

use viewbind_ast::{ClassArena, ClassId, FieldDecl, Member, MethodDecl, Modifiers, Stmt, StmtId};

/// Output formatting knobs.
#[derive(Debug, Clone)]
pub struct PrinterOptions {
    /// One level of indentation.
    pub indent: String,
    pub newline: String,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            newline: "\n".to_string(),
        }
    }
}

/// Render one compilation unit with default options.
pub fn print_unit(arena: &ClassArena) -> String {
    Printer::new(arena, PrinterOptions::default()).print()
}

/// What the previous member slot held, for blank-line placement.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PrevMember {
    None,
    Field,
    Comment,
    Other,
}

pub struct Printer<'a> {
    arena: &'a ClassArena,
    options: PrinterOptions,
    out: String,
    depth: usize,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a ClassArena, options: PrinterOptions) -> Self {
        Self {
            arena,
            options,
            out: String::new(),
            depth: 0,
        }
    }

    pub fn print(mut self) -> String {
        let arena = self.arena;
        for line in &arena.header {
            self.write_block(line);
        }
        if let Some(package) = &arena.package {
            self.write_line(&format!("package {package};"));
            self.blank_line();
        }
        if !arena.imports.is_empty() {
            for import in &arena.imports {
                self.write_line(&format!("import {import};"));
            }
            self.blank_line();
        }
        for (i, id) in arena.top_level().iter().enumerate() {
            if i > 0 {
                self.blank_line();
            }
            self.print_class(*id);
        }
        for line in &arena.footer {
            self.write_block(line);
        }
        self.out
    }

    fn print_class(&mut self, id: ClassId) {
        let arena = self.arena;
        let class = arena.class(id);
        for line in &class.leading {
            self.write_block(line);
        }

        let mut head = String::new();
        push_modifiers(&mut head, class.modifiers);
        head.push_str("class ");
        head.push_str(&class.name);
        if let Some(type_params) = &class.type_params {
            head.push_str(type_params);
        }
        if let Some(extends) = &class.extends {
            head.push_str(" extends ");
            head.push_str(extends);
        }
        if !class.implements.is_empty() {
            head.push_str(" implements ");
            head.push_str(&class.implements.join(", "));
        }
        head.push_str(" {");
        self.write_line(&head);

        self.depth += 1;
        let mut prev = PrevMember::None;
        for member in &class.members {
            let current = match member {
                Member::Field(_) => PrevMember::Field,
                Member::Raw(id) if matches!(arena.stmt(*id), Stmt::Comment { .. }) => {
                    PrevMember::Comment
                }
                _ => PrevMember::Other,
            };
            let adjacent = prev == PrevMember::None
                || prev == PrevMember::Comment
                || (prev == PrevMember::Field && current == PrevMember::Field);
            if !adjacent {
                self.blank_line();
            }
            match member {
                Member::Field(id) => self.print_field(arena.field(*id)),
                Member::Method(id) => self.print_method(arena.method(*id)),
                Member::Class(id) => self.print_class(*id),
                Member::Raw(id) => self.print_stmt(*id),
            }
            prev = current;
        }
        self.depth -= 1;
        self.write_line("}");
    }

    fn print_field(&mut self, field: &FieldDecl) {
        for line in &field.leading {
            self.write_block(line);
        }
        let mut text = String::new();
        push_modifiers(&mut text, field.modifiers);
        text.push_str(&field.ty);
        text.push(' ');
        text.push_str(&field.name);
        if let Some(init) = &field.init {
            text.push_str(" = ");
            text.push_str(init);
        }
        text.push(';');
        self.write_block(&text);
    }

    fn print_method(&mut self, method: &MethodDecl) {
        for line in &method.leading {
            self.write_block(line);
        }
        let mut head = String::new();
        push_modifiers(&mut head, method.modifiers);
        if let Some(return_type) = &method.return_type {
            head.push_str(return_type);
            head.push(' ');
        }
        head.push_str(&method.name);
        head.push('(');
        for (i, param) in method.params.iter().enumerate() {
            if i > 0 {
                head.push_str(", ");
            }
            head.push_str(&param.ty);
            head.push(' ');
            head.push_str(&param.name);
        }
        head.push(')');
        if !method.throws.is_empty() {
            head.push_str(" throws ");
            head.push_str(&method.throws.join(", "));
        }

        if !method.has_body {
            head.push(';');
            self.write_line(&head);
            return;
        }
        head.push_str(" {");
        self.write_line(&head);
        self.depth += 1;
        for stmt in &method.body {
            self.print_stmt(*stmt);
        }
        self.depth -= 1;
        self.write_line("}");
    }

    fn print_stmt(&mut self, id: StmtId) {
        let arena = self.arena;
        match arena.stmt(id) {
            Stmt::Expr { text, .. } => {
                let text = format!("{text};");
                self.write_block(&text);
            }
            Stmt::Return { expr } => match expr {
                Some(expr) => {
                    let text = format!("return {expr};");
                    self.write_block(&text);
                }
                None => self.write_line("return;"),
            },
            Stmt::Local { ty, name, init } => {
                let text = match init {
                    Some(init) => format!("{ty} {name} = {init};"),
                    None => format!("{ty} {name};"),
                };
                self.write_block(&text);
            }
            Stmt::Comment { text } => self.write_block(text),
            Stmt::Raw { text } => self.write_block(text),
        }
    }

    // ========================================================================
    // Low-level emission
    // ========================================================================

    /// One line at the current indentation. Empty lines carry no indent.
    fn write_line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(&self.options.indent);
            }
            self.out.push_str(line);
        }
        self.out.push_str(&self.options.newline);
    }

    /// A possibly multi-line chunk, each line re-indented to the current
    /// depth. Blank interior lines stay blank.
    fn write_block(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.out.push_str(&self.options.newline);
            } else {
                for _ in 0..self.depth {
                    self.out.push_str(&self.options.indent);
                }
                self.out.push_str(line);
                self.out.push_str(&self.options.newline);
            }
        }
    }

    fn blank_line(&mut self) {
        self.out.push_str(&self.options.newline);
    }
}

fn push_modifiers(out: &mut String, modifiers: Modifiers) {
    for word in modifiers.keywords() {
        out.push_str(word);
        out.push(' ');
    }
}
