//! Batched, validated tree edits.
//!
//! Generation never mutates the arena directly. It records [`EditOp`]s into an
//! [`EditBatch`], then commits the batch in one step. [`EditBatch::apply`]
//! validates every op against the current tree before the first mutation, so a
//! rejected batch leaves the tree exactly as it was.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::arena::ClassArena;
use crate::node::{ClassDecl, ClassId, FieldDecl, FieldId, Member, MethodDecl, MethodId, Stmt, StmtId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("batch adds field '{0}' twice")]
    DuplicateField(String),
    #[error("batch adds method '{0}' twice")]
    DuplicateMethod(String),
    #[error("batch adds class '{0}' twice")]
    DuplicateClass(String),
    #[error("anchor statement not found in body of '{0}'")]
    AnchorNotFound(String),
}

/// A single pending edit. Node payloads are ids of already allocated,
/// still detached nodes.
#[derive(Debug)]
pub enum EditOp {
    AddField { class: ClassId, field: FieldId },
    AddMethod { class: ClassId, method: MethodId },
    AddClass { parent: ClassId, class: ClassId },
    InsertAfter { method: MethodId, anchor: StmtId, stmts: Vec<StmtId> },
    InsertBefore { method: MethodId, anchor: StmtId, stmts: Vec<StmtId> },
    Replace { method: MethodId, target: StmtId, stmt: StmtId },
}

/// An ordered list of edits committed atomically.
#[derive(Debug, Default)]
pub struct EditBatch {
    ops: Vec<EditOp>,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: EditOp) {
        self.ops.push(op);
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[EditOp] {
        &self.ops
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check every op against the current tree. Adding a member whose name is
    /// already declared is allowed (the old declaration is replaced in place);
    /// adding the same name twice within one batch is not. A `Replace` consumes
    /// its target, so later ops may not anchor on it.
    pub fn validate(&self, arena: &ClassArena) -> Result<(), EditError> {
        let mut new_fields: FxHashSet<(ClassId, &str)> = FxHashSet::default();
        let mut new_methods: FxHashSet<(ClassId, &str)> = FxHashSet::default();
        let mut new_classes: FxHashSet<(ClassId, &str)> = FxHashSet::default();
        let mut consumed: FxHashSet<StmtId> = FxHashSet::default();

        for op in &self.ops {
            match op {
                EditOp::AddField { class, field } => {
                    let name = arena.field(*field).name.as_str();
                    if !new_fields.insert((*class, name)) {
                        return Err(EditError::DuplicateField(name.to_string()));
                    }
                }
                EditOp::AddMethod { class, method } => {
                    let name = arena.method(*method).name.as_str();
                    if !new_methods.insert((*class, name)) {
                        return Err(EditError::DuplicateMethod(name.to_string()));
                    }
                }
                EditOp::AddClass { parent, class } => {
                    let name = arena.class(*class).name.as_str();
                    if !new_classes.insert((*parent, name)) {
                        return Err(EditError::DuplicateClass(name.to_string()));
                    }
                }
                EditOp::InsertAfter { method, anchor, .. }
                | EditOp::InsertBefore { method, anchor, .. } => {
                    check_anchor(arena, *method, *anchor, &consumed)?;
                }
                EditOp::Replace { method, target, .. } => {
                    check_anchor(arena, *method, *target, &consumed)?;
                    consumed.insert(*target);
                }
            }
        }
        Ok(())
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Validate, then commit every op in order. Returns the number of ops
    /// applied. On error nothing has been mutated.
    pub fn apply(self, arena: &mut ClassArena) -> Result<usize, EditError> {
        self.validate(arena)?;
        let count = self.ops.len();
        for op in self.ops {
            match op {
                EditOp::AddField { class, field } => {
                    let name = arena.field(field).name.clone();
                    attach_member(arena, class, Member::Field(field), |a, m| match m {
                        Member::Field(id) => a.field(*id).name == name,
                        _ => false,
                    });
                }
                EditOp::AddMethod { class, method } => {
                    let name = arena.method(method).name.clone();
                    attach_member(arena, class, Member::Method(method), |a, m| match m {
                        Member::Method(id) => a.method(*id).name == name,
                        _ => false,
                    });
                }
                EditOp::AddClass { parent, class } => {
                    let name = arena.class(class).name.clone();
                    attach_member(arena, parent, Member::Class(class), |a, m| match m {
                        Member::Class(id) => a.class(*id).name == name,
                        _ => false,
                    });
                }
                EditOp::InsertAfter { method, anchor, stmts } => {
                    if let Some(pos) = position_in_body(arena, method, anchor) {
                        arena
                            .method_mut(method)
                            .body
                            .splice(pos + 1..pos + 1, stmts);
                    }
                }
                EditOp::InsertBefore { method, anchor, stmts } => {
                    if let Some(pos) = position_in_body(arena, method, anchor) {
                        arena.method_mut(method).body.splice(pos..pos, stmts);
                    }
                }
                EditOp::Replace { method, target, stmt } => {
                    if let Some(pos) = position_in_body(arena, method, target) {
                        arena.method_mut(method).body[pos] = stmt;
                    }
                }
            }
        }
        Ok(count)
    }
}

fn check_anchor(
    arena: &ClassArena,
    method: MethodId,
    anchor: StmtId,
    consumed: &FxHashSet<StmtId>,
) -> Result<(), EditError> {
    let decl = arena.method(method);
    if consumed.contains(&anchor) || !decl.body.contains(&anchor) {
        return Err(EditError::AnchorNotFound(decl.name.clone()));
    }
    Ok(())
}

/// Attach a member to a class body. If a member of the same kind and name is
/// already declared, the new node takes over its slot so the class keeps its
/// member order across repeated generation runs.
fn attach_member(
    arena: &mut ClassArena,
    class: ClassId,
    member: Member,
    matches: impl Fn(&ClassArena, &Member) -> bool,
) {
    let existing = arena
        .class(class)
        .members
        .iter()
        .position(|m| matches(arena, m));
    let members = &mut arena.class_mut(class).members;
    match existing {
        Some(pos) => members[pos] = member,
        None => members.push(member),
    }
}

fn position_in_body(arena: &ClassArena, method: MethodId, stmt: StmtId) -> Option<usize> {
    arena.method(method).body.iter().position(|&s| s == stmt)
}
