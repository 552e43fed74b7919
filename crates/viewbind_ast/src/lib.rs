//! viewbind_ast: syntax tree for a single Java compilation unit.
//!
//! Nodes live in an index-based [`ClassArena`]; ids are plain indices into
//! the arena's pools. Newly built nodes stay detached until an [`EditBatch`]
//! attaches them, so a rejected batch leaves the tree untouched.

pub mod arena;
pub mod edit;
pub mod node;

pub use arena::ClassArena;
pub use edit::{EditBatch, EditError, EditOp};
pub use node::{
    ClassDecl, ClassId, FieldDecl, FieldId, Member, MethodDecl, MethodId, Modifiers, Param, Stmt,
    StmtId,
};
