//! viewbind_engine: view-binding code generation over a parsed unit.
//!
//! The engine classifies the target class against a configurable ancestry
//! table, resolves the lifecycle anchor for the class variant, synthesizes
//! fields and methods from the element list, and commits everything as one
//! atomic edit batch. Re-running the engine over its own output regenerates
//! method bodies in place instead of duplicating them.

pub mod anchor;
pub mod binding;
pub mod classify;
pub mod inject;
pub mod synth;

pub use anchor::AnchorPlan;
pub use binding::{find_adapter, BindingAdapter, FindViewAdapter};
pub use classify::{ClassTable, Variant};
pub use inject::{GenerationPlan, InjectError, InjectionEngine, InjectionReport, Outcome};
