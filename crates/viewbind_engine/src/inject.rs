//! Generation orchestration.
//!
//! [`InjectionEngine`] turns an element list into one atomic edit batch
//! against a parsed compilation unit: fields, the lookup and listener
//! methods, click dispatch, and either lifecycle wiring or a nested holder
//! type. Running the engine twice over its own output is a no-op apart from
//! regenerated method bodies.

use thiserror::Error;
use tracing::info;
use viewbind_ast::{ClassArena, ClassId, EditBatch, EditError, EditOp, Stmt};
use viewbind_model::{click_count, used_count, Element};

use crate::anchor::{self, AnchorPlan};
use crate::binding;
use crate::classify::{ClassTable, Variant};
use crate::synth;

#[derive(Debug, Error)]
pub enum InjectError {
    #[error(transparent)]
    Edit(#[from] EditError),
}

/// What one engine run did to the target class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No binding adapter is available; nothing was generated.
    Aborted,
    /// A nested holder type was generated.
    HolderGenerated,
    /// Wiring calls were inserted at an existing lifecycle anchor.
    AnchorPatched,
    /// The lifecycle method was absent and a stub carrying the wiring was
    /// generated.
    StubCreated,
    /// The idempotency marker was already present; bodies were regenerated
    /// but no wiring call was inserted.
    AlreadyWired,
    /// The lifecycle method exists but offers no anchor statement; bodies
    /// were regenerated but no wiring call was inserted.
    NoAnchor,
    /// The class is neither activity-like nor fragment-like; only fields and
    /// click dispatch were generated.
    Skipped,
}

/// Summary of one engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionReport {
    pub outcome: Outcome,
    /// Fields generated (the used element count).
    pub fields_injected: usize,
    /// Click dispatch cases generated.
    pub click_cases: usize,
}

impl InjectionReport {
    /// The user-facing one-line summary.
    pub fn summary(&self, target: &str) -> String {
        format!(
            "{} injections and {} onClick added to {}",
            self.fields_injected, self.click_cases, target
        )
    }
}

/// The resolved shape of a run before any edit is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub variant: Variant,
    pub anchor: AnchorPlan,
    pub has_fields_to_inject: bool,
    pub has_clicks: bool,
    /// Lookups resolve through a passed root view instead of the enclosing
    /// type's own `findViewById`.
    pub has_root_view: bool,
}

/// One generation run over one class.
pub struct InjectionEngine<'a> {
    arena: &'a mut ClassArena,
    class: ClassId,
    elements: &'a [Element],
    table: ClassTable,
    create_holder: bool,
}

impl<'a> InjectionEngine<'a> {
    pub fn new(arena: &'a mut ClassArena, class: ClassId, elements: &'a [Element]) -> Self {
        Self {
            arena,
            class,
            elements,
            table: ClassTable::default(),
            create_holder: false,
        }
    }

    /// Replace the default classification table.
    pub fn with_table(mut self, table: ClassTable) -> Self {
        self.table = table;
        self
    }

    /// Generate a nested holder type instead of lifecycle wiring.
    pub fn with_holder_mode(mut self, create_holder: bool) -> Self {
        self.create_holder = create_holder;
        self
    }

    /// Resolve variant and anchor without touching the tree.
    pub fn plan(&self, marker: &str) -> GenerationPlan {
        let variant = if self.create_holder {
            Variant::Holder
        } else {
            self.table.classify(self.arena, self.class)
        };
        let anchor = match variant {
            Variant::Activity => anchor::resolve_activity(self.arena, self.class, marker),
            Variant::Fragment => anchor::resolve_fragment(self.arena, self.class, marker),
            Variant::Holder | Variant::Other => AnchorPlan::NoAnchor,
        };
        GenerationPlan {
            variant,
            anchor,
            has_fields_to_inject: used_count(self.elements) > 0,
            has_clicks: click_count(self.elements) > 0,
            has_root_view: variant == Variant::Fragment,
        }
    }

    /// Plan, synthesize, and commit one batch. The tree is unchanged on error.
    pub fn run(self) -> Result<InjectionReport, InjectError> {
        let Some(adapter) = binding::find_adapter() else {
            info!("no binding adapter available, aborting");
            return Ok(InjectionReport {
                outcome: Outcome::Aborted,
                fields_injected: 0,
                click_cases: 0,
            });
        };
        let plan = self.plan(adapter.marker());
        info!(
            adapter = adapter.name(),
            variant = ?plan.variant,
            fields = used_count(self.elements),
            clicks = click_count(self.elements),
            "planned generation"
        );
        if plan.variant == Variant::Holder {
            self.run_holder()
        } else {
            self.run_wiring(plan)
        }
    }

    fn run_holder(mut self) -> Result<InjectionReport, InjectError> {
        let holder = synth::holder_class(self.arena, self.elements);
        let mut batch = EditBatch::new();
        batch.push(EditOp::AddClass {
            parent: self.class,
            class: holder,
        });
        batch.apply(self.arena)?;
        Ok(self.report(Outcome::HolderGenerated))
    }

    fn run_wiring(mut self, plan: GenerationPlan) -> Result<InjectionReport, InjectError> {
        let mut batch = EditBatch::new();
        for id in synth::fields(self.arena, self.elements) {
            batch.push(EditOp::AddField {
                class: self.class,
                field: id,
            });
        }

        let outcome = if plan.variant == Variant::Other {
            Outcome::Skipped
        } else {
            match plan.anchor.clone() {
                AnchorPlan::CreateStub => {
                    let stub = if plan.variant == Variant::Activity {
                        synth::activity_stub(self.arena, plan.has_clicks)
                    } else {
                        synth::fragment_stub(self.arena, plan.has_clicks)
                    };
                    batch.push(EditOp::AddMethod {
                        class: self.class,
                        method: stub,
                    });
                    self.add_wiring_methods(&mut batch, plan.has_root_view, plan.has_clicks);
                    Outcome::StubCreated
                }
                AnchorPlan::AlreadyWired { .. } => {
                    self.add_lookup(&mut batch, plan.has_root_view);
                    Outcome::AlreadyWired
                }
                AnchorPlan::NoAnchor => {
                    self.add_lookup(&mut batch, plan.has_root_view);
                    Outcome::NoAnchor
                }
                AnchorPlan::After { method, anchor } => {
                    let mut calls = vec![self
                        .arena
                        .alloc_stmt(Stmt::expr(format!("{}()", synth::LOOKUP_METHOD)))];
                    if plan.has_clicks {
                        calls.push(
                            self.arena
                                .alloc_stmt(Stmt::expr(format!("{}()", synth::LISTENER_METHOD))),
                        );
                    }
                    batch.push(EditOp::InsertAfter {
                        method,
                        anchor,
                        stmts: calls,
                    });
                    self.add_wiring_methods(&mut batch, plan.has_root_view, plan.has_clicks);
                    Outcome::AnchorPatched
                }
                AnchorPlan::BeforeReturn {
                    method,
                    anchor,
                    returned,
                    inflates,
                } => {
                    let mut stmts = Vec::new();
                    let root = if inflates {
                        stmts.push(self.arena.alloc_stmt(Stmt::Local {
                            ty: "android.view.View".to_string(),
                            name: "view".to_string(),
                            init: Some(returned),
                        }));
                        "view".to_string()
                    } else {
                        returned
                    };
                    stmts.push(
                        self.arena
                            .alloc_stmt(Stmt::expr(format!("{}({root})", synth::LOOKUP_METHOD))),
                    );
                    if plan.has_clicks {
                        stmts.push(
                            self.arena
                                .alloc_stmt(Stmt::expr(format!("{}()", synth::LISTENER_METHOD))),
                        );
                    }
                    batch.push(EditOp::InsertBefore {
                        method,
                        anchor,
                        stmts,
                    });
                    if inflates {
                        let ret = self.arena.alloc_stmt(Stmt::Return {
                            expr: Some("view".to_string()),
                        });
                        batch.push(EditOp::Replace {
                            method,
                            target: anchor,
                            stmt: ret,
                        });
                    }
                    self.add_wiring_methods(&mut batch, plan.has_root_view, plan.has_clicks);
                    Outcome::AnchorPatched
                }
            }
        };

        if plan.has_clicks {
            let click = synth::click_method(self.arena, self.elements);
            batch.push(EditOp::AddMethod {
                class: self.class,
                method: click,
            });
        }

        batch.apply(self.arena)?;
        Ok(self.report(outcome))
    }

    /// Lookup method only. Used on the paths that insert no wiring call, so
    /// a stale listener method is never regenerated there.
    fn add_lookup(&mut self, batch: &mut EditBatch, has_root_view: bool) {
        let lookup = synth::lookup_method(self.arena, self.elements, has_root_view);
        batch.push(EditOp::AddMethod {
            class: self.class,
            method: lookup,
        });
    }

    fn add_wiring_methods(&mut self, batch: &mut EditBatch, has_root_view: bool, clicks: bool) {
        self.add_lookup(batch, has_root_view);
        if clicks {
            let listener = synth::listener_method(self.arena, self.elements);
            batch.push(EditOp::AddMethod {
                class: self.class,
                method: listener,
            });
        }
    }

    fn report(&self, outcome: Outcome) -> InjectionReport {
        let report = InjectionReport {
            outcome,
            fields_injected: used_count(self.elements),
            click_cases: click_count(self.elements),
        };
        info!(
            outcome = ?report.outcome,
            fields = report.fields_injected,
            clicks = report.click_cases,
            class = %self.arena.class(self.class).name,
            "generation committed"
        );
        report
    }
}
