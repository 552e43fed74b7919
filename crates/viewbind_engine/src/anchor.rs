//! Anchor discovery inside lifecycle methods.
//!
//! The resolver never mutates; it reads the target method and reports where
//! wiring statements belong, or why none do. Marker detection is a plain
//! substring check over expression statements, so a wired call survives
//! reformatting and argument changes.

use tracing::debug;
use viewbind_ast::{ClassArena, ClassId, MethodId, Stmt, StmtId};

/// Where wiring statements go for one target method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorPlan {
    /// Lifecycle method absent: synthesize a stub.
    CreateStub,
    /// Idempotency marker present: skip statement insertion.
    AlreadyWired { method: MethodId },
    /// Insert immediately after this statement.
    After { method: MethodId, anchor: StmtId },
    /// Insert immediately before this return statement.
    BeforeReturn {
        method: MethodId,
        anchor: StmtId,
        /// The returned expression text.
        returned: String,
        /// Whether the expression inflates a layout. When true the return
        /// itself gets rewritten to hand back a fresh root-view local.
        inflates: bool,
    },
    /// Method present but no usable anchor statement; wiring is skipped.
    NoAnchor,
}

/// Resolve the Activity anchor: the first `onCreate` statement whose full
/// dotted callee is `setContentView`. `this.setContentView(...)` does not
/// match.
pub fn resolve_activity(arena: &ClassArena, class: ClassId, marker: &str) -> AnchorPlan {
    let Some(method) = arena.find_method(class, "onCreate") else {
        debug!("onCreate absent, planning stub");
        return AnchorPlan::CreateStub;
    };
    if arena.method_contains(method, marker) {
        debug!("onCreate already wired");
        return AnchorPlan::AlreadyWired { method };
    }
    for &stmt in &arena.method(method).body {
        if arena.stmt(stmt).is_call_to("setContentView") {
            debug!("anchoring after setContentView");
            return AnchorPlan::After { method, anchor: stmt };
        }
    }
    debug!("no setContentView call, wiring skipped");
    AnchorPlan::NoAnchor
}

/// Resolve the Fragment anchor: the first `onCreateView` return statement
/// that returns an expression.
pub fn resolve_fragment(arena: &ClassArena, class: ClassId, marker: &str) -> AnchorPlan {
    let Some(method) = arena.find_method(class, "onCreateView") else {
        debug!("onCreateView absent, planning stub");
        return AnchorPlan::CreateStub;
    };
    if arena.method_contains(method, marker) {
        debug!("onCreateView already wired");
        return AnchorPlan::AlreadyWired { method };
    }
    for &stmt in &arena.method(method).body {
        if let Stmt::Return {
            expr: Some(returned),
        } = arena.stmt(stmt)
        {
            let inflates = returned.contains("R.layout");
            debug!(inflates, "anchoring before first return");
            return AnchorPlan::BeforeReturn {
                method,
                anchor: stmt,
                returned: returned.clone(),
                inflates,
            };
        }
    }
    debug!("no return statement, wiring skipped");
    AnchorPlan::NoAnchor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(source: &str, fragment: bool) -> AnchorPlan {
        let arena = viewbind_parser::parse(source).expect("parse failed");
        let root = arena.root().expect("no class");
        if fragment {
            resolve_fragment(&arena, root, "findView(")
        } else {
            resolve_activity(&arena, root, "findView(")
        }
    }

    #[test]
    fn test_missing_on_create_plans_stub() {
        let plan = resolve("class A extends Activity {}", false);
        assert_eq!(plan, AnchorPlan::CreateStub);
    }

    #[test]
    fn test_set_content_view_becomes_anchor() {
        let src = r#"
class A {
    void onCreate(Bundle state) {
        super.onCreate(state);
        setContentView(R.layout.main);
        init();
    }
}
"#;
        assert!(matches!(resolve(src, false), AnchorPlan::After { .. }));
    }

    #[test]
    fn test_qualified_content_view_call_does_not_match() {
        let src = r#"
class A {
    void onCreate(Bundle state) {
        this.setContentView(R.layout.main);
    }
}
"#;
        assert_eq!(resolve(src, false), AnchorPlan::NoAnchor);
    }

    #[test]
    fn test_marker_short_circuits_anchor_search() {
        let src = r#"
class A {
    void onCreate(Bundle state) {
        setContentView(R.layout.main);
        findView();
    }
}
"#;
        assert!(matches!(resolve(src, false), AnchorPlan::AlreadyWired { .. }));
    }

    #[test]
    fn test_lookup_by_id_is_not_the_marker() {
        // findViewById( does not contain the marker text findView(
        let src = r#"
class A {
    void onCreate(Bundle state) {
        setContentView(R.layout.main);
        mTitle = (TextView) findViewById(R.id.title);
    }
}
"#;
        assert!(matches!(resolve(src, false), AnchorPlan::After { .. }));
    }

    #[test]
    fn test_inflating_return_is_detected() {
        let src = r#"
class F {
    View onCreateView(LayoutInflater inflater, ViewGroup container, Bundle state) {
        return inflater.inflate(R.layout.fragment_main, container, false);
    }
}
"#;
        match resolve(src, true) {
            AnchorPlan::BeforeReturn {
                returned, inflates, ..
            } => {
                assert!(inflates);
                assert_eq!(
                    returned,
                    "inflater.inflate(R.layout.fragment_main, container, false)"
                );
            }
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn test_view_variable_return_is_not_inflating() {
        let src = r#"
class F {
    View onCreateView(LayoutInflater inflater, ViewGroup container, Bundle state) {
        View root = build();
        return root;
    }
}
"#;
        match resolve(src, true) {
            AnchorPlan::BeforeReturn {
                returned, inflates, ..
            } => {
                assert!(!inflates);
                assert_eq!(returned, "root");
            }
            other => panic!("unexpected plan: {other:?}"),
        }
    }

    #[test]
    fn test_method_without_return_has_no_anchor() {
        let src = r#"
class F {
    View onCreateView(LayoutInflater inflater, ViewGroup container, Bundle state) {
        prepare();
    }
}
"#;
        assert_eq!(resolve(src, true), AnchorPlan::NoAnchor);
    }
}
