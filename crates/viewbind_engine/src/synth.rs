//! Fragment synthesis.
//!
//! Builders for every generated shape: fields, the lookup method, click
//! dispatch, listener setup, the holder type, and the two lifecycle stubs.
//! Builders allocate detached nodes into the arena; attaching them is the
//! edit batch's job. Every builder consumes only the `used = true` subset
//! of the element list.

use tracing::trace;
use viewbind_ast::{
    ClassArena, ClassDecl, ClassId, FieldDecl, FieldId, Member, MethodDecl, MethodId, Modifiers,
    Param, Stmt,
};
use viewbind_model::Element;

/// Name of the generated lookup method.
pub const LOOKUP_METHOD: &str = "findView";
/// Name of the generated listener-setup method.
pub const LISTENER_METHOD: &str = "setListener";
/// Name of the generated holder type.
pub const HOLDER_CLASS: &str = "ViewHolder";

fn view_param(name: &str) -> Param {
    Param {
        ty: "android.view.View".to_string(),
        name: name.to_string(),
    }
}

/// One private field per used element.
pub fn fields(arena: &mut ClassArena, elements: &[Element]) -> Vec<FieldId> {
    let mut out = Vec::new();
    for element in elements.iter().filter(|e| e.used) {
        let decl = FieldDecl {
            leading: Vec::new(),
            modifiers: Modifiers::PRIVATE,
            ty: element.resolved_type(),
            name: element.field_name.clone(),
            init: None,
        };
        trace!(field = %decl.name, ty = %decl.ty, "synthesized field");
        out.push(arena.alloc_field(decl));
    }
    out
}

/// The `findView` lookup method. With a root view the lookups go through
/// `view.findViewById`, otherwise through the enclosing type's own
/// `findViewById`.
pub fn lookup_method(
    arena: &mut ClassArena,
    elements: &[Element],
    has_root_view: bool,
) -> MethodId {
    let receiver = if has_root_view { "view." } else { "" };
    let mut body = Vec::new();
    for element in elements.iter().filter(|e| e.used) {
        let text = format!(
            "{} = ({}){}findViewById({})",
            element.field_name,
            element.resolved_type(),
            receiver,
            element.full_id(),
        );
        body.push(arena.alloc_stmt(Stmt::expr(text)));
    }
    trace!(lookups = body.len(), has_root_view, "synthesized lookup method");
    let params = if has_root_view {
        vec![view_param("view")]
    } else {
        Vec::new()
    };
    arena.alloc_method(MethodDecl {
        leading: Vec::new(),
        modifiers: Modifiers::PRIVATE,
        return_type: Some("void".to_string()),
        name: LOOKUP_METHOD.to_string(),
        params,
        throws: Vec::new(),
        body,
        has_body: true,
    })
}

/// The `onClick` dispatch method: a switch on `view.getId()` with one
/// placeholder case per used clickable element.
pub fn click_method(arena: &mut ClassArena, elements: &[Element]) -> MethodId {
    let mut switch = String::from("switch (view.getId()) {\n");
    for element in elements.iter().filter(|e| e.used && e.click) {
        switch.push_str(&format!("    case {}:\n        break;\n", element.full_id()));
    }
    switch.push('}');
    trace!("synthesized click dispatch");
    let body = vec![arena.alloc_stmt(Stmt::Raw { text: switch })];
    arena.alloc_method(MethodDecl {
        leading: vec!["@Override".to_string()],
        modifiers: Modifiers::PUBLIC,
        return_type: Some("void".to_string()),
        name: "onClick".to_string(),
        params: vec![view_param("view")],
        throws: Vec::new(),
        body,
        has_body: true,
    })
}

/// The `setListener` method: binds each used clickable element's click
/// listener to the enclosing type.
pub fn listener_method(arena: &mut ClassArena, elements: &[Element]) -> MethodId {
    let mut body = Vec::new();
    for element in elements.iter().filter(|e| e.used && e.click) {
        let text = format!("{}.setOnClickListener(this)", element.field_name);
        body.push(arena.alloc_stmt(Stmt::expr(text)));
    }
    trace!(listeners = body.len(), "synthesized listener setup");
    arena.alloc_method(MethodDecl {
        leading: Vec::new(),
        modifiers: Modifiers::PRIVATE,
        return_type: Some("void".to_string()),
        name: LISTENER_METHOD.to_string(),
        params: Vec::new(),
        throws: Vec::new(),
        body,
        has_body: true,
    })
}

/// The nested `ViewHolder` type: one private field per used element and a
/// constructor binding each from the given root view. Static, so it cannot
/// capture the outer type.
pub fn holder_class(arena: &mut ClassArena, elements: &[Element]) -> ClassId {
    let mut members = Vec::new();
    for element in elements.iter().filter(|e| e.used) {
        let field = arena.alloc_field(FieldDecl {
            leading: Vec::new(),
            modifiers: Modifiers::PRIVATE,
            ty: element.resolved_type(),
            name: element.field_name.clone(),
            init: None,
        });
        members.push(Member::Field(field));
    }

    let mut body = Vec::new();
    for element in elements.iter().filter(|e| e.used) {
        let text = format!(
            "{} = ({})itemView.findViewById({})",
            element.field_name,
            element.resolved_type(),
            element.full_id(),
        );
        body.push(arena.alloc_stmt(Stmt::expr(text)));
    }
    let ctor = arena.alloc_method(MethodDecl {
        leading: Vec::new(),
        modifiers: Modifiers::NONE,
        return_type: None,
        name: HOLDER_CLASS.to_string(),
        params: vec![view_param("itemView")],
        throws: Vec::new(),
        body,
        has_body: true,
    });
    members.push(Member::Method(ctor));

    trace!("synthesized holder type");
    arena.alloc_class(ClassDecl {
        leading: Vec::new(),
        modifiers: Modifiers::STATIC,
        name: HOLDER_CLASS.to_string(),
        type_params: None,
        extends: None,
        implements: Vec::new(),
        members,
    })
}

/// Stub `onCreate` for an activity that has none yet.
pub fn activity_stub(arena: &mut ClassArena, with_listener: bool) -> MethodId {
    let mut body = vec![
        arena.alloc_stmt(Stmt::expr("super.onCreate(savedInstanceState)")),
        arena.alloc_stmt(Stmt::Comment {
            text: "// TODO: add setContentView(...) invocation".to_string(),
        }),
        arena.alloc_stmt(Stmt::expr(format!("{LOOKUP_METHOD}()"))),
    ];
    if with_listener {
        body.push(arena.alloc_stmt(Stmt::expr(format!("{LISTENER_METHOD}()"))));
    }
    trace!("synthesized onCreate stub");
    arena.alloc_method(MethodDecl {
        leading: vec!["@Override".to_string()],
        modifiers: Modifiers::PROTECTED,
        return_type: Some("void".to_string()),
        name: "onCreate".to_string(),
        params: vec![Param {
            ty: "android.os.Bundle".to_string(),
            name: "savedInstanceState".to_string(),
        }],
        throws: Vec::new(),
        body,
        has_body: true,
    })
}

/// Stub `onCreateView` for a fragment that has none yet. The stub declares
/// a `rootView` local from the delegated superclass call and returns it.
pub fn fragment_stub(arena: &mut ClassArena, with_listener: bool) -> MethodId {
    let mut body = vec![
        arena.alloc_stmt(Stmt::Comment {
            text: "// TODO: inflate a fragment view".to_string(),
        }),
        arena.alloc_stmt(Stmt::Local {
            ty: "android.view.View".to_string(),
            name: "rootView".to_string(),
            init: Some("super.onCreateView(inflater, container, savedInstanceState)".to_string()),
        }),
        arena.alloc_stmt(Stmt::expr(format!("{LOOKUP_METHOD}(rootView)"))),
    ];
    if with_listener {
        body.push(arena.alloc_stmt(Stmt::expr(format!("{LISTENER_METHOD}()"))));
    }
    body.push(arena.alloc_stmt(Stmt::Return {
        expr: Some("rootView".to_string()),
    }));
    trace!("synthesized onCreateView stub");
    arena.alloc_method(MethodDecl {
        leading: vec!["@Override".to_string()],
        modifiers: Modifiers::PUBLIC,
        return_type: Some("View".to_string()),
        name: "onCreateView".to_string(),
        params: vec![
            Param {
                ty: "android.view.LayoutInflater".to_string(),
                name: "inflater".to_string(),
            },
            Param {
                ty: "android.view.ViewGroup".to_string(),
                name: "container".to_string(),
            },
            Param {
                ty: "android.os.Bundle".to_string(),
                name: "savedInstanceState".to_string(),
            },
        ],
        throws: Vec::new(),
        body,
        has_body: true,
    })
}
