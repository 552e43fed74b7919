//! Parser integration tests.
//!
//! Verifies that Java source is read into the arena with the structure the
//! rewriting passes rely on, and that comments and opaque constructs survive.

use viewbind_ast::{ClassArena, ClassId, Member, Modifiers, Stmt};
use viewbind_parser::{parse, ParseError};

/// Helper: parse source text, panicking with the error on failure.
fn parse_ok(source: &str) -> ClassArena {
    match parse(source) {
        Ok(arena) => arena,
        Err(err) => panic!("parse failed: {err}\nsource:\n{source}"),
    }
}

/// Helper: parse and return the arena together with its first top-level class.
fn parse_root(source: &str) -> (ClassArena, ClassId) {
    let arena = parse_ok(source);
    let root = arena.root().expect("no top-level class");
    (arena, root)
}

/// Helper: the body of a named method as cloned statements.
fn body_of(arena: &ClassArena, class: ClassId, name: &str) -> Vec<Stmt> {
    let method = arena.find_method(class, name).expect("method not found");
    arena.method(method).body.iter().map(|id| arena.stmt(*id).clone()).collect()
}

// ============================================================================
// Compilation unit structure
// ============================================================================

#[test]
fn test_parse_activity_skeleton() {
    let src = r#"
package com.example.app;

import android.app.Activity;
import android.os.Bundle;

public class MainActivity extends Activity {
    @Override
    protected void onCreate(Bundle savedInstanceState) {
        super.onCreate(savedInstanceState);
        setContentView(R.layout.activity_main);
    }
}
"#;
    let (arena, root) = parse_root(src);
    assert_eq!(arena.package.as_deref(), Some("com.example.app"));
    assert_eq!(arena.imports, vec!["android.app.Activity", "android.os.Bundle"]);

    let class = arena.class(root);
    assert_eq!(class.name, "MainActivity");
    assert_eq!(class.extends.as_deref(), Some("Activity"));
    assert!(class.modifiers.contains(Modifiers::PUBLIC));
    assert_eq!(class.members.len(), 1);

    let method = arena.find_method(root, "onCreate").expect("onCreate missing");
    let decl = arena.method(method);
    assert_eq!(decl.leading, vec!["@Override"]);
    assert_eq!(decl.return_type.as_deref(), Some("void"));
    assert_eq!(decl.params.len(), 1);
    assert_eq!(decl.params[0].ty, "Bundle");
    assert_eq!(decl.params[0].name, "savedInstanceState");
}

#[test]
fn test_parse_static_and_wildcard_imports() {
    let src = r#"
import static org.junit.Assert.assertEquals;
import java.util.*;

class Holder {}
"#;
    let arena = parse_ok(src);
    assert_eq!(
        arena.imports,
        vec!["static org.junit.Assert.assertEquals", "java.util.*"]
    );
}

#[test]
fn test_parse_implements_list() {
    let src = "class Widget extends Base implements Runnable, java.io.Serializable {}";
    let (arena, root) = parse_root(src);
    let class = arena.class(root);
    assert_eq!(class.implements, vec!["Runnable", "java.io.Serializable"]);
}

#[test]
fn test_parse_generic_class_header() {
    let src = "public abstract class Adapter<VH extends ViewHolder> extends Base<VH> {}";
    let (arena, root) = parse_root(src);
    let class = arena.class(root);
    assert_eq!(class.type_params.as_deref(), Some("<VH extends ViewHolder>"));
    assert_eq!(class.extends.as_deref(), Some("Base<VH>"));
    assert!(class.modifiers.contains(Modifiers::ABSTRACT));
}

// ============================================================================
// Members
// ============================================================================

#[test]
fn test_parse_fields_with_multiple_declarators() {
    let src = r#"
class Counters {
    private int hits = 1, misses = 2;
    private static final String TAG = "Counters";
}
"#;
    let (arena, root) = parse_root(src);
    let class = arena.class(root);
    assert_eq!(class.members.len(), 3);

    let hits = arena.field(arena.find_field(root, "hits").expect("hits"));
    assert_eq!(hits.ty, "int");
    assert_eq!(hits.init.as_deref(), Some("1"));

    let misses = arena.field(arena.find_field(root, "misses").expect("misses"));
    assert_eq!(misses.init.as_deref(), Some("2"));

    let tag = arena.field(arena.find_field(root, "TAG").expect("TAG"));
    assert!(tag.modifiers.contains(Modifiers::STATIC | Modifiers::FINAL));
    assert_eq!(tag.init.as_deref(), Some("\"Counters\""));
}

#[test]
fn test_parse_array_field_styles() {
    let src = r#"
class Arrays {
    int[] a;
    int b[];
    String[][] grid;
}
"#;
    let (arena, root) = parse_root(src);
    assert_eq!(arena.field(arena.find_field(root, "a").expect("a")).ty, "int[]");
    assert_eq!(arena.field(arena.find_field(root, "b").expect("b")).ty, "int[]");
    assert_eq!(arena.field(arena.find_field(root, "grid").expect("grid")).ty, "String[][]");
}

#[test]
fn test_parse_constructor_has_no_return_type() {
    let src = r#"
class ViewHolder {
    View itemView;

    public ViewHolder(View itemView) {
        this.itemView = itemView;
    }
}
"#;
    let (arena, root) = parse_root(src);
    let ctor = arena.method(arena.find_method(root, "ViewHolder").expect("ctor"));
    assert_eq!(ctor.return_type, None);
    assert_eq!(ctor.params[0].ty, "View");
}

#[test]
fn test_parse_method_with_throws_and_varargs() {
    let src = r#"
class Io {
    public String join(String sep, int... parts) throws java.io.IOException, RuntimeException {
        return sep;
    }
}
"#;
    let (arena, root) = parse_root(src);
    let method = arena.method(arena.find_method(root, "join").expect("join"));
    assert_eq!(method.params[1].ty, "int...");
    assert_eq!(method.throws, vec!["java.io.IOException", "RuntimeException"]);
}

#[test]
fn test_parse_generic_method_return_type() {
    let src = r#"
class Caster {
    <T extends View> T cast(View v) {
        return (T) v;
    }
}
"#;
    let (arena, root) = parse_root(src);
    let method = arena.method(arena.find_method(root, "cast").expect("cast"));
    assert_eq!(method.return_type.as_deref(), Some("<T extends View> T"));
}

#[test]
fn test_parse_abstract_method_without_body() {
    let src = r#"
public abstract class Shape {
    public abstract double area();
}
"#;
    let (arena, root) = parse_root(src);
    let method = arena.method(arena.find_method(root, "area").expect("area"));
    assert!(!method.has_body);
    assert!(method.body.is_empty());
}

#[test]
fn test_parse_annotated_parameter() {
    let src = r#"
class F {
    void bind(@NonNull final View root) {}
}
"#;
    let (arena, root) = parse_root(src);
    let method = arena.method(arena.find_method(root, "bind").expect("bind"));
    assert_eq!(method.params[0].ty, "@NonNull final View");
    assert_eq!(method.params[0].name, "root");
}

#[test]
fn test_parse_nested_class() {
    let src = r#"
public class Outer {
    private int count;

    public static class Inner extends Base {
        void run() {}
    }
}
"#;
    let (arena, root) = parse_root(src);
    let inner = arena.find_class(root, "Inner").expect("Inner");
    let decl = arena.class(inner);
    assert!(decl.modifiers.contains(Modifiers::STATIC));
    assert_eq!(decl.extends.as_deref(), Some("Base"));
    assert!(arena.find_method(inner, "run").is_some());
}

// ============================================================================
// Verbatim members
// ============================================================================

#[test]
fn test_nested_interface_is_kept_verbatim() {
    let src = r#"
class Host {
    public interface Callback {
        void onDone(int code);
    }
}
"#;
    let (arena, root) = parse_root(src);
    let class = arena.class(root);
    assert_eq!(class.members.len(), 1);
    match class.members[0] {
        Member::Raw(id) => match arena.stmt(id) {
            Stmt::Raw { text } => {
                assert!(text.starts_with("public interface Callback {"));
                assert!(text.contains("void onDone(int code);"));
                assert!(text.trim_end().ends_with('}'));
            }
            other => panic!("expected raw text, got {other:?}"),
        },
        other => panic!("expected raw member, got {other:?}"),
    }
}

#[test]
fn test_static_initializer_is_kept_verbatim() {
    let src = r#"
class Tables {
    static {
        load();
    }
}
"#;
    let (arena, root) = parse_root(src);
    let class = arena.class(root);
    assert_eq!(class.members.len(), 1);
    let Member::Raw(id) = class.members[0] else {
        panic!("expected raw member");
    };
    let Stmt::Raw { text } = arena.stmt(id) else {
        panic!("expected raw text");
    };
    assert!(text.starts_with("static {"));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_body_statements_are_classified() {
    let src = r#"
class F {
    void onCreate(Bundle state) {
        super.onCreate(state);
        View view = inflater.inflate(R.layout.main, container, false);
        if (view == null) {
            throw new IllegalStateException();
        }
        return;
    }
}
"#;
    let (arena, root) = parse_root(src);
    let body = body_of(&arena, root, "onCreate");
    assert_eq!(body.len(), 4);
    assert!(matches!(
        &body[0],
        Stmt::Expr { callee: Some(c), .. } if c == "super.onCreate"
    ));
    assert!(matches!(
        &body[1],
        Stmt::Local { ty, name, init: Some(_) } if ty == "View" && name == "view"
    ));
    assert!(matches!(&body[2], Stmt::Raw { .. }));
    assert_eq!(body[3], Stmt::Return { expr: None });
}

#[test]
fn test_anonymous_listener_is_one_statement() {
    let src = r#"
class F {
    void wire() {
        button.setOnClickListener(new View.OnClickListener() {
            @Override
            public void onClick(View v) {
                handle(v);
            }
        });
        done();
    }
}
"#;
    let (arena, root) = parse_root(src);
    let body = body_of(&arena, root, "wire");
    assert_eq!(body.len(), 2);
    let Stmt::Expr { text, callee } = &body[0] else {
        panic!("expected expression statement");
    };
    assert_eq!(callee.as_deref(), Some("button.setOnClickListener"));
    assert!(text.contains("public void onClick(View v)"));
    assert!(matches!(
        &body[1],
        Stmt::Expr { callee: Some(c), .. } if c == "done"
    ));
}

#[test]
fn test_for_loop_is_one_raw_statement() {
    let src = r#"
class F {
    void sum() {
        int total = 0;
        for (int i = 0; i < 10; i++) {
            total += i;
        }
    }
}
"#;
    let (arena, root) = parse_root(src);
    let body = body_of(&arena, root, "sum");
    assert_eq!(body.len(), 2);
    assert!(matches!(&body[1], Stmt::Raw { text } if text.starts_with("for (int i = 0;")));
}

#[test]
fn test_return_expression_is_captured() {
    let src = r#"
class F {
    View onCreateView(LayoutInflater inflater, ViewGroup container, Bundle state) {
        return inflater.inflate(R.layout.fragment_main, container, false);
    }
}
"#;
    let (arena, root) = parse_root(src);
    let body = body_of(&arena, root, "onCreateView");
    assert_eq!(
        body[0],
        Stmt::Return {
            expr: Some("inflater.inflate(R.layout.fragment_main, container, false)".to_string()),
        }
    );
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn test_comments_attach_to_declarations() {
    let src = r#"
// Copyright header.
package com.example;

/**
 * The main screen.
 */
public class MainActivity {
    // cached title view
    private TextView mTitle;

    void onCreate() {
        // wire views first
        init();
    }
}
"#;
    let (arena, root) = parse_root(src);
    assert_eq!(arena.header, vec!["// Copyright header."]);

    let class = arena.class(root);
    assert_eq!(class.leading.len(), 1);
    assert!(class.leading[0].starts_with("/**"));
    assert!(class.leading[0].contains("The main screen."));

    let field = arena.field(arena.find_field(root, "mTitle").expect("mTitle"));
    assert_eq!(field.leading, vec!["// cached title view"]);

    let body = body_of(&arena, root, "onCreate");
    assert_eq!(body.len(), 2);
    assert_eq!(
        body[0],
        Stmt::Comment {
            text: "// wire views first".to_string(),
        }
    );
}

#[test]
fn test_trailing_comment_before_class_close_survives() {
    let src = r#"
class F {
    void run() {}
    // end of members
}
"#;
    let (arena, root) = parse_root(src);
    let class = arena.class(root);
    assert_eq!(class.members.len(), 2);
    let Member::Raw(id) = class.members[1] else {
        panic!("expected trailing comment member");
    };
    assert_eq!(
        arena.stmt(id),
        &Stmt::Comment {
            text: "// end of members".to_string(),
        }
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_source_has_no_class() {
    assert!(matches!(parse("package com.example;"), Err(ParseError::NoClass)));
}

#[test]
fn test_top_level_interface_is_unsupported() {
    let err = parse("public interface Api {}").expect_err("should fail");
    assert!(matches!(err, ParseError::Unsupported { what: "interface", .. }));
}

#[test]
fn test_missing_class_name_reports_position() {
    let err = parse("class {").expect_err("should fail");
    match err {
        ParseError::Expected { expected, found, line, .. } => {
            assert_eq!(expected, "a class name");
            assert_eq!(found, "'{'");
            assert_eq!(line, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_unterminated_class_reports_eof() {
    let err = parse("class F {\n  void run() {}\n").expect_err("should fail");
    assert_eq!(
        err,
        ParseError::UnexpectedEof {
            context: "class 'F'".to_string(),
        }
    );
}

#[test]
fn test_unterminated_body_reports_method() {
    let err = parse("class F {\n  void run() {\n    go();\n").expect_err("should fail");
    assert_eq!(
        err,
        ParseError::UnexpectedEof {
            context: "the body of 'run'".to_string(),
        }
    );
}
