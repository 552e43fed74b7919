//! Printer integration tests.
//!
//! Sources already in the printer's normalized form must survive a
//! parse-print cycle byte for byte, and one cycle must be a fixed point for
//! anything the parser accepts.

use viewbind_parser::parse;
use viewbind_printer::print_unit;

/// Helper: one parse-print cycle.
fn cycle(source: &str) -> String {
    match parse(source) {
        Ok(arena) => print_unit(&arena),
        Err(err) => panic!("parse failed: {err}\nsource:\n{source}"),
    }
}

/// Helper: assert the source is a fixed point of the cycle.
fn assert_round_trip(source: &str) {
    assert_eq!(cycle(source), source);
}

// ============================================================================
// Byte-exact round trips
// ============================================================================

#[test]
fn test_normalized_activity_round_trips() {
    assert_round_trip(
        r#"package com.example.app;

import android.app.Activity;
import android.os.Bundle;
import android.widget.TextView;

public class MainActivity extends Activity {
    private TextView mTitle;
    private TextView mBody;

    @Override
    protected void onCreate(Bundle savedInstanceState) {
        super.onCreate(savedInstanceState);
        setContentView(R.layout.activity_main);
        mTitle = (TextView) findViewById(R.id.title);
    }
}
"#,
    );
}

#[test]
fn test_anonymous_listener_round_trips() {
    assert_round_trip(
        r#"package com.example;

public class F {
    void wire() {
        mSend.setOnClickListener(new View.OnClickListener() {
            @Override
            public void onClick(View v) {
                submit();
            }
        });
    }
}
"#,
    );
}

#[test]
fn test_multiline_field_initializer_round_trips() {
    assert_round_trip(
        r#"package com.example;

class Tables {
    private int[] table = {
        1, 2, 3
    };
}
"#,
    );
}

#[test]
fn test_verbatim_members_round_trip() {
    assert_round_trip(
        r#"package com.example;

public class Host {
    public interface Callback {
        void onDone(int code);
    }

    static {
        init();
    }
}
"#,
    );
}

#[test]
fn test_constructor_and_throws_round_trip() {
    assert_round_trip(
        r#"package com.example;

class ViewHolder {
    View itemView;

    ViewHolder(View itemView) throws IllegalStateException {
        this.itemView = itemView;
    }
}
"#,
    );
}

#[test]
fn test_comments_round_trip() {
    assert_round_trip(
        r#"// Copyright 2019 Example.
package com.example;

/**
 * Screen controller.
 */
public class MainActivity {
    // title widget
    private TextView mTitle;

    void onCreate() {
        // bind first
        init();
    }

    // end of class
}
"#,
    );
}

#[test]
fn test_nested_class_round_trips() {
    assert_round_trip(
        r#"package com.example;

public class Outer {
    private int count;

    public static class Inner extends Base<Item> {
        void run() {
            count++;
        }
    }
}
"#,
    );
}

// ============================================================================
// Normalization
// ============================================================================

#[test]
fn test_messy_indentation_is_normalized() {
    let src = r#"package com.example;
public class Messy extends Base {
  int a=1;
    void run(){
            go( 1,2 );
        if (a == 1)
        {
            stop();
        }
    }
}
"#;
    let expected = r#"package com.example;

public class Messy extends Base {
    int a = 1;

    void run() {
        go( 1,2 );
        if (a == 1)
        {
            stop();
        }
    }
}
"#;
    assert_eq!(cycle(src), expected);
}

#[test]
fn test_cycle_is_idempotent() {
    let src = r#"package com.example;
class Tight { int x;
  void go() { run();
    if (x > 0) { stop(); } } }
"#;
    let once = cycle(src);
    assert_eq!(cycle(&once), once);
}

#[test]
fn test_statement_block_is_reindented() {
    let src = r#"class Tight {
  void go() {
    for (int i = 0; i < 3; i++) {
        step(i);
    }
  }
}
"#;
    let expected = r#"class Tight {
    void go() {
        for (int i = 0; i < 3; i++) {
            step(i);
        }
    }
}
"#;
    assert_eq!(cycle(src), expected);
}
