//! vbind: view-binding generator for Java sources.
//!
//! Usage:
//!   vbind [options] <FILE> --elements <JSON>
//!
//! Reads a Java compilation unit and a JSON element list, wires the bindings
//! into the primary class, and writes the result to stdout or back in place.

use clap::Parser as ClapParser;
use std::fs;
use std::path::Path;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use viewbind_engine::{ClassTable, InjectionEngine, Outcome};
use viewbind_model::Element;
use viewbind_parser::parse;
use viewbind_printer::print_unit;

#[derive(ClapParser, Debug)]
#[command(name = "vbind", about = "vbind - view-binding boilerplate generator for Java")]
struct Cli {
    /// Java source file to rewrite.
    #[arg(value_name = "FILE")]
    file: String,

    /// JSON file holding the element list.
    #[arg(short = 'e', long, value_name = "JSON")]
    elements: String,

    /// JSON file overriding the class ancestry table.
    #[arg(long = "class-table", value_name = "JSON")]
    class_table: Option<String>,

    /// Generate a nested ViewHolder instead of lifecycle wiring.
    #[arg(long)]
    holder: bool,

    /// Rewrite FILE instead of printing to stdout.
    #[arg(short = 'i', long = "in-place")]
    in_place: bool,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            print_error(&format!("failed to read '{}': {}", cli.file, e));
            return 1;
        }
    };
    let elements = match load_elements(&cli.elements) {
        Ok(elements) => elements,
        Err(message) => {
            print_error(&message);
            return 1;
        }
    };
    let table = match &cli.class_table {
        Some(path) => match load_table(path) {
            Ok(table) => table,
            Err(message) => {
                print_error(&message);
                return 1;
            }
        },
        None => ClassTable::default(),
    };

    let mut arena = match parse(&source) {
        Ok(arena) => arena,
        Err(e) => {
            print_error(&format!("{}: {}", cli.file, e));
            return 1;
        }
    };
    let Some(class) = arena.root() else {
        print_error(&format!("{}: no class declaration found", cli.file));
        return 1;
    };

    let report = match InjectionEngine::new(&mut arena, class, &elements)
        .with_table(table)
        .with_holder_mode(cli.holder)
        .run()
    {
        Ok(report) => report,
        Err(e) => {
            print_error(&format!("{}: {}", cli.file, e));
            return 1;
        }
    };
    if report.outcome == Outcome::Aborted {
        print_error("no binding adapter available");
        return 1;
    }

    let output = print_unit(&arena);
    if cli.in_place {
        if let Err(e) = fs::write(&cli.file, &output) {
            print_error(&format!("failed to write '{}': {}", cli.file, e));
            return 1;
        }
    } else {
        print!("{output}");
    }

    let name = Path::new(&cli.file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.file.clone());
    print_status(&report.summary(&name));
    match report.outcome {
        Outcome::AlreadyWired => print_status("already wired, method bodies regenerated"),
        Outcome::NoAnchor => print_status("no anchor statement found, wiring call skipped"),
        Outcome::Skipped => print_status("class has no known lifecycle, wiring skipped"),
        _ => {}
    }
    0
}

fn load_elements(path: &str) -> Result<Vec<Element>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{path}': {e}"))?;
    let elements: Vec<Element> = serde_json::from_str(&text)
        .map_err(|e| format!("invalid element list '{path}': {e}"))?;
    debug!(count = elements.len(), "loaded element list");
    Ok(elements)
}

fn load_table(path: &str) -> Result<ClassTable, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read '{path}': {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid class table '{path}': {e}"))
}

fn print_status(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{}{}{}", GRAY, msg, RESET);
    } else {
        eprintln!("{}", msg);
    }
}

fn print_error(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn atty_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true
    }
}
