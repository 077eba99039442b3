use std::{fs, path::Path};

use pncheck_lib::{
    analyze::{analyze, AnalyzeOptsBuilder, Language},
    diagnostic::Level,
};

include! {concat!(env!("OUT_DIR"), "/tests.rs")}

/// A diagnostic as written in the header of a test file, positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Expected {
    level: Level,
    line: usize,
    col: usize,
    message: &'static str,
}

fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}

fn expect_test(file: &str, expected: Vec<Expected>) {
    let source = fs::read(file).unwrap();
    let source = String::from_utf8(source).unwrap();
    let language = Language::from_path(Path::new(file)).unwrap_or_default();

    let opts = AnalyzeOptsBuilder::new()
        .language(language)
        .strict_syntax()
        .build()
        .unwrap();
    let res = analyze(&source, file, &opts);

    if res.is_err() {
        println!("Expected `{file}` to be analyzed, but got these diagnostics:");
        for (t, d) in res.diagnostics() {
            println!("{t:?}: {d:?}");
        }
        panic!("analysis failed");
    }

    let found: Vec<_> = res
        .diagnostics()
        .map(|(_, d)| {
            let (line, col) = line_col(&source, d.main_span().start());
            (d.level(), line, col, d.message().as_str())
        })
        .collect();
    let expected: Vec<_> = expected
        .iter()
        .map(|e| (e.level, e.line, e.col, e.message))
        .collect();

    pretty_assertions::assert_eq!(
        found,
        expected,
        "The diagnostics (left) don't match the ones expected by `{}` (right)",
        file
    );
}
