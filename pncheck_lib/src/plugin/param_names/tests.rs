use super::*;
use crate::{
    decl::{Decl, DeclKind, FunctionKey, IdentNode, ParamDecl},
    diagnostic::Span,
    settings::Language,
};

/// Builds translation units where every parameter name gets a distinct span, so reports can be
/// traced back to the parameter they point at.
struct TuBuilder {
    tu: TranslationUnit,
    offset: usize,
}

impl TuBuilder {
    fn new() -> Self {
        Self {
            tu: TranslationUnit::new(Language::C),
            offset: 0,
        }
    }

    fn span(&mut self, len: usize) -> Span {
        let span = (self.offset..self.offset + len).into();
        self.offset += len + 1;
        span
    }

    fn function(&mut self, key: &str, params: &[Option<&str>], has_prototype: bool) -> DeclId {
        let ident = IdentNode {
            span: self.span(key.len()),
            data: key.to_owned(),
        };
        let params = params
            .iter()
            .map(|name| {
                let span = self.span(4);
                ParamDecl {
                    span,
                    ident: name.map(|n| IdentNode {
                        span: self.span(n.len()),
                        data: n.to_owned(),
                    }),
                }
            })
            .collect();
        let id = self.tu.add_decl(Decl {
            span: ident.span,
            kind: DeclKind::Function(FunctionDecl {
                ident,
                key: FunctionKey::new(key),
                params,
                has_prototype,
                is_definition: false,
                is_variadic: false,
            }),
            children: vec![],
        });
        self.tu.add_group(vec![id]);
        id
    }

    fn param_location(&self, decl: DeclId, index: usize) -> Span {
        self.tu.function(decl).unwrap().params[index].location()
    }
}

/// Runs the checker over every group, as the lowering pass would.
fn check(tu: &TranslationUnit) -> Vec<(Level, String, Span)> {
    let mut diags = DiagnosticsEngine::new();
    let mut consumer = FuncDeclConsumer::new(&mut diags);
    for group in tu.groups() {
        assert!(consumer.handle_top_level_decl(tu, group));
    }
    drop(consumer);

    diags
        .diagnostics()
        .iter()
        .map(|d| (d.level(), d.message().clone(), *d.main_span()))
        .collect()
}

#[track_caller]
fn assert_mismatches(tu: &TuBuilder, expected: &[(DeclId, DeclId, usize)]) {
    let expected: Vec<_> = expected
        .iter()
        .flat_map(|&(decl, prev, index)| {
            [
                (
                    Level::Warning,
                    MISMATCH_MESSAGE.to_owned(),
                    tu.param_location(decl, index),
                ),
                (
                    Level::Note,
                    PREVIOUS_MESSAGE.to_owned(),
                    tu.param_location(prev, index),
                ),
            ]
        })
        .collect();
    assert_eq!(check(&tu.tu), expected);
}

#[test]
fn same_names_are_fine() {
    let mut tu = TuBuilder::new();
    tu.function("f", &[Some("a")], true);
    tu.function("f", &[Some("a")], true);

    assert_mismatches(&tu, &[]);
}

#[test]
fn different_names_report_a_warning_and_a_note() {
    let mut tu = TuBuilder::new();
    let first = tu.function("f", &[Some("a")], true);
    let second = tu.function("f", &[Some("b")], true);

    assert_mismatches(&tu, &[(second, first, 0)]);
}

#[test]
fn underscore_names_are_exempt() {
    let mut tu = TuBuilder::new();
    tu.function("f", &[Some("_a"), Some("x")], true);
    tu.function("f", &[Some("_b"), Some("_x")], true);
    tu.function("g", &[Some("a")], true);
    tu.function("g", &[Some("_")], true);

    assert_mismatches(&tu, &[]);
}

#[test]
fn anonymous_parameters_are_exempt() {
    let mut tu = TuBuilder::new();
    tu.function("f", &[None, Some("y")], true);
    tu.function("f", &[Some("x"), None], true);
    tu.function("g", &[Some("")], true);
    tu.function("g", &[Some("z")], true);

    assert_mismatches(&tu, &[]);
}

#[test]
fn first_declaration_never_reports() {
    let mut tu = TuBuilder::new();
    tu.function("f", &[Some("a")], true);
    tu.function("g", &[Some("b")], true);

    assert_mismatches(&tu, &[]);
}

#[test]
fn declarations_without_prototype_are_skipped() {
    let mut tu = TuBuilder::new();
    tu.function("f", &[Some("a")], false);
    tu.function("f", &[Some("b")], true);
    tu.function("g", &[Some("a")], true);
    tu.function("g", &[Some("b")], false);

    assert_mismatches(&tu, &[]);
}

#[test]
fn only_the_nearest_previous_declaration_is_compared() {
    let mut tu = TuBuilder::new();
    let first = tu.function("f", &[Some("a")], true);
    let second = tu.function("f", &[Some("b")], true);
    tu.function("f", &[Some("b")], true);

    assert_mismatches(&tu, &[(second, first, 0)]);
}

#[test]
fn every_mismatching_position_is_reported_in_order() {
    let mut tu = TuBuilder::new();
    let first = tu.function("f", &[Some("a"), Some("b"), Some("c")], true);
    let second = tu.function("f", &[Some("x"), Some("b"), Some("y")], true);

    assert_mismatches(&tu, &[(second, first, 0), (second, first, 2)]);
}

#[test]
fn extra_parameters_are_not_compared() {
    let mut tu = TuBuilder::new();
    let first = tu.function("f", &[Some("a")], true);
    let second = tu.function("f", &[Some("b"), Some("c")], true);

    assert_mismatches(&tu, &[(second, first, 0)]);
}

#[test]
fn unrelated_functions_are_never_compared() {
    let mut tu = TuBuilder::new();
    tu.function("f", &[Some("a")], true);
    tu.function("g", &[Some("b")], true);
    tu.function("h", &[Some("c")], true);

    assert_mismatches(&tu, &[]);
}

#[test]
fn arguments_are_accepted_and_ignored() {
    let mut checker = ParameterNameChecker;
    assert!(checker.parse_args(&[]));
    assert!(checker.parse_args(&["anything".to_owned(), "--else".to_owned()]));
}

#[test]
fn templates_are_registered_once_per_consumer() {
    let mut diags = DiagnosticsEngine::new();
    let first = FuncDeclVisitor::new(&mut diags);
    let codes = (first.mismatch, first.previous);
    drop(first);
    let second = FuncDeclVisitor::new(&mut diags);

    assert_eq!(codes, (second.mismatch, second.previous));
    assert_ne!(second.mismatch, second.previous);
}
