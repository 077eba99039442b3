use crate::{
    diagnostic::{AggregateResult, DiagnosticBuilder},
    settings::Language,
    util::Ice,
};
use tree_sitter::{Node, Parser, Tree};

pub fn parse_to_sexp(input: &str, language: Language) -> AggregateResult<String> {
    parse(input, language).map(|tree| tree.root_node().to_sexp())
}

/// Parses `input` into a concrete syntax tree.
///
/// Tree-sitter always produces a tree, recovering around input it doesn't understand. Every
/// spot where it had to do so is reported as a recoverable diagnostic.
pub fn parse(input: &str, language: Language) -> AggregateResult<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|e| format!("incompatible tree-sitter grammar: {e}"))
        .ice();

    let tree = parser
        .parse(input, None)
        .ok_or("tree-sitter gave up without a tree")
        .ice();

    let mut res = AggregateResult::new_ok(());
    if tree.root_node().has_error() {
        collect_syntax_errors(tree.root_node(), &mut res);
    }

    tracing::debug!(
        target: "pncheck::parse",
        %language,
        bytes = input.len(),
        syntax_errors = res.diagnostics().count(),
        "parsed source"
    );

    res.map(|_| tree)
}

fn collect_syntax_errors(node: Node<'_>, res: &mut AggregateResult<()>) {
    if node.is_missing() {
        let at = node.start_byte();
        res.add_rec_diagnostic(DiagnosticBuilder::new(at..at).build_missing_token(node.kind()));
        return;
    }
    if node.is_error() {
        res.add_rec_diagnostic(DiagnosticBuilder::new(node.byte_range()).build_syntax_error());
        return;
    }
    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_syntax_errors(child, res);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Code, DiagnosticKind, Span};

    #[test]
    fn clean_source_has_no_diagnostics() {
        let res = parse("void f(int a);\nvoid f(int a) { }\n", Language::C);
        assert!(res.is_ok());
    }

    #[test]
    fn garbage_is_recoverable() {
        let res = parse("void f(int a);\n@@@\nvoid g(void);\n", Language::C);

        assert!(res.is_rec());
        let codes: Vec<_> = res.diagnostics().map(|(k, d)| (k, *d.code())).collect();
        assert!(codes.contains(&(DiagnosticKind::Rec, Code::SyntaxError)));
    }

    #[test]
    fn syntax_errors_point_into_the_source() {
        let source = "void f(int a)\nvoid g(void);\n";
        let res = parse(source, Language::C);

        assert!(res.is_rec());
        for (_, d) in res.diagnostics() {
            let span: Span = *d.main_span();
            assert!(span.excl_end() <= source.len());
        }
    }

    #[test]
    fn sexp_names_the_root() {
        let sexp = parse_to_sexp("int x;", Language::C).into_value().unwrap();
        assert!(sexp.starts_with("(translation_unit"));
    }
}
