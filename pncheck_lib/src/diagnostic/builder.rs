use super::{Code, Diagnostic, Level, Span};

impl DiagnosticBuilder {
    pub fn new(span: impl Into<Span>) -> Self {
        Self { span: span.into() }
    }

    pub(crate) fn build_custom(self, code: Code, level: Level, message: String) -> Diagnostic {
        Diagnostic {
            code,
            level,
            message,
            main_span: self.span,
        }
    }

    /// Input the parser could not fit into the grammar. Tree-sitter recovers around it, so this
    /// is only a warning unless upgraded.
    pub fn build_syntax_error(self) -> Diagnostic {
        self.build_custom(
            Code::SyntaxError,
            Level::Warning,
            "unexpected input, skipped by the parser".to_owned(),
        )
    }

    pub fn build_missing_token(self, expected: &str) -> Diagnostic {
        self.build_custom(
            Code::MissingToken,
            Level::Warning,
            format!("expected `{expected}`"),
        )
    }
}

pub struct DiagnosticBuilder {
    span: Span,
}
