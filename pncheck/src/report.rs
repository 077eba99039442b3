use codespan_reporting::{
    diagnostic::{Label, Severity},
    term,
};
use is_terminal::IsTerminal;
use pncheck_lib::diagnostic::{AggregateResult, DiagnosticKind, Level};

pub fn eprint_aggregate<'files, T, F>(aggregate: &AggregateResult<T>, files: &'files F)
where
    F: codespan_reporting::files::Files<'files, FileId = ()>,
{
    let color = if std::io::stderr().is_terminal() {
        term::termcolor::ColorChoice::Auto
    } else {
        term::termcolor::ColorChoice::Never
    };
    let mut writer = term::termcolor::StandardStream::stderr(color);
    let config = term::Config {
        chars: term::Chars {
            single_primary_caret: '─',
            single_secondary_caret: '─',
            multi_primary_caret_start: '╯',
            multi_secondary_caret_start: '╯',
            multi_primary_caret_end: '╯',
            multi_secondary_caret_end: '╯',
            ..term::Chars::box_drawing()
        },

        ..Default::default()
    };

    for (t, d) in aggregate.diagnostics() {
        let severity = match (t, d.level()) {
            (DiagnosticKind::Err, _) | (_, Level::Error) => Severity::Error,
            (DiagnosticKind::Rec, Level::Warning) => Severity::Warning,
            (DiagnosticKind::Rec, Level::Note) => Severity::Note,
        };

        let diagnostic = codespan_reporting::diagnostic::Diagnostic::new(severity)
            .with_message(d.message())
            .with_code(d.code().to_string())
            .with_labels(vec![Label::primary((), *d.main_span())]);

        if let Err(e) = term::emit(&mut writer, &config, files, &diagnostic) {
            tracing::error!(target: "pncheck::report", error = %e, "failed to render diagnostic");
        }
    }
}
