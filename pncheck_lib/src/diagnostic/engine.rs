use super::{Code, Diagnostic, DiagnosticBuilder, Level, Span};
use crate::util::Ice;

/// The sink analysis passes report into.
///
/// Message templates are registered once with [`custom_diag_id`] and afterwards reported by
/// their [`Code`]. Every report is appended right away, in the order it was made.
///
/// [`custom_diag_id`]: DiagnosticsEngine::custom_diag_id
#[derive(Debug, Default)]
pub struct DiagnosticsEngine {
    templates: Vec<(Level, String)>,
    reported: Vec<Diagnostic>,
    warnings_as_errors: bool,
}

impl DiagnosticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every warning as an error.
    pub fn with_warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }

    /// Registers a message template with the given level and returns the code to report it
    /// with. Registering the same template twice returns the same code.
    pub fn custom_diag_id(&mut self, level: Level, message: &str) -> Code {
        let index = match self
            .templates
            .iter()
            .position(|(l, m)| *l == level && m == message)
        {
            Some(index) => index,
            None => {
                self.templates.push((level, message.to_owned()));
                self.templates.len() - 1
            }
        };
        let id = u16::try_from(index).ice();
        Code::Custom(id)
    }

    /// Reports the template registered under `code` at `span`.
    ///
    /// # Panics
    ///
    /// Panics if `code` was not handed out by [`custom_diag_id`] of this engine.
    ///
    /// [`custom_diag_id`]: DiagnosticsEngine::custom_diag_id
    pub fn report(&mut self, span: impl Into<Span>, code: Code) {
        let Code::Custom(id) = code else {
            panic!("ICE: only custom codes can be reported through the engine, got {code:?}");
        };
        let (level, message) = self
            .templates
            .get(usize::from(id))
            .cloned()
            .ok_or("reported a code this engine never handed out")
            .ice();

        let level = match level {
            Level::Warning if self.warnings_as_errors => Level::Error,
            level => level,
        };

        self.reported
            .push(DiagnosticBuilder::new(span).build_custom(code, level, message));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.reported
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.reported
    }
}
