use std::collections::HashSet;

use thiserror::Error;

pub use crate::settings::Language;
use crate::{
    diagnostic::{AggregateResult, Code, DiagnosticsEngine},
    inspectors, passes,
    plugin::{self, param_names, PluginAction},
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Only the diagnostics reported by the plugin, no output.
    Diagnostics,
    TreeSexp,
    DeclRustDbg,
    DeclDot,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Diagnostics => "diagnostics",
            OutputFormat::TreeSexp => "tree sexp",
            OutputFormat::DeclRustDbg => "decl rust dbg",
            OutputFormat::DeclDot => "decl dot",
        };
        write!(f, "{name}")
    }
}

pub struct AnalyzeOpts {
    output_format: OutputFormat,
    language: Language,
    plugin_name: &'static str,
    plugin: Box<dyn PluginAction>,
    warnings_as_errors: bool,
    upgrade_to_err: HashSet<Code>,
}

impl AnalyzeOpts {
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn plugin_name(&self) -> &'static str {
        self.plugin_name
    }
}

impl std::fmt::Debug for AnalyzeOpts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzeOpts")
            .field("output_format", &self.output_format)
            .field("language", &self.language)
            .field("plugin", &self.plugin_name)
            .field("warnings_as_errors", &self.warnings_as_errors)
            .field("upgrade_to_err", &self.upgrade_to_err)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzeOptsBuilder {
    output_format: OutputFormat,
    language: Language,
    plugin: String,
    plugin_args: Vec<String>,
    warnings_as_errors: bool,
    upgrade_to_err: HashSet<Code>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzeOptsErr {
    #[error("no plugin named `{0}` is registered")]
    UnknownPlugin(String),
    #[error("the `{0}` plugin rejected its arguments")]
    RejectedArgs(String),
}

impl Default for AnalyzeOptsBuilder {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Diagnostics,
            language: Language::default(),
            plugin: param_names::PLUGIN_NAME.to_owned(),
            plugin_args: Vec::new(),
            warnings_as_errors: false,
            upgrade_to_err: HashSet::default(),
        }
    }
}

impl AnalyzeOptsBuilder {
    /// Check C source for parameter name mismatches, without upgrading any diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Select the plugin run for [`OutputFormat::Diagnostics`] by its registered name.
    pub fn plugin(mut self, name: impl Into<String>) -> Self {
        self.plugin = name.into();
        self
    }

    pub fn plugin_arg(mut self, arg: impl Into<String>) -> Self {
        self.plugin_args.push(arg.into());
        self
    }

    /// Report the plugin's warnings as errors.
    pub fn warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }

    /// Make input the parser had to skip fatal.
    pub fn strict_syntax(mut self) -> Self {
        self.upgrade_to_err.insert(Code::SyntaxError);
        self.upgrade_to_err.insert(Code::MissingToken);
        self
    }

    pub fn with_code_to_upgrade(mut self, code: Code) -> Self {
        self.upgrade_to_err.insert(code);
        self
    }

    pub fn build(self) -> Result<AnalyzeOpts, AnalyzeOptsErr> {
        let entry = plugin::registry()
            .find(&self.plugin)
            .ok_or_else(|| AnalyzeOptsErr::UnknownPlugin(self.plugin.clone()))?;

        let mut plugin = entry.instantiate();
        if !plugin.parse_args(&self.plugin_args) {
            return Err(AnalyzeOptsErr::RejectedArgs(self.plugin));
        }

        Ok(AnalyzeOpts {
            output_format: self.output_format,
            language: self.language,
            plugin_name: entry.name(),
            plugin,
            warnings_as_errors: self.warnings_as_errors,
            upgrade_to_err: self.upgrade_to_err,
        })
    }
}

pub fn analyze(source: &str, source_name: &str, opts: &AnalyzeOpts) -> AggregateResult<Vec<u8>> {
    let mut res = run_analyze(source, source_name, opts);
    res.upgrade_diagnostics(|d| opts.upgrade_to_err.contains(d.code()));
    res
}

fn run_analyze(source: &str, source_name: &str, opts: &AnalyzeOpts) -> AggregateResult<Vec<u8>> {
    tracing::debug!(
        target: "pncheck::analyze",
        source_name,
        language = %opts.language,
        format = %opts.output_format,
        "analyzing"
    );

    let tree = || passes::parse::parse(source, opts.language);

    match opts.output_format {
        OutputFormat::TreeSexp => passes::parse::parse_to_sexp(source, opts.language)
            .map(|sexp| format!("{sexp}\n").into_bytes()),
        OutputFormat::DeclRustDbg => tree().map(|tree| {
            let tu = passes::lower_tree::lower(&tree, source, opts.language);
            format!("{tu:#?}\n").into_bytes()
        }),
        OutputFormat::DeclDot => tree().map(|tree| {
            let tu = passes::lower_tree::lower(&tree, source, opts.language);
            inspectors::dot::inspect_decls(&tu).into_bytes()
        }),
        OutputFormat::Diagnostics => tree().and_then(|tree| {
            let mut diags =
                DiagnosticsEngine::new().with_warnings_as_errors(opts.warnings_as_errors);
            {
                let mut consumer = opts.plugin.create_consumer(&mut diags, source_name);
                passes::lower_tree::lower_with_consumer(
                    &tree,
                    source,
                    opts.language,
                    consumer.as_mut(),
                );
            }

            tracing::debug!(
                target: "pncheck::analyze",
                plugin = opts.plugin_name,
                reported = diags.diagnostics().len(),
                "plugin finished"
            );

            let mut res = AggregateResult::new_ok(Vec::new());
            for diagnostic in diags.into_diagnostics() {
                res.add_by_level(diagnostic);
            }
            res
        }),
    }
}
