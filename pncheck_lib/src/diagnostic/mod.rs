pub mod builder;
mod engine;

use std::{
    collections::LinkedList,
    fmt::{Debug, Display},
};

pub use builder::DiagnosticBuilder;
pub use engine::DiagnosticsEngine;

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    length: usize,
}

impl From<std::ops::Range<usize>> for Span {
    fn from(value: std::ops::Range<usize>) -> Self {
        Self {
            start: value.start,
            length: value.len(),
        }
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(val: Span) -> Self {
        val.start..val.excl_end()
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.excl_end())
    }
}

impl Span {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn excl_end(&self) -> usize {
        self.start + self.length
    }
}

/// First numeric code handed out to templates registered through
/// [`DiagnosticsEngine::custom_diag_id`].
const CUSTOM_CODE_BASE: u32 = 0x100;

// WARNING: Don't change the order of the builtin codes (Error codes will change)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    SyntaxError,
    MissingToken,
    /// A message template registered at runtime, see [`DiagnosticsEngine::custom_diag_id`].
    Custom(u16),
}

impl Code {
    /// Get a unique numeric code for this `Code`
    fn as_code(&self) -> u32 {
        match self {
            Code::SyntaxError => 1,
            Code::MissingToken => 2,
            Code::Custom(n) => CUSTOM_CODE_BASE + u32::from(*n),
        }
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:0>4x}", self.as_code())
    }
}

/// How a diagnostic is presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
    /// Extra information attached to the diagnostic reported right before it.
    Note,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    code: Code,
    level: Level,
    message: String,
    main_span: Span,
}

impl Diagnostic {
    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &String {
        &self.message
    }

    pub fn main_span(&self) -> &Span {
        &self.main_span
    }
}

/// Specifies the possibles types of diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// For recoverable diagnostics. (cfr. warnings)
    Rec,
    /// For non-recoverable diagnostics. (cfr. errors)
    Err,
}

/// A result combining a value with aggregated diagnostics.
///
/// Can be in one of three states:
/// - _ok_: The result contains a value and has no diagnostics. Corresponds to `Result::Ok`.
/// - _rec_: recoverable: The result contains a (recovered) value and has only diagnostics of the
///   kind [`DiagnosticKind::Rec`].
/// - _err_: non-recoverable: The result does not contain a value and has at least one diagnostic of
///   the kind [`DiagnosticKind::Err`].
///
/// It is guaranteed that the result will never be completely empty (i.e. no value nor diagnostics).
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult<T> {
    value: Option<T>,
    diagnostics: LinkedList<(DiagnosticKind, Diagnostic)>,
}

impl<T> AggregateResult<T> {
    /// Creates an `AggregateResult` in an _ok_ state containing the specified value.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pncheck_lib::diagnostic::*;
    /// let res = AggregateResult::new_ok(2);
    ///
    /// assert!(res.is_ok());
    /// assert_eq!(res.value(), Some(&2));
    /// assert!(res.diagnostics().next().is_none());
    /// ```
    pub fn new_ok(value: T) -> Self {
        Self {
            value: Some(value),
            diagnostics: LinkedList::new(),
        }
    }

    /// Returns `true` if the result is in an _ok_ state.
    ///
    /// A result in an _ok_ state is guaranteed to contain a value and have no diagnostics.
    pub fn is_ok(&self) -> bool {
        self.value.is_some() && self.diagnostics.is_empty()
    }

    /// Returns `true` if the result is in a _rec_ state.
    ///
    /// A result in a _rec_ state is guaranteed to contain a (recovered) value and only diagnostics
    /// of the kind [`DiagnosticKind::Rec`]. It will contain at least one diagnostic.
    pub fn is_rec(&self) -> bool {
        self.value.is_some() && !self.diagnostics.is_empty()
    }

    /// Returns `true` if the result is in an _err_ state.
    ///
    /// A result in an _err_ state is guaranteed to contain no value and only diagnostics of the
    /// kind [`DiagnosticKind::Err`]. It will contain at least one diagnostic.
    pub fn is_err(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the contained value for _ok_ and _rec_ results.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Converts from `AggregateResult<T>` to `Option<T>`, returning `Some(T)` for _ok_ and _rec_
    /// results, and consuming `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pncheck_lib::diagnostic::*;
    /// # let diagnostic = DiagnosticBuilder::new(0..1).build_syntax_error();
    /// let ok = AggregateResult::new_ok(1);
    /// let mut rec = AggregateResult::new_ok(2);
    /// rec.add_rec_diagnostic(diagnostic.clone());
    /// let mut err = AggregateResult::new_ok(3);
    /// err.add_err(diagnostic);
    ///
    /// assert_eq!(ok.into_value(), Some(1));
    /// assert_eq!(rec.into_value(), Some(2));
    /// assert!(err.into_value().is_none());
    /// ```
    pub fn into_value(self) -> Option<T> {
        self.value
    }

    /// Returns an iterator over the diagnostics for _rec_ and _err_ results, in the order they
    /// were added.
    pub fn diagnostics(&self) -> impl Iterator<Item = (DiagnosticKind, &Diagnostic)> {
        self.diagnostics.iter().map(|(dt, d)| (*dt, d))
    }

    /// Adds a recoverable diagnostic to the result.
    ///
    /// An _ok_ result will become a _rec_ result.
    pub fn add_rec_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics
            .push_back((DiagnosticKind::Rec, diagnostic));
    }

    /// Adds a non-recoverable diagnostic to the result.
    ///
    /// The result will become an _err_ result, dropping a contained value.
    pub fn add_err(&mut self, diagnostic: Diagnostic) {
        self.value = None;
        self.diagnostics
            .push_back((DiagnosticKind::Err, diagnostic));
    }

    /// Adds a diagnostic with a kind matching its [`Level`]: errors are non-recoverable,
    /// warnings and notes are recoverable.
    pub fn add_by_level(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level() {
            Level::Error => self.add_err(diagnostic),
            Level::Warning | Level::Note => self.add_rec_diagnostic(diagnostic),
        }
    }

    /// Runs the predicate for all recoverable diagnostics, turning the diagnostics where the
    /// predicate returns `true` into an error. This will also make the `AggregateResult` itself
    /// an _err_.
    ///
    /// Notes are never upgraded, they only give context to the diagnostic before them.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pncheck_lib::diagnostic::*;
    /// let mut res = AggregateResult::new_ok(());
    /// res.add_rec_diagnostic(DiagnosticBuilder::new(0..1).build_syntax_error());
    /// res.upgrade_diagnostics(|d| d.code() == &Code::SyntaxError);
    ///
    /// assert!(res.is_err());
    /// let (kind, diagnostic) = res.diagnostics().next().unwrap();
    /// assert_eq!(kind, DiagnosticKind::Err);
    /// assert_eq!(diagnostic.level(), Level::Error);
    /// ```
    pub fn upgrade_diagnostics<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&Diagnostic) -> bool,
    {
        for (kind, diagnostic) in &mut self.diagnostics {
            if *kind == DiagnosticKind::Err || diagnostic.level == Level::Note {
                continue;
            }
            if predicate(diagnostic) {
                *kind = DiagnosticKind::Err;
                diagnostic.level = Level::Error;
                self.value = None;
            }
        }
    }

    /// Maps an `AggregateResult<T>` to `AggregateResult<U>` by applying a function to a
    /// contained value, leaving diagnostics untouched.
    #[must_use]
    pub fn map<U, F>(self, op: F) -> AggregateResult<U>
    where
        F: FnOnce(T) -> U,
    {
        AggregateResult {
            value: self.value.map(op),
            diagnostics: self.diagnostics,
        }
    }

    /// Calls `op` if the result has a value, aggregating the diagnostics of `self` with the result
    /// returned by `op`.
    ///
    /// The value of `self` will always be discarded.
    #[must_use]
    pub fn and_then<U, F>(mut self, op: F) -> AggregateResult<U>
    where
        F: FnOnce(T) -> AggregateResult<U>,
    {
        match self.value {
            Some(t) => {
                let mut other = op(t);
                self.diagnostics.append(&mut other.diagnostics);
                other.diagnostics = self.diagnostics;
                other
            }
            None => AggregateResult {
                value: None,
                diagnostics: self.diagnostics,
            },
        }
    }
}
