//! The diagnostic channel (§7 of the spec): every stage reports through a
//! shared [`DiagnosticBag`] rather than aborting on the first error, so that
//! a stage boundary can check "error count is zero" before letting the next
//! stage run (§5's failure-atomicity rule).

use colored::Colorize;
use std::fmt;

use crate::interner::{Atom, Interner};
use crate::span::SourceLocation;

/// One of the seven error kinds named in spec.md §7. Not an identifier
/// taxonomy — used only to route messages and to decide, in tests, which
/// stage is expected to have produced a given diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Io,
    Preprocessor,
    Lex,
    Parse,
    Type,
    Semantic,
    Internal,
}

impl DiagnosticKind {
    pub const fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Io => "io-error",
            DiagnosticKind::Preprocessor => "preprocessor-error",
            DiagnosticKind::Lex => "lex-error",
            DiagnosticKind::Parse => "parse-error",
            DiagnosticKind::Type => "type-error",
            DiagnosticKind::Semantic => "semantic-error",
            DiagnosticKind::Internal => "internal-error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message with a resolved source location.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub location: SourceLocation,
    pub message: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, location: SourceLocation, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Error,
            location,
            message: message.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, location: SourceLocation, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            severity: Severity::Warning,
            location,
            message: message.into(),
        }
    }

    /// Format as `<file>:<line>:<col>: error: <message>`, per §7.
    pub fn format(&self, interner: &Interner) -> String {
        let file = interner.resolve(self.location.file);
        let tag = match self.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
        };
        format!(
            "{}:{}:{}: {}: {}",
            file, self.location.line, self.location.column, tag, self.message
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(
            f,
            "{}:{}:{}: {}: {}",
            self.location.file.raw(),
            self.location.line,
            self.location.column,
            tag,
            self.message
        )
    }
}

/// Accumulates diagnostics across a stage (or a whole compilation).
#[derive(Default, Debug)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, kind: DiagnosticKind, location: SourceLocation, message: impl Into<String>) {
        self.push(Diagnostic::error(kind, location, message));
    }

    pub fn warning(&mut self, kind: DiagnosticKind, location: SourceLocation, message: impl Into<String>) {
        self.push(Diagnostic::warning(kind, location, message));
    }

    /// Errors reported so far; warnings never affect this count, per §6/§7.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// `N error(s) found`, per §7's user-visible summary line.
    pub fn summary(&self) -> String {
        let n = self.error_count();
        format!("{n} error{} found", if n == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::SourceLocation;

    fn loc() -> SourceLocation {
        SourceLocation {
            file: Atom::from_raw(0),
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    #[test]
    fn warnings_do_not_count_as_errors() {
        let mut bag = DiagnosticBag::new();
        bag.warning(DiagnosticKind::Semantic, loc(), "unused register");
        assert_eq!(bag.error_count(), 0);
        assert!(!bag.has_errors());
        bag.error(DiagnosticKind::Type, loc(), "undeclared identifier 'x'");
        assert_eq!(bag.error_count(), 1);
        assert_eq!(bag.summary(), "1 error found");
    }

    #[test]
    fn summary_pluralizes() {
        let mut bag = DiagnosticBag::new();
        bag.error(DiagnosticKind::Parse, loc(), "a");
        bag.error(DiagnosticKind::Parse, loc(), "b");
        assert_eq!(bag.summary(), "2 errors found");
    }
}
