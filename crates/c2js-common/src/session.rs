//! A `CompilerSession` owns the resources a single compilation needs instead
//! of relying on process-wide `static`s, per the DESIGN NOTES in spec.md §9:
//! "in a reimplementation prefer a compiler-session object that owns
//! [the macro table and interned-string table], permitting multiple
//! invocations within one process and unit testing without teardown."

use crate::diagnostics::DiagnosticBag;
use crate::interner::{Atom, Interner};

/// Owns the string interner and diagnostic bag for one compilation. Stages
/// that need their own arenas (types, symbols, AST nodes) own those
/// separately and are threaded through alongside a `&mut CompilerSession`.
pub struct CompilerSession {
    pub interner: Interner,
    pub diagnostics: DiagnosticBag,
}

impl CompilerSession {
    pub fn new() -> Self {
        CompilerSession {
            interner: Interner::new(),
            diagnostics: DiagnosticBag::new(),
        }
    }

    pub fn intern(&mut self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    pub fn resolve(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }
}

impl Default for CompilerSession {
    fn default() -> Self {
        Self::new()
    }
}
