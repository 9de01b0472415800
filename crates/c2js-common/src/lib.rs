//! Foundational types shared by every stage of the c2js compiler.
//!
//! This crate provides:
//! - String interning (`Atom`, `Interner`)
//! - Source spans and line/column locations (`Span`, `SourceLocation`, `LineMap`)
//! - The diagnostic channel (`Diagnostic`, `DiagnosticBag`)
//! - A small bump-style arena for parser/type/symbol data (`Arena`)
//! - A `CompilerSession` that owns the arena, interner, and diagnostics for one
//!   compilation, so nothing here needs to be a process-wide singleton.

pub mod arena;
pub mod diagnostics;
pub mod interner;
pub mod session;
pub mod span;

pub use arena::{Arena, ArenaIndex};
pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticKind, Severity};
pub use interner::{Atom, Interner};
pub use session::CompilerSession;
pub use span::{LineMap, SourceLocation, Span};
