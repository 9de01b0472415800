//! The semantic analyzer (spec.md §4.4): a single-pass `Checker` that walks
//! the parser's `Node` tree in program order, annotating every expression
//! with a type, inserting implicit conversions, and diagnosing type and
//! semantic errors. The symbol table is owned by the parser; the checker
//! only reads it (spec.md §4.4's shared-resource policy).

pub mod checker;
mod convert;
mod decl;
mod expr;
mod stmt;

pub use checker::{check_translation_unit, CheckOutput, Checker};
