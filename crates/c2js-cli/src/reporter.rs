//! Prints the diagnostics accumulated in a [`CompilerSession`] to stderr in
//! the `<file>:<line>:<col>: error: <message>` format spec.md §7 fixes,
//! followed by the summary line when any errors were reported.

use c2js_common::session::CompilerSession;

pub fn print_diagnostics(session: &CompilerSession) {
    for diagnostic in session.diagnostics.iter() {
        eprintln!("{}", diagnostic.format(&session.interner));
    }
    if session.diagnostics.has_errors() {
        eprintln!("{}", session.diagnostics.summary());
    }
}
