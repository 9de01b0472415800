//! Pipeline orchestration: ties the preprocessor, lexer-backed parser,
//! semantic analyzer, and code generator together behind the stage gate
//! spec.md §5 requires ("a stage begins only if the prior stage closed with
//! error count zero").

use std::fs;

use anyhow::{Context, Result};
use c2js_common::session::CompilerSession;
use c2js_parser::{ParseOutput, Parser};
use c2js_preprocessor::Preprocessor;

use crate::args::CliArgs;
use crate::reporter;

/// Runs the full pipeline for `args`. Returns the process exit code (§6:
/// 0 on success, 1 if any stage reported an error) rather than a `Result`,
/// since a non-zero exit from a cleanly reported compile error is not itself
/// a failure of the driver.
pub fn run(args: &CliArgs) -> Result<i32> {
    let mut session = CompilerSession::new();
    let file = session.intern(&args.input.display().to_string());

    let mut preprocessor = Preprocessor::new(&mut session, args.include.clone());
    for raw in &args.define {
        let (name, value) = CliArgs::split_define(raw);
        preprocessor.define_from_cli(&mut session, name, value);
    }

    let preprocessed = preprocessor.expand(&mut session, &args.input);
    if session.diagnostics.has_errors() {
        reporter::print_diagnostics(&session);
        return Ok(1);
    }

    if args.preprocess_only {
        print!("{preprocessed}");
        return Ok(0);
    }

    tracing::debug!(bytes = preprocessed.len(), "preprocessing finished");

    let mut parser = Parser::new(&mut session, &preprocessed, file);
    parser.parse_translation_unit(&mut session);
    if session.diagnostics.has_errors() {
        reporter::print_diagnostics(&session);
        return Ok(1);
    }
    tracing::debug!("parsing finished with no errors");

    let ParseOutput { ast, symtab, mut types } = parser.into_output();

    let check = c2js_sema::check_translation_unit(
        &mut session,
        &preprocessed,
        file,
        &ast,
        &symtab,
        &mut types,
    );
    if args.dump_ast {
        crate::ast_dump::dump(&ast);
    }
    if session.diagnostics.has_errors() {
        reporter::print_diagnostics(&session);
        return Ok(1);
    }
    tracing::debug!("semantic analysis finished with no errors");

    let js = c2js_codegen::generate_module(&mut session, &ast, &symtab, &types, &check);
    reporter::print_diagnostics(&session);

    let output_path = args.output_path();
    fs::write(&output_path, js)
        .with_context(|| format!("cannot write output file '{}'", output_path.display()))?;
    tracing::debug!(path = %output_path.display(), "wrote output");

    Ok(0)
}
