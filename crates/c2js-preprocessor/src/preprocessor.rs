//! The preprocessor driver: line splicing, comment stripping, directive
//! dispatch, include resolution, and `# <line> "<file>"` marker emission
//! (spec.md §4.1).
//!
//! Output line count matches input physical line count one-for-one except
//! across `#include` boundaries (which splice in the included file's own
//! line-numbered text and then re-sync with a resume marker): every
//! directive line that produces no text still consumes one blank output
//! line, so the lexer can recover line numbers by counting newlines since
//! the last marker without needing a marker after every directive.

use std::fs;
use std::path::{Path, PathBuf};

use c2js_common::diagnostics::DiagnosticKind;
use c2js_common::interner::Atom;
use c2js_common::session::CompilerSession;
use c2js_common::span::SourceLocation;
use rustc_hash::FxHashMap;

use crate::conditional::ConditionalStack;
use crate::expr;
use crate::macros::{self, MacroDef, MacroKind};
use crate::STANDARD_HEADER_ALLOWLIST;

pub struct Preprocessor {
    macros: FxHashMap<Atom, MacroDef>,
    include_dirs: Vec<PathBuf>,
}

enum RawMacroDef {
    Object(String),
    Function {
        params: Vec<String>,
        variadic: bool,
        body: String,
    },
}

enum Directive {
    Include { angled: bool, target: String },
    Define { name: String, raw: RawMacroDef },
    Undef { name: String },
    If { expr: String },
    Ifdef { name: String, negate: bool },
    Elif { expr: String },
    Else,
    Endif,
    Line { number: u32, file: Option<String> },
    Error { message: String },
    Pragma,
}

impl Preprocessor {
    pub fn new(session: &mut CompilerSession, include_dirs: Vec<PathBuf>) -> Self {
        Preprocessor {
            macros: macros::predefined(&mut session.interner),
            include_dirs,
        }
    }

    /// Seeds a macro from a CLI `-D NAME[=VALUE]` definition, as if by an
    /// object-like `#define` preceding the translation unit (spec.md §6).
    /// A bare `-D NAME` defines `NAME` as `1`, matching the common `cc`
    /// convention.
    pub fn define_from_cli(&mut self, session: &mut CompilerSession, name: &str, value: &str) {
        let atom = session.intern(name);
        let body = if value.is_empty() { "1" } else { value };
        self.macros.insert(atom, MacroDef::object(body));
    }

    /// Expands `path` to a single text stream (spec.md §4.1 contract).
    /// Errors are reported through `session.diagnostics`; check
    /// `session.diagnostics.has_errors()` after calling this.
    pub fn expand(&mut self, session: &mut CompilerSession, path: &Path) -> String {
        tracing::debug!(path = %path.display(), "preprocessing started");
        let mut out = String::new();
        self.process_file(session, path, &mut out);
        tracing::debug!(macros = self.macros.len(), bytes = out.len(), "preprocessing produced output");
        out
    }

    fn process_file(&mut self, session: &mut CompilerSession, path: &Path, out: &mut String) {
        let source = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                let loc = self.loc_for(session, path, 1);
                session.diagnostics.error(
                    DiagnosticKind::Io,
                    loc,
                    format!("cannot open file '{}': {e}", path.display()),
                );
                return;
            }
        };

        let spliced = splice_lines(&source);
        let stripped = strip_comments(&spliced);

        out.push_str(&format!("# 1 \"{}\"\n", path.display()));
        let mut conditional = ConditionalStack::new();

        let lines: Vec<&str> = stripped.split('\n').collect();
        for (idx, line) in lines.iter().enumerate() {
            let line_no = (idx + 1) as u32;
            match parse_directive(line) {
                Some(Directive::Include { angled, target }) => {
                    if conditional.is_active() {
                        self.handle_include(session, path, angled, &target, line_no + 1, out);
                    } else {
                        out.push('\n');
                    }
                }
                Some(Directive::Define { name, raw }) => {
                    if conditional.is_active() {
                        self.install_macro(session, &name, raw);
                    }
                    out.push('\n');
                }
                Some(Directive::Undef { name }) => {
                    if conditional.is_active() {
                        let atom = session.intern(&name);
                        self.macros.remove(&atom);
                    }
                    out.push('\n');
                }
                Some(Directive::If { expr }) => {
                    let cond = if conditional.is_active() {
                        self.eval_condition(&expr, session)
                    } else {
                        false
                    };
                    conditional.push_if(cond);
                    out.push('\n');
                }
                Some(Directive::Ifdef { name, negate }) => {
                    let cond = if conditional.is_active() {
                        let atom = session.intern(&name);
                        let defined = self.macros.contains_key(&atom);
                        if negate {
                            !defined
                        } else {
                            defined
                        }
                    } else {
                        false
                    };
                    conditional.push_if(cond);
                    out.push('\n');
                }
                Some(Directive::Elif { expr }) => {
                    let cond = self.eval_condition(&expr, session);
                    if let Err(msg) = conditional.handle_elif(cond) {
                        let loc = self.loc_for(session, path, line_no);
                        session.diagnostics.error(DiagnosticKind::Preprocessor, loc, msg);
                    }
                    out.push('\n');
                }
                Some(Directive::Else) => {
                    if let Err(msg) = conditional.handle_else() {
                        let loc = self.loc_for(session, path, line_no);
                        session.diagnostics.error(DiagnosticKind::Preprocessor, loc, msg);
                    }
                    out.push('\n');
                }
                Some(Directive::Endif) => {
                    if let Err(msg) = conditional.pop_endif() {
                        let loc = self.loc_for(session, path, line_no);
                        session.diagnostics.error(DiagnosticKind::Preprocessor, loc, msg);
                    }
                    out.push('\n');
                }
                Some(Directive::Line { number, file }) => {
                    if conditional.is_active() {
                        let display_file = file.unwrap_or_else(|| path.display().to_string());
                        out.push_str(&format!("# {number} \"{display_file}\"\n"));
                    } else {
                        out.push('\n');
                    }
                }
                Some(Directive::Error { message }) => {
                    if conditional.is_active() {
                        let loc = self.loc_for(session, path, line_no);
                        session.diagnostics.error(DiagnosticKind::Preprocessor, loc, message);
                    }
                    out.push('\n');
                }
                Some(Directive::Pragma) => {
                    out.push('\n');
                }
                None => {
                    if conditional.is_active() {
                        let expanded = macros::expand(line, &self.macros, &mut session.interner);
                        out.push_str(&expanded);
                        out.push('\n');
                    } else {
                        out.push('\n');
                    }
                }
            }
        }

        if conditional.unterminated() {
            let loc = self.loc_for(session, path, lines.len() as u32);
            session
                .diagnostics
                .error(DiagnosticKind::Preprocessor, loc, "unterminated conditional directive");
        }
    }

    fn install_macro(&mut self, session: &mut CompilerSession, name: &str, raw: RawMacroDef) {
        let atom = session.intern(name);
        let def = match raw {
            RawMacroDef::Object(body) => MacroDef::object(body),
            RawMacroDef::Function { params, variadic, body } => {
                let param_atoms = params.iter().map(|p| session.intern(p)).collect();
                MacroDef {
                    kind: MacroKind::Function { params: param_atoms, variadic },
                    body,
                }
            }
        };
        self.macros.insert(atom, def);
    }

    fn handle_include(
        &mut self,
        session: &mut CompilerSession,
        current_file: &Path,
        angled: bool,
        target: &str,
        resume_line: u32,
        out: &mut String,
    ) {
        if STANDARD_HEADER_ALLOWLIST.contains(&target) {
            out.push_str(&format!("# 1 \"{target}\"\n"));
            out.push_str(&format!("// {target}: provided by runtime\n"));
            out.push_str(&format!("# {resume_line} \"{}\"\n", current_file.display()));
            return;
        }
        match self.resolve_include(current_file, angled, target) {
            Some(resolved) => {
                tracing::trace!(file = %resolved.display(), "entering include");
                self.process_file(session, &resolved, out);
                out.push_str(&format!("# {resume_line} \"{}\"\n", current_file.display()));
            }
            None => {
                let loc = self.loc_for(session, current_file, resume_line.saturating_sub(1));
                session.diagnostics.error(
                    DiagnosticKind::Preprocessor,
                    loc,
                    format!("cannot find include file '{target}'"),
                );
            }
        }
    }

    /// Quoted includes search: (1) the including file's directory, (2) the
    /// working directory, (3) the user-supplied search list, in that order.
    /// Angle-bracket includes skip step (1).
    fn resolve_include(&self, current_file: &Path, angled: bool, target: &str) -> Option<PathBuf> {
        let mut candidates = Vec::new();
        if !angled {
            if let Some(dir) = current_file.parent() {
                candidates.push(dir.join(target));
            }
            candidates.push(PathBuf::from(target));
        }
        for dir in &self.include_dirs {
            candidates.push(dir.join(target));
        }
        candidates.into_iter().find(|p| p.is_file())
    }

    /// Evaluates a `#if`/`#elif` expression: `defined` substitution happens
    /// before macro expansion (the C standard's ordering requirement), then
    /// the result is parsed as a constant integer expression.
    fn eval_condition(&mut self, expr_text: &str, session: &mut CompilerSession) -> bool {
        let defined_resolved = self.substitute_defined(expr_text, session);
        let expanded = macros::expand(&defined_resolved, &self.macros, &mut session.interner);
        expr::evaluate(&expanded) != 0
    }

    fn substitute_defined(&self, text: &str, session: &mut CompilerSession) -> String {
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();
        let mut out = String::new();
        let mut i = 0;
        while i < len {
            if chars[i].is_alphabetic() || chars[i] == '_' {
                let start = i;
                while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if word != "defined" {
                    out.push_str(&word);
                    continue;
                }
                let mut j = i;
                while j < len && chars[j].is_whitespace() {
                    j += 1;
                }
                let (name, after) = if j < len && chars[j] == '(' {
                    let mut k = j + 1;
                    while k < len && chars[k].is_whitespace() {
                        k += 1;
                    }
                    let name_start = k;
                    while k < len && (chars[k].is_alphanumeric() || chars[k] == '_') {
                        k += 1;
                    }
                    let name: String = chars[name_start..k].iter().collect();
                    while k < len && chars[k] != ')' {
                        k += 1;
                    }
                    (name, (k + 1).min(len))
                } else {
                    let name_start = j;
                    let mut k = j;
                    while k < len && (chars[k].is_alphanumeric() || chars[k] == '_') {
                        k += 1;
                    }
                    (chars[name_start..k].iter().collect(), k)
                };
                let atom = session.intern(&name);
                out.push_str(if self.macros.contains_key(&atom) { "1" } else { "0" });
                i = after;
                continue;
            }
            out.push(chars[i]);
            i += 1;
        }
        out
    }

    fn loc_for(&self, session: &mut CompilerSession, file: &Path, line: u32) -> SourceLocation {
        SourceLocation {
            file: session.intern(&file.display().to_string()),
            line,
            column: 1,
            offset: 0,
        }
    }
}

/// Joins a backslash immediately before a newline (optionally preceded by
/// `\r`) into one logical line, before any tokenization (spec.md §4.1
/// "Line splicing").
fn splice_lines(source: &str) -> String {
    let normalized = source.replace("\r\n", "\n");
    let mut out = String::with_capacity(normalized.len());
    let mut chars = normalized.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && chars.peek() == Some(&'\n') {
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

/// Replaces `/* ... */` and `//` comments with a single space each
/// (spec.md §4.1 "Comments"), preserving embedded newlines inside block
/// comments so downstream line counting stays accurate.
fn strip_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;
    while i < len {
        match chars[i] {
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                let mut newlines = 0;
                while i < len && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                    if chars[i] == '\n' {
                        newlines += 1;
                    }
                    i += 1;
                }
                i = (i + 2).min(len);
                out.push(' ');
                for _ in 0..newlines {
                    out.push('\n');
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                i += 2;
                while i < len && chars[i] != '\n' {
                    i += 1;
                }
                out.push(' ');
            }
            '"' | '\'' => {
                let quote = chars[i];
                out.push(quote);
                i += 1;
                while i < len && chars[i] != quote {
                    out.push(chars[i]);
                    if chars[i] == '\\' && i + 1 < len {
                        i += 1;
                        out.push(chars[i]);
                    }
                    i += 1;
                }
                if i < len {
                    out.push(chars[i]);
                    i += 1;
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn split_keyword(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(idx) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

fn parse_directive(line: &str) -> Option<Directive> {
    let trimmed = line.trim_start();
    let rest = trimmed.strip_prefix('#')?.trim_start();
    let (keyword, remainder) = split_keyword(rest);
    match keyword {
        "include" => parse_include(remainder.trim()),
        "define" => parse_define(remainder),
        "undef" => Some(Directive::Undef { name: remainder.trim().to_string() }),
        "if" => Some(Directive::If { expr: remainder.trim().to_string() }),
        "ifdef" => Some(Directive::Ifdef { name: remainder.trim().to_string(), negate: false }),
        "ifndef" => Some(Directive::Ifdef { name: remainder.trim().to_string(), negate: true }),
        "elif" => Some(Directive::Elif { expr: remainder.trim().to_string() }),
        "else" => Some(Directive::Else),
        "endif" => Some(Directive::Endif),
        "line" => parse_line_directive(remainder.trim()),
        "error" => Some(Directive::Error { message: remainder.trim().to_string() }),
        "pragma" => Some(Directive::Pragma),
        _ => None,
    }
}

fn parse_include(arg: &str) -> Option<Directive> {
    if let Some(stripped) = arg.strip_prefix('"') {
        let end = stripped.find('"')?;
        Some(Directive::Include { angled: false, target: stripped[..end].to_string() })
    } else if let Some(stripped) = arg.strip_prefix('<') {
        let end = stripped.find('>')?;
        Some(Directive::Include { angled: true, target: stripped[..end].to_string() })
    } else {
        None
    }
}

fn parse_define(remainder: &str) -> Option<Directive> {
    let trimmed = remainder.trim_start();
    let name_end = trimmed
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(trimmed.len());
    if name_end == 0 {
        return None;
    }
    let name = trimmed[..name_end].to_string();
    let after_name = &trimmed[name_end..];
    if let Some(params_and_body) = after_name.strip_prefix('(') {
        let close = params_and_body.find(')')?;
        let params_str = &params_and_body[..close];
        let body = params_and_body[close + 1..].trim_start().to_string();
        let variadic = params_str.trim_end().ends_with("...");
        let params: Vec<String> = params_str
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty() && p != "...")
            .collect();
        Some(Directive::Define { name, raw: RawMacroDef::Function { params, variadic, body } })
    } else {
        Some(Directive::Define { name, raw: RawMacroDef::Object(after_name.trim_start().to_string()) })
    }
}

fn parse_line_directive(arg: &str) -> Option<Directive> {
    let (num_str, rest) = split_keyword(arg);
    let number: u32 = num_str.parse().ok()?;
    let rest = rest.trim();
    let file = rest.strip_prefix('"').and_then(|s| s.find('"').map(|end| s[..end].to_string()));
    Some(Directive::Line { number, file })
}

#[cfg(test)]
#[path = "../tests/preprocessor_tests.rs"]
mod preprocessor_tests;
