//! The macro table and expansion engine (spec.md §4.1 "Macro model").

use c2js_common::interner::{Atom, Interner};
use rustc_hash::FxHashMap;

/// Rescanning is bounded (spec.md §4.1): beyond this many passes the
/// partial expansion is emitted verbatim rather than looping forever on a
/// macro that (directly or through a chain) references itself.
pub const MAX_RESCAN_DEPTH: u32 = 32;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MacroKind {
    Object,
    Function { params: Vec<Atom>, variadic: bool },
}

#[derive(Clone, Debug)]
pub struct MacroDef {
    pub kind: MacroKind,
    pub body: String,
}

impl MacroDef {
    pub fn object(body: impl Into<String>) -> Self {
        MacroDef {
            kind: MacroKind::Object,
            body: body.into(),
        }
    }
}

/// Seeds the predefined macros named in spec.md §4.1: `__STDC__` and
/// friends, `NULL`/`true`/`false`/`bool`, `EOF`, a representative spread of
/// stdint typedef macros and numeric limits, an errno stub, stdio seek
/// constants, time/signal constants, and the `EXIT_*` codes.
pub fn predefined(interner: &mut Interner) -> FxHashMap<Atom, MacroDef> {
    let entries: &[(&str, &str)] = &[
        ("__STDC__", "1"),
        ("__STDC_VERSION__", "199901L"),
        ("__STDC_HOSTED__", "1"),
        ("NULL", "((void*)0)"),
        ("true", "1"),
        ("false", "0"),
        ("bool", "_Bool"),
        ("EOF", "(-1)"),
        // stdint typedef macros (representative subset)
        ("INT8_MIN", "(-128)"),
        ("INT8_MAX", "127"),
        ("UINT8_MAX", "255"),
        ("INT16_MIN", "(-32768)"),
        ("INT16_MAX", "32767"),
        ("UINT16_MAX", "65535"),
        ("INT32_MIN", "(-2147483647-1)"),
        ("INT32_MAX", "2147483647"),
        ("UINT32_MAX", "4294967295U"),
        ("INT64_MIN", "(-9223372036854775807LL-1)"),
        ("INT64_MAX", "9223372036854775807LL"),
        ("UINT64_MAX", "18446744073709551615ULL"),
        // numeric limits
        ("CHAR_BIT", "8"),
        ("SCHAR_MIN", "(-128)"),
        ("SCHAR_MAX", "127"),
        ("UCHAR_MAX", "255"),
        ("CHAR_MIN", "(-128)"),
        ("CHAR_MAX", "127"),
        ("SHRT_MIN", "(-32768)"),
        ("SHRT_MAX", "32767"),
        ("USHRT_MAX", "65535"),
        ("INT_MIN", "(-2147483647-1)"),
        ("INT_MAX", "2147483647"),
        ("UINT_MAX", "4294967295U"),
        ("LONG_MIN", "(-2147483647-1)"),
        ("LONG_MAX", "2147483647"),
        ("ULONG_MAX", "4294967295U"),
        ("LLONG_MIN", "(-9223372036854775807LL-1)"),
        ("LLONG_MAX", "9223372036854775807LL"),
        ("ULLONG_MAX", "18446744073709551615ULL"),
        // errno stub
        ("errno", "(*__c2js_errno())"),
        ("EDOM", "33"),
        ("ERANGE", "34"),
        ("EILSEQ", "84"),
        // stdio seek constants
        ("SEEK_SET", "0"),
        ("SEEK_CUR", "1"),
        ("SEEK_END", "2"),
        // time/signal constants
        ("CLOCKS_PER_SEC", "1000000"),
        ("SIG_DFL", "0"),
        ("SIG_IGN", "1"),
        ("SIG_ERR", "(-1)"),
        // exit codes
        ("EXIT_SUCCESS", "0"),
        ("EXIT_FAILURE", "1"),
    ];
    let mut macros = FxHashMap::default();
    for (name, body) in entries {
        let atom = interner.intern(name);
        macros.insert(atom, MacroDef::object(*body));
    }
    macros
}

/// Expands `text` to a fixed point, bounded by [`MAX_RESCAN_DEPTH`] passes.
pub fn expand(text: &str, macros: &FxHashMap<Atom, MacroDef>, interner: &mut Interner) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_RESCAN_DEPTH {
        let (next, changed) = expand_one_pass(&current, macros, interner);
        if !changed {
            return next;
        }
        current = next;
    }
    current
}

fn expand_one_pass(text: &str, macros: &FxHashMap<Atom, MacroDef>, interner: &mut Interner) -> (String, bool) {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut out = String::new();
    let mut i = 0;
    let mut changed = false;

    while i < len {
        let c = chars[i];
        if c == '"' || c == '\'' {
            let quote = c;
            out.push(c);
            i += 1;
            while i < len {
                out.push(chars[i]);
                if chars[i] == '\\' && i + 1 < len {
                    i += 1;
                    out.push(chars[i]);
                    i += 1;
                    continue;
                }
                if chars[i] == quote {
                    i += 1;
                    break;
                }
                i += 1;
            }
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            let atom = interner.intern(&name);
            match macros.get(&atom) {
                Some(MacroDef { kind: MacroKind::Object, body }) => {
                    out.push_str(body);
                    changed = true;
                }
                Some(MacroDef {
                    kind: MacroKind::Function { params, variadic },
                    body,
                }) => {
                    let mut j = i;
                    while j < len && chars[j].is_whitespace() {
                        j += 1;
                    }
                    if j < len && chars[j] == '(' {
                        let (args, after) = read_args(&chars, j + 1);
                        let substituted = substitute_body(body, params, *variadic, &args, interner);
                        out.push_str(&substituted);
                        i = after;
                        changed = true;
                        continue;
                    }
                    out.push_str(&name);
                }
                None => out.push_str(&name),
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    (out, changed)
}

/// Reads a parenthesized, comma-separated argument list starting right
/// after the opening `(` (already consumed by the caller at `start`).
/// Returns the trimmed argument texts and the index right after the
/// matching `)`. Commas and parens inside string/char literals don't count.
fn read_args(chars: &[char], start: usize) -> (Vec<String>, usize) {
    let len = chars.len();
    let mut depth = 1;
    let mut i = start;
    let mut arg_start = start;
    let mut pieces = Vec::new();

    while i < len && depth > 0 {
        match chars[i] {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    pieces.push(chars[arg_start..i].iter().collect::<String>());
                    i += 1;
                    break;
                }
            }
            ',' if depth == 1 => {
                pieces.push(chars[arg_start..i].iter().collect::<String>());
                arg_start = i + 1;
            }
            '"' | '\'' => {
                let quote = chars[i];
                i += 1;
                while i < len && chars[i] != quote {
                    if chars[i] == '\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    // A call with an entirely empty parenthesis list, `FOO()`, has zero
    // arguments rather than one empty argument.
    let args = if pieces.len() == 1 && pieces[0].trim().is_empty() {
        Vec::new()
    } else {
        pieces.into_iter().map(|p| p.trim().to_string()).collect()
    };
    (args, i)
}

fn resolve_param(name: &str, params: &[Atom], args: &[String], interner: &Interner) -> Option<String> {
    for (idx, p) in params.iter().enumerate() {
        if interner.resolve(*p) == name {
            return Some(args.get(idx).cloned().unwrap_or_default());
        }
    }
    None
}

fn stringize(arg: &str) -> String {
    let trimmed = arg.trim();
    let mut s = String::with_capacity(trimmed.len() + 2);
    s.push('"');
    for c in trimmed.chars() {
        if c == '"' || c == '\\' {
            s.push('\\');
        }
        s.push(c);
    }
    s.push('"');
    s
}

/// Collapses every `##` token-paste operator in `s`, eliding whitespace on
/// both sides and gluing the neighboring text into one pp-token's worth of
/// characters (spec.md §4.1: "does not require re-lexing of the
/// concatenation beyond delivering the glued characters").
fn paste_concat(s: &str) -> String {
    let mut result = String::new();
    let mut rest = s;
    while let Some(idx) = rest.find("##") {
        result.push_str(rest[..idx].trim_end());
        rest = rest[idx + 2..].trim_start();
    }
    result.push_str(rest);
    result
}

fn substitute_body(
    body: &str,
    params: &[Atom],
    variadic: bool,
    args: &[String],
    interner: &mut Interner,
) -> String {
    let va_args = || -> String {
        if params.len() < args.len() {
            args[params.len()..].join(", ")
        } else {
            String::new()
        }
    };

    let chars: Vec<char> = body.chars().collect();
    let len = chars.len();
    let mut out = String::new();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        if c == '#' && chars.get(i + 1) == Some(&'#') {
            // Leave the paste operator itself untouched; `paste_concat`
            // handles gluing once all parameter substitution is done.
            out.push_str("##");
            i += 2;
            continue;
        }
        if c == '#' {
            let mut j = i + 1;
            while j < len && chars[j].is_whitespace() {
                j += 1;
            }
            let start = j;
            if j < len && (chars[j].is_alphabetic() || chars[j] == '_') {
                while j < len && (chars[j].is_alphanumeric() || chars[j] == '_') {
                    j += 1;
                }
                let name: String = chars[start..j].iter().collect();
                let text = if name == "__VA_ARGS__" && variadic {
                    Some(va_args())
                } else {
                    resolve_param(&name, params, args, interner)
                };
                if let Some(text) = text {
                    out.push_str(&stringize(&text));
                    i = j;
                    continue;
                }
            }
            out.push('#');
            i += 1;
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < len && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            if name == "__VA_ARGS__" && variadic {
                out.push_str(&va_args());
                continue;
            }
            if let Some(text) = resolve_param(&name, params, args, interner) {
                out.push_str(&text);
                continue;
            }
            out.push_str(&name);
            continue;
        }
        out.push(c);
        i += 1;
    }

    paste_concat(&out)
}

#[cfg(test)]
#[path = "../tests/macros_tests.rs"]
mod macros_tests;
