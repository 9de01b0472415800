//! Allowlisted libc/math function lowering (spec.md §4.5 "Function calls").
//! Matches the teacher's static-table-driven lowering of well-known
//! identifiers: every recognized name maps to a [`RuntimeShim`] through one
//! `FxHashMap` built once via `LazyLock`, rather than a chain of `if`s.

use rustc_hash::FxHashMap;
use std::sync::LazyLock;

/// How a call to an allowlisted C standard-library or math function is
/// rewritten. `target` is the JavaScript callee (`Math.sin`, `rt.printf`,
/// …); `unwrap_double_args`/`wrap_double_result` handle the raw-bits
/// double representation (spec.md §4.5 "Numeric lowering").
#[derive(Clone, Copy, Debug)]
pub struct RuntimeShim {
    pub target: &'static str,
    pub unwrap_double_args: bool,
    pub wrap_double_result: bool,
    pub variadic: bool,
}

const fn math(target: &'static str) -> RuntimeShim {
    RuntimeShim { target, unwrap_double_args: true, wrap_double_result: true, variadic: false }
}

const fn libc(target: &'static str) -> RuntimeShim {
    RuntimeShim { target, unwrap_double_args: false, wrap_double_result: false, variadic: false }
}

const fn libc_variadic(target: &'static str) -> RuntimeShim {
    RuntimeShim { target, unwrap_double_args: false, wrap_double_result: false, variadic: true }
}

/// `sin`, `cos`, … and their `f`-suffix (`float`) variants, lowered to
/// `Math.*` with automatic double unwrap/wrap (spec.md §4.5).
pub static MATH_FUNCTIONS: LazyLock<FxHashMap<&'static str, RuntimeShim>> = LazyLock::new(|| {
    FxHashMap::from_iter([
        ("sin", math("Math.sin")),
        ("sinf", math("Math.sin")),
        ("cos", math("Math.cos")),
        ("cosf", math("Math.cos")),
        ("tan", math("Math.tan")),
        ("tanf", math("Math.tan")),
        ("asin", math("Math.asin")),
        ("acos", math("Math.acos")),
        ("atan", math("Math.atan")),
        ("atan2", math("Math.atan2")),
        ("exp", math("Math.exp")),
        ("log", math("Math.log")),
        ("log10", math("Math.log10")),
        ("pow", math("Math.pow")),
        ("powf", math("Math.pow")),
        ("sqrt", math("Math.sqrt")),
        ("sqrtf", math("Math.sqrt")),
        ("fabs", math("Math.abs")),
        ("fabsf", math("Math.abs")),
        ("floor", math("Math.floor")),
        ("ceil", math("Math.ceil")),
        ("round", math("Math.round")),
        ("fmod", math("rt.fmod")),
    ])
});

/// `printf` family, `malloc`/`free` family, `str*`/`mem*`, `ctype`,
/// `atoi`/`atof`/`exit`, `assert`, FILE I/O, `time`, and errno shims, all
/// lowered to runtime-provided shims (spec.md §4.5).
pub static LIBC_FUNCTIONS: LazyLock<FxHashMap<&'static str, RuntimeShim>> = LazyLock::new(|| {
    FxHashMap::from_iter([
        ("malloc", libc("rt.malloc")),
        ("calloc", libc("rt.calloc")),
        ("realloc", libc("rt.realloc")),
        ("free", libc("rt.free")),
        ("memcpy", libc("rt.memcpy")),
        ("memmove", libc("rt.memmove")),
        ("memset", libc("rt.memset")),
        ("memcmp", libc("rt.memcmp")),
        ("strlen", libc("rt.strlen")),
        ("strcpy", libc("rt.strcpy")),
        ("strncpy", libc("rt.strncpy")),
        ("strcat", libc("rt.strcat")),
        ("strncat", libc("rt.strncat")),
        ("strcmp", libc("rt.strcmp")),
        ("strncmp", libc("rt.strncmp")),
        ("strchr", libc("rt.strchr")),
        ("strrchr", libc("rt.strrchr")),
        ("strstr", libc("rt.strstr")),
        ("strtol", libc("rt.strtol")),
        ("strtoul", libc("rt.strtoul")),
        ("strtod", libc("rt.strtod")),
        ("atoi", libc("rt.atoi")),
        ("atof", libc("rt.atof")),
        ("isalpha", libc("rt.isalpha")),
        ("isdigit", libc("rt.isdigit")),
        ("isspace", libc("rt.isspace")),
        ("isupper", libc("rt.isupper")),
        ("islower", libc("rt.islower")),
        ("toupper", libc("rt.toupper")),
        ("tolower", libc("rt.tolower")),
        ("exit", libc("rt.exit")),
        ("abort", libc("rt.abort")),
        ("abs", libc("rt.iabs")),
        ("labs", libc("rt.iabs")),
        ("rand", libc("rt.rand")),
        ("srand", libc("rt.srand")),
        ("time", libc("rt.time")),
        ("clock", libc("rt.clock")),
        ("fopen", libc("rt.fopen")),
        ("fclose", libc("rt.fclose")),
        ("fread", libc("rt.fread")),
        ("fwrite", libc("rt.fwrite")),
        ("fgets", libc("rt.fgets")),
        ("fputs", libc("rt.fputs")),
        ("fputc", libc("rt.fputc")),
        ("fgetc", libc("rt.fgetc")),
        ("fseek", libc("rt.fseek")),
        ("ftell", libc("rt.ftell")),
        ("feof", libc("rt.feof")),
        ("ferror", libc("rt.ferror")),
        ("errno_location", libc("rt.errnoLocation")),
        ("printf", libc_variadic("rt.printf")),
        ("sprintf", libc_variadic("rt.sprintf")),
        ("snprintf", libc_variadic("rt.snprintf")),
        ("fprintf", libc_variadic("rt.fprintf")),
        ("scanf", libc_variadic("rt.scanf")),
        ("sscanf", libc_variadic("rt.sscanf")),
        ("assert", libc_variadic("rt.assert")),
    ])
});

/// Looks up `name` in the math table, then the libc table.
pub fn lookup(name: &str) -> Option<RuntimeShim> {
    MATH_FUNCTIONS.get(name).or_else(|| LIBC_FUNCTIONS.get(name)).copied()
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
