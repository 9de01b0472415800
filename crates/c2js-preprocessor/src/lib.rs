//! The C99 preprocessor (spec.md §4.1): macro expansion, conditional
//! inclusion, `#include` resolution, and `#line`-marker emission so the
//! lexer can recover true source locations after expansion.

pub mod conditional;
pub mod expr;
pub mod macros;
pub mod preprocessor;

pub use conditional::{ConditionalStack, FrameState};
pub use macros::{MacroDef, MacroKind};
pub use preprocessor::Preprocessor;

/// Standard headers the runtime satisfies without a real filesystem lookup
/// (spec.md §4.1's fixed allowlist).
pub const STANDARD_HEADER_ALLOWLIST: &[&str] = &[
    "stdio.h",
    "stdlib.h",
    "string.h",
    "math.h",
    "ctype.h",
    "assert.h",
    "stdarg.h",
    "stddef.h",
    "stdbool.h",
    "stdint.h",
    "limits.h",
    "float.h",
    "errno.h",
    "time.h",
    "signal.h",
    "setjmp.h",
];
