//! The C99 tokenizer (spec.md §4.2): converts preprocessed text into a
//! single-token-lookahead stream, recovering true source locations from the
//! `# <line> "<file>"` markers the preprocessor left behind.

pub mod keywords;
pub mod lexer;
pub mod token;

pub use keywords::Keyword;
pub use lexer::Lexer;
pub use token::{FloatSuffix, IntSuffix, Punct, Radix, Token, TokenFlags, TokenKind};
