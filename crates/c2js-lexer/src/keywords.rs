//! The C99 keyword table (spec.md §4.2 "Keyword identification"): a
//! perfect-match lookup from identifier spelling to keyword kind.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Enum,
    Extern,
    Float,
    For,
    Goto,
    If,
    Inline,
    Int,
    Long,
    Register,
    Restrict,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
    While,
    Bool,
    Complex,
    Imaginary,
}

pub fn lookup(ident: &str) -> Option<Keyword> {
    use Keyword::*;
    Some(match ident {
        "auto" => Auto,
        "break" => Break,
        "case" => Case,
        "char" => Char,
        "const" => Const,
        "continue" => Continue,
        "default" => Default,
        "do" => Do,
        "double" => Double,
        "else" => Else,
        "enum" => Enum,
        "extern" => Extern,
        "float" => Float,
        "for" => For,
        "goto" => Goto,
        "if" => If,
        "inline" => Inline,
        "int" => Int,
        "long" => Long,
        "register" => Register,
        "restrict" => Restrict,
        "return" => Return,
        "short" => Short,
        "signed" => Signed,
        "sizeof" => Sizeof,
        "static" => Static,
        "struct" => Struct,
        "switch" => Switch,
        "typedef" => Typedef,
        "union" => Union,
        "unsigned" => Unsigned,
        "void" => Void,
        "volatile" => Volatile,
        "while" => While,
        "_Bool" => Bool,
        "_Complex" => Complex,
        "_Imaginary" => Imaginary,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_every_keyword_spelling() {
        for (spelling, expected) in [
            ("int", Keyword::Int),
            ("_Bool", Keyword::Bool),
            ("_Complex", Keyword::Complex),
            ("_Imaginary", Keyword::Imaginary),
            ("restrict", Keyword::Restrict),
            ("inline", Keyword::Inline),
        ] {
            assert_eq!(lookup(spelling), Some(expected));
        }
    }

    #[test]
    fn unmatched_identifier_is_none() {
        assert_eq!(lookup("my_variable"), None);
        assert_eq!(lookup("Int"), None, "keywords are case-sensitive");
    }
}
