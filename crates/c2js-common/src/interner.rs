//! String interning for identifiers, keyword spellings, and string-literal text.
//!
//! Interned strings compare by identity (the `Atom`'s integer value), per the
//! GLOSSARY's definition of interning and invariant I-T1's "compare by
//! identity" pattern reused here for names.

use rustc_hash::FxHashMap;

/// A handle to an interned string. Two `Atom`s are equal iff they were
/// interned from equal text; comparison is a single integer compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    /// Construct an `Atom` from a raw index. Only meaningful paired with the
    /// `Interner` that produced it; exposed for test fixtures and for
    /// `CompilerSession`-internal bootstrapping of well-known atoms.
    pub const fn from_raw(raw: u32) -> Self {
        Atom(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Deduplicates strings into a single owned instance per distinct spelling.
#[derive(Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    lookup: FxHashMap<Box<str>, Atom>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the existing `Atom` if this spelling has been
    /// seen before, or allocating a new one.
    pub fn intern(&mut self, text: &str) -> Atom {
        if let Some(&atom) = self.lookup.get(text) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let boxed: Box<str> = text.into();
        self.strings.push(boxed.clone());
        self.lookup.insert(boxed, atom);
        atom
    }

    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }
}
