//! Type qualifiers (`const`, `volatile`, `restrict`), spec.md §3's
//! qualifier bitset, realized with `bitflags` the way the teacher encodes
//! small closed attribute sets.

use bitflags::bitflags;

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Qualifiers: u8 {
        const CONST    = 0b001;
        const VOLATILE = 0b010;
        const RESTRICT = 0b100;
    }
}

impl Qualifiers {
    pub fn is_const(self) -> bool {
        self.contains(Qualifiers::CONST)
    }

    pub fn is_volatile(self) -> bool {
        self.contains(Qualifiers::VOLATILE)
    }

    pub fn is_restrict(self) -> bool {
        self.contains(Qualifiers::RESTRICT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_qualifiers_have_no_flags_set() {
        let q = Qualifiers::empty();
        assert!(!q.is_const());
        assert!(!q.is_volatile());
        assert!(!q.is_restrict());
    }

    #[test]
    fn const_volatile_combine() {
        let q = Qualifiers::CONST | Qualifiers::VOLATILE;
        assert!(q.is_const());
        assert!(q.is_volatile());
        assert!(!q.is_restrict());
    }
}
