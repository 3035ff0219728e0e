//! Component signatures: a fixed 64-bit mask, one bit per component kind.

use std::fmt;

use super::component::ComponentKind;

/// Width of every signature. Adding a component kind past this is a compile error.
pub const MAX_COMPONENT_KINDS: usize = 64;

const _: () = assert!(ComponentKind::COUNT <= MAX_COMPONENT_KINDS);

/// Bitmask over [`ComponentKind`]s. Bit `k` is set iff kind slot `k` is present.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Signature(u64);

impl Signature {
    pub const EMPTY: Self = Self(0);

    /// A signature with exactly the given kinds set.
    pub fn of(kinds: &[ComponentKind]) -> Self {
        kinds.iter().fold(Self::EMPTY, |sig, &kind| sig.with(kind))
    }

    pub fn with(mut self, kind: ComponentKind) -> Self {
        self.set(kind);
        self
    }

    pub fn set(&mut self, kind: ComponentKind) {
        self.0 |= 1 << kind.slot();
    }

    pub fn clear(&mut self, kind: ComponentKind) {
        self.0 &= !(1 << kind.slot());
    }

    pub fn contains(self, kind: ComponentKind) -> bool {
        self.0 & (1 << kind.slot()) != 0
    }

    /// `(self & required) == required`: every bit of `required` is also set here.
    pub fn matches(self, required: Signature) -> bool {
        self.0 & required.0 == required.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// The kinds whose bits are set, in slot order.
    pub fn kinds(self) -> impl Iterator<Item = ComponentKind> {
        ComponentKind::ALL.into_iter().filter(move |&k| self.contains(k))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}
