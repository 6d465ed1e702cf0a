use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// A `u32` newtype usable inside an archived lexicon. `repr(transparent)`
/// keeps the archived form the size of its integer.
macro_rules! numeric_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(Archive, Serialize, Deserialize)]
        #[archive(check_bytes)]
        #[cfg_attr(feature = "serde", derive(SerdeSerialize, SerdeDeserialize))]
        #[repr(transparent)]
        $vis struct $name(pub u32);

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

numeric_id! {
    /// Symbolic slot variable inside one coindexation tree. Zero is never allocated.
    pub struct VarId;
}

numeric_id! {
    /// Position of a word in the sentence being parsed.
    pub struct WordIndex;
}

numeric_id! {
    /// Interned semantic role label, issued by a `RoleRegistry`.
    pub struct SemanticRole;
}

impl VarId {
    /// First id handed out when numbering a tree.
    pub const FIRST: VarId = VarId(1);

    pub const fn next(self) -> VarId {
        VarId(self.0 + 1)
    }

    /// Shifts the id so that `VarId::FIRST` lands on `start`.
    pub const fn shifted_to(self, start: VarId) -> VarId {
        VarId(self.0 + start.0 - 1)
    }
}

impl WordIndex {
    /// Signed distance from `self` to `other`.
    pub fn offset_to(self, other: WordIndex) -> i64 {
        i64::from(other.0) - i64::from(self.0)
    }
}

impl SemanticRole {
    /// The label every dependency carries before the role labeller runs.
    pub const NONE: SemanticRole = SemanticRole(0);
}
