use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use ccg_protocol::{VarId, WordIndex};
use nonempty::NonEmpty;

/// The word(s) heading a node. Coordination gives a node several heads.
#[derive(Debug, Clone)]
pub struct Heads(NonEmpty<WordIndex>);

impl Heads {
    pub fn new(word: WordIndex) -> Self {
        Self(NonEmpty::new(word))
    }

    pub fn from_vec(words: Vec<WordIndex>) -> Option<Self> {
        NonEmpty::from_vec(words).map(Heads)
    }

    /// `self` followed by `other`, as produced by coordination.
    pub fn concat(&self, other: &Heads) -> Heads {
        let mut joined = self.0.clone();
        for word in other.iter() {
            joined.push(word);
        }
        Heads(joined)
    }

    pub fn first(&self) -> WordIndex {
        self.0.head
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = WordIndex> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<WordIndex> {
        self.iter().collect()
    }
}

impl PartialEq for Heads {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Heads {}

impl PartialOrd for Heads {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Heads {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl Hash for Heads {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for word in self.iter() {
            word.hash(state);
        }
    }
}

impl fmt::Display for Heads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, word) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", word)?;
        }
        f.write_str("}")
    }
}

/// Identity of one coindexation node.
///
/// A bound slot remembers the variable it was bound through, so a later
/// coordination step can still re-bind every node of that class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Var(VarId),
    Head { id: VarId, heads: Heads },
}

impl Slot {
    pub fn id(&self) -> VarId {
        match self {
            Slot::Var(id) => *id,
            Slot::Head { id, .. } => *id,
        }
    }

    pub fn heads(&self) -> Option<&Heads> {
        match self {
            Slot::Var(_) => None,
            Slot::Head { heads, .. } => Some(heads),
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Slot::Head { .. })
    }

    /// Same binding under a different variable.
    pub fn with_id(&self, id: VarId) -> Slot {
        match self {
            Slot::Var(_) => Slot::Var(id),
            Slot::Head { heads, .. } => Slot::Head {
                id,
                heads: heads.clone(),
            },
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Var(id) => write!(f, "_{}", id),
            Slot::Head { id, heads } => write!(f, "_{}{}", id, heads),
        }
    }
}
