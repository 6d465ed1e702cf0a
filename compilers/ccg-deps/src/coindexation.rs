use std::collections::HashSet;
use std::fmt;

use ccg_category::Category;
use ccg_protocol::{Preposition, VarId, WordIndex};

use crate::error::{MarkupError, ValidationError};
use crate::markup::MarkedCategory;
use crate::slot::{Heads, Slot};

/// A tree mirroring a category's shape, recording which slot fills which
/// position of that category.
///
/// Ids are only meaningful inside one tree; two trees must be standardized
/// apart before their ids can be compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coindexation {
    Leaf {
        slot: Slot,
        preposition: Preposition,
    },
    Binary {
        left: Box<Coindexation>,
        right: Box<Coindexation>,
        slot: Slot,
        preposition: Preposition,
    },
}

impl Coindexation {
    pub fn leaf(slot: Slot, preposition: Preposition) -> Self {
        Coindexation::Leaf { slot, preposition }
    }

    pub fn binary(left: Coindexation, right: Coindexation, slot: Slot, preposition: Preposition) -> Self {
        Coindexation::Binary {
            left: Box::new(left),
            right: Box::new(right),
            slot,
            preposition,
        }
    }

    /// Parses a marked-up category such as `((S_1\NP_2)_1/NP_3)_1`.
    /// Slots written `{_*}` are bound to `word`.
    pub fn from_string(markup: &str, word: WordIndex) -> Result<Coindexation, MarkupError> {
        Ok(MarkedCategory::parse(markup)?.instantiate(Some(word)))
    }

    /// Default coindexation for a category with no lexicon entry.
    ///
    /// The result spine shares the head id and each argument gets fresh ids.
    /// For a modifier `X|X` the result and argument share every id, so the
    /// head of the modified constituent passes through.
    pub fn from_category(category: &Category) -> Coindexation {
        let mut next = VarId::FIRST;
        Self::build_default(category, None, &mut next)
    }

    fn build_default(category: &Category, inherited: Option<VarId>, next: &mut VarId) -> Coindexation {
        let id = inherited.unwrap_or_else(|| {
            let id = *next;
            *next = next.next();
            id
        });

        match category {
            Category::Atomic(atom) => {
                let preposition = if atom.name == "PP" {
                    Preposition::Unspecified
                } else {
                    Preposition::None
                };
                Coindexation::leaf(Slot::Var(id), preposition)
            }
            Category::Functor { argument, .. } if category.is_modifier() => {
                let shared = Self::build_default(argument, None, next);
                Coindexation::binary(shared.clone(), shared, Slot::Var(id), Preposition::None)
            }
            Category::Functor { result, argument, .. } => {
                let left = Self::build_default(result, Some(id), next);
                let right = Self::build_default(argument, None, next);
                Coindexation::binary(left, right, Slot::Var(id), Preposition::None)
            }
        }
    }

    pub fn slot(&self) -> &Slot {
        match self {
            Coindexation::Leaf { slot, .. } => slot,
            Coindexation::Binary { slot, .. } => slot,
        }
    }

    pub fn id(&self) -> VarId {
        self.slot().id()
    }

    pub fn heads(&self) -> Option<&Heads> {
        self.slot().heads()
    }

    pub fn preposition(&self) -> Preposition {
        match self {
            Coindexation::Leaf { preposition, .. } => *preposition,
            Coindexation::Binary { preposition, .. } => *preposition,
        }
    }

    pub fn left(&self) -> Option<&Coindexation> {
        match self {
            Coindexation::Binary { left, .. } => Some(left),
            Coindexation::Leaf { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&Coindexation> {
        match self {
            Coindexation::Binary { right, .. } => Some(right),
            Coindexation::Leaf { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Coindexation::Leaf { .. })
    }

    /// A node whose result and argument are the same slot, as in `X/X`.
    /// Type raising also threads one id through both sides, but its sides
    /// differ in shape.
    pub fn is_modifier(&self) -> bool {
        match self {
            Coindexation::Binary { left, right, .. } => left.id() == right.id() && left.same_shape(right),
            Coindexation::Leaf { .. } => false,
        }
    }

    /// Number of binary nodes along the left spine.
    pub fn arity(&self) -> usize {
        match self {
            Coindexation::Leaf { .. } => 0,
            Coindexation::Binary { left, .. } => 1 + left.arity(),
        }
    }

    /// The node for category argument `index` (1-based, innermost first).
    pub fn argument(&self, index: usize) -> Option<&Coindexation> {
        let arity = self.arity();
        if index == 0 || index > arity {
            return None;
        }
        let mut current = self;
        for _ in index..arity {
            current = current.left()?;
        }
        current.right()
    }

    pub fn same_shape(&self, other: &Coindexation) -> bool {
        match (self, other) {
            (Coindexation::Leaf { .. }, Coindexation::Leaf { .. }) => true,
            (
                Coindexation::Binary { left: l1, right: r1, .. },
                Coindexation::Binary { left: l2, right: r2, .. },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }

    /// Whether this tree mirrors the branching of `category`.
    pub fn fits(&self, category: &Category) -> bool {
        match (self, category.left(), category.right()) {
            (Coindexation::Leaf { .. }, None, None) => true,
            (Coindexation::Binary { left, right, .. }, Some(result), Some(argument)) => {
                left.fits(result) && right.fits(argument)
            }
            _ => false,
        }
    }

    pub fn max_id(&self) -> VarId {
        match self {
            Coindexation::Leaf { slot, .. } => slot.id(),
            Coindexation::Binary { left, right, slot, .. } => {
                slot.id().max(left.max_id()).max(right.max_id())
            }
        }
    }

    /// Every id in pre-order (node, then left, then right), with repeats.
    pub fn ids(&self) -> Vec<VarId> {
        let mut ids = Vec::new();
        self.collect_ids(&mut ids);
        ids
    }

    fn collect_ids(&self, ids: &mut Vec<VarId>) {
        ids.push(self.id());
        if let Coindexation::Binary { left, right, .. } = self {
            left.collect_ids(ids);
            right.collect_ids(ids);
        }
    }

    /// Rebuilds the tree node by node in pre-order.
    pub(crate) fn map_nodes<F>(&self, f: &mut F) -> Coindexation
    where
        F: FnMut(&Slot, Preposition) -> (Slot, Preposition),
    {
        match self {
            Coindexation::Leaf { slot, preposition } => {
                let (slot, preposition) = f(slot, *preposition);
                Coindexation::leaf(slot, preposition)
            }
            Coindexation::Binary { left, right, slot, preposition } => {
                let (slot, preposition) = f(slot, *preposition);
                let left = left.map_nodes(f);
                let right = right.map_nodes(f);
                Coindexation::binary(left, right, slot, preposition)
            }
        }
    }

    /// Binds the head id, and every node threading it, to `word`.
    pub fn bind_head(&self, word: WordIndex) -> Coindexation {
        let head = self.id();
        self.map_nodes(&mut |slot, preposition| {
            if slot.id() == head {
                let bound = Slot::Head {
                    id: head,
                    heads: Heads::new(word),
                };
                (bound, preposition)
            } else {
                (slot.clone(), preposition)
            }
        })
    }

    /// Fills in the preposition of the result leaf at the bottom of the
    /// spine, if it is still unspecified.
    pub fn with_result_preposition(&self, value: Preposition) -> Coindexation {
        match self {
            Coindexation::Leaf { slot, preposition } => {
                let preposition = if *preposition == Preposition::Unspecified {
                    value
                } else {
                    *preposition
                };
                Coindexation::leaf(slot.clone(), preposition)
            }
            Coindexation::Binary { left, right, slot, preposition } => Coindexation::binary(
                left.with_result_preposition(value),
                (**right).clone(),
                slot.clone(),
                *preposition,
            ),
        }
    }

    /// Checks that every id on the spine below the head is the head id or
    /// was introduced by an argument further right.
    ///
    /// A diagnostic for lexicon entries; combinators do not call it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let head = self.id();
        let mut used: HashSet<VarId> = HashSet::new();
        let mut node = self;

        while let Coindexation::Binary { left, right, .. } = node {
            used.extend(right.ids());
            let id = left.id();
            if id != head && !used.contains(&id) {
                return Err(ValidationError::UnthreadedSpineId { id });
            }
            node = left;
        }
        Ok(())
    }
}

impl fmt::Display for Coindexation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Coindexation::Binary { left, right, .. } = self {
            write!(f, "({} {})", left, right)?;
        }
        write!(f, "{}", self.slot())?;
        match self.preposition() {
            Preposition::None => Ok(()),
            preposition => write!(f, "[{}]", preposition),
        }
    }
}
