use std::collections::HashMap;

use ccg_protocol::{Preposition, VarId};
use tracing::debug;

use crate::coindexation::Coindexation;
use crate::dependency::{Dependency, UnlabelledDependency, UnresolvedDependency};
use crate::disjoint::{DisjointSet, Merge};
use crate::error::CombineError;
use crate::slot::{Heads, Slot};

/// What a substitution does to an unresolved dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The argument slot is now bound to words.
    Resolved(UnlabelledDependency),
    /// Still waiting, possibly under a renamed slot.
    Pending(UnresolvedDependency),
}

/// The result of unifying two coindexation trees of the same shape.
///
/// Ids that unify end up in one class of a disjoint set; bindings and
/// propagated prepositions are stored per class representative.
#[derive(Debug, Clone)]
pub struct UnifyingSubstitution {
    classes: DisjointSet<VarId>,
    bindings: HashMap<VarId, Heads>,
    prepositions: HashMap<VarId, Preposition>,
    is_conjunction: bool,
}

impl UnifyingSubstitution {
    /// Unifies `left` (the functor side) with `right` node by node.
    ///
    /// With `is_conjunction`, a slot bound on both sides keeps the heads
    /// of both, right conjunct first.
    pub fn make(left: &Coindexation, right: &Coindexation, is_conjunction: bool) -> Result<Self, CombineError> {
        if !left.same_shape(right) {
            return Err(CombineError::ShapeMismatch);
        }

        let mut substitution = Self {
            classes: DisjointSet::new(),
            bindings: HashMap::new(),
            prepositions: HashMap::new(),
            is_conjunction,
        };
        substitution.unify(left, right);
        substitution.classes.compress();
        Ok(substitution)
    }

    pub fn is_conjunction(&self) -> bool {
        self.is_conjunction
    }

    fn unify(&mut self, left: &Coindexation, right: &Coindexation) {
        let root = self.merge(left.id(), right.id());

        match (left.slot(), right.slot()) {
            (Slot::Var(_), Slot::Var(_)) => {}
            (Slot::Head { heads, .. }, Slot::Var(_)) => {
                self.bindings.insert(root, heads.clone());
            }
            (left_slot, Slot::Head { heads, .. }) => {
                let bound = match left_slot.heads() {
                    Some(left_heads) if self.is_conjunction => heads.concat(left_heads),
                    _ => heads.clone(),
                };
                self.bindings.insert(root, bound);
            }
        }

        self.propagate(root, left.preposition(), right.preposition());

        if let (
            Coindexation::Binary { left: l1, right: r1, .. },
            Coindexation::Binary { left: l2, right: r2, .. },
        ) = (left, right)
        {
            self.unify(l1, l2);
            self.unify(r1, r2);
        }
    }

    /// Joins two classes. Data already attached to the left class wins.
    fn merge(&mut self, left: VarId, right: VarId) -> VarId {
        let left_root = self.classes.find(left);
        let right_root = self.classes.find(right);
        let Merge { root, absorbed } = self.classes.union(left_root, right_root);
        if absorbed.is_none() {
            return root;
        }

        let binding = self
            .bindings
            .remove(&left_root)
            .or_else(|| self.bindings.remove(&right_root));
        self.bindings.remove(&right_root);
        if let Some(heads) = binding {
            self.bindings.insert(root, heads);
        }

        let preposition = self
            .prepositions
            .remove(&left_root)
            .or_else(|| self.prepositions.remove(&right_root));
        self.prepositions.remove(&right_root);
        if let Some(preposition) = preposition {
            self.prepositions.insert(root, preposition);
        }
        root
    }

    fn propagate(&mut self, root: VarId, left: Preposition, right: Preposition) {
        match (left, right) {
            (Preposition::Unspecified, Preposition::Unspecified) => {}
            (Preposition::Unspecified, value) | (value, Preposition::Unspecified) => {
                self.prepositions.insert(root, value);
            }
            (left, right) if left != right => {
                debug!(%left, %right, id = %root, "conflicting prepositions, keeping both");
            }
            _ => {}
        }
    }

    fn root(&self, id: VarId) -> VarId {
        self.classes.root(id)
    }

    fn preposition_for(&self, root: VarId, current: Preposition) -> Preposition {
        if current != Preposition::Unspecified {
            return current;
        }
        self.prepositions.get(&root).copied().unwrap_or(current)
    }

    /// The image of one node.
    pub(crate) fn apply_to_slot(&self, slot: &Slot, preposition: Preposition) -> (Slot, Preposition) {
        let root = self.root(slot.id());
        let slot = match self.bindings.get(&root) {
            Some(heads) => Slot::Head {
                id: root,
                heads: heads.clone(),
            },
            None => slot.with_id(root),
        };
        (slot, self.preposition_for(root, preposition))
    }

    /// Rewrites every node of `coindexation`. Ids the substitution never saw
    /// are left alone.
    pub fn apply_to(&self, coindexation: &Coindexation) -> Coindexation {
        coindexation.map_nodes(&mut |slot, preposition| self.apply_to_slot(slot, preposition))
    }

    pub fn apply_to_dependency(&self, dependency: &UnresolvedDependency) -> Resolution {
        let root = self.root(dependency.argument_id());
        let preposition = self.preposition_for(root, dependency.preposition());
        match self.bindings.get(&root) {
            Some(heads) => Resolution::Resolved(dependency.resolve(heads.clone(), preposition)),
            None => Resolution::Pending(dependency.with_argument(root, preposition)),
        }
    }
}
