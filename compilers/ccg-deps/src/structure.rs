use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ccg_category::{Atom, Category};
use ccg_protocol::{Preposition, VarId, WordIndex};
use tracing::trace;

use crate::coindexation::Coindexation;
use crate::dependency::{Dependency, UnlabelledDependency, UnresolvedDependency};
use crate::error::{CombineError, MarkupError};
use crate::markedup::Markedup;
use crate::markup::MarkedCategory;
use crate::slot::Heads;
use crate::substitution::{Resolution, UnifyingSubstitution};

/// The dependency state of one chart cell: how its slots are coindexed and
/// which dependencies are still waiting for an argument.
///
/// Values are immutable and always normalized, so two structures built by
/// different derivations compare equal when they are equivalent. The hash
/// is computed once on construction.
///
/// An unresolved dependency may wait on an id that no longer occurs in the
/// coindexation, e.g. after the slot it was attached to is consumed by
/// application. Such ids are kept and numbered after the tree's own ids, so
/// the structure still compares equal across derivations and no dependency
/// is dropped.
#[derive(Debug, Clone)]
pub struct DependencyStructure {
    coindexation: Coindexation,
    unresolved: BTreeSet<UnresolvedDependency>,
    is_conjunction: bool,
    hash: u64,
}

/// Assigns ids in order of first appearance.
struct Renaming {
    map: HashMap<VarId, VarId>,
    next: VarId,
}

impl Renaming {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            next: VarId::FIRST,
        }
    }

    fn rename(&mut self, id: VarId) -> VarId {
        if let Some(renamed) = self.map.get(&id) {
            return *renamed;
        }
        let renamed = self.next;
        self.next = renamed.next();
        self.map.insert(id, renamed);
        renamed
    }
}

impl DependencyStructure {
    fn from_parts(
        coindexation: Coindexation,
        unresolved: BTreeSet<UnresolvedDependency>,
        is_conjunction: bool,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        coindexation.hash(&mut hasher);
        unresolved.hash(&mut hasher);
        is_conjunction.hash(&mut hasher);
        Self {
            coindexation,
            unresolved,
            is_conjunction,
            hash: hasher.finish(),
        }
    }

    fn canonical(
        coindexation: &Coindexation,
        unresolved: &BTreeSet<UnresolvedDependency>,
        is_conjunction: bool,
    ) -> Self {
        let mut renaming = Renaming::new();
        let coindexation = coindexation.map_nodes(&mut |slot, preposition| {
            (slot.with_id(renaming.rename(slot.id())), preposition)
        });
        // Ids no longer in the tree follow in dependency order
        let unresolved = unresolved
            .iter()
            .map(|dependency| {
                let id = renaming.rename(dependency.argument_id());
                dependency.with_argument(id, dependency.preposition())
            })
            .collect();
        Self::from_parts(coindexation, unresolved, is_conjunction)
    }

    /// The structure for `word` at `position` with lexical category
    /// `category`, using the markedup entry for the category if there is one.
    pub fn make(
        category: &Arc<Category>,
        word: &str,
        position: WordIndex,
        markedup: &Markedup,
    ) -> Result<Self, CombineError> {
        let template = match markedup.lookup(category) {
            Some(template) => template.instantiate(Some(position)),
            None => {
                trace!(%category, "no markedup entry, using default coindexation");
                Coindexation::from_category(category)
            }
        };
        if !template.fits(category) {
            return Err(CombineError::ShapeMismatch);
        }

        let mut coindexation = template.bind_head(position);
        if category.is_function_into(&Category::Atomic(Atom::new("PP"))) {
            coindexation = coindexation.with_result_preposition(Preposition::from_word(word));
        }

        let mut unresolved = BTreeSet::new();
        for arg_number in 1..=category.number_of_arguments() {
            let argument = coindexation
                .argument(arg_number)
                .ok_or(CombineError::ShapeMismatch)?;
            // A slot the entry binds to the word itself would be a self-dependency
            if argument.slot().is_bound() {
                continue;
            }
            unresolved.insert(UnresolvedDependency::new(
                position,
                category.clone(),
                arg_number,
                argument.id(),
                argument.preposition(),
            )?);
        }
        Ok(Self::canonical(&coindexation, &unresolved, false))
    }

    /// A head-less structure for a unary rule written as a functor from the
    /// child's category to the parent's, e.g. type raising
    /// `((S_2/(S_2\NP_1)_2)_2\NP_1)_2`. Apply it to the child structure.
    pub fn for_rule(rule: &MarkedCategory) -> Result<Self, MarkupError> {
        if rule.binds_word() {
            return Err(MarkupError::UnboundWord {
                input: rule.source().to_string(),
            });
        }
        Ok(Self::canonical(&rule.instantiate(None), &BTreeSet::new(), false))
    }

    pub fn coindexation(&self) -> &Coindexation {
        &self.coindexation
    }

    pub fn unresolved(&self) -> &BTreeSet<UnresolvedDependency> {
        &self.unresolved
    }

    pub fn is_conjunction(&self) -> bool {
        self.is_conjunction
    }

    /// The words heading this constituent, if known yet.
    pub fn heads(&self) -> Option<&Heads> {
        self.coindexation.heads()
    }

    /// One head word; which one is unspecified for coordinated heads.
    pub fn arbitrary_head(&self) -> Option<WordIndex> {
        self.heads().map(Heads::first)
    }

    pub fn max_id(&self) -> VarId {
        self.unresolved
            .iter()
            .map(UnresolvedDependency::argument_id)
            .fold(self.coindexation.max_id(), VarId::max)
    }

    /// Renames every id so that id 1 becomes `start`. Nothing is unified.
    pub fn standardize_apart(&self, start: VarId) -> Self {
        let coindexation = self
            .coindexation
            .map_nodes(&mut |slot, preposition| (slot.with_id(slot.id().shifted_to(start)), preposition));
        let unresolved = self
            .unresolved
            .iter()
            .map(|dependency| {
                dependency.with_argument(dependency.argument_id().shifted_to(start), dependency.preposition())
            })
            .collect();
        Self::from_parts(coindexation, unresolved, self.is_conjunction)
    }

    /// Renumbers ids from 1 in pre-order.
    pub fn normalize(&self) -> Self {
        Self::canonical(&self.coindexation, &self.unresolved, self.is_conjunction)
    }

    fn split(&self, operation: &'static str) -> Result<(&Coindexation, &Coindexation), CombineError> {
        match (self.coindexation.left(), self.coindexation.right()) {
            (Some(left), Some(right)) => Ok((left, right)),
            _ => Err(CombineError::NotAFunctor { operation }),
        }
    }

    /// Pushes newly bound dependencies of both operands onto `out` and
    /// returns the rest, renamed.
    fn resolve(
        &self,
        other: &DependencyStructure,
        substitution: &UnifyingSubstitution,
        out: &mut Vec<UnlabelledDependency>,
    ) -> BTreeSet<UnresolvedDependency> {
        let mut pending = BTreeSet::new();
        for dependency in self.unresolved.iter().chain(other.unresolved.iter()) {
            match substitution.apply_to_dependency(dependency) {
                Resolution::Resolved(resolved) => out.push(resolved),
                Resolution::Pending(dependency) => {
                    pending.insert(dependency);
                }
            }
        }
        pending
    }

    /// Function application: `X/Y` with `Y` gives `X`.
    pub fn apply(
        &self,
        other: &DependencyStructure,
        out: &mut Vec<UnlabelledDependency>,
    ) -> Result<Self, CombineError> {
        let (result, argument) = self.split("apply")?;
        let other = other.standardize_apart(self.max_id().next());
        let substitution = UnifyingSubstitution::make(argument, &other.coindexation, self.is_conjunction)?;

        let before = out.len();
        let unresolved = self.resolve(&other, &substitution, out);
        trace!(resolved = out.len() - before, pending = unresolved.len(), "apply");

        Ok(Self::canonical(&substitution.apply_to(result), &unresolved, false))
    }

    /// Composition: `X/Y` with `Y/Z` gives `X/Z`.
    pub fn compose(
        &self,
        other: &DependencyStructure,
        out: &mut Vec<UnlabelledDependency>,
    ) -> Result<Self, CombineError> {
        let (result, argument) = self.split("compose")?;
        let other = other.standardize_apart(self.max_id().next());
        let (inner, outer) = other.split("compose")?;
        let substitution = UnifyingSubstitution::make(argument, inner, self.is_conjunction)?;

        let before = out.len();
        let unresolved = self.resolve(&other, &substitution, out);
        trace!(resolved = out.len() - before, pending = unresolved.len(), "compose");

        // A modifier passes on the head of what it modifies
        let (slot, preposition) = if self.coindexation.is_modifier() {
            substitution.apply_to_slot(other.coindexation.slot(), other.coindexation.preposition())
        } else {
            substitution.apply_to_slot(self.coindexation.slot(), self.coindexation.preposition())
        };
        let coindexation = Coindexation::binary(
            substitution.apply_to(result),
            substitution.apply_to(outer),
            slot,
            preposition,
        );
        Ok(Self::canonical(&coindexation, &unresolved, false))
    }

    /// Second-order composition: `X/Y` with `(Y/Z)/W` gives `(X/Z)/W`.
    pub fn compose2(
        &self,
        other: &DependencyStructure,
        out: &mut Vec<UnlabelledDependency>,
    ) -> Result<Self, CombineError> {
        let (result, argument) = self.split("compose2")?;
        let other = other.standardize_apart(self.max_id().next());
        let (inner, outer) = other.split("compose2")?;
        let (innermost, middle) = match (inner.left(), inner.right()) {
            (Some(left), Some(right)) => (left, right),
            _ => return Err(CombineError::NotAFunctor { operation: "compose2" }),
        };
        let substitution = UnifyingSubstitution::make(argument, innermost, self.is_conjunction)?;

        let before = out.len();
        let unresolved = self.resolve(&other, &substitution, out);
        trace!(resolved = out.len() - before, pending = unresolved.len(), "compose2");

        let coindexation = if self.coindexation.is_modifier() {
            substitution.apply_to(&other.coindexation)
        } else {
            let (slot, preposition) =
                substitution.apply_to_slot(self.coindexation.slot(), self.coindexation.preposition());
            let composed = Coindexation::binary(
                substitution.apply_to(result),
                substitution.apply_to(middle),
                slot.clone(),
                preposition,
            );
            Coindexation::binary(composed, substitution.apply_to(outer), slot, preposition)
        };
        Ok(Self::canonical(&coindexation, &unresolved, false))
    }

    /// This structure as the right conjunct of a coordination, `X\X`.
    ///
    /// Applying the result to the left conjunct merges the heads of both.
    pub fn conjunction(&self) -> Self {
        let coindexation = Coindexation::binary(
            self.coindexation.clone(),
            self.coindexation.clone(),
            self.coindexation.slot().clone(),
            self.coindexation.preposition(),
        );
        Self::canonical(&coindexation, &self.unresolved, true)
    }
}

impl PartialEq for DependencyStructure {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
            && self.is_conjunction == other.is_conjunction
            && self.coindexation == other.coindexation
            && self.unresolved == other.unresolved
    }
}

impl Eq for DependencyStructure {}

impl Hash for DependencyStructure {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

impl fmt::Display for DependencyStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coindexation)?;
        for dependency in &self.unresolved {
            write!(
                f,
                " {}.{}->_{}",
                dependency.head(),
                dependency.arg_number(),
                dependency.argument_id()
            )?;
        }
        Ok(())
    }
}
