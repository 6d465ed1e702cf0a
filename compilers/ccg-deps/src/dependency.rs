use std::fmt;
use std::sync::Arc;

use ccg_category::Category;
use ccg_protocol::{Preposition, RoleTable, SemanticRole, VarId, WordIndex};

use crate::error::CombineError;
use crate::slot::Heads;

/// Fields shared by every stage of a dependency's life.
pub trait Dependency {
    /// Position of the governing word.
    fn head(&self) -> WordIndex;
    /// Lexical category of the head word.
    fn category(&self) -> &Arc<Category>;
    /// Which argument of `category` this dependency fills, from 1.
    fn arg_number(&self) -> usize;
    fn preposition(&self) -> Preposition;
}

/// A preposition only survives on arguments that are `PP`.
fn checked_preposition(category: &Category, arg_number: usize, preposition: Preposition) -> Preposition {
    match category.argument(arg_number) {
        Some(argument) if argument.is_preposition() => preposition,
        _ => Preposition::None,
    }
}

/// A dependency whose argument is still a symbolic slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnresolvedDependency {
    head: WordIndex,
    category: Arc<Category>,
    arg_number: usize,
    argument_id: VarId,
    preposition: Preposition,
}

impl UnresolvedDependency {
    pub fn new(
        head: WordIndex,
        category: Arc<Category>,
        arg_number: usize,
        argument_id: VarId,
        preposition: Preposition,
    ) -> Result<Self, CombineError> {
        let arity = category.number_of_arguments();
        if arg_number == 0 || arg_number > arity {
            return Err(CombineError::ArgumentOutOfRange { arg_number, arity });
        }
        let preposition = checked_preposition(&category, arg_number, preposition);
        Ok(Self {
            head,
            category,
            arg_number,
            argument_id,
            preposition,
        })
    }

    pub fn argument_id(&self) -> VarId {
        self.argument_id
    }

    /// Same dependency pointing at another slot.
    pub(crate) fn with_argument(&self, argument_id: VarId, preposition: Preposition) -> Self {
        Self {
            head: self.head,
            category: self.category.clone(),
            arg_number: self.arg_number,
            argument_id,
            preposition: checked_preposition(&self.category, self.arg_number, preposition),
        }
    }

    /// The argument slot is now bound to `arguments`.
    pub(crate) fn resolve(&self, arguments: Heads, preposition: Preposition) -> UnlabelledDependency {
        UnlabelledDependency {
            head: self.head,
            category: self.category.clone(),
            arg_number: self.arg_number,
            arguments,
            preposition: checked_preposition(&self.category, self.arg_number, preposition),
        }
    }
}

impl Dependency for UnresolvedDependency {
    fn head(&self) -> WordIndex {
        self.head
    }

    fn category(&self) -> &Arc<Category> {
        &self.category
    }

    fn arg_number(&self) -> usize {
        self.arg_number
    }

    fn preposition(&self) -> Preposition {
        self.preposition
    }
}

/// A dependency whose argument words are known but whose role is not.
///
/// Several argument words form a hyperedge, e.g. coordinated objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnlabelledDependency {
    head: WordIndex,
    category: Arc<Category>,
    arg_number: usize,
    arguments: Heads,
    preposition: Preposition,
}

impl UnlabelledDependency {
    pub fn arguments(&self) -> &Heads {
        &self.arguments
    }

    /// Argument minus head, per argument word.
    pub fn offsets(&self) -> Vec<i64> {
        self.arguments.iter().map(|argument| self.head.offset_to(argument)).collect()
    }

    /// One resolved dependency per argument word, all carrying `role`.
    pub fn set_label(&self, role: SemanticRole) -> Vec<ResolvedDependency> {
        self.arguments
            .iter()
            .map(|argument| ResolvedDependency {
                head: self.head,
                category: self.category.clone(),
                arg_number: self.arg_number,
                argument,
                semantic_role: role,
                preposition: self.preposition,
            })
            .collect()
    }
}

impl Dependency for UnlabelledDependency {
    fn head(&self) -> WordIndex {
        self.head
    }

    fn category(&self) -> &Arc<Category> {
        &self.category
    }

    fn arg_number(&self) -> usize {
        self.arg_number
    }

    fn preposition(&self) -> Preposition {
        self.preposition
    }
}

impl fmt::Display for UnlabelledDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.head, self.category, self.arg_number, self.arguments)?;
        if self.preposition != Preposition::None {
            write!(f, " {}", self.preposition)?;
        }
        Ok(())
    }
}

/// A word-to-word dependency with its semantic role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedDependency {
    head: WordIndex,
    category: Arc<Category>,
    arg_number: usize,
    argument: WordIndex,
    semantic_role: SemanticRole,
    preposition: Preposition,
}

impl ResolvedDependency {
    pub fn argument(&self) -> WordIndex {
        self.argument
    }

    pub fn semantic_role(&self) -> SemanticRole {
        self.semantic_role
    }

    /// Argument position minus head position.
    pub fn offset(&self) -> i64 {
        self.head.offset_to(self.argument)
    }

    pub fn with_role(&self, semantic_role: SemanticRole) -> Self {
        Self {
            semantic_role,
            ..self.clone()
        }
    }

    /// Human-readable form with the role name looked up in `roles`.
    pub fn describe(&self, roles: &RoleTable) -> String {
        let role = roles.name(self.semantic_role).unwrap_or("?");
        match self.preposition {
            Preposition::None => format!(
                "{} {} {} {} {}",
                self.head, self.category, self.arg_number, self.argument, role
            ),
            preposition => format!(
                "{} {} {} {} {} {}",
                self.head, self.category, self.arg_number, self.argument, role, preposition
            ),
        }
    }
}

impl Dependency for ResolvedDependency {
    fn head(&self) -> WordIndex {
        self.head
    }

    fn category(&self) -> &Arc<Category> {
        &self.category
    }

    fn arg_number(&self) -> usize {
        self.arg_number
    }

    fn preposition(&self) -> Preposition {
        self.preposition
    }
}
