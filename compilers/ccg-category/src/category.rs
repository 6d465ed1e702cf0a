use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::CategoryError;
use crate::parser::parse_category;

/// Direction of a functor's argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slash {
    /// `X/Y`: the argument is found to the right.
    Forward,
    /// `X\Y`: the argument is found to the left.
    Backward,
}

impl Slash {
    pub fn as_char(self) -> char {
        match self {
            Slash::Forward => '/',
            Slash::Backward => '\\',
        }
    }
}

/// An atomic category such as `NP`, `S[dcl]` or `conj`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom {
    pub name: String,
    pub feature: Option<String>,
}

impl Atom {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            feature: None,
        }
    }

    pub fn with_feature(name: &str, feature: &str) -> Self {
        Self {
            name: name.to_string(),
            feature: Some(feature.to_string()),
        }
    }

    /// Same atom type; a missing feature on either side matches any feature.
    pub fn matches(&self, other: &Atom) -> bool {
        self.name == other.name
            && match (&self.feature, &other.feature) {
                (Some(a), Some(b)) => a == b,
                _ => true,
            }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.feature {
            Some(feature) => write!(f, "{}[{}]", self.name, feature),
            None => f.write_str(&self.name),
        }
    }
}

/// An immutable CCG category.
///
/// Arguments are numbered from 1 along the result spine, innermost first:
/// in `(S\NP)/NP` argument 1 is the subject and argument 2 the object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Atomic(Atom),
    Functor {
        result: Arc<Category>,
        slash: Slash,
        argument: Arc<Category>,
    },
}

impl Category {
    pub fn atomic(atom: Atom) -> Arc<Category> {
        Arc::new(Category::Atomic(atom))
    }

    pub fn functor(result: Arc<Category>, slash: Slash, argument: Arc<Category>) -> Arc<Category> {
        Arc::new(Category::Functor {
            result,
            slash,
            argument,
        })
    }

    /// Parses standard slash notation, e.g. `(S[dcl]\NP)/NP`.
    pub fn parse(input: &str) -> Result<Arc<Category>, CategoryError> {
        parse_category(input)
    }

    pub fn is_functor(&self) -> bool {
        matches!(self, Category::Functor { .. })
    }

    pub fn atom(&self) -> Option<&Atom> {
        match self {
            Category::Atomic(atom) => Some(atom),
            Category::Functor { .. } => None,
        }
    }

    /// The result of a functor (`X` in `X/Y`).
    pub fn left(&self) -> Option<&Arc<Category>> {
        match self {
            Category::Functor { result, .. } => Some(result),
            Category::Atomic(_) => None,
        }
    }

    /// The argument of a functor (`Y` in `X/Y`).
    pub fn right(&self) -> Option<&Arc<Category>> {
        match self {
            Category::Functor { argument, .. } => Some(argument),
            Category::Atomic(_) => None,
        }
    }

    pub fn slash(&self) -> Option<Slash> {
        match self {
            Category::Functor { slash, .. } => Some(*slash),
            Category::Atomic(_) => None,
        }
    }

    pub fn number_of_arguments(&self) -> usize {
        match self {
            Category::Atomic(_) => 0,
            Category::Functor { result, .. } => 1 + result.number_of_arguments(),
        }
    }

    /// Argument `index` in `1..=number_of_arguments()`.
    pub fn argument(&self, index: usize) -> Option<&Arc<Category>> {
        let arity = self.number_of_arguments();
        if index == 0 || index > arity {
            return None;
        }
        let mut current = self;
        for _ in index..arity {
            current = current.left()?;
        }
        current.right()
    }

    /// The atom at the bottom of the result spine.
    pub fn result_atom(&self) -> &Atom {
        match self {
            Category::Atomic(atom) => atom,
            Category::Functor { result, .. } => result.result_atom(),
        }
    }

    /// `X|X`: the argument is the result.
    pub fn is_modifier(&self) -> bool {
        match self {
            Category::Functor { result, argument, .. } => result == argument,
            Category::Atomic(_) => false,
        }
    }

    pub fn is_preposition(&self) -> bool {
        matches!(self, Category::Atomic(atom) if atom.name == "PP")
    }

    /// Structural match where missing features act as wildcards.
    pub fn matches(&self, other: &Category) -> bool {
        match (self, other) {
            (Category::Atomic(a), Category::Atomic(b)) => a.matches(b),
            (
                Category::Functor { result: r1, slash: s1, argument: a1 },
                Category::Functor { result: r2, slash: s2, argument: a2 },
            ) => s1 == s2 && r1.matches(r2) && a1.matches(a2),
            _ => false,
        }
    }

    /// True if `target` is this category or any result along its spine.
    pub fn is_function_into(&self, target: &Category) -> bool {
        self.matches(target)
            || self
                .left()
                .map(|result| result.is_function_into(target))
                .unwrap_or(false)
    }

    /// The same category with every feature removed.
    pub fn without_features(&self) -> Arc<Category> {
        match self {
            Category::Atomic(atom) => Category::atomic(Atom::new(&atom.name)),
            Category::Functor { result, slash, argument } => {
                Category::functor(result.without_features(), *slash, argument.without_features())
            }
        }
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_functor() {
            write!(f, "({})", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Atomic(atom) => write!(f, "{}", atom),
            Category::Functor { result, slash, argument } => {
                result.fmt_operand(f)?;
                write!(f, "{}", slash.as_char())?;
                argument.fmt_operand(f)
            }
        }
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_category(s).map(|category| (*category).clone())
    }
}
