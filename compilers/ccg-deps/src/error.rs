use ccg_protocol::VarId;
use thiserror::Error;

/// Failure to read one marked-up category. Local to that lexicon entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("malformed markup '{input}'")]
    Syntax { input: String },

    #[error("unexpected '{rest}' after markup in '{input}'")]
    Trailing { input: String, rest: String },

    #[error("markup '{input}' binds a slot to the current word, but no word was given")]
    UnboundWord { input: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("spine id {id} is neither the head nor used by a later argument")]
    UnthreadedSpineId { id: VarId },
}

/// Internal-consistency faults: the rule table picked a combinator the
/// operands cannot support. Fatal to the derivation being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombineError {
    #[error("{operation} needs a functor on the left")]
    NotAFunctor { operation: &'static str },

    #[error("cannot unify coindexations of different shapes")]
    ShapeMismatch,

    #[error("argument {arg_number} out of range for a category with {arity} arguments")]
    ArgumentOutOfRange { arg_number: usize, arity: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexiconError {
    #[error("invalid markedup archive: {0}")]
    Archive(String),

    #[error("failed to serialize markedup archive: {0}")]
    Serialize(String),

    #[error("unsupported markedup archive version {0}")]
    Version(u32),
}
