use std::collections::HashMap;
use std::sync::Arc;

use ccg_category::parser::{atom, slash};
use ccg_category::{Atom, Category};
use ccg_protocol::{Preposition, VarId, WordIndex};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt},
    multi::fold_many0,
    sequence::{delimited, pair, preceded},
    IResult,
};

use crate::coindexation::Coindexation;
use crate::error::MarkupError;
use crate::slot::{Heads, Slot};

/// Annotation after an atom or a parenthesized group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    /// No suffix: a fresh id.
    Fresh,
    /// `_k`: the same id everywhere `k` appears in this entry.
    Shared(u32),
    /// `{_*}`: bound to the word the entry is instantiated for.
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Marked {
    Atom {
        preposition: Preposition,
        index: Index,
    },
    Functor {
        left: Box<Marked>,
        right: Box<Marked>,
        index: Index,
    },
}

impl Marked {
    fn with_index(self, index: Index) -> Marked {
        match self {
            Marked::Atom { preposition, .. } => Marked::Atom { preposition, index },
            Marked::Functor { left, right, .. } => Marked::Functor { left, right, index },
        }
    }

    fn binds_word(&self) -> bool {
        match self {
            Marked::Atom { index, .. } => *index == Index::Word,
            Marked::Functor { left, right, index } => {
                *index == Index::Word || left.binds_word() || right.binds_word()
            }
        }
    }
}

fn index(input: &str) -> IResult<&str, Index> {
    alt((
        map(tag("{_*}"), |_| Index::Word),
        map_res(preceded(char('_'), digit1), |digits: &str| {
            digits.parse::<u32>().map(Index::Shared)
        }),
    ))(input)
}

/// `PP[on]` names its preposition; the feature is not part of the category.
fn marked_atom(input: &str) -> IResult<&str, (Arc<Category>, Marked)> {
    map(atom, |atom| {
        if atom.name != "PP" {
            let marked = Marked::Atom {
                preposition: Preposition::None,
                index: Index::Fresh,
            };
            return (Category::atomic(atom), marked);
        }
        match atom.feature.as_deref().and_then(Preposition::from_literal) {
            Some(preposition) => (
                Category::atomic(Atom::new("PP")),
                Marked::Atom { preposition, index: Index::Fresh },
            ),
            None => (
                Category::atomic(atom),
                Marked::Atom {
                    preposition: Preposition::Unspecified,
                    index: Index::Fresh,
                },
            ),
        }
    })(input)
}

fn term(input: &str) -> IResult<&str, (Arc<Category>, Marked)> {
    let (input, (category, marked)) =
        alt((delimited(char('('), expression, char(')')), marked_atom))(input)?;
    let (input, suffix) = opt(index)(input)?;

    let marked = match suffix {
        Some(index) => marked.with_index(index),
        None => marked,
    };
    Ok((input, (category, marked)))
}

/// Slashes may be padded with spaces; nothing else may.
fn expression(input: &str) -> IResult<&str, (Arc<Category>, Marked)> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(delimited(multispace0, slash, multispace0), term),
        move || first.clone(),
        |(result, left), (slash, (argument, right))| {
            let marked = Marked::Functor {
                left: Box::new(left),
                right: Box::new(right),
                index: Index::Fresh,
            };
            (Category::functor(result, slash, argument), marked)
        },
    )(input)
}

/// A parsed lexicon entry: the category and its annotated slot structure.
///
/// Instantiating a template is a cheap tree walk, so the lexicon parses each
/// entry once and instantiates it per word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedCategory {
    category: Arc<Category>,
    markup: Marked,
    source: String,
}

impl MarkedCategory {
    pub fn parse(input: &str) -> Result<MarkedCategory, MarkupError> {
        let trimmed = input.trim();
        match expression(trimmed) {
            Ok(("", (category, markup))) => Ok(MarkedCategory {
                category,
                markup,
                source: trimmed.to_string(),
            }),
            Ok((rest, _)) => Err(MarkupError::Trailing {
                input: input.to_string(),
                rest: rest.to_string(),
            }),
            Err(_) => Err(MarkupError::Syntax {
                input: input.to_string(),
            }),
        }
    }

    /// The category with annotations and preposition literals removed.
    pub fn category(&self) -> &Arc<Category> {
        &self.category
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn arity(&self) -> usize {
        self.category.number_of_arguments()
    }

    /// True if some slot is written `{_*}`.
    pub fn binds_word(&self) -> bool {
        self.markup.binds_word()
    }

    /// Builds a coindexation numbered from `VarId::FIRST` in pre-order.
    ///
    /// Without a word, `{_*}` slots stay unbound; callers that need the
    /// binding check `binds_word` first.
    pub fn instantiate(&self, word: Option<WordIndex>) -> Coindexation {
        let mut numbering = Numbering {
            word,
            next: VarId::FIRST,
            labels: HashMap::new(),
            word_id: None,
        };
        numbering.build(&self.markup)
    }
}

struct Numbering {
    word: Option<WordIndex>,
    next: VarId,
    labels: HashMap<u32, VarId>,
    word_id: Option<VarId>,
}

impl Numbering {
    fn fresh(&mut self) -> VarId {
        let id = self.next;
        self.next = id.next();
        id
    }

    fn slot(&mut self, index: Index) -> Slot {
        match index {
            Index::Fresh => Slot::Var(self.fresh()),
            Index::Shared(label) => {
                let id = match self.labels.get(&label) {
                    Some(id) => *id,
                    None => {
                        let id = self.fresh();
                        self.labels.insert(label, id);
                        id
                    }
                };
                Slot::Var(id)
            }
            Index::Word => {
                let id = match self.word_id {
                    Some(id) => id,
                    None => {
                        let id = self.fresh();
                        self.word_id = Some(id);
                        id
                    }
                };
                match self.word {
                    Some(word) => Slot::Head {
                        id,
                        heads: Heads::new(word),
                    },
                    None => Slot::Var(id),
                }
            }
        }
    }

    fn build(&mut self, marked: &Marked) -> Coindexation {
        match marked {
            Marked::Atom { preposition, index } => {
                let slot = self.slot(*index);
                Coindexation::leaf(slot, *preposition)
            }
            Marked::Functor { left, right, index } => {
                let slot = self.slot(*index);
                let left = self.build(left);
                let right = self.build(right);
                Coindexation::binary(left, right, slot, Preposition::None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(s: &str) -> Arc<Category> {
        Category::parse(s).unwrap()
    }

    #[test]
    fn test_explicit_ids_are_shared() {
        let marked = MarkedCategory::parse("((S[dcl]_1\\NP_2)_1/NP_3)_1").unwrap();
        assert_eq!(marked.category(), &cat("(S[dcl]\\NP)/NP"));
        assert_eq!(marked.arity(), 2);

        let coindexation = marked.instantiate(None);
        assert!(coindexation.fits(marked.category()));
        let ids = coindexation.ids();
        assert_eq!(ids, vec![VarId(1), VarId(1), VarId(1), VarId(2), VarId(3)]);
    }

    #[test]
    fn test_missing_suffix_mints_fresh_ids() {
        let coindexation = MarkedCategory::parse("(S\\NP)/NP").unwrap().instantiate(None);
        let mut ids = coindexation.ids();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_word_binding() {
        let marked = MarkedCategory::parse("((S_1\\NP_2)_1/(S[to]_3\\NP{_*})_3)_1").unwrap();
        assert!(marked.binds_word());
        assert_eq!(marked.instantiate(None).argument(2).unwrap().right().unwrap().heads(), None);

        let coindexation = marked.instantiate(Some(WordIndex(6)));
        let controlled = coindexation.argument(2).unwrap().right().unwrap();
        assert_eq!(controlled.heads(), Some(&Heads::new(WordIndex(6))));
    }

    #[test]
    fn test_preposition_markers() {
        let unspecified = MarkedCategory::parse("((S_1\\NP_2)_1/PP_3)_1").unwrap();
        let coindexation = unspecified.instantiate(None);
        assert_eq!(coindexation.right().unwrap().preposition(), Preposition::Unspecified);

        let literal = MarkedCategory::parse("((S_1\\NP_2)_1/PP[on]_3)_1").unwrap();
        assert_eq!(literal.category(), &cat("(S\\NP)/PP"));
        let coindexation = literal.instantiate(None);
        assert_eq!(coindexation.right().unwrap().preposition(), Preposition::On);
        assert_eq!(coindexation.left().unwrap().right().unwrap().preposition(), Preposition::None);
    }

    #[test]
    fn test_group_suffix_applies_to_group() {
        let coindexation = MarkedCategory::parse("(NP_2/N_2)_1").unwrap().instantiate(None);
        assert_eq!(coindexation.id(), VarId(1));
        assert_eq!(coindexation.left().unwrap().id(), VarId(2));
        assert_eq!(coindexation.right().unwrap().id(), VarId(2));
    }

    #[test]
    fn test_spaces_around_slashes() {
        let spaced = MarkedCategory::parse("((S_1 \\ NP_2)_1 / NP_3)_1").unwrap();
        let packed = MarkedCategory::parse("((S_1\\NP_2)_1/NP_3)_1").unwrap();
        assert_eq!(spaced.category(), packed.category());
        assert_eq!(spaced.instantiate(None), packed.instantiate(None));
        assert_eq!(spaced.source(), "((S_1 \\ NP_2)_1 / NP_3)_1");

        let simple = MarkedCategory::parse("(S_1 / NP_2)_1").unwrap();
        assert_eq!(simple.category(), &cat("S/NP"));
    }

    #[test]
    fn test_malformed_markup() {
        assert!(matches!(MarkedCategory::parse("((S_1\\NP_2)_1/NP_3"), Err(MarkupError::Syntax { .. })));
        assert!(matches!(MarkedCategory::parse("(S_1 NP_2)_1"), Err(MarkupError::Syntax { .. })));
        assert!(matches!(MarkedCategory::parse("S_1NP_2"), Err(MarkupError::Trailing { .. })));
        assert!(matches!(MarkedCategory::parse("NP_"), Err(MarkupError::Trailing { .. })));
    }
}
