use std::sync::Arc;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, one_of},
    combinator::{map, opt, recognize},
    multi::fold_many0,
    sequence::{delimited, pair},
    IResult,
};

use crate::category::{Atom, Category, Slash};
use crate::error::CategoryError;

/// Atom names are alphabetic (`NP`, `conj`) or a single punctuation mark.
fn atom_name(input: &str) -> IResult<&str, &str> {
    alt((
        take_while1(|c: char| c.is_ascii_alphabetic()),
        recognize(one_of(",.;:")),
    ))(input)
}

fn is_feature_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// `[dcl]` after an atom name.
pub fn feature(input: &str) -> IResult<&str, &str> {
    delimited(char('['), take_while1(is_feature_char), char(']'))(input)
}

/// An atom with an optional feature, e.g. `S[dcl]`.
pub fn atom(input: &str) -> IResult<&str, Atom> {
    map(pair(atom_name, opt(feature)), |(name, feature)| Atom {
        name: name.to_string(),
        feature: feature.map(str::to_string),
    })(input)
}

pub fn slash(input: &str) -> IResult<&str, Slash> {
    alt((
        map(char('/'), |_| Slash::Forward),
        map(char('\\'), |_| Slash::Backward),
    ))(input)
}

fn term(input: &str) -> IResult<&str, Arc<Category>> {
    alt((
        delimited(char('('), category, char(')')),
        map(atom, Category::atomic),
    ))(input)
}

/// Slash chains associate to the left: `A/B/C` is `(A/B)/C`.
pub fn category(input: &str) -> IResult<&str, Arc<Category>> {
    let (input, first) = term(input)?;
    fold_many0(
        pair(slash, term),
        move || first.clone(),
        |result, (slash, argument)| Category::functor(result, slash, argument),
    )(input)
}

/// Parses a whole category string, rejecting trailing input.
pub fn parse_category(original_input: &str) -> Result<Arc<Category>, CategoryError> {
    let trimmed = original_input.trim();
    let parsed: IResult<&str, Arc<Category>> = category(trimmed);

    match parsed {
        Ok((rest, category)) => {
            if rest.is_empty() {
                Ok(category)
            } else {
                Err(CategoryError::Trailing {
                    input: original_input.to_string(),
                    rest: rest.to_string(),
                })
            }
        }
        Err(_) => Err(CategoryError::Syntax {
            input: original_input.to_string(),
        }),
    }
}
