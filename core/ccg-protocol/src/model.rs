use rkyv::{Archive, Deserialize, Serialize};
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One lexicon entry: a category and its coindexation markup, both as text.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct MarkedupEntry {
    pub category: String,
    pub arity: u32,
    pub markup: String,
}

/// Compiled markedup lexicon, as written by `markedup-compiler`.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct MarkedupArchive {
    pub version: u32,
    pub entries: Vec<MarkedupEntry>,
}

impl MarkedupArchive {
    pub const VERSION: u32 = 1;

    pub fn new(entries: Vec<MarkedupEntry>) -> Self {
        Self {
            version: Self::VERSION,
            entries,
        }
    }
}
