use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Preposition marker carried by coindexation nodes and dependencies.
///
/// `None` means the slot is not prepositional at all. `Unspecified` marks a
/// `PP` slot whose preposition is only known once it is unified with the
/// preposition's own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
#[repr(u8)]
pub enum Preposition {
    None = 0,
    Unspecified = 1,
    About = 2,
    Above = 3,
    Across = 4,
    After = 5,
    Against = 6,
    Along = 7,
    Among = 8,
    Around = 9,
    As = 10,
    At = 11,
    Before = 12,
    Behind = 13,
    Below = 14,
    Beside = 15,
    Between = 16,
    Beyond = 17,
    By = 18,
    Despite = 19,
    Down = 20,
    During = 21,
    For = 22,
    From = 23,
    In = 24,
    Inside = 25,
    Into = 26,
    Like = 27,
    Near = 28,
    Of = 29,
    Off = 30,
    On = 31,
    Onto = 32,
    Out = 33,
    Outside = 34,
    Over = 35,
    Per = 36,
    Since = 37,
    Than = 38,
    Through = 39,
    To = 40,
    Toward = 41,
    Under = 42,
    Until = 43,
    Up = 44,
    Upon = 45,
    Via = 46,
    With = 47,
    Within = 48,
    Without = 49,
    /// A preposition word outside the closed list above.
    Other = 50,
}

const WORDS: &[(&str, Preposition)] = &[
    ("about", Preposition::About),
    ("above", Preposition::Above),
    ("across", Preposition::Across),
    ("after", Preposition::After),
    ("against", Preposition::Against),
    ("along", Preposition::Along),
    ("among", Preposition::Among),
    ("around", Preposition::Around),
    ("as", Preposition::As),
    ("at", Preposition::At),
    ("before", Preposition::Before),
    ("behind", Preposition::Behind),
    ("below", Preposition::Below),
    ("beside", Preposition::Beside),
    ("between", Preposition::Between),
    ("beyond", Preposition::Beyond),
    ("by", Preposition::By),
    ("despite", Preposition::Despite),
    ("down", Preposition::Down),
    ("during", Preposition::During),
    ("for", Preposition::For),
    ("from", Preposition::From),
    ("in", Preposition::In),
    ("inside", Preposition::Inside),
    ("into", Preposition::Into),
    ("like", Preposition::Like),
    ("near", Preposition::Near),
    ("of", Preposition::Of),
    ("off", Preposition::Off),
    ("on", Preposition::On),
    ("onto", Preposition::Onto),
    ("out", Preposition::Out),
    ("outside", Preposition::Outside),
    ("over", Preposition::Over),
    ("per", Preposition::Per),
    ("since", Preposition::Since),
    ("than", Preposition::Than),
    ("through", Preposition::Through),
    ("to", Preposition::To),
    ("toward", Preposition::Toward),
    ("towards", Preposition::Toward),
    ("under", Preposition::Under),
    ("until", Preposition::Until),
    ("up", Preposition::Up),
    ("upon", Preposition::Upon),
    ("via", Preposition::Via),
    ("with", Preposition::With),
    ("within", Preposition::Within),
    ("without", Preposition::Without),
];

impl Preposition {
    /// Maps a surface word to its preposition, case-insensitively.
    /// Words outside the closed list become `Other`.
    pub fn from_word(word: &str) -> Preposition {
        WORDS
            .iter()
            .find(|(w, _)| w.eq_ignore_ascii_case(word))
            .map(|(_, p)| *p)
            .unwrap_or(Preposition::Other)
    }

    /// Like `from_word`, but only accepts the closed list.
    pub fn from_literal(word: &str) -> Option<Preposition> {
        WORDS
            .iter()
            .find(|(w, _)| w.eq_ignore_ascii_case(word))
            .map(|(_, p)| *p)
    }

    /// The canonical lowercase spelling, if this is a concrete preposition.
    pub fn as_str(self) -> Option<&'static str> {
        WORDS.iter().find(|(_, p)| *p == self).map(|(w, _)| *w)
    }

    /// True for everything except `Unspecified`.
    pub fn is_specified(self) -> bool {
        self != Preposition::Unspecified
    }
}

impl core::fmt::Display for Preposition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match (self, self.as_str()) {
            (_, Some(word)) => f.write_str(word),
            (Preposition::None, _) => f.write_str("NONE"),
            (Preposition::Unspecified, _) => f.write_str("UNSPECIFIED"),
            _ => f.write_str("OTHER"),
        }
    }
}
