use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The nine ranks dealt in a game of 八雀.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CardSymbol {
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl CardSymbol {
    pub const ALL: [CardSymbol; 9] = [
        CardSymbol::Six,
        CardSymbol::Seven,
        CardSymbol::Eight,
        CardSymbol::Nine,
        CardSymbol::Ten,
        CardSymbol::Jack,
        CardSymbol::Queen,
        CardSymbol::King,
        CardSymbol::Ace,
    ];

    pub fn code(self) -> &'static str {
        match self {
            CardSymbol::Six => "6",
            CardSymbol::Seven => "7",
            CardSymbol::Eight => "8",
            CardSymbol::Nine => "9",
            CardSymbol::Ten => "10",
            CardSymbol::Jack => "J",
            CardSymbol::Queen => "Q",
            CardSymbol::King => "K",
            CardSymbol::Ace => "A",
        }
    }

    /// Case-insensitive lookup of a card code such as `"10"` or `"q"`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|symbol| symbol.code().eq_ignore_ascii_case(code))
    }

    pub fn point_value(self) -> u32 {
        match self {
            CardSymbol::Six
            | CardSymbol::Seven
            | CardSymbol::Eight
            | CardSymbol::Nine
            | CardSymbol::Ten => 10,
            CardSymbol::Jack | CardSymbol::Queen | CardSymbol::King => 20,
            CardSymbol::Ace => 30,
        }
    }
}

impl fmt::Display for CardSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown card symbol: {0:?}")]
pub struct CardParseError(pub String);

impl FromStr for CardSymbol {
    type Err = CardParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_code(value).ok_or_else(|| CardParseError(value.to_string()))
    }
}

/// Scoring weight of a raw card code. Unknown codes score zero.
pub fn point_value(code: &str) -> u32 {
    CardSymbol::from_code(code).map_or(0, CardSymbol::point_value)
}

/// One counted group of cards found in a query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedCardToken {
    pub card: CardSymbol,
    pub count: u32,
}

impl ParsedCardToken {
    pub fn new(card: CardSymbol, count: u32) -> Self {
        Self { card, count }
    }

    pub fn subtotal(&self) -> u64 {
        u64::from(self.count) * u64::from(self.card.point_value())
    }
}
