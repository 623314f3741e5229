#[cfg(test)]
mod test;

use crate::deal::{Seat, Suit};
use core::fmt;
use core::str::FromStr;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Denomination, a suit or notrump
///
/// We choose this representation over `Option<Suit>` because we are not sure if
/// the latter can be optimized to a single byte.
///
/// The order of the suits provides natural ordering by deriving [`PartialOrd`]
/// and [`Ord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Strain {
    /// ♣
    Clubs,
    /// ♦
    Diamonds,
    /// ♥
    Hearts,
    /// ♠
    Spades,
    /// NT, the strain not proposing a trump suit
    Notrump,
}

impl Strain {
    /// Whether this strain is a minor suit (clubs or diamonds)
    #[must_use]
    pub const fn is_minor(self) -> bool {
        matches!(self, Self::Clubs | Self::Diamonds)
    }

    /// Whether this strain is a major suit (hearts or spades)
    #[must_use]
    pub const fn is_major(self) -> bool {
        matches!(self, Self::Hearts | Self::Spades)
    }

    /// Whether this strain is a suit
    #[must_use]
    pub const fn is_suit(self) -> bool {
        !matches!(self, Self::Notrump)
    }

    /// Whether this strain is notrump
    #[must_use]
    pub const fn is_notrump(self) -> bool {
        matches!(self, Self::Notrump)
    }

    /// Helper constant for iteration over all strains
    pub const ALL: [Self; 5] = [
        Self::Clubs,
        Self::Diamonds,
        Self::Hearts,
        Self::Spades,
        Self::Notrump,
    ];
}

impl fmt::Display for Strain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match Suit::try_from(*self) {
            Ok(suit) => write!(f, "{suit}"),
            Err(_) => f.write_str("NT"),
        }
    }
}

/// A call that proposes a contract
///
/// The order of the fields ensures natural ordering by deriving [`PartialOrd`]
/// and [`Ord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bid {
    /// The number of tricks (adding the book of 6 tricks) to take to fulfill
    /// the contract
    pub level: u8,

    /// The strain of the contract
    pub strain: Strain,
}

impl Bid {
    /// Create a bid from level and strain
    #[must_use]
    pub const fn new(level: u8, strain: Strain) -> Self {
        Self { level, strain }
    }
}

/// Penalty inflicted on a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Penalty {
    /// No penalty
    None,
    /// Doubled by the defenders
    Doubled,
    /// Redoubled by the declaring side
    Redoubled,
}

/// The statement of the pair winning the bidding that they will take at least
/// the number of tricks (in addition to the book of 6 tricks), and the strain
/// denotes the trump suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Contract {
    /// The basic part of a contract
    pub bid: Bid,
    /// The penalty inflicted on the contract
    pub penalty: Penalty,
    /// The player who first named the strain for the declaring side
    pub declarer: Seat,
}

impl Contract {
    /// Create a contract from level, strain, penalty, and declarer
    ///
    /// # Panics
    /// Panics if the level is not in the range 1..=7.
    #[must_use]
    pub const fn new(level: u8, strain: Strain, penalty: Penalty, declarer: Seat) -> Self {
        assert!(level >= 1 && level <= 7);
        Self {
            bid: Bid::new(level, strain),
            penalty,
            declarer,
        }
    }

    /// The trump suit, or [`None`] in notrump
    #[must_use]
    pub fn trump(self) -> Option<Suit> {
        Suit::try_from(self.bid.strain).ok()
    }

    /// Tricks the declaring side must take, the level plus the book of 6
    #[must_use]
    pub const fn target_tricks(self) -> u8 {
        self.bid.level + 6
    }

    /// Partner of the declarer, whose hand is laid face up
    #[must_use]
    pub fn dummy(self) -> Seat {
        self.declarer.partner()
    }

    /// The defender making the opening lead
    #[must_use]
    pub fn opening_leader(self) -> Seat {
        self.declarer.lho()
    }

    /// Whether a seat belongs to the declaring side
    #[must_use]
    pub fn is_declaring(self, seat: Seat) -> bool {
        seat.partnership() == self.declarer.partnership()
    }

    /// Defenders in the order they play after the declarer
    #[must_use]
    pub fn defenders(self) -> [Seat; 2] {
        [self.declarer.lho(), self.declarer.rho()]
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let penalty = match self.penalty {
            Penalty::None => "",
            Penalty::Doubled => "X",
            Penalty::Redoubled => "XX",
        };
        write!(
            f,
            "{}{}{} by {}",
            self.bid.level, self.bid.strain, penalty, self.declarer
        )
    }
}

/// Error raised when a contract cannot be parsed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Invalid contract, expected a level 1-7, a strain, optional X or XX, and a declarer, e.g. 6S by S")]
pub struct ParseContractError;

static CONTRACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*([1-7])\s*(NT|[CDHSN♣♦♥♠])\s*(XX|X)?\s*(?:BY\s+)?(NORTH|EAST|SOUTH|WEST|[NESW])\s*$")
        .expect("Invalid contract regex")
});

impl FromStr for Contract {
    type Err = ParseContractError;

    /// Parse a contract such as `6S by S`, `3NTX West` or `4♥XX N`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = CONTRACT.captures(s).ok_or(ParseContractError)?;
        let level = captures[1].parse().map_err(|_| ParseContractError)?;
        let strain = match captures[2].to_ascii_uppercase().as_str() {
            "C" | "♣" => Strain::Clubs,
            "D" | "♦" => Strain::Diamonds,
            "H" | "♥" => Strain::Hearts,
            "S" | "♠" => Strain::Spades,
            _ => Strain::Notrump,
        };
        let penalty = match captures.get(3).map(|m| m.as_str().len()) {
            Some(2) => Penalty::Redoubled,
            Some(_) => Penalty::Doubled,
            None => Penalty::None,
        };
        let declarer = captures[4].parse().map_err(|_| ParseContractError)?;
        Ok(Self::new(level, strain, penalty, declarer))
    }
}
