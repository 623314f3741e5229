
use crate::Strain;
use core::fmt;
use core::num::{NonZeroU8, Wrapping};
use core::ops::{Add, BitAnd, BitOr, BitXor, Index, IndexMut, Not, Sub};
use core::str::FromStr;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// A suit of playing cards
///
/// Suits are convertible to [`Strain`]s since suits form a subset of strains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    /// ♣, convertible to [`Strain::Clubs`]
    Clubs,
    /// ♦, convertible to [`Strain::Diamonds`]
    Diamonds,
    /// ♥, convertible to [`Strain::Hearts`]
    Hearts,
    /// ♠, convertible to [`Strain::Spades`]
    Spades,
}

impl Suit {
    /// Suits in the ascending order, the order in this crate
    pub const ASC: [Self; 4] = [Self::Clubs, Self::Diamonds, Self::Hearts, Self::Spades];

    /// Suits in the descending order, the order of PBN hands
    pub const DESC: [Self; 4] = [Self::Spades, Self::Hearts, Self::Diamonds, Self::Clubs];

    /// The symbol of the suit
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Clubs => '♣',
            Self::Diamonds => '♦',
            Self::Hearts => '♥',
            Self::Spades => '♠',
        }
    }

    const fn from_char(c: char) -> Option<Self> {
        match c {
            'C' | 'c' | '♣' => Some(Self::Clubs),
            'D' | 'd' | '♦' => Some(Self::Diamonds),
            'H' | 'h' | '♥' => Some(Self::Hearts),
            'S' | 's' | '♠' => Some(Self::Spades),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.symbol())
    }
}

impl From<Suit> for Strain {
    fn from(suit: Suit) -> Self {
        match suit {
            Suit::Clubs => Self::Clubs,
            Suit::Diamonds => Self::Diamonds,
            Suit::Hearts => Self::Hearts,
            Suit::Spades => Self::Spades,
        }
    }
}

/// Error raised when converting [`Strain::Notrump`] to a suit
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Notrump is not a suit")]
pub struct SuitFromNotrumpError;

impl TryFrom<Strain> for Suit {
    type Error = SuitFromNotrumpError;

    fn try_from(strain: Strain) -> Result<Self, Self::Error> {
        match strain {
            Strain::Clubs => Ok(Self::Clubs),
            Strain::Diamonds => Ok(Self::Diamonds),
            Strain::Hearts => Ok(Self::Hearts),
            Strain::Spades => Ok(Self::Spades),
            Strain::Notrump => Err(SuitFromNotrumpError),
        }
    }
}

bitflags::bitflags! {
    /// A set of suits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SuitFlags: u8 {
        /// The set containing [`Suit::Clubs`]
        const CLUBS = 0b0001;
        /// The set containing [`Suit::Diamonds`]
        const DIAMONDS = 0b0010;
        /// The set containing [`Suit::Hearts`]
        const HEARTS = 0b0100;
        /// The set containing [`Suit::Spades`]
        const SPADES = 0b1000;
    }
}

impl From<Suit> for SuitFlags {
    fn from(suit: Suit) -> Self {
        Self::from_bits_truncate(1 << suit as u8)
    }
}

impl SuitFlags {
    /// Suits in this set, from spades down to clubs
    pub fn suits(self) -> impl Iterator<Item = Suit> {
        Suit::DESC
            .into_iter()
            .filter(move |&suit| self.contains(suit.into()))
    }
}

/// Position at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    /// Dealer of Board 1, partner of [`Seat::South`]
    North,
    /// Dealer of Board 2, partner of [`Seat::West`]
    East,
    /// Dealer of Board 3, partner of [`Seat::North`]
    South,
    /// Dealer of Board 4, partner of [`Seat::East`]
    West,
}

impl Add<Wrapping<u8>> for Seat {
    type Output = Self;

    fn add(self, rhs: Wrapping<u8>) -> Self {
        // SAFETY: this is just modular arithmetics on a 4-element enum
        unsafe { core::mem::transmute((Wrapping(self as u8) + rhs).0 & 3) }
    }
}

impl Sub<Wrapping<u8>> for Seat {
    type Output = Self;

    fn sub(self, rhs: Wrapping<u8>) -> Self {
        // SAFETY: this is just modular arithmetics on a 4-element enum
        unsafe { core::mem::transmute((Wrapping(self as u8) - rhs).0 & 3) }
    }
}

impl Seat {
    /// Seats in the order of play, starting from North
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The partner sitting opposite
    #[must_use]
    pub fn partner(self) -> Self {
        self + Wrapping(2)
    }

    /// Left-hand opponent, the next seat to play
    #[must_use]
    pub fn lho(self) -> Self {
        self + Wrapping(1)
    }

    /// Right-hand opponent, the previous seat to play
    #[must_use]
    pub fn rho(self) -> Self {
        self - Wrapping(1)
    }

    /// The partnership this seat belongs to
    #[must_use]
    pub const fn partnership(self) -> SeatFlags {
        match self {
            Self::North | Self::South => SeatFlags::NS,
            Self::East | Self::West => SeatFlags::EW,
        }
    }
}

impl From<Seat> for char {
    fn from(seat: Seat) -> Self {
        match seat {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::North => "North",
            Self::East => "East",
            Self::South => "South",
            Self::West => "West",
        })
    }
}

/// Error raised when a seat cannot be parsed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Invalid seat, expected one of N, E, S, W")]
pub struct ParseSeatError;

impl FromStr for Seat {
    type Err = ParseSeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "N" | "NORTH" => Ok(Self::North),
            "E" | "EAST" => Ok(Self::East),
            "S" | "SOUTH" => Ok(Self::South),
            "W" | "WEST" => Ok(Self::West),
            _ => Err(ParseSeatError),
        }
    }
}

bitflags::bitflags! {
    /// A set of seats
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SeatFlags: u8 {
        /// The empty set
        const EMPTY = 0;
        /// The set containing all seats
        const ALL = 0b1111;
        /// The set containing [`Seat::North`]
        const NORTH = 0b0001;
        /// The set containing [`Seat::East`]
        const EAST = 0b0010;
        /// The set containing [`Seat::South`]
        const SOUTH = 0b0100;
        /// The set containing [`Seat::West`]
        const WEST = 0b1000;
        /// The set containing the north-south pair
        const NS = Self::NORTH.bits() | Self::SOUTH.bits();
        /// The set containing the east-west pair
        const EW = Self::EAST.bits() | Self::WEST.bits();
    }
}

const _: () = assert!(matches!(SeatFlags::all(), SeatFlags::ALL));
const _: () = assert!(matches!(SeatFlags::NS.union(SeatFlags::EW), SeatFlags::ALL));
const _: () = assert!(matches!(SeatFlags::NS.intersection(SeatFlags::EW), SeatFlags::EMPTY));
const _: () = assert!(matches!(SeatFlags::NORTH.union(SeatFlags::SOUTH), SeatFlags::NS));
const _: () = assert!(matches!(SeatFlags::EAST.union(SeatFlags::WEST), SeatFlags::EW));

impl From<Seat> for SeatFlags {
    fn from(seat: Seat) -> Self {
        Self::from_bits_truncate(1 << seat as u8)
    }
}

/// A playing card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card(NonZeroU8);

impl Card {
    /// Create a card from suit and rank
    ///
    /// The rank is a number from 2 to 14.  J, Q, K, A are encoded as 11, 12,
    /// 13, 14 respectively.
    ///
    /// # Panics
    /// Panics if the rank is not in the range 2..=14.
    #[must_use]
    pub const fn new(suit: Suit, rank: u8) -> Self {
        assert!(rank >= 2 && rank <= 14);
        // SAFETY: rank is guaranteed to be non-zero
        Self(unsafe { NonZeroU8::new_unchecked(rank << 2 | suit as u8) })
    }

    /// The suit of the card
    #[must_use]
    pub const fn suit(self) -> Suit {
        // SAFETY: suit is guaranteed to be valid, in (0..=3)
        unsafe { core::mem::transmute(self.0.get() & 3) }
    }

    /// The rank of the card
    ///
    /// The rank is a number from 2 to 14.  J, Q, K, A are denoted as 11, 12,
    /// 13, 14 respectively.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.0.get() >> 2
    }
}

const RANKS: &[u8; 13] = b"23456789TJQKA";

const fn rank_from_char(c: char) -> Option<u8> {
    match c {
        '2'..='9' => Some(c as u8 - b'0'),
        'T' | 't' => Some(10),
        'J' | 'j' => Some(11),
        'Q' | 'q' => Some(12),
        'K' | 'k' => Some(13),
        'A' | 'a' => Some(14),
        _ => None,
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.suit().symbol())?;
        f.write_char(RANKS[self.rank() as usize - 2] as char)
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error raised when a card cannot be parsed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Invalid card, expected a suit and a rank such as HK or ♥K")]
pub struct ParseCardError;

static CARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([CDHScdhs♣♦♥♠])(10|[2-9TJQKAtjqka])$").expect("Invalid card regex")
});

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = CARD.captures(s.trim()).ok_or(ParseCardError)?;
        let suit = captures[1]
            .chars()
            .next()
            .and_then(Suit::from_char)
            .ok_or(ParseCardError)?;
        let rank = match &captures[2] {
            "10" => 10,
            rank => rank
                .chars()
                .next()
                .and_then(rank_from_char)
                .ok_or(ParseCardError)?,
        };
        Ok(Self::new(suit, rank))
    }
}

/// A bitset whose size is known at compile time
pub trait SmallSet<T>: Copy + Eq + BitAnd + BitOr + BitXor + Not + Sub {
    /// The empty set
    const EMPTY: Self;

    /// The set containing all possible values
    const ALL: Self;

    /// The number of elements in the set
    #[must_use]
    fn len(self) -> usize;

    /// Whether the set is empty
    #[must_use]
    fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Whether the set contains a value
    fn contains(self, value: T) -> bool;

    /// Insert a value into the set
    fn insert(&mut self, value: T) -> bool;

    /// Remove a value from the set
    fn remove(&mut self, value: T) -> bool;

    /// Toggle a value in the set
    fn toggle(&mut self, value: T) -> bool;
}

/// A set of cards of the same suit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Holding(u16);

impl SmallSet<u8> for Holding {
    const EMPTY: Self = Self(0);
    const ALL: Self = Self(0x7FFC);

    fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    fn contains(self, rank: u8) -> bool {
        rank < 16 && self.0 & 1 << rank != 0
    }

    fn insert(&mut self, rank: u8) -> bool {
        if rank >= 16 {
            return false;
        }
        let insertion = 1 << rank & Self::ALL.0;
        let inserted = insertion & !self.0 != 0;
        self.0 |= insertion;
        inserted
    }

    fn remove(&mut self, rank: u8) -> bool {
        let removed = self.contains(rank);
        if removed {
            self.0 &= !(1 << rank);
        }
        removed
    }

    fn toggle(&mut self, rank: u8) -> bool {
        if rank < 16 {
            self.0 ^= 1 << rank & Self::ALL.0;
        }
        self.contains(rank)
    }
}

impl Holding {
    /// As a bitset of ranks
    #[must_use]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Create a holding from a bitset of ranks
    #[must_use]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Iterate over the ranks in the ascending order
    ///
    /// The iterator is double-ended, so `.rev()` walks from the ace down.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = u8> {
        (2..=14).filter(move |&rank| self.contains(rank))
    }

    /// The highest rank in the holding
    #[must_use]
    pub fn highest(self) -> Option<u8> {
        self.iter().next_back()
    }

    /// The top card of each run of equivalent cards
    ///
    /// Two cards of this holding are equivalent when no card of `live` ranks
    /// between them.  Cards absent from `live` have left play and no longer
    /// separate anything.  Playing either card of an equivalent pair leads to
    /// the same outcome, so searchers only need one of them.
    #[must_use]
    pub fn sequence_tops(self, live: Self) -> Self {
        let mut tops = Self::EMPTY;
        let mut previous = false;

        for rank in (live | self).iter().rev() {
            let mine = self.contains(rank);
            if mine && !previous {
                tops.insert(rank);
            }
            previous = mine;
        }

        tops
    }
}

impl BitAnd for Holding {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for Holding {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitXor for Holding {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }
}

impl Not for Holding {
    type Output = Self;

    fn not(self) -> Self {
        Self::ALL ^ self
    }
}

impl Sub for Holding {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self & !rhs
    }
}

impl fmt::Display for Holding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in self.iter().rev() {
            use fmt::Write;
            f.write_char(RANKS[rank as usize - 2] as char)?;
        }
        Ok(())
    }
}

/// Error raised when a holding, a hand or a deal cannot be parsed
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseHandError {
    /// Ranks are not written from the ace down
    #[error("Invalid holding, ranks must be written in the descending order")]
    InvalidHolding,

    /// A rank appears twice, possibly through a spot card `x`
    #[error("Repeated rank in a holding")]
    RepeatedRank,

    /// A hand is not four holdings separated by dots
    #[error("A hand must consist of four suits separated by dots")]
    NotFourSuits,

    /// A deal is not in the PBN format
    #[error("Invalid deal, expected a PBN deal such as N:AKQ.xxx.xxx.xxxx - - -")]
    InvalidDeal,
}

static HOLDING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(A?K?Q?J?T?9?8?7?6?5?4?3?2?)(x*)$").expect("Invalid holding regex")
});

impl FromStr for Holding {
    type Err = ParseHandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.replace("10", "T");
        let captures = HOLDING
            .captures(&s)
            .ok_or(ParseHandError::InvalidHolding)?;

        let mut holding = Self::EMPTY;
        for c in captures[1].chars() {
            holding.insert(rank_from_char(c).ok_or(ParseHandError::InvalidHolding)?);
        }

        let spots = captures[2].len();
        if holding.len() + spots > 13 {
            return Err(ParseHandError::RepeatedRank);
        }

        // Spot cards take the lowest ranks
        for rank in (2..).take(spots) {
            if !holding.insert(rank) {
                return Err(ParseHandError::RepeatedRank);
            }
        }

        Ok(holding)
    }
}

/// A hand of playing cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Hand(pub [Holding; 4]);

impl Index<Suit> for Hand {
    type Output = Holding;

    fn index(&self, suit: Suit) -> &Holding {
        &self.0[suit as usize]
    }
}

impl IndexMut<Suit> for Hand {
    fn index_mut(&mut self, suit: Suit) -> &mut Holding {
        &mut self.0[suit as usize]
    }
}

impl Hand {
    /// As a bitset of cards
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        // SAFETY: every combination of 64 bits is a valid `u64`
        unsafe { core::mem::transmute(self.0) }
    }

    /// Create a hand from a bitset of cards
    ///
    /// This function removes invalid cards.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        // SAFETY: just filtered out invalid cards
        unsafe { Self::from_bits_unchecked(bits & Self::ALL.to_bits()) }
    }

    /// Create a hand from a bitset of cards without checking
    ///
    /// # Safety
    /// The bitset must not contain invalid cards.
    #[must_use]
    pub const unsafe fn from_bits_unchecked(bits: u64) -> Self {
        core::mem::transmute(bits)
    }

    /// Iterate over the cards, clubs first and low ranks first
    ///
    /// The iterator is double-ended, so `.rev()` starts from the ace of
    /// spades.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = Card> {
        Suit::ASC.into_iter().flat_map(move |suit| {
            self[suit]
                .iter()
                .map(move |rank| Card::new(suit, rank))
        })
    }

    /// Suits in which this hand holds at least one card
    #[must_use]
    pub fn suits(self) -> SuitFlags {
        Suit::ASC
            .into_iter()
            .filter(|&suit| !self[suit].is_empty())
            .fold(SuitFlags::empty(), |flags, suit| flags | SuitFlags::from(suit))
    }
}

impl SmallSet<Card> for Hand {
    const EMPTY: Self = Self([Holding::EMPTY; 4]);
    const ALL: Self = Self([Holding::ALL; 4]);

    fn len(self) -> usize {
        self.to_bits().count_ones() as usize
    }

    fn contains(self, card: Card) -> bool {
        self[card.suit()].contains(card.rank())
    }

    fn insert(&mut self, card: Card) -> bool {
        self[card.suit()].insert(card.rank())
    }

    fn remove(&mut self, card: Card) -> bool {
        self[card.suit()].remove(card.rank())
    }

    fn toggle(&mut self, card: Card) -> bool {
        self[card.suit()].toggle(card.rank())
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self[Suit::Spades],
            self[Suit::Hearts],
            self[Suit::Diamonds],
            self[Suit::Clubs]
        )
    }
}

impl FromStr for Hand {
    type Err = ParseHandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            return Ok(Self::EMPTY);
        }

        let holdings: Vec<&str> = s.split('.').collect();
        let [spades, hearts, diamonds, clubs] = holdings[..] else {
            return Err(ParseHandError::NotFourSuits);
        };

        Ok(Self([
            clubs.parse()?,
            diamonds.parse()?,
            hearts.parse()?,
            spades.parse()?,
        ]))
    }
}

impl BitAnd for Hand {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        // SAFETY: safe when both operands are valid
        unsafe { Self::from_bits_unchecked(self.to_bits() & rhs.to_bits()) }
    }
}

impl BitOr for Hand {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        // SAFETY: safe when both operands are valid
        unsafe { Self::from_bits_unchecked(self.to_bits() | rhs.to_bits()) }
    }
}

impl BitXor for Hand {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        // SAFETY: safe when both operands are valid
        unsafe { Self::from_bits_unchecked(self.to_bits() ^ rhs.to_bits()) }
    }
}

impl Not for Hand {
    type Output = Self;

    fn not(self) -> Self {
        Self::ALL ^ self
    }
}

impl Sub for Hand {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self & !rhs
    }
}

/// Error raised when a deal does not partition its cards properly
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DealError {
    /// The same card is held by two seats
    #[error("{0} is held by more than one seat")]
    DuplicateCard(Card),

    /// A hand holds the wrong number of cards
    #[error("{seat} holds {len} cards instead of {expected}")]
    HandSize {
        /// The offending seat
        seat: Seat,
        /// Cards held by the seat
        len: usize,
        /// Cards every seat must hold
        expected: usize,
    },

    /// No seat holds any card
    #[error("The deal holds no cards")]
    Empty,

    /// The trick tally does not match the cards already played
    #[error("{tally} tricks are recorded but {played} tricks have been played")]
    TallyMismatch {
        /// Sum of the recorded tally
        tally: u8,
        /// Tricks played before the ending
        played: u8,
    },
}

/// A deal of four hands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Deal(pub [Hand; 4]);

impl Index<Seat> for Deal {
    type Output = Hand;

    fn index(&self, seat: Seat) -> &Hand {
        &self.0[seat as usize]
    }
}

impl IndexMut<Seat> for Deal {
    fn index_mut(&mut self, seat: Seat) -> &mut Hand {
        &mut self.0[seat as usize]
    }
}

struct DealDisplay {
    deal: Deal,
    seat: Seat,
}

impl fmt::Display for DealDisplay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{} {} {} {}",
            char::from(self.seat),
            self.deal[self.seat],
            self.deal[self.seat + Wrapping(1)],
            self.deal[self.seat + Wrapping(2)],
            self.deal[self.seat + Wrapping(3)],
        )
    }
}

impl fmt::Display for Deal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.display(Seat::North))
    }
}

impl Deal {
    /// Display the deal from a seat's perspective
    #[must_use]
    pub fn display(self, seat: Seat) -> impl fmt::Display {
        DealDisplay { deal: self, seat }
    }

    /// All cards held by any seat
    #[must_use]
    pub fn cards(self) -> Hand {
        self.0.into_iter().fold(Hand::EMPTY, |all, hand| all | hand)
    }

    /// Check that the deal partitions the 52 cards into four 13-card hands
    ///
    /// # Errors
    /// A [`DealError`] naming the first duplicate card or short hand
    pub fn validate(&self) -> Result<(), DealError> {
        self.validate_lengths(13)
    }

    /// Check that the deal is a valid ending: disjoint hands of equal length
    ///
    /// Returns the number of cards in each hand.
    ///
    /// # Errors
    /// A [`DealError`] naming the first duplicate card or uneven hand
    pub fn validate_ending(&self) -> Result<usize, DealError> {
        let len = self[Seat::North].len();
        if self.cards().is_empty() {
            return Err(DealError::Empty);
        }
        self.validate_lengths(len.clamp(1, 13))?;
        Ok(len)
    }

    fn validate_lengths(&self, expected: usize) -> Result<(), DealError> {
        let mut seen = Hand::EMPTY;

        for hand in self.0 {
            if let Some(card) = (seen & hand).iter().next() {
                return Err(DealError::DuplicateCard(card));
            }
            seen = seen | hand;
        }

        for seat in Seat::ALL {
            let len = self[seat].len();
            if len != expected {
                return Err(DealError::HandSize {
                    seat,
                    len,
                    expected,
                });
            }
        }

        Ok(())
    }
}

static DEAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([NESWnesw])\s*:\s*(\S+)\s+(\S+)\s+(\S+)\s+(\S+)\s*$")
        .expect("Invalid deal regex")
});

impl FromStr for Deal {
    type Err = ParseHandError;

    /// Parse a deal in the PBN format, e.g. `N:AKQ.xxx.xxx.xxxx - - -`
    ///
    /// The first hand belongs to the seat before the colon, and the rest
    /// follow clockwise.  A `-` stands for an empty hand.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = DEAL.captures(s).ok_or(ParseHandError::InvalidDeal)?;
        let first: Seat = captures[1]
            .parse()
            .map_err(|_| ParseHandError::InvalidDeal)?;

        let mut deal = Self::default();
        for offset in 0..4 {
            deal[first + Wrapping(offset)] = captures[usize::from(offset) + 2].parse()?;
        }
        Ok(deal)
    }
}
