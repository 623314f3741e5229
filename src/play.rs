
use crate::contract::Contract;
use crate::deal::{Card, Deal, DealError, Hand, Seat, SmallSet as _, Suit};
use core::num::Wrapping;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a card cannot be played
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlayError {
    /// Another seat is due to play
    #[error("{expected} is to play, not {seat}")]
    OutOfTurn {
        /// The seat due to play
        expected: Seat,
        /// The seat that tried to play
        seat: Seat,
    },

    /// The card is not in the player's hand
    #[error("{0} is not held by the player")]
    NotHeld(Card),

    /// The player must follow suit
    #[error("{card} fails to follow {lead}")]
    Revoke {
        /// The card played
        card: Card,
        /// The suit led
        lead: Suit,
    },

    /// Every trick has been played
    #[error("All tricks have been played")]
    HandOver,

    /// The operation needs a trick boundary
    #[error("A trick is in progress")]
    TrickInProgress,
}

/// Cards played to a trick, in the order of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trick {
    leader: Seat,
    cards: [Option<Card>; 4],
    len: u8,
}

impl Trick {
    /// An empty trick led by `leader`
    #[must_use]
    pub const fn new(leader: Seat) -> Self {
        Self {
            leader,
            cards: [None; 4],
            len: 0,
        }
    }

    /// The seat leading to this trick
    #[must_use]
    pub const fn leader(self) -> Seat {
        self.leader
    }

    /// Number of cards played so far
    #[must_use]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    /// Whether no card has been played yet
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Whether all four cards have been played
    #[must_use]
    pub const fn is_complete(self) -> bool {
        self.len == 4
    }

    /// The seat due to play next
    #[must_use]
    pub fn next_seat(self) -> Seat {
        self.leader + Wrapping(self.len)
    }

    /// The suit of the first card
    #[must_use]
    pub fn lead_suit(self) -> Option<Suit> {
        self.cards[0].map(Card::suit)
    }

    /// Played cards with the seats that played them
    pub fn cards(self) -> impl Iterator<Item = (Seat, Card)> {
        (0..4u8).filter_map(move |i| {
            self.cards[usize::from(i)].map(|card| (self.leader + Wrapping(i), card))
        })
    }

    /// Cards played so far as a set
    #[must_use]
    pub fn to_hand(self) -> Hand {
        self.cards().fold(Hand::EMPTY, |mut hand, (_, card)| {
            hand.insert(card);
            hand
        })
    }

    /// The seat currently winning the trick and its card
    ///
    /// The highest trump wins if any trump has been played, otherwise the
    /// highest card of the suit led.
    #[must_use]
    pub fn winner(self, trump: Option<Suit>) -> Option<(Seat, Card)> {
        self.cards().reduce(|best, next| {
            let (_, top) = best;
            let (_, card) = next;
            let higher = card.suit() == top.suit() && card.rank() > top.rank();
            let ruff = Some(card.suit()) == trump && Some(top.suit()) != trump;
            if higher || ruff {
                next
            } else {
                best
            }
        })
    }

    fn push(&mut self, card: Card) {
        self.cards[self.len()] = Some(card);
        self.len += 1;
    }
}

/// Tricks won by each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tally {
    /// Tricks won by the declarer and dummy
    pub declarer: u8,
    /// Tricks won by the defenders
    pub defenders: u8,
}

impl Tally {
    /// Create a tally
    #[must_use]
    pub const fn new(declarer: u8, defenders: u8) -> Self {
        Self {
            declarer,
            defenders,
        }
    }

    /// Tricks played so far
    #[must_use]
    pub const fn total(self) -> u8 {
        self.declarer + self.defenders
    }
}

/// The event of a completed trick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrickWon {
    /// The seat that won the trick and leads to the next one
    pub winner: Seat,
    /// The four cards of the trick
    pub trick: Trick,
}

/// A position during the play of a hand
///
/// The state is a plain value.  Playing a card returns a new state and leaves
/// the original untouched, so searchers may branch from any position freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    deal: Deal,
    contract: Contract,
    trick: Trick,
    tally: Tally,
    played: Hand,
    shown_out: u16,
}

impl GameState {
    /// The start of play, with the opening lead from the declarer's LHO
    ///
    /// # Errors
    /// [`DealError`] if the deal is not four disjoint hands of 13 cards
    pub fn new(deal: Deal, contract: Contract) -> Result<Self, DealError> {
        deal.validate()?;
        Ok(Self {
            deal,
            contract,
            trick: Trick::new(contract.opening_leader()),
            tally: Tally::default(),
            played: Hand::EMPTY,
            shown_out: 0,
        })
    }

    /// An ending at a trick boundary
    ///
    /// Every card missing from the deal counts as played, and the tally must
    /// account for exactly those tricks.
    ///
    /// # Errors
    /// [`DealError`] if the hands are uneven, overlapping or empty, or if the
    /// tally does not match the number of tricks played
    pub fn from_ending(
        deal: Deal,
        contract: Contract,
        leader: Seat,
        tally: Tally,
    ) -> Result<Self, DealError> {
        let len = deal.validate_ending()?;
        let played = 13 - len as u8;

        if tally.total() != played {
            return Err(DealError::TallyMismatch {
                tally: tally.total(),
                played,
            });
        }

        Ok(Self {
            deal,
            contract,
            trick: Trick::new(leader),
            tally,
            played: Hand::ALL - deal.cards(),
            shown_out: 0,
        })
    }

    /// Cards remaining in each hand
    #[must_use]
    pub const fn deal(&self) -> Deal {
        self.deal
    }

    /// The contract being played
    #[must_use]
    pub const fn contract(&self) -> Contract {
        self.contract
    }

    /// Cards remaining in a seat's hand
    #[must_use]
    pub fn hand(&self, seat: Seat) -> Hand {
        self.deal[seat]
    }

    /// The trump suit, if any
    #[must_use]
    pub fn trump(&self) -> Option<Suit> {
        self.contract.trump()
    }

    /// The trick in progress
    #[must_use]
    pub const fn trick(&self) -> Trick {
        self.trick
    }

    /// The seat due to play
    #[must_use]
    pub fn to_play(&self) -> Seat {
        self.trick.next_seat()
    }

    /// Tricks won so far
    #[must_use]
    pub const fn tally(&self) -> Tally {
        self.tally
    }

    /// Cards that have left the hands, including the trick in progress
    #[must_use]
    pub const fn played(&self) -> Hand {
        self.played
    }

    /// Number of the current trick, from 1 to 13
    #[must_use]
    pub fn trick_number(&self) -> u8 {
        (self.tally.total() + 1).min(13)
    }

    /// Tricks still to be completed, counting the one in progress
    #[must_use]
    pub fn tricks_left(&self) -> usize {
        self.deal.0.iter().map(|hand| hand.len()).max().unwrap_or(0)
    }

    /// Whether all cards have been played
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.deal.cards().is_empty()
    }

    /// Whether no card of the current trick has been played yet
    #[must_use]
    pub const fn at_trick_boundary(&self) -> bool {
        self.trick.is_empty()
    }

    /// Whether the seat plays for the declaring side
    #[must_use]
    pub fn is_declaring(&self, seat: Seat) -> bool {
        self.contract.is_declaring(seat)
    }

    /// Whether the seat has failed to follow the suit earlier in the play
    #[must_use]
    pub const fn has_shown_out(&self, seat: Seat, suit: Suit) -> bool {
        self.shown_out & 1 << (seat as u8 * 4 + suit as u8) != 0
    }

    /// Cards the seat may legally play to the current trick
    #[must_use]
    pub fn legal_plays(&self, seat: Seat) -> Hand {
        let hand = self.deal[seat];

        match self.trick.lead_suit() {
            Some(suit) if !hand[suit].is_empty() => {
                let mut follow = Hand::EMPTY;
                follow[suit] = hand[suit];
                follow
            }
            _ => hand,
        }
    }

    /// Legal plays of the seat to play, one card per run of equivalent cards
    ///
    /// Cards come in the order of spades to clubs, high to low within a suit.
    #[must_use]
    pub fn candidate_plays(&self) -> Vec<Card> {
        let legal = self.legal_plays(self.to_play());
        let live = self.deal.cards() | self.trick.to_hand();

        Suit::DESC
            .into_iter()
            .flat_map(|suit| {
                legal[suit]
                    .sequence_tops(live[suit])
                    .iter()
                    .rev()
                    .map(move |rank| Card::new(suit, rank))
            })
            .collect()
    }

    /// The same position with another seat on lead
    ///
    /// # Errors
    /// [`PlayError::TrickInProgress`] unless at a trick boundary
    pub fn with_leader(&self, leader: Seat) -> Result<Self, PlayError> {
        if !self.trick.is_empty() {
            return Err(PlayError::TrickInProgress);
        }
        Ok(Self {
            trick: Trick::new(leader),
            ..*self
        })
    }

    /// Play a card, returning the new state and the completed trick if any
    ///
    /// # Errors
    /// [`PlayError`] if the play breaks the rules
    pub fn play(&self, seat: Seat, card: Card) -> Result<(Self, Option<TrickWon>), PlayError> {
        if self.is_over() {
            return Err(PlayError::HandOver);
        }

        let expected = self.to_play();
        if seat != expected {
            return Err(PlayError::OutOfTurn { expected, seat });
        }

        let hand = self.deal[seat];
        if !hand.contains(card) {
            return Err(PlayError::NotHeld(card));
        }

        let mut next = *self;
        if let Some(lead) = self.trick.lead_suit() {
            if card.suit() != lead {
                if !hand[lead].is_empty() {
                    return Err(PlayError::Revoke { card, lead });
                }
                next.shown_out |= 1 << (seat as u8 * 4 + lead as u8);
            }
        }

        next.deal[seat].remove(card);
        next.played.insert(card);
        next.trick.push(card);

        if !next.trick.is_complete() {
            return Ok((next, None));
        }

        let trick = next.trick;
        let (winner, _) = trick.winner(self.trump()).ok_or(PlayError::HandOver)?;

        if self.is_declaring(winner) {
            next.tally.declarer += 1;
        } else {
            next.tally.defenders += 1;
        }
        next.trick = Trick::new(winner);

        Ok((next, Some(TrickWon { winner, trick })))
    }

    /// Play a sequence of cards, each by the seat due to play it
    ///
    /// # Errors
    /// [`PlayError`] at the first card breaking the rules
    pub fn replay(&self, cards: impl IntoIterator<Item = Card>) -> Result<Self, PlayError> {
        cards.into_iter().try_fold(*self, |state, card| {
            state.play(state.to_play(), card).map(|(next, _)| next)
        })
    }
}

/// Play a card from a position
///
/// # Errors
/// [`PlayError`] if the play breaks the rules
pub fn play_card(
    state: &GameState,
    seat: Seat,
    card: Card,
) -> Result<(GameState, Option<TrickWon>), PlayError> {
    state.play(seat, card)
}
