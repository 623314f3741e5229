#[cfg(test)]
mod test;

use crate::deal::{Card, Hand, Holding, Seat, SmallSet as _, Suit, SuitFlags};
use crate::error::Error;
use crate::play::GameState;
use crate::solver::{Budget, Solver};

/// What a defender can still do on lead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vulnerability {
    /// Suits the defender can lead without losing a trick
    pub safe_exits: SuitFlags,
    /// Suits the defender holds but cannot lead without losing a trick
    pub danger_suits: SuitFlags,
    /// Suits declarer can strip from the defender with sure winners
    pub short_suits: SuitFlags,
}

/// Suit elimination facts derived from a position
///
/// The tracker holds no state of its own.  Every answer is computed from the
/// borrowed [`GameState`], so it can never disagree with the play.
#[derive(Debug, Clone, Copy)]
pub struct Tracker<'a> {
    state: &'a GameState,
}

impl<'a> Tracker<'a> {
    /// Track a position
    #[must_use]
    pub const fn new(state: &'a GameState) -> Self {
        Self { state }
    }

    /// Whether the seat holds no card of the suit
    #[must_use]
    pub fn is_stripped(&self, seat: Seat, suit: Suit) -> bool {
        self.state.hand(seat)[suit].is_empty()
    }

    /// Whether the seat has proven a void by failing to follow suit
    #[must_use]
    pub fn has_shown_out(&self, seat: Seat, suit: Suit) -> bool {
        self.state.has_shown_out(seat, suit)
    }

    /// Suits the seat holds no card of
    #[must_use]
    pub fn stripped_suits(&self, seat: Seat) -> SuitFlags {
        SuitFlags::all() - self.state.hand(seat).suits()
    }

    /// Cards the seat cannot see: not in its hand, not in dummy, not played
    #[must_use]
    pub fn unseen(&self, seat: Seat) -> Hand {
        let dummy = self.state.contract().dummy();
        Hand::ALL - self.state.hand(seat) - self.state.hand(dummy) - self.state.played()
    }

    /// Whether the defenders are out of trumps, always true in notrump
    #[must_use]
    pub fn trumps_drawn(&self) -> bool {
        self.state.trump().map_or(true, |trump| {
            self.defenders()
                .into_iter()
                .all(|seat| self.is_stripped(seat, trump))
        })
    }

    /// Tricks the declaring side can cash in a suit from the top
    ///
    /// These are the declaring side's cards ranking above every defender card
    /// of the suit, limited by the longer of declarer and dummy.  In a side
    /// suit, a defender still holding trumps ruffs once out of the suit.
    #[must_use]
    pub fn sure_winners(&self, suit: Suit) -> u8 {
        let contract = self.state.contract();
        let declarer = self.state.hand(contract.declarer)[suit];
        let dummy = self.state.hand(contract.dummy())[suit];
        let theirs = self.defending_holding(suit);

        let tops = top_cards(declarer | dummy, theirs).len();
        let mut winners = tops.min(declarer.len().max(dummy.len()));

        if let Some(trump) = self.state.trump().filter(|&trump| trump != suit) {
            for seat in self.defenders() {
                let hand = self.state.hand(seat);
                if !hand[trump].is_empty() {
                    winners = winners.min(hand[suit].len());
                }
            }
        }

        // At most 13 cards in a suit
        winners as u8
    }

    /// Cards in the seat's hand that win whenever played
    #[must_use]
    pub fn entries(&self, seat: Seat) -> Hand {
        let hand = self.state.hand(seat);
        let mut entries = Hand::EMPTY;

        for suit in Suit::ASC {
            let ruffable = self.state.trump().is_some_and(|trump| {
                trump != suit
                    && self.defenders().into_iter().any(|defender| {
                        let hand = self.state.hand(defender);
                        hand[suit].is_empty() && !hand[trump].is_empty()
                    })
            });

            if !ruffable {
                entries[suit] = top_cards(hand[suit], self.defending_holding(suit));
            }
        }
        entries
    }

    /// Declaring side's remaining tricks after each candidate lead of a seat
    ///
    /// # Errors
    /// [`Error::TrickInProgress`] unless at a trick boundary, or
    /// [`Error::SearchBudgetExceeded`] if the solver runs out of nodes
    pub fn lead_values(
        &self,
        seat: Seat,
        solver: &mut Solver,
        budget: &mut Budget,
    ) -> Result<Vec<(Card, u8)>, Error> {
        if !self.state.at_trick_boundary() {
            return Err(Error::TrickInProgress);
        }

        let state = self.state.with_leader(seat)?;
        state
            .candidate_plays()
            .into_iter()
            .map(|card| -> Result<_, Error> {
                let (next, _) = state.play(seat, card)?;
                Ok((card, solver.tricks(&next, budget)?))
            })
            .collect()
    }

    /// Suits the seat can lead without costing its side a trick, compared with
    /// its partner on lead
    ///
    /// # Errors
    /// [`Error::TrickInProgress`] unless at a trick boundary, or
    /// [`Error::SearchBudgetExceeded`] if the solver runs out of nodes
    pub fn safe_exit_suits(
        &self,
        seat: Seat,
        solver: &mut Solver,
        budget: &mut Budget,
    ) -> Result<SuitFlags, Error> {
        let values = self.lead_values(seat, solver, budget)?;
        let baseline = solver.tricks(&self.state.with_leader(seat.partner())?, budget)?;

        Ok(Suit::ASC
            .into_iter()
            .filter(|&suit| {
                values
                    .iter()
                    .filter(|(card, _)| card.suit() == suit)
                    .map(|&(_, tricks)| tricks)
                    .min()
                    .is_some_and(|tricks| tricks <= baseline)
            })
            .fold(SuitFlags::empty(), |flags, suit| flags | SuitFlags::from(suit)))
    }

    /// Safe exits, danger suits and strippable suits of a defender
    ///
    /// # Errors
    /// Same as [`Tracker::safe_exit_suits`]
    pub fn vulnerability(
        &self,
        seat: Seat,
        solver: &mut Solver,
        budget: &mut Budget,
    ) -> Result<Vulnerability, Error> {
        let hand = self.state.hand(seat);
        let held = hand.suits();
        let safe_exits = self.safe_exit_suits(seat, solver, budget)?;
        let short_suits = held
            .suits()
            .filter(|&suit| hand[suit].len() <= usize::from(self.sure_winners(suit)))
            .fold(SuitFlags::empty(), |flags, suit| flags | SuitFlags::from(suit));

        Ok(Vulnerability {
            safe_exits,
            danger_suits: held - safe_exits,
            short_suits,
        })
    }

    fn defenders(&self) -> [Seat; 2] {
        self.state.contract().defenders()
    }

    fn defending_holding(&self, suit: Suit) -> Holding {
        self.defenders()
            .into_iter()
            .fold(Holding::EMPTY, |all, seat| all | self.state.hand(seat)[suit])
    }
}

/// Cards of `ours` ranking above every card of `theirs`
fn top_cards(ours: Holding, theirs: Holding) -> Holding {
    theirs.highest().map_or(ours, |highest| {
        Holding::from_bits(ours.to_bits() & !((2 << highest) - 1))
    })
}
