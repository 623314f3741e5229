#[cfg(test)]
pub(crate) mod test;

use crate::contract::Contract;
use crate::deal::{Deal, Seat};
use crate::error::Error;
use crate::play::GameState;
use std::collections::HashMap;

/// A counter of search nodes with a hard limit
///
/// One budget is shared by every search working on the same question, so
/// that the limit bounds the total work rather than each part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Budget {
    limit: u64,
    used: u64,
}

impl Budget {
    /// A fresh budget of `limit` nodes
    #[must_use]
    pub const fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    /// The maximum number of nodes
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.limit
    }

    /// Nodes visited so far
    #[must_use]
    pub const fn used(self) -> u64 {
        self.used
    }

    /// Account for one more node
    ///
    /// # Errors
    /// [`Error::SearchBudgetExceeded`] once the limit has been reached
    pub fn charge(&mut self) -> Result<(), Error> {
        if self.used >= self.limit {
            return Err(Error::SearchBudgetExceeded { limit: self.limit });
        }
        self.used += 1;
        Ok(())
    }
}

/// Known range of the declaring side's remaining tricks
#[derive(Debug, Clone, Copy)]
struct Bounds {
    lower: u8,
    upper: u8,
}

/// Positions between tricks are identified by the remaining cards, the leader
/// and the contract.  The tally does not matter since only the remaining
/// tricks are counted.
type Key = (Contract, Deal, Seat);

/// Double dummy solver
///
/// The solver runs a null-window search: [`Solver::reaches`] decides whether
/// the declaring side can take at least a given number of the remaining
/// tricks, and [`Solver::tricks`] raises that number until it fails.  Bounds
/// found between tricks are kept in a transposition table, so a solver should
/// be reused for positions of the same hand.
#[derive(Debug, Default)]
pub struct Solver {
    table: HashMap<Key, Bounds>,
}

impl Solver {
    /// A solver with an empty transposition table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of positions in the transposition table
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the transposition table is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Tricks the declaring side takes from the position onwards, with best
    /// play from both sides
    ///
    /// The trick in progress counts, while tricks already won do not.
    ///
    /// # Errors
    /// [`Error::SearchBudgetExceeded`] if the budget runs out
    pub fn tricks(&mut self, state: &GameState, budget: &mut Budget) -> Result<u8, Error> {
        let mut tricks = 0;
        let left = state.tricks_left();

        while usize::from(tricks) < left && self.reaches(state, tricks + 1, budget)? {
            tricks += 1;
        }
        Ok(tricks)
    }

    /// Whether the declaring side can take at least `target` of the remaining
    /// tricks
    ///
    /// # Errors
    /// [`Error::SearchBudgetExceeded`] if the budget runs out
    pub fn reaches(
        &mut self,
        state: &GameState,
        target: u8,
        budget: &mut Budget,
    ) -> Result<bool, Error> {
        budget.charge()?;

        if target == 0 {
            return Ok(true);
        }
        if usize::from(target) > state.tricks_left() {
            return Ok(false);
        }

        let key = state
            .at_trick_boundary()
            .then(|| (state.contract(), state.deal(), state.to_play()));

        if let Some(bounds) = key.and_then(|key| self.table.get(&key)) {
            if bounds.lower >= target {
                return Ok(true);
            }
            if bounds.upper < target {
                return Ok(false);
            }
        }

        let seat = state.to_play();
        let maximizing = state.is_declaring(seat);
        let mut reached = !maximizing;

        for card in state.candidate_plays() {
            let (next, won) = state.play(seat, card)?;
            let gained = won.is_some_and(|won| state.is_declaring(won.winner));
            let result = self.reaches(&next, target - u8::from(gained), budget)?;

            if result == maximizing {
                reached = result;
                break;
            }
        }

        if let Some(key) = key {
            let left = state.tricks_left() as u8;
            let bounds = self.table.entry(key).or_insert(Bounds {
                lower: 0,
                upper: left,
            });

            if reached {
                bounds.lower = bounds.lower.max(target);
            } else {
                bounds.upper = bounds.upper.min(target - 1);
            }
        }

        Ok(reached)
    }
}
