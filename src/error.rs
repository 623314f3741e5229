use crate::deal::{DealError, Seat};
use crate::play::PlayError;
use thiserror::Error;

/// Errors raised while setting up or analysing a position
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The deal does not partition its cards into proper hands
    #[error("Invalid deal: {0}")]
    InvalidDeal(#[from] DealError),

    /// A play violates the rules, fatal when raised from inside a search
    #[error("Illegal play: {0}")]
    IllegalPlay(#[from] PlayError),

    /// The search ran out of nodes before reaching a verdict
    #[error("No verdict within the budget of {limit} search nodes")]
    SearchBudgetExceeded {
        /// The node budget that was exhausted
        limit: u64,
    },

    /// Only a defender can be endplayed
    #[error("{seat} is not a defender")]
    InvalidTarget {
        /// The seat requested as the target
        seat: Seat,
    },

    /// There is no line to report
    #[error("Cannot report an empty line of play")]
    InvalidLine,

    /// Leads can only be analysed between tricks
    #[error("A trick is in progress")]
    TrickInProgress,
}
