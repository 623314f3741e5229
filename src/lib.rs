//! Strip-and-endplay analysis for contract bridge.
//!
//! Given the four hands and a contract, this crate searches for a line of
//! play in which declarer strips a defender of safe exit cards and then throws
//! them on lead, so that whatever they lead concedes a trick.  The search
//! assumes open hands, as a double dummy solver does, and is built on a small
//! native double dummy solver in [`Solver`].
//!
//! ```
//! use endplay::{analyze, Contract, Deal, GameState, SearchConfig, Seat, Suit, Tally};
//!
//! let deal: Deal = "N:.A3.2.4 .QJ.87. .5.3.AQ .K.9.K5".parse()?;
//! let contract: Contract = "6S by S".parse()?;
//! let state = GameState::from_ending(deal, contract, Seat::North, Tally::new(9, 0))?;
//!
//! let analysis = analyze(&state, &SearchConfig::default())?;
//! assert_eq!(analysis.target_defender, Some(Seat::West));
//! assert_eq!(analysis.forcing_suit, Some(Suit::Clubs));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![warn(missing_docs)]

mod contract;
mod deal;
mod endplay;
mod error;
mod play;
mod report;
mod solver;
mod tracker;

pub use contract::*;
pub use deal::*;
pub use endplay::*;
pub use error::*;
pub use play::*;
pub use report::*;
pub use solver::*;
pub use tracker::*;
