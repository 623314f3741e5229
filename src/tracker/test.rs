use super::*;
use crate::contract::Contract;
use crate::deal::{Deal, SmallSet};
use crate::play::Tally;

const LIMIT: u64 = 1_000_000;

fn ending(pbn: &str, contract: &str, leader: Seat, tally: Tally) -> GameState {
    let deal: Deal = pbn.parse().expect("valid PBN");
    let contract: Contract = contract.parse().expect("valid contract");
    GameState::from_ending(deal, contract, leader, tally).expect("valid ending")
}

/// Four cards each in a slam with trumps drawn, South holding ♣AQ over West's
/// ♣K5
fn slam() -> GameState {
    ending(
        "N:.A3.2.4 .QJ.87. .5.3.AQ .K.9.K5",
        "6S by S",
        Seat::North,
        Tally::new(9, 0),
    )
}

/// The slam after ♥A and a diamond throw-in, West on lead with ♣K5
fn thrown_in() -> GameState {
    ending(
        "N:.3..4 .J.7. ...AQ ...K5",
        "6S by S",
        Seat::West,
        Tally::new(10, 1),
    )
}

#[test]
fn test_voids() {
    let state = slam();
    let tracker = Tracker::new(&state);
    assert!(tracker.is_stripped(Seat::West, Suit::Spades));
    assert!(!tracker.is_stripped(Seat::West, Suit::Hearts));
    assert_eq!(tracker.stripped_suits(Seat::West), SuitFlags::SPADES);
    assert_eq!(
        tracker.stripped_suits(Seat::East),
        SuitFlags::SPADES | SuitFlags::CLUBS
    );
    assert!(tracker.trumps_drawn());
}

#[test]
fn test_shown_out() -> Result<(), Error> {
    let state = thrown_in();
    let (state, _) = state.play(Seat::West, "CK".parse().expect("valid card"))?;
    let (state, _) = state.play(Seat::North, "C4".parse().expect("valid card"))?;
    let (state, _) = state.play(Seat::East, "HJ".parse().expect("valid card"))?;

    let tracker = Tracker::new(&state);
    assert!(tracker.has_shown_out(Seat::East, Suit::Clubs));
    assert!(!tracker.has_shown_out(Seat::North, Suit::Clubs));
    assert!(!tracker.has_shown_out(Seat::West, Suit::Clubs));
    Ok(())
}

#[test]
fn test_winners_and_entries() {
    let state = slam();
    let tracker = Tracker::new(&state);
    assert_eq!(tracker.sure_winners(Suit::Hearts), 1);
    assert_eq!(tracker.sure_winners(Suit::Clubs), 1);
    assert_eq!(tracker.sure_winners(Suit::Diamonds), 0);
    assert_eq!(tracker.sure_winners(Suit::Spades), 0);

    let entries = tracker.entries(Seat::South);
    assert_eq!(entries.len(), 1);
    assert!(entries.contains("CA".parse().expect("valid card")));
    assert!(tracker
        .entries(Seat::North)
        .contains("HA".parse().expect("valid card")));
    assert_eq!(tracker.unseen(Seat::West).len(), 8);
}

#[test]
fn test_ruffing_defender_caps_winners() {
    // East still holds a trump and only one heart
    let state = ending(
        "N:.AKQ.. 2.J.2. .32.3. ..AKQ.",
        "4S by S",
        Seat::North,
        Tally::new(6, 4),
    );
    let tracker = Tracker::new(&state);
    assert!(!tracker.trumps_drawn());
    assert_eq!(tracker.sure_winners(Suit::Hearts), 1);
    assert_eq!(tracker.entries(Seat::North).len(), 3);
}

#[test]
fn test_thrown_in_defender_has_no_exit() -> Result<(), Error> {
    let state = thrown_in();
    let tracker = Tracker::new(&state);
    let mut solver = Solver::new();
    let mut budget = Budget::new(LIMIT);

    let king: Card = "CK".parse().expect("valid card");
    let five: Card = "C5".parse().expect("valid card");
    let values = tracker.lead_values(Seat::West, &mut solver, &mut budget)?;
    assert_eq!(values, vec![(king, 2u8), (five, 2u8)]);
    assert_eq!(
        tracker.safe_exit_suits(Seat::West, &mut solver, &mut budget)?,
        SuitFlags::empty()
    );
    assert_eq!(
        tracker.vulnerability(Seat::West, &mut solver, &mut budget)?,
        Vulnerability {
            safe_exits: SuitFlags::empty(),
            danger_suits: SuitFlags::CLUBS,
            short_suits: SuitFlags::empty(),
        }
    );
    Ok(())
}

#[test]
fn test_safe_exit() -> Result<(), Error> {
    let state = ending(
        "N:...AKQJ .AKQJ.. AKQJ... ..AKQJ.",
        "3NT by S",
        Seat::North,
        Tally::new(5, 4),
    );
    let tracker = Tracker::new(&state);
    let mut solver = Solver::new();
    let mut budget = Budget::new(LIMIT);

    assert_eq!(
        tracker.safe_exit_suits(Seat::West, &mut solver, &mut budget)?,
        SuitFlags::DIAMONDS
    );
    assert_eq!(tracker.sure_winners(Suit::Diamonds), 0);
    assert_eq!(tracker.stripped_suits(Seat::West).bits().count_ones(), 3);
    Ok(())
}

#[test]
fn test_mid_trick() -> Result<(), Error> {
    let state = thrown_in();
    let (state, _) = state.play(Seat::West, "C5".parse().expect("valid card"))?;
    let tracker = Tracker::new(&state);
    assert_eq!(
        tracker.safe_exit_suits(Seat::West, &mut Solver::new(), &mut Budget::new(LIMIT)),
        Err(Error::TrickInProgress)
    );
    Ok(())
}
