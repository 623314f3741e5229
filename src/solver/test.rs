use super::*;
use crate::contract::{Penalty, Strain};
use crate::deal::test::random_ending;
use crate::deal::{Hand, Holding, SmallSet as _};
use crate::play::Tally;
use rand::seq::SliceRandom as _;

const LIMIT: u64 = 1_000_000;

/// Everyone has a 13-card straight flush, so whoever holds trumps takes all.
const FLUSHES: Deal = Deal([
    Hand([Holding::ALL, Holding::EMPTY, Holding::EMPTY, Holding::EMPTY]),
    Hand([Holding::EMPTY, Holding::ALL, Holding::EMPTY, Holding::EMPTY]),
    Hand([Holding::EMPTY, Holding::EMPTY, Holding::ALL, Holding::EMPTY]),
    Hand([Holding::EMPTY, Holding::EMPTY, Holding::EMPTY, Holding::ALL]),
]);

fn solve_flushes(strain: Strain, declarer: Seat) -> u8 {
    let contract = Contract::new(7, strain, Penalty::None, declarer);
    let state = GameState::new(FLUSHES, contract).expect("valid deal");
    Solver::new()
        .tricks(&state, &mut Budget::new(LIMIT))
        .expect("Failed to solve the deal")
}

#[test]
fn solve_four_13_card_straight_flushes() {
    assert_eq!(solve_flushes(Strain::Clubs, Seat::North), 13);
    assert_eq!(solve_flushes(Strain::Clubs, Seat::East), 0);
    assert_eq!(solve_flushes(Strain::Hearts, Seat::South), 13);
    assert_eq!(solve_flushes(Strain::Spades, Seat::North), 0);
    assert_eq!(solve_flushes(Strain::Spades, Seat::West), 13);
    assert_eq!(solve_flushes(Strain::Notrump, Seat::North), 0);
}

fn finesse() -> GameState {
    let deal: Deal = "N:AQ... .32.. 32... K4...".parse().expect("valid PBN");
    let contract: Contract = "3NT by S".parse().expect("valid contract");
    GameState::from_ending(deal, contract, Seat::South, Tally::new(9, 2)).expect("valid ending")
}

/// The finesse works when led from the South hand only.
#[test]
fn solve_finesse() -> Result<(), Error> {
    let mut solver = Solver::new();
    let mut budget = Budget::new(LIMIT);
    let state = finesse();

    assert_eq!(solver.tricks(&state, &mut budget)?, 2);
    assert!(!solver.is_empty());

    let north = state.with_leader(Seat::North)?;
    assert_eq!(solver.tricks(&north, &mut budget)?, 1);
    assert!(solver.reaches(&north, 1, &mut budget)?);
    assert!(!solver.reaches(&north, 2, &mut budget)?);
    assert!(budget.used() > 0);
    Ok(())
}

#[test]
fn solve_mid_trick() -> Result<(), Error> {
    let state = finesse();
    let card = "S2".parse().expect("valid card");
    let (state, _) = state.play(Seat::South, card)?;
    assert_eq!(Solver::new().tricks(&state, &mut Budget::new(LIMIT))?, 2);
    Ok(())
}

#[test]
fn test_budget_exceeded() {
    let mut budget = Budget::new(3);
    assert_eq!(
        Solver::new().tricks(&finesse(), &mut budget),
        Err(Error::SearchBudgetExceeded { limit: 3 })
    );
    assert_eq!(budget.used(), 3);
}

/// Plain minimax over every legal card
pub(crate) fn brute_force(state: &GameState) -> u8 {
    if state.is_over() {
        return 0;
    }
    let seat = state.to_play();
    let outcomes = state.legal_plays(seat).iter().map(|card| {
        let (next, won) = state.play(seat, card).expect("legal play");
        u8::from(won.is_some_and(|won| state.is_declaring(won.winner))) + brute_force(&next)
    });
    let best = if state.is_declaring(seat) {
        outcomes.max()
    } else {
        outcomes.min()
    };
    best.expect("some legal play")
}

#[test]
fn test_random_endings_against_brute_force() -> Result<(), Error> {
    let mut rng = rand::thread_rng();
    let mut solver = Solver::new();

    for _ in 0..300 {
        let len = *[1, 2, 3].choose(&mut rng).expect("non-empty");
        let strain = *Strain::ALL.choose(&mut rng).expect("non-empty");
        let declarer = *Seat::ALL.choose(&mut rng).expect("non-empty");
        let leader = *Seat::ALL.choose(&mut rng).expect("non-empty");

        let contract = Contract::new(1, strain, Penalty::None, declarer);
        let deal = random_ending(&mut rng, len);
        let tally = Tally::new(13 - len as u8, 0);
        let state = GameState::from_ending(deal, contract, leader, tally)?;

        let tricks = solver.tricks(&state, &mut Budget::new(LIMIT))?;
        assert_eq!(tricks, brute_force(&state), "{deal} in {contract}");
    }
    Ok(())
}
