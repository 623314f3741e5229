
use crate::deal::{Card, Deal, Seat, SmallSet as _, Suit};
use crate::error::Error;
use crate::play::{GameState, Tally, TrickWon};
use crate::report::{explain_failure, explain_success};
use crate::solver::{Budget, Solver};
use crate::tracker::Tracker;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tuning of the endplay search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum search nodes per target, double dummy solving included
    pub node_budget: u64,
    /// Only try to endplay this defender
    pub target: Option<Seat>,
    /// Search the candidate targets on separate threads
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            node_budget: 2_000_000,
            target: None,
            parallel: false,
        }
    }
}

/// Final outcome of a resolved node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The target is endplayed
    Success,
    /// The target escapes
    Failure,
}

/// Classification of a search node
///
/// Nodes start out [`Exploring`](NodeState::Exploring).  A node becomes a
/// [`ForcedLead`](NodeState::ForcedLead) when the target is on lead between
/// tricks holding at least two cards, all of one suit.  Forced leads and
/// exhausted positions are [`Resolved`](NodeState::Resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Play goes on
    Exploring,
    /// The target must lead from its only suit
    ForcedLead,
    /// The outcome is known
    Resolved(Verdict),
}

/// Why a card is played in the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Declaring side cashes a winner
    Cash,
    /// Declaring side wins a trick while removing a suit from the target
    Strip,
    /// Declaring side leads to give the target the lead
    ThrowIn,
    /// Declaring side gives up a trick to the target's partner
    Exit,
    /// A defender leads
    Lead,
    /// Following suit
    Follow,
    /// Trumping the suit led
    Ruff,
    /// Discarding from another suit
    Discard,
    /// The target's lead that concedes a trick
    ForcedLead,
}

impl Reason {
    /// Whether the card starts a trick
    #[must_use]
    pub const fn is_lead(self) -> bool {
        matches!(
            self,
            Self::Cash | Self::Strip | Self::ThrowIn | Self::Exit | Self::Lead | Self::ForcedLead
        )
    }
}

/// A card in the reported line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Step {
    /// The seat playing the card
    pub seat: Seat,
    /// The card played
    pub card: Card,
    /// The role of the card in the line
    pub reason: Reason,
}

/// Why no endplay exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Diagnosis {
    /// A defender keeps more safe exits in a suit than declarer can cash
    InsufficientEntries {
        /// The defender with the exits
        defender: Seat,
        /// The suit of the exits
        suit: Suit,
        /// Cards the defender holds in the suit
        exits: u8,
        /// Declaring side's sure winners in the suit
        winners: u8,
    },
    /// The defenders can always keep an exit or avoid the lead
    NoForcingLine,
}

/// Result of the endplay analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    /// Whether some defender can be endplayed
    pub feasible: bool,
    /// The defender thrown in
    pub target_defender: Option<Seat>,
    /// Suits removed from the target before the throw-in, spades first
    pub strip_suits: Vec<Suit>,
    /// The suit the target is forced to lead
    pub forcing_suit: Option<Suit>,
    /// The line of play, ending with the forced lead
    pub play_sequence: Vec<Step>,
    /// Human-readable summary
    pub explanation: String,
    /// Tricks won when the target is on lead at the end of the line
    pub tally: Tally,
    /// Declaring side's total tricks with best play after the forced lead
    pub projected_tricks: Option<u8>,
    /// Search nodes spent on the reported result
    pub nodes: u64,
}

/// A successful line below some node
#[derive(Debug, Clone)]
struct Outcome {
    /// Plays from the node, last play first
    line: Vec<(Seat, Card)>,
    /// The forced lead ending the line
    lead: Card,
    /// Declaring side's remaining tricks after the forced lead
    value: u8,
}

/// Search result for one target
struct Found {
    target: Seat,
    outcome: Option<Outcome>,
    nodes: u64,
}

/// AND/OR search for a line endplaying one defender
struct Search {
    target: Seat,
    solver: Solver,
    budget: Budget,
    memo: HashMap<(Deal, Seat), Option<Outcome>>,
}

impl Search {
    fn new(target: Seat, limit: u64) -> Self {
        Self {
            target,
            solver: Solver::new(),
            budget: Budget::new(limit),
            memo: HashMap::new(),
        }
    }

    fn classify(&self, state: &GameState) -> NodeState {
        if state.is_over() {
            return NodeState::Resolved(Verdict::Failure);
        }
        if !state.at_trick_boundary() {
            return NodeState::Exploring;
        }

        let hand = state.hand(self.target);
        if hand.len() < 2 {
            return NodeState::Resolved(Verdict::Failure);
        }
        if state.to_play() == self.target && hand.suits().bits().count_ones() == 1 {
            return NodeState::ForcedLead;
        }
        NodeState::Exploring
    }

    fn search(&mut self, state: &GameState) -> Result<Option<Outcome>, Error> {
        self.budget.charge()?;

        let key = state
            .at_trick_boundary()
            .then(|| (state.deal(), state.to_play()));

        if let Some(outcome) = key.and_then(|key| self.memo.get(&key)) {
            return Ok(outcome.clone());
        }

        let outcome = match self.classify(state) {
            NodeState::Exploring => self.explore(state)?,
            NodeState::ForcedLead => self.force(state)?,
            NodeState::Resolved(_) => None,
        };

        if let Some(key) = key {
            self.memo.insert(key, outcome.clone());
        }
        Ok(outcome)
    }

    /// Declaring side needs one working play, defenders must all fail
    fn explore(&mut self, state: &GameState) -> Result<Option<Outcome>, Error> {
        let seat = state.to_play();

        if state.is_declaring(seat) {
            for card in state.candidate_plays() {
                let (next, _) = state.play(seat, card)?;
                if let Some(mut outcome) = self.search(&next)? {
                    outcome.line.push((seat, card));
                    return Ok(Some(outcome));
                }
            }
            return Ok(None);
        }

        let mut longest: Option<(Card, Outcome)> = None;

        for card in state.candidate_plays() {
            let (next, _) = state.play(seat, card)?;
            let Some(outcome) = self.search(&next)? else {
                return Ok(None);
            };
            if longest
                .as_ref()
                .map_or(true, |(_, best)| outcome.line.len() > best.line.len())
            {
                longest = Some((card, outcome));
            }
        }

        Ok(longest.map(|(card, mut outcome)| {
            outcome.line.push((seat, card));
            outcome
        }))
    }

    /// Resolve a forced lead: the target's best lead must still cost a trick
    /// compared with its partner on lead
    fn force(&mut self, state: &GameState) -> Result<Option<Outcome>, Error> {
        let tracker = Tracker::new(state);
        let values = tracker.lead_values(self.target, &mut self.solver, &mut self.budget)?;

        let Some((lead, value)) = values.into_iter().reduce(|best, next| {
            if next.1 < best.1 {
                next
            } else {
                best
            }
        }) else {
            return Ok(None);
        };

        let partner = state.with_leader(self.target.partner())?;
        let baseline = self.solver.tricks(&partner, &mut self.budget)?;
        let verdict = if value > baseline {
            Verdict::Success
        } else {
            Verdict::Failure
        };

        log::trace!(
            "{} leads {lead}: {value} tricks against {baseline} with {} on lead, {verdict:?}",
            self.target,
            self.target.partner(),
        );

        Ok((verdict == Verdict::Success).then(|| Outcome {
            line: Vec::new(),
            lead,
            value,
        }))
    }
}

fn search_target(state: &GameState, target: Seat, limit: u64) -> Result<Found, Error> {
    log::debug!("searching for an endplay against {target}");
    let mut search = Search::new(target, limit);
    let outcome = search.search(state)?;
    let nodes = search.budget.used();

    log::debug!(
        "{target}: {} after {nodes} nodes",
        if outcome.is_some() { "endplayed" } else { "escapes" },
    );
    Ok(Found {
        target,
        outcome,
        nodes,
    })
}

/// Search for a strip-and-endplay line from a position
///
/// Each candidate target gets its own solver and a budget of
/// [`SearchConfig::node_budget`] nodes.  The first target in seat order
/// (declarer's LHO first) that can be endplayed is reported, so the result
/// does not depend on [`SearchConfig::parallel`].
///
/// # Errors
/// - [`Error::InvalidTarget`] if the requested target is on the declaring side
/// - [`Error::SearchBudgetExceeded`] if no target is endplayed and some search
///   ran out of nodes
/// - [`Error::IllegalPlay`] if the search breaks the rules, which is a bug
pub fn analyze(state: &GameState, config: &SearchConfig) -> Result<Analysis, Error> {
    let targets = match config.target {
        Some(seat) if state.is_declaring(seat) => return Err(Error::InvalidTarget { seat }),
        Some(seat) => vec![seat],
        None => state.contract().defenders().to_vec(),
    };

    let results: Vec<_> = if config.parallel {
        targets
            .par_iter()
            .map(|&target| search_target(state, target, config.node_budget))
            .collect()
    } else {
        let mut results = Vec::with_capacity(targets.len());
        for &target in &targets {
            let result = search_target(state, target, config.node_budget);
            let decisive = match &result {
                Ok(found) => found.outcome.is_some(),
                Err(error) => !matches!(error, Error::SearchBudgetExceeded { .. }),
            };
            results.push(result);
            if decisive {
                break;
            }
        }
        results
    };

    let mut nodes = 0;
    let mut exhausted = None;

    for result in results {
        match result {
            Ok(Found {
                target,
                outcome: Some(outcome),
                nodes,
            }) => return success(state, target, outcome, nodes),
            Ok(found) => nodes += found.nodes,
            Err(Error::SearchBudgetExceeded { limit }) => exhausted = Some(limit),
            Err(error) => return Err(error),
        }
    }

    if let Some(limit) = exhausted {
        log::info!("no verdict within {limit} nodes");
        return Err(Error::SearchBudgetExceeded { limit });
    }
    failure(state, &targets, config.node_budget, nodes)
}

/// Replay a successful line and annotate it
fn success(
    state: &GameState,
    target: Seat,
    outcome: Outcome,
    nodes: u64,
) -> Result<Analysis, Error> {
    let mut line = outcome.line;
    line.reverse();

    let mut current = *state;
    let mut leads = Vec::with_capacity(line.len());
    let mut tricks: Vec<Option<TrickWon>> = vec![None; line.len()];
    let mut trick_start = 0;
    let mut throw_in = None;

    for (i, &(seat, card)) in line.iter().enumerate() {
        leads.push(current.trick().lead_suit());
        let (next, won) = current.play(seat, card)?;

        if let Some(won) = won {
            tricks[trick_start..=i].fill(Some(won));
            trick_start = i + 1;
            throw_in = Some(won);
        }
        current = next;
    }

    let won_with = throw_in
        .and_then(|won| won.trick.cards().find(|&(seat, _)| seat == target))
        .map(|(_, card)| card.suit());
    let strip_suits: Vec<Suit> = (state.hand(target).suits() - current.hand(target).suits())
        .suits()
        .filter(|&suit| Some(suit) != won_with)
        .collect();

    let mut play_sequence: Vec<Step> = line
        .iter()
        .zip(leads)
        .zip(tricks)
        .map(|((&(seat, card), lead), trick)| Step {
            seat,
            card,
            reason: reason(state, target, &strip_suits, seat, card, lead, trick),
        })
        .collect();

    play_sequence.push(Step {
        seat: target,
        card: outcome.lead,
        reason: Reason::ForcedLead,
    });

    let tally = current.tally();
    let forcing_suit = outcome.lead.suit();
    let trumps_drawn = Tracker::new(state).trumps_drawn();
    let explanation = explain_success(
        target,
        &strip_suits,
        forcing_suit,
        &play_sequence,
        trumps_drawn,
    )?;

    log::info!("{target} is endplayed in {forcing_suit} after {nodes} nodes");
    Ok(Analysis {
        feasible: true,
        target_defender: Some(target),
        strip_suits,
        forcing_suit: Some(forcing_suit),
        play_sequence,
        explanation,
        tally,
        projected_tricks: Some(tally.declarer + outcome.value),
        nodes,
    })
}

fn reason(
    state: &GameState,
    target: Seat,
    strip_suits: &[Suit],
    seat: Seat,
    card: Card,
    lead: Option<Suit>,
    trick: Option<TrickWon>,
) -> Reason {
    if let Some(lead) = lead {
        return if card.suit() == lead {
            Reason::Follow
        } else if Some(card.suit()) == state.trump() {
            Reason::Ruff
        } else {
            Reason::Discard
        };
    }

    if !state.is_declaring(seat) {
        return Reason::Lead;
    }

    match trick {
        Some(won) if won.winner == target => Reason::ThrowIn,
        Some(won) if state.is_declaring(won.winner) => {
            let followed = won
                .trick
                .cards()
                .any(|(seat, played)| seat == target && played.suit() == card.suit());
            if followed && strip_suits.contains(&card.suit()) {
                Reason::Strip
            } else {
                Reason::Cash
            }
        }
        _ => Reason::Exit,
    }
}

/// Explain why no defender can be endplayed
fn failure(
    state: &GameState,
    targets: &[Seat],
    limit: u64,
    nodes: u64,
) -> Result<Analysis, Error> {
    let diagnosis = diagnose(state, targets, limit)?;
    log::info!("no endplay after {nodes} nodes: {diagnosis:?}");

    Ok(Analysis {
        feasible: false,
        target_defender: None,
        strip_suits: Vec::new(),
        forcing_suit: None,
        play_sequence: Vec::new(),
        explanation: explain_failure(&diagnosis),
        tally: state.tally(),
        projected_tricks: None,
        nodes,
    })
}

/// Look for a defender with more safe exits than declarer has winners to strip
///
/// The search has already proven there is no endplay, so running out of
/// nodes here only loses detail and falls back to
/// [`Diagnosis::NoForcingLine`].
fn diagnose(state: &GameState, targets: &[Seat], limit: u64) -> Result<Diagnosis, Error> {
    if !state.at_trick_boundary() {
        return Ok(Diagnosis::NoForcingLine);
    }

    let tracker = Tracker::new(state);
    let mut solver = Solver::new();
    let mut budget = Budget::new(limit);

    for &defender in targets {
        let safe = match tracker.safe_exit_suits(defender, &mut solver, &mut budget) {
            Ok(safe) => safe,
            Err(Error::SearchBudgetExceeded { limit }) => {
                log::debug!("no diagnosis within {limit} nodes");
                return Ok(Diagnosis::NoForcingLine);
            }
            Err(error) => return Err(error),
        };

        for suit in safe.suits() {
            // At most 13 cards in a suit
            let exits = state.hand(defender)[suit].len() as u8;
            let winners = tracker.sure_winners(suit);

            if exits > winners {
                return Ok(Diagnosis::InsufficientEntries {
                    defender,
                    suit,
                    exits,
                    winners,
                });
            }
        }
    }
    Ok(Diagnosis::NoForcingLine)
}
