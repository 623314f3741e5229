use super::*;
use crate::deal::Card;

fn step(seat: Seat, card: &str, reason: Reason) -> Step {
    Step {
        seat,
        card: card.parse::<Card>().expect("valid card"),
        reason,
    }
}

#[test]
fn test_empty_line() {
    assert_eq!(render_steps(&[]), Err(Error::InvalidLine));
    assert_eq!(
        explain_success(Seat::West, &[], Suit::Clubs, &[], true),
        Err(Error::InvalidLine)
    );
}

#[test]
fn test_render_steps() -> Result<(), Error> {
    let steps = [
        step(Seat::North, "HA", Reason::Strip),
        step(Seat::East, "HQ", Reason::Follow),
        step(Seat::South, "S2", Reason::Ruff),
        step(Seat::West, "CK", Reason::ForcedLead),
    ];
    assert_eq!(
        render_steps(&steps)?,
        [
            "1. North leads ♥A (strip)",
            "2. East plays ♥Q (follow)",
            "3. South plays ♠2 (ruff)",
            "4. West leads ♣K (forced lead)",
        ]
    );
    Ok(())
}

#[test]
fn test_explain_success() -> Result<(), Error> {
    let steps = [step(Seat::West, "CK", Reason::ForcedLead)];
    let text = explain_success(Seat::West, &[Suit::Hearts, Suit::Diamonds], Suit::Clubs, &steps, true)?;
    assert_eq!(
        text,
        "West can be endplayed. Trumps are drawn. Strip ♥, ♦ from West, then throw West in \
         with only ♣ left, and any ♣ lead concedes a trick.\n1. West leads ♣K (forced lead)"
    );

    let text = explain_success(Seat::East, &[], Suit::Spades, &steps, false)?;
    assert!(text.starts_with("East can be endplayed. East is thrown in with only ♠ left"));
    Ok(())
}

#[test]
fn test_explain_failure() {
    let text = explain_failure(&Diagnosis::InsufficientEntries {
        defender: Seat::West,
        suit: Suit::Diamonds,
        exits: 4,
        winners: 0,
    });
    assert!(text.contains("insufficient entries"));
    assert!(text.contains("West keeps 4 safe exit cards in ♦"));

    assert!(explain_failure(&Diagnosis::NoForcingLine).starts_with("No endplay"));
}
