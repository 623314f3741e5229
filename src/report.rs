#[cfg(test)]
mod test;

use crate::deal::{Seat, Suit};
use crate::endplay::{Diagnosis, Reason, Step};
use crate::error::Error;

impl Reason {
    /// Short description of the role of a card
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Strip => "strip",
            Self::ThrowIn => "throw-in",
            Self::Exit => "exit",
            Self::Lead => "lead",
            Self::Follow => "follow",
            Self::Ruff => "ruff",
            Self::Discard => "discard",
            Self::ForcedLead => "forced lead",
        }
    }
}

/// Render a line of play as numbered sentences
///
/// ```text
/// 1. North leads ♥A (strip)
/// 2. East plays ♥Q (follow)
/// ```
///
/// # Errors
/// [`Error::InvalidLine`] if there is no step to render
pub fn render_steps(steps: &[Step]) -> Result<Vec<String>, Error> {
    if steps.is_empty() {
        return Err(Error::InvalidLine);
    }

    Ok(steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let verb = if step.reason.is_lead() { "leads" } else { "plays" };
            format!(
                "{}. {} {verb} {} ({})",
                i + 1,
                step.seat,
                step.card,
                step.reason.describe(),
            )
        })
        .collect())
}

fn list_suits(suits: &[Suit]) -> String {
    suits
        .iter()
        .map(Suit::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Explain a successful endplay, followed by the numbered line
///
/// # Errors
/// [`Error::InvalidLine`] if the line is empty
pub fn explain_success(
    target: Seat,
    strip_suits: &[Suit],
    forcing_suit: Suit,
    steps: &[Step],
    trumps_drawn: bool,
) -> Result<String, Error> {
    let lines = render_steps(steps)?;
    let mut text = format!("{target} can be endplayed.");

    if trumps_drawn {
        text.push_str(" Trumps are drawn.");
    }
    if strip_suits.is_empty() {
        text.push_str(&format!(" {target} is thrown in"));
    } else {
        text.push_str(&format!(
            " Strip {} from {target}, then throw {target} in",
            list_suits(strip_suits),
        ));
    }
    text.push_str(&format!(
        " with only {forcing_suit} left, and any {forcing_suit} lead concedes a trick."
    ));

    for line in lines {
        text.push('\n');
        text.push_str(&line);
    }
    Ok(text)
}

/// Explain why no endplay exists
#[must_use]
pub fn explain_failure(diagnosis: &Diagnosis) -> String {
    match *diagnosis {
        Diagnosis::InsufficientEntries {
            defender,
            suit,
            exits,
            winners,
        } => format!(
            "No endplay: {defender} keeps {exits} safe exit cards in {suit} against \
             {winners} sure winners, so declarer has insufficient entries to strip them."
        ),
        Diagnosis::NoForcingLine => {
            "No endplay: the defenders can always keep a safe exit or avoid the lead.".to_owned()
        }
    }
}
