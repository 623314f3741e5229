use super::*;
use crate::deal::Seat::*;

macro_rules! static_assert {
    ($cond:expr) => {
        const _: () = [()][!$cond as usize];
    };
}

static_assert!(Contract::new(1, Strain::Clubs, Penalty::None, North).target_tricks() == 7);
static_assert!(Contract::new(3, Strain::Notrump, Penalty::None, South).target_tricks() == 9);
static_assert!(Contract::new(6, Strain::Spades, Penalty::Doubled, South).target_tricks() == 12);
static_assert!(Contract::new(7, Strain::Hearts, Penalty::Redoubled, West).target_tricks() == 13);
static_assert!(Strain::Clubs.is_minor() && Strain::Diamonds.is_minor());
static_assert!(Strain::Hearts.is_major() && Strain::Spades.is_major());
static_assert!(Strain::Notrump.is_notrump() && !Strain::Notrump.is_suit());

#[test]
fn test_contract_parser() {
    let slam = Contract::new(6, Strain::Spades, Penalty::None, South);
    assert_eq!(Contract::from_str("6S by S"), Ok(slam));
    assert_eq!(Contract::from_str("6s S"), Ok(slam));
    assert_eq!(Contract::from_str("6♠ by South"), Ok(slam));
    assert_eq!(Contract::from_str(" 6♠S "), Ok(slam));

    assert_eq!(
        Contract::from_str("3NTX W"),
        Ok(Contract::new(3, Strain::Notrump, Penalty::Doubled, West))
    );
    assert_eq!(
        Contract::from_str("4HXX by N"),
        Ok(Contract::new(4, Strain::Hearts, Penalty::Redoubled, North))
    );
    assert_eq!(
        Contract::from_str("1N E"),
        Ok(Contract::new(1, Strain::Notrump, Penalty::None, East))
    );

    assert_eq!(Contract::from_str("8S by S"), Err(ParseContractError));
    assert_eq!(Contract::from_str("0C by N"), Err(ParseContractError));
    assert_eq!(Contract::from_str("6S"), Err(ParseContractError));
    assert_eq!(Contract::from_str("6Z by S"), Err(ParseContractError));
}

#[test]
fn test_contract_display() {
    let doubled = Contract::new(6, Strain::Spades, Penalty::Doubled, South);
    assert_eq!(doubled.to_string(), "6♠X by South");
    assert_eq!(Contract::from_str(&doubled.to_string()), Ok(doubled));

    let game = Contract::new(3, Strain::Notrump, Penalty::None, North);
    assert_eq!(game.to_string(), "3NT by North");
}

#[test]
fn test_contract_roles() {
    let contract = Contract::new(4, Strain::Hearts, Penalty::None, South);
    assert_eq!(contract.trump(), Some(Suit::Hearts));
    assert_eq!(contract.dummy(), North);
    assert_eq!(contract.opening_leader(), West);
    assert_eq!(contract.defenders(), [West, East]);
    assert!(contract.is_declaring(South));
    assert!(contract.is_declaring(North));
    assert!(!contract.is_declaring(East));
    assert!(!contract.is_declaring(West));

    let notrump = Contract::new(3, Strain::Notrump, Penalty::None, East);
    assert_eq!(notrump.trump(), None);
    assert_eq!(notrump.opening_leader(), South);
    assert_eq!(notrump.defenders(), [South, North]);
}
