use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{FigureCardId, ParseError, ShapeId};

/// A movement card.
///
/// Movement cards have no identity beyond their type: two `Mov3` cards are
/// interchangeable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MoveCard {
    #[serde(rename = "mov1")]
    Mov1,
    #[serde(rename = "mov2")]
    Mov2,
    #[serde(rename = "mov3")]
    Mov3,
    #[serde(rename = "mov4")]
    Mov4,
    #[serde(rename = "mov5")]
    Mov5,
    #[serde(rename = "mov6")]
    Mov6,
    #[serde(rename = "mov7")]
    Mov7,
}

/// How many copies of each movement card type exist.
pub const MOVE_CARD_COPIES: usize = 7;
/// Size of the full movement deck.
pub const MOVE_DECK_SIZE: usize = MOVE_CARD_COPIES * MoveCard::ALL.len();

impl MoveCard {
    pub const ALL: [MoveCard; 7] = [
        MoveCard::Mov1,
        MoveCard::Mov2,
        MoveCard::Mov3,
        MoveCard::Mov4,
        MoveCard::Mov5,
        MoveCard::Mov6,
        MoveCard::Mov7,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MoveCard::Mov1 => "mov1",
            MoveCard::Mov2 => "mov2",
            MoveCard::Mov3 => "mov3",
            MoveCard::Mov4 => "mov4",
            MoveCard::Mov5 => "mov5",
            MoveCard::Mov6 => "mov6",
            MoveCard::Mov7 => "mov7",
        }
    }

    /// The full deck: seven copies of each type.
    pub fn full_deck() -> Vec<MoveCard> {
        MoveCard::ALL
            .iter()
            .flat_map(|&card| std::iter::repeat(card).take(MOVE_CARD_COPIES))
            .collect()
    }

    /// Parses the comma-separated wire form, e.g. `"mov1,mov1,mov4"`.
    ///
    /// An empty string is an empty list.
    pub fn parse_list(s: &str) -> Result<Vec<MoveCard>, ParseError> {
        s.split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(MoveCard::from_str)
            .collect()
    }
}

impl std::fmt::Display for MoveCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for MoveCard {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveCard::ALL
            .into_iter()
            .find(|card| card.code() == s)
            .ok_or_else(|| ParseError::InvalidMoveCard {
                found: String::from(s),
            })
    }
}

/// Where a figure card currently is, from the point of view of its owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureStatus {
    /// In the owner's private backlog.
    Available,
    /// Visible in the owner's hand and claimable.
    InHand,
    /// In the hand, but blocked by an opponent.
    Blocked,
    /// Was blocked and got freed, but has not been used yet.
    ///
    /// While such a card is in the hand, the hand is not refilled.
    WasBlocked,
}

/// A figure card. Every figure card has exactly one owner for its whole life.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureCard {
    pub id: FigureCardId,
    pub shape: ShapeId,
    pub status: FigureStatus,
}

impl FigureCard {
    pub fn is_blocked(&self) -> bool {
        self.status == FigureStatus::Blocked
    }

    /// Can the card be used to claim a figure?
    pub fn is_usable(&self) -> bool {
        matches!(self.status, FigureStatus::InHand | FigureStatus::WasBlocked)
    }
}
