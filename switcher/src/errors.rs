use serde::{Deserialize, Serialize};

use crate::{Color, FigureCardId, PlayerId, ShapeId};

/// How a caller should react to an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad input. Safe to retry with corrected input.
    Validation,
    /// The caller's view of the game is stale. Resolved by refreshing it.
    State,
    /// A deck or backlog ran dry.
    ResourceExhausted,
    /// An unknown game, player or card id.
    NotFound,
}

/// The error type for every rejected game operation.
///
/// A rejected operation never changes the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IllegalAction {
    OutOfRange { i: i8, j: i8 },
    NotInitialized,
    AlreadyInitialized,
    GameEnded,
    WrongPlayerCount { count: usize },
    AlreadyJoined { player: PlayerId },
    GameFull,
    UnknownPlayer { player: PlayerId },
    NotCurrentTurn { current: PlayerId, attempted: PlayerId },
    ForbiddenCell { x: i8, y: i8, color: Color },
    UnknownCard { player: PlayerId, card: FigureCardId },
    CardBlocked { card: FigureCardId },
    ShapeAbsent { shape: ShapeId },
    ShapeNotAtPosition { shape: ShapeId, x: i8, y: i8 },
    OwnCard { card: FigureCardId },
    AlreadyBlocked { card: FigureCardId },
    LastCardInHand { card: FigureCardId },
    Exhausted(InsufficientCards),
}

impl IllegalAction {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IllegalAction::OutOfRange { .. }
            | IllegalAction::WrongPlayerCount { .. }
            | IllegalAction::OwnCard { .. }
            | IllegalAction::LastCardInHand { .. } => ErrorKind::Validation,
            IllegalAction::NotInitialized
            | IllegalAction::AlreadyInitialized
            | IllegalAction::GameEnded
            | IllegalAction::AlreadyJoined { .. }
            | IllegalAction::GameFull
            | IllegalAction::NotCurrentTurn { .. }
            | IllegalAction::ForbiddenCell { .. }
            | IllegalAction::ShapeAbsent { .. }
            | IllegalAction::ShapeNotAtPosition { .. }
            | IllegalAction::CardBlocked { .. }
            | IllegalAction::AlreadyBlocked { .. } => ErrorKind::State,
            IllegalAction::UnknownPlayer { .. } | IllegalAction::UnknownCard { .. } => {
                ErrorKind::NotFound
            }
            IllegalAction::Exhausted(_) => ErrorKind::ResourceExhausted,
        }
    }
}

impl std::error::Error for IllegalAction {}

impl std::fmt::Display for IllegalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IllegalAction::OutOfRange { i, j } =>
                write!(f, "Cell ({}, {}) is outside of the board", i, j),
            IllegalAction::NotInitialized => write!(f, "The game has not been started yet"),
            IllegalAction::AlreadyInitialized => write!(f, "The game has already been started"),
            IllegalAction::GameEnded => write!(f, "The game is over"),
            IllegalAction::WrongPlayerCount { count } =>
                write!(f, "A game needs 2 to 4 players, but has {}", count),
            IllegalAction::AlreadyJoined { player } =>
                write!(f, "Player {} is already in the game", player),
            IllegalAction::GameFull => write!(f, "The game is full"),
            IllegalAction::UnknownPlayer { player } =>
                write!(f, "Player {} is not in the game", player),
            IllegalAction::NotCurrentTurn { current, attempted } =>
                write!(f, "It is the turn of player {}, not of player {}", current, attempted),
            IllegalAction::ForbiddenCell { x, y, color } =>
                write!(f, "({}, {}) has the forbidden color {}", x, y, color),
            IllegalAction::UnknownCard { player, card } =>
                write!(f, "Figure card {} is not available to player {}", card, player),
            IllegalAction::CardBlocked { card } => write!(f, "Figure card {} is blocked", card),
            IllegalAction::ShapeAbsent { shape } =>
                write!(f, "The figure {} is not on the board", shape),
            IllegalAction::ShapeNotAtPosition { shape, x, y } =>
                write!(f, "The figure {} is on the board, but not at ({}, {})", shape, x, y),
            IllegalAction::OwnCard { card } =>
                write!(f, "Figure card {} belongs to the blocking player", card),
            IllegalAction::AlreadyBlocked { card } =>
                write!(f, "Figure card {} is already blocked", card),
            IllegalAction::LastCardInHand { card } =>
                write!(f, "Figure card {} is the last card in its owner's hand", card),
            IllegalAction::Exhausted(err) => write!(f, "{}", err),
        }
    }
}

/// A draw asked for more cards than were left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsufficientCards {
    pub requested: usize,
    pub available: usize,
}

impl InsufficientCards {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::ResourceExhausted
    }
}

impl std::error::Error for InsufficientCards {}

impl From<InsufficientCards> for IllegalAction {
    fn from(err: InsufficientCards) -> Self {
        IllegalAction::Exhausted(err)
    }
}

impl std::fmt::Display for InsufficientCards {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tried to draw {} cards, but only {} are left",
            self.requested, self.available
        )
    }
}

/// The error type for the [`FromStr`](std::str::FromStr) instances of the wire formats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    InvalidColor { found: char },
    WrongBoardLength { len: usize },
    UnbalancedBoard { color: Color, count: usize },
    InvalidShape { found: String },
    InvalidMoveCard { found: String },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

impl std::error::Error for ParseError {}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::InvalidColor { found } => write!(f, "'{}' is not a color", found),
            ParseError::WrongBoardLength { len } =>
                write!(f, "A board has 36 cells, but {} were given", len),
            ParseError::UnbalancedBoard { color, count } =>
                write!(f, "A board has 9 cells of each color, but {} appears {} times", color, count),
            ParseError::InvalidShape { found } => write!(f, "'{}' is not a figure", found),
            ParseError::InvalidMoveCard { found } => write!(f, "'{}' is not a movement card", found),
        }
    }
}
