use serde::{Deserialize, Serialize};

use crate::{Color, FigureCard, GameId, Grid, MoveCard, PlayerId, PlayerState};

/// The live board in its wire format: 36 color letters in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot(String);

impl BoardSnapshot {
    pub fn from_grid(grid: &Grid) -> Self {
        Self(grid.iter().map(|c| c.letter()).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The result of a successful claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ClaimOutcome {
    /// The card was used up and the game goes on.
    Claimed { board: BoardSnapshot },
    /// That was the claimer's last figure card.
    Won {
        winner: PlayerId,
        board: BoardSnapshot,
    },
}

/// The result of a player leaving.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LeaveOutcome {
    /// The game had not started yet, the player just lost their seat.
    Unseated,
    /// The game goes on with whoever is now on turn.
    Continues { current_player: PlayerId },
    /// Only one player is left, who wins.
    Won { winner: PlayerId },
}

/// The lifecycle stage of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Lobby,
    Active,
    Ended { winner: Option<PlayerId> },
}

/// What everyone at the table may know about one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub color: Color,
    pub figures: Vec<FigureCard>,
    pub moves: Vec<MoveCard>,
    pub backlog_len: usize,
    pub figures_claimed: usize,
}

impl From<&PlayerState> for PlayerView {
    fn from(player: &PlayerState) -> Self {
        Self {
            id: player.id,
            color: player.color,
            figures: player.figures.clone(),
            moves: player.moves.clone(),
            backlog_len: player.backlog.len(),
            figures_claimed: player.figures_claimed,
        }
    }
}

/// The public state of a game, as broadcast after each change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub id: GameId,
    #[serde(flatten)]
    pub phase: Phase,
    /// Seated players before the game starts.
    pub seats: Vec<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub board: Option<BoardSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_player: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub forbidden_color: Option<Color>,
    /// Players in turn order.
    pub players: Vec<PlayerView>,
    pub move_deck_len: usize,
}

impl GameView {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.id == id)
    }
}
