use serde::{Deserialize, Serialize};
use switcher::{BoardSnapshot, Color, GameId, GameView, PlayerId, PlayerView};
use tokio::sync::broadcast;

/// A change that connected clients should hear about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    BoardChanged {
        board: BoardSnapshot,
        forbidden_color: Option<Color>,
    },
    TurnChanged {
        current_player: PlayerId,
    },
    HandsChanged {
        players: Vec<PlayerView>,
        move_deck_len: usize,
    },
    /// Seconds left in the current turn.
    Countdown {
        seconds_left: u64,
    },
    PlayerLeft {
        player: PlayerId,
    },
    GameEnded {
        winner: Option<PlayerId>,
    },
}

impl Event {
    pub fn board_changed(view: &GameView) -> Option<Self> {
        Some(Event::BoardChanged {
            board: view.board.clone()?,
            forbidden_color: view.forbidden_color,
        })
    }

    pub fn hands_changed(view: &GameView) -> Self {
        Event::HandsChanged {
            players: view.players.clone(),
            move_deck_len: view.move_deck_len,
        }
    }
}

/// The sending half of the event sink. Every event is tagged with its game.
pub type EventSender = broadcast::Sender<(GameId, Event)>;
pub type EventReceiver = broadcast::Receiver<(GameId, Event)>;
