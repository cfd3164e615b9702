use serde::{Deserialize, Serialize};
use switcher::{
    BoardSnapshot, ClaimOutcome, ErrorKind, FigureCardId, GameId, GameView, LeaveOutcome, PlayerId,
};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::{mpsc, oneshot};
use tracing::warn;

use crate::{Event, EventReceiver, GameHost, HostError};

/// One line of input to the `arbiter` binary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    CreateGame {
        game: GameId,
    },
    Join {
        game: GameId,
        player: PlayerId,
    },
    Initialize {
        game: GameId,
    },
    PartialMove {
        game: GameId,
        i1: i8,
        j1: i8,
        i2: i8,
        j2: i8,
    },
    UndoMoves {
        game: GameId,
    },
    ClaimFigure {
        game: GameId,
        player: PlayerId,
        card: FigureCardId,
        /// Comma-separated movement cards, e.g. `"mov1,mov2"`.
        #[serde(default)]
        used: String,
        x: i8,
        y: i8,
    },
    BlockFigure {
        game: GameId,
        player: PlayerId,
        card: FigureCardId,
        #[serde(default)]
        used: String,
        x: i8,
        y: i8,
    },
    SkipTurn {
        game: GameId,
        player: PlayerId,
    },
    PlayerLeaves {
        game: GameId,
        player: PlayerId,
    },
    HighlightedCells {
        game: GameId,
    },
    View {
        game: GameId,
    },
}

/// The answer to one [`Request`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Game(GameView),
    Board { board: BoardSnapshot },
    Claim(ClaimOutcome),
    Turn { current_player: PlayerId },
    Leave(LeaveOutcome),
    /// Per-cell counts in row-major order.
    Highlights { cells: Vec<u8> },
    Error { kind: ErrorKind, message: String },
}

impl Response {
    pub fn error(kind: ErrorKind, err: &dyn std::error::Error) -> Self {
        // Flatten the error chain into one message
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(err) = source {
            message += &format!(": {}", err);
            source = err.source();
        }
        Response::Error { kind, message }
    }
}

impl From<HostError> for Response {
    fn from(err: HostError) -> Self {
        Response::error(err.kind(), &err)
    }
}

/// A broadcast event as written to the output, tagged with its game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLine {
    pub game: GameId,
    #[serde(flatten)]
    pub event: Event,
}

/// Writes every broadcast event as a JSON line to `lines` until `shutdown`
/// fires. Events already queued at that point are still written.
pub async fn forward_events(
    mut events: EventReceiver,
    lines: mpsc::UnboundedSender<String>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        let received = tokio::select! {
            received = events.recv() => received,
            _ = &mut shutdown => break,
        };
        match received {
            Ok((game, event)) => {
                if !send_event(&lines, game, event) {
                    return;
                }
            }
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Dropped events"),
            Err(RecvError::Closed) => return,
        }
    }

    // Drain what the last requests published
    loop {
        match events.try_recv() {
            Ok((game, event)) => {
                if !send_event(&lines, game, event) {
                    return;
                }
            }
            Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "Dropped events"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => return,
        }
    }
}

/// Returns `false` once nobody reads the lines anymore.
fn send_event(lines: &mpsc::UnboundedSender<String>, game: GameId, event: Event) -> bool {
    match serde_json::to_string(&EventLine { game, event }) {
        Ok(line) => lines.send(line).is_ok(),
        Err(err) => {
            warn!(%err, "Could not serialize event");
            true
        }
    }
}

/// Runs one request against the host.
pub async fn handle(host: &GameHost, request: Request) -> Response {
    let result = match request {
        Request::CreateGame { game } => host.create_game(game).await.map(Response::Game),
        Request::Join { game, player } => host.join(game, player).await.map(Response::Game),
        Request::Initialize { game } => host.initialize(game).await.map(Response::Game),
        Request::PartialMove {
            game,
            i1,
            j1,
            i2,
            j2,
        } => host
            .partial_move(game, i1, j1, i2, j2)
            .await
            .map(|board| Response::Board { board }),
        Request::UndoMoves { game } => host
            .undo_moves(game)
            .await
            .map(|board| Response::Board { board }),
        Request::ClaimFigure {
            game,
            player,
            card,
            used,
            x,
            y,
        } => host
            .claim_figure(game, player, card, &used, x, y)
            .await
            .map(Response::Claim),
        Request::BlockFigure {
            game,
            player,
            card,
            used,
            x,
            y,
        } => host
            .block_figure(game, player, card, &used, x, y)
            .await
            .map(|board| Response::Board { board }),
        Request::SkipTurn { game, player } => host
            .skip_turn(game, player)
            .await
            .map(|current_player| Response::Turn { current_player }),
        Request::PlayerLeaves { game, player } => {
            host.player_leaves(game, player).await.map(Response::Leave)
        }
        Request::HighlightedCells { game } => host
            .highlighted_cells(game)
            .await
            .map(|cells| Response::Highlights {
                cells: cells.to_vec(),
            }),
        Request::View { game } => host.view(game).await.map(Response::Game),
    };
    result.unwrap_or_else(Response::from)
}
