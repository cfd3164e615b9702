use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::{
    cell_index, deal_initial, detect_shape, figure_quotas, replenish_hand, return_move_cards,
    Board, BoardSnapshot, CellSet, ClaimOutcome, Color, FigureCardId, FigureStatus, GameId,
    GameView, IllegalAction, LeaveOutcome, MoveCard, Phase, PlayerId, PlayerState, PlayerView,
    ShapeId, TurnRing, NUM_CELLS,
};

pub const MAX_PLAYERS: usize = 4;

/// One game, from the lobby until somebody wins.
///
/// Every operation either succeeds completely or returns an [`IllegalAction`]
/// and leaves the game exactly as it was.
#[derive(Clone, Debug)]
pub struct Game {
    id: GameId,
    /// Players in the order they joined.
    seats: Vec<PlayerId>,
    state: GameState,
}

#[derive(Clone, Debug)]
enum GameState {
    Lobby,
    Active(Box<Table>),
    Ended { winner: Option<PlayerId> },
}

/// Everything that only exists while a game is running.
#[derive(Clone, Debug)]
struct Table {
    board: Board,
    ring: TurnRing,
    move_deck: Vec<MoveCard>,
    players: BTreeMap<PlayerId, PlayerState>,
    current_player: PlayerId,
    forbidden_color: Option<Color>,
    rng: StdRng,
}

impl Game {
    pub fn new(id: GameId) -> Self {
        Self {
            id,
            seats: Vec::new(),
            state: GameState::Lobby,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn seats(&self) -> &[PlayerId] {
        &self.seats
    }

    /// Seats a player before the game starts.
    pub fn join(&mut self, player: PlayerId) -> Result<(), IllegalAction> {
        match self.state {
            GameState::Lobby => {}
            GameState::Active(_) => return Err(IllegalAction::AlreadyInitialized),
            GameState::Ended { .. } => return Err(IllegalAction::GameEnded),
        }
        if self.seats.contains(&player) {
            return Err(IllegalAction::AlreadyJoined { player });
        }
        if self.seats.len() >= MAX_PLAYERS {
            return Err(IllegalAction::GameFull);
        }
        self.seats.push(player);
        debug!(game = self.id, player, "Player joined");
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            GameState::Lobby => Phase::Lobby,
            GameState::Active(_) => Phase::Active,
            GameState::Ended { winner } => Phase::Ended { winner },
        }
    }

    /// Starts the game: shuffles the board, the turn order and the colors,
    /// deals the cards and picks a random starting player.
    ///
    /// The game keeps `rng` for every later draw.
    pub fn initialize(&mut self, mut rng: StdRng) -> Result<(), IllegalAction> {
        match self.state {
            GameState::Lobby => {}
            GameState::Active(_) => return Err(IllegalAction::AlreadyInitialized),
            GameState::Ended { .. } => return Err(IllegalAction::GameEnded),
        }
        let count = self.seats.len();
        let quotas = figure_quotas(count).ok_or(IllegalAction::WrongPlayerCount { count })?;

        let board = Board::shuffled(&mut rng);
        let ring = TurnRing::build(&self.seats, &mut rng);
        let mut colors = Color::ALL;
        colors.shuffle(&mut rng);
        let seats: Vec<(PlayerId, Color)> =
            ring.order().iter().copied().zip(colors).collect();
        let deal = deal_initial(&seats, quotas, 1, &mut rng)?;
        let current_player = ring.order()[rng.gen_range(0..ring.len())];

        info!(
            game = self.id,
            order = ?ring.order(),
            current_player,
            "Game started"
        );
        self.state = GameState::Active(Box::new(Table {
            board,
            ring,
            move_deck: deal.move_deck,
            players: deal.players.into_iter().map(|p| (p.id, p)).collect(),
            current_player,
            forbidden_color: None,
            rng,
        }));
        Ok(())
    }

    /// Stages a swap of two cells on the live board.
    pub fn partial_move(
        &mut self,
        i1: i8,
        j1: i8,
        i2: i8,
        j2: i8,
    ) -> Result<BoardSnapshot, IllegalAction> {
        let id = self.id;
        let table = self.table_mut()?;
        table.board.exchange(i1, j1, i2, j2)?;
        debug!(game = id, i1, j1, i2, j2, "Staged swap");
        Ok(table.board.snapshot())
    }

    /// Discards every staged swap.
    pub fn undo_moves(&mut self) -> Result<BoardSnapshot, IllegalAction> {
        let id = self.id;
        let table = self.table_mut()?;
        table.board.undo();
        debug!(game = id, "Undid staged swaps");
        Ok(table.board.snapshot())
    }

    /// Uses one of the player's figure cards on a figure that covers `(x, y)`.
    ///
    /// On success the staged swaps become permanent, the movement cards in
    /// `used` go back to the deck and the figure card is used up. Using up the
    /// last figure card wins the game.
    pub fn claim_figure(
        &mut self,
        player: PlayerId,
        card: FigureCardId,
        used: &[MoveCard],
        x: i8,
        y: i8,
    ) -> Result<ClaimOutcome, IllegalAction> {
        let id = self.id;
        let table = self.table_mut()?;
        let color = table.check_target(player, x, y)?;
        let owner = table.player(player)?;
        let figure = owner
            .figure(card)
            .ok_or(IllegalAction::UnknownCard { player, card })?;
        if figure.is_blocked() {
            return Err(IllegalAction::CardBlocked { card });
        }
        table.check_shape_at(figure.shape, x, y)?;

        let shape = figure.shape;
        table.spend_turn(color, player, used);
        let snapshot = table.board.snapshot();
        let Some(owner) = table.players.get_mut(&player) else {
            return Err(IllegalAction::UnknownPlayer { player });
        };
        owner.figures.retain(|c| c.id != card);
        owner.figures_claimed += 1;
        info!(game = id, player, card, %shape, x, y, "Figure claimed");

        if owner.has_no_figures_left() {
            info!(game = id, winner = player, "Game won");
            self.state = GameState::Ended {
                winner: Some(player),
            };
            return Ok(ClaimOutcome::Won {
                winner: player,
                board: snapshot,
            });
        }
        if let Some(freed) = owner.free_last_blocked_card() {
            debug!(game = id, player, card = freed, "Freed last blocked card");
        }
        Ok(ClaimOutcome::Claimed { board: snapshot })
    }

    /// Blocks a figure card of another player, using a figure of the card's
    /// shape that covers `(x, y)`.
    ///
    /// Staged swaps and movement cards are spent like for a claim.
    pub fn block_figure(
        &mut self,
        blocker: PlayerId,
        card: FigureCardId,
        used: &[MoveCard],
        x: i8,
        y: i8,
    ) -> Result<BoardSnapshot, IllegalAction> {
        let id = self.id;
        let table = self.table_mut()?;
        let color = table.check_target(blocker, x, y)?;
        let (target, figure) = table
            .players
            .values()
            .find_map(|p| p.figure(card).map(|c| (p, c)))
            .ok_or(IllegalAction::UnknownCard {
                player: blocker,
                card,
            })?;
        if target.id == blocker {
            return Err(IllegalAction::OwnCard { card });
        }
        if figure.is_blocked() {
            return Err(IllegalAction::AlreadyBlocked { card });
        }
        if target.figures.len() == 1 {
            return Err(IllegalAction::LastCardInHand { card });
        }
        table.check_shape_at(figure.shape, x, y)?;

        let target = target.id;
        table.spend_turn(color, blocker, used);
        if let Some(figure) = table
            .players
            .get_mut(&target)
            .and_then(|p| p.figure_mut(card))
        {
            figure.status = FigureStatus::Blocked;
        }
        info!(game = id, blocker, target, card, x, y, "Figure blocked");
        Ok(table.board.snapshot())
    }

    /// Ends the turn of `player`, who must be on turn.
    ///
    /// Returns the player who is on turn next.
    pub fn skip_turn(&mut self, player: PlayerId) -> Result<PlayerId, IllegalAction> {
        let table = self.table()?;
        table.player(player)?;
        if player != table.current_player {
            return Err(IllegalAction::NotCurrentTurn {
                current: table.current_player,
                attempted: player,
            });
        }
        self.end_turn()
    }

    /// Ends the turn of whoever is on turn, because their time ran out.
    pub fn expire_turn(&mut self) -> Result<PlayerId, IllegalAction> {
        self.table()?;
        info!(game = self.id, "Turn timed out");
        self.end_turn()
    }

    fn end_turn(&mut self) -> Result<PlayerId, IllegalAction> {
        let id = self.id;
        let table = self.table_mut()?;
        let outgoing = table.current_player;
        table.board.undo();
        if let Some(player) = table.players.get_mut(&outgoing) {
            let result = replenish_hand(player, &mut table.move_deck, &mut table.rng);
            debug!(game = id, player = outgoing, ?result, "Replenished hand");
        }
        table.current_player = table.ring.next(outgoing).unwrap_or(outgoing);
        info!(
            game = id,
            from = outgoing,
            to = table.current_player,
            "Turn changed"
        );
        Ok(table.current_player)
    }

    /// Removes a player from the game.
    ///
    /// The leaver's movement cards go back to the deck and their figure cards
    /// are discarded. When a single player remains, they win.
    pub fn player_leaves(&mut self, player: PlayerId) -> Result<LeaveOutcome, IllegalAction> {
        let id = self.id;
        let table = match &mut self.state {
            GameState::Lobby => {
                let idx = self
                    .seats
                    .iter()
                    .position(|&p| p == player)
                    .ok_or(IllegalAction::UnknownPlayer { player })?;
                self.seats.remove(idx);
                debug!(game = id, player, "Player left the lobby");
                return Ok(LeaveOutcome::Unseated);
            }
            GameState::Active(table) => table,
            GameState::Ended { .. } => return Err(IllegalAction::GameEnded),
        };
        let Some(leaver) = table.players.remove(&player) else {
            return Err(IllegalAction::UnknownPlayer { player });
        };
        if table.current_player == player {
            table.board.undo();
            table.current_player = table.ring.next(player).unwrap_or(player);
        }
        table.ring.remove(player);
        table.move_deck.extend(leaver.moves);
        self.seats.retain(|&p| p != player);
        info!(game = id, player, "Player left");

        if let &[winner] = table.ring.order() {
            info!(game = id, winner, "Game won by forfeit");
            self.state = GameState::Ended {
                winner: Some(winner),
            };
            return Ok(LeaveOutcome::Won { winner });
        }
        Ok(LeaveOutcome::Continues {
            current_player: table.current_player,
        })
    }

    /// Counts, for each cell, how many different figures from the hand of the
    /// player on turn cover it on the live board.
    ///
    /// Blocked cards don't count.
    pub fn highlighted_cells(&self) -> Result<[u8; NUM_CELLS], IllegalAction> {
        let table = self.table()?;
        let player = table.player(table.current_player)?;
        let mut shapes: Vec<ShapeId> = player
            .figures
            .iter()
            .filter(|c| c.is_usable())
            .map(|c| c.shape)
            .collect();
        shapes.sort();
        shapes.dedup();

        let mut counts = [0; NUM_CELLS];
        for shape in shapes {
            let cells = detect_shape(table.board.live(), shape)
                .iter()
                .fold(CellSet::new(), |acc, m| acc | m.cells());
            for (i, j) in cells {
                if let Some(idx) = cell_index(i, j) {
                    counts[idx] += 1;
                }
            }
        }
        Ok(counts)
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.table().ok().map(|t| t.current_player)
    }

    pub fn forbidden_color(&self) -> Option<Color> {
        self.table().ok().and_then(|t| t.forbidden_color)
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.table().ok().and_then(|t| t.players.get(&id))
    }

    pub fn board(&self) -> Option<&Board> {
        self.table().ok().map(|t| &t.board)
    }

    /// Size of the shared movement deck, zero outside of a running game.
    pub fn move_deck_len(&self) -> usize {
        self.table().map_or(0, |t| t.move_deck.len())
    }

    /// Players in turn order, starting with the first player of the ring.
    pub fn turn_order(&self) -> &[PlayerId] {
        match self.table() {
            Ok(table) => table.ring.order(),
            Err(_) => &[],
        }
    }

    pub fn view(&self) -> GameView {
        let table = self.table().ok();
        GameView {
            id: self.id,
            phase: self.phase(),
            seats: self.seats.clone(),
            board: table.map(|t| t.board.snapshot()),
            current_player: table.map(|t| t.current_player),
            forbidden_color: table.and_then(|t| t.forbidden_color),
            players: table
                .map(|t| {
                    t.ring
                        .order()
                        .iter()
                        .filter_map(|id| t.players.get(id))
                        .map(PlayerView::from)
                        .collect()
                })
                .unwrap_or_default(),
            move_deck_len: self.move_deck_len(),
        }
    }

    fn table(&self) -> Result<&Table, IllegalAction> {
        match &self.state {
            GameState::Lobby => Err(IllegalAction::NotInitialized),
            GameState::Active(table) => Ok(table),
            GameState::Ended { .. } => Err(IllegalAction::GameEnded),
        }
    }

    fn table_mut(&mut self) -> Result<&mut Table, IllegalAction> {
        match &mut self.state {
            GameState::Lobby => Err(IllegalAction::NotInitialized),
            GameState::Active(table) => Ok(table),
            GameState::Ended { .. } => Err(IllegalAction::GameEnded),
        }
    }
}

impl Table {
    fn player(&self, player: PlayerId) -> Result<&PlayerState, IllegalAction> {
        self.players
            .get(&player)
            .ok_or(IllegalAction::UnknownPlayer { player })
    }

    /// The checks shared by claims and blocks: the target cell is on the
    /// board, the actor is on turn, and the cell is not of the forbidden color.
    ///
    /// Returns the color of the target cell.
    fn check_target(&self, actor: PlayerId, x: i8, y: i8) -> Result<Color, IllegalAction> {
        let color = self.board.color_at(x, y)?;
        self.player(actor)?;
        if actor != self.current_player {
            return Err(IllegalAction::NotCurrentTurn {
                current: self.current_player,
                attempted: actor,
            });
        }
        if self.forbidden_color == Some(color) {
            return Err(IllegalAction::ForbiddenCell { x, y, color });
        }
        Ok(color)
    }

    fn check_shape_at(&self, shape: ShapeId, x: i8, y: i8) -> Result<(), IllegalAction> {
        let matches = detect_shape(self.board.live(), shape);
        if matches.is_empty() {
            Err(IllegalAction::ShapeAbsent { shape })
        } else if !matches.iter().any(|m| m.covers(x, y)) {
            Err(IllegalAction::ShapeNotAtPosition { shape, x, y })
        } else {
            Ok(())
        }
    }

    /// The effects shared by claims and blocks.
    fn spend_turn(&mut self, color: Color, actor: PlayerId, used: &[MoveCard]) {
        self.forbidden_color = Some(color);
        if let Some(player) = self.players.get_mut(&actor) {
            return_move_cards(player, &mut self.move_deck, used);
        }
        self.board.commit();
    }
}
