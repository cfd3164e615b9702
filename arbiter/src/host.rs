use std::collections::HashMap;
use std::sync::Arc;

use switcher::{
    BoardSnapshot, ClaimOutcome, FigureCardId, Game, GameId, GameView, LeaveOutcome, MoveCard,
    PlayerId, NUM_CELLS,
};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, trace};

use crate::{Event, EventReceiver, EventSender, HostConfig, HostError, TurnTimer};

/// Owns every running game and serializes the operations on each of them.
///
/// Cloning is cheap; all clones share the same games.
#[derive(Clone)]
pub struct GameHost {
    inner: Arc<Inner>,
}

struct Inner {
    config: HostConfig,
    games: RwLock<HashMap<GameId, Arc<Mutex<Slot>>>>,
    events: EventSender,
}

/// A game together with the countdown of its current turn.
struct Slot {
    game: Game,
    /// Bumped whenever the turn passes to another player.
    epoch: u64,
    timer: Option<TurnTimer>,
}

impl GameHost {
    pub fn new(config: HostConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity);
        Self {
            inner: Arc::new(Inner {
                config,
                games: RwLock::new(HashMap::new()),
                events,
            }),
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.inner.events.subscribe()
    }

    pub(crate) fn publish(&self, game: GameId, event: Event) {
        trace!(game, ?event, "Publishing event");
        // Nobody listening is fine
        let _ = self.inner.events.send((game, event));
    }

    pub async fn create_game(&self, game: GameId) -> Result<GameView, HostError> {
        let mut games = self.inner.games.write().await;
        if games.contains_key(&game) {
            return Err(HostError::GameExists { game });
        }
        let slot = Slot {
            game: Game::new(game),
            epoch: 0,
            timer: None,
        };
        let view = slot.game.view();
        games.insert(game, Arc::new(Mutex::new(slot)));
        info!(game, "Game created");
        Ok(view)
    }

    pub async fn join(&self, game: GameId, player: PlayerId) -> Result<GameView, HostError> {
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        slot.game.join(player)?;
        Ok(slot.game.view())
    }

    pub async fn initialize(&self, game: GameId) -> Result<GameView, HostError> {
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        slot.game.initialize(self.inner.config.game_rng(game))?;
        let view = slot.game.view();
        self.publish_board(game, &view);
        self.publish(game, Event::hands_changed(&view));
        self.restart_timer(game, &mut slot);
        Ok(view)
    }

    pub async fn partial_move(
        &self,
        game: GameId,
        i1: i8,
        j1: i8,
        i2: i8,
        j2: i8,
    ) -> Result<BoardSnapshot, HostError> {
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        let board = slot.game.partial_move(i1, j1, i2, j2)?;
        self.publish_board(game, &slot.game.view());
        Ok(board)
    }

    pub async fn undo_moves(&self, game: GameId) -> Result<BoardSnapshot, HostError> {
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        let board = slot.game.undo_moves()?;
        self.publish_board(game, &slot.game.view());
        Ok(board)
    }

    /// Claims a figure. `used` lists the spent movement cards in their wire
    /// format, e.g. `"mov1,mov4"`.
    pub async fn claim_figure(
        &self,
        game: GameId,
        player: PlayerId,
        card: FigureCardId,
        used: &str,
        x: i8,
        y: i8,
    ) -> Result<ClaimOutcome, HostError> {
        let used = MoveCard::parse_list(used)?;
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        // The claimed cell's color becomes forbidden
        let target_color = slot.game.board().and_then(|b| b.color_at(x, y).ok());
        let outcome = slot.game.claim_figure(player, card, &used, x, y)?;
        match &outcome {
            ClaimOutcome::Claimed { .. } => {
                let view = slot.game.view();
                self.publish_board(game, &view);
                self.publish(game, Event::hands_changed(&view));
            }
            ClaimOutcome::Won { winner, board } => {
                self.publish(
                    game,
                    Event::BoardChanged {
                        board: board.clone(),
                        forbidden_color: target_color,
                    },
                );
                self.finish(game, &mut slot, Some(*winner)).await;
            }
        }
        Ok(outcome)
    }

    /// Blocks another player's figure card. `used` is as for [`GameHost::claim_figure()`].
    pub async fn block_figure(
        &self,
        game: GameId,
        blocker: PlayerId,
        card: FigureCardId,
        used: &str,
        x: i8,
        y: i8,
    ) -> Result<BoardSnapshot, HostError> {
        let used = MoveCard::parse_list(used)?;
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        let board = slot.game.block_figure(blocker, card, &used, x, y)?;
        let view = slot.game.view();
        self.publish_board(game, &view);
        self.publish(game, Event::hands_changed(&view));
        Ok(board)
    }

    /// Ends the turn of `player`. Returns who is on turn next.
    pub async fn skip_turn(&self, game: GameId, player: PlayerId) -> Result<PlayerId, HostError> {
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        let next = slot.game.skip_turn(player)?;
        self.turn_changed(game, &mut slot);
        Ok(next)
    }

    /// Ends the current turn because its time ran out.
    ///
    /// `epoch` identifies the turn the timer was started for. If the turn has
    /// passed on since, nothing happens and `None` is returned.
    pub async fn expire_turn(
        &self,
        game: GameId,
        epoch: u64,
    ) -> Result<Option<PlayerId>, HostError> {
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        if slot.epoch != epoch {
            trace!(game, epoch, current_epoch = slot.epoch, "Ignoring stale expiry");
            return Ok(None);
        }
        let next = slot.game.expire_turn()?;
        self.turn_changed(game, &mut slot);
        Ok(Some(next))
    }

    pub async fn player_leaves(
        &self,
        game: GameId,
        player: PlayerId,
    ) -> Result<LeaveOutcome, HostError> {
        let entry = self.slot(game).await?;
        let mut slot = entry.lock().await;
        let current_before = slot.game.current_player();
        let outcome = slot.game.player_leaves(player)?;
        self.publish(game, Event::PlayerLeft { player });
        match &outcome {
            LeaveOutcome::Unseated => {}
            LeaveOutcome::Continues { current_player } => {
                if current_before != Some(*current_player) {
                    self.turn_changed(game, &mut slot);
                } else {
                    self.publish(game, Event::hands_changed(&slot.game.view()));
                }
            }
            LeaveOutcome::Won { winner } => self.finish(game, &mut slot, Some(*winner)).await,
        }
        Ok(outcome)
    }

    /// See [`Game::highlighted_cells()`].
    pub async fn highlighted_cells(&self, game: GameId) -> Result<[u8; NUM_CELLS], HostError> {
        let entry = self.slot(game).await?;
        let slot = entry.lock().await;
        Ok(slot.game.highlighted_cells()?)
    }

    pub async fn view(&self, game: GameId) -> Result<GameView, HostError> {
        let entry = self.slot(game).await?;
        let slot = entry.lock().await;
        Ok(slot.game.view())
    }

    /// The epoch of the current turn, as handed to its timer.
    pub async fn turn_epoch(&self, game: GameId) -> Result<u64, HostError> {
        let entry = self.slot(game).await?;
        let slot = entry.lock().await;
        Ok(slot.epoch)
    }

    pub async fn game_ids(&self) -> Vec<GameId> {
        let mut ids: Vec<GameId> = self.inner.games.read().await.keys().copied().collect();
        ids.sort();
        ids
    }

    async fn slot(&self, game: GameId) -> Result<Arc<Mutex<Slot>>, HostError> {
        self.inner
            .games
            .read()
            .await
            .get(&game)
            .cloned()
            .ok_or(HostError::GameNotFound { game })
    }

    fn publish_board(&self, game: GameId, view: &GameView) {
        if let Some(event) = Event::board_changed(view) {
            self.publish(game, event);
        }
    }

    fn turn_changed(&self, game: GameId, slot: &mut Slot) {
        let view = slot.game.view();
        self.publish_board(game, &view);
        self.publish(game, Event::hands_changed(&view));
        self.restart_timer(game, slot);
    }

    fn restart_timer(&self, game: GameId, slot: &mut Slot) {
        slot.epoch += 1;
        if let Some(current_player) = slot.game.current_player() {
            self.publish(game, Event::TurnChanged { current_player });
        }
        // Replacing the old timer stops it
        slot.timer = Some(TurnTimer::start(
            self.clone(),
            game,
            slot.epoch,
            self.inner.config.turn_duration,
        ));
        debug!(game, epoch = slot.epoch, "Turn timer started");
    }

    /// Tears down an ended game. Late timer callbacks won't find it anymore.
    async fn finish(&self, game: GameId, slot: &mut Slot, winner: Option<PlayerId>) {
        slot.timer = None;
        slot.epoch += 1;
        self.inner.games.write().await.remove(&game);
        self.publish(game, Event::GameEnded { winner });
        info!(game, ?winner, "Game removed");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use switcher::{ErrorKind, IllegalAction, Phase};

    use super::*;

    fn host(turn_secs: u64) -> GameHost {
        GameHost::new(HostConfig {
            turn_duration: Duration::from_secs(turn_secs),
            ..HostConfig::with_seed(11)
        })
    }

    async fn started_game(host: &GameHost, game: GameId, players: &[PlayerId]) -> GameView {
        host.create_game(game).await.unwrap();
        for &p in players {
            host.join(game, p).await.unwrap();
        }
        host.initialize(game).await.unwrap()
    }

    fn drain(events: &mut EventReceiver) -> Vec<(GameId, Event)> {
        let mut result = Vec::new();
        while let Ok(event) = events.try_recv() {
            result.push(event);
        }
        result
    }

    fn next_player(view: &GameView) -> PlayerId {
        let current = view.current_player.unwrap();
        let idx = view.players.iter().position(|p| p.id == current).unwrap();
        view.players[(idx + 1) % view.players.len()].id
    }

    #[tokio::test]
    async fn unknown_and_duplicate_games() {
        let host = host(120);
        assert_eq!(
            host.view(3).await,
            Err(HostError::GameNotFound { game: 3 })
        );
        host.create_game(3).await.unwrap();
        let err = host.create_game(3).await.unwrap_err();
        assert_eq!(err, HostError::GameExists { game: 3 });
        assert_eq!(err.kind(), ErrorKind::State);
        assert_eq!(host.game_ids().await, vec![3]);
    }

    #[tokio::test]
    async fn lifecycle_errors_are_reported() {
        let host = host(120);
        host.create_game(1).await.unwrap();
        host.join(1, 10).await.unwrap();
        let err = host.initialize(1).await.unwrap_err();
        assert_eq!(
            err,
            HostError::Illegal(IllegalAction::WrongPlayerCount { count: 1 })
        );
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            host.skip_turn(1, 10).await,
            Err(HostError::Illegal(IllegalAction::NotInitialized))
        );
        let err = host.claim_figure(1, 10, 1, "mov1,jump", 0, 0).await.unwrap_err();
        assert!(matches!(err, HostError::Parse(_)));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test(start_paused = true)]
    async fn initialize_announces_the_game() {
        let host = host(120);
        let mut events = host.subscribe();
        let view = started_game(&host, 1, &[10, 20, 30]).await;
        assert_eq!(view.phase, Phase::Active);
        assert_eq!(host.turn_epoch(1).await, Ok(1));

        let events = drain(&mut events);
        assert!(events.iter().all(|(game, _)| *game == 1));
        assert!(events
            .iter()
            .any(|(_, e)| matches!(e, Event::BoardChanged { forbidden_color: None, .. })));
        assert!(events
            .iter()
            .any(|(_, e)| matches!(e, Event::HandsChanged { players, .. } if players.len() == 3)));
        assert!(events.iter().any(|(_, e)| *e
            == Event::TurnChanged {
                current_player: view.current_player.unwrap()
            }));
    }

    #[tokio::test(start_paused = true)]
    async fn timer_ends_the_turn() {
        let host = host(3);
        let mut events = host.subscribe();
        let view = started_game(&host, 1, &[10, 20]).await;
        let next = next_player(&view);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let after = host.view(1).await.unwrap();
        assert_eq!(after.current_player, Some(next));
        assert_eq!(host.turn_epoch(1).await, Ok(2));

        let countdown: Vec<u64> = drain(&mut events)
            .into_iter()
            .filter_map(|(_, e)| match e {
                Event::Countdown { seconds_left } => Some(seconds_left),
                _ => None,
            })
            .collect();
        assert_eq!(countdown, vec![2, 1, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn skipping_restarts_the_timer() {
        let host = host(3);
        let view = started_game(&host, 1, &[10, 20]).await;
        let first = view.current_player.unwrap();
        let second = next_player(&view);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(host.skip_turn(1, first).await, Ok(second));

        // The first timer would have fired by now
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(host.view(1).await.unwrap().current_player, Some(second));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(host.view(1).await.unwrap().current_player, Some(first));
    }

    #[tokio::test(start_paused = true)]
    async fn stale_expiry_is_ignored() {
        let host = host(120);
        let view = started_game(&host, 1, &[10, 20, 30]).await;
        let first = view.current_player.unwrap();
        let epoch = host.turn_epoch(1).await.unwrap();

        let second = host.skip_turn(1, first).await.unwrap();
        assert_eq!(host.expire_turn(1, epoch).await, Ok(None));
        assert_eq!(host.view(1).await.unwrap().current_player, Some(second));

        let third = host.expire_turn(1, epoch + 1).await.unwrap();
        assert!(third.is_some());
        assert_ne!(third, Some(second));
    }

    #[tokio::test(start_paused = true)]
    async fn last_player_standing_wins_and_game_is_removed() {
        let host = host(3);
        let mut events = host.subscribe();
        started_game(&host, 1, &[10, 20]).await;
        drain(&mut events);

        assert_eq!(
            host.player_leaves(1, 20).await,
            Ok(LeaveOutcome::Won { winner: 10 })
        );
        assert_eq!(
            host.view(1).await,
            Err(HostError::GameNotFound { game: 1 })
        );
        let events: Vec<Event> = drain(&mut events).into_iter().map(|(_, e)| e).collect();
        assert_eq!(
            events,
            vec![
                Event::PlayerLeft { player: 20 },
                Event::GameEnded { winner: Some(10) }
            ]
        );

        // The stopped timer must not touch anything
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(host.game_ids().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn claiming_a_highlighted_figure() {
        let host = host(120);
        // Some game will deal the player on turn a figure that is on the board
        for game in 1..=500 {
            let view = started_game(&host, game, &[10, 20]).await;
            let cells = host.highlighted_cells(game).await.unwrap();
            let Some(idx) = (0..NUM_CELLS).find(|&idx| cells[idx] > 0) else {
                continue;
            };
            let (x, y) = ((idx / 6) as i8, (idx % 6) as i8);
            let current = view.current_player.unwrap();
            let hand = view.player(current).unwrap().figures.clone();
            let used = view.player(current).unwrap().moves[0].to_string();

            let mut events = host.subscribe();
            for card in hand {
                if let Ok(outcome) = host.claim_figure(game, current, card.id, &used, x, y).await {
                    assert!(matches!(outcome, ClaimOutcome::Claimed { .. }));
                    let after = host.view(game).await.unwrap();
                    let player = after.player(current).unwrap();
                    assert_eq!(player.figures_claimed, 1);
                    assert_eq!(player.moves.len(), 2);
                    assert!(after.forbidden_color.is_some());
                    assert_eq!(after.current_player, Some(current));
                    let events = drain(&mut events);
                    assert!(events
                        .iter()
                        .any(|(_, e)| matches!(e, Event::BoardChanged { forbidden_color: Some(_), .. })));
                    return;
                }
            }
            panic!("No card of player {} matches cell ({}, {})", current, x, y);
        }
        panic!("No game had a claimable figure");
    }
}
