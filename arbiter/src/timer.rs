use std::time::Duration;

use switcher::GameId;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::{Event, GameHost};

/// The countdown of one turn.
///
/// The countdown runs in its own task and ticks once per second. When it
/// reaches zero, it ends the turn through [`GameHost::expire_turn()`], tagged
/// with the epoch it was started for. Dropping the timer stops the task.
#[derive(Debug)]
pub struct TurnTimer {
    // Never sent on; dropping it closes the channel
    _cancel: broadcast::Sender<()>,
}

impl TurnTimer {
    pub fn start(host: GameHost, game: GameId, epoch: u64, duration: Duration) -> Self {
        let (cancel_tx, mut cancel_rx) = broadcast::channel::<()>(1);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately
            ticker.tick().await;
            let mut seconds_left = duration.as_secs();
            while seconds_left > 0 {
                tokio::select! {
                    _ = cancel_rx.recv() => {
                        trace!(game, epoch, "Turn timer stopped");
                        return;
                    }
                    _ = ticker.tick() => {}
                }
                seconds_left -= 1;
                host.publish(game, Event::Countdown { seconds_left });
            }
            match host.expire_turn(game, epoch).await {
                Ok(Some(current_player)) => debug!(game, epoch, current_player, "Turn expired"),
                Ok(None) => trace!(game, epoch, "Stale turn timer"),
                Err(err) => debug!(game, epoch, %err, "Turn timer outlived its game"),
            }
        });
        Self { _cancel: cancel_tx }
    }
}
