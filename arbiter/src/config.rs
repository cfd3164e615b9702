use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use switcher::GameId;

/// Default time budget of one turn.
pub const TURN_DURATION: Duration = Duration::from_secs(120);
/// How many events the broadcast channel buffers per subscriber.
pub const EVENT_CAPACITY: usize = 1000;

/// Settings shared by all games of a host.
#[derive(Clone, Debug)]
pub struct HostConfig {
    pub turn_duration: Duration,
    pub event_capacity: usize,
    /// Every game's RNG is derived from this seed and the game id.
    pub seed: u64,
}

impl HostConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            turn_duration: TURN_DURATION,
            event_capacity: EVENT_CAPACITY,
            seed,
        }
    }

    pub fn game_rng(&self, game: GameId) -> StdRng {
        // Spread the game ids so that neighboring games don't get similar seeds
        StdRng::seed_from_u64(self.seed ^ u64::from(game).wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }
}
