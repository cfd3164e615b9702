use rand::seq::SliceRandom;
use rand::Rng;

use crate::PlayerId;

/// The cyclic turn order of a game.
///
/// Every seated player appears exactly once. The order is fixed when the game
/// starts; leaving splices a player out without disturbing the others.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnRing {
    order: Vec<PlayerId>,
}

impl TurnRing {
    /// Builds a ring over `ids` in random order.
    pub fn build<R: Rng + ?Sized>(ids: &[PlayerId], rng: &mut R) -> Self {
        let mut order = ids.to_vec();
        order.shuffle(rng);
        Self::from_order(order)
    }

    /// Builds a ring in the given order. Duplicates after the first occurrence are dropped.
    pub fn from_order(ids: impl IntoIterator<Item = PlayerId>) -> Self {
        let mut order = Vec::new();
        for id in ids {
            if !order.contains(&id) {
                order.push(id);
            }
        }
        Self { order }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.order.contains(&id)
    }

    /// The players, starting with whoever moves first.
    pub fn order(&self) -> &[PlayerId] {
        &self.order
    }

    pub fn first(&self) -> Option<PlayerId> {
        self.order.first().copied()
    }

    /// The player after `id`, or `None` if `id` is not in the ring.
    pub fn next(&self, id: PlayerId) -> Option<PlayerId> {
        let idx = self.position(id)?;
        Some(self.order[(idx + 1) % self.order.len()])
    }

    /// The player before `id`, or `None` if `id` is not in the ring.
    pub fn predecessor(&self, id: PlayerId) -> Option<PlayerId> {
        let idx = self.position(id)?;
        Some(self.order[(idx + self.order.len() - 1) % self.order.len()])
    }

    /// Appends a player at the end of the cycle. Returns `false` if already present.
    pub fn insert(&mut self, id: PlayerId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Splices a player out of the cycle.
    ///
    /// The last remaining player can't be removed. Returns whether the ring changed.
    pub fn remove(&mut self, id: PlayerId) -> bool {
        match self.position(id) {
            Some(idx) if self.order.len() > 1 => {
                self.order.remove(idx);
                true
            }
            _ => false,
        }
    }

    fn position(&self, id: PlayerId) -> Option<usize> {
        self.order.iter().position(|&p| p == id)
    }
}
