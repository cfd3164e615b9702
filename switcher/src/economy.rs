use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::{
    Color, FigureCard, FigureCardId, FigureStatus, InsufficientCards, MoveCard, PlayerId,
    PlayerState, ShapeId,
};

/// Maximum number of figure cards and of movement cards in a hand.
pub const HAND_SIZE: usize = 3;
/// How many copies of each figure card exist.
pub const FIGURE_COPIES: usize = 2;

/// The `(simple, hard)` figure cards dealt to each seat, by player count.
///
/// Every row uses up both pools (14 simple and 36 hard cards) exactly.
static FIGURE_QUOTAS: [&[(usize, usize)]; 3] = [
    &[(7, 18), (7, 18)],
    &[(5, 12), (5, 12), (4, 12)],
    &[(4, 9), (4, 9), (3, 9), (3, 9)],
];

/// The per-seat figure quotas for a game with `num_players` players.
///
/// Returns `None` for player counts other than 2, 3 and 4.
pub fn figure_quotas(num_players: usize) -> Option<&'static [(usize, usize)]> {
    match num_players {
        2..=4 => Some(FIGURE_QUOTAS[num_players - 2]),
        _ => None,
    }
}

/// What to do when a draw asks for more cards than are left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortfall {
    /// Fail with [`InsufficientCards`] and leave the pool alone.
    Fail,
    /// Take whatever is left.
    TakeWhatIsLeft,
}

/// Draws `n` random cards from `pool`, without replacement.
pub fn draw<T, R: Rng + ?Sized>(
    pool: &mut Vec<T>,
    n: usize,
    rng: &mut R,
    shortfall: Shortfall,
) -> Result<Vec<T>, InsufficientCards> {
    if n > pool.len() && shortfall == Shortfall::Fail {
        return Err(InsufficientCards {
            requested: n,
            available: pool.len(),
        });
    }
    let n = n.min(pool.len());
    pool.shuffle(rng);
    Ok(pool.split_off(pool.len() - n))
}

/// The result of dealing the cards at the start of a game.
#[derive(Clone, Debug)]
pub struct Deal {
    /// The shared movement deck, after every player got their hand.
    pub move_deck: Vec<MoveCard>,
    /// One entry per seat, in seat order.
    pub players: Vec<PlayerState>,
}

/// Deals all cards of a new game.
///
/// Each seat gets its `(simple, hard)` quota of figure cards as a backlog,
/// three of which are revealed to form the hand, and three movement cards.
/// Figure card ids are handed out sequentially starting at `first_card_id`.
pub fn deal_initial<R: Rng + ?Sized>(
    seats: &[(PlayerId, Color)],
    quotas: &[(usize, usize)],
    first_card_id: FigureCardId,
    rng: &mut R,
) -> Result<Deal, InsufficientCards> {
    let copies = |shapes: &[ShapeId]| -> Vec<ShapeId> {
        shapes
            .iter()
            .flat_map(|&shape| std::iter::repeat(shape).take(FIGURE_COPIES))
            .collect()
    };
    let mut simple_pool = copies(&ShapeId::SIMPLE);
    let mut hard_pool = copies(&ShapeId::HARD);
    let mut move_deck = MoveCard::full_deck();
    let mut next_id = first_card_id;

    let mut players = Vec::with_capacity(seats.len());
    for (&(id, color), &(num_simple, num_hard)) in seats.iter().zip(quotas) {
        let mut shapes = draw(&mut simple_pool, num_simple, rng, Shortfall::Fail)?;
        shapes.extend(draw(&mut hard_pool, num_hard, rng, Shortfall::Fail)?);
        let backlog = shapes
            .into_iter()
            .map(|shape| {
                let card = FigureCard {
                    id: next_id,
                    shape,
                    status: FigureStatus::Available,
                };
                next_id += 1;
                card
            })
            .collect();
        let mut player = PlayerState::new(id, color, backlog);
        player.moves = draw(&mut move_deck, HAND_SIZE, rng, Shortfall::Fail)?;
        refill_figures(&mut player, rng);
        players.push(player);
    }
    debug!(
        simple_left = simple_pool.len(),
        hard_left = hard_pool.len(),
        move_deck = move_deck.len(),
        "Dealt cards"
    );
    Ok(Deal { move_deck, players })
}

/// Summarizes what [`replenish_hand()`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Replenishment {
    pub figures_drawn: usize,
    pub moves_drawn: usize,
    /// A lone blocked card that was freed instead of drawing.
    pub freed: Option<FigureCardId>,
}

/// Refills a player's figure hand and movement hand to three cards each.
///
/// A lone blocked figure card is freed instead of drawing, and no figure
/// cards are drawn while the hand holds a blocked or freed card. Draws take
/// whatever is left when the backlog or the shared deck runs short.
pub fn replenish_hand<R: Rng + ?Sized>(
    player: &mut PlayerState,
    move_deck: &mut Vec<MoveCard>,
    rng: &mut R,
) -> Replenishment {
    let mut result = Replenishment::default();
    if let Some(card) = player.free_last_blocked_card() {
        debug!(player = player.id, card, "Freed last blocked card");
        result.freed = Some(card);
    } else if !player.figure_hand_is_frozen() {
        result.figures_drawn = refill_figures(player, rng);
    }

    let missing = HAND_SIZE.saturating_sub(player.moves.len());
    // Cannot fail with TakeWhatIsLeft
    if let Ok(drawn) = draw(move_deck, missing, rng, Shortfall::TakeWhatIsLeft) {
        if drawn.len() < missing {
            warn!(
                player = player.id,
                missing,
                drawn = drawn.len(),
                "Movement deck ran short"
            );
        }
        result.moves_drawn = drawn.len();
        player.moves.extend(drawn);
    }
    result
}

// Reveals backlog cards until the figure hand is full or the backlog is empty.
fn refill_figures<R: Rng + ?Sized>(player: &mut PlayerState, rng: &mut R) -> usize {
    let missing = HAND_SIZE.saturating_sub(player.figures.len());
    match draw(&mut player.backlog, missing, rng, Shortfall::TakeWhatIsLeft) {
        Ok(drawn) => {
            let num_drawn = drawn.len();
            player
                .figures
                .extend(drawn.into_iter().map(|card| FigureCard {
                    status: FigureStatus::InHand,
                    ..card
                }));
            num_drawn
        }
        Err(_) => 0,
    }
}

/// Moves the used movement cards from a player's hand back to the shared deck.
///
/// Each requested card is removed at most once per occurrence; types that the
/// player does not hold are ignored. Returns the cards that were moved.
pub fn return_move_cards(
    player: &mut PlayerState,
    move_deck: &mut Vec<MoveCard>,
    used: &[MoveCard],
) -> Vec<MoveCard> {
    let mut returned = Vec::with_capacity(used.len());
    for &card in used {
        match player.moves.iter().position(|&c| c == card) {
            Some(idx) => {
                returned.push(player.moves.swap_remove(idx));
            }
            None => debug!(player = player.id, %card, "Ignoring unheld movement card"),
        }
    }
    move_deck.extend(returned.iter().copied());
    returned
}
