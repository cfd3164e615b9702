use crate::{Color, FigureCard, FigureCardId, FigureStatus, MoveCard, PlayerId};

/// The state for a single player during one game.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub id: PlayerId,
    pub color: Color,
    /// Movement cards in the hand, at most three.
    pub moves: Vec<MoveCard>,
    /// Figure cards that have not been revealed yet.
    pub backlog: Vec<FigureCard>,
    /// Visible figure cards, at most three.
    pub figures: Vec<FigureCard>,
    /// How many figure cards were dealt to this player.
    pub figures_dealt: usize,
    /// How many figure cards this player has used up.
    pub figures_claimed: usize,
}

impl PlayerState {
    pub fn new(id: PlayerId, color: Color, backlog: Vec<FigureCard>) -> Self {
        Self {
            id,
            color,
            moves: Vec::new(),
            figures_dealt: backlog.len(),
            backlog,
            figures: Vec::new(),
            figures_claimed: 0,
        }
    }

    /// Looks up a card in the visible hand.
    pub fn figure(&self, card: FigureCardId) -> Option<&FigureCard> {
        self.figures.iter().find(|c| c.id == card)
    }

    pub(crate) fn figure_mut(&mut self, card: FigureCardId) -> Option<&mut FigureCard> {
        self.figures.iter_mut().find(|c| c.id == card)
    }

    /// A player who has used up every figure card has won.
    pub fn has_no_figures_left(&self) -> bool {
        self.figures.is_empty() && self.backlog.is_empty()
    }

    /// Is refilling the figure hand suspended?
    ///
    /// That is the case while any card in the hand is blocked or was freed but not used yet.
    pub fn figure_hand_is_frozen(&self) -> bool {
        self.figures
            .iter()
            .any(|c| matches!(c.status, FigureStatus::Blocked | FigureStatus::WasBlocked))
    }

    /// Applies the last-card rule: a lone blocked card is freed.
    ///
    /// Returns the id of the freed card, if any.
    pub(crate) fn free_last_blocked_card(&mut self) -> Option<FigureCardId> {
        match self.figures.as_mut_slice() {
            [card] if card.status == FigureStatus::Blocked => {
                card.status = FigureStatus::WasBlocked;
                Some(card.id)
            }
            _ => None,
        }
    }
}
