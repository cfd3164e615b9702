use quickcheck::{Arbitrary, Gen};

use crate::ShapeId;

/// A sequence of cell exchanges. Most coordinates are on the board, a few are not.
#[derive(Clone, Debug)]
pub struct Swaps(pub Vec<(i8, i8, i8, i8)>);

fn coordinate(g: &mut Gen) -> i8 {
    // One in eight lands just outside the board
    match u8::arbitrary(g) % 8 {
        0 => *g.choose(&[-1, 6]).unwrap(),
        _ => (u8::arbitrary(g) % 6) as i8,
    }
}

impl Arbitrary for Swaps {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 24;
        Swaps(
            (0..len)
                .map(|_| (coordinate(g), coordinate(g), coordinate(g), coordinate(g)))
                .collect(),
        )
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Swaps))
    }
}

impl Arbitrary for ShapeId {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&ShapeId::ALL).unwrap()
    }
}

/// One step of a random game, as chosen by the player on turn.
#[derive(Clone, Copy, Debug)]
pub enum Action {
    Exchange(i8, i8, i8, i8),
    Undo,
    /// Claim with the n-th card of the hand.
    Claim { card: u8, x: i8, y: i8, moves: u8 },
    /// Block the n-th visible card of some opponent.
    Block { card: u8, x: i8, y: i8, moves: u8 },
    Skip,
    /// The n-th seated player leaves.
    Leave(u8),
}

impl Arbitrary for Action {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 20 {
            0..=7 => Action::Exchange(coordinate(g), coordinate(g), coordinate(g), coordinate(g)),
            8 => Action::Undo,
            9..=12 => Action::Claim {
                card: u8::arbitrary(g),
                x: coordinate(g),
                y: coordinate(g),
                moves: u8::arbitrary(g),
            },
            13..=15 => Action::Block {
                card: u8::arbitrary(g),
                x: coordinate(g),
                y: coordinate(g),
                moves: u8::arbitrary(g),
            },
            16..=18 => Action::Skip,
            _ => Action::Leave(u8::arbitrary(g)),
        }
    }
}
