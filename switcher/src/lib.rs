pub use board::*;
pub use cards::*;
pub use economy::*;
pub use errors::*;
pub use game::*;
pub use player_state::*;
pub use protocol_types::*;
pub use ring::*;
pub use shapes::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod bitset;
mod board;
mod cards;
mod economy;
mod errors;
mod game;
mod player_state;
mod protocol_types;
mod ring;
mod shapes;
mod visualization;

pub type GameId = u32;
pub type PlayerId = u32;
pub type FigureCardId = u32;
