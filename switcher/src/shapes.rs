mod catalog;
mod detect;
mod mask;

pub use catalog::*;
pub use detect::*;
pub use mask::*;
