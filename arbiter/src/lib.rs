mod config;
mod error;
mod events;
mod host;
mod protocol;
mod timer;
pub use config::*;
pub use error::*;
pub use events::*;
pub use host::*;
pub use protocol::*;
pub use timer::*;
