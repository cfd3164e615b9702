use switcher::{ErrorKind, GameId, IllegalAction, ParseError};

/// Error type for the operations of a [`GameHost`](crate::GameHost).
#[derive(Debug, PartialEq, Eq)]
pub enum HostError {
    GameNotFound { game: GameId },
    GameExists { game: GameId },
    Illegal(IllegalAction),
    Parse(ParseError),
}

impl HostError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HostError::GameNotFound { .. } => ErrorKind::NotFound,
            HostError::GameExists { .. } => ErrorKind::State,
            HostError::Illegal(err) => err.kind(),
            HostError::Parse(err) => err.kind(),
        }
    }
}

impl From<IllegalAction> for HostError {
    fn from(err: IllegalAction) -> Self {
        HostError::Illegal(err)
    }
}

impl From<ParseError> for HostError {
    fn from(err: ParseError) -> Self {
        HostError::Parse(err)
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::Illegal(err) => Some(err),
            HostError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostError::GameNotFound { game } => write!(f, "There is no game {}", game),
            HostError::GameExists { game } => write!(f, "Game {} already exists", game),
            HostError::Illegal(_) => write!(f, "Illegal action"),
            HostError::Parse(_) => write!(f, "Malformed input"),
        }
    }
}
