use std::fmt;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A floor below the ground floor.
    InvalidRequest(i64),
    /// The fleet has been shut down and takes no more hallway calls.
    NotAccepting,
    NotInitialized,
    AlreadyInitialized,
}

impl Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidRequest(floor) => write!(f, "invalid floor request: {floor}"),
            DispatchError::NotAccepting => write!(f, "elevator system is shut down"),
            DispatchError::NotInitialized => write!(f, "elevator system not initialized"),
            DispatchError::AlreadyInitialized => write!(f, "elevator system already initialized"),
        }
    }
}

impl std::error::Error for DispatchError {}
