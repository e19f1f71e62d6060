pub mod config;
pub mod dispatcher;
pub mod elevator;
pub mod error;
pub mod queue;
pub mod strategy;

pub mod types {
    pub mod cmd;
    pub mod request;
}

pub mod strategies {
    pub mod nearest;
}

pub mod services {
    pub mod dispatch;
    pub mod parse;
    pub mod validate;
}

pub use config::SystemConfig;
pub use dispatcher::{ElevatorSystem, Fleet};
pub use elevator::{Elevator, Mode, Status};
pub use error::DispatchError;
pub use queue::DirectionalQueue;
pub use strategy::Strategy;
pub use types::cmd::Command;
pub use types::request::{Direction, FloorRequest};
