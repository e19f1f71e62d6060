use std::sync::Arc;
use tower::BoxError;
use tower::filter::Predicate;

use crate::dispatcher::ElevatorSystem;
use crate::types::cmd::Command;

pub const MAX_FLEET_SIZE: u32 = 64;
pub const MAX_BUILDING_FLOORS: u32 = 1024;

/// Rejects oversized buildings and floors the initialized building does
/// not have. Elevator numbers are not checked here; the
/// dispatcher redirects out-of-range ones.
#[derive(Clone)]
pub struct CommandBounds {
    system: Arc<ElevatorSystem>,
}

impl CommandBounds {
    pub fn new(system: Arc<ElevatorSystem>) -> Self {
        CommandBounds { system }
    }
}

impl Predicate<Command> for CommandBounds {
    type Request = Command;

    fn check(&mut self, command: Command) -> Result<Self::Request, BoxError> {
        if let Command::Initialize { elevators, floors } = command {
            if elevators > MAX_FLEET_SIZE || floors > MAX_BUILDING_FLOORS {
                log::warn!("invalid command {command}: building too large");
                return Err(BoxError::from(format!(
                    "at most {MAX_FLEET_SIZE} elevators over {MAX_BUILDING_FLOORS} floors"
                )));
            }
            return Ok(command);
        }

        let Some(fleet) = self.system.fleet() else {
            return Ok(command);
        };
        match command.highest_floor() {
            Some(floor) if floor >= fleet.max_floors() => {
                log::warn!("invalid command {command}: floor {floor} out of range");
                Err(BoxError::from(format!(
                    "floor {floor} outside 0..{}",
                    fleet.max_floors()
                )))
            }
            _ => Ok(command),
        }
    }
}
