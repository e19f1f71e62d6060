use std::pin::Pin;
use std::sync::Arc;
use std::task::Poll;
use tower::filter::Filter;
use tower::{Service, ServiceBuilder};

use crate::dispatcher::ElevatorSystem;
use crate::services::parse::{ParseLayer, ParseService};
use crate::services::validate::CommandBounds;
use crate::types::cmd::Command;

const OK: &str = "OK";

/// Executes commands against the fleet and answers with a reply line.
#[derive(Clone)]
pub struct DispatchService {
    system: Arc<ElevatorSystem>,
}

impl DispatchService {
    pub fn new(system: Arc<ElevatorSystem>) -> Self {
        DispatchService { system }
    }
}

impl Service<Command> for DispatchService {
    type Response = String;
    type Error = anyhow::Error;
    type Future = Pin<Box<dyn Future<Output = Result<String, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, command: Command) -> Self::Future {
        let system = Arc::clone(&self.system);
        Box::pin(async move {
            match command {
                Command::Initialize { elevators, floors } => {
                    system.initialize(elevators as usize, floors).await?;
                }
                Command::Press { elevator, floors } => {
                    // Elevators are numbered from 1 on the command line.
                    let index = i64::from(elevator) - 1;
                    for floor in floors.into_iter().flatten() {
                        if !system.button_pressed(index, floor).await? {
                            log::debug!("elevator {elevator} ignored floor {floor}");
                        }
                    }
                }
                Command::Call { floor, direction } => {
                    system.assign(floor, direction).await?;
                }
                Command::Retire(elevator) => {
                    system.retire(i64::from(elevator) - 1).await?;
                }
                Command::Status => return Ok(system.report_status().await),
                Command::Quit => system.shutdown().await,
            }
            Ok(OK.to_string())
        })
    }
}

pub type CommandService = ParseService<Filter<DispatchService, CommandBounds>>;

/// Line in, reply out: parse, bounds check, dispatch.
pub fn command_service(system: Arc<ElevatorSystem>) -> CommandService {
    ServiceBuilder::new()
        .layer(ParseLayer)
        .filter(CommandBounds::new(Arc::clone(&system)))
        .service(DispatchService::new(system))
}
