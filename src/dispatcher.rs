use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{info, warn};
use tokio::sync::{Mutex, OnceCell};
use tokio::task::JoinHandle;

use crate::config::SystemConfig;
use crate::elevator::Elevator;
use crate::error::DispatchError;
use crate::strategies::nearest::NearestCar;
use crate::strategy::Strategy;
use crate::types::request::{Direction, FloorRequest};

#[derive(Debug)]
pub struct Fleet {
    elevators: Vec<Arc<Elevator>>,
    max_floors: u32,
}

impl Fleet {
    /// Counts below one are raised to one.
    pub fn new(num_elevators: usize, num_floors: u32, config: SystemConfig) -> Self {
        let elevators = (1..=num_elevators.max(1))
            .map(|number| Arc::new(Elevator::new(number, config)))
            .collect();
        Fleet {
            elevators,
            max_floors: num_floors.max(1),
        }
    }

    pub fn elevators(&self) -> &[Arc<Elevator>] {
        &self.elevators
    }

    pub fn len(&self) -> usize {
        self.elevators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevators.is_empty()
    }

    pub fn max_floors(&self) -> u32 {
        self.max_floors
    }
}

/// Fleet controller: assigns hallway calls and drives maintenance.
pub struct ElevatorSystem {
    fleet: OnceCell<Fleet>,
    rotation: Mutex<usize>,
    running: AtomicBool,
    handles: Mutex<Vec<JoinHandle<()>>>,
    strategy: Box<dyn Strategy>,
    config: SystemConfig,
}

impl ElevatorSystem {
    pub fn new(config: SystemConfig) -> Self {
        Self::with_strategy(config, NearestCar)
    }

    pub fn with_strategy<ST: Strategy>(config: SystemConfig, strategy: ST) -> Self {
        ElevatorSystem {
            fleet: OnceCell::new(),
            rotation: Mutex::new(0),
            running: AtomicBool::new(true),
            handles: Mutex::new(Vec::new()),
            strategy: Box::new(strategy),
            config,
        }
    }

    pub fn fleet(&self) -> Option<&Fleet> {
        self.fleet.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.fleet.initialized()
    }

    fn fleet_or_err(&self) -> Result<&Fleet, DispatchError> {
        self.fleet.get().ok_or(DispatchError::NotInitialized)
    }

    /// Builds the fleet and starts one control loop per car.
    pub async fn initialize(
        &self,
        num_elevators: usize,
        num_floors: u32,
    ) -> Result<(), DispatchError> {
        self.install(num_elevators, num_floors)?;
        self.start().await;
        Ok(())
    }

    pub fn install(&self, num_elevators: usize, num_floors: u32) -> Result<&Fleet, DispatchError> {
        let fleet = Fleet::new(num_elevators, num_floors, self.config);
        info!(
            "initializing {} elevators over {} floors",
            fleet.len(),
            fleet.max_floors()
        );
        self.fleet
            .set(fleet)
            .map_err(|_| DispatchError::AlreadyInitialized)?;
        self.fleet_or_err()
    }

    /// Spawns the control loops. Needs a tokio runtime.
    pub async fn start(&self) {
        let Some(fleet) = self.fleet.get() else {
            return;
        };
        let mut handles = self.handles.lock().await;
        if !handles.is_empty() {
            return;
        }
        for elevator in fleet.elevators() {
            handles.push(tokio::spawn(Arc::clone(elevator).run()));
        }
    }

    async fn rotate(&self, fleet: &Fleet) -> usize {
        let mut rotation = self.rotation.lock().await;
        let index = *rotation % fleet.len();
        *rotation = (index + 1) % fleet.len();
        index
    }

    /// Resolves a zero-based index. Anything out of range gets the
    /// round-robin pick instead.
    async fn resolve(&self, fleet: &Fleet, index: i64) -> usize {
        match usize::try_from(index) {
            Ok(index) if index < fleet.len() => index,
            _ => {
                let index_redirect = self.rotate(fleet).await;
                warn!("elevator index {index} out of range, using {index_redirect}");
                index_redirect
            }
        }
    }

    pub async fn elevator(&self, index: i64) -> Option<Arc<Elevator>> {
        let fleet = self.fleet.get()?;
        let index = self.resolve(fleet, index).await;
        Some(Arc::clone(&fleet.elevators()[index]))
    }

    pub async fn button_pressed(&self, index: i64, floor: u32) -> Result<bool, DispatchError> {
        let fleet = self.fleet_or_err()?;
        let index = self.resolve(fleet, index).await;
        Ok(fleet.elevators()[index].button_pressed(floor).await)
    }

    /// Hands a hallway call to the best car and returns its index. While the
    /// system runs, every call lands somewhere.
    pub async fn assign(&self, floor: u32, direction: Direction) -> Result<usize, DispatchError> {
        if !self.running.load(Ordering::SeqCst) {
            return Err(DispatchError::NotAccepting);
        }
        let fleet = self.fleet_or_err()?;
        let request = FloorRequest::new(floor, direction);

        let fallback = self.rotate(fleet).await;
        let selected = match self.strategy.select(fleet, &request).await {
            Some(index) => index,
            None => {
                warn!("no elevator scored [{request}], falling back to {fallback}");
                fallback
            }
        };

        fleet.elevators()[selected].enqueue(request).await;
        info!(
            "assigned [{request}] to elevator {}",
            fleet.elevators()[selected].number()
        );
        Ok(selected)
    }

    /// Sends a car to the ground floor and into maintenance. It keeps
    /// serving what it already has queued. Returns the index actually
    /// retired.
    pub async fn retire(&self, index: i64) -> Result<usize, DispatchError> {
        let fleet = self.fleet_or_err()?;
        let index = self.resolve(fleet, index).await;
        let elevator = &fleet.elevators()[index];

        elevator.button_pressed(0).await;
        elevator.set_maintenance(true);
        Ok(index)
    }

    /// Stops taking hallway calls and retires every car. Returns without
    /// waiting for the drain; poll `is_running` or await `wait_offline`.
    pub async fn shutdown(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("shutting down elevator system");
        }
        let Some(fleet) = self.fleet.get() else {
            return;
        };
        for index in 0..fleet.len() {
            if let Err(err) = self.retire(index as i64).await {
                warn!("failed to retire elevator {index}: {err}");
            }
        }
    }

    pub async fn is_running(&self) -> bool {
        let Some(fleet) = self.fleet.get() else {
            return self.running.load(Ordering::SeqCst);
        };
        for elevator in fleet.elevators() {
            if !elevator.is_offline().await {
                return true;
            }
        }
        false
    }

    pub async fn wait_offline(&self) -> anyhow::Result<()> {
        let handles = std::mem::take(&mut *self.handles.lock().await);
        for handle in handles {
            handle.await?;
        }
        Ok(())
    }

    pub async fn report_status(&self) -> String {
        let Some(fleet) = self.fleet.get() else {
            return "ElevatorSystem not initialized.\n".to_string();
        };
        let mut report = String::new();
        for elevator in fleet.elevators() {
            report.push_str(&elevator.report_status().await);
            report.push('\n');
        }
        report
    }
}
