use std::fmt;
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use log::{debug, info};
use tokio::sync::Mutex;

use crate::config::SystemConfig;
use crate::queue::DirectionalQueue;
use crate::types::request::{Direction, FloorRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Waiting,
    Moving,
    Offline,
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Waiting => write!(f, "waiting."),
            Status::Moving => write!(f, "moving."),
            Status::Offline => write!(f, "offline."),
        }
    }
}

/// One car. The queue is only touched under its mutex, and only for as long
/// as a single queue operation takes, so callers never wait on a door.
#[derive(Debug)]
pub struct Elevator {
    number: usize,
    queue: Mutex<DirectionalQueue>,
    traversed_floors: AtomicU64,
    request_count: AtomicU64,
    maintenance: AtomicBool,
    moving: AtomicBool,
    config: SystemConfig,
}

impl Elevator {
    pub fn new(number: usize, config: SystemConfig) -> Self {
        Elevator {
            number,
            queue: Mutex::new(DirectionalQueue::new()),
            traversed_floors: AtomicU64::new(0),
            request_count: AtomicU64::new(0),
            maintenance: AtomicBool::new(false),
            moving: AtomicBool::new(false),
            config,
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn queue(&self) -> &Mutex<DirectionalQueue> {
        &self.queue
    }

    pub fn mode(&self) -> Mode {
        if self.is_in_maintenance() {
            Mode::Maintenance
        } else {
            Mode::Normal
        }
    }

    pub fn is_in_maintenance(&self) -> bool {
        self.maintenance.load(Ordering::SeqCst)
    }

    /// Stops the car from accepting new presses. Stops already queued are
    /// still served.
    pub fn set_maintenance(&self, maintenance: bool) {
        let previous = self.maintenance.swap(maintenance, Ordering::SeqCst);
        if previous != maintenance {
            info!("elevator {} maintenance set to {maintenance}", self.number);
        }
    }

    pub fn is_moving(&self) -> bool {
        self.moving.load(Ordering::SeqCst)
    }

    pub fn traversed_floors(&self) -> u64 {
        self.traversed_floors.load(Ordering::SeqCst)
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    pub async fn current_floor(&self) -> u32 {
        self.queue.lock().await.current_floor()
    }

    pub async fn is_offline(&self) -> bool {
        let queue = self.queue.lock().await;
        self.offline_with(&queue)
    }

    fn offline_with(&self, queue: &DirectionalQueue) -> bool {
        self.is_in_maintenance() && queue.is_empty() && queue.current_floor() == 0
    }

    /// An in-cab floor button. Returns `false` when the press is ignored:
    /// the car is in maintenance or already at that floor.
    pub async fn button_pressed(&self, floor: u32) -> bool {
        if self.is_in_maintenance() {
            return false;
        }
        let mut queue = self.queue.lock().await;
        let current = queue.current_floor();
        if current == floor {
            return false;
        }
        self.request_count.fetch_add(1, Ordering::SeqCst);

        let direction = if current > floor {
            Direction::Down
        } else {
            Direction::Up
        };
        queue.insert(FloorRequest::new(floor, direction));
        true
    }

    pub async fn enqueue(&self, request: FloorRequest) -> bool {
        self.queue.lock().await.insert(request)
    }

    pub async fn request_distance(&self, request: &FloorRequest) -> Option<i64> {
        if self.is_in_maintenance() {
            return None;
        }
        Some(self.queue.lock().await.distance_to(request))
    }

    pub async fn next_floor(&self) -> Option<u32> {
        if self.is_in_maintenance() {
            return None;
        }
        self.queue.lock().await.next_floor()
    }

    pub async fn run(self: Arc<Self>) {
        info!("elevator {} online", self.number);
        // Doors open at the ground floor until the first request arrives.
        self.stop_and_open_doors(0).await;
        while !self.is_offline().await {
            self.advance_one_stop().await;
        }
        self.moving.store(false, Ordering::SeqCst);
        info!("elevator {} offline", self.number);
    }

    pub async fn advance_one_stop(&self) {
        self.traversed_floors.fetch_add(1, Ordering::SeqCst);
        let stop = self.queue.lock().await.advance();
        if let Some(stop) = stop {
            debug!("elevator {} arrived at [{stop}]", self.number);
        }
        self.stop_and_open_doors(0).await;
    }

    /// Holds the doors open for `wait_ticks` (the configured dwell when 0),
    /// and for as long as nothing is queued. Returns the ticks waited.
    ///
    /// An empty car with nobody pressing a button waits here indefinitely.
    pub async fn stop_and_open_doors(&self, wait_ticks: u32) -> u32 {
        let wait_ticks = if wait_ticks == 0 {
            self.config.door_dwell_ticks
        } else {
            wait_ticks
        };
        self.moving.store(false, Ordering::SeqCst);

        let mut elapsed = 0;
        loop {
            let (empty, offline) = {
                let mut queue = self.queue.lock().await;
                self.home_if_draining(&mut queue);
                (queue.is_empty(), self.offline_with(&queue))
            };
            if offline || !(empty || elapsed < wait_ticks) {
                break;
            }
            tokio::time::sleep(self.config.tick).await;
            elapsed += 1;
        }

        self.moving.store(true, Ordering::SeqCst);
        elapsed
    }

    /// A draining car that runs out of stops away from the ground floor
    /// sends itself home, so the drain always ends offline.
    fn home_if_draining(&self, queue: &mut DirectionalQueue) {
        if self.is_in_maintenance() && queue.is_empty() && queue.current_floor() != 0 {
            debug!("elevator {} drained, returning to ground floor", self.number);
            queue.insert(FloorRequest::new(0, Direction::Up));
        }
    }

    pub async fn status(&self) -> Status {
        if self.is_offline().await {
            Status::Offline
        } else if self.is_moving() {
            Status::Moving
        } else {
            Status::Waiting
        }
    }

    /// e.g. `ELEVATOR[ 2] at floor   7 moving. QUEUE [ DOWN: 3 ]`
    pub async fn report_status(&self) -> String {
        let status = self.status().await;
        let queue = self.queue.lock().await;
        format!(
            "ELEVATOR[{:2}] at floor {:3} {status} QUEUE {queue}",
            self.number,
            queue.current_floor()
        )
    }
}
