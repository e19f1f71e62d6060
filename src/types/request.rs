use std::cmp::Ordering;
use std::convert::TryFrom;
use std::fmt;
use std::fmt::Display;

use crate::error::DispatchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

/// A stop an elevator has been asked to make: the floor plus the direction
/// the passenger wants to travel from it.
///
/// Requests order by a signed key (`-floor` for `Down`, `floor` for `Up`), so
/// every `Down` stop sorts before every `Up` stop. A forward scan over a
/// sorted set of requests is one full sweep: down from the highest floor,
/// then up from the lowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FloorRequest {
    floor: u32,
    direction: Direction,
}

impl FloorRequest {
    /// The ground floor has no down button, so floor 0 is always `Up`.
    pub fn new(floor: u32, direction: Direction) -> Self {
        let direction = if floor == 0 { Direction::Up } else { direction };
        FloorRequest { floor, direction }
    }

    pub fn floor(&self) -> u32 {
        self.floor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn key(&self) -> i64 {
        match self.direction {
            Direction::Up => i64::from(self.floor),
            Direction::Down => -i64::from(self.floor),
        }
    }
}

impl Default for FloorRequest {
    fn default() -> Self {
        FloorRequest::new(0, Direction::Up)
    }
}

impl Ord for FloorRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for FloorRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl TryFrom<(i64, Direction)> for FloorRequest {
    type Error = DispatchError;

    fn try_from((floor, direction): (i64, Direction)) -> Result<Self, Self::Error> {
        let floor = u32::try_from(floor).map_err(|_| DispatchError::InvalidRequest(floor))?;
        Ok(FloorRequest::new(floor, direction))
    }
}

impl Display for FloorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.direction, self.floor)
    }
}
