use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Display;
use std::ops::Bound;

use log::debug;

use crate::types::request::{Direction, FloorRequest};

/// Pending stops of one elevator, kept in sweep order.
///
/// The traversal cursor is a bound on `pending` rather than an iterator, so
/// inserting while the car is between stops never invalidates it. When the
/// cursor runs off the end it wraps to the first pending stop. Since `Down`
/// stops sort before `Up` stops, the wrap starts the opposite sweep.
#[derive(Debug)]
pub struct DirectionalQueue {
    pending: BTreeSet<FloorRequest>,
    servicing: FloorRequest,
    cursor: Bound<FloorRequest>,
}

impl Default for DirectionalQueue {
    fn default() -> Self {
        DirectionalQueue {
            pending: BTreeSet::new(),
            servicing: FloorRequest::default(),
            cursor: Bound::Unbounded,
        }
    }
}

impl DirectionalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn servicing(&self) -> FloorRequest {
        self.servicing
    }

    pub fn current_floor(&self) -> u32 {
        self.servicing.floor()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn contains(&self, request: &FloorRequest) -> bool {
        self.pending.contains(request)
    }

    /// Adds a stop. Returns `false` if the same floor and direction was
    /// already queued, in which case the cursor is left alone.
    pub fn insert(&mut self, request: FloorRequest) -> bool {
        let was_empty = self.pending.is_empty();
        if !self.pending.insert(request) {
            return false;
        }
        debug!("adding [{request}]");

        // Resume from the current position so stops already passed this
        // sweep wait for the return leg.
        self.cursor = if was_empty {
            Bound::Unbounded
        } else {
            Bound::Included(self.servicing)
        };
        true
    }

    /// Moves to the next stop, wrapping to the start of the sweep when the
    /// cursor is exhausted. Returns the stop now being serviced, or `None`
    /// if nothing is pending.
    pub fn advance(&mut self) -> Option<FloorRequest> {
        let next = match self.after_cursor() {
            Some(next) => next,
            None => {
                self.cursor = Bound::Unbounded;
                *self.pending.first()?
            }
        };
        self.pending.remove(&next);
        self.servicing = next;
        self.cursor = Bound::Excluded(next);
        Some(next)
    }

    fn after_cursor(&self) -> Option<FloorRequest> {
        self.pending
            .range((self.cursor, Bound::Unbounded))
            .next()
            .copied()
    }

    pub fn next_floor(&self) -> Option<u32> {
        self.pending
            .range((Bound::Excluded(self.servicing), Bound::Unbounded))
            .next()
            .or_else(|| self.pending.first())
            .map(FloorRequest::floor)
    }

    pub fn lowest_floor(&self) -> u32 {
        self.pending
            .iter()
            .map(FloorRequest::floor)
            .min()
            .unwrap_or(self.servicing.floor())
    }

    pub fn highest_floor(&self) -> u32 {
        self.pending
            .iter()
            .map(FloorRequest::floor)
            .max()
            .unwrap_or(self.servicing.floor())
    }

    /// Estimated floors of travel before the car would naturally stop for
    /// `request`.
    ///
    /// An idle car goes straight there. A car already heading the same way
    /// and not yet past the floor picks it up on this sweep. Anything else
    /// waits until the car reaches the end of its current sweep and turns
    /// back. A car that already has the exact stop queued scores one less,
    /// so the dispatcher prefers cars that are committed to it.
    ///
    /// The result only drops below zero when the car is sitting on a stop
    /// that is also queued for its next sweep.
    pub fn distance_to(&self, request: &FloorRequest) -> i64 {
        let here = self.servicing.floor();
        let there = request.floor();

        if self.pending.is_empty() {
            return i64::from(here.abs_diff(there));
        }

        let ahead = request.direction() == self.servicing.direction()
            && match self.servicing.direction() {
                Direction::Up => here < there,
                Direction::Down => here > there,
            };

        let mut distance = if ahead {
            i64::from(here.abs_diff(there))
        } else {
            let extreme = match self.servicing.direction() {
                Direction::Down => self.lowest_floor(),
                Direction::Up => self.highest_floor(),
            };
            i64::from(extreme.abs_diff(there)) + i64::from(here.abs_diff(extreme))
        };

        if self.pending.contains(request) {
            distance -= 1;
        }
        distance
    }

    /// Pending stops grouped by runs of the same direction, e.g.
    /// `[ DOWN: 5, 3 UP: 4, 7 ]`.
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl Display for DirectionalQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pending.is_empty() {
            return write!(f, "[ ]");
        }
        write!(f, "[")?;
        let mut last: Option<Direction> = None;
        for request in &self.pending {
            if last == Some(request.direction()) {
                write!(f, ",")?;
            } else {
                write!(f, " {}:", request.direction())?;
                last = Some(request.direction());
            }
            write!(f, " {}", request.floor())?;
        }
        write!(f, " ]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn up(floor: u32) -> FloorRequest {
        FloorRequest::new(floor, Direction::Up)
    }

    fn down(floor: u32) -> FloorRequest {
        FloorRequest::new(floor, Direction::Down)
    }

    fn park_at(queue: &mut DirectionalQueue, request: FloorRequest) {
        queue.insert(request);
        while queue.servicing() != request {
            queue.advance();
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn starts_at_ground_floor_going_up() {
        let queue = DirectionalQueue::new();
        assert_eq!(queue.servicing(), up(0));
        assert!(queue.is_empty());
        assert_eq!(queue.next_floor(), None);
        assert_eq!(queue.report(), "[ ]");
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let mut queue = DirectionalQueue::new();
        assert!(queue.insert(up(4)));
        assert!(queue.insert(down(4)));
        assert!(!queue.insert(up(4)));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn advance_on_empty_queue_is_a_no_op() {
        let mut queue = DirectionalQueue::new();
        assert_eq!(queue.advance(), None);
        assert_eq!(queue.servicing(), up(0));
    }

    #[test]
    fn finishes_up_sweep_then_wraps_to_down_stops() {
        let mut queue = DirectionalQueue::new();
        for request in [up(7), down(2), up(3), down(6)] {
            queue.insert(request);
        }
        let visited: Vec<_> = std::iter::from_fn(|| queue.advance()).collect();
        assert_eq!(visited, vec![up(3), up(7), down(6), down(2)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn stops_behind_the_car_wait_for_the_wrap() {
        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, up(5));

        queue.insert(up(7));
        queue.insert(up(2));
        queue.insert(up(9));

        assert_eq!(queue.advance(), Some(up(7)));
        assert_eq!(queue.advance(), Some(up(9)));
        // Cursor exhausted: wrap to the lowest remaining stop.
        assert_eq!(queue.advance(), Some(up(2)));
        assert_eq!(queue.advance(), None);
        assert_eq!(queue.servicing(), up(2));
    }

    #[test]
    fn insert_mid_sweep_is_picked_up_ahead_of_the_car() {
        let mut queue = DirectionalQueue::new();
        queue.insert(up(3));
        queue.insert(up(8));
        assert_eq!(queue.advance(), Some(up(3)));

        queue.insert(up(5));
        assert_eq!(queue.next_floor(), Some(5));
        assert_eq!(queue.advance(), Some(up(5)));
        assert_eq!(queue.advance(), Some(up(8)));
    }

    #[test]
    fn next_floor_wraps_to_first_pending() {
        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, up(6));
        queue.insert(down(4));
        assert_eq!(queue.next_floor(), Some(4));
        queue.insert(up(8));
        assert_eq!(queue.next_floor(), Some(8));
    }

    #[test]
    fn extremes_fall_back_to_current_floor() {
        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, up(4));
        assert_eq!(queue.lowest_floor(), 4);
        assert_eq!(queue.highest_floor(), 4);

        queue.insert(down(2));
        queue.insert(up(9));
        queue.insert(down(7));
        assert_eq!(queue.lowest_floor(), 2);
        assert_eq!(queue.highest_floor(), 9);
    }

    #[test]
    fn idle_distance_is_plain_floor_difference() {
        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, up(6));
        for floor in 0..12 {
            assert_eq!(queue.distance_to(&up(floor)), i64::from(floor.abs_diff(6)));
            assert_eq!(queue.distance_to(&down(floor)), i64::from(floor.abs_diff(6)));
        }
    }

    #[test]
    fn request_ahead_in_same_direction_is_direct() {
        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, up(5));
        queue.insert(up(9));
        assert_eq!(queue.distance_to(&up(7)), 2);

        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, down(8));
        queue.insert(down(1));
        assert_eq!(queue.distance_to(&down(3)), 5);
    }

    #[test]
    fn opposite_request_finishes_sweep_first() {
        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, up(5));
        queue.insert(up(7));
        assert_eq!(queue.distance_to(&down(3)), (7 - 3) + (7 - 5));
    }

    #[test]
    fn request_behind_going_down_turns_at_lowest_stop() {
        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, down(6));
        queue.insert(down(2));
        // Up call at 4: ride down to 2, then back up to 4.
        assert_eq!(queue.distance_to(&up(4)), (4 - 2) + (6 - 2));
    }

    #[test]
    fn already_queued_stop_scores_one_less() {
        let mut queue = DirectionalQueue::new();
        park_at(&mut queue, up(2));
        queue.insert(up(9));
        assert_eq!(queue.distance_to(&up(6)), 4);
        queue.insert(up(6));
        assert_eq!(queue.distance_to(&up(6)), 3);
    }

    #[test]
    fn report_groups_runs_by_direction() {
        let mut queue = DirectionalQueue::new();
        for request in [up(7), down(3), up(4), down(5)] {
            queue.insert(request);
        }
        assert_eq!(queue.report(), "[ DOWN: 5, 3 UP: 4, 7 ]");

        let mut queue = DirectionalQueue::new();
        queue.insert(up(2));
        assert_eq!(queue.report(), "[ UP: 2 ]");
    }
}
