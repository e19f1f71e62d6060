use async_trait::async_trait;
use log::debug;

use crate::dispatcher::Fleet;
use crate::strategy::Strategy;
use crate::types::request::FloorRequest;

/// Sends each call to the car with the lowest `request_distance`. Cars in
/// maintenance are skipped. On a tie the lowest index wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestCar;

#[async_trait]
impl Strategy for NearestCar {
    async fn select(&self, fleet: &Fleet, request: &FloorRequest) -> Option<usize> {
        // No distance ever reaches twice the building height.
        let mut best = i64::from(fleet.max_floors()) * 2;
        let mut selected = None;

        for (index, elevator) in fleet.elevators().iter().enumerate() {
            if elevator.is_in_maintenance() {
                continue;
            }
            let Some(distance) = elevator.request_distance(request).await else {
                continue;
            };
            debug!("elevator {} is {distance} from [{request}]", elevator.number());
            if distance < best {
                best = distance;
                selected = Some(index);
            }
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;
    use crate::types::request::Direction;

    async fn park(fleet: &Fleet, index: usize, floor: u32) {
        let elevator = &fleet.elevators()[index];
        assert!(elevator.button_pressed(floor).await);
        elevator.queue().lock().await.advance();
    }

    #[tokio::test]
    async fn picks_the_closest_car() {
        let fleet = Fleet::new(3, 10, SystemConfig::default());
        park(&fleet, 1, 9).await;
        park(&fleet, 2, 4).await;

        let request = FloorRequest::new(6, Direction::Down);
        assert_eq!(NearestCar.select(&fleet, &request).await, Some(2));
    }

    #[tokio::test]
    async fn first_minimum_wins_ties() {
        let fleet = Fleet::new(3, 10, SystemConfig::default());
        let request = FloorRequest::new(5, Direction::Up);
        assert_eq!(NearestCar.select(&fleet, &request).await, Some(0));
    }

    #[tokio::test]
    async fn skips_cars_in_maintenance() {
        let fleet = Fleet::new(2, 10, SystemConfig::default());
        fleet.elevators()[0].set_maintenance(true);
        let request = FloorRequest::new(1, Direction::Up);
        assert_eq!(NearestCar.select(&fleet, &request).await, Some(1));

        fleet.elevators()[1].set_maintenance(true);
        assert_eq!(NearestCar.select(&fleet, &request).await, None);
    }
}
