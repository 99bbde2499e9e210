//! Parking lot data structure

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::vehicle::VehicleType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingLot {
    /// Unique identifier
    pub id: String,
    /// Human-readable name, unique across the catalog
    pub name: String,
    /// Display image reference
    pub image: String,
    /// Rate for the first billable hour, car
    pub car_rate_first_hour: f64,
    /// Rate per subsequent hour, car
    pub car_rate_per_hour: f64,
    /// Rate for the first billable hour, motorcycle
    pub motorcycle_rate_first_hour: f64,
    /// Rate per subsequent hour, motorcycle
    pub motorcycle_rate_per_hour: f64,
}

impl ParkingLot {
    pub fn new(
        name: impl Into<String>,
        image: impl Into<String>,
        car_rate_first_hour: f64,
        car_rate_per_hour: f64,
        motorcycle_rate_first_hour: f64,
        motorcycle_rate_per_hour: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            image: image.into(),
            car_rate_first_hour,
            car_rate_per_hour,
            motorcycle_rate_first_hour,
            motorcycle_rate_per_hour,
        }
    }

    /// Rate pair (first hour, per subsequent hour) for a vehicle category
    pub fn rates_for(&self, vehicle: VehicleType) -> (f64, f64) {
        match vehicle {
            VehicleType::Car => (self.car_rate_first_hour, self.car_rate_per_hour),
            VehicleType::Motorcycle => (
                self.motorcycle_rate_first_hour,
                self.motorcycle_rate_per_hour,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_for_vehicle() {
        let lot = ParkingLot::new("The Breeze Parking", "the-breeze-park", 5000.0, 5000.0, 3000.0, 2000.0);

        assert_eq!(lot.rates_for(VehicleType::Car), (5000.0, 5000.0));
        assert_eq!(lot.rates_for(VehicleType::Motorcycle), (3000.0, 2000.0));
    }

    #[test]
    fn test_new_lot_gets_unique_id() {
        let a = ParkingLot::new("A", "a-park", 1.0, 1.0, 1.0, 1.0);
        let b = ParkingLot::new("B", "b-park", 1.0, 1.0, 1.0, 1.0);
        assert_ne!(a.id, b.id);
    }
}
