//! ParkMeter Lot Catalog
//!
//! Parking lot definitions with vehicle-category pricing. Lots are seeded
//! once into an empty store and immutable afterwards; sessions reference
//! them by id and denormalize the name at creation time.

mod catalog;
mod error;
mod lot;
mod vehicle;

pub use catalog::LotCatalog;
pub use error::LotError;
pub use lot::ParkingLot;
pub use vehicle::VehicleType;

pub type Result<T> = std::result::Result<T, LotError>;
