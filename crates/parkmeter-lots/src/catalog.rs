//! Lot Catalog
//!
//! Seeds the default lots into an empty store exactly once, then serves
//! id lookups from an in-memory cache and name-ordered listings from the
//! database.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use parkmeter_storage::Database;

use crate::error::LotError;
use crate::lot::ParkingLot;
use crate::Result;

pub struct LotCatalog {
    /// In-memory lot cache
    lots: Arc<RwLock<HashMap<String, ParkingLot>>>,
    /// Database for persistence
    db: Database,
}

impl LotCatalog {
    pub fn new(db: Database) -> Self {
        Self {
            lots: Arc::new(RwLock::new(HashMap::new())),
            db,
        }
    }

    /// Seed default lots if the store is empty, then load the cache.
    /// Idempotent across restarts.
    pub fn initialize(&self) -> Result<()> {
        let existing = self.load_all_lots()?;
        if !existing.is_empty() {
            tracing::debug!(lot_count = existing.len(), "Lot catalog already seeded");
            return Ok(());
        }

        let defaults = default_lots();
        self.db.transaction(|conn| {
            for lot in &defaults {
                conn.execute(
                    "INSERT INTO parking_lots
                     (id, name, image, car_rate_first_hour, car_rate_per_hour,
                      motorcycle_rate_first_hour, motorcycle_rate_per_hour)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    rusqlite::params![
                        lot.id,
                        lot.name,
                        lot.image,
                        lot.car_rate_first_hour,
                        lot.car_rate_per_hour,
                        lot.motorcycle_rate_first_hour,
                        lot.motorcycle_rate_per_hour,
                    ],
                )?;
            }
            Ok(())
        })?;

        {
            let mut cache = self.lots.write();
            for lot in &defaults {
                cache.insert(lot.id.clone(), lot.clone());
            }
        }

        tracing::info!(lot_count = defaults.len(), "Seeded default parking lots");

        Ok(())
    }

    /// All lots, ordered by name
    pub fn list(&self) -> Result<Vec<ParkingLot>> {
        self.load_all_lots()
    }

    /// Look up a lot by id
    pub fn get(&self, lot_id: &str) -> Result<ParkingLot> {
        if let Some(lot) = self.lots.read().get(lot_id) {
            return Ok(lot.clone());
        }

        // Cache miss; fall back to the store before reporting not-found
        self.load_all_lots()?;
        self.lots
            .read()
            .get(lot_id)
            .cloned()
            .ok_or_else(|| LotError::NotFound(lot_id.to_string()))
    }

    fn load_all_lots(&self) -> Result<Vec<ParkingLot>> {
        let lots: Vec<ParkingLot> = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, image, car_rate_first_hour, car_rate_per_hour,
                        motorcycle_rate_first_hour, motorcycle_rate_per_hour
                 FROM parking_lots ORDER BY name",
            )?;

            let lots: Vec<ParkingLot> = stmt
                .query_map([], |row| {
                    Ok(ParkingLot {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        image: row.get(2)?,
                        car_rate_first_hour: row.get(3)?,
                        car_rate_per_hour: row.get(4)?,
                        motorcycle_rate_first_hour: row.get(5)?,
                        motorcycle_rate_per_hour: row.get(6)?,
                    })
                })?
                .filter_map(|r| r.ok())
                .collect();

            Ok(lots)
        })?;

        {
            let mut cache = self.lots.write();
            for lot in &lots {
                cache.insert(lot.id.clone(), lot.clone());
            }
        }

        Ok(lots)
    }
}

impl Clone for LotCatalog {
    fn clone(&self) -> Self {
        Self {
            lots: Arc::clone(&self.lots),
            db: self.db.clone(),
        }
    }
}

/// The fixed seed list, inserted only into an empty store
fn default_lots() -> Vec<ParkingLot> {
    vec![
        ParkingLot::new("Green Office Park 1", "GOP1-park", 5000.0, 4000.0, 2000.0, 2000.0),
        ParkingLot::new("Green Office Park 5", "GOP5-park", 5000.0, 4000.0, 2000.0, 2000.0),
        ParkingLot::new("Green Office Park 6", "GOP6-park", 5000.0, 4000.0, 2000.0, 2000.0),
        ParkingLot::new("Green Office Park 9", "GOP9-park", 5000.0, 4000.0, 2000.0, 2000.0),
        ParkingLot::new("Sinarmas Land", "SML-park", 5000.0, 4000.0, 2000.0, 2000.0),
        ParkingLot::new("The Breeze Parking", "the-breeze-park", 5000.0, 5000.0, 3000.0, 2000.0),
        ParkingLot::new("Unilever Parking", "unilever-park", 5000.0, 4000.0, 2000.0, 2000.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_seeds_once() {
        let db = Database::open_in_memory().unwrap();
        let catalog = LotCatalog::new(db.clone());

        catalog.initialize().unwrap();
        let lots = catalog.list().unwrap();
        assert_eq!(lots.len(), 7);

        // Second initialize must not duplicate the seed list
        catalog.initialize().unwrap();
        assert_eq!(catalog.list().unwrap().len(), 7);
    }

    #[test]
    fn test_list_ordered_by_name() {
        let db = Database::open_in_memory().unwrap();
        let catalog = LotCatalog::new(db);
        catalog.initialize().unwrap();

        let names: Vec<String> = catalog.list().unwrap().into_iter().map(|l| l.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_get_unknown_lot() {
        let db = Database::open_in_memory().unwrap();
        let catalog = LotCatalog::new(db);
        catalog.initialize().unwrap();

        let err = catalog.get("no-such-lot").unwrap_err();
        assert!(matches!(err, LotError::NotFound(_)));
    }

    #[test]
    fn test_seed_survives_new_catalog_instance() {
        let db = Database::open_in_memory().unwrap();
        LotCatalog::new(db.clone()).initialize().unwrap();

        let catalog = LotCatalog::new(db);
        catalog.initialize().unwrap();

        let lots = catalog.list().unwrap();
        assert_eq!(lots.len(), 7);
        let breeze = lots.iter().find(|l| l.name == "The Breeze Parking").unwrap();
        assert_eq!(breeze.car_rate_per_hour, 5000.0);
    }
}
