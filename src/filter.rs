use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use std::{env, fs};

use crate::entities::GeoPoint;
use crate::error::Error;
use crate::geo::{distance_km, Coordinates};

/// Key the selection blob is stored under, fixed for all sessions.
pub const STORAGE_KEY: &str = "driver-location-filter";

/// The only radii the filter UI offers; freeform radii are unsupported by
/// design.
pub const RADIUS_OPTIONS_KM: [f64; 6] = [25.0, 50.0, 100.0, 150.0, 200.0, 300.0];

/// The driver's single active search center. At most one per driver,
/// persisted indefinitely until explicitly cleared.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationFilterSelection {
    pub lat: f64,
    pub lng: f64,
    /// kilometers, one of [`RADIUS_OPTIONS_KM`]
    pub radius: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl LocationFilterSelection {
    pub fn center(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

/// Whether a point passes the active radius filter. Points without
/// coordinates always pass: a request with a bad geocode must not be hidden
/// from the driver.
pub fn within_filter(point: &GeoPoint, selection: &LocationFilterSelection) -> bool {
    match point.coordinates {
        None => true,
        Some(coordinates) => distance_km(selection.center(), coordinates) <= selection.radius,
    }
}

/// Persistence seam for the saved selection. Injected into
/// [`LocationFilter`] rather than read ambiently.
pub trait FilterStore: Send + Sync {
    fn load(&self) -> Result<Option<LocationFilterSelection>, Error>;
    fn save(&self, selection: &LocationFilterSelection) -> Result<(), Error>;
    fn clear(&self) -> Result<(), Error>;
}

/// File-backed store, one JSON blob named after [`STORAGE_KEY`]. No schema
/// versioning; a blob that no longer parses counts as no selection.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(format!("{}.json", STORAGE_KEY)),
        }
    }

    pub fn from_env() -> Result<Self, Error> {
        let dir = env::var("FILTER_STORE_PATH").unwrap_or_else(|_| ".".into());
        Ok(Self::new(dir))
    }
}

impl FilterStore for JsonFileStore {
    fn load(&self) -> Result<Option<LocationFilterSelection>, Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(selection) => Ok(Some(selection)),
            Err(err) => {
                tracing::warn!("discarding unreadable filter blob: {}", err);
                Ok(None)
            }
        }
    }

    fn save(&self, selection: &LocationFilterSelection) -> Result<(), Error> {
        fs::write(&self.path, serde_json::to_string(selection)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for sessions without persistence (and for tests).
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<LocationFilterSelection>>,
}

impl FilterStore for MemoryStore {
    fn load(&self) -> Result<Option<LocationFilterSelection>, Error> {
        Ok(self.slot.lock().unwrap_or_else(|p| p.into_inner()).clone())
    }

    fn save(&self, selection: &LocationFilterSelection) -> Result<(), Error> {
        *self.slot.lock().unwrap_or_else(|p| p.into_inner()) = Some(selection.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        *self.slot.lock().unwrap_or_else(|p| p.into_inner()) = None;
        Ok(())
    }
}

/// Holds the active selection, kept in step with the injected store.
/// Construction eagerly loads any persisted selection so filtering takes
/// effect before the first user interaction.
pub struct LocationFilter {
    selection: Option<LocationFilterSelection>,
    store: Box<dyn FilterStore>,
}

impl LocationFilter {
    pub fn load(store: Box<dyn FilterStore>) -> Result<Self, Error> {
        let selection = store.load()?;
        Ok(Self { selection, store })
    }

    pub fn current(&self) -> Option<&LocationFilterSelection> {
        self.selection.as_ref()
    }

    /// Overwrites any prior selection; this is a single slot, not a history.
    pub fn save(&mut self, selection: LocationFilterSelection) -> Result<(), Error> {
        self.store.save(&selection)?;
        self.selection = Some(selection);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        self.store.clear()?;
        self.selection = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(radius: f64) -> LocationFilterSelection {
        // Warsaw
        LocationFilterSelection {
            lat: 52.2297,
            lng: 21.0122,
            radius,
            address: Some("Warszawa".into()),
        }
    }

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new("".into(), "".into(), Some(Coordinates::new(lat, lng)))
    }

    #[test]
    fn points_without_coordinates_always_pass() {
        let unfilterable = GeoPoint::new("Lublin".into(), "".into(), None);
        assert!(within_filter(&unfilterable, &selection(25.0)));
    }

    #[test]
    fn boundary_is_inclusive() {
        let krakow = point(50.0647, 19.9450);
        let d = distance_km(selection(0.0).center(), Coordinates::new(50.0647, 19.9450));

        // exactly at the radius is in, a sliver past it is out
        assert!(within_filter(&krakow, &selection(d)));
        assert!(!within_filter(&krakow, &selection(d - 0.001)));
    }

    #[test]
    fn nearby_point_within_small_radius() {
        let praga = point(52.2551, 21.0352);
        assert!(within_filter(&praga, &selection(25.0)));
    }

    #[test]
    fn far_point_outside_radius() {
        let krakow = point(50.0647, 19.9450);
        assert!(!within_filter(&krakow, &selection(100.0)));
    }

    #[test]
    fn selection_survives_reload() {
        let dir = std::env::temp_dir().join(format!("carrus-filter-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut filter = LocationFilter::load(Box::new(JsonFileStore::new(&dir))).unwrap();
        assert_eq!(filter.current(), None);

        filter.save(selection(100.0)).unwrap();

        // a fresh instance picks the saved selection up eagerly
        let reloaded = LocationFilter::load(Box::new(JsonFileStore::new(&dir))).unwrap();
        assert_eq!(reloaded.current(), Some(&selection(100.0)));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn clear_removes_the_persisted_slot() {
        let dir = std::env::temp_dir().join(format!("carrus-filter-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut filter = LocationFilter::load(Box::new(JsonFileStore::new(&dir))).unwrap();
        filter.save(selection(50.0)).unwrap();
        filter.clear().unwrap();
        assert_eq!(filter.current(), None);

        let reloaded = LocationFilter::load(Box::new(JsonFileStore::new(&dir))).unwrap();
        assert_eq!(reloaded.current(), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_overwrites_the_single_slot() {
        let mut filter = LocationFilter::load(Box::<MemoryStore>::default()).unwrap();
        filter.save(selection(50.0)).unwrap();
        filter.save(selection(300.0)).unwrap();

        assert_eq!(filter.current().unwrap().radius, 300.0);
    }

    #[test]
    fn corrupt_blob_counts_as_no_selection() {
        let dir = std::env::temp_dir().join(format!("carrus-filter-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();

        let store = JsonFileStore::new(&dir);
        std::fs::write(dir.join(format!("{}.json", STORAGE_KEY)), "not json").unwrap();

        assert_eq!(store.load().unwrap(), None);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
