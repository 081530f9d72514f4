use crate::registry::NetworkKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("catalog entry has an empty region name")]
    EmptyRegion,
    #[error("duplicate region '{0}' in catalog")]
    DuplicateRegion(String),
}

/// A lat/lon pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, CatalogError> {
        let coords = Self { lat, lon };
        coords.validate()?;
        Ok(coords)
    }

    /// Range check, applied again after deserializing untrusted catalog files.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !(-90.0..=90.0).contains(&self.lat) || !self.lat.is_finite() {
            return Err(CatalogError::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) || !self.lon.is_finite() {
            return Err(CatalogError::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }
}

/// A selectable place: the fixed name/coordinates pair a registration copies from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityEntry {
    pub region: String,
    pub coordinates: Coordinates,
}

/// The region catalog: the list of places a city data point can be registered
/// for, plus the selectable input options (network types, usage presets).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCatalog {
    pub cities: Vec<CityEntry>,
}

static NETWORK_OPTIONS: [NetworkKind; 2] = [NetworkKind::FourG, NetworkKind::FiveG];
static USAGE_PRESETS: [u64; 6] = [100, 500, 1000, 2500, 5000, 10000];

impl RegionCatalog {
    /// The built-in world-city list used when no catalog file is given.
    pub fn builtin() -> Self {
        let city = |region: &str, lat: f64, lon: f64| CityEntry {
            region: region.to_string(),
            coordinates: Coordinates { lat, lon },
        };

        Self {
            cities: vec![
                city("Tokyo", 35.68, 139.69),
                city("Delhi", 28.61, 77.21),
                city("Mumbai", 19.08, 72.88),
                city("Shanghai", 31.23, 121.47),
                city("Beijing", 39.90, 116.41),
                city("Seoul", 37.57, 126.98),
                city("Singapore", 1.35, 103.82),
                city("Sydney", -33.87, 151.21),
                city("Dubai", 25.20, 55.27),
                city("Moscow", 55.76, 37.62),
                city("London", 51.51, -0.13),
                city("Paris", 48.86, 2.35),
                city("Berlin", 52.52, 13.41),
                city("Cairo", 30.04, 31.24),
                city("Lagos", 6.52, 3.38),
                city("New York", 40.71, -74.01),
                city("Toronto", 43.65, -79.38),
                city("Los Angeles", 34.05, -118.24),
                city("Mexico City", 19.43, -99.13),
                city("Sao Paulo", -23.55, -46.63),
            ],
        }
    }

    /// Loads a catalog from a JSON file and validates every entry.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let catalog: Self =
            serde_json::from_str(&content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        catalog.validate()?;
        log::debug!("catalog loaded: {} cities", catalog.cities.len());
        Ok(catalog)
    }

    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for entry in &self.cities {
            if entry.region.trim().is_empty() {
                return Err(CatalogError::EmptyRegion);
            }
            entry.coordinates.validate()?;
            if !seen.insert(entry.region.as_str()) {
                return Err(CatalogError::DuplicateRegion(entry.region.clone()));
            }
        }
        Ok(())
    }

    /// Exact-name lookup. Case-sensitive on purpose: selection is made from
    /// the catalog's own list, not free-typed.
    pub fn lookup(&self, name: &str) -> Option<&CityEntry> {
        self.cities.iter().find(|c| c.region == name)
    }

    pub fn network_options(&self) -> &'static [NetworkKind] {
        &NETWORK_OPTIONS
    }

    pub fn usage_presets(&self) -> &'static [u64] {
        &USAGE_PRESETS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_exact_match() {
        let catalog = RegionCatalog::builtin();
        let tokyo = catalog.lookup("Tokyo").unwrap();
        assert_eq!(tokyo.region, "Tokyo");
        assert_eq!(tokyo.coordinates.lat, 35.68);
        assert_eq!(tokyo.coordinates.lon, 139.69);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let catalog = RegionCatalog::builtin();
        assert!(catalog.lookup("tokyo").is_none());
        assert!(catalog.lookup("Atlantis").is_none());
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(matches!(
            Coordinates::new(90.5, 0.0),
            Err(CatalogError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            Coordinates::new(0.0, -180.5),
            Err(CatalogError::LongitudeOutOfRange(_))
        ));
        assert!(matches!(
            Coordinates::new(f64::NAN, 0.0),
            Err(CatalogError::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn test_builtin_is_valid() {
        RegionCatalog::builtin().validate().unwrap();
    }

    #[test]
    fn test_duplicate_region_rejected() {
        let mut catalog = RegionCatalog::builtin();
        catalog.cities.push(CityEntry {
            region: "Tokyo".to_string(),
            coordinates: Coordinates { lat: 0.0, lon: 0.0 },
        });
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateRegion(name)) if name == "Tokyo"
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");

        let catalog = RegionCatalog::builtin();
        catalog.save_file(&path).unwrap();
        let loaded = RegionCatalog::load_file(&path).unwrap();

        assert_eq!(loaded.cities, catalog.cities);
    }

    #[test]
    fn test_load_rejects_bad_coordinates() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("catalog.json");
        let json = r#"{"cities":[{"region":"Nowhere","coordinates":{"lat":123.0,"lon":0.0}}]}"#;
        std::fs::write(&path, json).unwrap();

        assert!(matches!(
            RegionCatalog::load_file(&path),
            Err(CatalogError::LatitudeOutOfRange(_))
        ));
    }
}
