use crate::catalog::{Coordinates, RegionCatalog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("region '{0}' is not in the catalog")]
    UnknownRegion(String),
    #[error("'{0}' is not a valid usage value (expected a non-negative integer)")]
    InvalidUsage(String),
    #[error("seed dataset contains duplicate record id {0}")]
    DuplicateId(u32),
    #[error("'{0}' is not a known network type")]
    UnknownNetwork(String),
}

/// Network generation offered by the registration form.
///
/// Stored as a plain string on the record (the registry does not enforce the
/// enumeration); the catalog hands this out as the selectable options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkKind {
    #[serde(rename = "4G")]
    FourG,
    #[serde(rename = "5G")]
    FiveG,
}

impl NetworkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkKind::FourG => "4G",
            NetworkKind::FiveG => "5G",
        }
    }
}

impl std::fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NetworkKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "4G" => Ok(NetworkKind::FourG),
            "5G" => Ok(NetworkKind::FiveG),
            other => Err(RegistryError::UnknownNetwork(other.to_string())),
        }
    }
}

/// One city data point on the map. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: u32,
    pub region: String,
    pub coordinates: Coordinates,
    pub usage: u64,
    pub network: String,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

/// Owns the session's ordered city records. Append-only: records are created
/// via [`register_city`](UsageRegistry::register_city), never mutated or
/// removed, and insertion order is the only ordering guarantee.
pub struct UsageRegistry {
    records: Vec<UsageRecord>,
    next_id: u32,
    busy_tx: watch::Sender<bool>,
    round_trip: Duration,
}

/// Matches the original service's simulated round-trip.
const DEFAULT_ROUND_TRIP: Duration = Duration::from_millis(1000);

impl UsageRegistry {
    /// Creates a registry seeded with an initial dataset. The id counter
    /// starts at max(existing id) + 1 so ids are never reused, even if the
    /// seed has gaps.
    pub fn new(seed: Vec<UsageRecord>) -> Result<Self, RegistryError> {
        let mut seen = std::collections::HashSet::new();
        for record in &seed {
            if !seen.insert(record.id) {
                return Err(RegistryError::DuplicateId(record.id));
            }
        }
        let next_id = seed.iter().map(|r| r.id).max().map_or(1, |max| max + 1);

        let (busy_tx, _) = watch::channel(false);
        Ok(Self {
            records: seed,
            next_id,
            busy_tx,
            round_trip: DEFAULT_ROUND_TRIP,
        })
    }

    pub fn with_round_trip(mut self, round_trip: Duration) -> Self {
        self.round_trip = round_trip;
        self
    }

    /// Read accessor for the presentation layer. Callers never mutate the
    /// collection directly.
    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    /// True while a registration round-trip is in flight.
    ///
    /// The registry is mutably borrowed for the whole of `register_city`, so
    /// a loading indicator has to watch the signal from
    /// [`busy_signal`](Self::busy_signal) instead of calling this mid-flight.
    pub fn is_busy(&self) -> bool {
        *self.busy_tx.borrow()
    }

    /// Subscribes to the busy/idle signal. The receiver observes `true` for
    /// the duration of the simulated round-trip even while the registration
    /// future holds the registry.
    pub fn busy_signal(&self) -> watch::Receiver<bool> {
        self.busy_tx.subscribe()
    }

    /// Parses the textual usage input from the form. Rejects anything that is
    /// not a plain non-negative integer; no record is ever created with an
    /// undefined usage value.
    pub fn parse_usage(input: &str) -> Result<u64, RegistryError> {
        input
            .trim()
            .parse::<u64>()
            .map_err(|_| RegistryError::InvalidUsage(input.to_string()))
    }

    /// Registers a new city data point: validates the usage input, resolves
    /// the region against the catalog, waits out the simulated network
    /// round-trip, then appends the record.
    ///
    /// Rejection leaves the collection untouched and clears the busy flag.
    /// Deliberately not idempotent: every call models a new measurement event
    /// and gets a fresh id.
    pub async fn register_city(
        &mut self,
        catalog: &RegionCatalog,
        region: &str,
        network: &str,
        usage_input: &str,
    ) -> Result<&UsageRecord, RegistryError> {
        self.busy_tx.send_replace(true);

        let usage = match Self::parse_usage(usage_input) {
            Ok(v) => v,
            Err(e) => {
                self.busy_tx.send_replace(false);
                return Err(e);
            }
        };

        let entry = match catalog.lookup(region) {
            Some(entry) => entry.clone(),
            None => {
                self.busy_tx.send_replace(false);
                log::warn!("registration rejected: region '{}' not in catalog", region);
                return Err(RegistryError::UnknownRegion(region.to_string()));
            }
        };

        tokio::time::sleep(self.round_trip).await;

        let record = UsageRecord {
            id: self.next_id,
            region: entry.region,
            coordinates: entry.coordinates,
            usage,
            network: network.to_string(),
            added_at: Utc::now(),
        };
        self.next_id += 1;

        log::info!(
            "registered city '{}' — id={} usage={} network={}",
            record.region,
            record.id,
            record.usage,
            record.network
        );

        let idx = self.records.len();
        self.records.push(record);
        self.busy_tx.send_replace(false);
        Ok(&self.records[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RegionCatalog {
        RegionCatalog::builtin()
    }

    fn registry(seed: Vec<UsageRecord>) -> UsageRegistry {
        UsageRegistry::new(seed)
            .unwrap()
            .with_round_trip(Duration::ZERO)
    }

    fn record(id: u32, region: &str, usage: u64) -> UsageRecord {
        UsageRecord {
            id,
            region: region.to_string(),
            coordinates: Coordinates { lat: 0.0, lon: 0.0 },
            usage,
            network: "4G".to_string(),
            added_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_known_city() {
        let seed = vec![record(1, "London", 450), record(2, "Delhi", 5200)];
        let mut registry = registry(seed);

        let new = registry
            .register_city(&catalog(), "Tokyo", "5G", "1200")
            .await
            .unwrap();

        assert_eq!(new.id, 3);
        assert_eq!(new.region, "Tokyo");
        assert_eq!(new.coordinates.lat, 35.68);
        assert_eq!(new.coordinates.lon, 139.69);
        assert_eq!(new.usage, 1200);
        assert_eq!(new.network, "5G");

        // Appended at the end, prior records untouched.
        assert_eq!(registry.records().len(), 3);
        assert_eq!(registry.records().last().unwrap().region, "Tokyo");
        assert_eq!(registry.records()[0].region, "London");
        assert!(!registry.is_busy());
    }

    #[tokio::test]
    async fn test_register_unknown_region_is_rejected() {
        let mut registry = registry(vec![record(1, "London", 450)]);

        let result = registry
            .register_city(&catalog(), "Atlantis", "4G", "50")
            .await;

        assert!(matches!(result, Err(RegistryError::UnknownRegion(name)) if name == "Atlantis"));
        assert_eq!(registry.records().len(), 1);
        assert!(registry.records().iter().all(|r| r.region != "Atlantis"));
        assert!(!registry.is_busy());
    }

    #[tokio::test]
    async fn test_register_bad_usage_is_rejected() {
        let mut registry = registry(vec![]);

        for input in ["", "abc", "12.5", "-3"] {
            let result = registry.register_city(&catalog(), "Tokyo", "5G", input).await;
            assert!(
                matches!(result, Err(RegistryError::InvalidUsage(_))),
                "input {:?} should be rejected",
                input
            );
        }
        assert!(registry.records().is_empty());
        assert!(!registry.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_signal_observable_during_round_trip() {
        let mut registry = UsageRegistry::new(vec![]).unwrap();
        let rx = registry.busy_signal();
        assert!(!*rx.borrow());

        {
            let catalog = catalog();
            let register = registry.register_city(&catalog, "Tokyo", "5G", "1200");
            tokio::pin!(register);

            // Drive the registration to its suspension point: the simulated
            // round-trip is pending and the busy signal reads true.
            assert!(futures::poll!(register.as_mut()).is_pending());
            assert!(*rx.borrow());

            // The paused clock advances once the sleep is awaited.
            register.await.unwrap();
        }

        assert!(!*rx.borrow());
        assert!(!registry.is_busy());
        assert_eq!(registry.records().len(), 1);
    }

    #[tokio::test]
    async fn test_registration_is_not_idempotent() {
        let mut registry = registry(vec![]);

        let first = registry
            .register_city(&catalog(), "Paris", "4G", "700")
            .await
            .unwrap()
            .id;
        let second = registry
            .register_city(&catalog(), "Paris", "4G", "700")
            .await
            .unwrap()
            .id;

        // Two identical calls are two measurement events.
        assert_ne!(first, second);
        assert_eq!(registry.records().len(), 2);
    }

    #[test]
    fn test_id_counter_seeds_from_max() {
        let registry = registry(vec![record(3, "London", 450), record(7, "Delhi", 5200)]);
        assert_eq!(registry.next_id, 8);

        let empty = UsageRegistry::new(vec![]).unwrap();
        assert_eq!(empty.next_id, 1);
    }

    #[test]
    fn test_duplicate_seed_ids_rejected() {
        let seed = vec![record(1, "London", 450), record(1, "Delhi", 5200)];
        assert!(matches!(
            UsageRegistry::new(seed),
            Err(RegistryError::DuplicateId(1))
        ));
    }

    #[test]
    fn test_parse_usage() {
        assert_eq!(UsageRegistry::parse_usage("1200").unwrap(), 1200);
        assert_eq!(UsageRegistry::parse_usage("  42 ").unwrap(), 42);
        assert_eq!(UsageRegistry::parse_usage("0").unwrap(), 0);
        assert!(UsageRegistry::parse_usage("12.5").is_err());
        assert!(UsageRegistry::parse_usage("-1").is_err());
        assert!(UsageRegistry::parse_usage("").is_err());
    }

    #[test]
    fn test_network_kind_parsing() {
        use std::str::FromStr;
        assert_eq!(NetworkKind::from_str("5G").unwrap(), NetworkKind::FiveG);
        assert_eq!(NetworkKind::from_str("4g").unwrap(), NetworkKind::FourG);
        assert!(NetworkKind::from_str("3G").is_err());
    }
}
