//! Seed data for the in-memory network.
//!
//! A seed is a JSON document listing locations and the transportations
//! between them. Transportations reference their endpoints by location code,
//! since ids are only assigned on load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, EdgeDraft, LocationDraft, OperatingDays, TransportMode};

use super::{InMemoryNetwork, NetworkStore, StoreError};

const EVERY_DAY: &[u8] = &[1, 2, 3, 4, 5, 6, 7];
const WEEKDAYS: &[u8] = &[1, 2, 3, 4, 5];
const MON_WED_FRI_SUN: &[u8] = &[1, 3, 5, 7];
const TUE_THU_SAT: &[u8] = &[2, 4, 6];

/// Errors loading or applying a seed.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Failed to read the seed file
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// Seed file is not valid JSON for a seed
    #[error("failed to parse seed file: {0}")]
    Json(#[from] serde_json::Error),

    /// A transportation names a code no seeded location has
    #[error("unknown location code in seed: {0}")]
    UnknownCode(String),

    /// A seeded record failed validation
    #[error("invalid seed record: {0}")]
    Invalid(#[from] DomainError),

    /// The store rejected a seeded record
    #[error("failed to store seed record: {0}")]
    Store(#[from] StoreError),
}

/// A location in a seed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedLocation {
    pub name: String,
    pub country: String,
    pub city: String,
    pub location_code: String,
}

/// A transportation in a seed document, endpoints given by location code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedTransportation {
    pub origin: String,
    pub destination: String,
    #[serde(rename = "transportationType")]
    pub mode: TransportMode,
    pub operating_days: Vec<u8>,
}

/// A whole seed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub locations: Vec<SeedLocation>,
    #[serde(default)]
    pub transportations: Vec<SeedTransportation>,
}

/// Counts of records created by a seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub locations: usize,
    pub transportations: usize,
}

/// Read a seed document from a JSON file.
pub fn load_seed(path: impl AsRef<Path>) -> Result<Seed, SeedError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn location(name: &str, country: &str, city: &str, code: &str) -> SeedLocation {
    SeedLocation {
        name: name.to_string(),
        country: country.to_string(),
        city: city.to_string(),
        location_code: code.to_string(),
    }
}

fn transportation(
    origin: &str,
    destination: &str,
    mode: TransportMode,
    days: &[u8],
) -> SeedTransportation {
    SeedTransportation {
        origin: origin.to_string(),
        destination: destination.to_string(),
        mode,
        operating_days: days.to_vec(),
    }
}

impl Seed {
    /// Sample network: Istanbul and Ankara feeders into London.
    pub fn sample() -> Self {
        use TransportMode::*;

        let locations = vec![
            location("Taksim Square", "Turkey", "Istanbul", "CCIST"),
            location("Istanbul Airport", "Turkey", "Istanbul", "IST"),
            location("Sabiha Gokcen Airport", "Turkey", "Istanbul", "SAW"),
            location("London Heathrow Airport", "United Kingdom", "London", "LHR"),
            location("Wembley Stadium", "United Kingdom", "London", "WEMB"),
            location("Kabatas Pier", "Turkey", "Istanbul", "KBTSP"),
            location("Ankara Esenboga Airport", "Turkey", "Ankara", "ESB"),
            location("Ankara City Centre", "Turkey", "Ankara", "CCANK"),
        ];

        let transportations = vec![
            // Transfers to airports
            transportation("CCIST", "IST", Bus, EVERY_DAY),
            transportation("CCIST", "IST", Uber, EVERY_DAY),
            transportation("CCIST", "SAW", Bus, WEEKDAYS),
            transportation("KBTSP", "IST", Subway, EVERY_DAY),
            transportation("KBTSP", "CCIST", Subway, EVERY_DAY),
            transportation("CCANK", "ESB", Bus, EVERY_DAY),
            transportation("CCANK", "ESB", Uber, WEEKDAYS),
            // Flights
            transportation("IST", "LHR", Flight, EVERY_DAY),
            transportation("SAW", "LHR", Flight, MON_WED_FRI_SUN),
            transportation("IST", "ESB", Flight, WEEKDAYS),
            transportation("ESB", "LHR", Flight, TUE_THU_SAT),
            // Transfers from airports
            transportation("LHR", "WEMB", Bus, EVERY_DAY),
            transportation("LHR", "WEMB", Uber, EVERY_DAY),
            transportation("ESB", "CCANK", Bus, EVERY_DAY),
            transportation("ESB", "CCANK", Uber, WEEKDAYS),
        ];

        Self {
            locations,
            transportations,
        }
    }
}

impl InMemoryNetwork {
    /// Create a network holding the sample data.
    pub async fn with_sample_data() -> Result<Self, SeedError> {
        let network = Self::new();
        network.apply_seed(&Seed::sample()).await?;
        Ok(network)
    }

    /// Insert every record of a seed.
    ///
    /// Locations are inserted first, in document order. Stops at the first
    /// invalid or conflicting record; records before it stay inserted.
    pub async fn apply_seed(&self, seed: &Seed) -> Result<SeedSummary, SeedError> {
        for l in &seed.locations {
            let draft = LocationDraft::new(&l.name, &l.country, &l.city, &l.location_code)?;
            self.create_location(draft).await?;
        }

        for t in &seed.transportations {
            let origin = self.resolve_code(&t.origin).await?;
            let destination = self.resolve_code(&t.destination).await?;
            let days = OperatingDays::from_numbers(&t.operating_days)?;
            let draft = EdgeDraft::new(origin, destination, t.mode, days)?;
            self.create_transportation(draft).await?;
        }

        let summary = SeedSummary {
            locations: seed.locations.len(),
            transportations: seed.transportations.len(),
        };
        tracing::info!(
            locations = summary.locations,
            transportations = summary.transportations,
            "applied seed"
        );
        Ok(summary)
    }

    async fn resolve_code(&self, code: &str) -> Result<crate::domain::LocationId, SeedError> {
        self.location_by_code(code.trim())
            .await
            .map(|l| l.id)
            .ok_or_else(|| SeedError::UnknownCode(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocationId, Weekday};
    use crate::planner::EdgeSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn sample_network_loads() {
        let network = InMemoryNetwork::with_sample_data().await.unwrap();
        assert_eq!(network.location_count().await, 8);
        assert_eq!(network.transportation_count().await, 15);

        let ist = network.location_by_code("IST").await.unwrap();
        assert_eq!(ist.id, LocationId(2));
        assert_eq!(ist.city, "Istanbul");
    }

    #[tokio::test]
    async fn sample_edges_for_taksim_to_wembley_on_tuesday() {
        let network = InMemoryNetwork::with_sample_data().await.unwrap();
        let taksim = network.location_by_code("CCIST").await.unwrap();
        let wembley = network.location_by_code("WEMB").await.unwrap();

        let edges = network
            .relevant_edges(taksim.id, wembley.id, Weekday::TUESDAY)
            .await
            .unwrap();

        // Taksim bus/uber/bus, flights IST-LHR IST-ESB ESB-LHR, Heathrow bus/uber
        let ids: Vec<i64> = edges.iter().map(|e| e.id().0).collect();
        assert_eq!(ids, vec![1, 2, 3, 8, 10, 11, 12, 13]);
    }

    #[test]
    fn seed_file_round_trip() {
        let json = r#"{
            "locations": [
                {"name": "Istanbul Airport", "country": "Turkey", "city": "Istanbul", "locationCode": "IST"},
                {"name": "London Heathrow", "country": "United Kingdom", "city": "London", "locationCode": "LHR"}
            ],
            "transportations": [
                {"origin": "IST", "destination": "LHR", "transportationType": "FLIGHT", "operatingDays": [1, 3, 5]}
            ]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let seed = load_seed(file.path()).unwrap();
        assert_eq!(seed.locations.len(), 2);
        assert_eq!(seed.locations[1].location_code, "LHR");
        assert_eq!(seed.transportations[0].mode, TransportMode::Flight);
        assert_eq!(seed.transportations[0].operating_days, vec![1, 3, 5]);
    }

    #[test]
    fn missing_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_seed(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io(_)));
    }

    #[test]
    fn malformed_seed_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"locations\": 3}").unwrap();
        let err = load_seed(file.path()).unwrap_err();
        assert!(matches!(err, SeedError::Json(_)));
    }

    #[tokio::test]
    async fn unknown_code_rejected() {
        let seed = Seed {
            locations: vec![location("Istanbul Airport", "Turkey", "Istanbul", "IST")],
            transportations: vec![transportation("IST", "XXX", TransportMode::Flight, EVERY_DAY)],
        };
        let network = InMemoryNetwork::new();
        let err = network.apply_seed(&seed).await.unwrap_err();
        assert!(matches!(err, SeedError::UnknownCode(code) if code == "XXX"));
    }

    #[tokio::test]
    async fn invalid_operating_days_rejected() {
        let seed = Seed {
            locations: vec![
                location("Istanbul Airport", "Turkey", "Istanbul", "IST"),
                location("London Heathrow", "United Kingdom", "London", "LHR"),
            ],
            transportations: vec![transportation("IST", "LHR", TransportMode::Flight, &[0, 8])],
        };
        let network = InMemoryNetwork::new();
        let err = network.apply_seed(&seed).await.unwrap_err();
        assert!(matches!(err, SeedError::Invalid(DomainError::Weekday(_))));
    }

    #[tokio::test]
    async fn duplicate_code_in_seed_rejected() {
        let seed = Seed {
            locations: vec![
                location("Istanbul Airport", "Turkey", "Istanbul", "IST"),
                location("Another", "Turkey", "Istanbul", "IST"),
            ],
            transportations: Vec::new(),
        };
        let network = InMemoryNetwork::new();
        let err = network.apply_seed(&seed).await.unwrap_err();
        assert!(matches!(err, SeedError::Store(StoreError::Conflict(_))));
    }
}
