//! In-memory network store.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::domain::{
    EdgeDraft, EdgeId, Location, LocationDraft, LocationId, OperatingDays, ScheduleEdge,
    TransportMode, Weekday,
};
use crate::planner::{EdgeSource, LocationLookup, RouteError};

use super::{NetworkStore, StoreError};

/// A transportation as stored: endpoints by id.
#[derive(Debug, Clone)]
struct EdgeRecord {
    origin: LocationId,
    destination: LocationId,
    mode: TransportMode,
    operating_days: OperatingDays,
}

impl From<EdgeDraft> for EdgeRecord {
    fn from(draft: EdgeDraft) -> Self {
        Self {
            origin: draft.origin,
            destination: draft.destination,
            mode: draft.mode,
            operating_days: draft.operating_days,
        }
    }
}

#[derive(Debug, Default)]
struct Tables {
    locations: BTreeMap<LocationId, Location>,
    edges: BTreeMap<EdgeId, EdgeRecord>,
    last_location_id: i64,
    last_edge_id: i64,
}

impl Tables {
    fn location(&self, id: LocationId) -> Result<&Location, StoreError> {
        self.locations
            .get(&id)
            .ok_or(StoreError::location_not_found(id.0))
    }

    fn code_taken(&self, draft: &LocationDraft, except: Option<LocationId>) -> bool {
        self.locations
            .values()
            .any(|l| l.code == draft.code && Some(l.id) != except)
    }

    fn check_endpoints(&self, record: &EdgeRecord) -> Result<(), StoreError> {
        self.location(record.origin)?;
        self.location(record.destination)?;
        Ok(())
    }

    /// Join a stored record with its current endpoint locations.
    fn materialise(&self, id: EdgeId, record: &EdgeRecord) -> Result<ScheduleEdge, StoreError> {
        let edge = ScheduleEdge::new(
            id,
            self.location(record.origin)?.clone(),
            self.location(record.destination)?.clone(),
            record.mode,
            record.operating_days.clone(),
        )?;
        Ok(edge)
    }
}

/// Network store holding everything in process memory.
///
/// Ids are assigned sequentially from 1 and never reused. Listings are in id
/// order.
#[derive(Debug, Default)]
pub struct InMemoryNetwork {
    tables: RwLock<Tables>,
}

impl InMemoryNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn location_count(&self) -> usize {
        self.tables.read().await.locations.len()
    }

    pub async fn transportation_count(&self) -> usize {
        self.tables.read().await.edges.len()
    }

    /// Look up a location by its code.
    pub async fn location_by_code(&self, code: &str) -> Option<Location> {
        let tables = self.tables.read().await;
        tables
            .locations
            .values()
            .find(|l| l.code.as_str() == code)
            .cloned()
    }
}

impl NetworkStore for InMemoryNetwork {
    async fn list_locations(&self) -> Result<Vec<Location>, StoreError> {
        Ok(self.tables.read().await.locations.values().cloned().collect())
    }

    async fn get_location(&self, id: LocationId) -> Result<Location, StoreError> {
        self.tables.read().await.location(id).cloned()
    }

    async fn create_location(&self, draft: LocationDraft) -> Result<Location, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.code_taken(&draft, None) {
            return Err(StoreError::Conflict(format!(
                "location with code {} already exists",
                draft.code
            )));
        }

        tables.last_location_id += 1;
        let location = draft.into_location(LocationId(tables.last_location_id));
        tables.locations.insert(location.id, location.clone());

        tracing::info!(id = %location.id, code = %location.code, "created location");
        Ok(location)
    }

    async fn update_location(
        &self,
        id: LocationId,
        draft: LocationDraft,
    ) -> Result<Location, StoreError> {
        let mut tables = self.tables.write().await;
        tables.location(id)?;
        if tables.code_taken(&draft, Some(id)) {
            return Err(StoreError::Conflict(format!(
                "location with code {} already exists",
                draft.code
            )));
        }

        let location = draft.into_location(id);
        tables.locations.insert(id, location.clone());

        tracing::info!(%id, code = %location.code, "updated location");
        Ok(location)
    }

    async fn delete_location(&self, id: LocationId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.location(id)?;

        let references = tables
            .edges
            .values()
            .filter(|e| e.origin == id || e.destination == id)
            .count();
        if references > 0 {
            return Err(StoreError::Conflict(format!(
                "location {id} is referenced by {references} transportation(s)"
            )));
        }

        tables.locations.remove(&id);
        tracing::info!(%id, "deleted location");
        Ok(())
    }

    async fn list_transportations(&self) -> Result<Vec<ScheduleEdge>, StoreError> {
        let tables = self.tables.read().await;
        tables
            .edges
            .iter()
            .map(|(id, record)| tables.materialise(*id, record))
            .collect()
    }

    async fn get_transportation(&self, id: EdgeId) -> Result<ScheduleEdge, StoreError> {
        let tables = self.tables.read().await;
        let record = tables
            .edges
            .get(&id)
            .ok_or(StoreError::transportation_not_found(id.0))?;
        tables.materialise(id, record)
    }

    async fn create_transportation(&self, draft: EdgeDraft) -> Result<ScheduleEdge, StoreError> {
        let mut tables = self.tables.write().await;
        let record = EdgeRecord::from(draft);
        tables.check_endpoints(&record)?;

        tables.last_edge_id += 1;
        let id = EdgeId(tables.last_edge_id);
        let edge = tables.materialise(id, &record)?;
        tables.edges.insert(id, record);

        tracing::info!(%id, mode = %edge.mode(), "created transportation");
        Ok(edge)
    }

    async fn update_transportation(
        &self,
        id: EdgeId,
        draft: EdgeDraft,
    ) -> Result<ScheduleEdge, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.edges.contains_key(&id) {
            return Err(StoreError::transportation_not_found(id.0));
        }
        let record = EdgeRecord::from(draft);
        tables.check_endpoints(&record)?;

        let edge = tables.materialise(id, &record)?;
        tables.edges.insert(id, record);

        tracing::info!(%id, mode = %edge.mode(), "updated transportation");
        Ok(edge)
    }

    async fn delete_transportation(&self, id: EdgeId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables
            .edges
            .remove(&id)
            .ok_or(StoreError::transportation_not_found(id.0))?;

        tracing::info!(%id, "deleted transportation");
        Ok(())
    }
}

impl EdgeSource for InMemoryNetwork {
    async fn relevant_edges(
        &self,
        origin: LocationId,
        destination: LocationId,
        weekday: Weekday,
    ) -> Result<Vec<ScheduleEdge>, RouteError> {
        let tables = self.tables.read().await;
        tables
            .edges
            .iter()
            .filter(|(_, r)| r.operating_days.contains(weekday))
            .filter(|(_, r)| {
                r.mode.is_flight() || r.origin == origin || r.destination == destination
            })
            .map(|(id, r)| {
                tables
                    .materialise(*id, r)
                    .map_err(|e| RouteError::EdgeSource(e.to_string()))
            })
            .collect()
    }
}

impl LocationLookup for InMemoryNetwork {
    async fn location(&self, id: LocationId) -> Result<Option<Location>, RouteError> {
        Ok(self.tables.read().await.locations.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    fn draft(name: &str, code: &str) -> LocationDraft {
        LocationDraft::new(name, "Turkey", "Istanbul", code).unwrap()
    }

    fn edge_draft(from: LocationId, to: LocationId, mode: TransportMode, days: &[u8]) -> EdgeDraft {
        EdgeDraft::new(from, to, mode, OperatingDays::from_numbers(days).unwrap()).unwrap()
    }

    async fn network() -> (InMemoryNetwork, [LocationId; 4]) {
        let network = InMemoryNetwork::new();
        let taksim = network.create_location(draft("Taksim Square", "CCIST")).await.unwrap();
        let ist = network.create_location(draft("Istanbul Airport", "IST")).await.unwrap();
        let lhr = network.create_location(draft("London Heathrow", "LHR")).await.unwrap();
        let saw = network.create_location(draft("Sabiha Gokcen", "SAW")).await.unwrap();
        (network, [taksim.id, ist.id, lhr.id, saw.id])
    }

    #[tokio::test]
    async fn ids_assigned_sequentially() {
        let (network, ids) = network().await;
        assert_eq!(ids, [LocationId(1), LocationId(2), LocationId(3), LocationId(4)]);

        let listed: Vec<_> = network
            .list_locations()
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.code.as_str().to_string())
            .collect();
        assert_eq!(listed, vec!["CCIST", "IST", "LHR", "SAW"]);
    }

    #[tokio::test]
    async fn duplicate_code_conflicts() {
        let (network, _) = network().await;
        let err = network
            .create_location(draft("Other Airport", "IST"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(network.location_count().await, 4);
    }

    #[tokio::test]
    async fn update_keeps_own_code_but_rejects_taken_code() {
        let (network, [_, ist, _, _]) = network().await;

        let renamed = network
            .update_location(ist, draft("Istanbul New Airport", "IST"))
            .await
            .unwrap();
        assert_eq!(renamed.name, "Istanbul New Airport");

        let err = network
            .update_location(ist, draft("Istanbul Airport", "LHR"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_missing_location() {
        let (network, _) = network().await;
        let err = network
            .update_location(LocationId(99), draft("Nowhere", "NOW"))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::location_not_found(99));
    }

    #[tokio::test]
    async fn transportation_requires_existing_endpoints() {
        let (network, [taksim, ..]) = network().await;
        let err = network
            .create_transportation(edge_draft(taksim, LocationId(42), TransportMode::Bus, &[1]))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::location_not_found(42));
        assert_eq!(network.transportation_count().await, 0);
    }

    #[tokio::test]
    async fn referenced_location_cannot_be_deleted() {
        let (network, [taksim, ist, _, saw]) = network().await;
        let bus = network
            .create_transportation(edge_draft(taksim, ist, TransportMode::Bus, &[1, 2, 3]))
            .await
            .unwrap();

        let err = network.delete_location(ist).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        network.delete_location(saw).await.unwrap();
        network.delete_transportation(bus.id()).await.unwrap();
        network.delete_location(ist).await.unwrap();
        assert_eq!(network.location_count().await, 2);
    }

    #[tokio::test]
    async fn transportations_reflect_location_updates() {
        let (network, [taksim, ist, _, _]) = network().await;
        let bus = network
            .create_transportation(edge_draft(taksim, ist, TransportMode::Bus, &[1]))
            .await
            .unwrap();

        network
            .update_location(ist, draft("Istanbul Grand Airport", "IST"))
            .await
            .unwrap();

        let edge = network.get_transportation(bus.id()).await.unwrap();
        assert_eq!(edge.destination().name, "Istanbul Grand Airport");
    }

    #[tokio::test]
    async fn update_and_delete_missing_transportation() {
        let (network, [taksim, ist, _, _]) = network().await;
        let err = network
            .update_transportation(EdgeId(5), edge_draft(taksim, ist, TransportMode::Uber, &[1]))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::transportation_not_found(5));

        let err = network.delete_transportation(EdgeId(5)).await.unwrap_err();
        assert_eq!(err, StoreError::transportation_not_found(5));
    }

    #[tokio::test]
    async fn relevant_edges_filters_by_day_and_endpoint() {
        let (network, [taksim, ist, lhr, saw]) = network().await;
        for draft in [
            edge_draft(taksim, ist, TransportMode::Bus, &[1, 2, 3, 4, 5, 6, 7]),
            edge_draft(taksim, saw, TransportMode::Bus, &[1, 2, 3, 4, 5]),
            edge_draft(ist, lhr, TransportMode::Flight, &[1, 2, 3, 4, 5, 6, 7]),
            edge_draft(saw, lhr, TransportMode::Flight, &[1, 3, 5, 7]),
            edge_draft(saw, ist, TransportMode::Uber, &[1, 2, 3, 4, 5, 6, 7]),
        ] {
            network.create_transportation(draft).await.unwrap();
        }

        let ids = |edges: Vec<ScheduleEdge>| edges.iter().map(|e| e.id().0).collect::<Vec<_>>();

        // Monday: both buses from Taksim, both flights; the SAW Uber touches neither endpoint
        let monday = network
            .relevant_edges(taksim, lhr, Weekday::MONDAY)
            .await
            .unwrap();
        assert_eq!(ids(monday), vec![1, 2, 3, 4]);

        // Saturday: the weekday bus and the SAW flight are off
        let saturday = network
            .relevant_edges(taksim, lhr, Weekday::SATURDAY)
            .await
            .unwrap();
        assert_eq!(ids(saturday), vec![1, 3]);
    }

    #[tokio::test]
    async fn location_lookup_returns_none_for_unknown() {
        let (network, [taksim, ..]) = network().await;
        assert!(network.location(taksim).await.unwrap().is_some());
        assert!(network.location(LocationId(77)).await.unwrap().is_none());
        assert_eq!(
            network.location_by_code("LHR").await.map(|l| l.id),
            Some(LocationId(3))
        );
    }

    #[test]
    fn materialise_rejects_self_loop_record() {
        let mut tables = Tables::default();
        let location = draft("Taksim Square", "CCIST").into_location(LocationId(1));
        tables.locations.insert(location.id, location);
        let record = EdgeRecord {
            origin: LocationId(1),
            destination: LocationId(1),
            mode: TransportMode::Bus,
            operating_days: OperatingDays::every_day(),
        };
        assert_eq!(
            tables.materialise(EdgeId(1), &record).unwrap_err(),
            StoreError::Invalid(DomainError::SameEndpoints)
        );
    }
}
