use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use teloxide::types::UserId;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TripRepository};
use crate::models::{NewTrip, Trip, TripId, TripPatch};

#[derive(Clone, Default)]
pub struct InMemoryTrips {
    trips: Arc<RwLock<HashMap<TripId, Trip>>>,
}

impl InMemoryTrips {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw lookup that also sees soft-deleted records.
    #[cfg(test)]
    pub(crate) async fn get_including_deleted(&self, id: TripId) -> Option<Trip> {
        self.trips.read().await.get(&id).cloned()
    }
}

fn not_found(id: TripId) -> StoreError {
    StoreError::NotFound {
        entity: "trip",
        key: id.to_string(),
    }
}

#[async_trait]
impl TripRepository for InMemoryTrips {
    async fn create(&self, params: NewTrip) -> StoreResult<Trip> {
        let trip = Trip::new(params);
        self.trips.write().await.insert(trip.id, trip.clone());
        log::debug!("🚲 Trip created trip_id={} created_by={}", trip.id, trip.created_by);
        Ok(trip)
    }

    async fn get(&self, id: TripId) -> StoreResult<Trip> {
        match self.trips.read().await.get(&id) {
            Some(trip) if !trip.is_deleted() => Ok(trip.clone()),
            _ => Err(not_found(id)),
        }
    }

    async fn list(&self) -> StoreResult<Vec<Trip>> {
        let trips = self.trips.read().await;
        Ok(trips.values().filter(|t| !t.is_deleted()).cloned().collect())
    }

    async fn list_by_creator(&self, user_id: UserId) -> StoreResult<Vec<Trip>> {
        let trips = self.trips.read().await;
        Ok(trips
            .values()
            .filter(|t| t.created_by == user_id && !t.is_deleted())
            .cloned()
            .collect())
    }

    async fn update(&self, id: TripId, patch: TripPatch) -> StoreResult<Trip> {
        let mut trips = self.trips.write().await;
        let trip = match trips.get_mut(&id) {
            Some(trip) if !trip.is_deleted() => trip,
            _ => return Err(not_found(id)),
        };

        patch.apply(trip);
        trip.updated_at = Utc::now();
        log::debug!("✏️ Trip updated trip_id={}", id);

        Ok(trip.clone())
    }

    async fn delete(&self, id: TripId) -> StoreResult<()> {
        let mut trips = self.trips.write().await;
        match trips.get_mut(&id) {
            Some(trip) if !trip.is_deleted() => {
                trip.deleted_at = Some(Utc::now());
                log::debug!("🗑️ Trip deleted trip_id={}", id);
                Ok(())
            }
            _ => Err(not_found(id)),
        }
    }
}
