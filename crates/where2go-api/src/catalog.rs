// Catalog endpoints
//
// States, cities and destination sites. Listing and detail reads are GETs,
// create and update share one POST per entity (an absent `id` creates).

use crate::client::{ApiClient, RequestResult};
use crate::models::{City, CityDetail, CitySave, Destination, State, StateDetail, StateSave};

pub const STATE_PATH: &str = "/admin/state";
pub const CITY_PATH: &str = "/admin/city";
pub const STATE_LISTING_PATH: &str = "/admin/state/state-listing";
pub const STATE_SAVE_PATH: &str = "/admin/state/add-edit-state";
pub const CITY_LISTING_PATH: &str = "/admin/city/city-listing";
pub const CITY_SAVE_PATH: &str = "/admin/city/add-edit-city";
pub const ORPHAN_CITIES_PATH: &str = "/admin/city/get-orphan-cities";
pub const DESTINATION_LISTING_PATH: &str = "/admin/destination/destination-listing";
pub const ORPHAN_DESTINATIONS_PATH: &str = "/admin/destination/get-orphan-destinations";

impl ApiClient {
    // ── States ───────────────────────────────────────────────────────

    pub async fn list_states(&self) -> RequestResult<Vec<State>> {
        self.get(STATE_LISTING_PATH).await
    }

    /// `GET /admin/state/{id}`
    pub async fn get_state(&self, id: &str) -> RequestResult<StateDetail> {
        self.get_entity(STATE_PATH, id).await
    }

    /// Create or update a state. The backend echoes the saved record.
    pub async fn save_state(&self, body: &StateSave) -> RequestResult<serde_json::Value> {
        self.post(STATE_SAVE_PATH, body).await
    }

    // ── Cities ───────────────────────────────────────────────────────

    pub async fn list_cities(&self) -> RequestResult<Vec<City>> {
        self.get(CITY_LISTING_PATH).await
    }

    /// `GET /admin/city/{id}`
    pub async fn get_city(&self, id: &str) -> RequestResult<CityDetail> {
        self.get_entity(CITY_PATH, id).await
    }

    /// Create or update a city. The backend echoes the saved record.
    pub async fn save_city(&self, body: &CitySave) -> RequestResult<serde_json::Value> {
        self.post(CITY_SAVE_PATH, body).await
    }

    /// Cities not attached to any state.
    pub async fn list_orphan_cities(&self) -> RequestResult<Vec<City>> {
        self.get(ORPHAN_CITIES_PATH).await
    }

    // ── Destinations ─────────────────────────────────────────────────

    pub async fn list_destinations(&self) -> RequestResult<Vec<Destination>> {
        self.get(DESTINATION_LISTING_PATH).await
    }

    /// Destinations not attached to any city.
    pub async fn list_orphan_destinations(&self) -> RequestResult<Vec<Destination>> {
        self.get(ORPHAN_DESTINATIONS_PATH).await
    }
}
