// ── Catalog service ──
//
// State, city and destination operations. Every call checks both error
// tiers: transport failures and `success: false` envelopes both come back
// as `CoreError`, so callers only branch once.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::try_join;
use serde::Serialize;
use tracing::debug;
use where2go_api::catalog::{
    CITY_LISTING_PATH, CITY_PATH, DESTINATION_LISTING_PATH, ORPHAN_CITIES_PATH,
    ORPHAN_DESTINATIONS_PATH, STATE_LISTING_PATH, STATE_PATH,
};
use where2go_api::{
    ApiClient, City, CityDetail, CitySave, Destination, RequestResult, State, StateDetail,
    StateSave,
};

use crate::error::CoreError;
use crate::validation;

/// Fold a round-trip into its payload, mapping both failure tiers.
fn settle<T>(result: RequestResult<T>, path: &str) -> Result<T, CoreError> {
    Ok(result?.into_data(path)?)
}

/// Attached ids first, then newly selected ones, without duplicates.
fn child_ids<'a>(
    attached: impl Iterator<Item = &'a str>,
    selected: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    attached
        .chain(selected)
        .filter(|id| seen.insert(*id))
        .map(str::to_owned)
        .collect()
}

// ── Forms ────────────────────────────────────────────────────────

/// An orphan record offered for attachment, with its checkbox state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selectable<T> {
    #[serde(flatten)]
    pub item: T,
    pub checked: bool,
}

impl<T> From<T> for Selectable<T> {
    fn from(item: T) -> Self {
        Self {
            item,
            checked: false,
        }
    }
}

/// Add/edit state screen: the state, its cities, and the orphan cities
/// that could be attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StateForm {
    pub id: Option<String>,
    pub name: String,
    pub cities: Vec<City>,
    pub orphans: Vec<Selectable<City>>,
}

impl StateForm {
    /// Tick or untick an orphan city.
    pub fn check(&mut self, city_id: &str, checked: bool) -> Result<(), CoreError> {
        let orphan = self
            .orphans
            .iter_mut()
            .find(|o| o.item.id == city_id)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "Orphan city".into(),
                identifier: city_id.into(),
            })?;
        orphan.checked = checked;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validation::validate_state(&self.name)
    }

    /// The save request: attached cities plus every ticked orphan.
    pub fn body(&self) -> StateSave {
        StateSave {
            id: self.id.clone(),
            name: self.name.trim().to_owned(),
            cities: child_ids(
                self.cities.iter().map(|c| c.id.as_str()),
                self.orphans
                    .iter()
                    .filter(|o| o.checked)
                    .map(|o| o.item.id.as_str()),
            ),
        }
    }
}

/// Add/edit city screen: the city, its destinations, and the orphan
/// destinations that could be attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityForm {
    pub id: Option<String>,
    pub name: String,
    pub pincode: String,
    pub destinations: Vec<Destination>,
    pub orphans: Vec<Selectable<Destination>>,
}

impl Default for CityForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            pincode: "000000".into(),
            destinations: Vec::new(),
            orphans: Vec::new(),
        }
    }
}

impl CityForm {
    /// Tick or untick an orphan destination.
    pub fn check(&mut self, destination_id: &str, checked: bool) -> Result<(), CoreError> {
        let orphan = self
            .orphans
            .iter_mut()
            .find(|o| o.item.id == destination_id)
            .ok_or_else(|| CoreError::NotFound {
                entity_type: "Orphan destination".into(),
                identifier: destination_id.into(),
            })?;
        orphan.checked = checked;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        validation::validate_city(&self.name, &self.pincode)
    }

    /// The save request: attached destinations plus every ticked orphan.
    pub fn body(&self) -> CitySave {
        CitySave {
            id: self.id.clone(),
            name: self.name.trim().to_owned(),
            pincode: self.pincode.trim().to_owned(),
            destinations: child_ids(
                self.destinations.iter().map(|d| d.id.as_str()),
                self.orphans
                    .iter()
                    .filter(|o| o.checked)
                    .map(|o| o.item.id.as_str()),
            ),
        }
    }
}

// ── Catalog ──────────────────────────────────────────────────────

/// Catalog operations over a shared client.
#[derive(Clone)]
pub struct Catalog {
    client: Arc<ApiClient>,
}

impl Catalog {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    // ── States ───────────────────────────────────────────────────

    pub async fn states(&self) -> Result<Vec<State>, CoreError> {
        settle(self.client.list_states().await, STATE_LISTING_PATH)
    }

    pub async fn state(&self, id: &str) -> Result<StateDetail, CoreError> {
        settle(self.client.get_state(id).await, &format!("{STATE_PATH}/{id}"))
    }

    /// Load the add (`id: None`) or edit form for a state.
    ///
    /// The detail and the orphan list are fetched concurrently.
    pub async fn state_form(&self, id: Option<&str>) -> Result<StateForm, CoreError> {
        let detail = async {
            match id {
                Some(id) => self.state(id).await.map(Some),
                None => Ok(None),
            }
        };
        let (detail, orphans) = try_join(detail, self.orphan_cities()).await?;

        let orphans = orphans.into_iter().map(Selectable::from).collect();
        Ok(match detail {
            Some(d) => StateForm {
                id: id.map(str::to_owned),
                name: d.name,
                cities: d.cities,
                orphans,
            },
            None => StateForm {
                orphans,
                ..StateForm::default()
            },
        })
    }

    /// Validate and submit a state form. Invalid forms never reach the backend.
    pub async fn save_state(&self, form: &StateForm) -> Result<serde_json::Value, CoreError> {
        form.validate()?;
        let body = form.body();
        debug!(id = ?body.id, cities = body.cities.len(), "saving state");
        let resp = self.client.save_state(&body).await?;
        resp.ensure_success()?;
        Ok(resp.data.unwrap_or_default())
    }

    // ── Cities ───────────────────────────────────────────────────

    pub async fn cities(&self) -> Result<Vec<City>, CoreError> {
        settle(self.client.list_cities().await, CITY_LISTING_PATH)
    }

    pub async fn city(&self, id: &str) -> Result<CityDetail, CoreError> {
        settle(self.client.get_city(id).await, &format!("{CITY_PATH}/{id}"))
    }

    pub async fn orphan_cities(&self) -> Result<Vec<City>, CoreError> {
        settle(self.client.list_orphan_cities().await, ORPHAN_CITIES_PATH)
    }

    /// Load the add (`id: None`) or edit form for a city.
    pub async fn city_form(&self, id: Option<&str>) -> Result<CityForm, CoreError> {
        let detail = async {
            match id {
                Some(id) => self.city(id).await.map(Some),
                None => Ok(None),
            }
        };
        let (detail, orphans) = try_join(detail, self.orphan_destinations()).await?;

        let orphans = orphans.into_iter().map(Selectable::from).collect();
        Ok(match detail {
            Some(d) => CityForm {
                id: id.map(str::to_owned),
                name: d.name,
                pincode: d.pincode.map(|p| p.to_string()).unwrap_or_default(),
                destinations: d.destinations,
                orphans,
            },
            None => CityForm {
                orphans,
                ..CityForm::default()
            },
        })
    }

    /// Validate and submit a city form. Invalid forms never reach the backend.
    pub async fn save_city(&self, form: &CityForm) -> Result<serde_json::Value, CoreError> {
        form.validate()?;
        let body = form.body();
        debug!(id = ?body.id, destinations = body.destinations.len(), "saving city");
        let resp = self.client.save_city(&body).await?;
        resp.ensure_success()?;
        Ok(resp.data.unwrap_or_default())
    }

    // ── Destinations ─────────────────────────────────────────────

    pub async fn destinations(&self) -> Result<Vec<Destination>, CoreError> {
        settle(
            self.client.list_destinations().await,
            DESTINATION_LISTING_PATH,
        )
    }

    pub async fn orphan_destinations(&self) -> Result<Vec<Destination>, CoreError> {
        settle(
            self.client.list_orphan_destinations().await,
            ORPHAN_DESTINATIONS_PATH,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn city(id: &str) -> City {
        serde_json::from_value(json!({ "_id": id, "name": format!("City {id}") })).unwrap()
    }

    #[test]
    fn child_ids_dedupes_in_order() {
        let ids = child_ids(["a", "b"].into_iter(), ["c", "a", "d"].into_iter());
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn state_body_sends_only_checked_orphan_ids() {
        let mut form = StateForm {
            id: Some("s1".into()),
            name: " Goa ".into(),
            cities: vec![city("c1")],
            orphans: vec![city("c2").into(), city("c3").into()],
        };
        form.check("c3", true).unwrap();

        let body = form.body();
        assert_eq!(body.id.as_deref(), Some("s1"));
        assert_eq!(body.name, "Goa");
        assert_eq!(body.cities, vec!["c1", "c3"]);
    }

    #[test]
    fn checking_unknown_orphan_fails() {
        let mut form = StateForm::default();
        assert!(matches!(
            form.check("nope", true),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn unchecking_removes_from_body() {
        let mut form = StateForm {
            name: "Goa".into(),
            orphans: vec![city("c2").into()],
            ..StateForm::default()
        };
        form.check("c2", true).unwrap();
        form.check("c2", false).unwrap();
        assert!(form.body().cities.is_empty());
    }

    #[test]
    fn new_city_form_has_placeholder_pincode() {
        let form = CityForm::default();
        assert_eq!(form.pincode, "000000");
        assert!(form.validate().is_err());
    }
}
