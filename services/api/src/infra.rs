use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;
use wardrobe::customization::{ReferenceData, ReferenceDataError};
use wardrobe::domain::{Garment, GarmentId, OwnerId};
use wardrobe::recommendation::{RepositoryError, WardrobeRepository, WeatherCondition};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

type OwnerItems = HashMap<OwnerId, BTreeMap<GarmentId, Garment>>;

#[derive(Default, Clone)]
pub(crate) struct InMemoryWardrobeRepository {
    items: Arc<Mutex<OwnerItems>>,
}

impl InMemoryWardrobeRepository {
    fn guard(&self) -> Result<MutexGuard<'_, OwnerItems>, RepositoryError> {
        self.items
            .lock()
            .map_err(|_| RepositoryError::Unavailable("wardrobe mutex poisoned".to_string()))
    }
}

impl WardrobeRepository for InMemoryWardrobeRepository {
    fn insert(&self, owner: &OwnerId, garment: Garment) -> Result<Garment, RepositoryError> {
        let mut guard = self.guard()?;
        let wardrobe = guard.entry(owner.clone()).or_default();
        if wardrobe.contains_key(&garment.id) {
            return Err(RepositoryError::Conflict);
        }
        wardrobe.insert(garment.id.clone(), garment.clone());
        Ok(garment)
    }

    fn update(&self, owner: &OwnerId, garment: Garment) -> Result<Garment, RepositoryError> {
        let mut guard = self.guard()?;
        let slot = guard
            .get_mut(owner)
            .and_then(|wardrobe| wardrobe.get_mut(&garment.id))
            .ok_or(RepositoryError::NotFound)?;
        *slot = garment.clone();
        Ok(garment)
    }

    fn fetch(&self, owner: &OwnerId, id: &GarmentId) -> Result<Option<Garment>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard
            .get(owner)
            .and_then(|wardrobe| wardrobe.get(id))
            .cloned())
    }

    fn remove(&self, owner: &OwnerId, id: &GarmentId) -> Result<(), RepositoryError> {
        let mut guard = self.guard()?;
        guard
            .get_mut(owner)
            .and_then(|wardrobe| wardrobe.remove(id))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Garment>, RepositoryError> {
        let guard = self.guard()?;
        Ok(guard
            .get(owner)
            .map(|wardrobe| wardrobe.values().cloned().collect())
            .unwrap_or_default())
    }
}

/// Load the scoring tables from `dir`, or the bundled copies when unset.
/// Audit findings are logged, never fatal.
pub(crate) fn load_reference_data(dir: Option<&Path>) -> Result<ReferenceData, ReferenceDataError> {
    let data = match dir {
        Some(dir) => ReferenceData::from_dir(dir)?,
        None => ReferenceData::bundled()?,
    };

    let audit = data.audit();
    if !audit.is_clean() {
        warn!(
            missing = ?audit.missing_temperature_ranges,
            "reference tables name subtypes without a temperature range"
        );
    }
    Ok(data)
}

pub(crate) fn parse_condition(raw: &str) -> Result<WeatherCondition, String> {
    raw.parse::<WeatherCondition>()
        .map_err(|err| format!("{err} (expected clear, sunny, cloudy, rainy, snowy, or windy)"))
}
