use std::sync::Arc;

use rand::Rng;
use tracing::info;

use super::repository::{RepositoryError, WardrobeRepository};
use super::weather::{WeatherError, WeatherProvider, WeatherReading};
use crate::customization::{Outfit, OutfitCustomizer, ScoringError};
use crate::domain::{CandidatePool, Category, Garment, OwnerId};

/// Service composing the wardrobe store, weather provider, and outfit customizer.
pub struct RecommendationService<R, W> {
    repository: Arc<R>,
    weather: Arc<W>,
    customizer: Arc<OutfitCustomizer>,
}

impl<R, W> RecommendationService<R, W>
where
    R: WardrobeRepository + 'static,
    W: WeatherProvider + 'static,
{
    pub fn new(repository: Arc<R>, weather: Arc<W>, customizer: Arc<OutfitCustomizer>) -> Self {
        Self {
            repository,
            weather,
            customizer,
        }
    }

    pub fn customizer(&self) -> &OutfitCustomizer {
        &self.customizer
    }

    /// Recommend an outfit for `owner` under an already-known weather reading.
    pub fn recommend(
        &self,
        owner: &OwnerId,
        formality: &str,
        reading: WeatherReading,
    ) -> Result<Outfit, RecommendationError> {
        self.recommend_with_rng(owner, formality, reading, &mut rand::thread_rng())
    }

    pub fn recommend_with_rng<G>(
        &self,
        owner: &OwnerId,
        formality: &str,
        reading: WeatherReading,
        rng: &mut G,
    ) -> Result<Outfit, RecommendationError>
    where
        G: Rng + ?Sized,
    {
        let wardrobe = self.repository.list_for_owner(owner)?;
        let pool = candidate_pool(&wardrobe, formality)?;
        let condition = reading.condition.map(|condition| condition.as_str());

        let outfit =
            self.customizer
                .customize_with_rng(&pool, reading.temperature_f, condition, rng)?;

        info!(
            %owner,
            formality,
            temperature_f = reading.temperature_f,
            condition = condition.unwrap_or("unknown"),
            garments = outfit.len(),
            "outfit recommended"
        );
        Ok(outfit)
    }

    pub fn current_weather(&self, city: &str) -> Result<WeatherReading, RecommendationError> {
        Ok(self.weather.current(city)?)
    }

    /// Look up the city's weather first, then recommend.
    pub fn recommend_for_city(
        &self,
        owner: &OwnerId,
        formality: &str,
        city: &str,
    ) -> Result<(WeatherReading, Outfit), RecommendationError> {
        let reading = self.current_weather(city)?;
        let outfit = self.recommend(owner, formality, reading)?;
        Ok((reading, outfit))
    }
}

/// Group the wardrobe into the engine's candidate pool.
///
/// Garments are kept when their formality matches or is `any`. A required
/// category emptied by that filter falls back to every garment of the category.
/// A wardrobe with no garment at all for a required category is rejected.
pub fn candidate_pool(
    wardrobe: &[Garment],
    formality: &str,
) -> Result<CandidatePool, RecommendationError> {
    for category in Category::REQUIRED {
        if !wardrobe.iter().any(|garment| garment.category == category) {
            return Err(RecommendationError::MissingCategory(category));
        }
    }

    let mut pool = CandidatePool::new();
    for garment in wardrobe.iter().filter(|garment| garment.matches_formality(formality)) {
        pool.entry(garment.category).or_default().push(garment.clone());
    }

    for category in Category::REQUIRED {
        let filtered = pool.entry(category).or_default();
        if filtered.is_empty() {
            filtered.extend(
                wardrobe
                    .iter()
                    .filter(|garment| garment.category == category)
                    .cloned(),
            );
        }
    }

    Ok(pool)
}

/// Error raised by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("cannot build an outfit without any {0}")]
    MissingCategory(Category),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
