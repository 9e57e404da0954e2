//! Outfit customization: the four scoring sub-models and the per-category
//! shortlist-then-weighted-draw selection that combines them.

pub mod color;
pub mod compatibility;
pub mod reference;
pub mod selection;
pub mod temperature;
pub mod weather;

pub use color::ColorScorer;
pub use compatibility::{CompatibilityScorer, NEUTRAL_WEIGHT};
pub use reference::{ReferenceAudit, ReferenceData, ReferenceDataError, ReferenceTable};
pub use selection::{top_options, weighted_pick, Scored};
pub use temperature::{TemperatureRange, TemperatureScorer};
pub use weather::{WeatherRule, WeatherScorer};

use crate::domain::{CandidatePool, Category, Garment};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// At or below this temperature optional layers are admitted regardless of score.
pub const COLD_WEATHER_THRESHOLD_F: f64 = 40.0;
/// Optional categories outside cold weather need a tallied score below this.
pub const OPTIONAL_SCORE_CEILING: u32 = 4;
/// Subtype that never benefits from the cold-weather override.
pub const NON_ESSENTIAL_SUBTYPE: &str = "cap";

/// Raised when reference data cannot score a garment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("reference data has no temperature range for subtype '{subtype}'")]
    UnknownSubtype { subtype: String },
}

/// Per-factor breakdown of a garment's tallied score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarmentScore {
    pub temperature: u32,
    pub weather: u32,
    pub color: u32,
    pub compatibility: u32,
}

impl GarmentScore {
    pub fn total(&self) -> u32 {
        self.temperature + self.weather + self.color + self.compatibility
    }
}

/// A garment chosen for one category together with the score that won it the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutfitSelection {
    pub garment: Garment,
    pub score: GarmentScore,
}

/// At most one garment per category, in [`Category::PROCESSING_ORDER`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
    pub selections: Vec<OutfitSelection>,
}

impl Outfit {
    pub fn garments(&self) -> Vec<Garment> {
        self.selections
            .iter()
            .map(|selection| selection.garment.clone())
            .collect()
    }

    pub fn into_garments(self) -> Vec<Garment> {
        self.selections
            .into_iter()
            .map(|selection| selection.garment)
            .collect()
    }

    pub fn get(&self, category: Category) -> Option<&OutfitSelection> {
        self.selections
            .iter()
            .find(|selection| selection.garment.category == category)
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

/// Builds an outfit from a candidate pool using the shared reference tables.
#[derive(Debug, Clone)]
pub struct OutfitCustomizer {
    tables: Arc<ReferenceData>,
}

impl OutfitCustomizer {
    pub fn new(tables: Arc<ReferenceData>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &ReferenceData {
        &self.tables
    }

    /// Score `garment` against the outfit assembled so far.
    pub fn tally_score(
        &self,
        garment: &Garment,
        temperature_f: f64,
        condition: Option<&str>,
        outfit: &[Garment],
    ) -> Result<GarmentScore, ScoringError> {
        Ok(GarmentScore {
            temperature: self.tables.temperature.score(garment, temperature_f)?,
            color: self.tables.color.score(garment, outfit),
            compatibility: self.tables.compatibility.score(garment, outfit),
            weather: self.tables.weather.score(garment, condition),
        })
    }

    /// Select one garment per category using a thread-local random source.
    ///
    /// The caller guarantees every required category has at least one
    /// candidate; categories with no candidates are skipped.
    pub fn customize_outfit(
        &self,
        pool: &CandidatePool,
        temperature_f: f64,
        condition: Option<&str>,
    ) -> Result<Vec<Garment>, ScoringError> {
        let outfit =
            self.customize_with_rng(pool, temperature_f, condition, &mut rand::thread_rng())?;
        Ok(outfit.into_garments())
    }

    pub fn customize_with_rng<R>(
        &self,
        pool: &CandidatePool,
        temperature_f: f64,
        condition: Option<&str>,
        rng: &mut R,
    ) -> Result<Outfit, ScoringError>
    where
        R: Rng + ?Sized,
    {
        let mut outfit = Outfit::default();
        let mut chosen: Vec<Garment> = Vec::new();

        for category in Category::PROCESSING_ORDER {
            let Some(candidates) = pool.get(&category).filter(|items| !items.is_empty()) else {
                continue;
            };

            let Some(prospect) =
                self.pick(candidates, temperature_f, condition, &chosen, rng)?
            else {
                continue;
            };

            if !category.is_required() && !admits_optional(temperature_f, &prospect) {
                debug!(
                    %category,
                    garment = %prospect.garment.id,
                    score = prospect.score.total(),
                    "optional category omitted"
                );
                continue;
            }

            debug!(
                %category,
                garment = %prospect.garment.id,
                score = prospect.score.total(),
                "category filled"
            );
            chosen.push(prospect.garment.clone());
            outfit.selections.push(prospect);
        }

        Ok(outfit)
    }

    fn pick<R>(
        &self,
        candidates: &[Garment],
        temperature_f: f64,
        condition: Option<&str>,
        chosen: &[Garment],
        rng: &mut R,
    ) -> Result<Option<OutfitSelection>, ScoringError>
    where
        R: Rng + ?Sized,
    {
        let scored = candidates
            .iter()
            .map(|garment| {
                let breakdown = self.tally_score(garment, temperature_f, condition, chosen)?;
                Ok(Scored {
                    score: breakdown.total(),
                    item: (garment, breakdown),
                })
            })
            .collect::<Result<Vec<_>, ScoringError>>()?;

        let shortlist = top_options(scored, rng);
        debug!(candidates = candidates.len(), shortlist = shortlist.len(), "shortlist built");

        Ok(weighted_pick(&shortlist, rng).map(|pick| {
            let (garment, score) = pick.item;
            OutfitSelection {
                garment: garment.clone(),
                score,
            }
        }))
    }
}

/// Cold weather admits any non-cap layer; otherwise the score must stay below the ceiling.
pub(crate) fn admits_optional(temperature_f: f64, prospect: &OutfitSelection) -> bool {
    let cold = temperature_f <= COLD_WEATHER_THRESHOLD_F;
    if cold && !prospect.garment.subtype.trim().eq_ignore_ascii_case(NON_ESSENTIAL_SUBTYPE) {
        return true;
    }
    prospect.score.total() < OPTIONAL_SCORE_CEILING
}
