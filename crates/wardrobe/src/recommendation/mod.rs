//! Recommendation boundary: wardrobe storage, weather lookup, and the service
//! that prepares the candidate pool for the outfit customizer.

pub mod repository;
pub mod service;
pub mod weather;

pub use repository::{RepositoryError, WardrobeRepository};
pub use service::{candidate_pool, RecommendationError, RecommendationService};
pub use weather::{
    StaticWeatherProvider, UnknownCondition, WeatherCondition, WeatherError, WeatherProvider,
    WeatherReading,
};
