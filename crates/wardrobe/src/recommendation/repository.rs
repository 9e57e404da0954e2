use crate::domain::{Garment, GarmentId, OwnerId};

/// Storage abstraction for wardrobe items so the service can run against any store.
pub trait WardrobeRepository: Send + Sync {
    fn insert(&self, owner: &OwnerId, garment: Garment) -> Result<Garment, RepositoryError>;
    fn update(&self, owner: &OwnerId, garment: Garment) -> Result<Garment, RepositoryError>;
    fn fetch(&self, owner: &OwnerId, id: &GarmentId) -> Result<Option<Garment>, RepositoryError>;
    fn remove(&self, owner: &OwnerId, id: &GarmentId) -> Result<(), RepositoryError>;
    fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Garment>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
