//! Outfit recommendation engine.
//!
//! A wardrobe is grouped into a candidate pool by category, each candidate is
//! scored against temperature, weather, color, and subtype-compatibility
//! tables, and one garment per category is drawn from a small shortlist with
//! weights favoring lower scores.

pub mod config;
pub mod customization;
pub mod domain;
pub mod error;
pub mod import;
pub mod recommendation;
pub mod telemetry;
