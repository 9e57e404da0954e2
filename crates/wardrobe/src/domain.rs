use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Formality label that matches every requested occasion.
pub const ANY_FORMALITY: &str = "any";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GarmentId(pub String);

static GARMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

impl GarmentId {
    /// Process-unique id for garments that arrive without one.
    pub fn generate() -> Self {
        let id = GARMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("item-{id:06}"))
    }
}

impl fmt::Display for GarmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key scoping a wardrobe to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grouping slot a garment fills in an outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Top,
    Bottom,
    Footwear,
    Outerwear,
    Headwear,
}

impl Category {
    /// Order in which categories are filled. Later categories are scored
    /// against every garment chosen before them.
    pub const PROCESSING_ORDER: [Self; 5] = [
        Self::Top,
        Self::Bottom,
        Self::Footwear,
        Self::Outerwear,
        Self::Headwear,
    ];

    pub const REQUIRED: [Self; 3] = [Self::Top, Self::Bottom, Self::Footwear];

    pub const fn is_required(self) -> bool {
        matches!(self, Self::Top | Self::Bottom | Self::Footwear)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Footwear => "footwear",
            Self::Outerwear => "outerwear",
            Self::Headwear => "headwear",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown clothing category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "footwear" => Ok(Self::Footwear),
            "outerwear" | "outer" => Ok(Self::Outerwear),
            "headwear" => Ok(Self::Headwear),
            _ => Err(UnknownCategory(value.to_string())),
        }
    }
}

/// Closed palette of garment colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    Black,
    White,
    Grey,
    Brown,
    Pink,
    Maroon,
    Cyan,
    Magenta,
    Olive,
    Cream,
    NavyBlue,
    SkyBlue,
    Lavender,
    Red,
    Blue,
    Yellow,
    Gold,
    Orange,
    Green,
    Purple,
}

impl Color {
    pub const ALL: [Self; 20] = [
        Self::Black,
        Self::White,
        Self::Grey,
        Self::Brown,
        Self::Pink,
        Self::Maroon,
        Self::Cyan,
        Self::Magenta,
        Self::Olive,
        Self::Cream,
        Self::NavyBlue,
        Self::SkyBlue,
        Self::Lavender,
        Self::Red,
        Self::Blue,
        Self::Yellow,
        Self::Gold,
        Self::Orange,
        Self::Green,
        Self::Purple,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
            Self::Grey => "grey",
            Self::Brown => "brown",
            Self::Pink => "pink",
            Self::Maroon => "maroon",
            Self::Cyan => "cyan",
            Self::Magenta => "magenta",
            Self::Olive => "olive",
            Self::Cream => "cream",
            Self::NavyBlue => "navy-blue",
            Self::SkyBlue => "sky-blue",
            Self::Lavender => "lavender",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Yellow => "yellow",
            Self::Gold => "gold",
            Self::Orange => "orange",
            Self::Green => "green",
            Self::Purple => "purple",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color '{0}'")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        if normalized == "gray" {
            return Ok(Self::Grey);
        }

        Self::ALL
            .into_iter()
            .find(|color| color.as_str() == normalized)
            .ok_or_else(|| UnknownColor(value.to_string()))
    }
}

/// A single wardrobe item. Scoring only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garment {
    pub id: GarmentId,
    pub name: String,
    pub category: Category,
    pub subtype: String,
    pub color: Color,
    pub formality: String,
}

impl Garment {
    pub fn matches_formality(&self, formality: &str) -> bool {
        let own = self.formality.trim();
        own.eq_ignore_ascii_case(ANY_FORMALITY) || own.eq_ignore_ascii_case(formality.trim())
    }
}

/// Candidate garments grouped by the slot they can fill.
pub type CandidatePool = BTreeMap<Category, Vec<Garment>>;

/// Canonical form of a subtype label used as the key in every reference table.
pub fn normalize_subtype(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}
