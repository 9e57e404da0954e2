use super::color::ColorScorer;
use super::compatibility::CompatibilityScorer;
use super::temperature::TemperatureScorer;
use super::weather::WeatherScorer;
use crate::domain::normalize_subtype;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

const BUNDLED_TEMPERATURE: &str = include_str!("../../data/temperature.csv");
const BUNDLED_WEATHER: &str = include_str!("../../data/weather.csv");
const BUNDLED_COLORS: &str = include_str!("../../data/colors.csv");
const BUNDLED_COMPATIBILITY: &str = include_str!("../../data/compatibility.csv");

/// Identifies one of the four reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceTable {
    Temperature,
    Weather,
    Color,
    Compatibility,
}

impl ReferenceTable {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Temperature => "temperature.csv",
            Self::Weather => "weather.csv",
            Self::Color => "colors.csv",
            Self::Compatibility => "compatibility.csv",
        }
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Temperature => "temperature",
            Self::Weather => "weather",
            Self::Color => "color",
            Self::Compatibility => "compatibility",
        };
        f.write_str(label)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReferenceDataError {
    #[error("failed to read reference data {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid {table} table: {source}")]
    Csv {
        table: ReferenceTable,
        #[source]
        source: csv::Error,
    },
    #[error("invalid {table} table row at line {line}: {reason}")]
    InvalidRow {
        table: ReferenceTable,
        line: u64,
        reason: String,
    },
}

/// Immutable scoring tables shared by every outfit request.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub temperature: TemperatureScorer,
    pub weather: WeatherScorer,
    pub color: ColorScorer,
    pub compatibility: CompatibilityScorer,
}

impl ReferenceData {
    /// Tables compiled into the library from `crates/wardrobe/data`.
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        Self::from_readers(
            BUNDLED_TEMPERATURE.as_bytes(),
            BUNDLED_WEATHER.as_bytes(),
            BUNDLED_COLORS.as_bytes(),
            BUNDLED_COMPATIBILITY.as_bytes(),
        )
    }

    /// Load every table from `dir`, failing on the first missing or malformed file.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ReferenceDataError> {
        let dir = dir.as_ref();
        let open = |table: ReferenceTable| {
            let path = dir.join(table.file_name());
            std::fs::File::open(&path).map_err(|source| ReferenceDataError::Io { path, source })
        };

        let data = Self::from_readers(
            open(ReferenceTable::Temperature)?,
            open(ReferenceTable::Weather)?,
            open(ReferenceTable::Color)?,
            open(ReferenceTable::Compatibility)?,
        )?;
        info!(dir = %dir.display(), "loaded reference data");
        Ok(data)
    }

    pub fn from_readers<T, W, C, G>(
        temperature: T,
        weather: W,
        color: C,
        compatibility: G,
    ) -> Result<Self, ReferenceDataError>
    where
        T: Read,
        W: Read,
        C: Read,
        G: Read,
    {
        Ok(Self {
            temperature: TemperatureScorer::from_reader(temperature)?,
            weather: WeatherScorer::from_reader(weather)?,
            color: ColorScorer::from_reader(color)?,
            compatibility: CompatibilityScorer::from_reader(compatibility)?,
        })
    }

    /// Subtypes named by the weather or compatibility tables that have no
    /// temperature range. Garments with these subtypes cannot be scored.
    pub fn audit(&self) -> ReferenceAudit {
        let referenced: BTreeSet<&str> = self
            .weather
            .subtypes()
            .chain(self.compatibility.subtypes())
            .collect();

        let missing_temperature_ranges = referenced
            .into_iter()
            .filter(|subtype| !self.temperature.contains(subtype))
            .map(str::to_string)
            .collect();

        ReferenceAudit {
            known_subtypes: self.temperature.len(),
            missing_temperature_ranges,
        }
    }
}

/// Result of cross-checking the reference tables against each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceAudit {
    pub known_subtypes: usize,
    pub missing_temperature_ranges: Vec<String>,
}

impl ReferenceAudit {
    pub fn is_clean(&self) -> bool {
        self.missing_temperature_ranges.is_empty()
    }
}

/// Deserialize every row of a headed CSV table, pairing each with its line number.
pub(crate) fn read_rows<R, T>(
    reader: R,
    table: ReferenceTable,
) -> Result<Vec<(u64, T)>, ReferenceDataError>
where
    R: Read,
    T: DeserializeOwned,
{
    let csv_error = |source| ReferenceDataError::Csv { table, source };
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);
    let headers = csv_reader.headers().map_err(csv_error)?.clone();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map(|position| position.line()).unwrap_or_default();
        let row = record.deserialize(Some(&headers)).map_err(csv_error)?;
        rows.push((line, row));
    }

    Ok(rows)
}

/// Split a comma-separated list field into normalized, non-empty entries.
pub(crate) fn split_list(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(normalize_subtype)
        .filter(|entry| !entry.is_empty())
}

pub(crate) fn require_label(
    table: ReferenceTable,
    line: u64,
    column: &str,
    value: &str,
) -> Result<String, ReferenceDataError> {
    let normalized = normalize_subtype(value);
    if normalized.is_empty() {
        return Err(ReferenceDataError::InvalidRow {
            table,
            line,
            reason: format!("{column} must not be empty"),
        });
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPERATURE: &str = "subtype,min_temp_f,max_temp_f\nt-shirt,65,100\nrain boots,30,65\n";
    const WEATHER: &str = "condition,unsuitable,ideal\nrainy,\"sandals\",\"rain boots\"\n";
    const COLORS: &str = "color,incompatible\nred,\"pink,orange\"\n";
    const COMPATIBILITY: &str = "subtype_a,subtype_b,weight\nt-shirt,rain boots,2\n";

    #[test]
    fn bundled_tables_load_and_audit_cleanly() {
        let data = ReferenceData::bundled().expect("bundled data loads");
        let audit = data.audit();
        assert!(
            audit.is_clean(),
            "missing ranges: {:?}",
            audit.missing_temperature_ranges
        );
        assert!(audit.known_subtypes > 20);
    }

    #[test]
    fn audit_reports_subtypes_without_temperature_ranges() {
        let data = ReferenceData::from_readers(
            TEMPERATURE.as_bytes(),
            WEATHER.as_bytes(),
            COLORS.as_bytes(),
            COMPATIBILITY.as_bytes(),
        )
        .expect("tables load");

        let audit = data.audit();
        assert_eq!(audit.known_subtypes, 2);
        assert_eq!(audit.missing_temperature_ranges, vec!["sandals".to_string()]);
    }

    #[test]
    fn from_dir_reports_missing_files() {
        let error = ReferenceData::from_dir("./does-not-exist").expect_err("missing dir");
        match error {
            ReferenceDataError::Io { path, .. } => {
                assert!(path.ends_with("temperature.csv"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_numbers_are_fatal() {
        let error = ReferenceData::from_readers(
            "subtype,min_temp_f,max_temp_f\nt-shirt,warm,100\n".as_bytes(),
            WEATHER.as_bytes(),
            COLORS.as_bytes(),
            COMPATIBILITY.as_bytes(),
        )
        .expect_err("bad number rejected");

        assert!(matches!(
            error,
            ReferenceDataError::Csv {
                table: ReferenceTable::Temperature,
                ..
            }
        ));
    }

    #[test]
    fn split_list_skips_blank_entries() {
        let entries: Vec<_> = split_list(" Sandals , ,Flip Flops,").collect();
        assert_eq!(entries, vec!["sandals".to_string(), "flip flops".to_string()]);
    }
}
