use super::reference::{read_rows, require_label, ReferenceDataError, ReferenceTable};
use super::ScoringError;
use crate::domain::{normalize_subtype, Garment};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;

/// Degrees outside the ideal range that still earn the mild penalty.
const BUFFER_F: f64 = 10.0;

const IDEAL: u32 = 0;
const NEAR: u32 = 2;
const FAR: u32 = 5;

/// Inclusive ideal temperature range in degrees Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min_f: f64,
    pub max_f: f64,
}

impl TemperatureRange {
    pub fn score(&self, temperature_f: f64) -> u32 {
        if temperature_f >= self.min_f && temperature_f <= self.max_f {
            IDEAL
        } else if temperature_f < self.min_f - BUFFER_F || temperature_f > self.max_f + BUFFER_F {
            FAR
        } else {
            NEAR
        }
    }
}

/// Scores how well a subtype suits the current temperature.
#[derive(Debug, Clone, Default)]
pub struct TemperatureScorer {
    ranges: HashMap<String, TemperatureRange>,
}

impl TemperatureScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, subtype: &str, range: TemperatureRange) {
        self.ranges.insert(normalize_subtype(subtype), range);
    }

    pub fn range(&self, subtype: &str) -> Option<&TemperatureRange> {
        self.ranges.get(&normalize_subtype(subtype))
    }

    pub fn contains(&self, subtype: &str) -> bool {
        self.range(subtype).is_some()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Returns 0 inside the range, 2 within ten degrees of it, 5 beyond that.
    pub fn score(&self, garment: &Garment, temperature_f: f64) -> Result<u32, ScoringError> {
        let range = self
            .range(&garment.subtype)
            .ok_or_else(|| ScoringError::UnknownSubtype {
                subtype: garment.subtype.clone(),
            })?;
        Ok(range.score(temperature_f))
    }

    pub(crate) fn from_reader<R: Read>(reader: R) -> Result<Self, ReferenceDataError> {
        let table = ReferenceTable::Temperature;
        let mut scorer = Self::new();

        for (line, row) in read_rows::<_, TemperatureRow>(reader, table)? {
            let subtype = require_label(table, line, "subtype", &row.subtype)?;
            if row.min_temp_f > row.max_temp_f {
                return Err(ReferenceDataError::InvalidRow {
                    table,
                    line,
                    reason: format!(
                        "min_temp_f {} exceeds max_temp_f {} for '{subtype}'",
                        row.min_temp_f, row.max_temp_f
                    ),
                });
            }

            scorer.ranges.insert(
                subtype,
                TemperatureRange {
                    min_f: row.min_temp_f,
                    max_f: row.max_temp_f,
                },
            );
        }

        Ok(scorer)
    }
}

#[derive(Debug, Deserialize)]
struct TemperatureRow {
    subtype: String,
    min_temp_f: f64,
    max_temp_f: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Color, GarmentId};

    fn garment(subtype: &str) -> Garment {
        Garment {
            id: GarmentId(format!("{subtype}-1")),
            name: subtype.to_string(),
            category: Category::Top,
            subtype: subtype.to_string(),
            color: Color::Black,
            formality: "any".to_string(),
        }
    }

    fn scorer() -> TemperatureScorer {
        let mut scorer = TemperatureScorer::new();
        scorer.insert(
            "sweater",
            TemperatureRange {
                min_f: 50.0,
                max_f: 70.0,
            },
        );
        scorer
    }

    #[test]
    fn scores_by_distance_from_ideal_range() {
        let scorer = scorer();
        let sweater = garment("sweater");

        assert_eq!(scorer.score(&sweater, 55.0).unwrap(), 0);
        assert_eq!(scorer.score(&sweater, 45.0).unwrap(), 2);
        assert_eq!(scorer.score(&sweater, 30.0).unwrap(), 5);
        assert_eq!(scorer.score(&sweater, 81.0).unwrap(), 5);
    }

    #[test]
    fn range_edges_are_inclusive() {
        let scorer = scorer();
        let sweater = garment("sweater");

        assert_eq!(scorer.score(&sweater, 50.0).unwrap(), 0);
        assert_eq!(scorer.score(&sweater, 70.0).unwrap(), 0);
        assert_eq!(scorer.score(&sweater, 40.0).unwrap(), 2);
        assert_eq!(scorer.score(&sweater, 80.0).unwrap(), 2);
        assert_eq!(scorer.score(&sweater, 39.5).unwrap(), 5);
    }

    #[test]
    fn unknown_subtype_is_a_lookup_error() {
        let error = scorer()
            .score(&garment("kilt"), 60.0)
            .expect_err("kilt has no range");
        assert_eq!(
            error,
            ScoringError::UnknownSubtype {
                subtype: "kilt".to_string()
            }
        );
    }

    #[test]
    fn lookup_ignores_case_and_spacing() {
        assert_eq!(scorer().score(&garment(" Sweater "), 60.0).unwrap(), 0);
    }

    #[test]
    fn loader_rejects_inverted_ranges() {
        let csv = "subtype,min_temp_f,max_temp_f\nparka,40,-10\n";
        let error = TemperatureScorer::from_reader(csv.as_bytes()).expect_err("inverted range");
        match error {
            ReferenceDataError::InvalidRow { line, reason, .. } => {
                assert_eq!(line, 2);
                assert!(reason.contains("parka"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn loader_rejects_blank_subtypes() {
        let csv = "subtype,min_temp_f,max_temp_f\n ,40,60\n";
        assert!(matches!(
            TemperatureScorer::from_reader(csv.as_bytes()),
            Err(ReferenceDataError::InvalidRow { .. })
        ));
    }
}
