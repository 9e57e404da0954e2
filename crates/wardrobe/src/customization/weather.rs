use super::reference::{read_rows, require_label, split_list, ReferenceDataError, ReferenceTable};
use crate::domain::{normalize_subtype, Garment};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;

const IDEAL: u32 = 0;
const ACCEPTABLE: u32 = 1;
const UNSUITABLE: u32 = 3;
const NO_DATA: u32 = 0;

/// Ideal and unsuitable subtypes for one weather condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherRule {
    pub ideal: HashSet<String>,
    pub unsuitable: HashSet<String>,
}

/// Scores how well a subtype suits the simplified weather condition.
#[derive(Debug, Clone, Default)]
pub struct WeatherScorer {
    rules: HashMap<String, WeatherRule>,
}

impl WeatherScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, condition: &str, rule: WeatherRule) {
        self.rules.insert(normalize_subtype(condition), rule);
    }

    pub fn rule(&self, condition: &str) -> Option<&WeatherRule> {
        self.rules.get(&normalize_subtype(condition))
    }

    /// Every subtype named by any condition.
    pub fn subtypes(&self) -> impl Iterator<Item = &str> {
        self.rules
            .values()
            .flat_map(|rule| rule.ideal.iter().chain(rule.unsuitable.iter()))
            .map(String::as_str)
    }

    /// Missing or unrecognized conditions never penalize a garment.
    pub fn score(&self, garment: &Garment, condition: Option<&str>) -> u32 {
        let Some(rule) = condition.and_then(|condition| self.rule(condition)) else {
            return NO_DATA;
        };

        let subtype = normalize_subtype(&garment.subtype);
        if rule.ideal.contains(&subtype) {
            IDEAL
        } else if rule.unsuitable.contains(&subtype) {
            UNSUITABLE
        } else {
            ACCEPTABLE
        }
    }

    pub(crate) fn from_reader<R: Read>(reader: R) -> Result<Self, ReferenceDataError> {
        let table = ReferenceTable::Weather;
        let mut scorer = Self::new();

        for (line, row) in read_rows::<_, WeatherRow>(reader, table)? {
            let condition = require_label(table, line, "condition", &row.condition)?;
            let rule = WeatherRule {
                ideal: split_list(&row.ideal).collect(),
                unsuitable: split_list(&row.unsuitable).collect(),
            };
            scorer.rules.insert(condition, rule);
        }

        Ok(scorer)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherRow {
    condition: String,
    #[serde(default)]
    unsuitable: String,
    #[serde(default)]
    ideal: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Color, GarmentId};

    fn garment(subtype: &str) -> Garment {
        Garment {
            id: GarmentId(format!("{subtype}-1")),
            name: subtype.to_string(),
            category: Category::Footwear,
            subtype: subtype.to_string(),
            color: Color::Brown,
            formality: "any".to_string(),
        }
    }

    fn scorer() -> WeatherScorer {
        let csv = "condition,unsuitable,ideal\n\
rainy,\"sandals,suede shoes,rain boots\",\"rain boots,raincoat\"\n\
clear,,\n";
        WeatherScorer::from_reader(csv.as_bytes()).expect("weather table loads")
    }

    #[test]
    fn ideal_acceptable_and_unsuitable_scores() {
        let scorer = scorer();
        assert_eq!(scorer.score(&garment("raincoat"), Some("rainy")), 0);
        assert_eq!(scorer.score(&garment("sneakers"), Some("rainy")), 1);
        assert_eq!(scorer.score(&garment("sandals"), Some("rainy")), 3);
    }

    #[test]
    fn ideal_wins_when_subtype_is_listed_twice() {
        assert_eq!(scorer().score(&garment("rain boots"), Some("rainy")), 0);
    }

    #[test]
    fn unknown_or_missing_condition_is_neutral() {
        let scorer = scorer();
        for subtype in ["sandals", "raincoat", "sneakers"] {
            assert_eq!(scorer.score(&garment(subtype), Some("hail")), 0);
            assert_eq!(scorer.score(&garment(subtype), None), 0);
        }
    }

    #[test]
    fn condition_without_lists_scores_acceptable() {
        assert_eq!(scorer().score(&garment("sandals"), Some(" Clear ")), 1);
    }

    #[test]
    fn subtypes_lists_every_named_subtype() {
        let scorer = scorer();
        let mut subtypes: Vec<_> = scorer.subtypes().collect();
        subtypes.sort_unstable();
        subtypes.dedup();
        assert_eq!(
            subtypes,
            vec!["rain boots", "raincoat", "sandals", "suede shoes"]
        );
    }
}
