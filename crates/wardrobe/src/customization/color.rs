use super::reference::{read_rows, ReferenceDataError, ReferenceTable};
use crate::domain::{Color, Garment};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::io::Read;

/// Scores a candidate's color against the colors already in the outfit.
///
/// Clashes are looked up from the candidate's color only, so a table listing
/// `red -> pink` penalizes a red candidate next to pink but not the reverse.
#[derive(Debug, Clone, Default)]
pub struct ColorScorer {
    clashes: HashMap<Color, HashSet<Color>>,
}

impl ColorScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<I>(&mut self, color: Color, clashes: I)
    where
        I: IntoIterator<Item = Color>,
    {
        self.clashes.insert(color, clashes.into_iter().collect());
    }

    pub fn clashes_with(&self, candidate: Color, other: Color) -> bool {
        self.clashes
            .get(&candidate)
            .is_some_and(|clashes| clashes.contains(&other))
    }

    /// One point per outfit member whose color clashes with the candidate.
    pub fn score(&self, garment: &Garment, outfit: &[Garment]) -> u32 {
        outfit
            .iter()
            .filter(|chosen| self.clashes_with(garment.color, chosen.color))
            .count() as u32
    }

    pub(crate) fn from_reader<R: Read>(reader: R) -> Result<Self, ReferenceDataError> {
        let table = ReferenceTable::Color;
        let mut scorer = Self::new();

        for (line, row) in read_rows::<_, ColorRow>(reader, table)? {
            let invalid = |reason: String| ReferenceDataError::InvalidRow {
                table,
                line,
                reason,
            };
            let color: Color = row.color.parse().map_err(|err| invalid(format!("{err}")))?;
            let clashes = row
                .incompatible
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(|entry| entry.parse::<Color>())
                .collect::<Result<HashSet<_>, _>>()
                .map_err(|err| invalid(format!("{err}")))?;

            scorer.clashes.insert(color, clashes);
        }

        Ok(scorer)
    }
}

#[derive(Debug, Deserialize)]
struct ColorRow {
    color: String,
    #[serde(default)]
    incompatible: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, GarmentId};

    fn garment(id: &str, color: Color) -> Garment {
        Garment {
            id: GarmentId(id.to_string()),
            name: id.to_string(),
            category: Category::Top,
            subtype: "t-shirt".to_string(),
            color,
            formality: "any".to_string(),
        }
    }

    fn scorer() -> ColorScorer {
        let mut scorer = ColorScorer::new();
        scorer.insert(Color::Red, [Color::Pink, Color::Orange]);
        scorer
    }

    #[test]
    fn empty_outfit_scores_zero() {
        assert_eq!(scorer().score(&garment("shirt", Color::Red), &[]), 0);
    }

    #[test]
    fn penalizes_each_clashing_member() {
        let outfit = vec![
            garment("a", Color::Pink),
            garment("b", Color::Orange),
            garment("c", Color::Black),
        ];
        assert_eq!(scorer().score(&garment("shirt", Color::Red), &outfit), 2);
    }

    #[test]
    fn lookup_is_directional() {
        let outfit = vec![garment("a", Color::Red)];
        assert_eq!(scorer().score(&garment("shirt", Color::Pink), &outfit), 0);
    }

    #[test]
    fn missing_color_entry_means_no_penalty() {
        let outfit = vec![garment("a", Color::Red)];
        assert_eq!(scorer().score(&garment("shirt", Color::Green), &outfit), 0);
    }

    #[test]
    fn loader_rejects_colors_outside_palette() {
        let csv = "color,incompatible\nred,\"pink,chartreuse\"\n";
        let error = ColorScorer::from_reader(csv.as_bytes()).expect_err("unknown color");
        match error {
            ReferenceDataError::InvalidRow { reason, .. } => {
                assert!(reason.contains("chartreuse"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn loader_parses_lists() {
        let csv = "color,incompatible\nnavy-blue,\"black, brown\"\nwhite,\n";
        let scorer = ColorScorer::from_reader(csv.as_bytes()).expect("colors load");
        assert!(scorer.clashes_with(Color::NavyBlue, Color::Black));
        assert!(scorer.clashes_with(Color::NavyBlue, Color::Brown));
        assert!(!scorer.clashes_with(Color::White, Color::Black));
    }
}
