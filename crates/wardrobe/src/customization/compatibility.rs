use super::reference::{read_rows, require_label, ReferenceDataError, ReferenceTable};
use crate::domain::{normalize_subtype, Garment};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Weight applied when two subtypes share no edge.
pub const NEUTRAL_WEIGHT: u32 = 3;

/// Weighted undirected graph of how well subtypes pair. Lower weights pair better.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityScorer {
    graph: HashMap<String, HashMap<String, u32>>,
}

impl CompatibilityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the edge in both directions, replacing any earlier weight.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: u32) {
        let a = normalize_subtype(a);
        let b = normalize_subtype(b);
        self.graph
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), weight);
        self.graph.entry(b).or_default().insert(a, weight);
    }

    pub fn weight(&self, a: &str, b: &str) -> u32 {
        self.graph
            .get(&normalize_subtype(a))
            .and_then(|edges| edges.get(&normalize_subtype(b)))
            .copied()
            .unwrap_or(NEUTRAL_WEIGHT)
    }

    pub fn subtypes(&self) -> impl Iterator<Item = &str> {
        self.graph.keys().map(String::as_str)
    }

    pub fn score(&self, garment: &Garment, outfit: &[Garment]) -> u32 {
        outfit
            .iter()
            .map(|chosen| self.weight(&garment.subtype, &chosen.subtype))
            .sum()
    }

    pub(crate) fn from_reader<R: Read>(reader: R) -> Result<Self, ReferenceDataError> {
        let table = ReferenceTable::Compatibility;
        let mut scorer = Self::new();

        for (line, row) in read_rows::<_, CompatibilityRow>(reader, table)? {
            let a = require_label(table, line, "subtype_a", &row.subtype_a)?;
            let b = require_label(table, line, "subtype_b", &row.subtype_b)?;
            scorer.add_edge(&a, &b, row.weight);
        }

        Ok(scorer)
    }
}

#[derive(Debug, Deserialize)]
struct CompatibilityRow {
    subtype_a: String,
    subtype_b: String,
    weight: u32,
}
