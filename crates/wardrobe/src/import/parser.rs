use crate::domain::{normalize_subtype, Category, Color, Garment, GarmentId, ANY_FORMALITY};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::WardrobeImportError;

pub(crate) fn parse_garments<R: Read>(reader: R) -> Result<Vec<Garment>, WardrobeImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut garments = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|position| position.line()).unwrap_or_default();
        let row: WardrobeRow = record.deserialize(Some(&headers))?;
        garments.push(row.into_garment(line)?);
    }

    Ok(garments)
}

#[derive(Debug, Deserialize)]
struct WardrobeRow {
    #[serde(rename = "Id", default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Subtype")]
    subtype: String,
    #[serde(rename = "Color")]
    color: String,
    #[serde(rename = "Formality", default, deserialize_with = "empty_string_as_none")]
    formality: Option<String>,
}

impl WardrobeRow {
    fn into_garment(self, line: u64) -> Result<Garment, WardrobeImportError> {
        let invalid = |reason: String| WardrobeImportError::InvalidRow { line, reason };

        let category: Category = self
            .category
            .parse()
            .map_err(|err| invalid(format!("{err}")))?;
        let color: Color = self.color.parse().map_err(|err| invalid(format!("{err}")))?;
        let subtype = normalize_subtype(&self.subtype);
        if subtype.is_empty() {
            return Err(invalid("subtype must not be empty".to_string()));
        }

        Ok(Garment {
            id: self.id.map(GarmentId).unwrap_or_else(GarmentId::generate),
            name: self.name,
            category,
            subtype,
            color,
            formality: self
                .formality
                .map(|value| value.to_ascii_lowercase())
                .unwrap_or_else(|| ANY_FORMALITY.to_string()),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
