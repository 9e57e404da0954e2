mod parser;

use crate::domain::Garment;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum WardrobeImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { line: u64, reason: String },
}

impl std::fmt::Display for WardrobeImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WardrobeImportError::Io(err) => write!(f, "failed to read wardrobe export: {}", err),
            WardrobeImportError::Csv(err) => write!(f, "invalid wardrobe CSV data: {}", err),
            WardrobeImportError::InvalidRow { line, reason } => {
                write!(f, "invalid wardrobe row at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for WardrobeImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WardrobeImportError::Io(err) => Some(err),
            WardrobeImportError::Csv(err) => Some(err),
            WardrobeImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for WardrobeImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for WardrobeImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads wardrobe exports with `Name,Category,Subtype,Color,Formality` columns
/// and an optional `Id` column.
pub struct WardrobeImporter;

impl WardrobeImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Garment>, WardrobeImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Garment>, WardrobeImportError> {
        parser::parse_garments(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Color, GarmentId};
    use std::io::Cursor;

    #[test]
    fn importer_normalizes_rows() {
        let csv = "Id,Name,Category,Subtype,Color,Formality\n\
shirt-1,White Oxford,Top,\u{feff}Button  Up,White,Formal\n\
,Trail Runners,footwear,sneakers,Navy Blue,\n";
        let garments = WardrobeImporter::from_reader(Cursor::new(csv)).expect("import succeeds");

        assert_eq!(garments.len(), 2);
        let oxford = &garments[0];
        assert_eq!(oxford.id, GarmentId("shirt-1".to_string()));
        assert_eq!(oxford.category, Category::Top);
        assert_eq!(oxford.subtype, "button up");
        assert_eq!(oxford.formality, "formal");

        let runners = &garments[1];
        assert!(runners.id.0.starts_with("item-"));
        assert_eq!(runners.color, Color::NavyBlue);
        assert_eq!(runners.formality, "any");
    }

    #[test]
    fn importer_works_without_id_column() {
        let csv = "Name,Category,Subtype,Color,Formality\nBeanie,headwear,beanie,grey,casual\n";
        let garments = WardrobeImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(garments[0].category, Category::Headwear);
    }

    #[test]
    fn importer_reports_line_of_invalid_row() {
        let csv = "Name,Category,Subtype,Color,Formality\n\
Tee,top,t-shirt,black,casual\n\
Scarf,neckwear,scarf,red,casual\n";
        let error = WardrobeImporter::from_reader(Cursor::new(csv)).expect_err("bad category");

        match error {
            WardrobeImportError::InvalidRow { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("neckwear"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn importer_rejects_unknown_colors() {
        let csv = "Name,Category,Subtype,Color,Formality\nTee,top,t-shirt,chartreuse,casual\n";
        assert!(matches!(
            WardrobeImporter::from_reader(Cursor::new(csv)),
            Err(WardrobeImportError::InvalidRow { .. })
        ));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = WardrobeImporter::from_path("./does-not-exist.csv").expect_err("io error");
        match error {
            WardrobeImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
