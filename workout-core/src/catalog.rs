//! The static set of workout blocks a user can pick from.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::format_km;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("catalog contains no blocks")]
    Empty,
    #[error("duplicate block id: {0}")]
    DuplicateId(String),
    #[error("block at position {0} has an empty id")]
    EmptyId(usize),
    #[error("block {0} has an empty name")]
    EmptyContent(String),
    #[error("block {id} has invalid distance {km}")]
    InvalidDistance { id: String, km: f64 },
}

/// A predefined workout segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    pub content: String,
    pub km: f64,
}

impl Block {
    pub fn new(id: impl Into<String>, content: impl Into<String>, km: f64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            km,
        }
    }

    /// Display text used both in the block list and in log entries.
    pub fn label(&self) -> String {
        format!("{} - {} km", self.content, format_km(self.km))
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    blocks: Vec<Block>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            blocks: vec![
                Block::new("1", "Warm-up", 2.0),
                Block::new("2", "Active", 5.0),
                Block::new("3", "Cool-down", 3.0),
                Block::new("4", "Step Repeats", 4.0),
                Block::new("5", "Ramp Up", 6.0),
                Block::new("6", "Ramp Down", 4.0),
            ],
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, CatalogError> {
        if blocks.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::new();
        for (idx, block) in blocks.iter().enumerate() {
            if block.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(idx));
            }
            if !seen.insert(block.id.as_str()) {
                return Err(CatalogError::DuplicateId(block.id.clone()));
            }
            if block.content.trim().is_empty() {
                return Err(CatalogError::EmptyContent(block.id.clone()));
            }
            if !block.km.is_finite() || block.km <= 0.0 {
                return Err(CatalogError::InvalidDistance {
                    id: block.id.clone(),
                    km: block.km,
                });
            }
        }
        Ok(Self { blocks })
    }

    /// Load a catalog file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file: CatalogFile = if is_json {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Self::from_blocks(file.blocks)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_is_valid() {
        let builtin = Catalog::builtin();
        let validated = Catalog::from_blocks(builtin.blocks().to_vec()).unwrap();
        assert_eq!(validated.len(), 6);
        assert_eq!(validated.find("4").unwrap().content, "Step Repeats");
    }

    #[test]
    fn label_drops_trailing_zero_fraction() {
        assert_eq!(Block::new("1", "Warm-up", 2.0).label(), "Warm-up - 2 km");
        assert_eq!(Block::new("9", "Tempo", 2.5).label(), "Tempo - 2.5 km");
    }

    #[test]
    fn label_keeps_every_catalog_decimal() {
        assert_eq!(Block::new("x", "Tempo", 1.125).label(), "Tempo - 1.125 km");
    }

    #[test]
    fn rejects_invalid_catalogs() {
        assert!(matches!(
            Catalog::from_blocks(vec![]),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            Catalog::from_blocks(vec![Block::new(" ", "A", 1.0)]),
            Err(CatalogError::EmptyId(0))
        ));
        assert!(matches!(
            Catalog::from_blocks(vec![Block::new("1", "A", 1.0), Block::new("1", "B", 2.0)]),
            Err(CatalogError::DuplicateId(id)) if id == "1"
        ));
        assert!(matches!(
            Catalog::from_blocks(vec![Block::new("1", "", 1.0)]),
            Err(CatalogError::EmptyContent(_))
        ));
        assert!(matches!(
            Catalog::from_blocks(vec![Block::new("1", "A", 0.0)]),
            Err(CatalogError::InvalidDistance { .. })
        ));
        assert!(matches!(
            Catalog::from_blocks(vec![Block::new("1", "A", f64::NAN)]),
            Err(CatalogError::InvalidDistance { .. })
        ));
    }

    #[test]
    fn loads_yaml_and_json_files() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            yaml,
            "blocks:\n  - id: a\n    content: Hills\n    km: 7.5\n  - id: b\n    content: Easy\n    km: 3"
        )
        .unwrap();
        let catalog = Catalog::load(yaml.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().km, 7.5);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            json,
            r#"{{"blocks":[{{"id":"x","content":"Sprint","km":1}}]}}"#
        )
        .unwrap();
        let catalog = Catalog::load(json.path()).unwrap();
        assert_eq!(catalog.find("x").unwrap().label(), "Sprint - 1 km");
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/catalog.yaml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn load_validates_parsed_blocks() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"blocks":[]}}"#).unwrap();
        assert!(matches!(
            Catalog::load(json.path()),
            Err(CatalogError::Empty)
        ));
    }
}
