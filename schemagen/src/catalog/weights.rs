//! Weight-table loading.
//!
//! The table is a line-oriented side file: three whitespace-separated fields
//! per line (template name, category code, relative weight). Malformed lines
//! abort the load; nothing is generated from a bad table.

use std::path::Path;

/// Error type for weight-table loading.
#[derive(Debug, thiserror::Error)]
pub enum WeightTableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed weight entry at line {line}: {content:?}")]
    Malformed { line: usize, content: String },
}

/// One weighted template entry.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEntry {
    pub name: String,
    pub category: String,
    pub weight: f64,
}

/// The full table, in file order.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    entries: Vec<WeightEntry>,
}

impl WeightTable {
    pub fn from_file(path: &Path) -> Result<WeightTable, WeightTableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_source(&content)
    }

    pub fn from_source(content: &str) -> Result<WeightTable, WeightTableError> {
        let mut entries = Vec::new();
        for (idx, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            let malformed = || WeightTableError::Malformed {
                line: idx + 1,
                content: raw.to_string(),
            };
            if fields.len() != 3 {
                return Err(malformed());
            }
            let weight: f64 = fields[2].parse().map_err(|_| malformed())?;
            entries.push(WeightEntry {
                name: fields[0].to_string(),
                category: fields[1].to_string(),
                weight,
            });
        }
        Ok(WeightTable { entries })
    }

    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }

    /// The (name, weight) candidates of one category, preserving file order.
    pub fn candidates(&self, category: &str) -> Vec<(&str, f64)> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| (e.name.as_str(), e.weight))
            .collect()
    }
}
