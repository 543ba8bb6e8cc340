//! Generation drivers shared by CLI and library callers.
//!
//! One run produces exactly one diagram and one document, end to end, with
//! no shared mutable state beyond the read-only catalogs and weight table;
//! batch generation is a loop of independent runs.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogSelector, WeightTable};
use crate::diagram::LayoutEngine;
use crate::topology::{TopologyBuilder, TopologyError};
use crate::writer::SchematicWriter;

#[derive(Debug, thiserror::Error)]
pub enum SchemagenError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::catalog::CatalogError),
    #[error("Weight table error: {0}")]
    Weights(#[from] crate::catalog::WeightTableError),
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No catalogs were imported")]
    NoCatalogs,
}

/// Options for a single document generation run.
#[derive(Clone, Debug, Serialize)]
pub struct GenerationOptions {
    /// Template name of the fixed source part selected first.
    pub source_name: String,
    /// Template name of the ground/reference part appended last.
    pub ground_name: String,
    /// Pretty-print nesting cap handed to the document encoder.
    pub max_nesting: usize,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            source_name: "VSOURCE".to_string(),
            ground_name: "0".to_string(),
            max_nesting: 4,
        }
    }
}

/// Options for a batch of independent runs.
#[derive(Clone, Debug, Serialize)]
pub struct BatchOptions {
    /// Target document count.
    pub count: usize,
    /// Inclusive per-document part-count range.
    pub min_parts: usize,
    pub max_parts: usize,
    pub options: GenerationOptions,
}

/// Outcome of a batch. A failed document is simply absent from the output
/// directory; this summary is a convenience, not a contract.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub requested: usize,
    pub written: usize,
    pub failed: usize,
}

/// Core generation API used by both library callers and the CLI.
pub struct SchemagenCore;

impl SchemagenCore {
    /// Generate one schematic document.
    ///
    /// A fresh selector (and so a fresh rename-counter set) is created for
    /// the run; all randomness is drawn from `rng`.
    pub fn generate_document<R: Rng>(
        catalogs: &[Catalog],
        weights: &WeightTable,
        part_count: usize,
        options: &GenerationOptions,
        rng: &mut R,
    ) -> Result<String, SchemagenError> {
        if catalogs.is_empty() {
            return Err(SchemagenError::NoCatalogs);
        }
        let selector = CatalogSelector::new(catalogs);
        let builder = TopologyBuilder::new(selector, weights);
        let mut diagram = builder.build(
            part_count,
            &options.source_name,
            &options.ground_name,
            rng,
        )?;

        LayoutEngine::assign_positions(&mut diagram);
        diagram.finalize_positions();

        let writer = SchematicWriter::new(options.max_nesting);
        Ok(writer.render(&diagram, rng))
    }

    /// Generate a batch of independent documents into `out_dir`, one file
    /// per index (`0.kicad_sch`, `1.kicad_sch`, ...).
    ///
    /// A topology failure abandons only that document; the batch moves on
    /// and the index is left absent from the directory.
    pub fn generate_batch<R: Rng>(
        catalogs: &[Catalog],
        weights: &WeightTable,
        batch: &BatchOptions,
        out_dir: &Path,
        rng: &mut R,
    ) -> Result<BatchSummary, SchemagenError> {
        if catalogs.is_empty() {
            return Err(SchemagenError::NoCatalogs);
        }
        std::fs::create_dir_all(out_dir)?;

        let mut written = 0;
        let mut failed = 0;
        for index in 0..batch.count {
            let part_count = rng.gen_range(batch.min_parts..=batch.max_parts);
            match Self::generate_document(catalogs, weights, part_count, &batch.options, rng) {
                Ok(content) => {
                    let path = out_dir.join(format!("{}.kicad_sch", index));
                    std::fs::write(&path, content)?;
                    info!(document = index, parts = part_count, "generated schematic");
                    written += 1;
                }
                Err(SchemagenError::Topology(err)) => {
                    warn!(document = index, error = %err, "abandoned document");
                    failed += 1;
                }
                Err(other) => return Err(other),
            }
        }

        Ok(BatchSummary {
            requested: batch.count,
            written,
            failed,
        })
    }
}

/// Import catalogs, dropping any that fail to load with a logged warning.
pub fn import_catalogs(paths: &[PathBuf]) -> Vec<Catalog> {
    let mut catalogs = Vec::new();
    for path in paths {
        match Catalog::from_file(path) {
            Ok(catalog) => catalogs.push(catalog),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not import catalog");
            }
        }
    }
    catalogs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_without_catalogs_fails() {
        let weights = WeightTable::default();
        let mut rng = StdRng::seed_from_u64(0);
        let err = SchemagenCore::generate_document(
            &[],
            &weights,
            3,
            &GenerationOptions::default(),
            &mut rng,
        );
        assert!(matches!(err, Err(SchemagenError::NoCatalogs)));
    }

    #[test]
    fn test_import_catalogs_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.kicad_sym");
        let bad = dir.path().join("bad.kicad_sym");
        std::fs::write(
            &good,
            "(kicad_symbol_lib (symbol \"R\" (property \"Reference\" \"R\" (at 0 0 0))))",
        )
        .unwrap();
        std::fs::write(&bad, "not an s-expression library").unwrap();

        let catalogs = import_catalogs(&[good, bad, dir.path().join("missing.kicad_sym")]);
        assert_eq!(catalogs.len(), 1);
        assert_eq!(catalogs[0].name, "good");
    }
}
