//! Schemagen - randomized KiCad schematic synthesis library
//!
//! This library synthesizes batches of randomized, structurally valid
//! schematic documents from catalogs of reusable part templates, for
//! populating simulation toolchains with synthetic test data.
//!
//! # Quick Start
//!
//! ```no_run
//! use schemagen::{import_catalogs, GenerationOptions, SchemagenCore, WeightTable};
//! use std::path::{Path, PathBuf};
//!
//! let catalogs = import_catalogs(&[PathBuf::from("pspice.kicad_sym")]);
//! let weights = WeightTable::from_file(Path::new("weights.conf")).unwrap();
//!
//! let mut rng = rand::thread_rng();
//! let document = SchemagenCore::generate_document(
//!     &catalogs,
//!     &weights,
//!     20,
//!     &GenerationOptions::default(),
//!     &mut rng,
//! ).unwrap();
//! println!("{document}");
//! ```
//!
//! # Features
//!
//! - **Weighted selection**: roulette category draws plus weighted
//!   intra-category template picks
//! - **Closed topology**: every non-ground part wired into one loop, with
//!   family-specific grounding taps
//! - **Deterministic layout**: near-circular quadrant placement
//! - **Document assembly**: `kicad_sch` s-expressions with simulation
//!   annotations

pub mod catalog;
pub mod core;
pub mod diagram;
pub mod topology;
pub mod writer;

// Re-export main types
pub use crate::core::{
    import_catalogs, BatchOptions, BatchSummary, GenerationOptions, SchemagenCore, SchemagenError,
};
pub use catalog::{Catalog, CatalogError, CatalogSelector, Template, WeightTable, WeightTableError};
pub use diagram::{Diagram, LayoutEngine};
pub use topology::{TopologyBuilder, TopologyError};
pub use writer::SchematicWriter;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        import_catalogs, BatchOptions, BatchSummary, GenerationOptions, SchemagenCore,
        SchemagenError, WeightTable,
    };
}
