pub mod library;
pub mod selector;
pub mod weights;

// Re-export for convenience
pub use library::{Catalog, CatalogError, PinDef, PinRole, Position, Property, Template};
pub use selector::{CatalogSelector, PartPick};
pub use weights::{WeightEntry, WeightTable, WeightTableError};
