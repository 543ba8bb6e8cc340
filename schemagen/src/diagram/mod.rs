pub mod layout;
pub mod model;

// Re-export for convenience
pub use layout::LayoutEngine;
pub use model::{Diagram, Instance, Pin, PinRef, Wire};
