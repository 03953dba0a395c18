//! Umbrella crate for the `province-atlas` workspace.
//!
//! Re-exports the map-processing pipeline end to end: definitions table and
//! color index, province grid loading, and border-edge extraction.

pub use pa_core::*;
pub use pa_defs::*;
pub use pa_edge::*;
pub use pa_grid::*;
