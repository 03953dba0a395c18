//! Paraxial province-edge extraction from an id grid.
//!
//! This crate turns the dense grid of province ids into the set of maximal
//! border polylines, in two phases:
//! - A single row-major scan emits every maximal axis-aligned segment
//!   separating unlike 4-connected neighbors. One open horizontal segment
//!   and one open vertical segment per boundary column are enough state for
//!   the whole pass.
//! - A joining phase welds segments that meet end-to-end with the same
//!   province relation into maximal polylines, via a multimap from lattice
//!   point to edge index. At any point at most one candidate can match a
//!   given edge's relation, so joining never has a choice to make and the
//!   result is a pure function of the grid.
//!
//! Borders are lattice lines between 4-connected pixels, never
//! pixel-diagonal. Edges of different relations may cross or touch at a
//! shared corner and remain distinct; an island border closes into a loop
//! whose front and back knots coincide.

mod build;
mod edge;

pub use build::build_edge_set;
pub use edge::{Edge, EdgeSet, ScanStats};
