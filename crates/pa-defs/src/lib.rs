//! Configuration model for the map pipeline.
//!
//! Three text-file contracts feed the loaders:
//! - the definitions table (`definition.csv`), mapping province ids to
//!   display colors and names;
//! - the default-map descriptor, naming the map's files and declared
//!   province count (parsing the game-script source of that file is a
//!   collaborator's job; this crate models only the resolved result);
//! - the adjacencies file (`adjacencies.csv`), listing special connections
//!   such as straits and major rivers.
//!
//! The [`ColorIndex`] built from a definitions table is the one-shot
//! color-to-id mapping consumed by the bitmap loader. The two reserved
//! colors (pure white for ocean, pure black for impassable) are never in the
//! index; a definitions row claiming either is rejected at build time.

mod adjacency;
mod color_index;
mod default_map;
mod table;

pub use adjacency::{AdjacenciesFile, Adjacency};
pub use color_index::ColorIndex;
pub use default_map::DefaultMap;
pub use table::{DefinitionRow, DefinitionsTable};
