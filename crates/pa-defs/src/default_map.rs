use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The resolved contract of the game's `default.map` descriptor: where the
/// map's files live and how many provinces the map declares.
///
/// Parsing the game-script source of that file is a collaborator's concern;
/// pipelines hand this struct to the loaders already filled in. Paths are
/// virtual, relative to the `map` directory of whichever content root the
/// caller resolves them against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultMap {
    /// Declared province count (the highest real id plus one).
    #[serde(default)]
    pub provinces: u32,

    #[serde(default = "default_definitions_path")]
    pub definitions_path: PathBuf,

    #[serde(default = "default_province_map_path")]
    pub province_map_path: PathBuf,

    #[serde(default = "default_adjacencies_path")]
    pub adjacencies_path: PathBuf,
}

impl DefaultMap {
    pub fn definitions_path(&self) -> &Path {
        &self.definitions_path
    }

    pub fn province_map_path(&self) -> &Path {
        &self.province_map_path
    }

    pub fn adjacencies_path(&self) -> &Path {
        &self.adjacencies_path
    }
}

impl Default for DefaultMap {
    fn default() -> Self {
        Self {
            provinces: 0,
            definitions_path: default_definitions_path(),
            province_map_path: default_province_map_path(),
            adjacencies_path: default_adjacencies_path(),
        }
    }
}

fn default_definitions_path() -> PathBuf {
    PathBuf::from("definition.csv")
}

fn default_province_map_path() -> PathBuf {
    PathBuf::from("provinces.bmp")
}

fn default_adjacencies_path() -> PathBuf {
    PathBuf::from("adjacencies.csv")
}
