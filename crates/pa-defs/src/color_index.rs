use std::collections::HashMap;
use std::path::Path;

use pa_core::{DuplicateKind, MapError, ProvinceId, Rgb};

use crate::table::DefinitionsTable;

/// Build-once mapping from 24-bit color to province id, consumed by the
/// bitmap loader. Read-only after construction.
///
/// Pure white and pure black are resolved by the loader's reserved-id fast
/// paths ahead of the table, so a definitions row claiming either color
/// would be silently shadowed; [`ColorIndex::build`] rejects such rows
/// instead of letting that happen.
#[derive(Debug, Clone, Default)]
pub struct ColorIndex {
    map: HashMap<Rgb, ProvinceId>,
}

impl ColorIndex {
    pub fn build(path: &Path, table: &DefinitionsTable) -> Result<Self, MapError> {
        let mut map = HashMap::with_capacity(table.len());

        for row in table.iter() {
            let duplicate = |kind| MapError::DuplicateDefinition {
                path: path.to_path_buf(),
                id: row.id,
                kind,
            };

            if row.color == Rgb::WHITE || row.color == Rgb::BLACK {
                return Err(duplicate(DuplicateKind::Color));
            }
            if map.insert(row.color, row.id).is_some() {
                return Err(duplicate(DuplicateKind::Color));
            }
        }

        Ok(Self { map })
    }

    /// Resolves a color to its province id. A miss is not an error here; the
    /// grid loader decides what a miss means for the pixel in hand.
    pub fn lookup(&self, color: Rgb) -> Option<ProvinceId> {
        self.map.get(&color).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pa_core::{DuplicateKind, MapError, Rgb};

    use super::ColorIndex;
    use crate::table::DefinitionsTable;

    fn index(text: &str) -> Result<ColorIndex, MapError> {
        let path = Path::new("definition.csv");
        let table = DefinitionsTable::parse(path, text.as_bytes()).expect("valid table");
        ColorIndex::build(path, &table)
    }

    #[test]
    fn lookup_hits_and_misses() {
        let idx = index("1;10;20;30;A;x\n2;40;50;60;B;x\n").expect("valid index");

        assert_eq!(idx.len(), 2);
        assert_eq!(idx.lookup(Rgb::new(10, 20, 30)), Some(1));
        assert_eq!(idx.lookup(Rgb::new(40, 50, 60)), Some(2));
        assert_eq!(idx.lookup(Rgb::new(1, 1, 1)), None);
    }

    #[test]
    fn duplicate_color_is_rejected() {
        let err = index("1;10;20;30;A;x\n2;10;20;30;B;x\n").expect_err("duplicate color");
        match err {
            MapError::DuplicateDefinition { id, kind, .. } => {
                assert_eq!(id, 2);
                assert_eq!(kind, DuplicateKind::Color);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn reserved_colors_are_rejected() {
        assert!(index("1;255;255;255;Whiteout;x\n").is_err());
        assert!(index("1;0;0;0;Blackout;x\n").is_err());
    }

    #[test]
    fn reserved_colors_never_resolve() {
        let idx = index("1;10;20;30;A;x\n").expect("valid index");
        assert_eq!(idx.lookup(Rgb::WHITE), None);
        assert_eq!(idx.lookup(Rgb::BLACK), None);
    }
}
