use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::path::Path;

use log::debug;
use pa_core::{DuplicateKind, MapError, ProvinceId, REAL_ID_MAX, Rgb};

/// One row of the definitions table: `(id, color, name, trailing)`.
///
/// `trailing` preserves whatever followed the name field, verbatim, so that
/// tables carrying extra columns survive a parse/write round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRow {
    pub id: ProvinceId,
    pub color: Rgb,
    pub name: String,
    pub trailing: String,
}

/// The parsed definitions table. Row order follows the file.
#[derive(Debug, Clone, Default)]
pub struct DefinitionsTable {
    rows: Vec<DefinitionRow>,
}

impl DefinitionsTable {
    /// Parses a semicolon-delimited table: `id;r;g;b;name[;trailing]`.
    ///
    /// Blank lines are skipped, as is a leading header line whose first
    /// field is not numeric. Duplicate ids fail with
    /// [`MapError::DuplicateDefinition`].
    pub fn parse(path: &Path, reader: impl BufRead) -> Result<Self, MapError> {
        let mut rows: Vec<DefinitionRow> = Vec::new();
        let mut seen_ids: HashSet<ProvinceId> = HashSet::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|source| MapError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let lineno = idx + 1;
            let line = line.trim_end_matches('\r');

            if line.is_empty() {
                continue;
            }
            if lineno == 1 && !line.starts_with(|c: char| c.is_ascii_digit()) {
                continue; // header line
            }

            let row = parse_row(path, lineno, line)?;
            if !seen_ids.insert(row.id) {
                return Err(MapError::DuplicateDefinition {
                    path: path.to_path_buf(),
                    id: row.id,
                    kind: DuplicateKind::Id,
                });
            }
            rows.push(row);
        }

        debug!(
            "definitions table {}: {} provinces",
            path.display(),
            rows.len()
        );
        Ok(Self { rows })
    }

    /// Writes the table back out in the same `id;r;g;b;name[;trailing]`
    /// format it was parsed from.
    pub fn write(&self, mut w: impl Write) -> io::Result<()> {
        for row in &self.rows {
            let Rgb { r, g, b } = row.color;
            if row.trailing.is_empty() {
                writeln!(w, "{};{};{};{};{}", row.id, r, g, b, row.name)?;
            } else {
                writeln!(
                    w,
                    "{};{};{};{};{};{}",
                    row.id, r, g, b, row.name, row.trailing
                )?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[DefinitionRow] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &DefinitionRow> {
        self.rows.iter()
    }

    pub fn color_of(&self, id: ProvinceId) -> Option<Rgb> {
        self.rows.iter().find(|row| row.id == id).map(|row| row.color)
    }
}

fn parse_row(path: &Path, lineno: usize, line: &str) -> Result<DefinitionRow, MapError> {
    let malformed = |detail: String| MapError::MalformedRow {
        path: path.to_path_buf(),
        line: lineno,
        detail,
    };

    let mut fields = line.splitn(6, ';');
    let mut next = |what: &str| {
        fields
            .next()
            .ok_or_else(|| malformed(format!("missing {what} field")))
    };

    let id: u32 = parse_field(next("id")?, "id").map_err(&malformed)?;
    let r: u8 = parse_field(next("red")?, "red").map_err(&malformed)?;
    let g: u8 = parse_field(next("green")?, "green").map_err(&malformed)?;
    let b: u8 = parse_field(next("blue")?, "blue").map_err(&malformed)?;
    let name = next("name")?.to_owned();
    let trailing = fields.next().unwrap_or("").to_owned();

    if id == 0 || id > REAL_ID_MAX as u32 {
        return Err(malformed(format!(
            "province id {id} outside the real id range 1..={REAL_ID_MAX}"
        )));
    }

    Ok(DefinitionRow {
        id: id as ProvinceId,
        color: Rgb::new(r, g, b),
        name,
        trailing,
    })
}

fn parse_field<T: std::str::FromStr>(field: &str, what: &str) -> Result<T, String> {
    field
        .trim()
        .parse()
        .map_err(|_| format!("invalid {what} value {field:?}"))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pa_core::{DuplicateKind, MapError, Rgb};

    use super::DefinitionsTable;

    fn parse(text: &str) -> Result<DefinitionsTable, MapError> {
        DefinitionsTable::parse(Path::new("definition.csv"), text.as_bytes())
    }

    #[test]
    fn parses_rows_and_preserves_trailing() {
        let table = parse(
            "province;red;green;blue;x;x\n\
             1;42;10;128;Sjaelland;x\n\
             2;84;20;11;Holland;x;extra\n\
             \n\
             3;1;2;3;Flandern\n",
        )
        .expect("valid table");

        assert_eq!(table.len(), 3);
        let rows = table.rows();
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].color, Rgb::new(42, 10, 128));
        assert_eq!(rows[0].name, "Sjaelland");
        assert_eq!(rows[0].trailing, "x");
        assert_eq!(rows[1].trailing, "x;extra");
        assert_eq!(rows[2].trailing, "");
        assert_eq!(table.color_of(2), Some(Rgb::new(84, 20, 11)));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let err = parse("1;1;2;3;A;x\n1;4;5;6;B;x\n").expect_err("duplicate id");
        match err {
            MapError::DuplicateDefinition { id, kind, .. } => {
                assert_eq!(id, 1);
                assert_eq!(kind, DuplicateKind::Id);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn id_zero_and_reserved_range_are_rejected() {
        assert!(matches!(
            parse("0;1;2;3;Null;x\n"),
            Err(MapError::MalformedRow { line: 1, .. })
        ));
        assert!(matches!(
            parse("65534;1;2;3;Ocean;x\n"),
            Err(MapError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn malformed_color_component_is_rejected() {
        let err = parse("1;1;2;256;A;x\n").expect_err("out of range blue");
        assert!(err.to_string().contains("blue"), "got: {err}");
    }

    #[test]
    fn write_round_trips() {
        let text = "1;42;10;128;Sjaelland;x\n2;84;20;11;Holland\n";
        let table = parse(text).expect("valid table");

        let mut out = Vec::new();
        table.write(&mut out).expect("write to memory");
        assert_eq!(String::from_utf8(out).expect("utf-8"), text);
    }
}
