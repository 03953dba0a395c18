use std::io::{self, BufRead, Write};
use std::path::Path;

use log::debug;
use pa_core::{MapError, ProvinceId};

/// One special connection between two provinces that are not 4-connected in
/// the bitmap: a strait, a major-river crossing, and the like.
///
/// Numeric fields use `-1` (or an empty field) for "absent"; `comment`
/// preserves everything after the `through` column verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    pub from: Option<ProvinceId>,
    pub to: Option<ProvinceId>,
    pub kind: String,
    pub through: Option<ProvinceId>,
    pub comment: String,
}

/// The parsed adjacencies file. Row order follows the file; validation of
/// the referenced provinces is a downstream concern.
#[derive(Debug, Clone, Default)]
pub struct AdjacenciesFile {
    rows: Vec<Adjacency>,
}

impl AdjacenciesFile {
    /// Parses the semicolon-delimited `from;to;type;through[;comment]`
    /// format. A leading header line is skipped.
    pub fn parse(path: &Path, reader: impl BufRead) -> Result<Self, MapError> {
        let mut rows = Vec::new();

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
            if lineno == 1 && !line.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
                continue; // header line
            }

            rows.push(parse_row(path, lineno, line)?);
        }

        debug!(
            "adjacencies file {}: {} connections",
            path.display(),
            rows.len()
        );
        Ok(Self { rows })
    }

    /// Writes the rows back out in the format they were parsed from.
    pub fn write(&self, mut w: impl Write) -> io::Result<()> {
        for row in &self.rows {
            write!(
                w,
                "{};{};{};{}",
                opt_id(row.from),
                opt_id(row.to),
                row.kind,
                opt_id(row.through)
            )?;
            if row.comment.is_empty() {
                writeln!(w)?;
            } else {
                writeln!(w, ";{}", row.comment)?;
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

    pub fn rows(&self) -> &[Adjacency] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &Adjacency> {
        self.rows.iter()
    }
}

fn opt_id(id: Option<ProvinceId>) -> String {
    match id {
        Some(id) => id.to_string(),
        None => "-1".to_owned(),
    }
}

fn parse_row(path: &Path, lineno: usize, line: &str) -> Result<Adjacency, MapError> {
    let malformed = |detail: String| MapError::MalformedRow {
        path: path.to_path_buf(),
        line: lineno,
        detail,
    };

    let mut fields = line.splitn(5, ';');
    let mut next = |what: &str| {
        fields
            .next()
            .ok_or_else(|| malformed(format!("missing {what} field")))
    };

    let from = parse_opt_id(next("from")?).map_err(&malformed)?;
    let to = parse_opt_id(next("to")?).map_err(&malformed)?;
    let kind = next("type")?.trim().to_owned();
    let through = parse_opt_id(next("through")?).map_err(&malformed)?;
    let comment = fields.next().unwrap_or("").to_owned();

    Ok(Adjacency {
        from,
        to,
        kind,
        through,
        comment,
    })
}

fn parse_opt_id(field: &str) -> Result<Option<ProvinceId>, String> {
    let field = field.trim();
    if field.is_empty() || field == "-1" {
        return Ok(None);
    }
    field
        .parse()
        .map(Some)
        .map_err(|_| format!("invalid province id {field:?}"))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::AdjacenciesFile;

    fn parse(text: &str) -> AdjacenciesFile {
        AdjacenciesFile::parse(Path::new("adjacencies.csv"), text.as_bytes())
            .expect("valid adjacencies")
    }

    #[test]
    fn parses_straits_and_absent_fields() {
        let adj = parse(
            "From;To;Type;Through;Comment\n\
             12;34;sea;56;Oresund strait\n\
             78;90;major_river;-1\n",
        );

        assert_eq!(adj.len(), 2);
        let rows = adj.rows();
        assert_eq!(rows[0].from, Some(12));
        assert_eq!(rows[0].to, Some(34));
        assert_eq!(rows[0].kind, "sea");
        assert_eq!(rows[0].through, Some(56));
        assert_eq!(rows[0].comment, "Oresund strait");
        assert_eq!(rows[1].through, None);
        assert_eq!(rows[1].comment, "");
    }

    #[test]
    fn comment_may_carry_extra_columns() {
        let adj = parse("1;2;sea;3;0;0;0;0;Kattegat\n");
        assert_eq!(adj.rows()[0].comment, "0;0;0;0;Kattegat");
    }

    #[test]
    fn write_round_trips() {
        let text = "12;34;sea;56;Oresund strait\n78;90;major_river;-1\n";
        let adj = parse(text);

        let mut out = Vec::new();
        adj.write(&mut out).expect("write to memory");
        assert_eq!(String::from_utf8(out).expect("utf-8"), text);
    }

    #[test]
    fn malformed_id_is_rejected() {
        let err = AdjacenciesFile::parse(
            Path::new("adjacencies.csv"),
            "From;To;Type;Through;Comment\nabc;2;sea;3;x\n".as_bytes(),
        )
        .expect_err("bad from id");
        assert!(err.to_string().contains("abc"), "got: {err}");
    }
}
