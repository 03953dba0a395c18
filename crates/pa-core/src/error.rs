use core::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::id::ProvinceId;

/// Which uniqueness rule a definitions row violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateKind {
    Id,
    Color,
}

impl fmt::Display for DuplicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::Color => write!(f, "color"),
        }
    }
}

/// Errors surfaced while loading map data. Every variant names the file it
/// was raised for; pixel and line locations are included where they exist.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "{}: unsupported bitmap file type (magic=0x{observed:04X} but want magic=0x{expected:04X})",
        .path.display()
    )]
    BadMagic {
        path: PathBuf,
        observed: u16,
        expected: u16,
    },

    #[error("{}: format unsupported: {field} is {value}", .path.display())]
    UnsupportedDibField {
        path: PathBuf,
        field: &'static str,
        value: i64,
    },

    #[error(
        "{}: raw bitmap data section should be {expected} bytes but {recorded} were specified",
        .path.display()
    )]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        recorded: u64,
    },

    #[error("{}: unexpected EOF while reading {stage}", .path.display())]
    UnexpectedEof { path: PathBuf, stage: &'static str },

    #[error(
        "{}: unexpected color rgb({r}, {g}, {b}) in province bitmap at pixel ({x}, {y})",
        .path.display()
    )]
    UnknownPixelColor {
        path: PathBuf,
        x: u32,
        y: u32,
        r: u8,
        g: u8,
        b: u8,
    },

    #[error("{}: duplicate province {kind} in definitions (id {id})", .path.display())]
    DuplicateDefinition {
        path: PathBuf,
        id: ProvinceId,
        kind: DuplicateKind,
    },

    #[error("{}:{line}: malformed row: {detail}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        detail: String,
    },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{DuplicateKind, MapError};

    #[test]
    fn messages_name_the_file() {
        let err = MapError::BadMagic {
            path: PathBuf::from("map/provinces.bmp"),
            observed: 0x5089,
            expected: 0x4D42,
        };
        let msg = err.to_string();
        assert!(msg.contains("map/provinces.bmp"), "got: {msg}");
        assert!(msg.contains("0x5089"), "got: {msg}");

        let err = MapError::DuplicateDefinition {
            path: PathBuf::from("map/definition.csv"),
            id: 42,
            kind: DuplicateKind::Color,
        };
        assert!(err.to_string().contains("duplicate province color"));
    }
}
