//! The province grid and the bitmap loader that fills it.
//!
//! ## Grid Model
//! The grid is a row-major H x W array of 16-bit province ids. Row 0 is the
//! top row and x grows to the right, which is the opposite vertical order
//! from the bitmap file: BMP scanlines are stored bottom-to-top, so file
//! scanline `k` becomes grid row `H-1-k`.
//!
//! ## Pixel Resolution
//! Pure white resolves to the ocean id and pure black to the impassable id
//! before the color index is consulted; every other color must be claimed by
//! exactly one definitions row. A pixel repeating the previous pixel's bytes
//! reuses the previous id, observable only as a speed-up.

mod bmp;
mod grid;
mod load;

pub use bmp::encode_province_map;
pub use grid::ProvinceGrid;
pub use load::{load_province_map, open_province_map};
