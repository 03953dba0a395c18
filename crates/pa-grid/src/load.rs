use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use log::debug;
use pa_core::{IMPASSABLE, MapError, NULL_PROVINCE, OCEAN, Rgb};
use pa_defs::ColorIndex;

use crate::bmp;
use crate::grid::{ProvinceGrid, check_dims};

/// Loads a province grid from an uncompressed 24-bpp BMP byte source.
///
/// `path` only labels errors; the bytes come from `reader`. Scanlines are
/// stored bottom-to-top, so file scanline `k` fills grid row `H-1-k`. Each
/// pixel resolves in order: pure white to [`OCEAN`], pure black to
/// [`IMPASSABLE`], a repeat of the previous pixel's bytes to the previous id
/// (color runs dominate these bitmaps, so this skips most index lookups),
/// and anything else through the color index.
pub fn load_province_map<R: Read + Seek>(
    path: &Path,
    mut reader: R,
    index: &ColorIndex,
) -> Result<ProvinceGrid, MapError> {
    let hdr = bmp::read_header(path, &mut reader)?;
    bmp::validate_header(path, &hdr)?;

    let width = hdr.width as usize;
    let height = hdr.height as usize;
    check_dims(width, height)?;

    let stride = bmp::row_stride(width);
    let expected = (stride * height) as u64;
    if hdr.bitmap_size != 0 && hdr.bitmap_size as u64 != expected {
        return Err(MapError::SizeMismatch {
            path: path.to_path_buf(),
            expected,
            recorded: hdr.bitmap_size as u64,
        });
    }

    debug!(
        "province bitmap {}: {width}x{height} px, {stride}-byte scanlines, pixel data at 0x{:X}",
        path.display(),
        hdr.pixel_offset
    );

    // Seek past any extra header bytes directly to the pixel array.
    reader
        .seek(SeekFrom::Start(hdr.pixel_offset as u64))
        .map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let mut cells = vec![NULL_PROVINCE; width * height];
    let mut row_buf = vec![0u8; stride];

    for scanline in 0..height {
        bmp::read_exact_or(path, &mut reader, &mut row_buf, "bitmap pixel data")?;
        let y = height - 1 - scanline;

        let mut prev_bgr = (0u8, 0u8, 0u8);
        let mut prev_id = NULL_PROVINCE;

        for x in 0..width {
            let (b, g, r) = (row_buf[3 * x], row_buf[3 * x + 1], row_buf[3 * x + 2]);

            let id = if (r, g, b) == (0xFF, 0xFF, 0xFF) {
                OCEAN
            } else if (r, g, b) == (0x00, 0x00, 0x00) {
                IMPASSABLE
            } else if x > 0 && (b, g, r) == prev_bgr {
                prev_id
            } else {
                index
                    .lookup(Rgb::new(r, g, b))
                    .ok_or_else(|| MapError::UnknownPixelColor {
                        path: path.to_path_buf(),
                        x: x as u32,
                        y: y as u32,
                        r,
                        g,
                        b,
                    })?
            };

            prev_bgr = (b, g, r);
            prev_id = id;
            cells[y * width + x] = id;
        }
    }

    ProvinceGrid::from_vec(width, height, cells)
}

/// Convenience wrapper opening `path` itself.
pub fn open_province_map(path: &Path, index: &ColorIndex) -> Result<ProvinceGrid, MapError> {
    let file = File::open(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_province_map(path, BufReader::new(file), index)
}
