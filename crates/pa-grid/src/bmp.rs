//! Uncompressed 24-bpp BMP support, exactly as much of the format as the
//! province bitmap uses: `BM` magic, a 40-byte-or-larger DIB header, no
//! compression, no palette, bottom-to-top scanlines with 4-byte row stride.

use std::io::{self, Read};
use std::path::Path;

use pa_core::{IMPASSABLE, MapError, OCEAN, ProvinceId, Rgb};

use crate::grid::ProvinceGrid;

pub(crate) const BMP_MAGIC: u16 = 0x4D42; // "BM"
const FILE_HEADER_LEN: usize = 14;
const DIB_HEADER_LEN: usize = 40;
const PIXEL_OFFSET: usize = FILE_HEADER_LEN + DIB_HEADER_LEN;

/// The fields of the file and DIB headers the loader cares about.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BmpHeader {
    pub pixel_offset: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bpp: u16,
    pub compression: u32,
    pub bitmap_size: u32,
    pub colors: u32,
}

/// Byte distance between adjacent scanline starts: 24-bpp pixels padded to a
/// 4-byte boundary.
pub(crate) fn row_stride(width: usize) -> usize {
    (3 * width + 3) / 4 * 4
}

pub(crate) fn read_header(path: &Path, r: &mut impl Read) -> Result<BmpHeader, MapError> {
    let mut file_hdr = [0u8; FILE_HEADER_LEN];
    read_exact_or(path, r, &mut file_hdr, "bitmap file header")?;

    let magic = u16::from_le_bytes([file_hdr[0], file_hdr[1]]);
    if magic != BMP_MAGIC {
        return Err(MapError::BadMagic {
            path: path.to_path_buf(),
            observed: magic,
            expected: BMP_MAGIC,
        });
    }

    let mut dib_size_buf = [0u8; 4];
    read_exact_or(path, r, &mut dib_size_buf, "DIB header")?;
    let dib_size = u32::from_le_bytes(dib_size_buf);
    if dib_size < DIB_HEADER_LEN as u32 {
        return Err(MapError::UnsupportedDibField {
            path: path.to_path_buf(),
            field: "DIB header size",
            value: dib_size as i64,
        });
    }

    let mut dib = [0u8; DIB_HEADER_LEN - 4];
    read_exact_or(path, r, &mut dib, "DIB header")?;

    Ok(BmpHeader {
        pixel_offset: u32::from_le_bytes([file_hdr[10], file_hdr[11], file_hdr[12], file_hdr[13]]),
        width: i32::from_le_bytes([dib[0], dib[1], dib[2], dib[3]]),
        height: i32::from_le_bytes([dib[4], dib[5], dib[6], dib[7]]),
        planes: u16::from_le_bytes([dib[8], dib[9]]),
        bpp: u16::from_le_bytes([dib[10], dib[11]]),
        compression: u32::from_le_bytes([dib[12], dib[13], dib[14], dib[15]]),
        bitmap_size: u32::from_le_bytes([dib[16], dib[17], dib[18], dib[19]]),
        colors: u32::from_le_bytes([dib[28], dib[29], dib[30], dib[31]]),
    })
}

/// Enforces the format constraints the province bitmap must satisfy, in a
/// fixed order so failures are reported consistently.
pub(crate) fn validate_header(path: &Path, hdr: &BmpHeader) -> Result<(), MapError> {
    let unsupported = |field: &'static str, value: i64| MapError::UnsupportedDibField {
        path: path.to_path_buf(),
        field,
        value,
    };

    if hdr.width <= 0 {
        return Err(unsupported("image width", hdr.width as i64));
    }
    if hdr.height <= 0 {
        return Err(unsupported("image height", hdr.height as i64));
    }
    if hdr.planes != 1 {
        return Err(unsupported("color planes", hdr.planes as i64));
    }
    if hdr.bpp != 24 {
        return Err(unsupported("bits per pixel", hdr.bpp as i64));
    }
    if hdr.compression != 0 {
        return Err(unsupported("compression type", hdr.compression as i64));
    }
    if hdr.colors != 0 {
        return Err(unsupported("palette colors", hdr.colors as i64));
    }
    Ok(())
}

pub(crate) fn read_exact_or(
    path: &Path,
    r: &mut impl Read,
    buf: &mut [u8],
    stage: &'static str,
) -> Result<(), MapError> {
    r.read_exact(buf).map_err(|source| {
        if source.kind() == io::ErrorKind::UnexpectedEof {
            MapError::UnexpectedEof {
                path: path.to_path_buf(),
                stage,
            }
        } else {
            MapError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Encodes a grid back into a minimal 24-bpp BMP. Reserved ids become the
/// reserved colors; `color_of` supplies the display color of every real id.
pub fn encode_province_map<F>(grid: &ProvinceGrid, color_of: F) -> Vec<u8>
where
    F: Fn(ProvinceId) -> Rgb,
{
    let width = grid.width();
    let height = grid.height();
    let stride = row_stride(width);
    let bitmap_size = stride * height;

    let mut out = Vec::with_capacity(PIXEL_OFFSET + bitmap_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&((PIXEL_OFFSET + bitmap_size) as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&(PIXEL_OFFSET as u32).to_le_bytes());

    out.extend_from_slice(&(DIB_HEADER_LEN as u32).to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes()); // bpp
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&(bitmap_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 16]); // resolution, palette counts

    // Scanlines are stored bottom-to-top, pixels as B,G,R.
    for y in (0..height).rev() {
        let line_start = out.len();
        for &id in grid.row(y) {
            let color = match id {
                OCEAN => Rgb::WHITE,
                IMPASSABLE => Rgb::BLACK,
                id => color_of(id),
            };
            out.extend_from_slice(&[color.b, color.g, color.r]);
        }
        out.resize(line_start + stride, 0);
    }

    out
}

#[cfg(test)]
mod tests {
    use pa_core::Rgb;

    use super::{PIXEL_OFFSET, encode_province_map, row_stride};
    use crate::grid::ProvinceGrid;

    #[test]
    fn stride_is_padded_to_four_bytes() {
        assert_eq!(row_stride(1), 4);
        assert_eq!(row_stride(3), 12);
        assert_eq!(row_stride(4), 12);
        assert_eq!(row_stride(5), 16);
    }

    #[test]
    fn encoded_header_and_scanline_order() {
        let grid = ProvinceGrid::from_vec(3, 3, vec![1, 1, 1, 1, 1, 1, 2, 2, 2]).expect("valid");
        let bytes = encode_province_map(&grid, |id| match id {
            1 => Rgb::new(10, 20, 30),
            _ => Rgb::new(40, 50, 60),
        });

        assert_eq!(&bytes[0..2], b"BM");
        assert_eq!(bytes.len(), PIXEL_OFFSET + 3 * 12);

        // Bottom row of the grid (id 2) is the first scanline, stored B,G,R.
        assert_eq!(&bytes[PIXEL_OFFSET..PIXEL_OFFSET + 3], &[60, 50, 40]);
        // Top row of the grid (id 1) is the last scanline.
        let last = PIXEL_OFFSET + 2 * 12;
        assert_eq!(&bytes[last..last + 3], &[30, 20, 10]);
    }
}
