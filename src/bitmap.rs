//! Fixed-offset bitmap (BMP) loading.
//!
//! The globe texture ships as an uncompressed 24/32-bit BMP. The parser reads
//! the classic 54-byte header at fixed offsets and hands back tightly packed,
//! top-down BGRA rows ready for a single texture upload. Anything else (bad
//! signature, indexed or 16-bit images) is rejected at load time and the
//! error propagates to whoever drives initialization.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::texture::PixelOrder;

/// How many parent directories [`Bitmap::load`] climbs while looking for a
/// relatively addressed asset. Lets `cargo run` work from workspace
/// subdirectories.
const SEARCH_DEPTH: usize = 5;

/// Byte length of the header region the parser inspects.
const HEADER_LEN: usize = 54;

/// A decoded bitmap: dimensions, source depth and pixel bytes.
///
/// `pixels` is always `width * height * 4` bytes of blue-green-red-alpha,
/// rows top-down (file rows are stored bottom-up and get flipped on load).
#[derive(Clone, Debug)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u16,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Read and parse a bitmap file.
    ///
    /// A relative `path` is retried against up to [`SEARCH_DEPTH`] parent
    /// directories before giving up.
    pub fn load(path: impl AsRef<Path>) -> Result<Bitmap> {
        let path = path.as_ref();
        let base = std::env::current_dir().context("no working directory")?;
        let Some(found) = locate_in(&base, path, SEARCH_DEPTH) else {
            bail!("bitmap not found: {}", path.display());
        };
        let data =
            fs::read(&found).with_context(|| format!("reading bitmap {}", found.display()))?;
        Self::parse(&data).with_context(|| format!("parsing bitmap {}", found.display()))
    }

    /// Parse bitmap bytes already in memory.
    pub fn parse(data: &[u8]) -> Result<Bitmap> {
        if data.len() < HEADER_LEN {
            bail!("file too short for a bitmap header ({} bytes)", data.len());
        }
        if &data[0..2] != b"BM" {
            bail!("invalid file format, bitmap required");
        }

        let read_u32 = |offset: usize| {
            u32::from_le_bytes(data[offset..offset + 4].try_into().unwrap())
        };
        let pixels_offset = read_u32(10) as usize;
        let width = read_u32(18);
        let height = read_u32(22);
        let bits_per_pixel = u16::from_le_bytes(data[28..30].try_into().unwrap());

        if bits_per_pixel != 24 && bits_per_pixel != 32 {
            bail!("unsupported bitmap depth {bits_per_pixel}, 24 or 32 bit required");
        }

        // Rows are padded to 4-byte boundaries in the file.
        let row_len = ((width as usize * bits_per_pixel as usize + 31) / 32) * 4;
        let data_len = row_len * height as usize;
        if data.len() < pixels_offset + data_len {
            bail!(
                "truncated bitmap: {} pixel bytes present, {} required",
                data.len().saturating_sub(pixels_offset),
                data_len
            );
        }

        let bytes_per_pixel = bits_per_pixel as usize / 8;
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        // File rows run bottom-up; emit them top-down for the device.
        for row in (0..height as usize).rev() {
            let row_start = pixels_offset + row * row_len;
            for col in 0..width as usize {
                let px = row_start + col * bytes_per_pixel;
                pixels.extend_from_slice(&data[px..px + 3]);
                if bytes_per_pixel == 4 {
                    pixels.push(data[px + 3]);
                } else {
                    pixels.push(u8::MAX);
                }
            }
        }

        Ok(Bitmap {
            width,
            height,
            bits_per_pixel,
            pixels,
        })
    }

    /// Channel order of the decoded pixel bytes.
    ///
    /// BMP stores blue-green-red; the texture must be told so colors don't
    /// come out swapped.
    pub fn order(&self) -> PixelOrder {
        PixelOrder::Bgra
    }
}

/// Resolve `path` against `base`, then against up to `attempts - 1` of its
/// parents. Absolute paths only get the direct check.
fn locate_in(base: &Path, path: &Path, attempts: usize) -> Option<PathBuf> {
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }
    let mut dir = base.to_path_buf();
    for _ in 0..attempts {
        let candidate = dir.join(path);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = dir.parent()?.to_path_buf();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble an uncompressed BMP in memory: 54-byte header plus
    /// bottom-up, 4-byte-aligned pixel rows.
    fn synthesize(width: u32, height: u32, bits_per_pixel: u16, rows_bottom_up: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data[0] = b'B';
        data[1] = b'M';
        data[10..14].copy_from_slice(&(HEADER_LEN as u32).to_le_bytes());
        data[14..18].copy_from_slice(&40u32.to_le_bytes());
        data[18..22].copy_from_slice(&width.to_le_bytes());
        data[22..26].copy_from_slice(&height.to_le_bytes());
        data[28..30].copy_from_slice(&bits_per_pixel.to_le_bytes());
        data.extend_from_slice(rows_bottom_up);
        data
    }

    #[test]
    fn parses_a_24_bit_image() {
        // 2x2, rows padded from 6 to 8 bytes. Bottom row first in the file.
        let rows = [
            1, 2, 3, 4, 5, 6, 0, 0, // file row 0 = image bottom
            7, 8, 9, 10, 11, 12, 0, 0, // file row 1 = image top
        ];
        let bitmap = Bitmap::parse(&synthesize(2, 2, 24, &rows)).unwrap();
        assert_eq!((bitmap.width, bitmap.height), (2, 2));
        assert_eq!(bitmap.bits_per_pixel, 24);
        // Top-down BGRA with opaque alpha filled in.
        assert_eq!(
            bitmap.pixels,
            vec![7, 8, 9, 255, 10, 11, 12, 255, 1, 2, 3, 255, 4, 5, 6, 255]
        );
    }

    #[test]
    fn parses_a_32_bit_image() {
        let rows = [
            1, 2, 3, 4, 5, 6, 7, 8, // bottom row
            9, 10, 11, 12, 13, 14, 15, 16, // top row
        ];
        let bitmap = Bitmap::parse(&synthesize(2, 2, 32, &rows)).unwrap();
        assert_eq!(bitmap.bits_per_pixel, 32);
        assert_eq!(
            bitmap.pixels,
            vec![9, 10, 11, 12, 13, 14, 15, 16, 1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn rejects_a_non_bitmap_signature() {
        let mut data = synthesize(1, 1, 24, &[0, 0, 0, 0]);
        data[0] = b'P';
        let err = Bitmap::parse(&data).unwrap_err();
        assert!(err.to_string().contains("bitmap required"));
    }

    #[test]
    fn rejects_unsupported_depths() {
        let err = Bitmap::parse(&synthesize(1, 1, 16, &[0, 0, 0, 0])).unwrap_err();
        assert!(err.to_string().contains("16"));
    }

    #[test]
    fn rejects_truncated_pixel_data() {
        let data = synthesize(4, 4, 24, &[0u8; 8]);
        assert!(Bitmap::parse(&data).is_err());
    }

    #[test]
    fn missing_files_error_out() {
        let err = Bitmap::load("definitely/not/here.bmp").unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn locate_climbs_parent_directories() {
        let root = std::env::temp_dir().join("orb-ngin-locate-test");
        let nested = root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("probe.bmp"), b"x").unwrap();

        let found = locate_in(&nested, Path::new("probe.bmp"), 5).unwrap();
        assert_eq!(found, root.join("probe.bmp"));
        assert!(locate_in(&nested, Path::new("probe.bmp"), 2).is_none());

        fs::remove_dir_all(&root).unwrap();
    }
}
