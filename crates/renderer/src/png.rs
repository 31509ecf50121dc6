//! PNG encoding for rendered frames.
//!
//! Frames are written as **indexed PNG (color type 3)**: one palette index per
//! pixel, with the palette computed once per run.
//!
//! Encoding is deterministic: identical input always yields identical bytes.

use std::io::Write;

use crate::colormap::Palette;
use crate::error::{RenderError, RenderResult};

/// PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Create an indexed PNG from a precomputed palette and per-pixel indices.
pub fn create_png_from_palette(
    indices: &[u8],
    width: usize,
    height: usize,
    palette: &Palette,
) -> RenderResult<Vec<u8>> {
    create_png_indexed(width, height, &palette.colors, indices)
}

/// Create an indexed PNG (color type 3) from palette and indices.
pub fn create_png_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    if indices.len() != width * height {
        return Err(RenderError::Encoding(format!(
            "expected {} indices for {}x{}, got {}",
            width * height,
            width,
            height,
            indices.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    // IHDR chunk
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3)?);

    // PLTE chunk (palette)
    let mut plte_data = Vec::with_capacity(palette.len() * 3);
    for (r, g, b, _) in palette {
        plte_data.extend_from_slice(&[*r, *g, *b]);
    }
    write_chunk(&mut png, b"PLTE", &plte_data);

    // tRNS chunk - only if any color has alpha < 255
    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns_data: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns_data);
    }

    let idat_data = deflate_scanlines(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat_data);

    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn ihdr(width: usize, height: usize, color_type: u8) -> RenderResult<Vec<u8>> {
    let w = u32::try_from(width)
        .map_err(|_| RenderError::Encoding(format!("width {width} too large")))?;
    let h = u32::try_from(height)
        .map_err(|_| RenderError::Encoding(format!("height {height} too large")))?;

    let mut ihdr_data = Vec::with_capacity(13);
    ihdr_data.extend_from_slice(&w.to_be_bytes());
    ihdr_data.extend_from_slice(&h.to_be_bytes());
    ihdr_data.push(8); // bit depth
    ihdr_data.push(color_type);
    ihdr_data.push(0); // compression method
    ihdr_data.push(0); // filter method
    ihdr_data.push(0); // interlace method
    Ok(ihdr_data)
}

/// Write a PNG chunk
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Deflate rows of `row_bytes` bytes, each prefixed with filter type 0.
fn deflate_scanlines(data: &[u8], row_bytes: usize, height: usize) -> RenderResult<Vec<u8>> {
    let mut uncompressed = Vec::with_capacity(height * (1 + row_bytes));
    for row in data.chunks_exact(row_bytes.max(1)).take(height) {
        uncompressed.push(0); // filter type: none
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&uncompressed).map_err(compression_failed)?;
    encoder.finish().map_err(compression_failed)
}

fn compression_failed(e: std::io::Error) -> RenderError {
    RenderError::Encoding(format!("IDAT compression failed: {e}"))
}
