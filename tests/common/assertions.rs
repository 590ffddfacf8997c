//! Assertion helpers for tests.

use std::path::Path;

use pretty_assertions::assert_eq;

/// PNG header fields read back from a written file.
#[derive(Debug, Clone, PartialEq)]
pub struct PngHeader {
    pub width: u32,
    pub height: u32,
    pub color_type: png::ColorType,
    pub bit_depth: png::BitDepth,
    pub palette_len: Option<usize>,
}

/// Read the header of the PNG at `path` without expanding it.
pub fn read_header(path: &Path) -> PngHeader {
    let bytes = std::fs::read(path).expect("Failed to read output");
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
    let reader = png::Decoder::new(std::io::Cursor::new(bytes))
        .read_info()
        .expect("Failed to read PNG info");
    let info = reader.info();
    PngHeader {
        width: info.width,
        height: info.height,
        color_type: info.color_type,
        bit_depth: info.bit_depth,
        palette_len: info.palette.as_ref().map(|p| p.len() / 3),
    }
}

/// Palette indices of an indexed PNG, unpacked to one byte per pixel.
pub fn read_indices(path: &Path) -> Vec<u8> {
    let bytes = std::fs::read(path).expect("Failed to read output");
    let mut reader = png::Decoder::new(std::io::Cursor::new(bytes))
        .read_info()
        .expect("Failed to read PNG info");
    assert_eq!(reader.info().color_type, png::ColorType::Indexed);
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf).expect("Failed to decode PNG");

    let bits = info.bit_depth as usize;
    let per_byte = 8 / bits;
    let mask = ((1u16 << bits) - 1) as u8;
    let mut indices = Vec::with_capacity((info.width * info.height) as usize);
    for row in buf[..info.buffer_size()].chunks(info.line_size) {
        for x in 0..info.width as usize {
            let shift = 8 - bits * (x % per_byte + 1);
            indices.push((row[x / per_byte] >> shift) & mask);
        }
    }
    indices
}

/// Assert the PNG at `path` is indexed with the given size.
pub fn assert_indexed_png(path: &Path, width: u32, height: u32) -> PngHeader {
    let header = read_header(path);
    assert_eq!(header.color_type, png::ColorType::Indexed);
    assert_eq!((header.width, header.height), (width, height));
    header
}
