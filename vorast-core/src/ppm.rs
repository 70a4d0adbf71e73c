//! Binary PPM (P6) encoding.
//!
//! Layout: `P6\n<width> <height>\n255\n` followed by one R, G, B triple per
//! pixel, rows top to bottom, pixels left to right. Alpha is never written.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::{PixelBuffer, Result};

/// Write `buffer` as P6 to `sink`, flushing before returning.
pub fn write_ppm<W: Write>(buffer: &PixelBuffer, mut sink: W) -> Result<()> {
    write!(sink, "P6\n{} {}\n255\n", buffer.width(), buffer.height())?;

    let mut row_bytes = Vec::with_capacity(buffer.width() as usize * 3);
    for row in buffer.rows() {
        row_bytes.clear();
        row_bytes.extend(row.iter().flat_map(|c| c.to_rgb()));
        sink.write_all(&row_bytes)?;
    }
    sink.flush()?;
    Ok(())
}

/// Encode `buffer` as an in-memory P6 byte stream
pub fn encode_ppm(buffer: &PixelBuffer) -> Vec<u8> {
    let header = format!("P6\n{} {}\n255\n", buffer.width(), buffer.height());
    let mut bytes = Vec::with_capacity(header.len() + buffer.pixels().len() * 3);
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend(buffer.pixels().iter().flat_map(|c| c.to_rgb()));
    bytes
}

/// Create (or truncate) `path` and write `buffer` to it.
///
/// On error the file may be left partially written; removing it is up to
/// the caller.
pub fn save_ppm(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    write_ppm(buffer, BufWriter::new(file))
}
