//! zstd envelope and whole-file IO
//!
//! Whether a file is compressed is decided by its path alone: a `.zst`
//! suffix means the payload is wrapped.

use std::path::Path;

use super::{FormatError, FormatResult};

/// Suffix marking a compressed file
pub const COMPRESSED_SUFFIX: &str = "zst";

/// Compression level used when writing
pub const COMPRESSION_LEVEL: i32 = 3;

/// True when `path` ends in `.zst`
pub fn is_compressed_path(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(COMPRESSED_SUFFIX))
}

/// Compress a payload
pub fn compress(data: &[u8]) -> FormatResult<Vec<u8>> {
    zstd::encode_all(data, COMPRESSION_LEVEL).map_err(FormatError::Compression)
}

/// Decompress a payload
pub fn decompress(data: &[u8]) -> FormatResult<Vec<u8>> {
    zstd::decode_all(data).map_err(FormatError::Compression)
}

/// Read a file, unwrapping the envelope if the path carries the suffix
pub fn read_file(path: &Path) -> FormatResult<Vec<u8>> {
    let raw = std::fs::read(path)?;
    if is_compressed_path(path) {
        log::debug!("Decompressing {} ({} bytes)", path.display(), raw.len());
        decompress(&raw)
    } else {
        Ok(raw)
    }
}

/// Write a file, wrapping the payload if the path carries the suffix
pub fn write_file(path: &Path, data: &[u8]) -> FormatResult<()> {
    if is_compressed_path(path) {
        let compressed = compress(data)?;
        log::debug!(
            "Compressed {} bytes to {} for {}",
            data.len(),
            compressed.len(),
            path.display()
        );
        std::fs::write(path, compressed)?;
    } else {
        std::fs::write(path, data)?;
    }
    Ok(())
}
