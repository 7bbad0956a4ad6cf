//! The compress/decompress codec used by `.dat` files.
//!
//! The payload format treats compression as opaque; everything zlib-specific
//! stays inside this module.

use std::io::{Read, Write};
use std::path::Path;

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

use crate::ProjectError;

/// Worst-case compressed size for a payload of `len` bytes.
pub fn max_compressed_len(len: usize) -> usize {
    len + len / 1000 + 64
}

/// Decompress `data` into a buffer of exactly `expected_len` bytes.
pub fn decompress(data: &[u8], expected_len: usize, path: &Path) -> Result<Vec<u8>, ProjectError> {
    let mut output = Vec::with_capacity(expected_len);
    let mut decoder = ZlibDecoder::new(data);
    decoder
        .read_to_end(&mut output)
        .map_err(|e| ProjectError::format_invalid(path, format!("decompression failed: {}", e)))?;
    if output.len() != expected_len {
        return Err(ProjectError::format_invalid(
            path,
            format!(
                "decompressed to {} bytes, header declares {}",
                output.len(),
                expected_len
            ),
        ));
    }
    Ok(output)
}

/// Compress a payload. Used when writing `.dat` files.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(max_compressed_len(data.len())),
        Compression::default(),
    );
    // Writing to a Vec cannot fail.
    let _ = encoder.write_all(data);
    encoder.finish().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn round_trip() {
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let compressed = compress(&payload);
        assert!(compressed.len() <= max_compressed_len(payload.len()));
        let path = PathBuf::from("test.dat");
        let restored = decompress(&compressed, payload.len(), &path).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let compressed = compress(b"abc");
        let path = PathBuf::from("test.dat");
        assert!(decompress(&compressed, 4, &path).is_err());
    }
}
