//! zlib wrapping for stored objects

use crate::{Error, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Default zlib level, matching git's `core.compression` default
pub const DEFAULT_LEVEL: u32 = 6;

const CHUNK: usize = 8192;

/// Compress canonical object bytes for storage
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress stored bytes.
///
/// The stream must reach its end marker; truncated or invalid input is
/// reported as corruption rather than returned as partial data.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    let mut buffer = [0u8; CHUNK];

    loop {
        let read = decoder
            .read(&mut buffer)
            .map_err(|e| Error::StorageCorruption(format!("Invalid zlib stream: {}", e)))?;

        if read == 0 {
            break;
        }

        out.extend_from_slice(&buffer[..read]);
    }

    Ok(out)
}
