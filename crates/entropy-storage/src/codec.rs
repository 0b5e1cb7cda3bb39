//! Vector serialization and LZ4 block compression.
//!
//! Counter vectors are `Width` little-endian `u16`s (`2 × Width` bytes).
//! Complex vectors are `Width` pairs of little-endian `f32`s, real part first
//! (`8 × Width` bytes). Blobs are raw LZ4 blocks without a size prefix; the
//! decoder always knows the expected length from the configured width.

use markov_entropy_core::FrequencyVector;
use num_complex::Complex32;

use crate::error::{StorageError, StorageResult};

/// Bytes per counter.
pub const COUNTER_BYTES: usize = 2;

/// Bytes per complex component.
pub const COMPLEX_BYTES: usize = 8;

/// Serialize counters to little-endian bytes.
pub fn encode_counts(vector: &FrequencyVector) -> Vec<u8> {
    let mut out = Vec::with_capacity(COUNTER_BYTES * vector.width());
    for &count in vector.counts() {
        out.extend_from_slice(&count.to_le_bytes());
    }
    out
}

/// Parse `width` little-endian counters.
///
/// # Errors
/// - `StorageError::Codec` if `bytes.len() != 2 × width`
pub fn decode_counts(key: &[u8], bytes: &[u8], width: usize) -> StorageResult<FrequencyVector> {
    if bytes.len() != COUNTER_BYTES * width {
        return Err(StorageError::codec(
            key,
            format!(
                "expected {} counter bytes, got {}",
                COUNTER_BYTES * width,
                bytes.len()
            ),
        ));
    }
    let counts = bytes
        .chunks_exact(COUNTER_BYTES)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    FrequencyVector::from_counts(counts, width).map_err(StorageError::from)
}

/// Serialize complex components as `(re, im)` little-endian `f32` pairs.
pub fn encode_complex(vector: &[Complex32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(COMPLEX_BYTES * vector.len());
    for value in vector {
        out.extend_from_slice(&value.re.to_le_bytes());
        out.extend_from_slice(&value.im.to_le_bytes());
    }
    out
}

/// Parse `width` complex components.
///
/// # Errors
/// - `StorageError::Codec` if `bytes.len() != 8 × width`
pub fn decode_complex(key: &[u8], bytes: &[u8], width: usize) -> StorageResult<Vec<Complex32>> {
    if bytes.len() != COMPLEX_BYTES * width {
        return Err(StorageError::codec(
            key,
            format!(
                "expected {} complex bytes, got {}",
                COMPLEX_BYTES * width,
                bytes.len()
            ),
        ));
    }
    Ok(bytes
        .chunks_exact(COMPLEX_BYTES)
        .map(|c| {
            let re = f32::from_le_bytes([c[0], c[1], c[2], c[3]]);
            let im = f32::from_le_bytes([c[4], c[5], c[6], c[7]]);
            Complex32::new(re, im)
        })
        .collect())
}

/// LZ4 block compression.
#[inline]
pub fn compress(bytes: &[u8]) -> Vec<u8> {
    lz4_flex::block::compress(bytes)
}

/// LZ4 block decompression to exactly `expected_len` bytes.
///
/// # Errors
/// - `StorageError::Codec` if the blob is malformed or decodes to a different length
pub fn decompress(key: &[u8], blob: &[u8], expected_len: usize) -> StorageResult<Vec<u8>> {
    let bytes = lz4_flex::block::decompress(blob, expected_len)
        .map_err(|e| StorageError::codec(key, format!("LZ4 decompression failed: {}", e)))?;
    if bytes.len() != expected_len {
        return Err(StorageError::codec(
            key,
            format!(
                "decompressed {} bytes, expected {}",
                bytes.len(),
                expected_len
            ),
        ));
    }
    Ok(bytes)
}

/// Encode and compress a counter vector.
pub fn pack_counts(vector: &FrequencyVector) -> Vec<u8> {
    compress(&encode_counts(vector))
}

/// Decompress and decode a counter vector.
pub fn unpack_counts(key: &[u8], blob: &[u8], width: usize) -> StorageResult<FrequencyVector> {
    let bytes = decompress(key, blob, COUNTER_BYTES * width)?;
    decode_counts(key, &bytes, width)
}

/// Encode and compress a complex vector.
pub fn pack_complex(vector: &[Complex32]) -> Vec<u8> {
    compress(&encode_complex(vector))
}

/// Decompress and decode a complex vector.
pub fn unpack_complex(key: &[u8], blob: &[u8], width: usize) -> StorageResult<Vec<Complex32>> {
    let bytes = decompress(key, blob, COMPLEX_BYTES * width)?;
    decode_complex(key, &bytes, width)
}
