//! PNG chunk stream walker
//!
//! ```text
//! Signature (8 bytes):
//!   89 50 4E 47 0D 0A 1A 0A
//!
//! Chunk (repeats until end of buffer):
//!   0x00: length (u32 BE)
//!   0x04: type tag (4 ASCII bytes)
//!   0x08: payload (length bytes)
//!   ....: CRC-32 (u32 BE, not verified here)
//! ```

use crate::error::DecodeError;
use crate::{CHUNK_CRC_SIZE, CHUNK_HEADER_SIZE, PNG_SIGNATURE};

/// A single chunk borrowed from the container buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Four-byte type tag (e.g. `*b"iTXt"`)
    pub tag: [u8; 4],
    /// Chunk payload without header or CRC
    pub payload: &'a [u8],
}

impl Chunk<'_> {
    /// Tag rendered as text, with non-ASCII bytes replaced.
    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }
}

/// Iterator over the chunks of a container.
///
/// Yields an error once and then stops if the framing is truncated.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    data: &'a [u8],
    pos: usize,
    failed: bool,
}

/// Start walking the chunks of `data` after checking its signature.
pub fn chunks(data: &[u8]) -> Result<Chunks<'_>, DecodeError> {
    if !has_signature(data) {
        return Err(DecodeError::InvalidContainer(
            "missing PNG signature".to_string(),
        ));
    }

    Ok(Chunks {
        data,
        pos: PNG_SIGNATURE.len(),
        failed: false,
    })
}

/// True if `data` starts with the PNG signature.
pub fn has_signature(data: &[u8]) -> bool {
    data.len() >= PNG_SIGNATURE.len() && data[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

/// Return the payload of the first chunk whose tag equals `tag`.
///
/// # Errors
/// * [`DecodeError::InvalidContainer`] - bad signature or truncated framing
/// * [`DecodeError::ChunkNotFound`] - no chunk with that tag
pub fn read_chunk<'a>(data: &'a [u8], tag: &[u8; 4]) -> Result<&'a [u8], DecodeError> {
    for chunk in chunks(data)? {
        let chunk = chunk?;
        if &chunk.tag == tag {
            return Ok(chunk.payload);
        }
        tracing::debug!("Skipping {} chunk ({} bytes)", chunk.tag_str(), chunk.payload.len());
    }

    Err(DecodeError::ChunkNotFound)
}

impl<'a> Chunks<'a> {
    /// Byte offset of the next chunk header.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn next_chunk(&mut self) -> Result<Chunk<'a>, DecodeError> {
        let header = self
            .data
            .get(self.pos..self.pos + CHUNK_HEADER_SIZE)
            .ok_or_else(|| truncated("chunk header", self.pos))?;

        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let tag = [header[4], header[5], header[6], header[7]];

        let payload_start = self.pos + CHUNK_HEADER_SIZE;
        let payload_end = payload_start
            .checked_add(length)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| truncated("chunk payload", payload_start))?;

        let chunk_end = payload_end + CHUNK_CRC_SIZE;
        if chunk_end > self.data.len() {
            return Err(truncated("chunk CRC", payload_end));
        }

        self.pos = chunk_end;
        Ok(Chunk {
            tag,
            payload: &self.data[payload_start..payload_end],
        })
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }

        let result = self.next_chunk();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

fn truncated(what: &str, offset: usize) -> DecodeError {
    DecodeError::InvalidContainer(format!("{} runs past end of data at offset {}", what, offset))
}
