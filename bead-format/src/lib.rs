//! Bead-Format: bead pattern decoding for BeadReader
//!
//! A bead pattern is a small XML document listing colors and repeat counts.
//! It travels either as a standalone `.xbp` file or embedded in a PNG image
//! as an international text (`iTXt`) chunk, optionally zlib-compressed.
//!
//! # Pipeline
//!
//! ```text
//! PNG bytes ──► container::read_chunk("iTXt")
//!           ──► itxt::extract_text("bead-pattern")
//!           ──► inflate::inflate_text            (when compressed)
//!           ──► parser::parse_pattern ──► Pattern
//!
//! XML bytes ─────────────────────────► parser::parse_pattern ──► Pattern
//! ```
//!
//! Every stage borrows from the input buffer; only the inflated text and
//! the final [`Pattern`] are allocated.
//!
//! # Usage
//!
//! ```
//! use bead_format::decode;
//!
//! let xml = b"<pattern><patternName>Demo</patternName>\
//!     <bead><color>Red</color><count>3</count></bead></pattern>";
//! let pattern = decode(xml).unwrap();
//! assert_eq!(pattern.name(), "Demo");
//! assert_eq!(pattern.beads()[0].color, "red");
//! ```

pub mod container;
pub mod embed;
mod error;
pub mod inflate;
pub mod itxt;
mod model;
pub mod parser;

pub use container::{Chunk, Chunks, chunks, has_signature, read_chunk};
pub use embed::embed_pattern;
pub use error::{DecodeError, PatternError};
pub use inflate::inflate_text;
pub use itxt::{InternationalText, extract_text};
pub use model::{Bead, Pattern};
pub use parser::{PatternBuilder, parse_pattern};

// =============================================================================
// Constants
// =============================================================================

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Chunk header size (length + type tag)
pub const CHUNK_HEADER_SIZE: usize = 8;

/// Trailing CRC size after each chunk payload
pub const CHUNK_CRC_SIZE: usize = 4;

/// Chunk type carrying international (UTF-8) text
pub const ITXT_TAG: &[u8; 4] = b"iTXt";

/// iTXt keyword reserved for bead patterns
pub const PATTERN_KEYWORD: &str = "bead-pattern";

/// Two-byte magic of a gzip-framed stream
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Fixed gzip header size skipped before the deflate body
pub const GZIP_HEADER_SIZE: usize = 10;

/// Output buffer drained on every inflate iteration
pub const INFLATE_BUFFER_SIZE: usize = 8 * 1024;

// =============================================================================
// Entry points
// =============================================================================

/// Decode a pattern embedded in a PNG container.
///
/// # Errors
/// Any [`DecodeError`] from the container stages, or a [`PatternError`]
/// from the markup parser.
pub fn decode_container(data: &[u8]) -> Result<Pattern, PatternError> {
    let payload = read_chunk(data, ITXT_TAG)?;
    let itxt = extract_text(payload, PATTERN_KEYWORD)?;

    if itxt.compressed {
        let text = inflate_text(itxt.text)?;
        parse_pattern(text.as_bytes())
    } else {
        parse_pattern(itxt.text)
    }
}

/// Decode a pattern from either a PNG container or standalone markup,
/// chosen by the PNG signature.
pub fn decode(data: &[u8]) -> Result<Pattern, PatternError> {
    if has_signature(data) {
        decode_container(data)
    } else {
        parse_pattern(data)
    }
}
