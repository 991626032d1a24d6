//! International text (`iTXt`) chunk payload
//!
//! ```text
//! keyword            (1-79 bytes Latin-1) 0x00
//! compression flag   (u8: 0 = plain, 1 = compressed)
//! compression method (u8: 0 = zlib)
//! language tag       (ASCII) 0x00
//! translated keyword (UTF-8) 0x00
//! text               (UTF-8, zlib stream when compressed)
//! ```

use crate::error::DecodeError;

/// Fields of an `iTXt` payload, borrowing from the chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternationalText<'a> {
    pub keyword: &'a [u8],
    pub language_tag: &'a [u8],
    pub translated_keyword: &'a [u8],
    /// True when `text` is a zlib stream that still has to be inflated
    pub compressed: bool,
    pub text: &'a [u8],
}

/// Split an `iTXt` payload and check that it carries `keyword`.
///
/// # Errors
/// * [`DecodeError::InvalidChunkStructure`] - missing terminator or flag
///   bytes, or an unsupported compression method
/// * [`DecodeError::ChunkNotFound`] - the chunk belongs to another keyword
pub fn extract_text<'a>(
    payload: &'a [u8],
    keyword: &str,
) -> Result<InternationalText<'a>, DecodeError> {
    let (found_keyword, rest) = split_null(payload, "keyword")?;
    if found_keyword != keyword.as_bytes() {
        tracing::debug!(
            "iTXt keyword '{}' does not match '{}'",
            String::from_utf8_lossy(found_keyword),
            keyword
        );
        return Err(DecodeError::ChunkNotFound);
    }

    let [flag, method, rest @ ..] = rest else {
        return Err(DecodeError::InvalidChunkStructure(
            "missing compression flag and method".to_string(),
        ));
    };

    let (language_tag, rest) = split_null(rest, "language tag")?;
    let (translated_keyword, text) = split_null(rest, "translated keyword")?;

    // Only flag 1 means compressed; any other flag value is plain text.
    let compressed = match (*flag, *method) {
        (1, 0) => true,
        (1, other) => {
            return Err(DecodeError::InvalidChunkStructure(format!(
                "unsupported compression method {}",
                other
            )));
        }
        _ => false,
    };

    Ok(InternationalText {
        keyword: found_keyword,
        language_tag,
        translated_keyword,
        compressed,
        text,
    })
}

/// Split at the first null byte, dropping the terminator.
fn split_null<'a>(data: &'a [u8], field: &str) -> Result<(&'a [u8], &'a [u8]), DecodeError> {
    let end = data.iter().position(|&b| b == 0).ok_or_else(|| {
        DecodeError::InvalidChunkStructure(format!("unterminated {}", field))
    })?;
    Ok((&data[..end], &data[end + 1..]))
}
