//! Streaming inflate for compressed pattern text

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::DecodeError;
use crate::{GZIP_HEADER_SIZE, GZIP_MAGIC, INFLATE_BUFFER_SIZE};

/// Inflate `data` and return it as UTF-8 text.
///
/// Accepts a zlib stream, or a gzip-framed deflate stream whose fixed
/// 10-byte header is skipped (the gzip trailer is not checked).
///
/// # Errors
/// * [`DecodeError::DecompressionFailed`] - corrupt or truncated stream
/// * [`DecodeError::InvalidEncoding`] - output is not valid UTF-8
pub fn inflate_text(data: &[u8]) -> Result<String, DecodeError> {
    let bytes = inflate(data)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidEncoding)
}

/// Inflate `data` into raw bytes.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let (input, zlib_header) = if data.starts_with(&GZIP_MAGIC) {
        let body = data.get(GZIP_HEADER_SIZE..).ok_or_else(|| {
            DecodeError::DecompressionFailed("gzip header truncated".to_string())
        })?;
        (body, false)
    } else {
        (data, true)
    };

    let mut decoder = Decompress::new(zlib_header);
    let mut buffer = vec![0u8; INFLATE_BUFFER_SIZE];
    let mut output = Vec::new();

    loop {
        let consumed = decoder.total_in() as usize;
        let produced_before = decoder.total_out();

        let status = decoder
            .decompress(&input[consumed..], &mut buffer, FlushDecompress::None)
            .map_err(|e| DecodeError::DecompressionFailed(e.to_string()))?;

        let produced = (decoder.total_out() - produced_before) as usize;
        output.extend_from_slice(&buffer[..produced]);

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                // No input consumed and nothing produced: the stream ended early
                if produced == 0 && decoder.total_in() as usize == consumed {
                    return Err(DecodeError::DecompressionFailed(
                        "unexpected end of compressed stream".to_string(),
                    ));
                }
            }
        }
    }

    tracing::debug!("Inflated {} bytes into {} bytes", input.len(), output.len());
    Ok(output)
}
