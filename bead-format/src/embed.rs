//! Embed pattern markup into a PNG as an `iTXt` chunk

use std::io::Write;

use flate2::Crc;
use flate2::Compression;
use flate2::write::ZlibEncoder;

use crate::container::{self, Chunk};
use crate::error::DecodeError;
use crate::{ITXT_TAG, PATTERN_KEYWORD, PNG_SIGNATURE};

/// Return a copy of `png` carrying `markup` in a `bead-pattern` iTXt chunk.
///
/// The chunk is written directly after `IHDR` so it is the first iTXt chunk
/// a reader meets. Any existing `bead-pattern` chunk is dropped.
///
/// # Errors
/// * [`DecodeError::InvalidContainer`] - not a PNG, truncated, or `IHDR` is
///   not the first chunk
/// * [`DecodeError::CompressionFailed`] - compressing the text failed
pub fn embed_pattern(png: &[u8], markup: &str, compress: bool) -> Result<Vec<u8>, DecodeError> {
    let payload = itxt_payload(markup, compress)?;

    let mut out = Vec::with_capacity(png.len() + payload.len() + 12);
    out.extend_from_slice(&PNG_SIGNATURE);

    for (index, chunk) in container::chunks(png)?.enumerate() {
        let chunk = chunk?;

        if index == 0 && &chunk.tag != b"IHDR" {
            return Err(DecodeError::InvalidContainer(format!(
                "first chunk is {}, expected IHDR",
                chunk.tag_str()
            )));
        }

        if is_pattern_chunk(&chunk) {
            tracing::debug!("Replacing existing pattern chunk");
            continue;
        }

        write_chunk(&mut out, &chunk.tag, chunk.payload);

        if index == 0 {
            write_chunk(&mut out, ITXT_TAG, &payload);
        }
    }

    if out.len() == PNG_SIGNATURE.len() {
        return Err(DecodeError::InvalidContainer("no IHDR chunk".to_string()));
    }

    Ok(out)
}

fn is_pattern_chunk(chunk: &Chunk<'_>) -> bool {
    &chunk.tag == ITXT_TAG
        && chunk.payload.starts_with(PATTERN_KEYWORD.as_bytes())
        && chunk.payload.get(PATTERN_KEYWORD.len()) == Some(&0)
}

fn itxt_payload(markup: &str, compress: bool) -> Result<Vec<u8>, DecodeError> {
    let mut payload = Vec::new();
    payload.extend_from_slice(PATTERN_KEYWORD.as_bytes());
    payload.push(0);
    payload.push(u8::from(compress));
    payload.push(0); // zlib
    payload.push(0); // empty language tag
    payload.push(0); // empty translated keyword

    if compress {
        let mut encoder = ZlibEncoder::new(payload, Compression::best());
        encoder.write_all(markup.as_bytes()).map_err(compression_failed)?;
        payload = encoder.finish().map_err(compression_failed)?;
    } else {
        payload.extend_from_slice(markup.as_bytes());
    }

    Ok(payload)
}

fn compression_failed(e: std::io::Error) -> DecodeError {
    DecodeError::CompressionFailed(e.to_string())
}

fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    let mut crc = Crc::new();
    crc.update(tag);
    crc.update(payload);

    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(tag);
    out.extend_from_slice(payload);
    out.extend_from_slice(&crc.sum().to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::tests::container;
    use crate::decode_container;

    const MARKUP: &str = "<pattern><patternName>Tiny</patternName><columns>2</columns>\
        <bead><color>Red</color><count>3</count></bead></pattern>";

    #[test]
    fn test_compression_error_is_not_reported_as_decompression() {
        let error = compression_failed(std::io::Error::other("disk full"));
        assert_eq!(error, DecodeError::CompressionFailed("disk full".to_string()));
        assert_eq!(error.to_string(), "Compression failed: disk full");
    }

    #[test]
    fn test_embed_and_decode_plain() {
        let png = container(&[(b"IHDR", &[0; 13]), (b"IDAT", b"pixels"), (b"IEND", b"")]);
        let embedded = embed_pattern(&png, MARKUP, false).unwrap();

        let pattern = decode_container(&embedded).unwrap();
        assert_eq!(pattern.name(), "Tiny");
        assert_eq!(pattern.columns(), 2);
        assert_eq!(pattern.beads()[0].color, "red");
    }

    #[test]
    fn test_embed_and_decode_compressed() {
        let png = container(&[(b"IHDR", &[0; 13]), (b"IEND", b"")]);
        let embedded = embed_pattern(&png, MARKUP, true).unwrap();

        let payload = container::read_chunk(&embedded, ITXT_TAG).unwrap();
        let itxt = crate::itxt::extract_text(payload, PATTERN_KEYWORD).unwrap();
        assert!(itxt.compressed);

        assert_eq!(decode_container(&embedded).unwrap().beads()[0].count, 3);
    }

    #[test]
    fn test_chunk_order_and_crc() {
        let png = container(&[(b"IHDR", &[0; 13]), (b"IDAT", b"pixels"), (b"IEND", b"")]);
        let embedded = embed_pattern(&png, MARKUP, false).unwrap();

        let tags: Vec<String> = container::chunks(&embedded)
            .unwrap()
            .map(|c| c.unwrap().tag_str())
            .collect();
        assert_eq!(tags, vec!["IHDR", "iTXt", "IDAT", "IEND"]);

        // CRC of the empty IEND chunk is a well-known constant
        assert_eq!(&embedded[embedded.len() - 4..], &[0xAE, 0x42, 0x60, 0x82]);
    }

    #[test]
    fn test_replaces_existing_pattern_chunk() {
        let png = container(&[(b"IHDR", &[0; 13]), (b"IEND", b"")]);
        let first = embed_pattern(&png, MARKUP, false).unwrap();
        let second = embed_pattern(
            &first,
            "<pattern><patternName>Second</patternName></pattern>",
            true,
        )
        .unwrap();

        let itxt_count = container::chunks(&second)
            .unwrap()
            .filter(|c| &c.as_ref().unwrap().tag == ITXT_TAG)
            .count();
        assert_eq!(itxt_count, 1);
        assert_eq!(decode_container(&second).unwrap().name(), "Second");
    }

    #[test]
    fn test_rejects_non_png() {
        assert!(matches!(
            embed_pattern(b"plain text", MARKUP, false),
            Err(DecodeError::InvalidContainer(_))
        ));

        let no_ihdr = container(&[(b"IDAT", b"pixels")]);
        assert!(matches!(
            embed_pattern(&no_ihdr, MARKUP, false),
            Err(DecodeError::InvalidContainer(_))
        ));

        assert!(matches!(
            embed_pattern(&PNG_SIGNATURE, MARKUP, false),
            Err(DecodeError::InvalidContainer(_))
        ));
    }
}
