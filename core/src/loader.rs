//! Async pattern loading
//!
//! Decoding is CPU-bound, so it runs on the blocking pool. Failures are
//! logged and reported as `None`; a caller that gets `None` keeps whatever
//! pattern it already had.

use std::path::Path;

use bead_format::{Pattern, PatternError};

/// Load a pattern from standalone markup bytes.
pub async fn load_from_structured_text(bytes: Vec<u8>) -> Option<Pattern> {
    run_decoder(bytes, bead_format::parse_pattern).await
}

/// Load a pattern embedded in a PNG container.
pub async fn load_from_container(bytes: Vec<u8>) -> Option<Pattern> {
    run_decoder(bytes, bead_format::decode_container).await
}

/// Read a file and load it as a container or as markup, by its signature.
pub async fn load_from_path(path: impl AsRef<Path>) -> Option<Pattern> {
    let path = path.as_ref();
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    let pattern = run_decoder(bytes, bead_format::decode).await?;
    tracing::info!(
        "Loaded '{}' from {} ({} beads)",
        pattern.name(),
        path.display(),
        pattern.len()
    );
    Some(pattern)
}

async fn run_decoder<F>(bytes: Vec<u8>, decode: F) -> Option<Pattern>
where
    F: FnOnce(&[u8]) -> Result<Pattern, PatternError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || decode(&bytes)).await {
        Ok(Ok(pattern)) => Some(pattern),
        Ok(Err(e)) => {
            tracing::warn!("Failed to load pattern: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("Pattern decoder task failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKUP: &str = "<pattern><patternName>Loaded</patternName>\
        <rows>2</rows><columns>4</columns>\
        <bead><color>Red</color><count>4</count></bead>\
        <bead><color>White</color><count>4</count></bead></pattern>";

    fn png_with(markup: &str) -> Vec<u8> {
        let mut png = bead_format::PNG_SIGNATURE.to_vec();
        png.extend_from_slice(&13u32.to_be_bytes());
        png.extend_from_slice(b"IHDR");
        png.extend_from_slice(&[0; 13]);
        png.extend_from_slice(&[0; 4]);
        bead_format::embed_pattern(&png, markup, true).unwrap()
    }

    #[tokio::test]
    async fn test_load_structured_text() {
        let pattern = load_from_structured_text(MARKUP.as_bytes().to_vec())
            .await
            .unwrap();
        assert_eq!(pattern.name(), "Loaded");
        assert_eq!(pattern.len(), 2);
    }

    #[tokio::test]
    async fn test_load_container() {
        let pattern = load_from_container(png_with(MARKUP)).await.unwrap();
        assert_eq!(pattern.columns(), 4);
        assert_eq!(pattern.beads()[1].color, "white");
    }

    #[tokio::test]
    async fn test_failures_yield_none() {
        assert!(load_from_structured_text(b"<pattern><bead>".to_vec()).await.is_none());
        assert!(load_from_container(MARKUP.as_bytes().to_vec()).await.is_none());
        assert!(load_from_path("/definitely/not/here.xbp").await.is_none());
    }

    #[tokio::test]
    async fn test_load_from_path_sniffs_format() {
        let dir = tempfile::tempdir().unwrap();

        let xml_path = dir.path().join("pattern.xbp");
        std::fs::write(&xml_path, MARKUP).unwrap();
        assert_eq!(load_from_path(&xml_path).await.unwrap().name(), "Loaded");

        let png_path = dir.path().join("pattern.png");
        std::fs::write(&png_path, png_with(MARKUP)).unwrap();
        assert_eq!(load_from_path(&png_path).await.unwrap().len(), 2);
    }
}
