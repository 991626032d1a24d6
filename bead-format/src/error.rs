//! Decoding error types

/// Failure while unpacking a pattern from its binary container.
///
/// Every variant is terminal for the load attempt: no partial pattern is
/// ever produced alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Bad signature or chunk framing that runs past the end of the buffer
    #[error("Invalid container: {0}")]
    InvalidContainer(String),

    /// No chunk with the requested tag, or the chunk carries another keyword
    #[error("Pattern chunk not found")]
    ChunkNotFound,

    /// Missing null terminator or unsupported compression method
    #[error("Invalid chunk structure: {0}")]
    InvalidChunkStructure(String),

    /// The compressed stream is corrupt or truncated
    #[error("Decompression failed: {0}")]
    DecompressionFailed(String),

    /// Compressing pattern text for embedding failed
    #[error("Compression failed: {0}")]
    CompressionFailed(String),

    /// Decompressed bytes are not valid UTF-8
    #[error("Decoded text is not valid UTF-8")]
    InvalidEncoding,
}

/// Failure while building a [`crate::Pattern`] from raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The markup itself is malformed
    #[error("Malformed pattern markup: {0}")]
    Markup(String),

    /// The document ended without a closed top-level `pattern` element
    #[error("Document does not contain a pattern element")]
    MissingPattern,
}
