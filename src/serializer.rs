//! Serialization layer. Defaults to JSON via serde_json.

use crate::document::Document;
use crate::error::{Error, Result};

/// Converts documents to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode a document to bytes.
    fn serialize(&self, doc: &Document) -> Result<Vec<u8>>;

    /// Decode and validate bytes. Structural problems come back as
    /// [`Error::Deserialize`].
    fn deserialize(&self, bytes: &[u8]) -> Result<Document>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with indentation, easier to read and fix by hand.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, doc: &Document) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(doc)
        } else {
            serde_json::to_vec(doc)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Document> {
        serde_json::from_slice(bytes).map_err(Error::from)
    }
}
