//! The document store and its builder.

use crate::document::Document;
use crate::error::{Error, Result};
use crate::guard::MutationGuard;
use crate::merge::{AppendPayload, Merge, ReplacePayload};
use crate::persist::{self, atomic_write};
use crate::serializer::{JsonSerializer, Serializer};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Owns the backing JSON file for the shared contest document.
///
/// Reads go straight to disk and never block. Every mutation runs its
/// load-merge-save sequence under a [`MutationGuard`], so concurrent writers
/// are applied one after the other and none of them is lost. Share it between
/// threads with an `Arc`.
///
/// **Single-process only.** A second process writing the same file bypasses
/// the guard.
///
/// Generic over the on-disk encoding `S`; JSON unless you plug in your own
/// [`Serializer`].
pub struct DocumentStore<S = JsonSerializer> {
    path: PathBuf,
    serializer: S,
    guard: MutationGuard,
}

impl DocumentStore {
    /// Store backed by `path`, pretty-printed. Nothing is read or created yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder(path).build()
    }

    /// Start configuring a store. Call [`.build()`](DocumentStoreBuilder::build)
    /// when ready.
    pub fn builder(path: impl AsRef<Path>) -> DocumentStoreBuilder {
        DocumentStoreBuilder::new(path)
    }
}

impl<S: Serializer> DocumentStore<S> {
    /// Path to the backing JSON file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ---- reads ----

    /// Read the persisted document. `Ok(None)` means nothing has been saved
    /// yet; [`Error::Deserialize`] means the file exists but isn't a document.
    pub fn read(&self) -> Result<Option<Document>> {
        match persist::read(&self.path)? {
            Some(bytes) => self.serializer.deserialize(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Current document, or a fresh one if nothing usable is on disk.
    ///
    /// A corrupt or unreadable file is logged and replaced by the default in
    /// memory only; it gets overwritten by the next successful save.
    #[must_use]
    pub fn load(&self) -> Document {
        match self.read() {
            Ok(Some(doc)) => doc,
            Ok(None) => Document::default(),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "falling back to an empty document");
                Document::default()
            }
        }
    }

    // ---- writes ----

    /// Overwrite the backing file with `doc`.
    pub fn save(&self, doc: &Document) -> Result<()> {
        self.guard.run(|| self.write(doc))
    }

    /// Load, merge `change`, and save, all while holding the guard. Returns
    /// the document as saved. The guard is released on every exit path.
    ///
    /// Unlike [`load`](Self::load), only a corrupt file is replaced by the
    /// default here. A file that can't be read at all fails the mutation, so
    /// its contents are never overwritten blind.
    pub fn mutate<M: Merge>(&self, change: M) -> Result<Document> {
        let _scope = self.guard.acquire();
        let current = match self.read() {
            Ok(doc) => doc.unwrap_or_default(),
            Err(err @ Error::Deserialize(_)) => {
                warn!(path = %self.path.display(), error = %err, "replacing corrupt document");
                Document::default()
            }
            Err(err) => return Err(err),
        };
        let next = change.merge(current);
        self.write(&next)?;
        Ok(next)
    }

    /// Apply a full-replace request body. A malformed body changes nothing
    /// but the document is still written back.
    pub fn replace(&self, body: &[u8]) -> Result<Document> {
        self.mutate(ReplacePayload::parse_lenient(body))
    }

    /// Apply a single-append request body and return the resulting document.
    /// Invalid bodies fail with [`Error::InvalidRequest`] without taking the
    /// guard or writing anything.
    pub fn append(&self, body: &[u8]) -> Result<Document> {
        let payload = AppendPayload::from_slice(body)?;
        self.mutate(payload)
    }

    // ---- internal ----

    fn write(&self, doc: &Document) -> Result<()> {
        let bytes = self.serializer.serialize(doc)?;
        atomic_write(&self.path, &bytes)?;
        debug!(
            path = %self.path.display(),
            records = doc.total_records(),
            bytes = bytes.len(),
            "saved document"
        );
        Ok(())
    }
}

impl<S> std::fmt::Debug for DocumentStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("path", &self.path)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures a [`DocumentStore`].
///
/// ```rust,no_run
/// use contest_sync::DocumentStore;
///
/// let store = DocumentStore::builder("data.json")
///     .pretty(false)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug)]
pub struct DocumentStoreBuilder<S = JsonSerializer> {
    path: PathBuf,
    serializer: S,
}

impl DocumentStoreBuilder {
    fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            serializer: JsonSerializer::pretty(),
        }
    }

    /// Write indented JSON (default) or a single compact line.
    pub fn pretty(mut self, yes: bool) -> Self {
        self.serializer = if yes {
            JsonSerializer::pretty()
        } else {
            JsonSerializer::new()
        };
        self
    }
}

impl<S: Serializer> DocumentStoreBuilder<S> {
    /// Swap in a different encoding for the backing file.
    pub fn serializer<T: Serializer>(self, serializer: T) -> DocumentStoreBuilder<T> {
        DocumentStoreBuilder {
            path: self.path,
            serializer,
        }
    }

    /// Finish configuration. No file is touched until the first save.
    pub fn build(self) -> Result<DocumentStore<S>> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config("store path must not be empty".into()));
        }
        Ok(DocumentStore {
            path: self.path,
            serializer: self.serializer,
            guard: MutationGuard::new(),
        })
    }
}
