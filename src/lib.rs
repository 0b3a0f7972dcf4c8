//! Shared JSON document store for contest scoring.
//!
//! Several browsers read and write one document holding the results of four
//! contests plus two client-managed backup slots. [`DocumentStore`] persists
//! it with atomic saves and runs every read-modify-write under a fair lock,
//! so concurrent submissions are never lost or interleaved.
//!
//! ```rust,no_run
//! use contest_sync::{Category, DocumentStore};
//!
//! let store = DocumentStore::open("data.json").unwrap();
//! let doc = store
//!     .append(br#"{"contestId": "iq", "entry": {"contestantName": "Asha", "score": 17}}"#)
//!     .unwrap();
//! assert_eq!(doc.len(Category::Iq), 1);
//! ```
//!
//! With the `server` feature (on by default) the crate also ships the HTTP
//! service that exposes the store to the UI.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod guard;
pub mod merge;
pub mod persist;
pub mod serializer;
pub mod store;

#[cfg(feature = "server")]
pub mod config;
#[cfg(feature = "server")]
pub mod server;

pub use document::{BackupSlot, Category, Document, Record};
pub use error::{Error, Result};
pub use guard::MutationGuard;
pub use merge::{AppendPayload, Merge, PayloadError, ReplacePayload};
pub use serializer::{JsonSerializer, Serializer};
pub use store::{DocumentStore, DocumentStoreBuilder};
