//! Merge logic for the two mutation payloads.
//!
//! Payloads are validated into typed values first ([`ReplacePayload`],
//! [`AppendPayload`]); merging a validated payload can't fail. Nothing here
//! touches the disk.

use crate::document::{BackupSlot, Category, Document, Record};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Why a payload didn't validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Not JSON, or not the shape the endpoint expects.
    Malformed(String),
    /// Category identifier outside the known set.
    UnknownCategory(String),
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadError::Malformed(msg) => f.write_str(msg),
            PayloadError::UnknownCategory(id) => write!(f, "unknown contestId `{id}`"),
        }
    }
}

impl std::error::Error for PayloadError {}

/// Computes the next document from the current one.
pub trait Merge {
    /// Consume the payload and produce the document to save.
    fn merge(self, current: Document) -> Document;
}

// ---- full replace ------------------------------------------------------------

/// Whole-category replacements plus optional backup slot overwrites.
///
/// Categories not mentioned are left alone. A backup slot is only touched when
/// the field was present in the payload; an explicit `null` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacePayload {
    categories: BTreeMap<Category, Vec<Record>>,
    backups: BTreeMap<BackupSlot, Value>,
}

impl ReplacePayload {
    /// Parse a request body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| PayloadError::Malformed(format!("body is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Like [`from_slice`](Self::from_slice), but a malformed body becomes an
    /// empty payload, which merges to the unchanged document.
    pub fn parse_lenient(bytes: &[u8]) -> Self {
        Self::from_slice(bytes).unwrap_or_else(|err| {
            debug!(error = %err, "treating malformed replace payload as empty");
            Self::default()
        })
    }

    /// Validate an already-parsed body. Unknown categories and category
    /// values that aren't arrays are skipped, not rejected.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut root) = value else {
            return Err(PayloadError::Malformed("payload is not a JSON object".into()));
        };

        let mut payload = Self::default();
        match root.remove("data") {
            None => {}
            Some(Value::Object(data)) => {
                for (id, value) in data {
                    let Some(category) = Category::from_id(&id) else {
                        debug!(category = %id, "ignoring unknown category in replace payload");
                        continue;
                    };
                    match value {
                        Value::Array(records) => {
                            payload.categories.insert(category, records);
                        }
                        _ => debug!(%category, "ignoring non-array category value"),
                    }
                }
            }
            Some(_) => return Err(PayloadError::Malformed("`data` is not an object".into())),
        }

        for slot in BackupSlot::ALL {
            if let Some(value) = root.remove(slot.field()) {
                payload.backups.insert(slot, value);
            }
        }
        Ok(payload)
    }

    /// Replace one category's records.
    #[must_use]
    pub fn with_records(mut self, category: Category, records: Vec<Record>) -> Self {
        self.categories.insert(category, records);
        self
    }

    /// Overwrite a backup slot. `Value::Null` clears it.
    #[must_use]
    pub fn with_backup(mut self, slot: BackupSlot, value: Value) -> Self {
        self.backups.insert(slot, value);
        self
    }

    /// `true` when merging would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.backups.is_empty()
    }
}

impl Merge for ReplacePayload {
    fn merge(self, mut current: Document) -> Document {
        for (category, records) in self.categories {
            current.replace_records(category, records);
        }
        for (slot, value) in self.backups {
            current.set_backup(slot, Some(value));
        }
        current
    }
}

// ---- single append -----------------------------------------------------------

/// Exactly one record destined for the end of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendPayload {
    category: Category,
    entry: Record,
}

impl AppendPayload {
    /// Build directly. `entry` must be a JSON object.
    pub fn new(category: Category, entry: Record) -> Result<Self, PayloadError> {
        if !entry.is_object() {
            return Err(PayloadError::Malformed("`entry` must be an object".into()));
        }
        Ok(Self { category, entry })
    }

    /// Parse a `{ "contestId": ..., "entry": {...} }` request body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| PayloadError::Malformed(format!("body is not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Validate an already-parsed body.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        let Value::Object(mut root) = value else {
            return Err(PayloadError::Malformed("payload is not a JSON object".into()));
        };

        let category = match root.remove("contestId") {
            Some(Value::String(id)) => {
                Category::from_id(&id).ok_or(PayloadError::UnknownCategory(id))?
            }
            Some(_) => {
                return Err(PayloadError::Malformed("`contestId` must be a string".into()))
            }
            None => return Err(PayloadError::Malformed("missing `contestId`".into())),
        };
        let entry = root.remove("entry").unwrap_or(Value::Null);
        Self::new(category, entry)
    }

    /// Target category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// The record to append.
    #[must_use]
    pub fn entry(&self) -> &Record {
        &self.entry
    }
}

impl Merge for AppendPayload {
    fn merge(self, mut current: Document) -> Document {
        current.push_record(self.category, self.entry);
        current
    }
}
