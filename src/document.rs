//! The shared contest document and its closed set of categories.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// One contest entry. The store never looks inside it.
pub type Record = Value;

/// Contest identifiers. The set is fixed at build time; variant order is the
/// order categories appear in the persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// IQ quiz.
    Iq,
    /// Sanskriti contest.
    Sanskriti,
    /// Maths quiz.
    Maths,
    /// Sudoku.
    Sudoku,
}

impl Category {
    /// Every known category, in display order.
    pub const ALL: [Category; 4] = [
        Category::Iq,
        Category::Sanskriti,
        Category::Maths,
        Category::Sudoku,
    ];

    /// Resolve a wire identifier. Matching is exact (`"IQ"` is not `iq`).
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == id)
    }

    /// The identifier used on the wire and on disk.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Iq => "iq",
            Category::Sanskriti => "sanskriti",
            Category::Maths => "maths",
            Category::Sudoku => "sudoku",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two client-managed restore points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackupSlot {
    /// Stored under `backup1`.
    First,
    /// Stored under `backup2`.
    Second,
}

impl BackupSlot {
    /// Both slots.
    pub const ALL: [BackupSlot; 2] = [BackupSlot::First, BackupSlot::Second];

    /// Top-level field name of this slot.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            BackupSlot::First => "backup1",
            BackupSlot::Second => "backup2",
        }
    }
}

/// Full persisted state: per-category record lists plus two opaque backups.
///
/// Every category is always present. The map is private so that holds no
/// matter what a caller does with a `Document` it was handed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct Document {
    #[serde(rename = "data")]
    categories: BTreeMap<Category, Vec<Record>>,
    backup1: Option<Value>,
    backup2: Option<Value>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            categories: Category::ALL.into_iter().map(|c| (c, Vec::new())).collect(),
            backup1: None,
            backup2: None,
        }
    }
}

impl Document {
    /// Records of `category`, in submission order.
    #[must_use]
    pub fn records(&self, category: Category) -> &[Record] {
        self.categories.get(&category).map_or(&[][..], Vec::as_slice)
    }

    /// Number of records in `category`.
    #[must_use]
    pub fn len(&self, category: Category) -> usize {
        self.records(category).len()
    }

    /// Records across all categories.
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Swap out the whole list for `category`.
    pub fn replace_records(&mut self, category: Category, records: Vec<Record>) {
        self.categories.insert(category, records);
    }

    /// Append one record to the end of `category`.
    pub fn push_record(&mut self, category: Category, record: Record) {
        self.categories.entry(category).or_default().push(record);
    }

    /// Contents of a backup slot, if set.
    #[must_use]
    pub fn backup(&self, slot: BackupSlot) -> Option<&Value> {
        match slot {
            BackupSlot::First => self.backup1.as_ref(),
            BackupSlot::Second => self.backup2.as_ref(),
        }
    }

    /// Overwrite a backup slot. `Some(Value::Null)` is stored as unset.
    pub fn set_backup(&mut self, slot: BackupSlot, value: Option<Value>) {
        let value = value.filter(|v| !v.is_null());
        match slot {
            BackupSlot::First => self.backup1 = value,
            BackupSlot::Second => self.backup2 = value,
        }
    }
}

impl TryFrom<Value> for Document {
    type Error = Error;

    /// Validate a parsed file and repair it. Unknown keys are dropped and a
    /// category that is missing or not an array comes back empty. Only a
    /// root or `data` of the wrong type rejects the whole file.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut root) = value else {
            return Err(Error::Deserialize("document root is not an object".into()));
        };

        let mut doc = Document::default();
        match root.remove("data") {
            None => {}
            Some(Value::Object(data)) => fill_categories(&mut doc, data),
            Some(_) => return Err(Error::Deserialize("`data` is not an object".into())),
        }
        for slot in BackupSlot::ALL {
            doc.set_backup(slot, root.remove(slot.field()));
        }
        Ok(doc)
    }
}

fn fill_categories(doc: &mut Document, mut data: Map<String, Value>) {
    for category in Category::ALL {
        match data.remove(category.as_str()) {
            None => {}
            Some(Value::Array(records)) => doc.replace_records(category, records),
            Some(_) => warn!(%category, "stored category is not an array, resetting it"),
        }
    }
}
