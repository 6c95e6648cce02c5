use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identifies one archive in the catalog. Identifiers are exactly the
/// directory names on disk; uniqueness comes from the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchiveRef {
    pub author: String,
    pub archive_type: String,
    pub archive: String,
}

impl ArchiveRef {
    pub fn new(
        author: impl Into<String>,
        archive_type: impl Into<String>,
        archive: impl Into<String>,
    ) -> Self {
        Self {
            author: author.into(),
            archive_type: archive_type.into(),
            archive: archive.into(),
        }
    }
}

impl std::fmt::Display for ArchiveRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.author, self.archive_type, self.archive)
    }
}

/// One scanned page within an archive. Identity is (archive, ordinal);
/// the ordinal is the page's position in filename-sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub ordinal: usize,
    pub path: PathBuf,
}

impl Page {
    /// Filename of the page image, for display and bundle entry names.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Tabular metadata loaded from an archive's spreadsheet file.
///
/// The table is treated as an opaque document: the only consumer beyond
/// display is [`MetadataTable::searchable_text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTable {
    pub rows: Vec<Vec<String>>,
}

impl MetadataTable {
    /// Case-folded textual rendering of every cell, used for substring
    /// search. Deterministic for a given table.
    pub fn searchable_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            for cell in row {
                out.push_str(cell);
                out.push(' ');
            }
            out.push('\n');
        }
        out.to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of attempting to load an archive's metadata table.
///
/// `Missing` and `Unreadable` are kept distinct internally; callers that
/// want the original collapsed behaviour (absent == unparseable) use
/// [`MetadataLoad::table`].
#[derive(Debug, Clone)]
pub enum MetadataLoad {
    Loaded(MetadataTable),
    /// No metadata file at the canonical path.
    Missing,
    /// A file exists but could not be parsed.
    Unreadable,
}

impl MetadataLoad {
    /// Collapse to the boundary view: a table, or nothing.
    pub fn table(&self) -> Option<&MetadataTable> {
        match self {
            MetadataLoad::Loaded(t) => Some(t),
            MetadataLoad::Missing | MetadataLoad::Unreadable => None,
        }
    }

    pub fn into_table(self) -> Option<MetadataTable> {
        match self {
            MetadataLoad::Loaded(t) => Some(t),
            MetadataLoad::Missing | MetadataLoad::Unreadable => None,
        }
    }
}

/// Outcome of a simple search. An empty query is not a search that found
/// nothing; the two states are distinct so the caller never has to infer
/// "not searched" from the emptiness of an input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    EmptyQuery,
    Results(Vec<ArchiveRef>),
}

/// Filters for the filtered search mode. Empty strings are treated the
/// same as `None`: not provided.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    pub author: Option<String>,
    pub archive_type: Option<String>,
    pub free_text: Option<String>,
}

impl SearchFilter {
    fn normalize(field: &Option<String>) -> Option<&str> {
        field.as_deref().filter(|s| !s.is_empty())
    }

    pub fn author(&self) -> Option<&str> {
        Self::normalize(&self.author)
    }

    pub fn archive_type(&self) -> Option<&str> {
        Self::normalize(&self.archive_type)
    }

    pub fn free_text(&self) -> Option<&str> {
        Self::normalize(&self.free_text)
    }

    pub fn is_unfiltered(&self) -> bool {
        self.author().is_none() && self.archive_type().is_none() && self.free_text().is_none()
    }
}
