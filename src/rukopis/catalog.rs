//! Read-only view over the dataset directory tree.
//!
//! The catalog has a fixed depth-3 layout:
//!
//! ```text
//! <root>/
//! └── <author>/
//!     └── <archive_type>/
//!         └── <archive>/
//!             ├── page1.png          # zero or more page scans
//!             └── meta_data.xlsx     # at most one metadata table
//! ```
//!
//! Every listing operation is total: a missing or non-directory path yields
//! an empty result, never an error. The tree is externally owned and may
//! change underneath the application, so nothing here is cached — each call
//! scans the filesystem afresh.

use crate::model::{ArchiveRef, Page};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Image extension accepted for page scans, matched ASCII case-insensitively.
const PAGE_EXT: &str = "png";

/// Canonical metadata filename inside an archive directory.
pub const METADATA_FILENAME: &str = "meta_data.xlsx";

pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Every author directory under the root, ascending.
    pub fn list_authors(&self) -> Vec<String> {
        list_subdirs(&self.root)
    }

    /// Archive types for one author; empty if the author does not exist.
    pub fn list_archive_types(&self, author: &str) -> Vec<String> {
        list_subdirs(&self.root.join(author))
    }

    /// Archives for one (author, archive type) pair; empty on a missing path.
    pub fn list_archives(&self, author: &str, archive_type: &str) -> Vec<String> {
        list_subdirs(&self.root.join(author).join(archive_type))
    }

    /// Page scans of an archive, sorted ascending by filename and numbered
    /// from zero. Non-image entries are ignored; an unreadable directory
    /// entry is simply omitted.
    pub fn list_pages(&self, aref: &ArchiveRef) -> Vec<Page> {
        let dir = self.archive_dir(aref);
        if !dir.is_dir() {
            return Vec::new();
        }
        let mut names: Vec<String> = match std::fs::read_dir(&dir) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .filter_map(|e| e.file_name().into_string().ok())
                .filter(|name| {
                    Path::new(name)
                        .extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case(PAGE_EXT))
                })
                .collect(),
            Err(err) => {
                debug!(dir = %dir.display(), %err, "page scan failed, treating as empty");
                return Vec::new();
            }
        };
        names.sort();
        names
            .into_iter()
            .enumerate()
            .map(|(ordinal, name)| Page {
                ordinal,
                path: dir.join(name),
            })
            .collect()
    }

    /// Directory holding one archive's pages and metadata.
    pub fn archive_dir(&self, aref: &ArchiveRef) -> PathBuf {
        self.root
            .join(&aref.author)
            .join(&aref.archive_type)
            .join(&aref.archive)
    }

    /// Canonical path of an archive's metadata file. The file may not exist.
    pub fn metadata_path(&self, aref: &ArchiveRef) -> PathBuf {
        self.archive_dir(aref).join(METADATA_FILENAME)
    }
}

/// Immediate subdirectory names of `dir`, sorted ascending. Empty when the
/// path is missing, not a directory, or unreadable.
fn list_subdirs(dir: &Path) -> Vec<String> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect(),
        Err(err) => {
            debug!(dir = %dir.display(), %err, "directory scan failed, treating as empty");
            return Vec::new();
        }
    };
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn catalog_with_dirs(dirs: &[&str]) -> (tempfile::TempDir, Catalog) {
        let tmp = tempfile::tempdir().unwrap();
        for d in dirs {
            fs::create_dir_all(tmp.path().join(d)).unwrap();
        }
        let catalog = Catalog::new(tmp.path());
        (tmp, catalog)
    }

    #[test]
    fn authors_are_sorted_ascending() {
        let (_tmp, catalog) = catalog_with_dirs(&["b_author", "a_author", "c_author"]);
        assert_eq!(
            catalog.list_authors(),
            vec!["a_author", "b_author", "c_author"]
        );
    }

    #[test]
    fn cyrillic_authors_sort_by_code_point() {
        let (_tmp, catalog) = catalog_with_dirs(&["Чехов", "Толстой"]);
        assert_eq!(catalog.list_authors(), vec!["Толстой", "Чехов"]);
    }

    #[test]
    fn files_at_author_level_are_not_authors() {
        let (tmp, catalog) = catalog_with_dirs(&["Толстой"]);
        fs::write(tmp.path().join("readme.txt"), "not an author").unwrap();
        assert_eq!(catalog.list_authors(), vec!["Толстой"]);
    }

    #[test]
    fn missing_root_yields_no_authors() {
        let catalog = Catalog::new("/nonexistent/rukopis/dataset");
        assert!(catalog.list_authors().is_empty());
    }

    #[test]
    fn missing_author_yields_no_archive_types() {
        let (_tmp, catalog) = catalog_with_dirs(&["Толстой/Письма"]);
        assert!(catalog.list_archive_types("Чехов").is_empty());
        assert_eq!(catalog.list_archive_types("Толстой"), vec!["Письма"]);
    }

    #[test]
    fn missing_pair_yields_no_archives() {
        let (_tmp, catalog) = catalog_with_dirs(&["Толстой/Письма/Письмо1"]);
        assert!(catalog.list_archives("Толстой", "Черновики").is_empty());
        assert_eq!(catalog.list_archives("Толстой", "Письма"), vec!["Письмо1"]);
    }

    #[test]
    fn pages_sorted_by_filename_with_case_insensitive_extension() {
        let (tmp, catalog) = catalog_with_dirs(&["Толстой/Письма/Письмо1"]);
        let dir = tmp.path().join("Толстой/Письма/Письмо1");
        for name in ["b.png", "a.png", "c.PNG"] {
            fs::write(dir.join(name), b"png bytes").unwrap();
        }
        fs::write(dir.join("notes.txt"), b"skip me").unwrap();
        fs::write(dir.join(METADATA_FILENAME), b"skip me too").unwrap();

        let aref = ArchiveRef::new("Толстой", "Письма", "Письмо1");
        let pages = catalog.list_pages(&aref);
        let names: Vec<String> = pages.iter().map(|p| p.file_name()).collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.PNG"]);
        let ordinals: Vec<usize> = pages.iter().map(|p| p.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
    }

    #[test]
    fn pages_of_missing_archive_are_empty() {
        let (_tmp, catalog) = catalog_with_dirs(&["Толстой/Письма"]);
        let aref = ArchiveRef::new("Толстой", "Письма", "нет такого");
        assert!(catalog.list_pages(&aref).is_empty());
    }

    #[test]
    fn listing_twice_is_idempotent() {
        let (tmp, catalog) = catalog_with_dirs(&["Толстой/Письма/Письмо1"]);
        fs::write(
            tmp.path().join("Толстой/Письма/Письмо1/a.png"),
            b"png bytes",
        )
        .unwrap();
        let aref = ArchiveRef::new("Толстой", "Письма", "Письмо1");
        assert_eq!(catalog.list_authors(), catalog.list_authors());
        assert_eq!(catalog.list_pages(&aref), catalog.list_pages(&aref));
    }

    #[test]
    fn metadata_path_is_canonical() {
        let catalog = Catalog::new("/data");
        let aref = ArchiveRef::new("a", "t", "x");
        assert_eq!(
            catalog.metadata_path(&aref),
            PathBuf::from("/data/a/t/x/meta_data.xlsx")
        );
    }
}
