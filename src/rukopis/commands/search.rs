//! Search over the catalog and metadata index.
//!
//! Both modes return results in discovery order: author ascending, then
//! archive type, then archive — the natural product of the three sorted
//! enumerations. Nothing is ranked and nothing is cached; every query
//! rescans the tree.

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::metadata;
use crate::model::{ArchiveRef, SearchFilter, SearchOutcome};
use tracing::debug;

/// Simple search: case-folded substring match over each archive's metadata
/// text. Archives without a loadable table never match.
pub fn search(catalog: &Catalog, query: &str) -> SearchOutcome {
    if query.is_empty() {
        return SearchOutcome::EmptyQuery;
    }
    let needle = query.to_lowercase();
    let mut results = Vec::new();
    for author in catalog.list_authors() {
        for archive_type in catalog.list_archive_types(&author) {
            for archive in catalog.list_archives(&author, &archive_type) {
                let aref = ArchiveRef::new(&author, &archive_type, &archive);
                let load = metadata::load(&catalog.metadata_path(&aref));
                if let Some(table) = load.table() {
                    if table.searchable_text().contains(&needle) {
                        results.push(aref);
                    }
                }
            }
        }
    }
    debug!(query, hits = results.len(), "simple search finished");
    SearchOutcome::Results(results)
}

/// Filtered search. Filters restrict enumeration; free text applies the
/// simple-search match rule. With no filters at all this is a full catalog
/// traversal ("browse all"), which is valid, just expensive.
pub fn search_filtered(catalog: &Catalog, filter: &SearchFilter) -> Vec<ArchiveRef> {
    let authors = match filter.author() {
        Some(author) => vec![author.to_string()],
        None => catalog.list_authors(),
    };
    let needle = filter.free_text().map(|t| t.to_lowercase());

    let mut results = Vec::new();
    for author in authors {
        // The type filter applies per author: an author without the
        // requested type contributes nothing, which is not a failure.
        let archive_types = match filter.archive_type() {
            Some(ty) => {
                if catalog.list_archive_types(&author).iter().any(|t| t == ty) {
                    vec![ty.to_string()]
                } else {
                    continue;
                }
            }
            None => catalog.list_archive_types(&author),
        };
        for archive_type in archive_types {
            for archive in catalog.list_archives(&author, &archive_type) {
                let aref = ArchiveRef::new(&author, &archive_type, &archive);
                let matches = match &needle {
                    None => true,
                    Some(needle) => metadata::load(&catalog.metadata_path(&aref))
                        .table()
                        .is_some_and(|table| table.searchable_text().contains(needle)),
                };
                if matches {
                    results.push(aref);
                }
            }
        }
    }
    debug!(hits = results.len(), "filtered search finished");
    results
}

pub fn run(catalog: &Catalog, query: &str) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match search(catalog, query) {
        SearchOutcome::EmptyQuery => {
            result.add_message(CmdMessage::info("Enter a query to search."));
        }
        SearchOutcome::Results(found) if found.is_empty() => {
            result.add_message(CmdMessage::info("Nothing matched your query."));
        }
        SearchOutcome::Results(found) => {
            result.add_message(CmdMessage::success(format!("Found {} result(s):", found.len())));
            result = result.with_results(found);
        }
    }
    Ok(result)
}

pub fn run_filtered(catalog: &Catalog, filter: &SearchFilter) -> Result<CmdResult> {
    let found = search_filtered(catalog, filter);
    let mut result = CmdResult::default();
    if found.is_empty() {
        result.add_message(CmdMessage::info("Nothing matched your query."));
    } else {
        result.add_message(CmdMessage::success(format!("Found {} result(s):", found.len())));
        result = result.with_results(found);
    }
    Ok(result)
}
