use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::metadata;
use crate::model::ArchiveRef;

pub fn authors(catalog: &Catalog) -> Result<CmdResult> {
    let authors = catalog.list_authors();
    let mut result = CmdResult::default().with_listed(authors);
    if result.listed.is_empty() {
        result.add_message(CmdMessage::warning("No authors found in the catalog."));
    }
    Ok(result)
}

pub fn archive_types(catalog: &Catalog, author: &str) -> Result<CmdResult> {
    let types = catalog.list_archive_types(author);
    let mut result = CmdResult::default().with_listed(types);
    if result.listed.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No archive types for author '{}'.",
            author
        )));
    }
    Ok(result)
}

pub fn archives(catalog: &Catalog, author: &str, archive_type: &str) -> Result<CmdResult> {
    let archives = catalog.list_archives(author, archive_type);
    let mut result = CmdResult::default().with_listed(archives);
    if result.listed.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "No archives under '{}' / '{}'.",
            author, archive_type
        )));
    }
    Ok(result)
}

pub fn pages(catalog: &Catalog, aref: &ArchiveRef) -> Result<CmdResult> {
    let pages = catalog.list_pages(aref);
    let mut result = CmdResult::default().with_pages(pages);
    if result.pages.is_empty() {
        result.add_message(CmdMessage::info("No page scans in this archive."));
    }
    Ok(result)
}

pub fn metadata(catalog: &Catalog, aref: &ArchiveRef) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match metadata::load(&catalog.metadata_path(aref)).into_table() {
        Some(table) => result = result.with_table(table),
        None => result.add_message(CmdMessage::info("No metadata for this archive.")),
    }
    Ok(result)
}
