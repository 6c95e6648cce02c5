//! Export Builder: downloadable artifacts for one archive.
//!
//! Three artifact kinds, all assembled in memory:
//! - a flat zip bundle of the original page images,
//! - a single PDF with one page per scan, in page order,
//! - the metadata file, byte-for-byte.
//!
//! Partial failure is tolerated everywhere: an unreadable image is skipped
//! and the artifact is built from whatever remains. An archive with nothing
//! to export produces a valid empty container, not an error.

use crate::catalog::Catalog;
use crate::commands::{Artifact, CmdMessage, CmdResult};
use crate::error::{Result, RukopisError};
use crate::model::ArchiveRef;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const MIME_PDF: &str = "application/pdf";
const MIME_ZIP: &str = "application/zip";
const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Zip of the archive's page images under their original filenames, no
/// directory prefix. A missing or empty archive yields a valid zero-entry
/// zip.
pub fn page_bundle(catalog: &Catalog, aref: &ArchiveRef) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for page in catalog.list_pages(aref) {
        let bytes = match std::fs::read(&page.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(page = %page.path.display(), %err, "skipping unreadable page");
                continue;
            }
        };
        zip.start_file(page.file_name(), opts)
            .map_err(|e| RukopisError::Export(e.to_string()))?;
        zip.write_all(&bytes)?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| RukopisError::Export(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// One PDF with one page per scan, each image converted to RGB and placed
/// at one point per pixel. Undecodable images are skipped; with zero
/// convertible pages the result is an empty byte vector.
pub fn paginated_document(catalog: &Catalog, aref: &ArchiveRef) -> Result<Vec<u8>> {
    let mut images = Vec::new();
    for page in catalog.list_pages(aref) {
        match image::open(&page.path) {
            Ok(img) => images.push(img.to_rgb8()),
            Err(err) => {
                debug!(page = %page.path.display(), %err, "skipping undecodable page");
            }
        }
    }
    if images.is_empty() {
        return Ok(Vec::new());
    }

    let mut pdf = Pdf::new();
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    pdf.catalog(catalog_id).pages(page_tree_id);

    // (page, image xobject, content stream) ids per scan.
    let ids: Vec<(Ref, Ref, Ref)> = images
        .iter()
        .map(|_| (alloc.bump(), alloc.bump(), alloc.bump()))
        .collect();
    pdf.pages(page_tree_id)
        .kids(ids.iter().map(|(page_id, _, _)| *page_id))
        .count(images.len() as i32);

    for ((page_id, image_id, content_id), img) in ids.iter().zip(&images) {
        let (width, height) = img.dimensions();
        let (w_pt, h_pt) = (width as f32, height as f32);

        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, w_pt, h_pt));
        page.parent(page_tree_id);
        page.contents(*content_id);
        page.resources().x_objects().pair(Name(b"Im0"), *image_id);
        page.finish();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(img.as_raw())?;
        let data = encoder.finish()?;

        let mut xobject = pdf.image_xobject(*image_id, &data);
        xobject.filter(Filter::FlateDecode);
        xobject.width(width as i32);
        xobject.height(height as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        xobject.finish();

        let mut content = Content::new();
        content.save_state();
        content.transform([w_pt, 0.0, 0.0, h_pt, 0.0, 0.0]);
        content.x_object(Name(b"Im0"));
        content.restore_state();
        pdf.stream(*content_id, &content.finish());
    }

    Ok(pdf.finish())
}

/// Byte-for-byte passthrough of the stored metadata file. A read failure is
/// indistinguishable from absence, matching the metadata index boundary.
pub fn metadata_bytes(catalog: &Catalog, aref: &ArchiveRef) -> Result<Option<Vec<u8>>> {
    let path = catalog.metadata_path(aref);
    if !path.exists() {
        return Ok(None);
    }
    match std::fs::read(&path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) => {
            debug!(path = %path.display(), %err, "metadata unreadable for export");
            Ok(None)
        }
    }
}

pub fn run_bundle(catalog: &Catalog, aref: &ArchiveRef) -> Result<CmdResult> {
    let bytes = page_bundle(catalog, aref)?;
    Ok(CmdResult::default().with_artifact(Artifact {
        file_name: format!("{}.zip", aref.archive),
        mime: MIME_ZIP,
        bytes,
    }))
}

pub fn run_document(catalog: &Catalog, aref: &ArchiveRef) -> Result<CmdResult> {
    let bytes = paginated_document(catalog, aref)?;
    let mut result = CmdResult::default();
    if bytes.is_empty() {
        result.add_message(CmdMessage::warning("No convertible pages in this archive."));
    }
    result = result.with_artifact(Artifact {
        file_name: format!("{}.pdf", aref.archive),
        mime: MIME_PDF,
        bytes,
    });
    Ok(result)
}

pub fn run_metadata(catalog: &Catalog, aref: &ArchiveRef) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match metadata_bytes(catalog, aref)? {
        Some(bytes) => {
            result = result.with_artifact(Artifact {
                file_name: format!("meta_{}.xlsx", aref.archive),
                mime: MIME_XLSX,
                bytes,
            });
        }
        None => result.add_message(CmdMessage::info("No metadata for this archive.")),
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{make_archive, make_archive_with_meta, TINY_PNG};
    use std::fs;
    use zip::ZipArchive;

    fn aref() -> ArchiveRef {
        ArchiveRef::new("Толстой", "Письма", "Письмо1")
    }

    #[test]
    fn empty_archive_yields_valid_empty_zip() {
        let tmp = tempfile::tempdir().unwrap();
        make_archive(tmp.path(), "Толстой", "Письма", "Письмо1");
        let catalog = Catalog::new(tmp.path());

        let bytes = page_bundle(&catalog, &aref()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn missing_archive_yields_valid_empty_zip() {
        let tmp = tempfile::tempdir().unwrap();
        let catalog = Catalog::new(tmp.path());

        let bytes = page_bundle(&catalog, &aref()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }

    #[test]
    fn bundle_entries_are_flat_and_byte_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = make_archive(tmp.path(), "Толстой", "Письма", "Письмо1");
        fs::write(dir.join("b.png"), TINY_PNG).unwrap();
        fs::write(dir.join("a.png"), TINY_PNG).unwrap();
        let catalog = Catalog::new(tmp.path());

        let bytes = page_bundle(&catalog, &aref()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();
        assert!(names.contains(&"a.png".to_string()));
        assert!(names.iter().all(|n| !n.contains('/')));

        let mut entry = archive.by_name("a.png").unwrap();
        let mut out = Vec::new();
        std::io::Read::read_to_end(&mut entry, &mut out).unwrap();
        assert_eq!(out, TINY_PNG);
    }

    #[test]
    fn document_of_empty_archive_is_zero_length() {
        let tmp = tempfile::tempdir().unwrap();
        make_archive(tmp.path(), "Толстой", "Письма", "Письмо1");
        let catalog = Catalog::new(tmp.path());

        let bytes = paginated_document(&catalog, &aref()).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn document_has_one_pdf_page_per_scan() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = make_archive(tmp.path(), "Толстой", "Письма", "Письмо1");
        fs::write(dir.join("a.png"), TINY_PNG).unwrap();
        fs::write(dir.join("b.png"), TINY_PNG).unwrap();
        let catalog = Catalog::new(tmp.path());

        let bytes = paginated_document(&catalog, &aref()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 2"));
    }

    #[test]
    fn undecodable_page_is_skipped_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = make_archive(tmp.path(), "Толстой", "Письма", "Письмо1");
        fs::write(dir.join("a.png"), b"not really a png").unwrap();
        fs::write(dir.join("b.png"), TINY_PNG).unwrap();
        let catalog = Catalog::new(tmp.path());

        let bytes = paginated_document(&catalog, &aref()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Count 1"));
    }

    #[test]
    fn metadata_roundtrips_byte_for_byte() {
        let tmp = tempfile::tempdir().unwrap();
        make_archive_with_meta(tmp.path(), "Толстой", "Письма", "Письмо1", &[&["Дата", "1923"]]);
        let catalog = Catalog::new(tmp.path());

        let stored = fs::read(catalog.metadata_path(&aref())).unwrap();
        let exported = metadata_bytes(&catalog, &aref()).unwrap().unwrap();
        assert_eq!(stored, exported);
    }

    #[test]
    fn absent_metadata_exports_as_none() {
        let tmp = tempfile::tempdir().unwrap();
        make_archive(tmp.path(), "Толстой", "Письма", "Письмо1");
        let catalog = Catalog::new(tmp.path());
        assert!(metadata_bytes(&catalog, &aref()).unwrap().is_none());
    }

    #[test]
    fn artifact_names_derive_from_the_archive() {
        let tmp = tempfile::tempdir().unwrap();
        make_archive(tmp.path(), "Толстой", "Письма", "Письмо1");
        let catalog = Catalog::new(tmp.path());

        let result = run_bundle(&catalog, &aref()).unwrap();
        assert_eq!(result.artifact.unwrap().file_name, "Письмо1.zip");

        let result = run_document(&catalog, &aref()).unwrap();
        assert_eq!(result.artifact.unwrap().file_name, "Письмо1.pdf");
    }
}
