//! Fixture helpers shared by the unit tests: dataset trees, fabricated
//! xlsx metadata files, and a tiny valid PNG. Compiled only for tests.

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A valid 1x1 RGBA PNG.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0xfc,
    0xcf, 0xc0, 0x50, 0x0f, 0x00, 0x04, 0x85, 0x01, 0x80, 0x84, 0xa9, 0x8c, 0x21, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build the bytes of a minimal real xlsx file (zip container with one
/// worksheet, all cells as inline strings).
pub fn xlsx_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for row in rows {
        sheet.push_str("<row>");
        for cell in *row {
            sheet.push_str(&format!(
                r#"<c t="inlineStr"><is><t>{}</t></is></c>"#,
                escape_xml(cell)
            ));
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let workbook = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheets><sheet name="Sheet1" sheetId="1"/></sheets></workbook>"#;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default();
    zip.start_file("xl/workbook.xml", opts).unwrap();
    zip.write_all(workbook.as_bytes()).unwrap();
    zip.start_file("xl/worksheets/sheet1.xml", opts).unwrap();
    zip.write_all(sheet.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

/// Create `<root>/<author>/<archive_type>/<archive>/` and return the path.
pub fn make_archive(root: &Path, author: &str, archive_type: &str, archive: &str) -> PathBuf {
    let dir = root.join(author).join(archive_type).join(archive);
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Create an archive directory with a metadata table.
pub fn make_archive_with_meta(
    root: &Path,
    author: &str,
    archive_type: &str,
    archive: &str,
    rows: &[&[&str]],
) -> PathBuf {
    let dir = make_archive(root, author, archive_type, archive);
    fs::write(dir.join(crate::catalog::METADATA_FILENAME), xlsx_bytes(rows)).unwrap();
    dir
}
