//! Metadata Index: loads an archive's spreadsheet into a [`MetadataTable`].
//!
//! The metadata file is an OOXML spreadsheet, which is a zip container of
//! XML parts. Rather than pulling in a full spreadsheet library, the two
//! parts that carry cell content are read directly: the shared-string pool
//! (`xl/sharedStrings.xml`) and the first worksheet. That is all the search
//! subsystem needs — the table is only ever rendered to text.
//!
//! Load failures degrade, never propagate: a missing file is
//! [`MetadataLoad::Missing`], a present-but-unparseable file is
//! [`MetadataLoad::Unreadable`], and both collapse to "no table" at the
//! boundary.

use crate::model::{MetadataLoad, MetadataTable};
use std::io::Read;
use std::path::Path;
use tracing::debug;
use xml::reader::{EventReader, XmlEvent};
use zip::ZipArchive;

/// Load the metadata table at `path`.
pub fn load(path: &Path) -> MetadataLoad {
    if !path.exists() {
        return MetadataLoad::Missing;
    }
    match parse_xlsx(path) {
        Some(table) => MetadataLoad::Loaded(table),
        None => {
            debug!(path = %path.display(), "metadata file unreadable, treating as absent");
            MetadataLoad::Unreadable
        }
    }
}

fn parse_xlsx(path: &Path) -> Option<MetadataTable> {
    let file = std::fs::File::open(path).ok()?;
    let mut archive = ZipArchive::new(file).ok()?;

    let shared = read_shared_strings(&mut archive)?;
    let sheet_name = first_worksheet_name(&archive)?;

    let mut xml = String::new();
    archive
        .by_name(&sheet_name)
        .ok()?
        .read_to_string(&mut xml)
        .ok()?;

    parse_sheet(&xml, &shared)
}

/// Shared-string pool, or an empty pool when the part is absent.
fn read_shared_strings<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>) -> Option<Vec<String>> {
    let mut xml = String::new();
    match archive.by_name("xl/sharedStrings.xml") {
        Ok(mut part) => part.read_to_string(&mut xml).ok()?,
        Err(_) => return Some(Vec::new()),
    };

    let mut pool = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    for event in EventReader::from_str(&xml) {
        match event.ok()? {
            XmlEvent::StartElement { name, .. } => match name.local_name.as_str() {
                "si" => current.clear(),
                "t" => in_text = true,
                _ => {}
            },
            XmlEvent::Characters(text) if in_text => current.push_str(&text),
            XmlEvent::EndElement { name } => match name.local_name.as_str() {
                "t" => in_text = false,
                "si" => pool.push(std::mem::take(&mut current)),
                _ => {}
            },
            _ => {}
        }
    }
    Some(pool)
}

/// Worksheet part names sort so that `sheet1.xml` comes first.
fn first_worksheet_name<R: Read + std::io::Seek>(archive: &ZipArchive<R>) -> Option<String> {
    let mut sheets: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with("xl/worksheets/") && n.ends_with(".xml"))
        .map(|n| n.to_string())
        .collect();
    sheets.sort();
    sheets.into_iter().next()
}

fn parse_sheet(xml: &str, shared: &[String]) -> Option<MetadataTable> {
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current_row: Vec<String> = Vec::new();
    let mut cell_type: Option<String> = None;
    let mut cell_text = String::new();
    let mut in_value = false;
    let mut in_inline = false;

    for event in EventReader::from_str(xml) {
        match event.ok()? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => match name.local_name.as_str() {
                "row" => current_row.clear(),
                "c" => {
                    cell_type = attributes
                        .iter()
                        .find(|a| a.name.local_name == "t")
                        .map(|a| a.value.clone());
                    cell_text.clear();
                }
                "v" => in_value = true,
                "t" if cell_type.as_deref() == Some("inlineStr") => in_inline = true,
                _ => {}
            },
            XmlEvent::Characters(text) if in_value || in_inline => cell_text.push_str(&text),
            XmlEvent::EndElement { name } => match name.local_name.as_str() {
                "v" => in_value = false,
                "t" => in_inline = false,
                "c" => {
                    current_row.push(resolve_cell(&cell_type, &cell_text, shared));
                    cell_type = None;
                }
                "row" => rows.push(std::mem::take(&mut current_row)),
                _ => {}
            },
            _ => {}
        }
    }

    Some(MetadataTable { rows })
}

/// A cell of type `s` holds an index into the shared-string pool; anything
/// else carries its value inline.
fn resolve_cell(cell_type: &Option<String>, raw: &str, shared: &[String]) -> String {
    match cell_type.as_deref() {
        Some("s") => raw
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| shared.get(i))
            .cloned()
            .unwrap_or_default(),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::xlsx_bytes;
    use std::fs;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    #[test]
    fn missing_file_is_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let load = load(&tmp.path().join("meta_data.xlsx"));
        assert!(matches!(load, MetadataLoad::Missing));
    }

    #[test]
    fn garbage_file_is_unreadable() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("meta_data.xlsx");
        fs::write(&path, b"this is not a zip container").unwrap();
        assert!(matches!(load(&path), MetadataLoad::Unreadable));
    }

    #[test]
    fn inline_string_cells_load_row_by_row() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("meta_data.xlsx");
        fs::write(
            &path,
            xlsx_bytes(&[&["Дата", "1923"], &["Название", "Письмо к брату"]]),
        )
        .unwrap();

        let table = load(&path).into_table().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Дата", "1923"]);
        assert!(table.searchable_text().contains("письмо к брату"));
    }

    #[test]
    fn shared_strings_and_numbers_resolve() {
        // Handcrafted workbook using the shared-string pool and a plain
        // numeric cell, the layout spreadsheet applications actually emit.
        let shared = r#"<?xml version="1.0"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>Дата</t></si><si><r><t>Тип </t></r><r><t>документа</t></r></si></sst>"#;
        let sheet = r#"<?xml version="1.0"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row><c t="s"><v>0</v></c><c><v>1923</v></c></row><row><c t="s"><v>1</v></c></row></sheetData></worksheet>"#;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = SimpleFileOptions::default();
        zip.start_file("xl/sharedStrings.xml", opts).unwrap();
        zip.write_all(shared.as_bytes()).unwrap();
        zip.start_file("xl/worksheets/sheet1.xml", opts).unwrap();
        zip.write_all(sheet.as_bytes()).unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("meta_data.xlsx");
        fs::write(&path, bytes).unwrap();

        let table = load(&path).into_table().unwrap();
        assert_eq!(table.rows[0], vec!["Дата", "1923"]);
        // Runs within one shared string concatenate.
        assert_eq!(table.rows[1], vec!["Тип документа"]);
    }

    #[test]
    fn empty_table_is_distinct_from_absent() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("meta_data.xlsx");
        fs::write(&path, xlsx_bytes(&[])).unwrap();

        let table = load(&path).into_table().unwrap();
        assert!(table.is_empty());
    }
}
