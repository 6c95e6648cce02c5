use crate::model::{ArchiveRef, MetadataTable, Page};

pub mod access;
pub mod browse;
pub mod export;
pub mod search;

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A downloadable artifact produced by the export commands. The filename
/// derives from the archive name and the content label.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Directory names from a catalog listing (authors, types, archives).
    pub listed: Vec<String>,
    /// Pages of one archive, in display order.
    pub pages: Vec<Page>,
    /// Search results, in discovery order.
    pub results: Vec<ArchiveRef>,
    /// Metadata table of one archive.
    pub table: Option<MetadataTable>,
    /// Bytes to be written out by the caller.
    pub artifact: Option<Artifact>,
    /// Text produced by a collaborator call.
    pub text: Option<String>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, listed: Vec<String>) -> Self {
        self.listed = listed;
        self
    }

    pub fn with_pages(mut self, pages: Vec<Page>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_results(mut self, results: Vec<ArchiveRef>) -> Self {
        self.results = results;
        self
    }

    pub fn with_table(mut self, table: MetadataTable) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}
