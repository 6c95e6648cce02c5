//! Per-run application state: the current selection and the per-page
//! result caches.
//!
//! Selection and caches live in one struct with named fields per concern.
//! Collaborator output is cached by page path so repeating an operation on
//! the same page within a run never re-invokes the external model; caches
//! survive navigation between archives.

use crate::model::ArchiveRef;
use crate::speech::SpeechAudio;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Caches of collaborator output, keyed by page path.
#[derive(Debug, Default)]
pub struct PageResults {
    transcription: HashMap<PathBuf, String>,
    plain_language: HashMap<PathBuf, String>,
    tei: HashMap<PathBuf, String>,
    description: HashMap<PathBuf, String>,
    narration: HashMap<PathBuf, SpeechAudio>,
}

impl PageResults {
    pub fn transcription(&self, page: &Path) -> Option<&String> {
        self.transcription.get(page)
    }

    pub fn set_transcription(&mut self, page: &Path, text: String) {
        self.transcription.insert(page.to_path_buf(), text);
    }

    pub fn plain_language(&self, page: &Path) -> Option<&String> {
        self.plain_language.get(page)
    }

    pub fn set_plain_language(&mut self, page: &Path, text: String) {
        self.plain_language.insert(page.to_path_buf(), text);
    }

    pub fn tei(&self, page: &Path) -> Option<&String> {
        self.tei.get(page)
    }

    pub fn set_tei(&mut self, page: &Path, text: String) {
        self.tei.insert(page.to_path_buf(), text);
    }

    pub fn description(&self, page: &Path) -> Option<&String> {
        self.description.get(page)
    }

    pub fn set_description(&mut self, page: &Path, text: String) {
        self.description.insert(page.to_path_buf(), text);
    }

    pub fn narration(&self, page: &Path) -> Option<&SpeechAudio> {
        self.narration.get(page)
    }

    pub fn set_narration(&mut self, page: &Path, audio: SpeechAudio) {
        self.narration.insert(page.to_path_buf(), audio);
    }
}

/// One user's session: current selection plus result caches.
#[derive(Debug, Default)]
pub struct Session {
    selected_archive: Option<ArchiveRef>,
    selected_page: Option<usize>,
    pub results: PageResults,
}

impl Session {
    pub fn selected_archive(&self) -> Option<&ArchiveRef> {
        self.selected_archive.as_ref()
    }

    pub fn selected_page(&self) -> Option<usize> {
        self.selected_page
    }

    /// Select an archive. Any page selection belongs to the previous
    /// archive and is cleared; caches are kept.
    pub fn select_archive(&mut self, aref: ArchiveRef) {
        self.selected_archive = Some(aref);
        self.selected_page = None;
    }

    pub fn select_page(&mut self, ordinal: usize) {
        self.selected_page = Some(ordinal);
    }

    pub fn clear_selection(&mut self) {
        self.selected_archive = None;
        self.selected_page = None;
    }
}
