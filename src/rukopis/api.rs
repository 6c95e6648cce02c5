//! The API facade: single entry point for all rukopis operations.
//!
//! The facade dispatches to the command layer, normalizes inputs (a page
//! ordinal becomes a page path here, and an out-of-range ordinal is the one
//! precondition violation that surfaces as an explicit error), and returns
//! structured [`CmdResult`] values. It never prints and never exits; those
//! are CLI concerns.

use crate::catalog::Catalog;
use crate::commands::{self, CmdResult};
use crate::error::{Result, RukopisError};
use crate::llm::LlmClient;
use crate::model::{ArchiveRef, Page, SearchFilter};
use crate::session::Session;
use crate::speech::SpeechClient;

pub struct RukopisApi {
    catalog: Catalog,
    llm: Option<LlmClient>,
    speech: SpeechClient,
    vocabulary: Vec<String>,
    session: Session,
}

impl RukopisApi {
    pub fn new(catalog: Catalog, speech: SpeechClient) -> Self {
        Self {
            catalog,
            llm: None,
            speech,
            vocabulary: Vec::new(),
            session: Session::default(),
        }
    }

    /// Attach the language-model collaborator. Without it the catalog,
    /// search and export operations still work; the accessibility
    /// operations report an explicit error.
    pub fn with_llm(mut self, llm: LlmClient) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_vocabulary(mut self, vocabulary: Vec<String>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    // Catalog browsing

    pub fn authors(&self) -> Result<CmdResult> {
        commands::browse::authors(&self.catalog)
    }

    pub fn archive_types(&self, author: &str) -> Result<CmdResult> {
        commands::browse::archive_types(&self.catalog, author)
    }

    pub fn archives(&self, author: &str, archive_type: &str) -> Result<CmdResult> {
        commands::browse::archives(&self.catalog, author, archive_type)
    }

    pub fn pages(&self, aref: &ArchiveRef) -> Result<CmdResult> {
        commands::browse::pages(&self.catalog, aref)
    }

    pub fn metadata(&self, aref: &ArchiveRef) -> Result<CmdResult> {
        commands::browse::metadata(&self.catalog, aref)
    }

    // Search

    pub fn search(&self, query: &str) -> Result<CmdResult> {
        commands::search::run(&self.catalog, query)
    }

    pub fn search_filtered(&self, filter: &SearchFilter) -> Result<CmdResult> {
        commands::search::run_filtered(&self.catalog, filter)
    }

    // Export

    pub fn export_bundle(&self, aref: &ArchiveRef) -> Result<CmdResult> {
        commands::export::run_bundle(&self.catalog, aref)
    }

    pub fn export_document(&self, aref: &ArchiveRef) -> Result<CmdResult> {
        commands::export::run_document(&self.catalog, aref)
    }

    pub fn export_metadata(&self, aref: &ArchiveRef) -> Result<CmdResult> {
        commands::export::run_metadata(&self.catalog, aref)
    }

    // Accessibility operations on one page

    pub fn transcribe_page(&mut self, aref: &ArchiveRef, ordinal: usize) -> Result<CmdResult> {
        let page = self.resolve_page(aref, ordinal)?;
        let llm = require_llm(&self.llm)?;
        commands::access::transcribe(llm, &mut self.session.results, &page.path)
    }

    pub fn adapt_page(&mut self, aref: &ArchiveRef, ordinal: usize) -> Result<CmdResult> {
        let page = self.resolve_page(aref, ordinal)?;
        let llm = require_llm(&self.llm)?;
        commands::access::adapt(llm, &mut self.session.results, &page.path, &self.vocabulary)
    }

    pub fn tei_page(&mut self, aref: &ArchiveRef, ordinal: usize) -> Result<CmdResult> {
        let page = self.resolve_page(aref, ordinal)?;
        let llm = require_llm(&self.llm)?;
        commands::access::tei(llm, &mut self.session.results, &page.path)
    }

    pub fn describe_page(&mut self, aref: &ArchiveRef, ordinal: usize) -> Result<CmdResult> {
        let page = self.resolve_page(aref, ordinal)?;
        let llm = require_llm(&self.llm)?;
        commands::access::describe(llm, &mut self.session.results, &page.path)
    }

    pub fn narrate_page(&mut self, aref: &ArchiveRef, ordinal: usize) -> Result<CmdResult> {
        let page = self.resolve_page(aref, ordinal)?;
        commands::access::narrate(&self.speech, &mut self.session.results, &page.path)
    }

    /// Map a page ordinal to its page. The catalog may have changed since
    /// the ordinal was shown, so a stale ordinal is reported explicitly.
    fn resolve_page(&self, aref: &ArchiveRef, ordinal: usize) -> Result<Page> {
        self.catalog
            .list_pages(aref)
            .into_iter()
            .find(|p| p.ordinal == ordinal)
            .ok_or_else(|| {
                RukopisError::Api(format!("no page {} in archive '{}'", ordinal, aref))
            })
    }

}

/// Free function so the borrow stays on the `llm` field alone while the
/// session cache is borrowed mutably.
fn require_llm(llm: &Option<LlmClient>) -> Result<&LlmClient> {
    llm.as_ref().ok_or_else(|| {
        RukopisError::Api("language model not configured (set GOOGLE_API_KEY)".into())
    })
}
