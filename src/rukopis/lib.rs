//! # Rukopis Architecture
//!
//! Rukopis is a **UI-agnostic library** for browsing, searching and
//! exporting a digitized archive of writers' manuscripts, with collaborator
//! clients for the accessibility features (transcription, plain language,
//! TEI markup, audio description, narration). The CLI binary is just one
//! client of the library.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, formats output, writes artifact files  │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (page ordinals → page paths)           │
//! │  - Owns the session (selection + per-page result caches)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Browse, search, export, accessibility logic              │
//! │  - Operates on Rust types, returns Rust types               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Catalog Layer (catalog.rs, metadata.rs)                    │
//! │  - Read-only view over the dataset directory tree           │
//! │  - Total functions: absence is data, not failure            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Absence Is Data
//!
//! The dataset tree is externally owned, partially populated and may change
//! underneath the application. Every catalog operation is therefore total:
//! a missing path lists as empty, an unparseable metadata file loads as
//! absent, an unreadable page image is skipped. Callers probe speculatively
//! without special-casing. The only explicit errors are real I/O failures
//! while writing artifacts, collaborator failures (opaque, single attempt),
//! and caller precondition violations such as a stale page ordinal.
//!
//! ## External Collaborators
//!
//! The hosted language model ([`llm`]) and the speech synthesizer
//! ([`speech`]) sit entirely outside the catalog data flow and are invoked
//! only after a specific page has been selected. Both are black boxes:
//! `(inputs) -> text/audio`, no retry, no streaming, opaque failure.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade—entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`catalog`]: Directory-tree enumeration (authors, types, archives, pages)
//! - [`metadata`]: Spreadsheet loading and searchable text
//! - [`model`]: Core data types (`ArchiveRef`, `Page`, `MetadataTable`, ...)
//! - [`session`]: Selection state and per-page result caches
//! - [`config`]: Configuration management
//! - [`llm`]: Language-model collaborator client and prompts
//! - [`speech`]: Speech-synthesis collaborator client
//! - [`error`]: Error types

pub mod api;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod llm;
pub mod metadata;
pub mod model;
pub mod session;
pub mod speech;

#[cfg(test)]
pub mod test_utils;
