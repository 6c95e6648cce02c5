//! Client for the hosted language-model collaborator.
//!
//! Four prompt constructions over one `generateContent`-style endpoint:
//! transcription from a page scan, plain-language adaptation of a
//! transcription, TEI markup of a transcription validated against the scan,
//! and descriptive captioning of a scan for audio description.
//!
//! The model is a black box: each call is a single synchronous best-effort
//! attempt with no retry, and any transport or response-shape failure is
//! surfaced as one opaque [`RukopisError::Collaborator`] error.

use crate::error::{Result, RukopisError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Restricted TEI tag vocabulary the markup prompt is allowed to use.
/// The model is told to ignore any tag it cannot populate.
pub const TEI_RULES: &str = "\
<typeContent> describes the kind of text (letter, draft, diary, postcard, notes, ...).
<textLang> gives the language or languages used in the manuscript.
<title> contains a title of any kind of work; attributes: origin (title of this document), mention (titles mentioned in the text).
<abbr> contains an abbreviation of any sort.
<date> contains a date in any format.
<num> contains a number written in any form.
<measure> contains a word or phrase referring to a quantity, usually a number, a unit and a commodity name.
<corr> contains the correct form of a passage that is evidently erroneous in the copy text.
<add> contains letters, words or phrases inserted in the source text by an author, scribe, annotator or corrector.
<del> contains a letter, word or passage deleted or marked as deleted in the copy text.
<handNotes> contains one or more <handNote> elements documenting the hands identified in the source.
<figure> groups elements representing or containing graphic information such as an illustration, formula or drawing.
<persName> contains a proper name or name phrase referring to a person.
<stage> contains any kind of stage direction in a dramatic text or fragment.
<move> marks the actual movement of one or more characters; attributes: @type, @where, @perf.
<orgName> contains the name of an organization.
<address> contains an address, for example of a publisher, organization or individual.
<gender> specifies the gender identity of a person, persona or character.
<age> specifies the age of a person.
<nationality> contains an informal description of a person's present or past nationality or citizenship.
<placeName> contains the name of a place; attributes: @type (country, city, settlement, ...).
<p> marks a paragraph.";

/// Fixed sentence the model is instructed to return for pages that carry
/// no text at all (drawings, photographs).
pub const NO_TEXT_SENTENCE: &str = "No text detected on this scan...";

/// Configuration for the language-model client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LlmConfig {
    /// Base URL of the generateContent-style API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name to use.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".into()
}

fn default_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub struct LlmClient {
    config: LlmConfig,
    api_key: String,
}

impl LlmClient {
    pub fn new(config: LlmConfig, api_key: String) -> Self {
        Self { config, api_key }
    }

    /// OCR transcription of a page scan.
    pub fn transcribe_image(&self, image_path: &Path) -> Result<String> {
        let prompt = format!(
            "Carefully analyse the scan and transcribe what is written on it. \
             Re-check your reading before answering. \
             If you are certain the scan carries no text but only a drawing or \
             photograph, answer exactly '{}'. \
             Otherwise answer with only the transcribed text, keeping the same \
             structure as on the scan.",
            NO_TEXT_SENTENCE
        );
        let text = self.generate(vec![text_part(&prompt), self.image_part(image_path)?])?;
        // The model tends to double spaces around line breaks.
        Ok(text.replace("  ", " "))
    }

    /// Plain-language rewrite of a transcription, biased toward a
    /// frequency-word vocabulary.
    pub fn adapt_plain_language(&self, original_text: &str, vocabulary: &[String]) -> Result<String> {
        let prompt = format!(
            "Your task is to adapt the source text into plain language, based on \
             the following vocabulary of the most frequent and simple words. \
             It matters that readers with cognitive or perceptual impairments \
             understand its meaning. Prefer words from the vocabulary, but you \
             may use other words where needed to form coherent sentences. \
             Try to keep the structure and style of the source text. \
             Vocabulary: {}. Source text: {} . \
             Answer with only the adapted text.",
            vocabulary.join(", "),
            original_text
        );
        self.generate(vec![text_part(&prompt)])
    }

    /// TEI markup of a transcription, with the scan supplied for validation.
    pub fn tei_markup(&self, original_text: &str, image_path: &Path) -> Result<String> {
        let prompt = format!(
            "You are given the transcribed text of a manuscript and the actual \
             scan of that manuscript. Produce TEI markup for the transcription; \
             you may consult the scan for additional validation and context. \
             A specific set of TEI tags and rules has been chosen; use only \
             those. If you cannot find information satisfying a tag, simply \
             ignore that tag. If you are certain the scan carries no text, \
             answer exactly '{}'. \
             TEI rules: {} \
             Transcribed text: {} .",
            NO_TEXT_SENTENCE, TEI_RULES, original_text
        );
        self.generate(vec![text_part(&prompt), self.image_part(image_path)?])
    }

    /// Descriptive captioning of a scan (audio-description text).
    pub fn describe_image(&self, image_path: &Path) -> Result<String> {
        let prompt = "Produce an audio description of the scan: describe it in \
                      detail for a reader who cannot see it. Answer with only \
                      the description.";
        self.generate(vec![text_part(prompt), self.image_part(image_path)?])
    }

    fn image_part(&self, path: &Path) -> Result<serde_json::Value> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::json!({
            "inline_data": {
                "mime_type": "image/png",
                "data": base64_encode(&bytes),
            }
        }))
    }

    /// Single best-effort generateContent call.
    fn generate(&self, parts: Vec<serde_json::Value>) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.api_key
        );
        let body = serde_json::json!({ "contents": [{ "parts": parts }] });
        let body_str = serde_json::to_string(&body)?;

        debug!(model = %self.config.model, "calling language model");
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();
        let resp = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| RukopisError::Collaborator(e.to_string()))?;

        let resp_str = resp
            .into_string()
            .map_err(|e| RukopisError::Collaborator(e.to_string()))?;
        let json: serde_json::Value = serde_json::from_str(&resp_str)
            .map_err(|e| RukopisError::Collaborator(e.to_string()))?;

        json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| RukopisError::Collaborator("missing text in model response".into()))
    }
}

fn text_part(text: &str) -> serde_json::Value {
    serde_json::json!({ "text": text })
}

/// Load the plain-language vocabulary from a CSV file: one word per line,
/// last column taken.
pub fn load_vocabulary(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .filter_map(|line| line.rsplit(',').next())
        .map(|word| word.trim().to_string())
        .filter(|word| !word.is_empty())
        .collect())
}

/// Strip markdown emphasis and collapse runs of spaces in a generated
/// description, so the text reads cleanly and synthesizes cleanly.
pub fn clean_description(text: &str) -> String {
    let without_stars = text.replace('*', "");
    let mut out = String::with_capacity(without_stars.len());
    let mut last_was_space = false;
    for c in without_stars.chars() {
        if c == ' ' {
            if !last_was_space {
                out.push(c);
            }
            last_was_space = true;
        } else {
            out.push(c);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

/// Minimal base64 encoder (avoids adding a base64 crate dependency).
pub(crate) fn base64_encode(input: &[u8]) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    for chunk in input.chunks(3) {
        let b = [chunk[0], *chunk.get(1).unwrap_or(&0), *chunk.get(2).unwrap_or(&0)];
        let n = u32::from_be_bytes([0, b[0], b[1], b[2]]);
        out.push(ALPHABET[(n >> 18 & 0x3f) as usize] as char);
        out.push(ALPHABET[(n >> 12 & 0x3f) as usize] as char);
        out.push(if chunk.len() > 1 {
            ALPHABET[(n >> 6 & 0x3f) as usize] as char
        } else {
            '='
        });
        out.push(if chunk.len() > 2 {
            ALPHABET[(n & 0x3f) as usize] as char
        } else {
            '='
        });
    }
    out
}

/// Minimal base64 decoder, counterpart of [`base64_encode`].
pub(crate) fn base64_decode(input: &str) -> Option<Vec<u8>> {
    fn value(c: u8) -> Option<u32> {
        match c {
            b'A'..=b'Z' => Some((c - b'A') as u32),
            b'a'..=b'z' => Some((c - b'a' + 26) as u32),
            b'0'..=b'9' => Some((c - b'0' + 52) as u32),
            b'+' => Some(62),
            b'/' => Some(63),
            _ => None,
        }
    }

    let trimmed: Vec<u8> = input
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    let stripped = trimmed
        .strip_suffix(b"==")
        .or_else(|| trimmed.strip_suffix(b"="))
        .unwrap_or(&trimmed);

    let mut out = Vec::with_capacity(stripped.len() * 3 / 4);
    for chunk in stripped.chunks(4) {
        if chunk.len() < 2 {
            return None;
        }
        let mut n: u32 = 0;
        for &c in chunk {
            n = (n << 6) | value(c)?;
        }
        n <<= 6 * (4 - chunk.len()) as u32;
        out.push((n >> 16) as u8);
        if chunk.len() > 2 {
            out.push((n >> 8) as u8);
        }
        if chunk.len() > 3 {
            out.push(n as u8);
        }
    }
    Some(out)
}
