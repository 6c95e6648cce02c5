//! Accessibility commands: the collaborator-backed operations on one page
//! scan (transcription, plain-language adaptation, TEI markup, description,
//! narration).
//!
//! Every operation is cached per page in the session, so repeating it on
//! the same page does not re-invoke the external model. Adaptation and TEI
//! markup require a transcription to exist; narration requires a
//! description. Those are caller preconditions and are surfaced as explicit
//! errors rather than silently invoking an upstream step.

use crate::commands::{Artifact, CmdMessage, CmdResult};
use crate::error::{Result, RukopisError};
use crate::llm::{self, LlmClient};
use crate::session::PageResults;
use crate::speech::SpeechClient;
use std::path::Path;

pub fn transcribe(llm: &LlmClient, results: &mut PageResults, page: &Path) -> Result<CmdResult> {
    if let Some(text) = results.transcription(page) {
        return Ok(cached(text.clone()));
    }
    let text = llm.transcribe_image(page)?;
    results.set_transcription(page, text.clone());
    Ok(CmdResult::default().with_text(text))
}

pub fn adapt(
    llm: &LlmClient,
    results: &mut PageResults,
    page: &Path,
    vocabulary: &[String],
) -> Result<CmdResult> {
    if let Some(text) = results.plain_language(page) {
        return Ok(cached(text.clone()));
    }
    let original = results
        .transcription(page)
        .ok_or_else(|| RukopisError::Api("no transcription for this page yet".into()))?
        .clone();
    let text = llm.adapt_plain_language(&original, vocabulary)?;
    results.set_plain_language(page, text.clone());
    Ok(CmdResult::default().with_text(text))
}

pub fn tei(llm: &LlmClient, results: &mut PageResults, page: &Path) -> Result<CmdResult> {
    if let Some(text) = results.tei(page) {
        return Ok(cached(text.clone()));
    }
    let original = results
        .transcription(page)
        .ok_or_else(|| RukopisError::Api("no transcription for this page yet".into()))?
        .clone();
    let text = llm.tei_markup(&original, page)?;
    results.set_tei(page, text.clone());
    Ok(CmdResult::default().with_text(text))
}

pub fn describe(llm: &LlmClient, results: &mut PageResults, page: &Path) -> Result<CmdResult> {
    if let Some(text) = results.description(page) {
        return Ok(cached(text.clone()));
    }
    let text = llm::clean_description(&llm.describe_image(page)?);
    results.set_description(page, text.clone());
    Ok(CmdResult::default().with_text(text))
}

/// Narrate the page's description. The WAV artifact is named after the
/// page image.
pub fn narrate(speech: &SpeechClient, results: &mut PageResults, page: &Path) -> Result<CmdResult> {
    let description = results
        .description(page)
        .ok_or_else(|| RukopisError::Api("no description for this page yet".into()))?
        .clone();

    let audio = match results.narration(page) {
        Some(audio) => audio.clone(),
        None => {
            let audio = speech.synthesize(&description)?;
            results.set_narration(page, audio.clone());
            audio
        }
    };

    let stem = page
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "narration".into());
    let mut result = CmdResult::default().with_artifact(Artifact {
        file_name: format!("desc_{}.wav", stem),
        mime: "audio/wav",
        bytes: audio.wav,
    });
    result.add_message(CmdMessage::info(format!(
        "Sample rate: {} Hz",
        audio.sample_rate
    )));
    Ok(result)
}

fn cached(text: String) -> CmdResult {
    let mut result = CmdResult::default().with_text(text);
    result.add_message(CmdMessage::info("Using cached result for this page."));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmConfig;
    use crate::speech::{SpeechAudio, SpeechConfig};
    use std::path::PathBuf;

    // Clients pointed at an unreachable endpoint: any test that reaches the
    // network fails, so these exercise only cache and precondition paths.
    fn offline_llm() -> LlmClient {
        LlmClient::new(
            LlmConfig {
                base_url: "http://127.0.0.1:1/v1".into(),
                timeout_secs: 1,
                ..Default::default()
            },
            "test-key".into(),
        )
    }

    fn offline_speech() -> SpeechClient {
        SpeechClient::new(SpeechConfig {
            base_url: "http://127.0.0.1:1/synthesize".into(),
            timeout_secs: 1,
            ..Default::default()
        })
    }

    #[test]
    fn cached_transcription_is_returned_without_a_call() {
        let page = PathBuf::from("/data/a/t/x/a.png");
        let mut results = PageResults::default();
        results.set_transcription(&page, "Милый брат".into());

        let result = transcribe(&offline_llm(), &mut results, &page).unwrap();
        assert_eq!(result.text.as_deref(), Some("Милый брат"));
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn adapt_requires_a_transcription() {
        let page = PathBuf::from("/data/a/t/x/a.png");
        let mut results = PageResults::default();
        let err = adapt(&offline_llm(), &mut results, &page, &[]).unwrap_err();
        assert!(matches!(err, RukopisError::Api(_)));
    }

    #[test]
    fn tei_requires_a_transcription() {
        let page = PathBuf::from("/data/a/t/x/a.png");
        let mut results = PageResults::default();
        let err = tei(&offline_llm(), &mut results, &page).unwrap_err();
        assert!(matches!(err, RukopisError::Api(_)));
    }

    #[test]
    fn narrate_requires_a_description() {
        let page = PathBuf::from("/data/a/t/x/a.png");
        let mut results = PageResults::default();
        let err = narrate(&offline_speech(), &mut results, &page).unwrap_err();
        assert!(matches!(err, RukopisError::Api(_)));
    }

    #[test]
    fn narrate_reuses_cached_audio() {
        let page = PathBuf::from("/data/a/t/x/a.png");
        let mut results = PageResults::default();
        results.set_description(&page, "Лист бумаги".into());
        results.set_narration(
            &page,
            SpeechAudio {
                wav: vec![1, 2, 3],
                sample_rate: 16000,
            },
        );

        let result = narrate(&offline_speech(), &mut results, &page).unwrap();
        let artifact = result.artifact.unwrap();
        assert_eq!(artifact.bytes, vec![1, 2, 3]);
        assert_eq!(artifact.file_name, "desc_a.wav");
    }
}
