//! Client for the speech-synthesis collaborator.
//!
//! The synthesizer is a black box behind an HTTP endpoint: it takes a text
//! blob, a deterministic seed and a speaker selector, and returns a WAV
//! waveform plus its sample rate. One synchronous attempt per call, opaque
//! failure, no retry.

use crate::error::{Result, RukopisError};
use crate::llm::base64_decode;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Synthesized narration: WAV bytes and their sample rate.
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub wav: Vec<u8>,
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeechConfig {
    /// URL of the synthesis endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Speaker selector: 0 is the female voice, 1 the male voice.
    #[serde(default)]
    pub speaker: u32,
    /// Seed making synthesis deterministic.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8086/synthesize".into()
}

fn default_seed() -> u64 {
    555
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            speaker: 0,
            seed: default_seed(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

pub struct SpeechClient {
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(config: SpeechConfig) -> Self {
        Self { config }
    }

    /// Synthesize narration for `text`. Line breaks are flattened to
    /// spaces; the synthesizer treats its input as one continuous passage.
    pub fn synthesize(&self, text: &str) -> Result<SpeechAudio> {
        let flattened = text.replace('\n', " ");
        let body = serde_json::json!({
            "text": flattened,
            "speaker": self.config.speaker,
            "seed": self.config.seed,
        });
        let body_str = serde_json::to_string(&body)?;

        debug!(speaker = self.config.speaker, "calling speech synthesizer");
        let agent = ureq::AgentBuilder::new()
            .timeout(std::time::Duration::from_secs(self.config.timeout_secs))
            .build();
        let resp = agent
            .post(&self.config.base_url)
            .set("Content-Type", "application/json")
            .send_string(&body_str)
            .map_err(|e: ureq::Error| RukopisError::Collaborator(e.to_string()))?;

        let resp_str = resp
            .into_string()
            .map_err(|e| RukopisError::Collaborator(e.to_string()))?;
        let json: serde_json::Value = serde_json::from_str(&resp_str)
            .map_err(|e| RukopisError::Collaborator(e.to_string()))?;

        let wav = json["audio"]
            .as_str()
            .and_then(base64_decode)
            .ok_or_else(|| RukopisError::Collaborator("missing audio in response".into()))?;
        let sample_rate = json["sampling_rate"]
            .as_u64()
            .ok_or_else(|| RukopisError::Collaborator("missing sampling_rate in response".into()))?
            as u32;

        Ok(SpeechAudio { wav, sample_rate })
    }
}
