use crate::error::Result;
use crate::llm::LlmConfig;
use crate::speech::SpeechConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATASET_DIR: &str = "./data/Authors_Manuscripts";

/// Configuration for rukopis, stored as `config.json` in the project
/// config directory.
///
/// The language-model API key is intentionally not part of the file; it is
/// read from the `GOOGLE_API_KEY` environment variable at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RukopisConfig {
    /// Root of the dataset directory tree.
    #[serde(default = "default_dataset_dir")]
    pub dataset_dir: PathBuf,

    /// Language-model collaborator settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Speech-synthesis collaborator settings.
    #[serde(default)]
    pub speech: SpeechConfig,

    /// CSV with the plain-language frequency vocabulary, if available.
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
}

fn default_dataset_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATASET_DIR)
}

impl Default for RukopisConfig {
    fn default() -> Self {
        Self {
            dataset_dir: default_dataset_dir(),
            llm: LlmConfig::default(),
            speech: SpeechConfig::default(),
            vocabulary_path: None,
        }
    }
}

impl RukopisConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: RukopisConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    /// Read one key for the `config` subcommand.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "dataset-dir" => Some(self.dataset_dir.display().to_string()),
            "model" => Some(self.llm.model.clone()),
            "speaker" => Some(self.speech.speaker.to_string()),
            "seed" => Some(self.speech.seed.to_string()),
            "vocabulary" => Some(
                self.vocabulary_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            _ => None,
        }
    }

    /// Set one key for the `config` subcommand. Returns false for an
    /// unknown key or an unparseable value.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        match key {
            "dataset-dir" => self.dataset_dir = PathBuf::from(value),
            "model" => self.llm.model = value.to_string(),
            "speaker" => match value.parse() {
                Ok(v) => self.speech.speaker = v,
                Err(_) => return false,
            },
            "seed" => match value.parse() {
                Ok(v) => self.speech.seed = v,
                Err(_) => return false,
            },
            "vocabulary" => self.vocabulary_path = Some(PathBuf::from(value)),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RukopisConfig::default();
        assert_eq!(config.dataset_dir, PathBuf::from(DEFAULT_DATASET_DIR));
        assert_eq!(config.speech.seed, 555);
    }

    #[test]
    fn test_load_missing_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = RukopisConfig::load(tmp.path().join("nowhere")).unwrap();
        assert_eq!(config, RukopisConfig::default());
    }

    #[test]
    fn test_corrupt_config_is_an_error_not_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "{not json").unwrap();
        assert!(RukopisConfig::load(tmp.path()).is_err());
    }

    #[test]
    fn test_save_and_load() {
        let tmp = tempfile::tempdir().unwrap();

        let mut config = RukopisConfig::default();
        config.set("dataset-dir", "/srv/manuscripts");
        config.set("speaker", "1");
        config.save(tmp.path()).unwrap();

        let loaded = RukopisConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.dataset_dir, PathBuf::from("/srv/manuscripts"));
        assert_eq!(loaded.speech.speaker, 1);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"{"dataset_dir": "/srv/m"}"#,
        )
        .unwrap();

        let loaded = RukopisConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.dataset_dir, PathBuf::from("/srv/m"));
        assert_eq!(loaded.llm, LlmConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut config = RukopisConfig::default();
        assert!(!config.set("file-ext", ".md"));
        assert!(config.get("file-ext").is_none());
        assert!(!config.set("speaker", "loud"));
    }
}
