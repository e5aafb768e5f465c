use crate::quiz::QuestionStyle;
use crate::session::TEST_LENGTH;
use crate::vocabulary::{sample_verbs, VerbEntry};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "sarf_quiz.toml";

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    /// The built-in sound-verb conjugator.
    #[default]
    Builtin,
    /// No conjugator; every form is a placeholder.
    None,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub verbs: Vec<VerbEntry>,
    pub styles: Vec<QuestionStyle>,
    pub test_length: usize,
    pub engine: EngineChoice,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbs: sample_verbs(),
            styles: QuestionStyle::ALL.to_vec(),
            test_length: TEST_LENGTH,
            engine: EngineChoice::Builtin,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verbs.is_empty() {
            return Err(ConfigError::Invalid("at least one verb is required".into()));
        }
        if let Some(verb) = self
            .verbs
            .iter()
            .find(|v| v.lemma.trim().is_empty() || v.pattern.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "verb entries need a lemma and a pattern (got lemma '{}', pattern '{}')",
                verb.lemma, verb.pattern
            )));
        }
        if self.styles.is_empty() {
            return Err(ConfigError::Invalid("at least one question style is required".into()));
        }
        if self.test_length == 0 {
            return Err(ConfigError::Invalid("test_length must be at least 1".into()));
        }
        Ok(())
    }
}

/// Loads `file_path`, or the defaults when `file_path` is `None` and
/// [`DEFAULT_CONFIG_FILE`] does not exist. An explicit path must exist.
pub fn load_config_from_file(file_path: Option<&Path>) -> Result<Config, ConfigError> {
    let (path, explicit) = match file_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(contents) => {
            debug!(path = %path.display(), "loaded configuration");
            Config::from_toml_str(&contents, &path)
        }
        Err(e) if !explicit && e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Config::default())
        }
        Err(source) => Err(ConfigError::Read { path, source }),
    }
}
