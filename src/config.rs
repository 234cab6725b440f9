use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::CompletionError;
use crate::parser::ParseMode;

pub const CONFIG_FILE: &str = "assist.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Tree,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseSection {
    pub mode: ParseMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: OutputFormat,
    /// Also print the construct enclosing the completion node.
    pub parent: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self { format: OutputFormat::Tree, parent: true }
    }
}

/// Settings for `assistc`, from `assist.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistConfig {
    pub parse: ParseSection,
    pub output: OutputSection,
}

impl AssistConfig {
    pub fn from_str(content: &str, path: &Path) -> Result<Self, CompletionError> {
        toml::from_str(content)
            .map_err(|e| CompletionError::config(format!("{CONFIG_FILE}: invalid syntax: {e}"), path.to_path_buf()))
    }

    pub fn load(path: &Path) -> Result<Self, CompletionError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CompletionError::config(format!("{CONFIG_FILE}: could not read file: {e}"), path.to_path_buf())
        })?;
        let config = Self::from_str(&content, path)?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// Load the nearest `assist.toml` at or above `start_dir`, or the
    /// defaults when there is none.
    pub fn discover(start_dir: &Path) -> Result<Self, CompletionError> {
        match find_config_walk(start_dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Walk up from `start_dir` looking for `assist.toml`. Stops at a
/// repository root.
fn find_config_walk(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() {
            return None;
        }
        if !dir.pop() {
            return None;
        }
    }
}
