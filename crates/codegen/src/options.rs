use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_STEPS: usize = 2000;

/// Knobs for one compilation call
///
/// Read from the `[compile]` table of a `flowcode.toml`; every field is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Spaces per nesting level
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,
    /// Emission steps allowed per block before it is cut off
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Name of the generated entry-point function
    #[serde(default = "default_entry_name")]
    pub entry_name: String,
}

fn default_indent_width() -> usize {
    4
}

fn default_max_steps() -> usize {
    DEFAULT_MAX_STEPS
}

fn default_entry_name() -> String {
    "program".to_string()
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            max_steps: default_max_steps(),
            entry_name: default_entry_name(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    compile: Option<CompileOptions>,
}

impl CompileOptions {
    /// Parse a `flowcode.toml` document
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        let options = file.compile.unwrap_or_default();
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.indent_width == 0 {
            return Err(ConfigError::InvalidOption {
                field: "indent_width",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::InvalidOption {
                field: "max_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        let name = self.entry_name.as_str();
        let valid_identifier = name
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && name.chars().all(|c| c.is_alphanumeric() || c == '_');
        if !valid_identifier {
            return Err(ConfigError::InvalidOption {
                field: "entry_name",
                reason: format!("`{name}` is not an identifier"),
            });
        }
        Ok(())
    }

    /// Leading whitespace for nesting `level`
    #[must_use]
    pub fn pad(&self, level: usize) -> String {
        " ".repeat(self.indent_width * level)
    }
}
