use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub source: SourceConfig,
    pub docs: DocsConfig,
    pub table: TableConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
}

/// Where the Python sources live and which files are read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub root: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Document members whose names start with an underscore
    pub private_members: bool,
}

/// Documentation pages and output location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    /// File extension of documentation pages, without the dot
    pub extension: String,
}

/// Attribute table classification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Docstring prefix that marks a coroutine
    pub coroutine_marker: String,
    /// Docstring prefixes that mark a decorator
    pub decorator_prefixes: Vec<String>,
    pub attributes_label: String,
    pub methods_label: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include: vec!["**/*.py".to_string()],
            exclude: vec![
                "tests/**".to_string(),
                "test/**".to_string(),
                "venv/**".to_string(),
                ".venv/**".to_string(),
                "docs/**".to_string(),
                "**/__pycache__/**".to_string(),
                "*.egg-info/**".to_string(),
                ".git/**".to_string(),
            ],
            private_members: false,
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("docs"),
            output_dir: PathBuf::from("docs/_build/html"),
            extension: "rst".to_string(),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            coroutine_marker: "|coro|".to_string(),
            decorator_prefixes: vec!["A decorator".to_string(), "A shortcut decorator".to_string()],
            attributes_label: "Attributes".to_string(),
            methods_label: "Methods".to_string(),
        }
    }
}

impl TableConfig {
    /// Check whether a docstring marks a coroutine
    pub fn is_coroutine_doc(&self, doc: &str) -> bool {
        doc.starts_with(&self.coroutine_marker)
    }

    /// Check whether a docstring marks a decorator
    pub fn is_decorator_doc(&self, doc: &str) -> bool {
        self.decorator_prefixes.iter().any(|p| doc.starts_with(p.as_str()))
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        source: Option<PathBuf>,
        docs: Option<PathBuf>,
        output: Option<PathBuf>,
        exclude: Vec<String>,
    ) {
        if let Some(src) = source {
            self.source.root = src;
        }

        if let Some(d) = docs {
            self.docs.source_dir = d;
        }

        if let Some(out) = output {
            self.docs.output_dir = out;
        }

        if !exclude.is_empty() {
            self.source.exclude.extend(exclude);
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.source.include.is_empty() {
            return Err(Error::config_validation("at least one include pattern required"));
        }

        if self.docs.extension.is_empty() {
            return Err(Error::config_validation("docs extension cannot be empty"));
        }

        if self.table.coroutine_marker.is_empty() {
            return Err(Error::config_validation("coroutine_marker cannot be empty"));
        }

        if self.table.decorator_prefixes.iter().any(|p| p.is_empty()) {
            return Err(Error::config_validation("decorator_prefixes cannot contain an empty prefix"));
        }

        if self.table.attributes_label.is_empty() || self.table.methods_label.is_empty() {
            return Err(Error::config_validation("table labels cannot be empty"));
        }

        if self.table.attributes_label == self.table.methods_label {
            return Err(Error::config_validation(
                "attributes_label and methods_label must differ",
            ));
        }

        Ok(())
    }
}
