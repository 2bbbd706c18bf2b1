// Analysis module: discovers Python sources and builds the source catalog

pub mod catalog;
pub mod imports;

pub use catalog::*;
pub use imports::*;

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::parser::{ParsedFile, PythonParser};
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directory names that never contain documented sources
const DEFAULT_EXCLUDES: [&str; 7] = [
    "__pycache__",
    ".git",
    "venv",
    ".venv",
    "node_modules",
    ".tox",
    ".eggs",
];

/// Result of analyzing a source tree
#[derive(Debug)]
pub struct AnalysisResult {
    pub catalog: SourceCatalog,
    /// Number of files parsed successfully
    pub files_parsed: usize,
    /// Files that failed to parse (path -> error message)
    pub parse_errors: HashMap<PathBuf, String>,
}

/// Discovers and parses Python files into a `SourceCatalog`
#[derive(Debug)]
pub struct Analyzer {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    parser: PythonParser,
    verbose: bool,
}

impl Analyzer {
    /// Create a new analyzer, compiling the include/exclude globs
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let include = config
            .include
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let exclude = config
            .exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            include,
            exclude,
            parser: PythonParser::new()?,
            verbose: false,
        })
    }

    /// Show a progress bar while parsing
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Analyze the source tree at `root`
    pub fn analyze(&mut self, root: &Path) -> Result<AnalysisResult> {
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }

        let files = self.discover_files(root)?;
        if files.is_empty() {
            return Err(Error::other(format!(
                "No Python files found under {}",
                root.display()
            )));
        }
        debug!(count = files.len(), root = %root.display(), "discovered python files");

        let (parsed, parse_errors) = self.parse_files(&files, root);
        let catalog = SourceCatalog::build(&parsed);
        debug!(
            modules = catalog.module_count(),
            classes = catalog.class_count(),
            "source catalog built"
        );

        Ok(AnalysisResult {
            catalog,
            files_parsed: parsed.len(),
            parse_errors,
        })
    }

    /// Discover all matching Python files under `root`, sorted
    fn discover_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_file() || path.extension().map_or(true, |e| e != "py") {
                continue;
            }

            if self.should_exclude(path, root) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Check a path against the include and exclude globs
    fn should_exclude(&self, path: &Path, root: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);

        let in_default_exclude = relative
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .any(|c| DEFAULT_EXCLUDES.contains(&c) || c.ends_with(".egg-info"));
        if in_default_exclude {
            return true;
        }

        if !self.include.iter().any(|p| p.matches_path(relative)) {
            return true;
        }

        self.exclude.iter().any(|p| p.matches_path(relative))
    }

    fn parse_files(&mut self, files: &[PathBuf], root: &Path) -> (Vec<ParsedFile>, HashMap<PathBuf, String>) {
        let mut parsed = Vec::new();
        let mut errors = HashMap::new();

        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        for path in files {
            if let Some(ref pb) = progress {
                let msg = path.file_name().unwrap_or_default().to_string_lossy().to_string();
                pb.set_message(msg);
                pb.inc(1);
            }

            match self.parser.parse_file(path, root) {
                Ok(file) => parsed.push(file),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unparsable file");
                    errors.insert(path.clone(), e.to_string());
                }
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Parsing complete");
        }

        (parsed, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();

        let shop = dir.path().join("shop");
        fs::create_dir_all(&shop).unwrap();

        fs::write(shop.join("__init__.py"), "from .widget import Widget\n").unwrap();
        fs::write(
            shop.join("base.py"),
            "class Base:\n    \"\"\"Base of everything.\"\"\"\n    def refresh(self): pass\n",
        )
        .unwrap();
        fs::write(
            shop.join("widget.py"),
            "from .base import Base\n\nclass Widget(Base):\n    size = 0\n",
        )
        .unwrap();

        dir
    }

    fn analyzer() -> Analyzer {
        Analyzer::new(&SourceConfig::default()).unwrap()
    }

    #[test]
    fn test_analyzer_new_rejects_bad_glob() {
        let config = SourceConfig {
            include: vec!["***".to_string()],
            ..Default::default()
        };
        assert!(matches!(Analyzer::new(&config), Err(Error::GlobPattern(_))));
    }

    #[test]
    fn test_discover_files() {
        let dir = create_test_project();
        let files = analyzer().discover_files(dir.path()).unwrap();
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn test_discover_files_excludes_pycache_and_tests() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("main.py"), "x = 1").unwrap();
        let pycache = dir.path().join("__pycache__");
        fs::create_dir_all(&pycache).unwrap();
        fs::write(pycache.join("main.py"), "").unwrap();
        let tests = dir.path().join("tests");
        fs::create_dir_all(&tests).unwrap();
        fs::write(tests.join("test_main.py"), "").unwrap();

        let files = analyzer().discover_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.py"));
    }

    #[test]
    fn test_analyze_project() {
        let dir = create_test_project();
        let result = analyzer().analyze(dir.path()).unwrap();

        assert_eq!(result.files_parsed, 3);
        assert!(result.parse_errors.is_empty());

        let widget = result.catalog.resolve_class("shop", "Widget").unwrap();
        assert_eq!(widget.full_name, "shop.widget.Widget");
        assert_eq!(widget.mro, vec!["shop.widget.Widget", "shop.base.Base"]);
    }

    #[test]
    fn test_analyze_records_parse_errors() {
        let dir = create_test_project();
        fs::write(dir.path().join("shop/broken.py"), "def broken(:\n").unwrap();

        let result = analyzer().analyze(dir.path()).unwrap();
        assert_eq!(result.files_parsed, 3);
        assert_eq!(result.parse_errors.len(), 1);
    }

    #[test]
    fn test_analyze_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = analyzer().analyze(dir.path());
        assert!(result.unwrap_err().to_string().contains("No Python files"));
    }

    #[test]
    fn test_analyze_missing_root() {
        let result = analyzer().analyze(Path::new("/nonexistent/source/root"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_with_verbose() {
        let analyzer = analyzer().with_verbose(true);
        assert!(analyzer.verbose);
    }
}
