// Documentation build pipeline
//
// sources -> catalog -> documents + symbols -> resolution -> HTML

use crate::analysis::{Analyzer, SourceCatalog};
use crate::config::Config;
use crate::document::{Document, DocumentParser};
use crate::error::{Error, Result};
use crate::index::SymbolIndex;
use crate::output::{GenerationReport, HtmlConfig, HtmlGenerator};
use crate::table::{resolve_documents, ResolutionReport};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// A documentation page found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSource {
    /// Document name: relative path without extension, `/`-separated
    pub name: String,
    pub path: PathBuf,
}

/// Everything a build did
#[derive(Debug)]
pub struct BuildReport {
    pub files_parsed: usize,
    pub parse_errors: HashMap<PathBuf, String>,
    pub documents: usize,
    pub symbols: usize,
    pub resolution: ResolutionReport,
    pub generation: GenerationReport,
}

impl BuildReport {
    pub fn summary(&self) -> String {
        format!(
            "Parsed {} source files ({} failed), {} documents, {} symbols; {} tables inserted, {} empty, {} unresolved",
            self.files_parsed,
            self.parse_errors.len(),
            self.documents,
            self.symbols,
            self.resolution.tables_inserted,
            self.resolution.empty_removed,
            self.resolution.failures.len()
        )
    }
}

/// Runs a full documentation build for one configuration
pub struct Builder {
    config: Config,
    verbose: bool,
}

impl Builder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            verbose: false,
        }
    }

    /// Show progress while parsing sources
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(&self) -> Result<BuildReport> {
        let mut analyzer = Analyzer::new(&self.config.source)?.with_verbose(self.verbose);
        let analysis = analyzer.analyze(&self.config.source.root)?;

        let pages = self.discover_pages()?;
        let mut symbols = SymbolIndex::new();
        let mut documents = self.parse_pages(&pages, &analysis.catalog, &mut symbols)?;
        debug!(documents = documents.len(), symbols = symbols.len(), "documents parsed");

        let resolution = resolve_documents(&mut documents, &symbols, &analysis.catalog, &self.config.table);

        let generator = HtmlGenerator::new(HtmlConfig::from(&self.config))?;
        let generation = generator.generate(&documents, &symbols)?;

        let report = BuildReport {
            files_parsed: analysis.files_parsed,
            parse_errors: analysis.parse_errors,
            documents: documents.len(),
            symbols: symbols.len(),
            resolution,
            generation,
        };
        info!("{}", report.summary());

        Ok(report)
    }

    /// Find every page under the docs source directory, sorted by name.
    ///
    /// Directories starting with `_` or `.` and the output directory are skipped.
    pub fn discover_pages(&self) -> Result<Vec<PageSource>> {
        let root = &self.config.docs.source_dir;
        if !root.exists() {
            return Err(Error::PathNotFound(root.clone()));
        }

        let output_dir = &self.config.docs.output_dir;
        let extension = self.config.docs.extension.as_str();
        let mut pages = Vec::new();

        let walker = WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e, output_dir));

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().map_or(true, |e| e != extension) {
                continue;
            }

            let relative = path.strip_prefix(root).unwrap_or(path);
            pages.push(PageSource {
                name: document_name(relative),
                path: path.to_path_buf(),
            });
        }

        pages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(pages)
    }

    /// Parse pages in order. Directive errors abort the build.
    fn parse_pages(
        &self,
        pages: &[PageSource],
        catalog: &SourceCatalog,
        symbols: &mut SymbolIndex,
    ) -> Result<Vec<Document>> {
        let mut parser =
            DocumentParser::new(catalog, symbols).with_private_members(self.config.source.private_members);

        let mut documents = Vec::with_capacity(pages.len());
        for page in pages {
            let source = fs::read_to_string(&page.path)?;
            documents.push(parser.parse(&page.name, &source)?);
        }

        Ok(documents)
    }
}

fn is_skipped_dir(entry: &DirEntry, output_dir: &Path) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let hidden = entry
        .file_name()
        .to_str()
        .map_or(false, |n| n.starts_with('_') || n.starts_with('.'));
    hidden || entry.path() == output_dir
}

/// `api/widgets.rst` -> `api/widgets`
fn document_name(relative: &Path) -> String {
    relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
