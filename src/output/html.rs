// HTML site generator
//
// Writes the static site files to disk: one page per document, index.html
// when the docs have no index page of their own, the stylesheet, and
// objects.json.

use crate::config::Config;
use crate::document::Document;
use crate::error::Result;
use crate::index::SymbolIndex;
use crate::output::attribute_table;
use crate::output::templates::{PageSummary, TemplateEngine};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Configuration for HTML generation
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Output directory
    pub output_dir: PathBuf,
    /// Project name for titles
    pub project_name: String,
    /// Whether to copy assets
    pub copy_assets: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs/_build/html"),
            project_name: "Project".to_string(),
            copy_assets: true,
        }
    }
}

impl From<&Config> for HtmlConfig {
    fn from(config: &Config) -> Self {
        Self {
            output_dir: config.docs.output_dir.clone(),
            project_name: config.project.name.clone(),
            copy_assets: true,
        }
    }
}

/// HTML site generator
pub struct HtmlGenerator {
    config: HtmlConfig,
    template_engine: TemplateEngine,
}

impl HtmlGenerator {
    /// Create a new HTML generator with every node renderer registered
    pub fn new(config: HtmlConfig) -> Result<Self> {
        let mut template_engine = TemplateEngine::new()?;
        attribute_table::register(&mut template_engine)?;

        Ok(Self {
            config,
            template_engine,
        })
    }

    /// Generate the complete static site
    pub fn generate(&self, documents: &[Document], symbols: &SymbolIndex) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        fs::create_dir_all(&self.config.output_dir)?;

        if self.config.copy_assets {
            self.copy_assets()?;
            report.assets_copied = true;
        }

        for document in documents {
            self.generate_page(document)?;
            report.pages_generated += 1;
            report.tables_rendered += document.tables().count();
        }

        if !documents.iter().any(|d| d.name == "index") {
            self.generate_index(documents)?;
            report.pages_generated += 1;
            report.index_generated = true;
        }

        self.write_inventory(symbols)?;
        report.objects_written = symbols.len();

        Ok(report)
    }

    /// Copy static assets (CSS)
    fn copy_assets(&self) -> Result<()> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir)?;

        let css_content = include_str!("../../assets/style.css");
        fs::write(assets_dir.join("style.css"), css_content)?;

        Ok(())
    }

    fn generate_page(&self, document: &Document) -> Result<()> {
        let html = self
            .template_engine
            .render_page(document, &self.config.project_name)?;

        let path = self.page_path(document);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, html)?;
        debug!(path = %path.display(), "wrote page");

        Ok(())
    }

    /// Generate the main index page
    fn generate_index(&self, documents: &[Document]) -> Result<()> {
        let pages: Vec<PageSummary> = documents.iter().map(PageSummary::from_document).collect();
        let html = self
            .template_engine
            .render_index(&self.config.project_name, &pages)?;

        fs::write(self.config.output_dir.join("index.html"), html)?;
        Ok(())
    }

    /// Write objects.json, the inventory of documented symbols
    fn write_inventory(&self, symbols: &SymbolIndex) -> Result<()> {
        let json = serde_json::to_string_pretty(symbols.symbols())?;
        fs::write(self.config.output_dir.join("objects.json"), json)?;
        Ok(())
    }

    /// Output path of a document's page
    pub fn page_path(&self, document: &Document) -> PathBuf {
        self.config
            .output_dir
            .join(format!("{}.html", document.name))
    }
}

/// Report of what was generated
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub pages_generated: usize,
    pub tables_rendered: usize,
    pub index_generated: bool,
    pub assets_copied: bool,
    /// Symbols written to objects.json
    pub objects_written: usize,
}

impl GenerationReport {
    pub fn summary(&self) -> String {
        format!(
            "Generated {} pages, {} attribute tables, {} objects, assets: {}",
            self.pages_generated,
            self.tables_rendered,
            self.objects_written,
            if self.assets_copied { "yes" } else { "no" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Node;
    use crate::index::{Symbol, SymbolKind};
    use crate::table::{TableColumn, TableItem, TableNode};
    use tempfile::TempDir;

    fn generator(dir: &TempDir) -> HtmlGenerator {
        HtmlGenerator::new(HtmlConfig {
            output_dir: dir.path().join("site"),
            project_name: "Shop".to_string(),
            copy_assets: true,
        })
        .unwrap()
    }

    fn api_document() -> Document {
        let mut doc = Document::new("reference/api");
        doc.title = Some("API".to_string());
        doc.nodes.push(Node::AttributeTable(TableNode {
            class_name: "shop.Widget".to_string(),
            columns: vec![TableColumn {
                title: "Attributes".to_string(),
                items: vec![TableItem {
                    badge: None,
                    label: "size".to_string(),
                    target: "shop.Widget.size".to_string(),
                }],
            }],
        }));
        doc
    }

    #[test]
    fn test_html_config_default() {
        let config = HtmlConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("docs/_build/html"));
        assert!(config.copy_assets);
    }

    #[test]
    fn test_html_config_from_config() {
        let mut config = Config::default();
        config.project.name = "Shop".to_string();
        config.docs.output_dir = PathBuf::from("out");
        let html = HtmlConfig::from(&config);
        assert_eq!(html.project_name, "Shop");
        assert_eq!(html.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_generate_site() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir);
        let symbols: SymbolIndex =
            std::iter::once(Symbol::new("shop.Widget.size", SymbolKind::Attribute, "reference/api")).collect();

        let report = generator.generate(&[api_document()], &symbols).unwrap();

        assert_eq!(report.pages_generated, 2);
        assert_eq!(report.tables_rendered, 1);
        assert!(report.index_generated);
        assert_eq!(report.objects_written, 1);

        let site = dir.path().join("site");
        let page = fs::read_to_string(site.join("reference/api.html")).unwrap();
        assert!(page.contains("data-move-to-id=\"shop.Widget\""));
        assert!(site.join("index.html").exists());
        assert!(site.join("assets/style.css").exists());

        let objects: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(site.join("objects.json")).unwrap()).unwrap();
        assert_eq!(objects[0]["full_name"], "shop.Widget.size");
        assert_eq!(objects[0]["kind"], "attribute");
    }

    #[test]
    fn test_existing_index_page_kept() {
        let dir = TempDir::new().unwrap();
        let generator = generator(&dir);
        let mut index = Document::new("index");
        index.nodes.push(Node::Paragraph {
            text: "Welcome to the shop.".to_string(),
        });

        let report = generator.generate(&[index], &SymbolIndex::new()).unwrap();
        assert!(!report.index_generated);
        assert_eq!(report.pages_generated, 1);

        let html = fs::read_to_string(dir.path().join("site/index.html")).unwrap();
        assert!(html.contains("Welcome to the shop."));
    }

    #[test]
    fn test_generation_report_summary() {
        let report = GenerationReport {
            pages_generated: 5,
            tables_rendered: 3,
            index_generated: true,
            assets_copied: true,
            objects_written: 12,
        };

        let summary = report.summary();
        assert!(summary.contains("5 pages"));
        assert!(summary.contains("3 attribute tables"));
        assert!(summary.contains("assets: yes"));
    }
}
