// Resolution pass: replaces every attribute table placeholder with its
// table, or removes it.

use crate::analysis::SourceCatalog;
use crate::config::TableConfig;
use crate::document::{Document, Node};
use crate::index::{LookupTable, SymbolIndex};
use crate::table::classify::Classifier;
use crate::table::render::render_table;
use tracing::{debug, warn};

/// A class whose table could not be built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionFailure {
    pub document: String,
    pub class: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResolutionReport {
    /// Placeholders replaced by a table
    pub tables_inserted: usize,
    /// Placeholders dropped because the class had no documented members
    pub empty_removed: usize,
    /// Placeholders dropped because the class did not resolve
    pub failures: Vec<ResolutionFailure>,
}

impl ResolutionReport {
    pub fn placeholders_seen(&self) -> usize {
        self.tables_inserted + self.empty_removed + self.failures.len()
    }
}

/// Resolve every placeholder in `documents`.
///
/// The lookup table is built once for the whole pass. A class that fails to
/// resolve is logged and its placeholder removed; the pass carries on with
/// the remaining placeholders.
pub fn resolve_documents(
    documents: &mut [Document],
    index: &SymbolIndex,
    catalog: &SourceCatalog,
    config: &TableConfig,
) -> ResolutionReport {
    let lookup = LookupTable::build(index);
    let classifier = Classifier::new(catalog, config);
    let mut report = ResolutionReport::default();

    debug!(parents = lookup.len(), "lookup table built");

    for document in documents.iter_mut() {
        let nodes = std::mem::take(&mut document.nodes);
        let mut resolved = Vec::with_capacity(nodes.len());

        for node in nodes {
            let placeholder = match node {
                Node::Placeholder(p) => p,
                other => {
                    resolved.push(other);
                    continue;
                }
            };

            let groups = match classifier.classify(&lookup, &placeholder) {
                Ok(groups) => groups,
                Err(e) => {
                    warn!(
                        document = %placeholder.document,
                        class = %placeholder.full_name,
                        error = %e,
                        "attribute table skipped"
                    );
                    report.failures.push(ResolutionFailure {
                        document: placeholder.document.clone(),
                        class: placeholder.full_name.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            match render_table(&placeholder.full_name, &groups, config) {
                Some(table) => {
                    report.tables_inserted += 1;
                    resolved.push(Node::AttributeTable(table));
                }
                None => {
                    debug!(class = %placeholder.full_name, "no documented members, table removed");
                    report.empty_removed += 1;
                }
            }
        }

        document.nodes = resolved;
    }

    report
}
