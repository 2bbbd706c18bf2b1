// Attribute table node construction

use crate::config::TableConfig;
use crate::table::classify::{Badge, ClassGroups, Group};
use serde::Serialize;

/// Badge as shown in the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeNode {
    pub kind: String,
    pub text: String,
}

impl From<Badge> for BadgeNode {
    fn from(badge: Badge) -> Self {
        Self {
            kind: badge.kind().to_string(),
            text: badge.text().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableItem {
    pub badge: Option<BadgeNode>,
    pub label: String,
    /// Full name of the documented member, linked as `#target`
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub title: String,
    pub items: Vec<TableItem>,
}

/// Rendered attribute table for one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableNode {
    /// Full name of the class, the id the table moves next to
    pub class_name: String,
    pub columns: Vec<TableColumn>,
}

/// Build the table for a class: one column per non-empty group, items
/// sorted by label. Returns `None` when both groups are empty.
pub fn render_table(full_name: &str, groups: &ClassGroups, config: &TableConfig) -> Option<TableNode> {
    let columns: Vec<TableColumn> = groups
        .iter()
        .filter(|(_, entries)| !entries.is_empty())
        .map(|(group, entries)| {
            let mut items: Vec<TableItem> = entries
                .iter()
                .map(|e| TableItem {
                    badge: e.badge.map(BadgeNode::from),
                    label: e.label.clone(),
                    target: e.full_name.clone(),
                })
                .collect();
            items.sort_by(|a, b| a.label.cmp(&b.label));

            TableColumn {
                title: match group {
                    Group::Attributes => config.attributes_label.clone(),
                    Group::Methods => config.methods_label.clone(),
                },
                items,
            }
        })
        .collect();

    if columns.is_empty() {
        return None;
    }

    Some(TableNode {
        class_name: full_name.to_string(),
        columns,
    })
}
