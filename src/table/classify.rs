// Member classification for attribute tables

use crate::analysis::{MemberDef, MemberKind, SourceCatalog};
use crate::config::TableConfig;
use crate::document::Placeholder;
use crate::error::Result;
use crate::index::LookupTable;
use serde::Serialize;

/// Callable category shown next to a method entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Coroutine,
    ClassMethod,
    Decorator,
    Method,
}

impl Badge {
    /// Category name, used as the badge's `title`
    pub fn kind(self) -> &'static str {
        match self {
            Badge::Coroutine => "coroutine",
            Badge::ClassMethod => "classmethod",
            Badge::Decorator => "decorator",
            Badge::Method => "method",
        }
    }

    /// Short text shown inside the badge
    pub fn text(self) -> &'static str {
        match self {
            Badge::Coroutine => "async",
            Badge::ClassMethod => "cls",
            Badge::Decorator => "@",
            Badge::Method => "def",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Attributes,
    Methods,
}

/// One classified member of a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    /// `module.Class.member`, the link target
    pub full_name: String,
    pub label: String,
    pub badge: Option<Badge>,
}

/// Attributes and methods of one class, each in lookup-table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassGroups {
    pub attributes: Vec<ClassifiedEntry>,
    pub methods: Vec<ClassifiedEntry>,
}

impl ClassGroups {
    pub fn push(&mut self, group: Group, entry: ClassifiedEntry) {
        match group {
            Group::Attributes => self.attributes.push(entry),
            Group::Methods => self.methods.push(entry),
        }
    }

    /// Groups in display order, Attributes first
    pub fn iter(&self) -> impl Iterator<Item = (Group, &[ClassifiedEntry])> {
        [
            (Group::Attributes, self.attributes.as_slice()),
            (Group::Methods, self.methods.as_slice()),
        ]
        .into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.methods.is_empty()
    }
}

/// Sorts a class's documented members into attributes and methods
pub struct Classifier<'a> {
    catalog: &'a SourceCatalog,
    config: &'a TableConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a SourceCatalog, config: &'a TableConfig) -> Self {
        Self { catalog, config }
    }

    /// Classify every documented member of the placeholder's class.
    ///
    /// The class must resolve through the catalog. A class with no entry in
    /// the lookup table yields two empty groups.
    pub fn classify(&self, lookup: &LookupTable, placeholder: &Placeholder) -> Result<ClassGroups> {
        let class = self
            .catalog
            .resolve_class(&placeholder.module, &placeholder.class_name)?;

        let mut groups = ClassGroups::default();
        let Some(members) = lookup.members(&placeholder.full_name) else {
            return Ok(groups);
        };

        for member in members {
            let def = self.catalog.lookup_member(class, member).map(|(_, def)| def);
            let (group, badge, label) = self.classify_member(def, &placeholder.class_name, member);
            groups.push(
                group,
                ClassifiedEntry {
                    full_name: format!("{}.{}", placeholder.full_name, member),
                    label,
                    badge,
                },
            );
        }

        Ok(groups)
    }

    /// Decide group, badge and label for one member given its definition
    pub fn classify_member(
        &self,
        def: Option<&MemberDef>,
        class_name: &str,
        member: &str,
    ) -> (Group, Option<Badge>, String) {
        let Some(def) = def else {
            return (Group::Attributes, None, member.to_string());
        };

        // A staticmethod wrapper is not a plain function; only its docstring counts
        let plain_function = def.kind == MemberKind::Function;
        // Data values carry no docstring of their own
        let doc = match def.kind {
            MemberKind::Data => "",
            _ => def.doc(),
        };

        if (plain_function && def.is_async) || self.config.is_coroutine_doc(doc) {
            (Group::Methods, Some(Badge::Coroutine), member.to_string())
        } else if def.kind == MemberKind::ClassMethod {
            (
                Group::Methods,
                Some(Badge::ClassMethod),
                format!("{}.{}", class_name, member),
            )
        } else if plain_function && self.config.is_decorator_doc(doc) {
            (Group::Methods, Some(Badge::Decorator), member.to_string())
        } else if plain_function {
            (Group::Methods, Some(Badge::Method), member.to_string())
        } else {
            (Group::Attributes, None, member.to_string())
        }
    }
}
