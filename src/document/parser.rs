// Page parser: turns page source into a `Document`, documenting classes
// from the source catalog and registering what it documents.

use crate::analysis::{ClassEntry, MemberDef, MemberKind, SourceCatalog};
use crate::document::directive::{parse_target, split_blocks, underline_char, Block, Directive};
use crate::document::{ClassDoc, Document, MemberDoc, Node, Placeholder};
use crate::error::{Error, Result};
use crate::index::{Symbol, SymbolIndex, SymbolKind};
use tracing::{debug, warn};

const MAX_HEADING_LEVEL: usize = 6;

/// Parses documentation pages against a source catalog.
///
/// Every class documented by `autoclass`/`autoexception` is registered in
/// the symbol index together with its members.
pub struct DocumentParser<'a> {
    catalog: &'a SourceCatalog,
    symbols: &'a mut SymbolIndex,
    private_members: bool,
}

/// Per-document parse state
struct PageState {
    document: Document,
    current_module: Option<String>,
    /// Heading styles in order of first appearance: adornment character and
    /// whether it is also used as an overline
    underlines: Vec<(char, bool)>,
}

impl<'a> DocumentParser<'a> {
    pub fn new(catalog: &'a SourceCatalog, symbols: &'a mut SymbolIndex) -> Self {
        Self {
            catalog,
            symbols,
            private_members: false,
        }
    }

    /// Document underscore-prefixed members without `:private-members:`
    pub fn with_private_members(mut self, private_members: bool) -> Self {
        self.private_members = private_members;
        self
    }

    /// Parse one page. `name` identifies the document in symbols and errors.
    pub fn parse(&mut self, name: &str, source: &str) -> Result<Document> {
        let mut state = PageState {
            document: Document::new(name),
            current_module: None,
            underlines: Vec::new(),
        };

        for block in split_blocks(source) {
            match block {
                Block::Text(lines) => push_text(&mut state, lines),
                Block::Directive(directive) => self.apply_directive(&mut state, &directive)?,
            }
        }

        debug!(
            document = name,
            nodes = state.document.nodes.len(),
            placeholders = state.document.placeholders().count(),
            "parsed document"
        );
        Ok(state.document)
    }

    fn apply_directive(&mut self, state: &mut PageState, directive: &Directive) -> Result<()> {
        let document = state.document.name.clone();

        match directive.name.as_str() {
            "module" | "currentmodule" => {
                let module = directive.argument.as_str();
                if module.is_empty() {
                    return Err(Error::directive(
                        document,
                        format!("line {}: {} requires a module name", directive.line, directive.name),
                    ));
                }
                if module == "None" {
                    state.current_module = None;
                } else {
                    if directive.name == "module" {
                        self.symbols
                            .register(Symbol::new(module, SymbolKind::Module, document.as_str()));
                    }
                    state.current_module = Some(module.to_string());
                }
            }
            "attributetable" => {
                let placeholder = attribute_table(state, directive)?;
                state.document.nodes.push(Node::Placeholder(placeholder));
            }
            "autoclass" | "autoexception" => {
                if let Some(class_doc) = self.document_class(state, directive) {
                    state.document.nodes.push(Node::ClassDoc(class_doc));
                }
            }
            other => {
                warn!(document = %document, line = directive.line, directive = other, "unknown directive ignored");
            }
        }

        Ok(())
    }

    fn document_class(&mut self, state: &PageState, directive: &Directive) -> Option<ClassDoc> {
        let document = state.document.name.as_str();

        let (module, name) = match qualify(state, &directive.argument) {
            Ok(target) => target,
            Err(message) => {
                warn!(document, line = directive.line, "{}: {}", directive.name, message);
                return None;
            }
        };

        let entry = match self.catalog.resolve_class(&module, &name) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(document, line = directive.line, error = %e, "class not documented");
                return None;
            }
        };

        for (option, _) in &directive.options {
            if !matches!(option.as_str(), "members" | "inherited-members" | "private-members") {
                warn!(document, line = directive.line, option = %option, "unknown option ignored");
            }
        }

        let full_name = format!("{}.{}", module, name);
        let kind = if directive.name == "autoexception" || entry.is_exception {
            SymbolKind::Exception
        } else {
            SymbolKind::Class
        };
        let include_private = self.private_members || directive.has_option("private-members");

        let defs: Vec<(&ClassEntry, &MemberDef)> = if directive.has_option("inherited-members") {
            self.catalog.visible_members(entry)
        } else {
            entry.members.iter().map(|m| (entry, m)).collect()
        };

        let members: Vec<MemberDoc> = defs
            .into_iter()
            .filter(|(_, def)| include_private || !def.is_private())
            .map(|(owner, def)| member_doc(&full_name, entry, owner, def))
            .collect();

        self.symbols
            .register(Symbol::new(full_name.as_str(), kind, document));
        for member in &members {
            self.symbols
                .register(Symbol::new(member.full_name.as_str(), member.kind, document));
        }

        Some(ClassDoc {
            full_name,
            name,
            kind,
            bases: entry.bases.clone(),
            docstring: entry.docstring.clone(),
            members,
        })
    }
}

fn attribute_table(state: &PageState, directive: &Directive) -> Result<Placeholder> {
    let document = state.document.name.as_str();

    if directive.argument.is_empty() {
        return Err(Error::directive(
            document,
            format!("line {}: attributetable requires a class name", directive.line),
        ));
    }
    if directive.argument.split_whitespace().count() > 1 {
        return Err(Error::directive(
            document,
            format!("line {}: attributetable takes exactly one argument", directive.line),
        ));
    }
    if !directive.options.is_empty() {
        return Err(Error::directive(
            document,
            format!("line {}: attributetable takes no options", directive.line),
        ));
    }

    let (module, name) = qualify(state, &directive.argument)
        .map_err(|message| Error::directive(document, format!("line {}: {}", directive.line, message)))?;

    Ok(Placeholder::new(document, module, name))
}

/// Split a directive target and fill in the current module for bare names
fn qualify(state: &PageState, target: &str) -> std::result::Result<(String, String), String> {
    let (module, name) = parse_target(target)?;
    match module.or_else(|| state.current_module.clone()) {
        Some(module) => Ok((module, name)),
        None => Err(format!("no module given for {:?} and no current module set", target)),
    }
}

fn member_doc(class_full_name: &str, class: &ClassEntry, owner: &ClassEntry, def: &MemberDef) -> MemberDoc {
    let kind = if def.kind.is_callable() {
        SymbolKind::Method
    } else {
        SymbolKind::Attribute
    };
    let inherited_from = (owner.full_name != class.full_name).then(|| owner.full_name.clone());

    MemberDoc {
        full_name: format!("{}.{}", class_full_name, def.name),
        name: def.name.clone(),
        kind,
        signature: match def.kind {
            MemberKind::Data | MemberKind::Property => None,
            _ => def.signature.clone(),
        },
        type_hint: def.type_hint.clone(),
        docstring: def.docstring.clone(),
        is_async: def.is_async,
        inherited_from,
    }
}

/// Title text, style and line count of a heading opening `lines`
fn heading_at(lines: &[String]) -> Option<(String, (char, bool), usize)> {
    if let [over, title, under, ..] = lines {
        if let (Some(o), Some(u)) = (underline_char(over, title), underline_char(under, title)) {
            if o == u {
                return Some((title.trim().to_string(), (u, true), 3));
            }
        }
    }
    match lines {
        [title, under, ..] => {
            underline_char(under, title).map(|c| (title.trim().to_string(), (c, false), 2))
        }
        _ => None,
    }
}

fn push_text(state: &mut PageState, lines: Vec<String>) {
    let heading = heading_at(&lines);

    let body = match heading {
        Some((text, style, consumed)) => {
            let level = match state.underlines.iter().position(|&u| u == style) {
                Some(i) => i + 1,
                None => {
                    state.underlines.push(style);
                    state.underlines.len()
                }
            };
            if state.document.title.is_none() {
                state.document.title = Some(text.clone());
            }
            state.document.nodes.push(Node::Heading {
                level: level.min(MAX_HEADING_LEVEL),
                text,
            });
            &lines[consumed..]
        }
        None => &lines[..],
    };

    if !body.is_empty() {
        let text = body.iter().map(|l| l.trim()).collect::<Vec<_>>().join(" ");
        state.document.nodes.push(Node::Paragraph { text });
    }
}
