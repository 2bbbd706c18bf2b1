// Block splitting and directive syntax for documentation pages
//
//   .. attributetable:: shop.widget:Widget
//
//   .. autoclass:: Widget
//      :inherited-members:

/// A directive line plus its indented option lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub argument: String,
    /// `:name:` or `:name: value` lines
    pub options: Vec<(String, Option<String>)>,
    /// 1-based line of the `..` marker
    pub line: usize,
}

impl Directive {
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|(n, _)| n == name)
    }
}

/// A blank-line separated chunk of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(Vec<String>),
    Directive(Directive),
}

/// Split page source into text blocks and directives. Comments
/// (`..` lines that are not directives) and their indented bodies are dropped.
pub fn split_blocks(source: &str) -> Vec<Block> {
    let lines: Vec<&str> = source.lines().collect();
    let mut blocks = Vec::new();
    let mut text: Vec<String> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        if let Some(rest) = explicit_markup(line) {
            flush_text(&mut text, &mut blocks);
            let start = i;
            i += 1;

            let mut options = Vec::new();
            while i < lines.len() && is_indented(lines[i]) {
                if let Some(option) = parse_option(lines[i].trim()) {
                    options.push(option);
                }
                i += 1;
            }

            if let Some((name, argument)) = rest.trim().split_once("::") {
                blocks.push(Block::Directive(Directive {
                    name: name.trim().to_string(),
                    argument: argument.trim().to_string(),
                    options,
                    line: start + 1,
                }));
            }
            continue;
        }

        if line.trim().is_empty() {
            flush_text(&mut text, &mut blocks);
        } else {
            text.push(line.trim_end().to_string());
        }
        i += 1;
    }

    flush_text(&mut text, &mut blocks);
    blocks
}

/// Body of an explicit markup line: `..` followed by whitespace or nothing
fn explicit_markup(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("..")?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(rest),
        Some(_) => None,
    }
}

fn flush_text(text: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !text.is_empty() {
        blocks.push(Block::Text(std::mem::take(text)));
    }
}

fn is_indented(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

fn parse_option(line: &str) -> Option<(String, Option<String>)> {
    let rest = line.strip_prefix(':')?;
    let (name, value) = rest.split_once(':')?;
    let value = value.trim();
    Some((
        name.trim().to_string(),
        (!value.is_empty()).then(|| value.to_string()),
    ))
}

/// Split a class reference into an optional module path and a simple name.
///
/// Accepts `module.path:Name`, `module.path.Name` and bare `Name`.
pub fn parse_target(target: &str) -> Result<(Option<String>, String), String> {
    let (module, name) = match target.split_once(':') {
        Some((module, name)) => (Some(module), name),
        None => match target.rsplit_once('.') {
            Some((module, name)) => (Some(module), name),
            None => (None, target),
        },
    };

    if !is_identifier(name) {
        return Err(format!("invalid class name in {:?}", target));
    }
    if let Some(m) = module {
        if m.is_empty() || !m.split('.').all(is_identifier) {
            return Err(format!("invalid module path in {:?}", target));
        }
    }

    Ok((module.map(str::to_string), name.to_string()))
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Recognise an RST section underline: one repeated punctuation character
pub fn underline_char(line: &str, title: &str) -> Option<char> {
    let first = line.chars().next()?;
    let is_underline = "=-~^*#".contains(first)
        && line.chars().all(|c| c == first)
        && line.chars().count() >= title.trim().chars().count();
    is_underline.then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_text_and_directives() {
        let source = "Widgets\n=======\n\n.. currentmodule:: shop\n\n.. attributetable:: Widget\n\nSome text\nwrapped.\n";
        let blocks = split_blocks(source);
        assert_eq!(blocks.len(), 4);
        assert_eq!(
            blocks[0],
            Block::Text(vec!["Widgets".to_string(), "=======".to_string()])
        );
        match &blocks[2] {
            Block::Directive(d) => {
                assert_eq!(d.name, "attributetable");
                assert_eq!(d.argument, "Widget");
                assert_eq!(d.line, 6);
                assert!(d.options.is_empty());
            }
            other => panic!("Expected directive, got {:?}", other),
        }
        assert_eq!(
            blocks[3],
            Block::Text(vec!["Some text".to_string(), "wrapped.".to_string()])
        );
    }

    #[test]
    fn test_directive_options() {
        let source = ".. autoclass:: Widget\n   :inherited-members:\n   :members: refresh\nafter\n";
        let blocks = split_blocks(source);
        match &blocks[0] {
            Block::Directive(d) => {
                assert!(d.has_option("inherited-members"));
                assert_eq!(d.options[1], ("members".to_string(), Some("refresh".to_string())));
            }
            other => panic!("Expected directive, got {:?}", other),
        }
        assert_eq!(blocks[1], Block::Text(vec!["after".to_string()]));
    }

    #[test]
    fn test_comments_dropped() {
        let blocks = split_blocks(".. this is a comment\n   still a comment\n\ntext\n");
        assert_eq!(blocks, vec![Block::Text(vec!["text".to_string()])]);

        let bare = split_blocks("..\n   hidden\n\ntext\n");
        assert_eq!(bare, vec![Block::Text(vec!["text".to_string()])]);
    }

    #[test]
    fn test_ellipsis_paragraph_kept() {
        let blocks = split_blocks("Intro\n\n...and then the rest\n  continues here.\n\nEnd\n");
        assert_eq!(
            blocks,
            vec![
                Block::Text(vec!["Intro".to_string()]),
                Block::Text(vec![
                    "...and then the rest".to_string(),
                    "  continues here.".to_string(),
                ]),
                Block::Text(vec!["End".to_string()]),
            ]
        );
    }

    #[test]
    fn test_parse_target_forms() {
        assert_eq!(
            parse_target("shop.widget:Widget").unwrap(),
            (Some("shop.widget".to_string()), "Widget".to_string())
        );
        assert_eq!(
            parse_target("shop.Widget").unwrap(),
            (Some("shop".to_string()), "Widget".to_string())
        );
        assert_eq!(parse_target("Widget").unwrap(), (None, "Widget".to_string()));
    }

    #[test]
    fn test_parse_target_invalid() {
        assert!(parse_target("").is_err());
        assert!(parse_target("shop:").is_err());
        assert!(parse_target(":Widget").is_err());
        assert!(parse_target("shop..x:Widget").is_err());
        assert!(parse_target("Wid get").is_err());
    }

    #[test]
    fn test_underline_char() {
        assert_eq!(underline_char("=======", "Widgets"), Some('='));
        assert_eq!(underline_char("----", "Widgets"), None);
        assert_eq!(underline_char("=-=-=-=", "Widgets"), None);
        assert_eq!(underline_char("Widgets", "Widgets"), None);
    }
}
