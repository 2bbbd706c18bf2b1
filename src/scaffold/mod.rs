// Project scaffolding: bot skeletons and cog modules
//
// Failures on required files abort with `Error::Scaffold`. Optional pieces
// (the cogs package, .gitignore) only produce a warning.

mod paths;

pub use paths::{cog_class_name, is_reserved_name, to_path};

use crate::error::{Error, Result};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::{debug, warn};

const TOKEN_PLACEHOLDER: &str = "place your token here";

/// Options for `newbot`
#[derive(Debug, Clone)]
pub struct NewBotOptions {
    pub name: String,
    /// Parent directory, the current directory when absent
    pub directory: Option<String>,
    pub prefix: String,
    /// Use `AutoShardedBot` instead of `Bot`
    pub sharded: bool,
    /// Skip the .gitignore
    pub no_git: bool,
}

impl NewBotOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: None,
            prefix: "$".to_string(),
            sharded: false,
            no_git: false,
        }
    }
}

/// Options for `newcog`
#[derive(Debug, Clone)]
pub struct NewCogOptions {
    pub name: String,
    pub directory: String,
    pub class_name: Option<String>,
    pub display_name: Option<String>,
    pub hide_commands: bool,
    /// Include the cog hook methods
    pub full: bool,
}

impl NewCogOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: "cogs".to_string(),
            class_name: None,
            display_name: None,
            hide_commands: false,
            full: false,
        }
    }
}

/// What a scaffolding command wrote
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    /// Bot directory or cog file
    pub path: PathBuf,
    pub files: Vec<PathBuf>,
    /// Optional steps that failed
    pub warnings: Vec<String>,
}

impl ScaffoldReport {
    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

fn templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("bot.py", include_str!("../../templates/scaffold/bot.py.tera")),
        ("config.py", include_str!("../../templates/scaffold/config.py.tera")),
        ("cog.py", include_str!("../../templates/scaffold/cog.py.tera")),
        ("cog_extras.py", include_str!("../../templates/scaffold/cog_extras.py.tera")),
        ("gitignore", include_str!("../../templates/scaffold/gitignore.tera")),
    ])?;
    Ok(tera)
}

/// Create a bot project directory
pub fn new_bot(options: &NewBotOptions) -> Result<ScaffoldReport> {
    let tera = templates()?;

    let parent = match &options.directory {
        Some(dir) => to_path(dir, false)?,
        None => PathBuf::from("."),
    };
    let root = parent.join(to_path(&options.name, false)?);

    fs::create_dir_all(&root)
        .map_err(|e| Error::scaffold(format!("could not create our bot directory ({})", e)))?;

    let mut report = ScaffoldReport {
        path: root.clone(),
        ..Default::default()
    };

    let cogs_init = root.join("cogs").join("__init__.py");
    match touch(&cogs_init) {
        Ok(()) => report.files.push(cogs_init),
        Err(e) => report.warn(format!("could not create cogs directory ({})", e)),
    }

    let mut context = Context::new();
    context.insert("token", TOKEN_PLACEHOLDER);
    context.insert("base", if options.sharded { "AutoShardedBot" } else { "Bot" });
    context.insert("prefix", &options.prefix);

    let config_file = root.join("config.py");
    write_rendered(&tera, "config.py", &context, &config_file)
        .map_err(|e| Error::scaffold(format!("could not create config file ({})", e)))?;
    report.files.push(config_file);

    let bot_file = root.join("bot.py");
    write_rendered(&tera, "bot.py", &context, &bot_file)
        .map_err(|e| Error::scaffold(format!("could not create bot file ({})", e)))?;
    report.files.push(bot_file);

    if !options.no_git {
        let gitignore = root.join(".gitignore");
        match write_rendered(&tera, "gitignore", &context, &gitignore) {
            Ok(()) => report.files.push(gitignore),
            Err(e) => report.warn(format!("could not create .gitignore file ({})", e)),
        }
    }

    debug!(path = %root.display(), files = report.files.len(), "bot scaffolded");
    Ok(report)
}

/// Create a cog module
pub fn new_cog(options: &NewCogOptions) -> Result<ScaffoldReport> {
    let tera = templates()?;
    let cog_dir = to_path(&options.directory, false)?;

    let mut report = ScaffoldReport::default();
    if let Err(e) = fs::create_dir_all(&cog_dir) {
        report.warn(format!("could not create cogs directory ({})", e));
    }

    let file = cog_dir
        .join(to_path(&options.name, false)?)
        .with_extension("py");

    let name = match &options.class_name {
        Some(name) => name.clone(),
        None => {
            let stem = file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            cog_class_name(&stem)
        }
    };

    let mut attrs = String::new();
    if let Some(display_name) = &options.display_name {
        attrs.push_str(&format!(", name=\"{}\"", display_name));
    }
    if options.hide_commands {
        attrs.push_str(", command_attrs=dict(hidden=True)");
    }

    let mut context = Context::new();
    context.insert("name", &name);
    context.insert("attrs", &attrs);
    context.insert("full", &options.full);

    write_rendered(&tera, "cog.py", &context, &file)
        .map_err(|e| Error::scaffold(format!("could not create cog file ({})", e)))?;

    debug!(path = %file.display(), class = %name, "cog scaffolded");
    report.files.push(file.clone());
    report.path = file;
    Ok(report)
}

/// Create a file if missing, along with its parent directory
fn touch(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

fn write_rendered(tera: &Tera, template: &str, context: &Context, path: &Path) -> Result<()> {
    let contents = tera.render(template, context)?;
    fs::write(path, contents)?;
    Ok(())
}
