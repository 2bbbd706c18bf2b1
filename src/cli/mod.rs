//! CLI module for Cogwright

mod args;

pub use args::{Args, Command};

use crate::build::Builder;
use crate::config::Config;
use crate::error::Result;
use crate::scaffold::{self, NewBotOptions, NewCogOptions};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    let verbose = matches!(args.command, Command::Build { verbose: true, .. });
    init_logging(verbose);

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `--verbose` forces debug, otherwise `RUST_LOG` or info.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Build {
            config,
            source,
            docs,
            output,
            exclude,
            verbose,
        } => {
            let mut cfg = Config::load_or_default(&config)?;
            cfg.merge_cli(source, docs, output, exclude);
            cfg.validate()?;

            if verbose {
                println!("Sources: {}", cfg.source.root.display());
                println!("Docs: {}", cfg.docs.source_dir.display());
                println!("Output: {}", cfg.docs.output_dir.display());
                println!("Include: {:?}", cfg.source.include);
                println!("Exclude: {:?}", cfg.source.exclude);
            }

            let output_dir = cfg.docs.output_dir.clone();
            let report = Builder::new(cfg).with_verbose(verbose).build()?;

            if !report.parse_errors.is_empty() {
                println!("\nParse errors ({}):", report.parse_errors.len());
                for (path, err) in report.parse_errors.iter().take(5) {
                    println!("  {}: {}", path.display(), err);
                }
                if report.parse_errors.len() > 5 {
                    println!("  ... and {} more", report.parse_errors.len() - 5);
                }
            }

            if !report.resolution.failures.is_empty() {
                println!("\nUnresolved attribute tables ({}):", report.resolution.failures.len());
                for failure in &report.resolution.failures {
                    println!("  {} ({}): {}", failure.class, failure.document, failure.message);
                }
            }

            println!("{}", report.generation.summary());
            println!("Documentation written to: {}", output_dir.display());
            Ok(())
        }

        Command::Newbot {
            name,
            directory,
            prefix,
            sharded,
            no_git,
        } => {
            let report = scaffold::new_bot(&NewBotOptions {
                name,
                directory,
                prefix,
                sharded,
                no_git,
            })?;
            println!("successfully made bot at {}", report.path.display());
            Ok(())
        }

        Command::Newcog {
            name,
            directory,
            class_name,
            display_name,
            hide_commands,
            full,
        } => {
            let report = scaffold::new_cog(&NewCogOptions {
                name,
                directory,
                class_name,
                display_name,
                hide_commands,
                full,
            })?;
            println!("successfully made cog at {}", report.path.display());
            Ok(())
        }

        Command::Version => {
            println!("- cogwright v{}", env!("CARGO_PKG_VERSION"));
            println!(
                "- system info: {} {}",
                std::env::consts::OS,
                std::env::consts::ARCH
            );
            Ok(())
        }
    }
}
