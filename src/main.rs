use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use mdimport::{Config, Error, RenderConfig, Snapshot};

#[derive(Parser)]
#[command(name = "mdimport")]
#[command(about = "Render Markdown to HTML and import it into a draft editor")]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to the built-in config)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a Markdown file to an HTML fragment
    Render {
        #[command(flatten)]
        source: Source,

        /// Output HTML file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the compact renderer: no media, no leading-title skip
        #[arg(long)]
        compact: bool,
    },
    /// Print the title derived from a Markdown file
    Title {
        #[command(flatten)]
        source: Source,
    },
    /// Import a Markdown file into a page snapshot
    Import {
        #[command(flatten)]
        source: Source,

        /// Page snapshot (JSON)
        #[arg(long)]
        page: PathBuf,

        /// Output snapshot (defaults to overwriting --page)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Give up looking for editors after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[derive(Args)]
struct Source {
    /// Input Markdown file
    input: PathBuf,

    /// Media type of the input, for files without a .md name
    #[arg(long)]
    media_type: Option<String>,
}

impl Source {
    fn file_name(&self) -> String {
        self.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn read(&self) -> mdimport::Result<String> {
        let name = self.file_name();
        if !mdimport::is_accepted_source(&name, self.media_type.as_deref()) {
            return Err(Error::UnsupportedSource(name));
        }
        Ok(fs::read_to_string(&self.input)?)
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> mdimport::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };

    match cli.command {
        Command::Render {
            source,
            output,
            compact,
        } => {
            let markdown = source.read()?;
            let render = if compact {
                RenderConfig::compact()
            } else {
                config.render
            };
            let html = mdimport::render_markdown(&markdown, &render);
            match output {
                Some(path) => {
                    fs::write(&path, html)?;
                    println!("Created {}", path.display());
                }
                None => println!("{html}"),
            }
        }
        Command::Title { source } => {
            let markdown = source.read()?;
            println!(
                "{}",
                mdimport::extract_title_or(&markdown, mdimport::title_fallback_for(&source.file_name()))
            );
        }
        Command::Import {
            source,
            page,
            output,
            timeout_ms,
        } => {
            let markdown = source.read()?;
            let mut config = config;
            if let Some(ms) = timeout_ms {
                config.resolver = config.resolver.with_timeout(Duration::from_millis(ms));
            }

            let mut snapshot = load_page(&page)?;
            let report = mdimport::import_markdown(&mut snapshot, &markdown, &config)?;

            let output = output.unwrap_or(page);
            fs::write(&output, snapshot.to_json()?)?;
            println!(
                "Imported \"{}\" ({} bytes of HTML)",
                report.title, report.html_len
            );
        }
    }

    Ok(())
}

fn load_page(path: &Path) -> mdimport::Result<Snapshot> {
    let json = fs::read_to_string(path)?;
    Snapshot::from_json(&json)
}
