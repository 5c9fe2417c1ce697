//! storage2md - convert Confluence storage-format markup to Markdown.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use confluence_markdown::markdown::DEFAULT_MARK_PREFIX;
use confluence_markdown::page::MarkdownOutput;
use confluence_markdown::{ConvertOptions, Error, OutputMode, Page, Result};

#[derive(Parser)]
#[command(name = "storage2md")]
#[command(about = "Convert Confluence storage-format markup to Markdown")]
#[command(version)]
struct Cli {
    /// Storage-format markup (or page JSON with --page); stdin when omitted
    input: Option<PathBuf>,

    /// Write Markdown here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Tag headings with their level, e.g. `## L_2 Title`
    #[arg(long)]
    level_mark: bool,

    /// Prefix for heading level marks
    #[arg(long, default_value = DEFAULT_MARK_PREFIX)]
    mark_prefix: String,

    /// Read a fetched page payload `{success, title, content, message}`
    #[arg(long)]
    page: bool,

    /// Print the Markdown or write it to `<title>.md`
    #[arg(long, value_enum, default_value_t = Mode::Text)]
    mode: Mode,

    /// Directory for `--mode file`
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Text,
    File,
}

impl From<Mode> for OutputMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Text => OutputMode::Text,
            Mode::File => OutputMode::File,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ConvertOptions::new()
        .with_level_mark(cli.level_mark)
        .with_mark_prefix(cli.mark_prefix.as_str());

    let input = read_input(cli.input.as_ref())?;
    let page = if cli.page {
        Page::from_json(&input)?
    } else {
        let title = cli
            .input
            .as_ref()
            .and_then(|path| path.file_stem())
            .map_or_else(|| "untitled".to_string(), |stem| stem.to_string_lossy().into_owned());
        Page::new(title, input)
    };

    match page.render(&options, cli.mode.into())? {
        MarkdownOutput::Text(markdown) => match &cli.output {
            Some(path) => fs::write(path, markdown)?,
            None => io::stdout().write_all(markdown.as_bytes())?,
        },
        MarkdownOutput::File(artifact) => {
            if !cli.out_dir.is_dir() {
                return Err(Error::Other(format!(
                    "output directory does not exist: {}",
                    cli.out_dir.display()
                )));
            }
            let path = artifact.write_to(&cli.out_dir)?;
            println!("{}", path.display());
        },
    }
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "reading input file");
            Ok(fs::read_to_string(path)?)
        },
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        },
    }
}
