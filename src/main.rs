use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use markrite::{TransformOptions, normalize_fragment, render_file, render_path, transform_with};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Render Markdown-like text as an HTML fragment")]
struct Cli {
    /// Write `<file>.html` next to each input instead of printing
    #[arg(long = "write", requires = "files")]
    write: bool,
    /// Log rule applications to stderr
    #[arg(short, long)]
    verbose: bool,
    #[command(flatten)]
    opts: RenderOpts,
    /// Markdown files to render
    files: Vec<PathBuf>,
}

#[derive(clap::Args, Clone, Copy)]
struct RenderOpts {
    /// Keep newlines instead of converting them to `<br>`
    #[arg(long = "no-line-breaks")]
    no_line_breaks: bool,
    /// Re-serialise the output through an HTML5 parser
    #[arg(long = "normalize")]
    normalize: bool,
}

impl RenderOpts {
    fn transform_options(self) -> TransformOptions {
        TransformOptions {
            line_breaks: !self.no_line_breaks,
        }
    }
}

fn render_text(text: &str, opts: RenderOpts) -> String {
    let html = transform_with(text, &opts.transform_options());
    if opts.normalize {
        normalize_fragment(&html)
    } else {
        html
    }
}

/// Render one file, returning the fragment when it should be printed.
fn handle_path(path: &Path, write: bool, opts: RenderOpts) -> anyhow::Result<Option<String>> {
    let options = opts.transform_options();
    if write {
        render_file(path, &options, opts.normalize)
            .with_context(|| format!("failed to render {}", path.display()))?;
        return Ok(None);
    }
    render_path(path, &options, opts.normalize)
        .map(Some)
        .with_context(|| format!("failed to read {}", path.display()))
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Entry point for the `markrite` command-line tool.
///
/// Reads standard input when no files are given. Files are rendered in
/// parallel and printed in argument order; with `--write` each fragment is
/// stored next to its source instead. A failing file does not stop the
/// others, but the process exits with an error afterwards.
///
/// # Examples
///
/// ```sh
/// # Render a file to stdout
/// markrite notes.md
///
/// # Write notes.html next to notes.md
/// markrite --write notes.md
///
/// # Render standard input without <br> conversion
/// cat notes.md | markrite --no-line-breaks
/// ```
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.files.is_empty() {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        println!("{}", render_text(&input, cli.opts));
        return Ok(());
    }

    let results: Vec<anyhow::Result<Option<String>>> = cli
        .files
        .par_iter()
        .map(|path| handle_path(path, cli.write, cli.opts))
        .collect();

    let mut failed = 0usize;
    for result in results {
        match result {
            Ok(Some(html)) => println!("{html}"),
            Ok(None) => {}
            Err(err) => {
                eprintln!("{err:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} file(s) could not be rendered");
    }
    Ok(())
}
