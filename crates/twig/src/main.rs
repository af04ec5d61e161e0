mod ops;

use anyhow::{Context as _, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use mimalloc::MiMalloc;
use ops::Op;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};
use twig_edit::Document;
use twig_errors::Renderer;
use twig_sexp::Sexp;
use twig_text::View;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Structural editing of S-expressions.
#[derive(Parser)]
#[command(version)]
enum Options {
    /// Parse a file and print its tree.
    Tree { path: Utf8PathBuf },
    /// Replay edits against a file, printing the document after each one.
    ///
    /// Edits are `insert:POS:CHAR`, `delete:POS`, `up:PATH`, `down:PATH` and
    /// `dup:PATH`, where `PATH` lists child indices separated by dots.
    Edit { path: Utf8PathBuf, ops: Vec<Op> },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env("TWIG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let renderer = Renderer::styled();
    match Options::parse() {
        Options::Tree { path } => {
            let document = load(&path, &renderer)?;
            print!("{}", document.render_as_tree());
        }
        Options::Edit { path, ops } => {
            let mut document = load(&path, &renderer)?;
            for op in ops {
                debug!(?op, "applying");
                let outcome = op.apply(&mut document)?;
                println!("{op}: {outcome}");
                print_document(&document);
            }
        }
    }

    Ok(())
}

fn load(path: &Utf8Path, renderer: &Renderer) -> anyhow::Result<Document<Sexp>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))?;

    Document::parse(Sexp, &text).map_err(|error| {
        eprintln!("{}", error.render(renderer, path.as_str(), &text));
        anyhow!("`{path}` does not parse")
    })
}

fn print_document(document: &Document<Sexp>) {
    let root = document.root();
    println!("  current:  {:?}", document.render_as_text(root, View::Current));
    println!("  original: {:?}", document.render_as_text(root, View::Original));
    println!("  markers:  {}", document.text().render_markers());
    for line in document.render_as_tree().lines() {
        println!("  {line}");
    }
}
