use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use retriever_core::{persist, tokenizer, IndexSnapshot, InvertedIndex, Vectorizer};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a TF-IDF inverted index over a document collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index snapshot from a directory of plain-text documents
    Build {
        /// Collection root directory
        #[arg(long)]
        input: PathBuf,
        /// Output snapshot file
        #[arg(long)]
        output: PathBuf,
        /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
        #[arg(long, default_value_t = false)]
        smoothed_idf: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, smoothed_idf } => build(&input, &output, smoothed_idf),
    }
}

fn build(input: &Path, output: &Path, smoothed_idf: bool) -> Result<()> {
    let start = Instant::now();
    let (doc_names, documents) = read_collection(input)?;
    if documents.is_empty() {
        bail!("no readable documents under {}", input.display());
    }
    tracing::info!(num_docs = documents.len(), "collection read");

    let tokenized: Vec<Vec<String>> =
        documents.iter().map(|body| tokenizer::normalize(body)).collect();
    let matrix = Vectorizer::new(smoothed_idf).fit_transform(&tokenized);
    tracing::info!(
        num_terms = matrix.vocabulary.len(),
        nonzero_cells = matrix.cells.len(),
        "weight matrix built"
    );

    let index = InvertedIndex::from_matrix(&matrix).context("index construction failed")?;
    let snapshot = IndexSnapshot { index, doc_names };
    persist::save(output, &snapshot)
        .with_context(|| format!("writing snapshot to {}", output.display()))?;

    tracing::info!(
        output = %output.display(),
        elapsed_s = start.elapsed().as_secs_f64(),
        "index build complete"
    );
    Ok(())
}

/// Enumerate the collection in a stable, repeatable order and read each
/// document. Names are paths relative to the collection root; the returned
/// order is the snapshot's document-id order.
fn read_collection(root: &Path) -> Result<(Vec<String>, Vec<String>)> {
    let mut names = Vec::new();
    let mut bodies = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .into_owned();
        match fs::read_to_string(entry.path()) {
            Ok(body) => {
                names.push(rel);
                bodies.push(body);
            }
            Err(err) => {
                tracing::warn!(file = %rel, %err, "skipping unreadable document");
            }
        }
    }
    Ok((names, bodies))
}
