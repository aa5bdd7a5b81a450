use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use pfi::index::{self, PHRASES_FILE};
use pfi::markov::PhraseChain;
use pfi::search::Searcher;
use pfi::utils::app_data;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pfi")]
#[command(about = "Full-text paragraph search over a fixed corpus")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or rebuild the index for a corpus directory
    Index {
        /// Directory of .txt article files
        corpus: PathBuf,

        /// Write the index here instead of the app data directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Force full rebuild
        #[arg(short, long)]
        force: bool,
    },
    /// Search the index for paragraphs containing all keywords
    Search {
        /// Keywords (all must match)
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Index directory (defaults to the corpus's app data index)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Corpus the index was built from
        #[arg(short, long, default_value = ".")]
        corpus: PathBuf,

        /// Print full paragraphs instead of one sentence per hit
        #[arg(long)]
        full: bool,

        /// Maximum number of hits to print (0 = unlimited)
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
    /// Show index statistics
    Stats {
        /// Index directory (defaults to the corpus's app data index)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Corpus the index was built from
        #[arg(short, long, default_value = ".")]
        corpus: PathBuf,
    },
    /// Generate a phrase from the corpus-trained chain
    Phrase {
        /// Seed keywords (optional)
        keywords: Vec<String>,

        /// Number of chained sentences beyond the seed
        #[arg(short, long, default_value_t = 4)]
        length: usize,

        /// Index directory (defaults to the corpus's app data index)
        #[arg(short, long)]
        index: Option<PathBuf>,

        /// Corpus the index was built from
        #[arg(short, long, default_value = ".")]
        corpus: PathBuf,
    },
    /// Remove the index for a corpus
    Remove {
        /// Corpus directory whose index to remove
        corpus: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { corpus, out, force } => {
            let index_dir = match out {
                Some(dir) => dir,
                None => app_data::get_index_dir(&corpus)?,
            };
            index::build::build_index(&corpus, &index_dir, force, false)?;
        }
        Commands::Search {
            keywords,
            index,
            corpus,
            full,
            limit,
            no_color,
        } => {
            let keywords = normalize_keywords(keywords)?;
            let index_dir = resolve_index_dir(index, &corpus)?;
            let searcher = Searcher::open(&index_dir)?;
            let hits = searcher.search_all(&keywords)?;
            pfi::output::print_hits(&hits, &keywords, full, limit, !no_color)?;
        }
        Commands::Stats { index, corpus } => {
            let index_dir = resolve_index_dir(index, &corpus)?;
            index::stats::show_stats(&index_dir)?;
        }
        Commands::Phrase {
            keywords,
            length,
            index,
            corpus,
        } => {
            let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
            let index_dir = resolve_index_dir(index, &corpus)?;
            let chain = PhraseChain::load(&index_dir.join(PHRASES_FILE))?;
            let mut rng = rand::rng();
            match chain.generate(&keywords, length, &mut rng) {
                Some(phrase) => println!("{phrase}"),
                None => bail!("phrase model is empty; rebuild the index"),
            }
        }
        Commands::Remove { corpus } => {
            app_data::remove_index(&corpus)?;
            println!("Removed index for: {}", corpus.display());
        }
    }

    Ok(())
}

/// Lowercase keywords for lookup; the buffer itself is lowercased at
/// index time. Empty keywords would match every paragraph, so reject
/// them here.
fn normalize_keywords(keywords: Vec<String>) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            bail!("empty keyword");
        }
        out.push(keyword);
    }
    Ok(out)
}

fn resolve_index_dir(index: Option<PathBuf>, corpus: &Path) -> Result<PathBuf> {
    if let Some(dir) = index {
        return Ok(dir);
    }
    if !app_data::is_indexed(corpus)? {
        bail!(
            "no index for {}; run `pfi index {}` first",
            corpus.display(),
            corpus.display()
        );
    }
    app_data::get_index_dir(corpus)
}
