// src/main.rs
//! Command-line driver for the matching core. Reads plain-text documents
//! and prints JSON results; anything fancier (uploads, rendering, storage)
//! belongs to other services.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cv_match_core::{
    CoreConfig, EntityExtractor, GenerationOutcome, MatchAnalyzer, TailoringGenerator,
    TextDocument,
};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "cvmatch")]
#[command(about = "Match a CV against a job description and generate a tailored CV")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a CV against a job description
    Analyze {
        cv: PathBuf,
        job: PathBuf,
    },
    /// Extract named entities from a document
    Extract {
        file: PathBuf,
        /// Fail loudly instead of degrading to an empty result
        #[arg(long)]
        strict: bool,
    },
    /// Generate a tailored CV when the match is good enough
    Tailor {
        cv: PathBuf,
        job: PathBuf,
        /// Write the generated markup to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = CoreConfig::from_env();

    match cli.command {
        Command::Analyze { cv, job } => {
            let cv_doc = load_document(&cv).await?;
            let job_doc = load_document(&job).await?;

            let analyzer = MatchAnalyzer::new(config.embedding_client()?);
            let analysis = analyzer.analyze(&cv_doc.raw_text, &job_doc.raw_text).await?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        Command::Extract { file, strict } => {
            let document = load_document(&file).await?;
            let extractor = EntityExtractor::new(config.extraction_client()?);

            let extracted = if strict {
                extractor.extract_and_structure(&document.raw_text).await?
            } else {
                extractor.extract_safe(&document.raw_text).await
            };
            println!("{}", serde_json::to_string_pretty(&extracted)?);
        }
        Command::Tailor { cv, job, output } => {
            let cv_doc = load_document(&cv).await?;
            let job_doc = load_document(&job).await?;

            let analyzer = MatchAnalyzer::new(config.embedding_client()?);
            let analysis = analyzer.analyze(&cv_doc.raw_text, &job_doc.raw_text).await?;

            let generator = TailoringGenerator::new(config.generation_client()?);
            match generator.generate(&cv_doc, &job_doc, &analysis).await? {
                GenerationOutcome::Skipped { similarity } => {
                    println!(
                        "Skipped: similarity {similarity} is below the generation threshold"
                    );
                }
                GenerationOutcome::Generated(tailored) => {
                    if let Some(path) = output {
                        tokio::fs::write(&path, &tailored.content)
                            .await
                            .with_context(|| format!("Failed to write {}", path.display()))?;
                        println!("Wrote {} ({})", path.display(), tailored.generated_id);
                    } else {
                        println!("{}", tailored.content);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Load a plain-text document; the file stem becomes its source id.
async fn load_document(path: &Path) -> Result<TextDocument> {
    let raw_text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let source_id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document")
        .to_string();

    Ok(TextDocument::new(source_id, raw_text))
}
