//! uncms CLI - structured content to Markdown conversion tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use uncms::{AssetConfig, BlockKind, CleanupOptions, Document, RenderOptions};

#[derive(Parser)]
#[command(name = "uncms")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert structured content documents (JSON) to Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one document to Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input JSON file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print rendering statistics to stderr
        #[arg(long)]
        stats: bool,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Convert several documents, writing <name>.md files into a directory
    Convert {
        /// Input JSON files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show document information
    Info {
        /// Input JSON file ("-" for stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

/// Render configuration shared by the converting commands.
#[derive(Args)]
struct RenderArgs {
    /// Site base URL for root-relative links
    #[arg(long, env = "UNCMS_SITE_URL", default_value = "")]
    site_url: String,

    /// Asset CDN host
    #[arg(long, env = "UNCMS_CDN_HOST", default_value = "cdn.sanity.io")]
    cdn_host: String,

    /// Content store project id
    #[arg(long, env = "UNCMS_PROJECT_ID", default_value = "")]
    project_id: String,

    /// Content store dataset
    #[arg(long, env = "UNCMS_DATASET", default_value = "production")]
    dataset: String,

    /// Longest string kept by generic extraction
    #[arg(long, env = "UNCMS_MAX_LEAF_LENGTH", default_value_t = uncms::render::DEFAULT_MAX_LEAF_LENGTH)]
    max_leaf_length: usize,

    /// Recursion cap for generic extraction
    #[arg(long, env = "UNCMS_MAX_DEPTH", default_value_t = uncms::render::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Heading for listing indexes
    #[arg(long, default_value = "Contents")]
    listing_heading: String,

    /// Path prefix for listing entry links
    #[arg(long, default_value = "")]
    listing_base_path: String,

    /// Escape Markdown special characters in text
    #[arg(long)]
    escape: bool,

    /// Text cleanup level
    #[arg(long, value_enum, default_value = "standard")]
    cleanup: CleanupLevel,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum CleanupLevel {
    /// Collapse blank lines only
    Minimal,
    /// Line endings, Unicode NFC, trailing whitespace (default)
    Standard,
}

impl From<CleanupLevel> for CleanupOptions {
    fn from(level: CleanupLevel) -> Self {
        match level {
            CleanupLevel::Minimal => CleanupOptions::minimal(),
            CleanupLevel::Standard => CleanupOptions::standard(),
        }
    }
}

impl RenderArgs {
    fn to_options(&self) -> uncms::Result<RenderOptions> {
        let options = RenderOptions::new()
            .with_site_url(&self.site_url)
            .with_asset_config(AssetConfig {
                cdn_host: self.cdn_host.clone(),
                project_id: self.project_id.clone(),
                dataset: self.dataset.clone(),
            })
            .with_max_leaf_length(self.max_leaf_length)
            .with_max_depth(self.max_depth)
            .with_listing_heading(&self.listing_heading)
            .with_listing_base_path(&self.listing_base_path)
            .with_escaping(self.escape)
            .with_cleanup(self.cleanup.into());
        options.validate()?;
        Ok(options)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Markdown {
            input,
            output,
            stats,
            render,
        } => cmd_markdown(&input, output.as_deref(), stats, &render),
        Commands::Convert {
            inputs,
            output,
            render,
        } => cmd_convert(&inputs, &output, &render),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_document(input: &Path) -> uncms::Result<Document> {
    if input.as_os_str() == "-" {
        let mut data = Vec::new();
        std::io::stdin().read_to_end(&mut data)?;
        uncms::parse_bytes(&data)
    } else {
        uncms::parse_file(input)
    }
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    stats: bool,
    render: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = render.to_options()?;
    let doc = read_document(input)?;

    let result = uncms::render::to_markdown_with_stats(&doc, &options);

    if let Some(path) = output {
        fs::write(path, &result.content)?;
        println!(
            "{} {} ({} bytes)",
            "Saved to".green(),
            path.display(),
            result.content_len()
        );
    } else {
        print!("{}", result.content);
    }

    if stats {
        eprintln!("{}", serde_json::to_string_pretty(&result.stats)?);
    }

    Ok(())
}

fn cmd_convert(
    inputs: &[PathBuf],
    output_dir: &Path,
    render: &RenderArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = render.to_options()?;
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut written = Vec::new();
    let mut failed = 0usize;
    for input in inputs {
        pb.set_message(input.display().to_string());
        match convert_one(input, output_dir, &options) {
            Ok(path) => {
                log::debug!("Wrote {}", path.display());
                written.push(path);
            }
            Err(e) => {
                failed += 1;
                log::warn!("Failed to convert {}: {}", input.display(), e);
                pb.println(format!("{} {}: {}", "Skipped".yellow(), input.display(), e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    for (i, path) in written.iter().enumerate() {
        let branch = if i + 1 == written.len() { "└─" } else { "├─" };
        println!("  {} {}", branch.dimmed(), path.display());
    }

    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn convert_one(input: &Path, output_dir: &Path, options: &RenderOptions) -> uncms::Result<PathBuf> {
    let doc = uncms::parse_file(input)?;
    let markdown = uncms::render::to_markdown(&doc, options);
    let path = output_path(input, output_dir);
    fs::write(&path, markdown)?;
    Ok(path)
}

fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    output_dir.join(format!("{}.md", stem))
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let doc = read_document(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref kind) = doc.kind {
        println!("{}: {}", "Type".bold(), kind);
    }
    if let Some(ref title) = doc.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if !doc.metadata.authors.is_empty() {
        println!("{}: {}", "Author".bold(), doc.metadata.authors.join(", "));
    }
    if let Some(ref published) = doc.metadata.published_at {
        println!("{}: {}", "Published".bold(), published);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Body nodes".bold(), doc.body.len());
    println!("{}: {}", "Blocks".bold(), doc.blocks.len());
    for block in &doc.blocks {
        let marker = if matches!(block.kind, BlockKind::Unknown(_)) {
            "generic".yellow()
        } else {
            "dedicated".green()
        };
        println!("  {} {} ({})", "-".dimmed(), block.block_type, marker);
    }
    if doc.is_listing() {
        println!("{}: {}", "Listing entries".bold(), doc.child_items.len());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "uncms".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Structured content to Markdown conversion tool");
    println!();
    println!("License: MIT");
}
