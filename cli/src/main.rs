//! doccompare CLI - document diff and approval checks

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use doccompare::render::{self, ApprovalReport, HtmlOptions, JsonFormat};
use doccompare::{
    extract_file, Assessment, Chunker, ComparisonSession, DocCompare, Document, NormalizePreset,
    Normalizer, OpenAiClient, ServiceConfig, Verdict,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "doccompare")]
#[command(version)]
#[command(about = "Compare PDF, DOCX, and text documents side by side or with a language model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the text of a document
    Extract {
        /// Input file (.pdf, .docx, .txt)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Normalization preset applied to the extracted text
        #[arg(long, value_enum)]
        normalize: Option<NormalizeLevel>,

        /// Output the document with metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show document information
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Split normalized text into paragraph-aligned chunks
    Chunk {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum characters per chunk
        #[arg(long, default_value = "6000")]
        max_chars: usize,

        /// Output chunks as JSON
        #[arg(long)]
        json: bool,
    },

    /// Side-by-side diff of two documents
    Diff {
        /// Original document
        #[arg(value_name = "LEFT")]
        left: PathBuf,

        /// Revised document
        #[arg(value_name = "RIGHT")]
        right: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "page")]
        format: DiffFormat,

        /// Normalize both documents before diffing
        #[arg(long, value_enum)]
        normalize: Option<NormalizeLevel>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Check whether a proposal can be approved on the basis of a circular
    Approve {
        /// Circular (policy, guideline, or communication)
        #[arg(value_name = "CIRCULAR")]
        circular: PathBuf,

        /// Proposal to review
        #[arg(value_name = "PROPOSAL")]
        proposal: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,

        /// Output file for the Markdown report
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Judge how two documents differ in meaning
    Compare {
        /// First document
        #[arg(value_name = "LEFT")]
        left: PathBuf,

        /// Second document
        #[arg(value_name = "RIGHT")]
        right: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,

        /// Output the assessment as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct ServiceArgs {
    /// API key for the completion service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Chat model
    #[arg(long, default_value = doccompare::compare::DEFAULT_MODEL)]
    model: String,

    /// API root of an OpenAI-compatible service
    #[arg(long, default_value = doccompare::compare::DEFAULT_BASE_URL)]
    base_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    timeout: u64,
}

impl ServiceArgs {
    /// Build the client before any document is read, so a missing key
    /// stops the command early.
    fn client(&self) -> Result<OpenAiClient, doccompare::Error> {
        let config = ServiceConfig::new(self.api_key.clone().unwrap_or_default())
            .with_model(self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout));
        OpenAiClient::new(config)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum NormalizeLevel {
    /// Boilerplate removal and whitespace cleanup
    Standard,
    /// Standard plus Unicode NFC and ligature repair
    Strict,
}

impl From<NormalizeLevel> for NormalizePreset {
    fn from(level: NormalizeLevel) -> Self {
        match level {
            NormalizeLevel::Standard => NormalizePreset::Standard,
            NormalizeLevel::Strict => NormalizePreset::Strict,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum DiffFormat {
    /// Standalone HTML page
    Page,
    /// Bare HTML table
    Table,
    /// JSON rows and statistics
    Json,
    /// Colored terminal output
    Terminal,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            output,
            normalize,
            json,
        } => cmd_extract(&input, output.as_deref(), normalize, json),
        Commands::Info { input } => cmd_info(&input),
        Commands::Chunk {
            input,
            max_chars,
            json,
        } => cmd_chunk(&input, max_chars, json),
        Commands::Diff {
            left,
            right,
            output,
            format,
            normalize,
            compact,
        } => cmd_diff(&left, &right, output.as_deref(), format, normalize, compact),
        Commands::Approve {
            circular,
            proposal,
            service,
            output,
            json,
        } => cmd_approve(&circular, &proposal, &service, output.as_deref(), json),
        Commands::Compare {
            left,
            right,
            service,
            json,
        } => cmd_compare(&left, &right, &service, json),
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

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    normalize: Option<NormalizeLevel>,
    json: bool,
) -> CliResult {
    let doc = extract_file(input)?;

    let content = if json {
        render::to_json(&doc, JsonFormat::Pretty)?
    } else if let Some(level) = normalize {
        Normalizer::from_preset(level.into()).process(doc.text())
    } else {
        doc.text().to_string()
    };

    write_or_print(output, &content)
}

fn cmd_info(input: &Path) -> CliResult {
    let doc = extract_file(input)?;
    let meta = &doc.metadata;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Type".bold(), meta.content_type.mime_type());
    println!("{}: {}", "Units read".bold(), meta.unit_count);
    println!("{}: {}", "Units without text".bold(), meta.empty_units);
    println!(
        "{}: {}",
        "Lossy decoding".bold(),
        if meta.lossy { "Yes" } else { "No" }
    );

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let stats = doc.stats();
    let normalized = doc.normalized();
    println!("{}: {}", "Words".bold(), stats.words);
    println!("{}: {}", "Characters".bold(), stats.chars);
    println!(
        "{}: {}",
        "Normalized characters".bold(),
        normalized.chars().count()
    );

    println!();
    println!("{}", "Preview".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", doc.preview());

    Ok(())
}

fn cmd_chunk(input: &Path, max_chars: usize, json: bool) -> CliResult {
    if max_chars == 0 {
        return Err("--max-chars must be at least 1".into());
    }
    let doc = extract_file(input)?;
    let chunks = Chunker::with_max_chars(max_chars).split(doc.normalized());

    if json {
        println!("{}", render::to_json(&chunks, JsonFormat::Pretty)?);
        return Ok(());
    }

    for chunk in &chunks {
        let marker = if chunk.oversized {
            " (oversized)".yellow().to_string()
        } else {
            String::new()
        };
        println!(
            "{} {}: {} chars, {} paragraphs{}",
            "Chunk".cyan().bold(),
            chunk.index + 1,
            chunk.char_len,
            chunk.paragraphs,
            marker
        );
    }
    println!("\n{} {} chunks", "Done!".green().bold(), chunks.len());
    Ok(())
}

fn cmd_diff(
    left: &Path,
    right: &Path,
    output: Option<&Path>,
    format: DiffFormat,
    normalize: Option<NormalizeLevel>,
    compact: bool,
) -> CliResult {
    let mut builder = DocCompare::new();
    if let Some(level) = normalize {
        builder = builder.normalized(level.into());
    }
    let session = builder.open(left, right)?;
    let report = session.diff(normalize.is_some());

    let content = match format {
        DiffFormat::Page => {
            let options = HtmlOptions::default().with_titles(
                session.left().metadata.name.clone(),
                session.right().metadata.name.clone(),
            );
            render::to_html_page(&report, &options)
        }
        DiffFormat::Table => render::to_html_table(&report),
        DiffFormat::Json => {
            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&report, format)?
        }
        DiffFormat::Terminal => {
            print_terminal_diff(&report);
            return Ok(());
        }
    };

    write_or_print(output, &content)
}

fn print_terminal_diff(report: &doccompare::DiffReport) {
    for row in &report.rows {
        let number = |n: Option<usize>| n.map(|n| n.to_string()).unwrap_or_default();
        let line = format!(
            "{:>5} {:<60} {:>5} {}",
            number(row.left_number),
            strip_markup(&row.left),
            number(row.right_number),
            strip_markup(&row.right)
        );
        if row.is_changed() {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }

    let stats = &report.stats;
    println!();
    println!(
        "{}: {} changed, {} equal, similarity {:.1}%",
        "Summary".bold(),
        stats.changed_rows,
        stats.equal_rows,
        stats.similarity * 100.0
    );
}

/// Undo the HTML escaping and markers of a rendered cell for terminal display.
fn strip_markup(html: &str) -> String {
    html.replace("<del>", "[-")
        .replace("</del>", "-]")
        .replace("<ins>", "{+")
        .replace("</ins>", "+}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

fn open_for_review(
    left: &Path,
    right: &Path,
) -> Result<ComparisonSession, Box<dyn std::error::Error>> {
    let session = ComparisonSession::from_files(left, right)?;
    print_preview("Document 1", session.left());
    print_preview("Document 2", session.right());
    Ok(session)
}

fn print_preview(label: &str, doc: &Document) {
    log::info!("{}: {} ({} words)", label, doc.metadata.name, doc.word_count());
    if doc.is_empty() {
        eprintln!(
            "{} {} yielded no text",
            "Warning:".yellow().bold(),
            doc.metadata.name
        );
    }
}

fn spinner(message: &'static str) -> Result<ProgressBar, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn cmd_approve(
    circular: &Path,
    proposal: &Path,
    service: &ServiceArgs,
    output: Option<&Path>,
    json: bool,
) -> CliResult {
    let client = service.client()?;
    let session = open_for_review(circular, proposal)?;

    let pb = spinner("Analyzing proposal against circular requirements...")?;
    let report = session.approve(&client);
    pb.finish_and_clear();

    if json {
        return write_or_print(output, &render::to_json(&report, JsonFormat::Pretty)?);
    }

    print_decision(&report);
    if let Some(path) = output {
        fs::write(path, report.to_markdown())?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("\n{}", report.assessment.text().trim());
    }

    println!();
    println!("{}", "Document Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {} words, {} characters",
        "Circular".bold(),
        report.circular_stats.words,
        report.circular_stats.chars
    );
    println!(
        "{}: {} words, {} characters",
        "Proposal".bold(),
        report.proposal_stats.words,
        report.proposal_stats.chars
    );

    if report.assessment.is_error() {
        return Err(report.assessment.text().into());
    }
    Ok(())
}

fn print_decision(report: &ApprovalReport) {
    let label = report.decision_label();
    let styled = match report.assessment.verdict() {
        Some(Verdict::Approved) => label.green().bold(),
        Some(Verdict::Rejected) => label.red().bold(),
        Some(_) => label.yellow().bold(),
        None => label.red(),
    };
    println!("{}", styled);
}

fn cmd_compare(left: &Path, right: &Path, service: &ServiceArgs, json: bool) -> CliResult {
    let client = service.client()?;
    let session = open_for_review(left, right)?;

    let pb = spinner("Comparing documents...")?;
    let assessment = session.compare_content(&client);
    pb.finish_and_clear();

    if json {
        println!("{}", render::to_json(&assessment, JsonFormat::Pretty)?);
        return Ok(());
    }

    match &assessment {
        Assessment::Verdict(report) => {
            let token = report.verdict.token();
            let styled = match report.verdict {
                Verdict::IdenticalInMeaning => token.green().bold(),
                Verdict::MinorEditsOnly => token.cyan().bold(),
                Verdict::SubstantiveDifferences => token.red().bold(),
                _ => token.yellow().bold(),
            };
            println!("{}", styled);
            if report.synthesized {
                println!(
                    "{}",
                    format!("combined from {} sections", report.chunks.len()).dimmed()
                );
            }
            println!("\n{}", report.reasoning.trim());
            Ok(())
        }
        Assessment::Error(message) => Err(message.clone().into()),
    }
}

fn cmd_version() {
    println!("{} {}", "doccompare".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document diff and approval check tool");
    println!();
    println!("License: MIT");
}
