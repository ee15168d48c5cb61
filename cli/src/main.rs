//! undoc CLI - SOW document content extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use undoc::{parse_file, parse_files, to_content_items, ContentItem, ContentType};

#[derive(Parser)]
#[command(name = "undoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract sections, tables, and content items from SOW documents", long_about = None)]
struct Cli {
    /// Input document (docx, doc, pdf, html, txt)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Output content items as JSON instead of a listing
    #[arg(long)]
    json: bool,

    /// Maximum input size in megabytes
    #[arg(long, value_name = "MB", default_value_t = 25)]
    max_size: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the flattened content items of a document
    #[command(alias = "ls")]
    Items {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output content items as JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Maximum input size in megabytes
        #[arg(long, value_name = "MB", default_value_t = 25)]
        max_size: u64,
    },

    /// Convert a document to structured JSON
    Json {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Maximum input size in megabytes
        #[arg(long, value_name = "MB", default_value_t = 25)]
        max_size: u64,
    },

    /// Show document information
    Info {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Maximum input size in megabytes
        #[arg(long, value_name = "MB", default_value_t = 25)]
        max_size: u64,
    },

    /// Parse many documents in parallel and write one JSON file each
    Batch {
        /// Input documents
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Maximum input size in megabytes
        #[arg(long, value_name = "MB", default_value_t = 25)]
        max_size: u64,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Items {
            input,
            output,
            json,
            max_size,
        }) => cmd_items(&input, output.as_deref(), json, max_size),
        Some(Commands::Json {
            input,
            output,
            compact,
            max_size,
        }) => cmd_json(&input, output.as_deref(), compact, max_size),
        Some(Commands::Info { input, max_size }) => cmd_info(&input, max_size),
        Some(Commands::Batch {
            inputs,
            output,
            max_size,
        }) => cmd_batch(&inputs, output.as_deref(), max_size),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: list content items if input is provided
            if let Some(input) = cli.input {
                cmd_items(&input, cli.output.as_deref(), cli.json, cli.max_size)
            } else {
                println!("{}", "Usage: undoc <FILE> [OUTPUT]".yellow());
                println!("       undoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn size_limit_bytes(max_size_mb: u64) -> u64 {
    max_size_mb.saturating_mul(1024 * 1024)
}

fn check_size(input: &Path, max_size_mb: u64) -> Result<(), Box<dyn std::error::Error>> {
    let len = fs::metadata(input)?.len();
    if len > size_limit_bytes(max_size_mb) {
        return Err(format!(
            "{} is {:.1} MB, over the {} MB limit (raise with --max-size)",
            input.display(),
            len as f64 / (1024.0 * 1024.0),
            max_size_mb
        )
        .into());
    }
    Ok(())
}

fn cmd_items(
    input: &Path,
    output: Option<&Path>,
    json: bool,
    max_size: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    check_size(input, max_size)?;

    let doc = parse_file(input)?;
    let items = to_content_items(&doc);

    if json {
        let rendered = serde_json::to_string_pretty(&items)?;
        if let Some(path) = output {
            fs::write(path, &rendered)?;
            println!("{} {}", "Saved to".green(), path.display());
        } else {
            println!("{}", rendered);
        }
        return Ok(());
    }

    if let Some(path) = output {
        let mut plain = String::new();
        for item in &items {
            plain.push_str(&item_plain(item));
            plain.push('\n');
        }
        fs::write(path, plain)?;
        println!("{} {}", "Saved to".green(), path.display());
        return Ok(());
    }

    for item in &items {
        print_item(item);
    }

    if let Some(ref warnings) = doc.parse_warnings {
        for warning in warnings {
            eprintln!("{} {}", "Warning:".yellow().bold(), warning);
        }
    }

    Ok(())
}

fn item_plain(item: &ContentItem) -> String {
    match item.content_type {
        ContentType::Header => {
            let level = item.level.unwrap_or(1) as usize;
            format!("{} {}\n", "#".repeat(level), item.text)
        }
        ContentType::Table => format!("[table]\n{}\n", item.text),
        _ => format!("{}\n", item.text),
    }
}

fn print_item(item: &ContentItem) {
    match item.content_type {
        ContentType::Header => {
            let level = item.level.unwrap_or(1) as usize;
            println!("{} {}", "#".repeat(level).cyan(), item.text.bold());
        }
        ContentType::Table => {
            println!("{}", "[table]".dimmed());
            println!("{}", item.text);
        }
        _ => println!("{}", item.text),
    }
    println!();
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    max_size: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    check_size(input, max_size)?;

    let doc = parse_file(input)?;

    let json = if compact {
        serde_json::to_string(&doc)?
    } else {
        undoc::to_json(&doc)?
    };

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, max_size: u64) -> Result<(), Box<dyn std::error::Error>> {
    check_size(input, max_size)?;

    let doc = parse_file(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), doc.format);
    println!("{}: {}", "Sections".bold(), doc.section_count());
    println!("{}: {}", "Tables".bold(), doc.table_count());

    if let Some(ref metadata) = doc.metadata {
        if let Some(ref title) = metadata.title {
            println!("{}: {}", "Title".bold(), title);
        }
        if let Some(ref author) = metadata.author {
            println!("{}: {}", "Author".bold(), author);
        }
        if let Some(ref created) = metadata.created {
            println!("{}: {}", "Created".bold(), created);
        }
        if let Some(ref modified) = metadata.modified {
            println!("{}: {}", "Modified".bold(), modified);
        }
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let words: usize = doc.raw_text.split_whitespace().count();
    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Characters".bold(), doc.raw_text.len());
    println!("{}: {}", "Content items".bold(), to_content_items(&doc).len());

    if let Some(ref warnings) = doc.parse_warnings {
        println!();
        println!("{}", "Warnings".yellow().bold());
        println!("{}", "─".repeat(40).dimmed());
        for warning in warnings {
            println!("  {}", warning.yellow());
        }
    }

    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    output: Option<&Path>,
    max_size: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("undoc_output"));
    fs::create_dir_all(&output_dir)?;

    // Refuse oversized files up front, parse the rest in parallel
    let mut failures: Vec<(PathBuf, String)> = Vec::new();
    let mut to_parse: Vec<PathBuf> = Vec::new();
    for input in inputs {
        match check_size(input, max_size) {
            Ok(()) => to_parse.push(input.clone()),
            Err(e) => failures.push((input.clone(), e.to_string())),
        }
    }

    let pb = ProgressBar::new(to_parse.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message("Parsing...");

    let results = parse_files(&to_parse);

    let mut parsed = 0usize;
    for (input, result) in to_parse.iter().zip(results) {
        match result {
            Ok(doc) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                let path = output_dir.join(format!("{}.json", stem));
                fs::write(&path, undoc::to_json(&doc)?)?;
                parsed += 1;
            }
            Err(e) => failures.push((input.clone(), e.to_string())),
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");

    println!(
        "\n{} {} parsed, {} failed",
        "Batch complete:".green().bold(),
        parsed,
        failures.len()
    );
    println!("{} {}", "Output directory:".green(), output_dir.display());
    for (input, reason) in &failures {
        println!("  {} {}: {}", "✗".red(), input.display(), reason);
    }

    if parsed == 0 && !failures.is_empty() {
        return Err("no files could be parsed".into());
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "undoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("SOW document content extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/undoc".dimmed());
    println!("License: MIT");
}
