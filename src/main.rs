use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kardex::core::segmenter::{generate_segments, StructureConfig};
use kardex::extract::ChatBridge;
use kardex::ocr::{page_count, OcrBridge};
use kardex::pipeline::{build_document, export_document, PipelineConfig};
use kardex::verify::{compare_documents, GroundTruthDocument};
use kardex::ConsolidatedDocument;

#[derive(Parser, Debug)]
#[command(name = "kardex")]
#[command(version, about = "Scanned LogCard digitization: segmentation, OCR layout reconstruction and LLM field extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full pipeline on a scanned booklet
    Extract {
        /// Input PDF file path
        input: PathBuf,

        /// Output directory (default: ./<input_name>_output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Document structure configuration (JSON)
        #[arg(short, long)]
        structure: Option<PathBuf>,

        /// Rendering DPI for the OCR track
        #[arg(long, default_value_t = 200)]
        dpi: u32,

        /// OCR bridge script
        #[arg(long)]
        ocr_script: Option<PathBuf>,

        /// Chat bridge script
        #[arg(long)]
        chat_script: Option<PathBuf>,

        /// Disable status output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the segment plan for a booklet without processing it
    Plan {
        /// Input PDF file path
        input: PathBuf,

        /// Document structure configuration (JSON)
        #[arg(short, long)]
        structure: Option<PathBuf>,
    },

    /// Compare an extraction result against ground-truth records
    Verify {
        /// Consolidated extraction JSON (logcards.json)
        extracted: PathBuf,

        /// Ground-truth JSON with the same logCards shape
        truth: PathBuf,
    },

    /// Show information about a PDF file
    Info {
        /// Input PDF file path
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            structure,
            dpi,
            ocr_script,
            chat_script,
            quiet,
        } => extract(input, output, structure, dpi, ocr_script, chat_script, quiet),
        Commands::Plan { input, structure } => plan(input, structure),
        Commands::Verify { extracted, truth } => verify(extracted, truth),
        Commands::Info { input } => show_info(input),
    }
}

fn extract(
    input: PathBuf,
    output: Option<PathBuf>,
    structure: Option<PathBuf>,
    dpi: u32,
    ocr_script: Option<PathBuf>,
    chat_script: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    let output_dir = output.unwrap_or_else(|| {
        let stem = input.file_stem().unwrap().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    if !quiet {
        println!("[*] Processing: {}", input.display());
        println!("[*] Output: {}", output_dir.display());
        println!("[*] DPI: {}", dpi);
    }

    let config = PipelineConfig::new(input.clone(), output_dir.clone())
        .with_structure(load_structure(structure)?)
        .with_dpi(dpi);

    let mut ocr = OcrBridge::new();
    if let Some(script) = ocr_script {
        ocr = ocr.with_script(script);
    }
    let mut chat = ChatBridge::new();
    if let Some(script) = chat_script {
        chat = chat.with_script(script);
    }

    if !quiet {
        println!("\n[+] Extracting LogCards...");
    }

    let document = build_document(&config, &ocr, &chat)
        .with_context(|| format!("Failed to process PDF: {}", input.display()))?;

    if !quiet {
        println!(
            "[+] {} of {} segments succeeded, {} LogCards consolidated",
            document.document_info.segments_processed,
            document.document_info.total_segments,
            document.document_info.total_log_cards
        );
        println!("[+] Exporting results...");
    }

    export_document(&document, &output_dir)
        .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;

    if !quiet {
        println!("\n[✓] Done! Results saved to: {}", output_dir.display());
    }

    Ok(())
}

fn plan(input: PathBuf, structure: Option<PathBuf>) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let total_pages = page_count(&input)?;
    let config = load_structure(structure)?;
    let segments = generate_segments(total_pages, &config);

    println!("Segment plan for {} ({} pages)", input.display(), total_pages);
    println!("==============================");
    for (position, segment) in segments.iter().enumerate() {
        let marker = match segment.special {
            Some(kardex::core::model::SpecialMark::Isolated) => " [isolated]",
            _ => "",
        };
        println!(
            "  LogCard {:>3}: pages {}-{} ({} page{}){}",
            position + 1,
            segment.start_page,
            segment.end_page,
            segment.page_count(),
            if segment.page_count() > 1 { "s" } else { "" },
            marker
        );
    }
    println!("{} segments total", segments.len());

    Ok(())
}

fn verify(extracted: PathBuf, truth: PathBuf) -> Result<()> {
    let document: ConsolidatedDocument = read_json(&extracted)?;
    let reference: GroundTruthDocument = read_json(&truth)?;

    let report = compare_documents(&document, &reference);
    print!("{}", report.render_text());

    Ok(())
}

fn show_info(input: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let pages = page_count(&input)
        .with_context(|| format!("Failed to open PDF: {}", input.display()))?;

    println!("PDF Information");
    println!("===============");
    println!("File: {}", input.display());
    println!("Pages: {}", pages);

    Ok(())
}

fn load_structure(path: Option<PathBuf>) -> Result<StructureConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read structure config: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid structure config: {}", path.display()))
        }
        None => Ok(StructureConfig::default()),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}
