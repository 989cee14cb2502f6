//! Extract command - pull fields out of a single OCR text file.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use fieldex_core::{clean_ocr_text, ExtractionResult, FieldexConfig};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// OCR text file, or `-` to read stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Document type: id_card, passport, form or general
    #[arg(short = 'd', long = "doc-type")]
    doc_type: Option<String>,

    /// Keyword override file
    #[arg(short, long)]
    keywords: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip OCR text cleanup
    #[arg(long)]
    raw: bool,

    /// Show confidence scores in text output
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output (field, value, confidence)
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    let text = read_input(&args.input)?;
    let text = prepare_text(&text, args.raw, &config);

    let extractor = super::build_extractor(&config, args.keywords.as_deref());
    let document_type = super::document_type(args.doc_type.as_deref(), &config);

    info!("Processing {}", args.input.display());
    let result = extractor.extract_all_fields(&text, document_type);

    let output = format_result(&result, args.format, args.show_confidence)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    Ok(fs::read_to_string(input)?)
}

/// Apply OCR cleanup unless disabled by `--raw` or the config.
pub fn prepare_text(text: &str, raw: bool, config: &FieldexConfig) -> String {
    if raw || !config.extraction.clean_ocr_text {
        text.to_string()
    } else {
        clean_ocr_text(text)
    }
}

pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    show_confidence: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_result_csv(result),
        OutputFormat::Text => Ok(format_result_text(result, show_confidence)),
    }
}

fn format_result_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "value", "confidence"])?;

    for (field, value) in &result.fields {
        let confidence = result.confidence_of(field).unwrap_or(0.0);
        wtr.write_record([field.as_str(), &value.display(), &format!("{:.2}", confidence)])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_result_text(result: &ExtractionResult, show_confidence: bool) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document type: {}\n", result.document_type));

    if result.is_empty() {
        output.push_str("No fields extracted\n");
        return output;
    }

    output.push('\n');
    let width = result.fields.keys().map(|k| k.len()).max().unwrap_or(0);

    for (field, value) in &result.fields {
        output.push_str(&format!("{:width$}  {}", field, value.display(), width = width));
        if show_confidence {
            let confidence = result.confidence_of(field).unwrap_or(0.0);
            output.push_str(&format!("  ({:.0}%)", confidence * 100.0));
        }
        output.push('\n');
    }

    output
}
