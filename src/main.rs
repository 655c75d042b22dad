use std::path::PathBuf;
use std::process::ExitCode;

use base64::{engine::general_purpose::STANDARD, Engine};
use clap::{ArgGroup, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ocrspace::config::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS,
    ENDPOINT_ENV, TIMEOUT_ENV,
};
use ocrspace::{ApiResponse, Client, ClientConfig, FileParseExitCode};

/// Recognize text in an image or PDF with OCR.space
#[derive(Parser, Debug)]
#[command(version, about)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "file", "base64_file"])))]
struct Args {
    #[arg(long, env = API_KEY_ENV, hide_env_values = true, default_value = "helloworld")]
    api_key: String,

    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = ENDPOINT_ENV, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Request timeout in seconds, 0 to wait forever
    #[arg(long, env = TIMEOUT_ENV, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Remote image or PDF
    #[arg(long)]
    url: Option<String>,

    /// Local file sent as an upload
    #[arg(long)]
    file: Option<PathBuf>,

    /// Local file sent inline as base64
    #[arg(long)]
    base64_file: Option<PathBuf>,

    /// Three-letter language code, e.g. eng
    #[arg(long)]
    language: Option<String>,

    /// PDF, GIF, PNG, JPG, TIF or BMP
    #[arg(long)]
    filetype: Option<String>,

    #[arg(long)]
    engine: Option<u8>,

    /// Return word bounding boxes
    #[arg(long)]
    overlay: bool,

    #[arg(long)]
    detect_orientation: bool,

    #[arg(long)]
    scale: bool,

    #[arg(long)]
    table: bool,

    #[arg(long)]
    searchable_pdf: bool,

    #[arg(long)]
    hide_text_layer: bool,

    /// Print the decoded response as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Ocr(#[from] ocrspace::Error),
    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not encode response: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(response) if response.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ApiResponse, CliError> {
    let config = ClientConfig::new(&args.api_key)
        .base_url(&args.base_url)
        .endpoint(&args.endpoint)
        .timeout_secs(args.timeout);
    let mut client = Client::with_config(config)?;

    if let Some(url) = &args.url {
        client.url(url)?;
    } else if let Some(path) = &args.file {
        client.file(path)?;
    } else if let Some(path) = &args.base64_file {
        let bytes = std::fs::read(path).map_err(|source| CliError::Read {
            path: path.clone(),
            source,
        })?;
        client.base64_image(&STANDARD.encode(bytes))?;
    }

    if let Some(language) = &args.language {
        client.language(language.as_str())?;
    }
    if let Some(filetype) = &args.filetype {
        client.file_type(filetype.as_str())?;
    }
    if let Some(engine) = args.engine {
        client.engine(engine);
    }
    if args.overlay {
        client.is_overlay_required(true);
    }
    if args.detect_orientation {
        client.detect_orientation(true);
    }
    if args.scale {
        client.scale(true);
    }
    if args.table {
        client.is_table(true);
    }
    if args.searchable_pdf {
        client.is_create_searchable_pdf(true);
    }
    if args.hide_text_layer {
        client.is_searchable_pdf_hide_text_layer(true);
    }

    let response = client.get()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    Ok(response)
}

fn print_response(response: &ApiResponse) {
    let status = response.ocr_exit_code.to_string();
    let status = if response.is_success() {
        status.green()
    } else {
        status.red()
    };
    println!(
        "{} {} in {}ms",
        "OCR:".bold(),
        status,
        response.processing_time_in_milliseconds
    );

    for message in response.error_message.iter().chain(&response.error_details) {
        println!("  {}", message.yellow());
    }
    if let Some(pdf) = &response.searchable_pdf_url {
        println!("{} {}", "Searchable PDF:".bold(), pdf);
    }

    for (i, result) in response.parsed_results.iter().enumerate() {
        let header = format!("--- result {} ---", i + 1);
        if result.file_parse_exit_code == FileParseExitCode::Success {
            println!("{}", header.cyan());
        } else {
            println!("{} ({:?})", header.red(), result.file_parse_exit_code);
        }
        for message in result.error_message.iter().chain(&result.error_details) {
            println!("  {}", message.yellow());
        }
        println!("{}", result.parsed_text);

        for line in &result.text_overlay.lines {
            let words: Vec<String> = line
                .words
                .iter()
                .map(|w| format!("{}@({}, {}, {}x{})", w.word_text, w.left, w.top, w.width, w.height))
                .collect();
            println!("  {}", words.join(" ").dimmed());
        }
    }
}
