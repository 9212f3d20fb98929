//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use tagdoc_core::settings::CONFIG_FILE_NAME;
use tagdoc_core::{
    convert_markup, to_text, Composer, MeetingMinutes, Report, SemanticRole, Settings, TagMapping,
    TechnicalDocument,
};
use tagdoc_model::DocumentModel;
use tagdoc_ooxml::{DocxWriter, Template};

/// Output format for converted and composed documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Word document
    Docx,
    /// AsciiDoc-flavoured plain text
    Text,
    /// The document model as JSON
    Json,
}

impl OutputFormat {
    /// Format implied by an output file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "docx" => Some(OutputFormat::Docx),
            "txt" | "adoc" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Kind of composed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComposeKind {
    /// Cover, summary, chapters, conclusion
    Report,
    /// Cover with version, introduction, sections, appendices
    Technical,
    /// Meeting information, attendees, agenda, decisions, action items
    Minutes,
}

#[derive(Parser)]
#[command(name = "tagdoc")]
#[command(author, version, about = "Markup in, structured documents out", long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an HTML/XML file into a document
    Convert {
        /// Input markup file
        input: PathBuf,

        /// Output file (text and json go to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the output extension, else docx)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Template DOTX/DOCX file
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Compose a templated document from a TOML or JSON description
    Compose {
        /// Document kind
        #[arg(value_enum)]
        kind: ComposeKind,

        /// Input description (.toml or .json)
        input: PathBuf,

        /// Output file (text and json go to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (defaults to the output extension, else docx)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Template DOTX/DOCX file
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the semantic role of each tag
    Classify {
        /// Tag names
        #[arg(required = true)]
        tags: Vec<String>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Where and how a document is written
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub template: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            template,
            config,
        } => {
            let options = OutputOptions {
                output,
                format,
                template,
                config,
            };
            convert_command(&input, &options)?;
        }
        Commands::Compose {
            kind,
            input,
            output,
            format,
            template,
            config,
        } => {
            let options = OutputOptions {
                output,
                format,
                template,
                config,
            };
            compose_command(kind, &input, &options)?;
        }
        Commands::Classify { tags, config } => {
            classify_command(&tags, config.as_deref())?;
        }
    }

    Ok(())
}

/// Install the stderr subscriber; `RUST_LOG` overrides the verbosity flag
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    // Fails only when a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve settings: explicit path, else `tagdoc.toml` next to the input, else defaults
pub fn load_settings(config: Option<&Path>, input: Option<&Path>) -> Result<Settings> {
    if let Some(path) = config {
        return Settings::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()));
    }

    if let Some(input) = input {
        let candidate = input
            .parent()
            .unwrap_or(Path::new("."))
            .join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            info!("Loading config: {}", candidate.display());
            return Settings::load(&candidate)
                .with_context(|| format!("Failed to load config: {}", candidate.display()));
        }
    }

    debug!("No config file, using defaults");
    Ok(Settings::default())
}

/// Execute the convert command
pub fn convert_command(input: &Path, options: &OutputOptions) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    info!("Converting: {}", input.display());

    let settings = load_settings(options.config.as_deref(), Some(input))?;
    let markup = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let model = convert_markup(&markup, &settings.tag_mapping())
        .with_context(|| format!("Failed to convert markup: {}", input.display()))?;
    info!("{} blocks converted", model.len());

    emit(&model, input, options, &settings)
}

/// Execute the compose command
pub fn compose_command(kind: ComposeKind, input: &Path, options: &OutputOptions) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    info!("Composing {:?} from {}", kind, input.display());

    let settings = load_settings(options.config.as_deref(), Some(input))?;
    let mut composer = Composer::new(settings.template.clone());

    let composed = match kind {
        ComposeKind::Report => {
            let report: Report = read_description(input)?;
            composer.generate_report(&report)
        }
        ComposeKind::Technical => {
            let doc: TechnicalDocument = read_description(input)?;
            composer.generate_technical_document(&doc)
        }
        ComposeKind::Minutes => {
            let minutes: MeetingMinutes = read_description(input)?;
            composer.generate_meeting_minutes(&minutes)
        }
    };
    composed.context("Failed to compose document")?;

    let composition = composer.finish();
    info!(
        "{} blocks composed, {} TOC entries",
        composition.model.len(),
        composition.toc.len()
    );

    emit(&composition.model, input, options, &settings)
}

/// Execute the classify command
pub fn classify_command(tags: &[String], config: Option<&Path>) -> Result<()> {
    let settings = load_settings(config, None)?;
    let mapping = settings.tag_mapping();
    for (tag, role) in classify_tags(tags, &mapping) {
        println!("{}: {}", tag, role);
    }
    Ok(())
}

/// Classify tags in one session, in input order
pub fn classify_tags(tags: &[String], mapping: &TagMapping) -> Vec<(String, SemanticRole)> {
    let mut classifier = mapping.classifier();
    tags.iter()
        .map(|tag| (tag.clone(), classifier.classify(tag)))
        .collect()
}

/// Read a composition description from TOML, or JSON for `.json` files
fn read_description<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON description: {}", path.display()))
    } else {
        toml::from_str(&content)
            .with_context(|| format!("Invalid TOML description: {}", path.display()))
    }
}

/// Write `model` in the requested format
fn emit(
    model: &DocumentModel,
    input: &Path,
    options: &OutputOptions,
    settings: &Settings,
) -> Result<()> {
    let format = options
        .format
        .or_else(|| options.output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or(OutputFormat::Docx);

    let rendered: Vec<u8> = match format {
        OutputFormat::Docx => {
            let mut writer = DocxWriter::new().with_page_setup(settings.page);
            if let Some(path) = &options.template {
                info!("Loading template: {}", path.display());
                let template = Template::load(path)
                    .with_context(|| format!("Failed to load template: {}", path.display()))?;
                writer = writer.with_template(template);
            }
            writer.write(model).context("Failed to generate DOCX")?
        }
        OutputFormat::Text => to_text(model).into_bytes(),
        OutputFormat::Json => serde_json::to_string_pretty(model)
            .context("Failed to serialize document model")?
            .into_bytes(),
    };

    let output = match (&options.output, format) {
        (Some(path), _) => path.clone(),
        (None, OutputFormat::Docx) => input.with_extension(format.extension()),
        (None, _) => {
            print!("{}", String::from_utf8_lossy(&rendered));
            return Ok(());
        }
    };

    fs::write(&output, &rendered)
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;
    info!("Wrote {} ({} bytes)", output.display(), rendered.len());
    Ok(())
}
