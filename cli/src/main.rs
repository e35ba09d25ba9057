use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use form_builder_core::codec::{decode_document, encode_document};
use form_builder_core::{
    CategoryId, CodecFormat, Document, ElementPath, FormBuilder, Intent, Mods, SchemaPair,
};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

#[derive(Parser)]
#[command(name = "form-builder")]
#[command(about = "Inspect and edit JSON Schema / UI Schema form pairs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// The schema pair every command reads.
#[derive(Args)]
struct PairArgs {
    /// JSON Schema file (.json, .yaml or .yml)
    #[arg(short, long)]
    schema: PathBuf,

    /// UI Schema file; an empty UI schema is used when omitted
    #[arg(short, long)]
    ui_schema: Option<PathBuf>,

    /// Mods JSON file (custom categories, deactivated categories, defaults)
    #[arg(long)]
    mods: Option<PathBuf>,
}

/// Where edited documents go.
#[derive(Args)]
struct OutputArgs {
    /// Write the edited schema here
    #[arg(long)]
    out_schema: Option<PathBuf>,

    /// Write the edited UI schema here
    #[arg(long)]
    out_ui_schema: Option<PathBuf>,

    /// Overwrite the input files
    #[arg(long, conflicts_with_all = ["out_schema", "out_ui_schema"])]
    in_place: bool,

    /// Output format for stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the element tree as JSON
    Elements {
        #[command(flatten)]
        pair: PairArgs,

        /// Walk the definitions instead of the main form
        #[arg(long)]
        definitions: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,
    },

    /// Print advisory warnings, one per line
    Check {
        #[command(flatten)]
        pair: PairArgs,
    },

    /// Apply an intent given as JSON
    Apply {
        #[command(flatten)]
        pair: PairArgs,

        /// Intent JSON, e.g. '{"type": "add_card"}'
        #[arg(long)]
        intent: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Append a new card
    AddCard {
        #[command(flatten)]
        pair: PairArgs,

        /// Parent section path (root when omitted)
        #[arg(long, default_value = "")]
        parent: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Append a new section
    AddSection {
        #[command(flatten)]
        pair: PairArgs,

        /// Parent section path (root when omitted)
        #[arg(long, default_value = "")]
        parent: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Delete an element
    Delete {
        #[command(flatten)]
        pair: PairArgs,

        /// Element path, e.g. `address/street`
        path: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Rename an element's key
    Rename {
        #[command(flatten)]
        pair: PairArgs,

        /// Element path
        path: String,

        /// New property name
        name: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Move an element one slot up
    MoveUp {
        #[command(flatten)]
        pair: PairArgs,

        /// Element path
        path: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Move an element one slot down
    MoveDown {
        #[command(flatten)]
        pair: PairArgs,

        /// Element path
        path: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Change a card's category
    Retype {
        #[command(flatten)]
        pair: PairArgs,

        /// Element path
        path: String,

        /// Category key, e.g. `longAnswer` or a custom key from the mods file
        category: String,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum OutputFormat {
    Pretty,
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so stdout stays clean for JSON
    let log_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Elements {
            pair,
            definitions,
            format,
        } => {
            let builder = load_builder(&pair)?;
            let doc = read_pair(&pair)?;
            let walked = if definitions {
                builder.definition_elements(&doc)
            } else {
                builder.elements(&doc)
            };
            for warning in &walked.warnings {
                eprintln!("Warning: {}", warning.message);
            }
            write_json(&walked.elements, format)?;
        }
        Commands::Check { pair } => {
            let builder = load_builder(&pair)?;
            let doc = read_pair(&pair)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for warning in builder.check(&doc) {
                writeln!(out, "{}", warning.message).context("Failed to write warning")?;
            }
        }
        Commands::Apply {
            pair,
            intent,
            output,
        } => {
            let intent = Intent::from_json(&intent).context("Failed to parse --intent")?;
            run_intent(&pair, &output, intent)?;
        }
        Commands::AddCard {
            pair,
            parent,
            output,
        } => run_intent(
            &pair,
            &output,
            Intent::AddCard {
                parent: ElementPath::parse(&parent),
            },
        )?,
        Commands::AddSection {
            pair,
            parent,
            output,
        } => run_intent(
            &pair,
            &output,
            Intent::AddSection {
                parent: ElementPath::parse(&parent),
            },
        )?,
        Commands::Delete { pair, path, output } => run_intent(
            &pair,
            &output,
            Intent::Delete {
                path: ElementPath::parse(&path),
            },
        )?,
        Commands::Rename {
            pair,
            path,
            name,
            output,
        } => run_intent(
            &pair,
            &output,
            Intent::Rename {
                path: ElementPath::parse(&path),
                name,
            },
        )?,
        Commands::MoveUp { pair, path, output } => run_intent(
            &pair,
            &output,
            Intent::MoveUp {
                path: ElementPath::parse(&path),
            },
        )?,
        Commands::MoveDown { pair, path, output } => run_intent(
            &pair,
            &output,
            Intent::MoveDown {
                path: ElementPath::parse(&path),
            },
        )?,
        Commands::Retype {
            pair,
            path,
            category,
            output,
        } => run_intent(
            &pair,
            &output,
            Intent::Retype {
                path: ElementPath::parse(&path),
                category: CategoryId::from_key(&category),
            },
        )?,
    }

    Ok(())
}

fn load_builder(args: &PairArgs) -> Result<FormBuilder> {
    let mods: Mods = match &args.mods {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open mods file: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse mods from: {}", path.display()))?
        }
        None => Mods::default(),
    };
    Ok(FormBuilder::new(mods))
}

fn read_document(path: &Path, document: Document) -> Result<serde_json::Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    decode_document(&text, CodecFormat::from_path(path), document)
        .with_context(|| format!("Failed to decode {}", path.display()))
}

fn read_pair(args: &PairArgs) -> Result<SchemaPair> {
    let schema = read_document(&args.schema, Document::Schema)?;
    let uischema = match &args.ui_schema {
        Some(path) => read_document(path, Document::UiSchema)?,
        None => serde_json::json!({}),
    };
    Ok(SchemaPair::new(schema, uischema))
}

fn run_intent(args: &PairArgs, output: &OutputArgs, intent: Intent) -> Result<()> {
    let builder = load_builder(args)?;
    let doc = read_pair(args)?;
    tracing::debug!(intent = intent.name(), "running intent");
    let edited = builder
        .apply(&doc, &intent)
        .map_err(|e| anyhow::Error::from(e).context("Edit failed"))?;
    let edited = form_builder_core::canonicalize(&edited);

    let schema_target = if output.in_place {
        Some(args.schema.clone())
    } else {
        output.out_schema.clone()
    };
    let ui_target = if output.in_place {
        // A missing UI file is created next to the schema on --in-place.
        Some(args.ui_schema.clone().unwrap_or_else(|| default_ui_path(&args.schema)))
    } else {
        output.out_ui_schema.clone()
    };

    if schema_target.is_none() && ui_target.is_none() {
        let envelope = serde_json::json!({
            "schema": edited.schema,
            "uischema": edited.uischema,
        });
        return write_json(&envelope, output.format);
    }
    if let Some(path) = schema_target {
        write_document(&edited.schema, &path)?;
    }
    if let Some(path) = ui_target {
        write_document(&edited.uischema, &path)?;
    }
    Ok(())
}

/// `form.json` -> `form.ui.json`, keeping the schema's extension.
fn default_ui_path(schema: &Path) -> PathBuf {
    let stem = schema
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schema");
    let ext = schema
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("json");
    schema.with_file_name(format!("{stem}.ui.{ext}"))
}

fn write_document(value: &serde_json::Value, path: &Path) -> Result<()> {
    let text = encode_document(value, CodecFormat::from_path(path))
        .with_context(|| format!("Failed to encode {}", path.display()))?;
    fs::write(path, text)
        .with_context(|| format!("Failed to create output file: {}", path.display()))
}

fn write_json<T: serde::Serialize>(val: &T, format: OutputFormat) -> Result<()> {
    let mut writer = BufWriter::new(io::stdout());

    match format {
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut writer, val).context("Failed to write JSON")?;
        }
        OutputFormat::Compact => {
            serde_json::to_writer(&mut writer, val).context("Failed to write JSON")?;
        }
    }

    // Ensure trailing newline
    writeln!(writer).context("Failed to write trailing newline")?;

    Ok(())
}
