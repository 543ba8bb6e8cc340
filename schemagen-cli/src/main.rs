//! Schemagen CLI - batch generation of randomized KiCad schematics.

use clap::{Parser, Subcommand, ValueEnum};
use schemagen::{
    import_catalogs, BatchOptions, BatchSummary, GenerationOptions, SchemagenCore, WeightTable,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Randomized KiCad schematic generator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a batch of schematic documents
    Generate {
        /// Symbol library file(s), in import order
        #[arg(short, long = "library", value_name = "FILE", required = true)]
        libraries: Vec<PathBuf>,

        /// Weight table file (template name, category, weight per line)
        #[arg(short, long, value_name = "FILE")]
        weights: PathBuf,

        /// Output directory for the generated documents
        #[arg(short, long, value_name = "DIR", default_value = "gendir")]
        out_dir: PathBuf,

        /// Number of documents to generate
        #[arg(short, long, default_value_t = 100)]
        count: usize,

        /// Minimum weighted parts per document (inclusive)
        #[arg(long, default_value_t = 10)]
        min_parts: usize,

        /// Maximum weighted parts per document (inclusive)
        #[arg(long, default_value_t = 100)]
        max_parts: usize,

        /// Template name of the source part
        #[arg(long, default_value = "VSOURCE")]
        source: String,

        /// Template name of the ground part
        #[arg(long, default_value = "0")]
        ground: String,

        /// Pretty-print nesting cap for the document encoder
        #[arg(long, default_value_t = 4)]
        max_nesting: usize,

        /// Output format for the batch summary
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List the part templates found in the given libraries
    Parts {
        /// Symbol library file(s), in import order
        #[arg(short, long = "library", value_name = "FILE", required = true)]
        libraries: Vec<PathBuf>,

        /// Show pin roles per template
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Generate {
            libraries,
            weights,
            out_dir,
            count,
            min_parts,
            max_parts,
            source,
            ground,
            max_nesting,
            format,
        } => {
            let batch = BatchOptions {
                count,
                min_parts,
                max_parts,
                options: GenerationOptions {
                    source_name: source,
                    ground_name: ground,
                    max_nesting,
                },
            };
            handle_generate(&libraries, &weights, &out_dir, batch, format)
        }
        Commands::Parts { libraries, verbose } => handle_parts(&libraries, verbose),
    };

    process::exit(exit_code);
}

fn handle_generate(
    libraries: &[PathBuf],
    weights_path: &PathBuf,
    out_dir: &PathBuf,
    batch: BatchOptions,
    format: OutputFormat,
) -> i32 {
    if batch.min_parts > batch.max_parts {
        eprintln!("Error: --min-parts must not exceed --max-parts");
        return 1;
    }

    // A malformed weight table aborts before any generation starts.
    let weights = match WeightTable::from_file(weights_path) {
        Ok(table) => table,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let catalogs = import_catalogs(libraries);
    if catalogs.is_empty() {
        eprintln!("Error: no catalogs could be imported");
        return 1;
    }

    let mut rng = rand::thread_rng();
    match SchemagenCore::generate_batch(&catalogs, &weights, &batch, out_dir, &mut rng) {
        Ok(summary) => {
            output_summary(&summary, out_dir, &format);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_summary(summary: &BatchSummary, out_dir: &std::path::Path, format: &OutputFormat) {
    match format {
        OutputFormat::Human => {
            println!("Generated {} of {} documents", summary.written, summary.requested);
            if summary.failed > 0 {
                println!("Abandoned {} infeasible documents", summary.failed);
            }
            println!("Output directory: {}", out_dir.display());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "requested": summary.requested,
                "written": summary.written,
                "failed": summary.failed,
                "out_dir": out_dir.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap());
        }
    }
}

fn handle_parts(libraries: &[PathBuf], verbose: bool) -> i32 {
    let catalogs = import_catalogs(libraries);
    if catalogs.is_empty() {
        eprintln!("Error: no catalogs could be imported");
        return 1;
    }

    for catalog in &catalogs {
        println!("{}:", catalog.name);
        for template in &catalog.templates {
            let family = schemagen::topology::family::classify(&template.name);
            println!(
                "  {:<20} family {:<3} {} pin(s)",
                template.name,
                family,
                template.pins.len()
            );
            if verbose {
                for pin in &template.pins {
                    println!("    pin {:<4} {:?}", pin.number, pin.role);
                }
            }
        }
        println!();
    }
    0
}
