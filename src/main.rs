use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palettize::commands;
use palettize::config::{Overrides, Settings, ToolConfig};

#[derive(Parser)]
#[command(name = "palettize")]
#[command(about = "Quantize and resample PNG images onto a fixed palette")]
struct Cli {
    /// Log progress (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Map every pixel of a PNG to its nearest palette color
    Quantize {
        /// Input PNG (8- or 16-bit, RGB or RGBA)
        #[arg(short, long)]
        input: PathBuf,

        /// Output indexed PNG
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        palette: PaletteArgs,

        /// Re-compress the output with oxipng
        #[arg(long)]
        optimize: bool,
    },
    /// Scale and rotate a PNG, optionally quantizing each output row
    Resample {
        /// Input PNG (8- or 16-bit, RGB or RGBA)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Scale factor
        #[arg(short, long, default_value_t = 1.0)]
        scale: f64,

        /// Rotation in degrees, clockwise on screen
        #[arg(short, long, default_value_t = 0.0)]
        rotate: f64,

        /// Interpolation: bilinear, bicubic or bicubic2
        #[arg(short, long)]
        filter: Option<String>,

        #[command(flatten)]
        palette: PaletteArgs,

        /// Quantize to the palette (implied by --palette)
        #[arg(long)]
        indexed: bool,

        /// Re-compress the output with oxipng
        #[arg(long)]
        optimize: bool,
    },
    /// Print a JSON summary of the colormap a palette builds
    Inspect {
        #[command(flatten)]
        palette: PaletteArgs,

        /// Build for 16-bit samples
        #[arg(long)]
        sixteen_bit: bool,
    },
}

#[derive(clap::Args)]
struct PaletteArgs {
    /// Palette as comma-separated hex colors (e.g. "#000000,#FFFFFF,#FF0000")
    #[arg(short, long)]
    palette: Option<String>,

    /// Search method: auto, cube, octree, brute-force or independent
    #[arg(short, long)]
    method: Option<String>,

    /// Cube bits per channel or oct-tree depth
    #[arg(short, long)]
    bits: Option<u32>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PaletteArgs {
    fn settings(&self, filter: Option<String>) -> anyhow::Result<Settings> {
        let config = ToolConfig::load_optional(self.config.as_deref());
        let overrides = Overrides {
            palette: self.palette.clone(),
            method: self.method.clone(),
            bits: self.bits,
            filter,
        };
        config
            .resolve(&overrides)
            .context("Invalid palette settings")
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Quantize {
            input,
            output,
            palette,
            optimize,
        }) => {
            let settings = palette.settings(None)?;
            let report = commands::quantize_file(&input, &output, &settings, optimize)
                .with_context(|| format!("Failed to quantize {}", input.display()))?;
            print_report(&output, &report)
        }
        Some(Commands::Resample {
            input,
            output,
            scale,
            rotate,
            filter,
            palette,
            indexed,
            optimize,
        }) => {
            let indexed = indexed || palette.palette.is_some();
            let settings = palette.settings(filter)?;
            let report = commands::resample_file(
                &input, &output, &settings, scale, rotate, indexed, optimize,
            )
            .with_context(|| format!("Failed to resample {}", input.display()))?;
            print_report(&output, &report)
        }
        Some(Commands::Inspect {
            palette,
            sixteen_bit,
        }) => {
            let settings = palette.settings(None)?;
            let summary = commands::inspect(&settings, sixteen_bit)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "palettize=info" } else { "palettize=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn print_report(output: &Path, report: &commands::Report) -> anyhow::Result<()> {
    println!(
        "Wrote {} ({}x{}, {} bytes)",
        output.display(),
        report.width,
        report.height,
        report.bytes
    );
    if let Some(colormap) = &report.colormap {
        println!(
            "  {} entries via {} search",
            colormap.entries, colormap.method
        );
    }
    Ok(())
}

/// Show version and usage hints when run without a subcommand
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Palettize v{VERSION}");
    println!("Quantize and resample PNG images onto a fixed palette\n");

    println!("Commands:");
    println!("  palettize quantize -i in.png -o out.png [--palette \"#000,#fff\"]");
    println!("  palettize resample -i in.png -o out.png --scale 2 [--rotate 30]");
    println!("  palettize inspect [--palette ...] [--method octree]\n");

    println!("Search methods: auto, cube, octree, brute-force, independent");
    println!("Filters:        bilinear, bicubic, bicubic2");
    println!("Default palette: 216-color web-safe cube\n");

    println!(
        "Logging: RUST_LOG = {}",
        std::env::var("RUST_LOG")
            .as_deref()
            .unwrap_or("palettize=warn (default)")
    );
}
