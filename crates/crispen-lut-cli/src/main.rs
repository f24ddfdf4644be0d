use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, bail};
use crispen_lut::lut::MAX_LUT_SIZE;
use crispen_lut::{DEFAULT_LUT_SIZE, GenerateOptions, PresetCatalog, generate_to_file};

#[derive(Parser)]
#[command(name = "crispen-lut")]
#[command(version, about = "Generate .cube 3D LUTs from color-correction presets", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv). `CRISPEN_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the presets in a catalog
    List {
        /// Preset catalog (JSON)
        #[arg(short, long, value_name = "FILE")]
        catalog: PathBuf,
    },

    /// Generate one .cube file per preset
    Generate {
        /// Preset catalog (JSON)
        #[arg(short, long, value_name = "FILE")]
        catalog: PathBuf,

        /// Preset names to generate
        #[arg(value_name = "PRESET", required_unless_present = "all")]
        presets: Vec<String>,

        /// Generate every preset in the catalog
        #[arg(long, conflicts_with = "presets")]
        all: bool,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,

        /// Global strength (0.0 = neutral, 1.0 = full)
        #[arg(short, long, value_name = "FLOAT", default_value_t = 1.0, allow_negative_numbers = true)]
        strength: f64,

        /// Grid points per axis
        #[arg(
            long,
            value_name = "N",
            default_value_t = DEFAULT_LUT_SIZE,
            value_parser = clap::value_parser!(u32).range(2..=MAX_LUT_SIZE as i64)
        )]
        size: u32,
    },
}

fn install_tracing(verbose: u8) -> Result<(), tracing_subscriber::util::TryInitError> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter_layer = EnvFilter::try_from_env("CRISPEN_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "crispen_lut=warn,crispen_lut_cli=warn",
            1 => "crispen_lut=info,crispen_lut_cli=info",
            2 => "crispen_lut=debug,crispen_lut_cli=debug",
            _ => "crispen_lut=trace,crispen_lut_cli=trace",
        })
    });

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

fn load_catalog(path: &Path) -> Result<PresetCatalog> {
    PresetCatalog::load(path).wrap_err_with(|| format!("failed to load catalog {}", path.display()))
}

fn list(catalog: &Path) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    for (name, preset) in &catalog.presets {
        println!("{name:<24} {}", preset.title);
    }
    Ok(())
}

fn generate(
    catalog: &Path,
    presets: Vec<String>,
    all: bool,
    out: &Path,
    options: GenerateOptions,
) -> Result<()> {
    let catalog = load_catalog(catalog)?;
    let names: Vec<String> = if all {
        catalog.names().map(str::to_owned).collect()
    } else {
        presets
    };
    if names.is_empty() {
        bail!("no presets to generate");
    }

    // Resolve and validate everything before writing anything.
    let mut jobs = Vec::with_capacity(names.len());
    for name in &names {
        let preset = catalog.get(name)?;
        preset
            .validate()
            .wrap_err_with(|| format!("preset `{name}` is invalid"))?;
        jobs.push((name, preset));
    }

    std::fs::create_dir_all(out)
        .wrap_err_with(|| format!("failed to create output directory {}", out.display()))?;

    for (name, preset) in jobs {
        let path = out.join(format!("{name}.cube"));
        generate_to_file(preset, &options, &path)
            .wrap_err_with(|| format!("failed to generate `{name}`"))?;
        println!("{}", path.display());
    }
    tracing::info!(count = names.len(), strength = options.strength, size = options.size, "done");
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    install_tracing(cli.verbose)?;

    match cli.command {
        Commands::List { catalog } => list(&catalog),
        Commands::Generate {
            catalog,
            presets,
            all,
            out,
            strength,
            size,
        } => generate(&catalog, presets, all, &out, GenerateOptions { size, strength }),
    }
}
