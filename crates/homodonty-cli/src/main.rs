//! homodonty CLI - run lever measurements on exported tooth segments
//!
//! Reads a JSON run description (segments plus landmarks), computes the
//! per-tooth table and writes it as CSV or JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use homodonty::{compute_homodonty, FaceSide, HomodontyReport, JawSide, RunSettings};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod input;

use input::RunInput;

#[derive(Parser)]
#[command(name = "homodonty")]
#[command(version, about = "Per-tooth mechanical advantage, bite force and stress", long_about = None)]
struct Cli {
    /// Logging verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the result table for a run description
    Run {
        /// Run description (.json)
        input: PathBuf,
        /// Settings file (.toml); overrides settings in the run description
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Output file (.csv or .json); prints CSV to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        overrides: SettingsArgs,
    },
    /// Summarize the segments and landmarks of a run description
    Info {
        /// Run description (.json)
        input: PathBuf,
    },
}

/// Per-field overrides, applied last.
#[derive(clap::Args, Default)]
struct SettingsArgs {
    /// Muscle force (N)
    #[arg(long)]
    force: Option<f64>,
    /// Species label
    #[arg(long)]
    species: Option<String>,
    /// Which jaw the teeth are on
    #[arg(long, value_enum)]
    jaw: Option<JawArg>,
    /// Which side of the face the jaw is on
    #[arg(long, value_enum)]
    side: Option<SideArg>,
    /// Use the other half of each bounding box for the tip
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    position_flag: Option<bool>,
    /// Add the relative position column
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    relative_position: Option<bool>,
}

#[derive(Clone, Copy, ValueEnum)]
enum JawArg {
    Lower,
    Upper,
}

#[derive(Clone, Copy, ValueEnum)]
enum SideArg {
    Left,
    Right,
}

impl SettingsArgs {
    fn apply(&self, mut settings: RunSettings) -> RunSettings {
        if let Some(force) = self.force {
            settings.muscle_force = force;
        }
        if let Some(species) = &self.species {
            settings.species = Some(species.clone());
        }
        if let Some(jaw) = self.jaw {
            settings.jaw_side = match jaw {
                JawArg::Lower => JawSide::Lower,
                JawArg::Upper => JawSide::Upper,
            };
        }
        if let Some(side) = self.side {
            settings.face_side = match side {
                SideArg::Left => FaceSide::Left,
                SideArg::Right => FaceSide::Right,
            };
        }
        if let Some(flag) = self.position_flag {
            settings.position_flag = flag;
        }
        if let Some(include) = self.relative_position {
            settings.include_relative_position = include;
        }
        settings
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run {
            input,
            settings,
            output,
            overrides,
        } => run(&input, settings.as_deref(), output.as_deref(), &overrides),
        Commands::Info { input } => show_info(&input),
    }
}

fn load(input: &Path) -> Result<RunInput> {
    let json = fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    RunInput::from_json(&json)
}

fn resolve_settings(
    embedded: Option<RunSettings>,
    settings_file: Option<&Path>,
    overrides: &SettingsArgs,
) -> Result<RunSettings> {
    let base = match settings_file {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            RunSettings::from_toml(&text)?
        }
        None => embedded.unwrap_or_default(),
    };
    Ok(overrides.apply(base))
}

fn run(
    input: &Path,
    settings_file: Option<&Path>,
    output: Option<&Path>,
    overrides: &SettingsArgs,
) -> Result<()> {
    let (segments, landmarks, embedded) = load(input)?.into_parts()?;
    let settings = resolve_settings(embedded, settings_file, overrides)?;

    let report = compute_homodonty(&segments, &landmarks, &settings)?;

    match output {
        Some(path) => {
            fs::write(path, render(&report, path)?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), rows = report.rows.len(), "Wrote result table");
        }
        None => print!("{}", report.table.to_csv()?),
    }
    Ok(())
}

fn render(report: &HomodontyReport, path: &Path) -> Result<String> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext.to_lowercase().as_str() {
        "csv" => Ok(report.table.to_csv()?),
        "json" => Ok(serde_json::to_string_pretty(report)?),
        _ => anyhow::bail!("Unknown output format: {}", ext),
    }
}

fn show_info(input: &Path) -> Result<()> {
    let (segments, landmarks, settings) = load(input)?.into_parts()?;

    println!("Landmarks:");
    println!("  jaw joint:        {}", landmarks.jaw_joint);
    println!("  jaw tip:          {}", landmarks.jaw_tip);
    println!("  muscle insertion: {}", landmarks.muscle_insertion);
    println!("Segments: {}", segments.len());
    for segment in &segments {
        println!(
            "  {} ({}): {} triangles, {:.3} mm^2",
            segment.name,
            segment.id,
            segment.surface.mesh().num_triangles(),
            segment.area_mm2
        );
    }
    if settings.is_some() {
        println!("Run description carries embedded settings");
    }
    Ok(())
}
