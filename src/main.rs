use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use cvpress::content::{resume_region, Profile};
use cvpress::{CaptureConfig, Exporter};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(
    name = "cvpress",
    version,
    about = "Render the resume page and export it as a single-page A4 PDF"
)]
struct Cli {
    /// Output directory for the generated document
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Load the resume profile from a JSON file instead of the built-in one
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Raster upscale factor applied at capture time
    #[arg(long, default_value_t = 1.5)]
    scale: f32,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let profile = match &cli.profile {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            serde_json::from_str::<Profile>(&raw)
                .with_context(|| format!("parsing profile {}", path.display()))?
        }
        None => Profile::builtin(),
    };

    let config = CaptureConfig {
        scale: cli.scale,
        ..CaptureConfig::default()
    };
    let exporter = Exporter::new(config);
    let region = resume_region(&profile);
    let report = exporter
        .export_to_dir(&region, &cli.out)
        .context("export failed")?;

    println!("{}", report.path.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    if let Err(e) = run(&cli) {
        log::error!("{:#}", e);
        process::exit(1);
    }
}
