/// Rainfall-likelihood analysis of a thermal-IR satellite frame.
/// Prints a ranked report to stdout and writes a two-panel overlay image.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::{Builder, Env};
use log::info;
use nimbus_core::config::{AnalysisConfig, OverlayStyle, Preset, ReportStyle};
use nimbus_core::geo::BoundsPolicy;
use nimbus_core::pipeline::RainfallAnalyzer;

#[derive(Parser, Debug)]
#[command(name = "rainfall", about = "Classify cloud tiers in a thermal-IR frame and rank regions by rainfall likelihood")]
struct Args {
    /// Satellite image (JPEG/PNG).
    image: PathBuf,

    /// Output overlay image.
    #[arg(short, long, default_value = "rainfall_analysis_output.png")]
    output: PathBuf,

    /// JSON config overriding the preset (missing fields keep their defaults).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in parameter set, used when no config file is given.
    #[arg(long, value_enum, default_value = "sector")]
    preset: PresetArg,

    /// Report layout (defaults to the preset's).
    #[arg(long, value_enum)]
    report: Option<ReportArg>,

    /// Right-hand overlay panel (defaults to the preset's).
    #[arg(long, value_enum)]
    overlay: Option<OverlayArg>,

    /// Fail on regions that extend past the image extent instead of clamping.
    #[arg(long)]
    strict_bounds: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PresetArg {
    Sector,
    Regional,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ReportArg {
    Table,
    Detailed,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OverlayArg {
    Classified,
    Annotated,
}

fn build_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => AnalysisConfig::from_json_file(path)
            .with_context(|| format!("Cannot load config {}", path.display()))?,
        None => AnalysisConfig::preset(match args.preset {
            PresetArg::Sector => Preset::Sector,
            PresetArg::Regional => Preset::Regional,
        }),
    };

    if let Some(report) = args.report {
        config.report = match report {
            ReportArg::Table => ReportStyle::Table,
            ReportArg::Detailed => ReportStyle::Detailed,
        };
    }
    if let Some(overlay) = args.overlay {
        config.overlay = match overlay {
            OverlayArg::Classified => OverlayStyle::Classified,
            OverlayArg::Annotated => OverlayStyle::Annotated,
        };
    }
    if args.strict_bounds {
        config.bounds_policy = BoundsPolicy::Strict;
    }
    Ok(config)
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = build_config(&args)?;
    info!(
        "[rainfall] {} regions, cutoffs {}/{}/{}",
        config.regions.len(),
        config.thresholds.dense,
        config.thresholds.medium,
        config.thresholds.low
    );

    let analyzer = RainfallAnalyzer::new(config).context("Invalid analysis configuration")?;
    let stdout = io::stdout();
    let analysis = analyzer
        .run(&args.image, &args.output, &mut stdout.lock())
        .with_context(|| format!("Analysis failed for {}", args.image.display()))?;

    info!("[rainfall] Done: {} regions ranked", analysis.regions.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_preset() {
        let args = Args::parse_from([
            "rainfall",
            "frame.jpg",
            "--preset",
            "regional",
            "--report",
            "table",
            "--strict-bounds",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.report, ReportStyle::Table);
        assert_eq!(config.overlay, OverlayStyle::Annotated);
        assert_eq!(config.bounds_policy, BoundsPolicy::Strict);
        assert_eq!(config.regions.len(), 6);
    }

    #[test]
    fn defaults_match_sector_preset() {
        let args = Args::parse_from(["rainfall", "frame.jpg"]);
        assert_eq!(args.output, PathBuf::from("rainfall_analysis_output.png"));
        assert_eq!(build_config(&args).unwrap(), AnalysisConfig::default());
    }
}
