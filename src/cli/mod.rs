//! bimgltf CLI - command-line interface for the exporter

use std::path::PathBuf;

use clap::Parser;

use crate::convert::{self, ConvertOptions, OutputFormat};
use crate::error::Error;

/// Convert a resolved building-model scene to glTF 2.0 / GLB.
#[derive(Parser)]
#[command(name = "bimgltf", version)]
#[command(about = "Building-model scene to glTF 2.0 / GLB exporter", long_about = None)]
struct Cli {
    /// Resolved scene file produced by the geometry pipeline
    input: PathBuf,

    /// Output file (.gltf or .glb)
    output: PathBuf,

    /// Uniform scale factor applied to all vertex coordinates
    #[arg(short, long, default_value_t = 1.0)]
    scale: f32,

    /// Log verbosity (0=silent, 1=normal, 2=verbose)
    #[arg(short = 'l', long, default_value_t = 1)]
    log_level: u8,

    /// Output format (gltf or glb); inferred from the output extension if omitted
    #[arg(short, long)]
    format: Option<String>,

    /// Emit one glTF material per appearance instead of the single default slot
    #[arg(long)]
    per_object_materials: bool,
}

/// Run the bimgltf CLI
///
/// # Errors
/// Returns an error for invalid configuration or a failed conversion; the
/// binary maps it to a non-zero exit status.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.log_level > 2 {
        return Err(Error::InvalidLogLevel {
            level: cli.log_level,
        }
        .into());
    }
    init_logging(cli.log_level);

    let format = match cli.format.as_deref() {
        Some(name) => parse_format(name)?,
        None => OutputFormat::from_path(&cli.output),
    };

    let options = ConvertOptions {
        scale: cli.scale,
        format,
        per_object_materials: cli.per_object_materials,
    };
    let summary = convert::convert_file_with_progress(&cli.input, &cli.output, &options, &|p| {
        match &p.detail {
            Some(detail) => tracing::debug!("[{}/{}] {}: {}", p.current, p.total, p.phase.as_str(), detail),
            None => tracing::debug!("[{}/{}] {}", p.current, p.total, p.phase.as_str()),
        }
    })?;

    if cli.log_level >= 1 {
        println!(
            "Wrote {} ({} objects, {} vertices, {} triangles, {} buffer bytes)",
            cli.output.display(),
            summary.nodes,
            summary.vertices,
            summary.triangles,
            summary.buffer_bytes
        );
    }

    Ok(())
}

fn parse_format(name: &str) -> Result<OutputFormat, Error> {
    match name.to_ascii_lowercase().as_str() {
        "gltf" => Ok(OutputFormat::Gltf),
        "glb" => Ok(OutputFormat::Glb),
        other => Err(Error::UnknownFormat {
            format: other.to_string(),
        }),
    }
}

fn init_logging(level: u8) {
    let max_level = match level {
        0 => tracing::Level::ERROR,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_target(false)
        .init();
}
