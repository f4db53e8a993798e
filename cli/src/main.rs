use clap::{Parser, ValueEnum};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use ctm_weld::prelude::*;
use ctm_weld::io::{self, arrays, obj};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ctm-weld")]
#[command(about = "Welds duplicate mesh vertices and remaps triangle indices")]
struct Cli {
    /// Input file path (.obj, or .json as written by this tool)
    #[arg(short, long)]
    input: String,

    /// Output file path (.obj or .json)
    #[arg(short, long)]
    output: Option<String>,

    /// Drop vertex normals
    #[arg(long)]
    no_normals: bool,

    /// Drop texture coordinates
    #[arg(long)]
    no_uvs: bool,

    /// Drop vertex colors
    #[arg(long)]
    no_colors: bool,

    /// Comment stored in the output file
    #[arg(long, default_value = "Exported with ctm-weld")]
    comment: String,

    /// Format of the report printed to stdout
    #[arg(long, value_enum, default_value_t = Report::Text)]
    report: Report,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Report {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = ExportOptions {
        normals: !cli.no_normals,
        uvs: !cli.no_uvs,
        colors: !cli.no_colors,
    };

    let corners = load_corners(&cli.input, &options)?;
    tracing::info!(corners = corners.len(), input = %cli.input, "loaded corner stream");

    let info = match &cli.output {
        Some(output) => write_mesh(&corners, output, &cli.comment)?,
        None => deduplicate(&corners)
            .context("Failed to weld vertices")?
            .info(),
    };

    match cli.report {
        Report::Text => println!("File: {}\n{}", cli.input, info),
        Report::Json => println!("{}", serde_json::to_string_pretty(&info)?),
    }
    Ok(())
}

fn extension(path: &str) -> &str {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
}

fn load_corners(input: &str, options: &ExportOptions) -> Result<Vec<Corner>> {
    match extension(input) {
        "obj" => obj::load_obj(input, options)
            .with_context(|| format!("Failed to load OBJ file {input}")),
        "json" => {
            let file = File::open(input)
                .with_context(|| format!("Failed to open {input}"))?;
            let doc = arrays::read_json(BufReader::new(file))
                .with_context(|| format!("Failed to read mesh arrays from {input}"))?;
            let mut corners = arrays::corners_from_arrays(&doc.mesh)
                .with_context(|| format!("Failed to expand mesh arrays from {input}"))?;
            options.apply(&mut corners);
            Ok(corners)
        }
        _ => anyhow::bail!("Input file must be a .obj or .json file"),
    }
}

fn write_mesh(corners: &[Corner], output: &str, comment: &str) -> Result<MeshInfo> {
    let ext = extension(output);
    if !matches!(ext, "obj" | "json") {
        anyhow::bail!("Output file must be a .obj or .json file");
    }

    let file = File::create(output)
        .with_context(|| format!("Failed to create output file {output}"))?;
    let writer = BufWriter::new(file);
    let mut sink: Box<dyn MeshSink> = if ext == "obj" {
        Box::new(ObjSink::new(writer))
    } else {
        Box::new(JsonSink::pretty(writer))
    };

    let info = io::export(corners, sink.as_mut(), Some(comment))
        .with_context(|| format!("Failed to export mesh to {output}"))?;
    tracing::info!(
        output,
        vertices = info.vertex_count,
        triangles = info.triangle_count,
        "mesh written"
    );
    Ok(info)
}
