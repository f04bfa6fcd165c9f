//! voromesh CLI - Voronoi remeshing from the command line.
//!
//! Usage: voromesh <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Set `RUST_LOG=debug` for per-component statistics.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::{Parser, Subcommand};

use voromesh::algo::clean::connected_components;
use voromesh::algo::remesh::{remesh_with_progress, RemeshOptions};
use voromesh::algo::Progress;
use voromesh::io;
use voromesh::mesh::TriMesh;

#[derive(Parser)]
#[command(name = "voromesh")]
#[command(author, version, about = "Voronoi surface remeshing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Remesh a surface with evenly spaced vertices
    Remesh {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Target distance between output vertices [default: mean edge length]
        #[arg(short = 'r', long)]
        spacing: Option<f64>,

        /// Keep boundary corners sharper than this angle (degrees)
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        border_angle: f64,

        /// Keep surface creases sharper than this angle (degrees, negative = border angle)
        #[arg(short, long, default_value = "-1", allow_hyphen_values = true)]
        crease_angle: f64,

        /// Remesh connected components on all cores
        #[arg(long)]
        parallel: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => cmd_info(&input)?,
        Commands::Remesh {
            input,
            output,
            spacing,
            border_angle,
            crease_angle,
            parallel,
        } => {
            let options = RemeshOptions::default()
                .with_border_crease_angle(border_angle)
                .with_internal_crease_angle(crease_angle)
                .with_parallel(parallel);
            cmd_remesh(&input, &output, spacing, options)?;
        }
    }
    Ok(())
}

/// Progress bar on stderr; only redraws when the percentage grows.
fn create_progress() -> Progress {
    let shown = AtomicUsize::new(0);
    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }
        let percent = (Progress::fraction(current, total) * 100.0) as usize;
        if shown.fetch_max(percent, Ordering::Relaxed) >= percent && percent != 0 {
            return;
        }
        let filled = percent * 30 / 100;
        eprint!("\r[{}{}] {:3}% {}", "=".repeat(filled), " ".repeat(30 - filled), percent, message);
        let _ = std::io::stderr().flush();
        if current >= total {
            eprintln!();
        }
    })
}

/// Mean length over unique edges.
fn average_edge_length(mesh: &TriMesh) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for f in mesh.face_ids() {
        for z in 0..3 {
            let (g, _) = mesh.ff(f, z);
            if g >= f {
                sum += mesh.edge_length(f, z);
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Border edges: {}", mesh.num_border_edges());
    println!("Non-manifold edges: {}", mesh.count_non_manifold_edges());
    println!("Components: {}", connected_components(&mut mesh).len());
    println!("Surface area: {:.6}", mesh.area());
    println!("Average edge length: {:.6}", average_edge_length(&mesh));
    if let Some((min, max)) = mesh.bounding_box() {
        println!("Bounding box:");
        println!("  Min: ({:.6}, {:.6}, {:.6})", min.x, min.y, min.z);
        println!("  Max: ({:.6}, {:.6}, {:.6})", max.x, max.y, max.z);
        println!("  Diagonal: {:.6}", mesh.bbox_diagonal());
    }
    Ok(())
}

fn cmd_remesh(
    input: &PathBuf,
    output: &PathBuf,
    spacing: Option<f64>,
    mut options: RemeshOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut mesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());
    options.spacing = match spacing {
        Some(r) => r,
        None => {
            mesh.update_topology();
            average_edge_length(&mesh)
        }
    };
    println!(
        "Spacing {:.6}, border angle {}°, crease angle {}°{}",
        options.spacing,
        options.effective_border_angle(),
        options.effective_internal_angle(),
        if options.parallel { " (parallel)" } else { "" }
    );

    let progress = create_progress();
    let start = Instant::now();
    let result = remesh_with_progress(&mesh, &options, &progress)?;
    let elapsed = start.elapsed();

    println!("Result: {} vertices, {} faces", result.num_vertices(), result.num_faces());
    io::save(&result, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);
    Ok(())
}
