//! Hedron CLI - sphere mesh generation and VTK polydata tool.
//!
//! Usage: hedron <COMMAND> [OPTIONS] ...
//!
//! Run `hedron --help` for available commands. Set `RUST_LOG=debug` for
//! builder and subdivision diagnostics.

use std::cell::Cell;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use hedron::algo::subdivide::{sphere_subdivide_with_progress, SubdivideOptions};
use hedron::algo::Progress;
use hedron::io;
use hedron::mesh::{octahedron, HalfEdgeMesh};

#[derive(Parser)]
#[command(name = "hedron")]
#[command(author, version, about = "Half-edge sphere mesh CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the unit octahedron, optionally subdivided
    Generate {
        /// Output VTK file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "0")]
        iterations: usize,
    },

    /// Subdivide a mesh and project it onto the unit sphere
    Subdivide {
        /// Input VTK file
        input: PathBuf,

        /// Output VTK file
        output: PathBuf,

        /// Number of subdivision iterations
        #[arg(short, long, default_value = "1")]
        iterations: usize,
    },

    /// Display mesh information
    Info {
        /// Input VTK file
        input: PathBuf,
    },

    /// Check that a file describes a closed manifold triangle mesh
    Validate {
        /// Input VTK file
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Generate { output, iterations } => cmd_generate(&output, iterations)?,
        Commands::Subdivide {
            input,
            output,
            iterations,
        } => cmd_subdivide(&input, &output, iterations)?,
        Commands::Info { input } => cmd_info(&input)?,
        Commands::Validate { input } => cmd_validate(&input)?,
    }

    Ok(())
}

/// Create a progress reporter that draws a bar on stderr.
fn create_progress() -> Progress {
    let shown = Cell::new(None::<usize>);

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let percent = (current.min(total) * 100) / total;
        if shown.get().is_some_and(|p| p >= percent) {
            return;
        }
        shown.set(Some(percent));

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        eprint!(
            "\r[{}{}] {:3}% {}",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            percent,
            message
        );
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn refine(mesh: &HalfEdgeMesh, iterations: usize) -> Result<HalfEdgeMesh, Box<dyn std::error::Error>> {
    if iterations == 0 {
        return Ok(mesh.clone());
    }

    let start = Instant::now();
    let options = SubdivideOptions::new(iterations);
    let refined = sphere_subdivide_with_progress(mesh, &options, &create_progress())?;
    println!(
        "Subdivided {} times in {:.2?}: {} vertices, {} faces",
        iterations,
        start.elapsed(),
        refined.num_vertices(),
        refined.num_faces()
    );
    Ok(refined)
}

fn cmd_generate(output: &Path, iterations: usize) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = refine(&octahedron(), iterations)?;
    io::save(&mesh, output)?;
    println!("Saved: {}", output.display());
    Ok(())
}

fn cmd_subdivide(
    input: &Path,
    output: &Path,
    iterations: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;
    println!("Loaded: {} vertices, {} faces", mesh.num_vertices(), mesh.num_faces());

    let refined = refine(&mesh, iterations)?;
    io::save(&refined, output)?;
    println!("Saved: {}", output.display());
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: HalfEdgeMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Edges: {}", mesh.num_edges());
    println!("Faces: {}", mesh.num_faces());
    println!("Half-edges: {}", mesh.num_halfedges());
    println!("Euler characteristic: {}", mesh.euler_characteristic());
    println!("Surface area: {:.6}", mesh.surface_area());

    let (r_min, r_max) = mesh
        .vertices()
        .map(|(_, v)| v.position.coords.norm())
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), r| (lo.min(r), hi.max(r)));
    println!("Radius range: [{:.6}, {:.6}]", r_min, r_max);

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    let valences = mesh.vertex_ids().map(|v| mesh.valence(v));
    let (v_min, v_max) = valences.fold((usize::MAX, 0), |(lo, hi), n| (lo.min(n), hi.max(n)));
    println!("Valence range: [{}, {}]", v_min, v_max);

    Ok(())
}

fn cmd_validate(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Loading already runs the full connectivity check.
    let mesh: HalfEdgeMesh = io::load(input)?;
    println!(
        "{}: closed manifold, {} vertices, {} edges, {} faces",
        input.display(),
        mesh.num_vertices(),
        mesh.num_edges(),
        mesh.num_faces()
    );
    Ok(())
}
