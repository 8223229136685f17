//! Command-line interface.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::scene::Scene;

#[derive(Parser)]
#[command(name = "sceneloader", version, about = "Scene description file loader")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a scene file and report what it contains.
    Inspect {
        /// Scene file to load.
        scene: PathBuf,

        /// Emit the report as JSON.
        #[arg(long)]
        json: bool,

        /// Parse only; skip loading referenced mesh files.
        #[arg(long)]
        no_preprocess: bool,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Inspect {
            scene,
            json,
            no_preprocess,
        } => inspect(&scene, json, no_preprocess),
    }
}

fn inspect(path: &Path, json: bool, no_preprocess: bool) -> Result<()> {
    let mut scene = Scene::new();
    scene.load_file(path)?;
    if !no_preprocess {
        scene.preprocess();
    }

    let summary = scene.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("scene: {}", path.display());
    println!(
        "  camera: eye {:?}, at {:?}, fovy {}",
        summary.camera.eye, summary.camera.at, summary.camera.fovy
    );
    println!("  screen: {}x{}", summary.screen.width, summary.screen.height);
    println!("  lights: {}", summary.lights.len());
    println!(
        "  objects: {} ({} top-level)",
        summary.objects, summary.top_level_objects
    );
    println!(
        "  materials: {}, textures: {}, shaders: {}",
        summary.materials, summary.textures, summary.shaders
    );
    for (name, value) in &summary.floats {
        println!("  float {} = {}", name, value);
    }
    for (name, value) in &summary.ints {
        println!("  int {} = {}", name, value);
    }
    for (name, value) in &summary.bools {
        println!("  bool {} = {}", name, value);
    }
    Ok(())
}
