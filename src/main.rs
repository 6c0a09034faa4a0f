use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use part_viewer::cli::Cli;
use part_viewer::loaders::GltfLoader;
use part_viewer::part::PartOutline;
use part_viewer::render::HeadlessRenderer;
use part_viewer::vr::HeadlessVrDisplay;
use part_viewer::{Viewer, ViewerConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match &cli.config {
        Some(path) => ViewerConfig::from_json_file(path)?,
        None => ViewerConfig::default(),
    };

    let display = match cli.vr_frames {
        Some(frames) => HeadlessVrDisplay::with_frame_limit(frames),
        None => HeadlessVrDisplay::new(),
    };
    let mut viewer = Viewer::new(config, HeadlessRenderer::new(), display, Box::new(GltfLoader))?;

    let first = viewer
        .top_level(0)
        .context("Viewer has no top-level parts; raise top_level_parts")?;
    viewer.select(first)?;

    if !cli.files.is_empty() {
        let outcomes = viewer.load_files(first, &cli.files)?;
        let loaded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!("Loaded {} of {} file(s)", loaded, outcomes.len());
    }

    if let Some(color) = cli.color {
        viewer.set_color(first, color)?;
    }
    if cli.shrink {
        viewer.set_shrink(first, true)?;
    }
    if cli.clip {
        viewer.set_clip(first, true)?;
    }
    if cli.hide {
        viewer.set_visible(first, false)?;
    }

    let renderer = viewer.renderer();
    println!(
        "Primary view: {} actor(s), {} triangle(s)",
        renderer.actors().len(),
        renderer.triangle_count()
    );

    if cli.vr_frames.is_some() {
        let actors = viewer.resync_vr()?;
        println!("VR rebuilt with {} actor(s)", actors);
        // The headless display closes the session after its frame budget
        viewer.wait_vr()?;
    }

    for message in viewer.status().iter() {
        println!("{}", message);
    }

    if cli.dump_tree {
        let outline = PartOutline::build(viewer.tree(), viewer.tree().root())?;
        println!("{}", serde_json::to_string_pretty(&outline)?);
    }

    Ok(())
}
