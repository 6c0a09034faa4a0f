// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

use crate::math::Rgb;

#[derive(Parser, Debug, Clone)]
#[command(name = "part-viewer")]
#[command(about = "Part tree viewer with a mirrored VR render loop", long_about = None)]
pub struct Cli {
    /// Mesh files (glTF/GLB) to load under the first top-level part
    pub files: Vec<PathBuf>,

    /// JSON viewer config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable the shrink filter on the first top-level part
    #[arg(long, default_value = "false")]
    pub shrink: bool,

    /// Enable the clip filter on the first top-level part
    #[arg(long, default_value = "false")]
    pub clip: bool,

    /// Colour for the first top-level part, as r,g,b
    #[arg(long)]
    pub color: Option<Rgb>,

    /// Hide the first top-level part before syncing
    #[arg(long, default_value = "false")]
    pub hide: bool,

    /// Run the VR loop for this many frames
    #[arg(long = "vr-frames")]
    pub vr_frames: Option<u64>,

    /// Print the part tree as JSON
    #[arg(long = "dump-tree", default_value = "false")]
    pub dump_tree: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}
